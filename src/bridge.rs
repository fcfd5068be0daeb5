//! Wiring: config → rewriter, and the full proxy run around a remote process.

use crate::config::{MergedConfig, PathMapping, RemoteConfig};
use crate::error::Result;
use crate::exec::spawn_remote;
use crate::paths::{
	ChainTranslator, CommandTranslator, Direction, LocalFs, MappingTranslator, PathClassifier,
	Serialized, Translator,
};
use crate::proxy::{DuplexReport, Pump, PumpStats, run_duplex};
use crate::rewrite::Rewriter;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitStatus;

/// The rewriter the CLI runs with: real filesystem, configured translator.
pub type ConfiguredRewriter = Rewriter<LocalFs, Box<dyn Translator>>;

/// Build the translator described by the config.
///
/// Mappings are tried first, then the `[translator]` command. With neither
/// configured, `wslpath` through `wsl` is used.
pub fn build_translator(config: &MergedConfig) -> Box<dyn Translator> {
	let mut chain = ChainTranslator::new();

	let mappings: Vec<PathMapping> = config.mappings.iter().map(|m| m.mapping.clone()).collect();
	if !mappings.is_empty() {
		chain.push(MappingTranslator::new(mappings));
	}

	match config.translator {
		Some(ref translator) => chain.push(CommandTranslator::new(
			translator.to_remote.clone(),
			translator.to_local.clone(),
		)),
		None if chain.is_empty() => chain.push(CommandTranslator::wslpath()),
		None => {}
	}

	let serialize = config.translator.as_ref().is_some_and(|t| t.serialize);
	if serialize {
		Box::new(Serialized::new(chain))
	} else {
		Box::new(chain)
	}
}

/// Build the rewrite engine described by the config.
pub fn build_rewriter(config: &MergedConfig) -> Result<ConfiguredRewriter> {
	let probe = LocalFs {
		files_only: config.files_only,
	};
	let classifier = PathClassifier::new(probe).with_excludes(&config.excludes)?;
	Ok(Rewriter::new(classifier, build_translator(config)))
}

/// How a full bridge run ended.
#[derive(Debug)]
pub struct BridgeOutcome {
	pub report: DuplexReport,
	pub status: ExitStatus,
}

impl BridgeOutcome {
	/// The remote's exit code, or 1 if a pump failed while the remote succeeded.
	pub fn exit_code(&self) -> u8 {
		proxy_exit_code(self.status.code(), self.report.is_clean())
	}
}

/// Codes that do not fit a byte, and death by signal, become 1 so they are
/// never mistaken for success.
fn proxy_exit_code(remote: Option<i32>, clean: bool) -> u8 {
	match remote.map(u8::try_from) {
		Some(Ok(0)) if !clean => 1,
		Some(Ok(code)) => code,
		Some(Err(_)) | None => 1,
	}
}

/// Spawn the remote process and proxy our stdin/stdout through it.
///
/// Returns once local input has ended, the remote's output has ended, and the
/// remote process has been waited on.
pub fn run_bridge(
	rewriter: &ConfiguredRewriter,
	remote: &RemoteConfig,
	cwd: &Path,
) -> Result<BridgeOutcome> {
	let mut process = spawn_remote(remote, cwd)?;
	let streams = process.take_streams()?;

	let report = run_duplex(
		rewriter,
		io::stdin().lock(),
		streams.stdin,
		streams.stdout,
		io::stdout(),
	);

	let status = process.wait()?;
	Ok(BridgeOutcome { report, status })
}

/// Filter `reader` into `writer` through one direction of the engine,
/// without a remote process.
pub fn rewrite_stream<P, T, R, W>(
	rewriter: &Rewriter<P, T>,
	direction: Direction,
	reader: R,
	writer: W,
) -> Result<PumpStats>
where
	P: crate::paths::FsProbe,
	T: Translator,
	R: BufRead,
	W: Write,
{
	let mut stats = PumpStats::default();
	Pump::new(direction, rewriter).run(reader, writer, &mut stats)?;
	Ok(stats)
}
