use crate::error::{BridgeError, Result};
use crate::paths::{Direction, FsProbe, Translator};
use crate::proxy::pump::{Pump, PumpStats, display_chain};
use crate::rewrite::Rewriter;
use std::io::{BufRead, Write};
use std::thread;

/// How one pump ended.
#[derive(Debug)]
pub struct PumpReport {
	pub direction: Direction,
	pub stats: PumpStats,
	pub result: Result<()>,
}

impl PumpReport {
	fn log(&self) {
		let PumpStats {
			lines,
			raw,
			messages,
			malformed,
			rewritten,
			translation_failures,
		} = self.stats;

		match &self.result {
			Ok(()) => tracing::info!(
				direction = %self.direction,
				lines,
				raw,
				messages,
				malformed,
				rewritten,
				translation_failures,
				"pump finished"
			),
			Err(error) => tracing::error!(
				direction = %self.direction,
				lines,
				messages,
				error = %display_chain(error),
				"pump stopped on stream failure"
			),
		}
	}
}

/// Outcome of both directions.
#[derive(Debug)]
pub struct DuplexReport {
	pub local_to_remote: PumpReport,
	pub remote_to_local: PumpReport,
}

impl DuplexReport {
	/// Both pumps reached end of input without a stream failure.
	pub fn is_clean(&self) -> bool {
		self.local_to_remote.result.is_ok() && self.remote_to_local.result.is_ok()
	}
}

/// Run both pumps until each has reached end of input or failed.
///
/// The local-to-remote pump runs on the calling thread with blocking reads;
/// the remote-to-local pump runs on its own thread. They share only the
/// rewriter, and each output stream has exactly one writer. A failure in one
/// pump never stops the other.
///
/// `remote_in` is dropped as soon as local input ends, closing the remote
/// process's stdin.
pub fn run_duplex<P, T, LR, RW, RR, LW>(
	rewriter: &Rewriter<P, T>,
	local_in: LR,
	remote_in: RW,
	remote_out: RR,
	local_out: LW,
) -> DuplexReport
where
	P: FsProbe,
	T: Translator,
	LR: BufRead,
	RW: Write,
	RR: BufRead + Send,
	LW: Write + Send,
{
	thread::scope(|scope| {
		let spawned = thread::Builder::new()
			.name(Direction::RemoteToLocal.as_str().to_string())
			.spawn_scoped(scope, move || {
				run_pump(Direction::RemoteToLocal, rewriter, remote_out, local_out)
			});

		let local_to_remote = run_pump(Direction::LocalToRemote, rewriter, local_in, remote_in);

		let remote_to_local = match spawned {
			Ok(handle) => handle.join().unwrap_or_else(|_| {
				let report = PumpReport {
					direction: Direction::RemoteToLocal,
					stats: PumpStats::default(),
					result: Err(BridgeError::PumpPanicked {
						direction: Direction::RemoteToLocal,
					}),
				};
				report.log();
				report
			}),
			Err(source) => {
				let report = PumpReport {
					direction: Direction::RemoteToLocal,
					stats: PumpStats::default(),
					result: Err(BridgeError::Stream {
						direction: Direction::RemoteToLocal,
						source,
					}),
				};
				report.log();
				report
			}
		};

		DuplexReport {
			local_to_remote,
			remote_to_local,
		}
	})
}

fn run_pump<P, T, R, W>(
	direction: Direction,
	rewriter: &Rewriter<P, T>,
	reader: R,
	writer: W,
) -> PumpReport
where
	P: FsProbe,
	T: Translator,
	R: BufRead,
	W: Write,
{
	let pump = Pump::new(direction, rewriter);
	let mut stats = PumpStats::default();
	let result = pump.run(reader, writer, &mut stats);

	let report = PumpReport {
		direction,
		stats,
		result,
	};
	report.log();
	report
}
