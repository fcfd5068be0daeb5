use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pathbridge_cli::BridgeError;
use pathbridge_cli::bridge::{build_rewriter, build_translator, rewrite_stream, run_bridge};
use pathbridge_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, MergedConfig, RemoteConfig, discover_configs,
	generate_init_template, load_merged_config, load_single_config, parse_config_file,
	user_config_path,
};
use pathbridge_cli::paths::{Direction, Namespace, Translator};

/// Environment variable holding the log filter (`tracing` EnvFilter syntax).
const LOG_ENV_VAR: &str = "PATHBRIDGE_LOG";

#[derive(Parser)]
#[command(name = "pathbridge")]
#[command(
	author,
	version,
	about = "JSON-RPC proxy that rewrites filesystem paths between namespaces"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Load exactly this config file instead of the directory cascade
	#[arg(long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Log at debug level unless PATHBRIDGE_LOG says otherwise
	#[arg(short, long, global = true)]
	verbose: bool,

	/// Create a template .pathbridge.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .pathbridge.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Remote command to proxy to; overrides [remote] from the config
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// Translate a single path with the configured translator
	Translate {
		/// Namespace to translate into
		#[arg(long, value_enum)]
		to: NamespaceArg,

		path: String,
	},
	/// Rewrite stdin to stdout in one direction, without a remote process
	Rewrite {
		#[arg(long, value_enum)]
		direction: DirectionArg,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the config files in the cascade and what they set
	Show,
	/// Check all config files for errors without running anything
	Validate,
}

#[derive(Clone, Copy, ValueEnum)]
enum NamespaceArg {
	Local,
	Remote,
}

impl From<NamespaceArg> for Namespace {
	fn from(arg: NamespaceArg) -> Self {
		match arg {
			NamespaceArg::Local => Namespace::Local,
			NamespaceArg::Remote => Namespace::Remote,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
	ToRemote,
	ToLocal,
}

impl From<DirectionArg> for Direction {
	fn from(arg: DirectionArg) -> Self {
		match arg {
			DirectionArg::ToRemote => Direction::LocalToRemote,
			DirectionArg::ToLocal => Direction::RemoteToLocal,
		}
	}
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(cli.config.as_deref()),
				ConfigAction::Validate => handle_config_validate(cli.config.as_deref()),
			},
			Commands::Translate { to, path } => {
				handle_translate(cli.config.as_deref(), to.into(), &path)
			}
			Commands::Rewrite { direction } => {
				handle_rewrite(cli.config.as_deref(), direction.into())
			}
		};
	}

	handle_proxy(cli.config.as_deref(), &cli.args)
}

/// Log to stderr only: stdout carries the transport.
fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let env_filter =
		EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.try_init();
}

fn load_config(explicit: Option<&Path>) -> Result<MergedConfig> {
	match explicit {
		Some(path) => load_single_config(path)
			.with_context(|| format!("Failed to load configuration from {}", path.display())),
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			load_merged_config(&cwd).context("Failed to load configuration")
		}
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(explicit: Option<&Path>) -> Result<ExitCode> {
	let configs = match explicit {
		Some(path) => {
			let config = parse_config_file(path)
				.with_context(|| format!("Failed to load {}", path.display()))?;
			vec![LoadedConfig {
				config,
				path: path.to_path_buf(),
			}]
		}
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			discover_configs(&cwd).context("Failed to discover config files")?
		}
	};

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		let config = &loaded.config;
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", config.root);
		println!("# no-external-lookup: {}", config.no_external_lookup);
		if let Some(ref env_var) = config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		println!();

		if let Some(ref remote) = config.remote {
			println!("  remote:");
			println!("    command: {}", remote.command);
			if !remote.args.is_empty() {
				println!("    args: {}", remote.args.join(" "));
			}
			if let Some(ref cwd) = remote.cwd {
				println!("    cwd: {}", cwd.display());
			}
		}
		if let Some(ref translator) = config.translator {
			println!("  translator:");
			println!("    to-remote: {}", translator.to_remote.join(" "));
			println!("    to-local: {}", translator.to_local.join(" "));
			println!("    serialize: {}", translator.serialize);
		}
		for pattern in &config.classifier.exclude {
			println!("  exclude: {}", pattern);
		}
		if let Some(files_only) = config.classifier.files_only {
			println!("  files-only: {}", files_only);
		}
		for (i, mapping) in config.mappings.iter().enumerate() {
			println!("  Mapping {}: {} <-> {}", i + 1, mapping.local, mapping.remote);
		}
		println!();
	}

	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(explicit: Option<&Path>) -> Result<ExitCode> {
	let result = match explicit {
		Some(path) => parse_config_file(path).map(|config| {
			vec![LoadedConfig {
				config,
				path: path.to_path_buf(),
			}]
		}),
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			discover_configs(&cwd)
		}
	};

	match result {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} mappings)",
						loaded.path.display(),
						loaded.config.mappings.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {:?}", anyhow::Error::from(e));
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_translate(explicit: Option<&Path>, to: Namespace, path: &str) -> Result<ExitCode> {
	let config = load_config(explicit)?;
	let translator = build_translator(&config);

	let translated = translator
		.translate(path, to)
		.with_context(|| format!("Failed to translate {path} to the {to} namespace"))?;

	println!("{translated}");
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(explicit: Option<&Path>, direction: Direction) -> Result<ExitCode> {
	let config = load_config(explicit)?;
	let rewriter = build_rewriter(&config).context("Failed to build rewrite engine")?;

	let stats = rewrite_stream(
		&rewriter,
		direction,
		std::io::stdin().lock(),
		std::io::stdout().lock(),
	)
	.context("Failed to rewrite stream")?;

	tracing::info!(
		%direction,
		lines = stats.lines,
		messages = stats.messages,
		malformed = stats.malformed,
		rewritten = stats.rewritten,
		"rewrite finished"
	);
	Ok(ExitCode::SUCCESS)
}

fn handle_proxy(explicit: Option<&Path>, args: &[String]) -> Result<ExitCode> {
	let config = load_config(explicit)?;
	let remote = remote_from(args, &config)?;
	let rewriter = build_rewriter(&config).context("Failed to build rewrite engine")?;
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let outcome = run_bridge(&rewriter, &remote, &cwd)
		.with_context(|| format!("Failed to run remote command: {}", remote.command))?;

	Ok(ExitCode::from(outcome.exit_code()))
}

/// Trailing arguments win over the config's `[remote]` section.
fn remote_from(args: &[String], config: &MergedConfig) -> Result<RemoteConfig> {
	match args.split_first() {
		Some((command, rest)) => Ok(RemoteConfig {
			command: command.clone(),
			args: rest.to_vec(),
			cwd: None,
		}),
		None => Ok(config.remote.clone().ok_or(BridgeError::NoRemoteCommand)?),
	}
}
