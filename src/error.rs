use crate::paths::Direction;
use std::path::PathBuf;

/// Library-level structured errors for pathbridge.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid config: {message}")]
	InvalidConfig { message: String },

	#[error("Invalid regex pattern in classifier exclude list: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("No remote command configured")]
	NoRemoteCommand,

	#[error("Command not found: {command}")]
	CommandNotFound { command: String },

	#[error("Failed to spawn remote process: {command}")]
	SpawnFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Remote process is missing its {stream} pipe")]
	MissingPipe { stream: &'static str },

	#[error("Failed to wait for remote process")]
	WaitFailed {
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed JSON document")]
	MalformedDocument {
		#[source]
		source: serde_json::Error,
	},

	#[error("Stream failure on {direction} pump")]
	Stream {
		direction: Direction,
		#[source]
		source: std::io::Error,
	},

	#[error("{direction} pump panicked")]
	PumpPanicked { direction: Direction },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// A path could not be converted into the other namespace.
///
/// Never fatal to a message: the rewrite engine leaves the string unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
	#[error("Failed to run translator command: {command}")]
	CommandFailed {
		command: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Translator command exited with {exit_code}: {command}: {stderr}")]
	NonZeroExit {
		command: String,
		exit_code: i32,
		stderr: String,
	},

	#[error("Translator command produced no output: {command}")]
	EmptyOutput { command: String },

	#[error("Translator command produced non-UTF-8 output: {command}")]
	InvalidOutput { command: String },

	#[error("No mapping covers path: {path}")]
	NoMapping { path: String },
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
