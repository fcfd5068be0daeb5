//! Remote process hosting for pathbridge.
//!
//! This module handles:
//! - Resolving the remote command on PATH
//! - Spawning it with piped stdin/stdout and inherited stderr
//! - Waiting for it and propagating its exit code

use crate::config::RemoteConfig;
use crate::error::{BridgeError, Result};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};

/// A spawned remote process whose stdio is owned by the proxy.
#[derive(Debug)]
pub struct RemoteProcess {
	child: Child,
	command: String,
}

/// The remote process's line streams, handed to the pumps.
#[derive(Debug)]
pub struct RemoteStreams {
	/// Written by the local-to-remote pump only.
	pub stdin: ChildStdin,
	/// Read by the remote-to-local pump only.
	pub stdout: BufReader<ChildStdout>,
}

impl RemoteProcess {
	/// Take ownership of the child's stdin/stdout pipes.
	pub fn take_streams(&mut self) -> Result<RemoteStreams> {
		let stdin = self
			.child
			.stdin
			.take()
			.ok_or(BridgeError::MissingPipe { stream: "stdin" })?;
		let stdout = self
			.child
			.stdout
			.take()
			.ok_or(BridgeError::MissingPipe { stream: "stdout" })?;

		Ok(RemoteStreams {
			stdin,
			stdout: BufReader::new(stdout),
		})
	}

	/// Wait for the remote process to exit.
	pub fn wait(mut self) -> Result<ExitStatus> {
		let status = self
			.child
			.wait()
			.map_err(|source| BridgeError::WaitFailed { source })?;
		tracing::debug!(command = %self.command, ?status, "remote process exited");
		Ok(status)
	}
}

/// Spawn the remote process described by `remote`.
///
/// stdin and stdout are piped for the proxy; stderr is inherited so the
/// remote's diagnostics reach the user untouched.
pub fn spawn_remote(remote: &RemoteConfig, cwd: &Path) -> Result<RemoteProcess> {
	let binary = resolve_command(&remote.command).ok_or_else(|| BridgeError::CommandNotFound {
		command: remote.command.clone(),
	})?;

	let mut cmd = Command::new(&binary);
	cmd.args(&remote.args)
		.current_dir(remote.cwd.as_deref().unwrap_or(cwd))
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::inherit());

	let child = cmd.spawn().map_err(|source| {
		if source.kind() == std::io::ErrorKind::NotFound {
			BridgeError::CommandNotFound {
				command: binary.to_string_lossy().to_string(),
			}
		} else {
			BridgeError::SpawnFailed {
				command: binary.to_string_lossy().to_string(),
				source,
			}
		}
	})?;

	let command = binary.to_string_lossy().to_string();
	tracing::info!(%command, args = ?remote.args, pid = child.id(), "spawned remote process");

	Ok(RemoteProcess { child, command })
}

/// Resolve a command name to its full path.
///
/// If the command contains a path separator, it is checked as-is.
/// Otherwise, searches PATH for the command.
pub fn resolve_command(command: &str) -> Option<PathBuf> {
	let path = Path::new(command);

	if path.components().count() > 1 || path.is_absolute() {
		return path.exists().then(|| path.to_path_buf());
	}

	let path_var = std::env::var_os("PATH")?;
	std::env::split_paths(&path_var).find_map(|dir| {
		let full_path = dir.join(command);
		if full_path.is_file() {
			return Some(full_path);
		}
		let exe = full_path.with_extension(std::env::consts::EXE_EXTENSION);
		(!std::env::consts::EXE_EXTENSION.is_empty() && exe.is_file()).then_some(exe)
	})
}
