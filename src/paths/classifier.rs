use crate::error::{BridgeError, Result};
use regex::Regex;
use std::io;

/// Filesystem existence probe used by the classifier.
///
/// Always answers for the current process's own view of the filesystem.
pub trait FsProbe: Send + Sync {
	/// Whether `path` names an existing entry.
	fn exists(&self, path: &str) -> io::Result<bool>;
}

/// Probe backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
	/// Only regular files qualify; directories are ignored.
	pub files_only: bool,
}

impl FsProbe for LocalFs {
	fn exists(&self, path: &str) -> io::Result<bool> {
		match std::fs::metadata(path) {
			Ok(meta) => Ok(!self.files_only || meta.is_file()),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
			Err(e) => Err(e),
		}
	}
}

impl<P: FsProbe + ?Sized> FsProbe for &P {
	fn exists(&self, path: &str) -> io::Result<bool> {
		(**self).exists(path)
	}
}

/// Decides whether a JSON string leaf denotes a path on the sending side.
#[derive(Debug)]
pub struct PathClassifier<P> {
	probe: P,
	excludes: Vec<Regex>,
}

impl<P: FsProbe> PathClassifier<P> {
	pub fn new(probe: P) -> Self {
		Self {
			probe,
			excludes: Vec::new(),
		}
	}

	/// Add exclude patterns. A string matching any of them is never a path.
	pub fn with_excludes(mut self, patterns: &[String]) -> Result<Self> {
		for pattern in patterns {
			self.excludes.push(compile_regex(pattern)?);
		}
		Ok(self)
	}

	/// A string qualifies when it contains a separator, matches no exclude
	/// pattern, and names an existing entry. Probe errors count as "no".
	pub fn looks_like_path(&self, s: &str) -> bool {
		if !has_separator(s) {
			return false;
		}

		if self.excludes.iter().any(|re| re.is_match(s)) {
			return false;
		}

		match self.probe.exists(s) {
			Ok(exists) => exists,
			Err(error) => {
				tracing::debug!(path = s, %error, "filesystem probe failed, not treating as path");
				false
			}
		}
	}
}

fn has_separator(s: &str) -> bool {
	s.contains('/') || s.contains('\\')
}

/// Compile a regex pattern string.
fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| BridgeError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}
