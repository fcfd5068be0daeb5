use crate::config::types::PathMapping;
use crate::error::TranslationError;
use crate::paths::Namespace;
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

/// Placeholder substituted with the path in translator command templates.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Converts a path string into the syntax and root of another namespace.
///
/// Implementations may block for a long time (e.g. by running a subprocess).
pub trait Translator: Send + Sync {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError>;
}

impl<T: Translator + ?Sized> Translator for Box<T> {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		(**self).translate(path, to)
	}
}

impl<T: Translator + ?Sized> Translator for &T {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		(**self).translate(path, to)
	}
}

/// Translator that runs an external command per path.
///
/// Each template is an argv whose elements have `{path}` replaced before the
/// command runs. The command's stdout, minus the trailing newline, is the
/// translated path.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
	to_remote: Vec<String>,
	to_local: Vec<String>,
}

impl CommandTranslator {
	pub fn new(to_remote: Vec<String>, to_local: Vec<String>) -> Self {
		Self {
			to_remote,
			to_local,
		}
	}

	/// `wslpath` run through `wsl`, for a Windows host bridging into WSL.
	pub fn wslpath() -> Self {
		Self::new(
			["wsl", "wslpath", "-u", PATH_PLACEHOLDER].map(String::from).to_vec(),
			["wsl", "wslpath", "-w", PATH_PLACEHOLDER].map(String::from).to_vec(),
		)
	}

	fn template(&self, to: Namespace) -> &[String] {
		match to {
			Namespace::Remote => &self.to_remote,
			Namespace::Local => &self.to_local,
		}
	}
}

impl Translator for CommandTranslator {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		let argv = build_argv(self.template(to), path);
		let command_str = argv.join(" ");

		let Some((program, args)) = argv.split_first() else {
			return Err(TranslationError::EmptyOutput {
				command: command_str,
			});
		};

		let output = Command::new(program)
			.args(args)
			.stdin(Stdio::null())
			.output()
			.map_err(|source| TranslationError::CommandFailed {
				command: command_str.clone(),
				source,
			})?;

		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

		if !output.status.success() {
			return Err(TranslationError::NonZeroExit {
				command: command_str,
				exit_code: output.status.code().unwrap_or(-1),
				stderr,
			});
		}

		if !stderr.is_empty() {
			tracing::debug!(command = %command_str, %stderr, "translator wrote to stderr");
		}

		let stdout = String::from_utf8(output.stdout).map_err(|_| TranslationError::InvalidOutput {
			command: command_str.clone(),
		})?;

		let translated = stdout.trim_end_matches(['\r', '\n']);
		if translated.is_empty() {
			return Err(TranslationError::EmptyOutput {
				command: command_str,
			});
		}

		Ok(translated.to_string())
	}
}

/// Substitute the path into every element of a command template.
fn build_argv(template: &[String], path: &str) -> Vec<String> {
	template
		.iter()
		.map(|part| part.replace(PATH_PLACEHOLDER, path))
		.collect()
}

/// Separator convention of a namespace root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
	Posix,
	Windows,
}

impl PathStyle {
	/// Infer the style from a root: a backslash or a drive letter means Windows.
	pub fn of(root: &str) -> Self {
		let bytes = root.as_bytes();
		let drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
		if drive || root.contains('\\') {
			PathStyle::Windows
		} else {
			PathStyle::Posix
		}
	}

	fn convert(&self, tail: &str) -> String {
		match self {
			PathStyle::Posix => tail.replace('\\', "/"),
			PathStyle::Windows => tail.replace('/', "\\"),
		}
	}
}

/// Translator backed by static root mappings; no subprocess involved.
///
/// The first mapping whose source root is a prefix of the path (at a
/// component boundary) wins. The remainder is re-joined onto the target root
/// using the target root's separator.
#[derive(Debug, Clone, Default)]
pub struct MappingTranslator {
	mappings: Vec<PathMapping>,
}

impl MappingTranslator {
	pub fn new(mappings: Vec<PathMapping>) -> Self {
		Self { mappings }
	}
}

impl Translator for MappingTranslator {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		for mapping in &self.mappings {
			let (from_root, to_root) = match to {
				Namespace::Remote => (&mapping.local, &mapping.remote),
				Namespace::Local => (&mapping.remote, &mapping.local),
			};

			if let Some(tail) = strip_root(path, from_root) {
				let to_root = to_root.trim_end_matches(['/', '\\']);
				let style = PathStyle::of(to_root);
				let mut translated = format!("{}{}", to_root, style.convert(tail));
				if translated.is_empty() {
					translated = match style {
						PathStyle::Posix => "/".to_string(),
						PathStyle::Windows => "\\".to_string(),
					};
				}
				return Ok(translated);
			}
		}

		Err(TranslationError::NoMapping {
			path: path.to_string(),
		})
	}
}

/// Strip `root` from the front of `path`, returning the remainder.
///
/// The remainder is empty or starts with a separator. Windows-style roots
/// compare case-insensitively.
fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
	let root = root.trim_end_matches(['/', '\\']);
	let head = path.get(..root.len())?;

	let matched = match PathStyle::of(root) {
		PathStyle::Windows => head.eq_ignore_ascii_case(root),
		PathStyle::Posix => head == root,
	};
	if !matched {
		return None;
	}

	let tail = &path[root.len()..];
	if tail.is_empty() || tail.starts_with(['/', '\\']) {
		Some(tail)
	} else {
		None
	}
}

/// Tries each translator in order; the first success wins.
#[derive(Default)]
pub struct ChainTranslator {
	links: Vec<Box<dyn Translator>>,
}

impl ChainTranslator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, translator: impl Translator + 'static) {
		self.links.push(Box::new(translator));
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}
}

impl Translator for ChainTranslator {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		let mut last_error = None;
		for link in &self.links {
			match link.translate(path, to) {
				Ok(translated) => return Ok(translated),
				Err(e) => last_error = Some(e),
			}
		}

		Err(last_error.unwrap_or_else(|| TranslationError::NoMapping {
			path: path.to_string(),
		}))
	}
}

/// Serializes calls into a translator that is not reentrant.
///
/// Only translator calls are serialized; the pumps forward lines in parallel.
#[derive(Debug, Default)]
pub struct Serialized<T> {
	inner: Mutex<T>,
}

impl<T> Serialized<T> {
	pub fn new(inner: T) -> Self {
		Self {
			inner: Mutex::new(inner),
		}
	}
}

impl<T: Translator> Translator for Serialized<T> {
	fn translate(&self, path: &str, to: Namespace) -> Result<String, TranslationError> {
		let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
		guard.translate(path, to)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::thread;
	use std::time::Duration;

	fn fixture() -> MappingTranslator {
		MappingTranslator::new(vec![PathMapping {
			local: "/home/u/proj".to_string(),
			remote: r"U:\proj".to_string(),
		}])
	}

	#[test]
	fn test_build_argv() {
		let template = ["wsl", "wslpath", "-u", "{path}"].map(String::from);
		let argv = build_argv(&template, r"C:\a b\c.ts");
		assert_eq!(argv, vec!["wsl", "wslpath", "-u", r"C:\a b\c.ts"]);
	}

	#[test]
	fn test_path_style() {
		assert_eq!(PathStyle::of("/home/u"), PathStyle::Posix);
		assert_eq!(PathStyle::of(r"U:\proj"), PathStyle::Windows);
		assert_eq!(PathStyle::of("C:"), PathStyle::Windows);
		assert_eq!(PathStyle::of(r"\\wsl$\Ubuntu"), PathStyle::Windows);
	}

	#[test]
	fn test_mapping_to_remote() {
		let translator = fixture();
		let translated = translator
			.translate("/home/u/proj/file.ts", Namespace::Remote)
			.unwrap();
		assert_eq!(translated, r"U:\proj\file.ts");
	}

	#[test]
	fn test_mapping_round_trip() {
		let translator = fixture();
		let original = "/home/u/proj/src/lib/file.ts";
		let remote = translator.translate(original, Namespace::Remote).unwrap();
		assert_eq!(remote, r"U:\proj\src\lib\file.ts");
		let back = translator.translate(&remote, Namespace::Local).unwrap();
		assert_eq!(back, original);
	}

	#[test]
	fn test_mapping_respects_component_boundary() {
		let translator = fixture();
		let result = translator.translate("/home/u/project/file.ts", Namespace::Remote);
		assert!(matches!(result, Err(TranslationError::NoMapping { .. })));
	}

	#[test]
	fn test_mapping_root_itself() {
		let translator = fixture();
		assert_eq!(
			translator.translate("/home/u/proj", Namespace::Remote).unwrap(),
			r"U:\proj"
		);
	}

	#[test]
	fn test_mapping_windows_root_case_insensitive() {
		let translator = fixture();
		assert_eq!(
			translator.translate(r"u:\PROJ\a.ts", Namespace::Local).unwrap(),
			"/home/u/proj/a.ts"
		);
	}

	#[test]
	fn test_mapping_posix_root_slash() {
		let translator = MappingTranslator::new(vec![PathMapping {
			local: "/".to_string(),
			remote: r"\\wsl$\Ubuntu\".to_string(),
		}]);
		assert_eq!(
			translator.translate("/etc/hosts", Namespace::Remote).unwrap(),
			r"\\wsl$\Ubuntu\etc\hosts"
		);
		assert_eq!(
			translator
				.translate(r"\\wsl$\Ubuntu\etc\hosts", Namespace::Local)
				.unwrap(),
			"/etc/hosts"
		);
	}

	#[test]
	fn test_chain_falls_through() {
		let mut chain = ChainTranslator::new();
		chain.push(MappingTranslator::new(vec![PathMapping {
			local: "/other".to_string(),
			remote: "X:".to_string(),
		}]));
		chain.push(fixture());
		assert_eq!(
			chain.translate("/home/u/proj/a.ts", Namespace::Remote).unwrap(),
			r"U:\proj\a.ts"
		);
	}

	#[test]
	fn test_empty_chain_fails() {
		let chain = ChainTranslator::new();
		assert!(chain.is_empty());
		assert!(chain.translate("/a/b", Namespace::Remote).is_err());
	}

	#[test]
	fn test_serialized_delegates() {
		let translator = Serialized::new(fixture());
		assert_eq!(
			translator.translate("/home/u/proj/a.ts", Namespace::Remote).unwrap(),
			r"U:\proj\a.ts"
		);
	}

	/// Slow translator that records how many calls overlap.
	#[derive(Default)]
	struct OverlapCounter {
		active: AtomicUsize,
		peak: AtomicUsize,
		calls: AtomicUsize,
	}

	impl Translator for OverlapCounter {
		fn translate(&self, path: &str, _to: Namespace) -> Result<String, TranslationError> {
			let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
			self.peak.fetch_max(now, Ordering::SeqCst);
			thread::sleep(Duration::from_millis(10));
			self.calls.fetch_add(1, Ordering::SeqCst);
			self.active.fetch_sub(1, Ordering::SeqCst);
			Ok(path.to_string())
		}
	}

	#[test]
	fn test_serialized_excludes_concurrent_callers() {
		let translator = Serialized::new(OverlapCounter::default());

		thread::scope(|scope| {
			for to in [Namespace::Remote, Namespace::Local] {
				let translator = &translator;
				scope.spawn(move || {
					for _ in 0..5 {
						translator.translate("/a/b", to).unwrap();
					}
				});
			}
		});

		let counter = translator.inner.into_inner().unwrap();
		assert_eq!(counter.calls.load(Ordering::SeqCst), 10);
		assert_eq!(counter.peak.load(Ordering::SeqCst), 1);
	}

	#[cfg(unix)]
	#[test]
	fn test_command_translator_uses_stdout() {
		let translator = CommandTranslator::new(
			["echo", "remote:{path}"].map(String::from).to_vec(),
			["echo", "local:{path}"].map(String::from).to_vec(),
		);
		assert_eq!(
			translator.translate("/a/b", Namespace::Remote).unwrap(),
			"remote:/a/b"
		);
		assert_eq!(
			translator.translate("/a/b", Namespace::Local).unwrap(),
			"local:/a/b"
		);
	}

	#[cfg(unix)]
	#[test]
	fn test_command_translator_non_zero_exit() {
		let translator = CommandTranslator::new(
			["sh", "-c", "echo oops >&2; exit 3", "{path}"]
				.map(String::from)
				.to_vec(),
			vec![],
		);
		match translator.translate("/a/b", Namespace::Remote).unwrap_err() {
			TranslationError::NonZeroExit {
				exit_code, stderr, ..
			} => {
				assert_eq!(exit_code, 3);
				assert_eq!(stderr, "oops");
			}
			other => panic!("Expected NonZeroExit, got {other:?}"),
		}
	}

	#[cfg(unix)]
	#[test]
	fn test_command_translator_empty_output() {
		let translator = CommandTranslator::new(
			["true", "{path}"].map(String::from).to_vec(),
			vec![],
		);
		assert!(matches!(
			translator.translate("/a/b", Namespace::Remote),
			Err(TranslationError::EmptyOutput { .. })
		));
	}

	#[test]
	fn test_command_translator_missing_binary() {
		let translator = CommandTranslator::new(
			["/nonexistent/path/to/translator", "{path}"]
				.map(String::from)
				.to_vec(),
			vec![],
		);
		assert!(matches!(
			translator.translate("/a/b", Namespace::Remote),
			Err(TranslationError::CommandFailed { .. })
		));
	}
}
