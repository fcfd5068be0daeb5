use crate::error::BridgeError;
use crate::paths::translator::PATH_PLACEHOLDER;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.pathbridge.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop directory cascade and jump directly to ~/.pathbridge.toml.
	#[serde(default)]
	pub root: bool,

	/// If true, only this file is used; the cascade and user config are skipped.
	#[serde(default)]
	pub no_external_lookup: bool,

	/// Environment variable name that, if truthy, skips ~/.pathbridge.toml lookup.
	/// Useful for CI environments.
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// The subprocess launched on the remote side.
	#[serde(default)]
	pub remote: Option<RemoteConfig>,

	/// External command used to translate paths.
	#[serde(default)]
	pub translator: Option<TranslatorConfig>,

	/// Tuning for the "is this a path" check.
	#[serde(default)]
	pub classifier: ClassifierConfig,

	/// Static root mappings, tried before the translator command.
	#[serde(default)]
	pub mappings: Vec<PathMapping>,
}

/// The remote process to spawn.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RemoteConfig {
	pub command: String,

	#[serde(default)]
	pub args: Vec<String>,

	/// Working directory for the remote process (defaults to ours).
	#[serde(default)]
	pub cwd: Option<PathBuf>,
}

/// Command templates for an external path translator.
///
/// Every element may contain `{path}`, replaced with the path being translated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TranslatorConfig {
	pub to_remote: Vec<String>,

	pub to_local: Vec<String>,

	/// Run at most one translation at a time across both directions.
	#[serde(default)]
	pub serialize: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassifierConfig {
	/// Regexes; strings matching any of them are never treated as paths.
	#[serde(default)]
	pub exclude: Vec<String>,

	/// Only regular files qualify as paths (directories are left alone).
	#[serde(default)]
	pub files_only: Option<bool>,
}

/// A pair of roots naming the same directory on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PathMapping {
	pub local: String,
	pub remote: String,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Merged configuration from multiple config files in the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Remote process from the most specific config that sets one.
	pub remote: Option<RemoteConfig>,

	/// Translator from the most specific config that sets one.
	pub translator: Option<TranslatorConfig>,

	/// Exclude patterns from all configs, in cascade order.
	pub excludes: Vec<String>,

	pub files_only: bool,

	/// All mappings from all configs, in cascade order (first match wins).
	pub mappings: Vec<MappingWithSource>,
}

/// A mapping with its source config path for debugging/display.
#[derive(Debug, Clone)]
pub struct MappingWithSource {
	pub mapping: PathMapping,

	/// The config file this mapping came from.
	pub source: PathBuf,
}

impl RemoteConfig {
	pub fn validate(&self) -> Result<(), BridgeError> {
		if self.command.trim().is_empty() {
			return Err(invalid("remote.command must not be empty"));
		}
		Ok(())
	}
}

impl TranslatorConfig {
	/// Both templates must name a program and mention `{path}`.
	pub fn validate(&self) -> Result<(), BridgeError> {
		let templates = [("to-remote", &self.to_remote), ("to-local", &self.to_local)];

		for (name, template) in templates {
			if template.first().is_none_or(|program| program.trim().is_empty()) {
				return Err(invalid(format!("translator.{name} must name a program")));
			}
			if !template.iter().any(|part| part.contains(PATH_PLACEHOLDER)) {
				return Err(invalid(format!(
					"translator.{name} must contain {PATH_PLACEHOLDER}"
				)));
			}
		}

		Ok(())
	}
}

impl ClassifierConfig {
	pub fn validate(&self) -> Result<(), BridgeError> {
		for pattern in &self.exclude {
			regex::Regex::new(pattern).map_err(|source| BridgeError::InvalidRegex {
				pattern: pattern.clone(),
				source,
			})?;
		}
		Ok(())
	}
}

impl PathMapping {
	pub fn validate(&self) -> Result<(), BridgeError> {
		if self.local.is_empty() || self.remote.is_empty() {
			return Err(invalid("mappings need both a local and a remote root"));
		}
		Ok(())
	}
}

impl Config {
	/// Validate every section of this config.
	pub fn validate(&self) -> Result<(), BridgeError> {
		if let Some(ref remote) = self.remote {
			remote.validate()?;
		}
		if let Some(ref translator) = self.translator {
			translator.validate()?;
		}
		self.classifier.validate()?;
		for mapping in &self.mappings {
			mapping.validate()?;
		}
		Ok(())
	}
}

fn invalid(message: impl Into<String>) -> BridgeError {
	BridgeError::InvalidConfig {
		message: message.into(),
	}
}
