//! Configuration loading and parsing for pathbridge.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Directory cascade discovery
//! - Config merging
//! - The `--init` template

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{
	CONFIG_FILE_NAME, discover_configs, load_merged_config, load_single_config, merge_configs,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{
	ClassifierConfig, Config, LoadedConfig, MappingWithSource, MergedConfig, PathMapping,
	RemoteConfig, TranslatorConfig,
};
