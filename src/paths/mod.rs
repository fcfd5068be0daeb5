//! Path detection and translation for pathbridge.
//!
//! This module handles:
//! - Deciding whether a string names an existing path on the sending side
//! - Translating paths between the local and remote namespaces
//! - The namespace/direction vocabulary shared by the pumps

pub mod classifier;
pub mod namespace;
pub mod translator;

pub use classifier::{FsProbe, LocalFs, PathClassifier};
pub use namespace::{Direction, Namespace};
pub use translator::{
	ChainTranslator, CommandTranslator, MappingTranslator, PathStyle, Serialized, Translator,
};
