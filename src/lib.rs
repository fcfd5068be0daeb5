//! Pathbridge - a line-oriented JSON-RPC proxy that rewrites filesystem paths
//! across a namespace boundary.
//!
//! This library provides the core functionality for pathbridge, including:
//! - Order- and precision-preserving JSON parsing and line classification
//! - Path detection against the local filesystem and path translation
//! - The recursive rewrite engine
//! - The duplex proxy loop and remote process hosting
//! - Configuration file parsing and cascade discovery
//!
//! # Example
//!
//! ```no_run
//! use pathbridge_cli::bridge::build_rewriter;
//! use pathbridge_cli::config::load_merged_config;
//! use pathbridge_cli::json::{parse, serialize};
//! use pathbridge_cli::paths::Direction;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let rewriter = build_rewriter(&config).unwrap();
//!
//! let message = parse(br#"{"id":1,"params":{"uri":"/home/u/a.ts"}}"#).unwrap();
//! let rewritten = rewriter.rewrite(message, Direction::LocalToRemote);
//! println!("{}", serialize(&rewritten));
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod exec;
pub mod json;
pub mod paths;
pub mod proxy;
pub mod rewrite;

pub use error::{BridgeError, Result, TranslationError};
