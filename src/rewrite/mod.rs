//! Path rewriting for JSON-RPC documents.
//!
//! Walks a parsed document and replaces every string leaf that names an
//! existing sending-side path with its translation. Keys, numbers, and
//! structure pass through untouched.

pub mod engine;

pub use engine::{RewriteStats, Rewriter};
