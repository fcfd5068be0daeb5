//! JSON documents and line framing for pathbridge.
//!
//! This module handles:
//! - Order- and precision-preserving parse/serialize of JSON documents
//! - Classifying transport lines as JSON-RPC messages or opaque text

pub mod line;
pub mod value;

pub use line::{Line, classify, looks_like_message, split_terminator};
pub use value::{parse, serialize};
