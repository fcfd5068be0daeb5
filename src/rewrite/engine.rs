use crate::paths::{Direction, FsProbe, PathClassifier, Translator};
use serde_json::{Map, Value};

/// Counters for one rewrite pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
	/// String leaves replaced with a translated path.
	pub rewritten: usize,
	/// Path-like leaves left unchanged because translation failed.
	pub failed: usize,
}

/// Rebuilds JSON documents with every sending-side path translated.
///
/// Holds no per-document state, so one instance is shared by both pumps.
pub struct Rewriter<P, T> {
	classifier: PathClassifier<P>,
	translator: T,
}

impl<P: FsProbe, T: Translator> Rewriter<P, T> {
	pub fn new(classifier: PathClassifier<P>, translator: T) -> Self {
		Self {
			classifier,
			translator,
		}
	}

	pub fn translator(&self) -> &T {
		&self.translator
	}

	/// Rewrite a document for the given direction.
	pub fn rewrite(&self, value: Value, direction: Direction) -> Value {
		self.rewrite_with_stats(value, direction).0
	}

	/// Rewrite a document, reporting how many leaves were touched.
	///
	/// Traversal is depth-first, left to right, so translator calls happen in
	/// document order.
	pub fn rewrite_with_stats(&self, value: Value, direction: Direction) -> (Value, RewriteStats) {
		let mut stats = RewriteStats::default();
		let value = self.rewrite_value(value, direction, &mut stats);
		(value, stats)
	}

	fn rewrite_value(&self, value: Value, direction: Direction, stats: &mut RewriteStats) -> Value {
		match value {
			Value::Object(map) => {
				let mut rewritten = Map::with_capacity(map.len());
				for (key, child) in map {
					rewritten.insert(key, self.rewrite_value(child, direction, stats));
				}
				Value::Object(rewritten)
			}
			Value::Array(items) => Value::Array(
				items
					.into_iter()
					.map(|child| self.rewrite_value(child, direction, stats))
					.collect(),
			),
			Value::String(s) => Value::String(self.rewrite_string(s, direction, stats)),
			other @ (Value::Null | Value::Bool(_) | Value::Number(_)) => other,
		}
	}

	fn rewrite_string(&self, s: String, direction: Direction, stats: &mut RewriteStats) -> String {
		if !self.classifier.looks_like_path(&s) {
			return s;
		}

		match self.translator.translate(&s, direction.target()) {
			Ok(translated) => {
				tracing::trace!(%direction, from = %s, to = %translated, "rewrote path");
				stats.rewritten += 1;
				translated
			}
			Err(error) => {
				tracing::warn!(%direction, path = %s, %error, "path translation failed, leaving unchanged");
				stats.failed += 1;
				s
			}
		}
	}
}
