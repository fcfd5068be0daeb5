use crate::error::{BridgeError, Result};
use crate::json::{Line, classify, serialize, split_terminator};
use crate::paths::{Direction, FsProbe, Translator};
use crate::rewrite::Rewriter;
use std::borrow::Cow;
use std::io::{BufRead, Write};

/// Per-pump counters, reported when the pump ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
	pub lines: usize,
	pub raw: usize,
	pub messages: usize,
	pub malformed: usize,
	pub rewritten: usize,
	pub translation_failures: usize,
}

/// One direction of the proxy: reads lines, rewrites messages, writes lines.
pub struct Pump<'a, P, T> {
	direction: Direction,
	rewriter: &'a Rewriter<P, T>,
}

impl<'a, P: FsProbe, T: Translator> Pump<'a, P, T> {
	pub fn new(direction: Direction, rewriter: &'a Rewriter<P, T>) -> Self {
		Self {
			direction,
			rewriter,
		}
	}

	/// Produce the output bytes for one input line (terminator included).
	///
	/// Raw lines and malformed messages come back borrowed and unchanged.
	pub fn process_line<'l>(&self, line: &'l [u8], stats: &mut PumpStats) -> Cow<'l, [u8]> {
		stats.lines += 1;
		let (content, terminator) = split_terminator(line);

		match classify(content) {
			Ok(Line::Raw(_)) => {
				stats.raw += 1;
				Cow::Borrowed(line)
			}
			Ok(Line::Message(value)) => {
				stats.messages += 1;
				let (value, rewrite) = self.rewriter.rewrite_with_stats(value, self.direction);
				stats.rewritten += rewrite.rewritten;
				stats.translation_failures += rewrite.failed;

				let mut out = serialize(&value).into_bytes();
				out.extend_from_slice(terminator);
				Cow::Owned(out)
			}
			Err(error) => {
				stats.malformed += 1;
				tracing::warn!(
					direction = %self.direction,
					len = content.len(),
					error = %display_chain(&error),
					"malformed JSON-RPC line, forwarding unchanged"
				);
				Cow::Borrowed(line)
			}
		}
	}

	/// Pump lines from `reader` to `writer` until end of input.
	///
	/// Each line is fully rewritten and flushed before the next read. The
	/// writer is dropped on return, which closes it for the reading side.
	pub fn run<R: BufRead, W: Write>(
		&self,
		mut reader: R,
		mut writer: W,
		stats: &mut PumpStats,
	) -> Result<()> {
		let mut buf = Vec::new();

		loop {
			buf.clear();
			let read = reader
				.read_until(b'\n', &mut buf)
				.map_err(|source| self.stream_error(source))?;
			if read == 0 {
				tracing::debug!(direction = %self.direction, "end of input");
				break;
			}

			let out = self.process_line(&buf, stats);
			writer
				.write_all(&out)
				.and_then(|()| writer.flush())
				.map_err(|source| self.stream_error(source))?;
		}

		Ok(())
	}

	fn stream_error(&self, source: std::io::Error) -> BridgeError {
		BridgeError::Stream {
			direction: self.direction,
			source,
		}
	}
}

/// Render an error with its source chain on one line.
pub(crate) fn display_chain(error: &dyn std::error::Error) -> String {
	let mut rendered = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		rendered.push_str(": ");
		rendered.push_str(&cause.to_string());
		source = cause.source();
	}
	rendered
}
