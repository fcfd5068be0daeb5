use crate::error::Result;
use crate::json::value::parse;
use serde_json::Value;

/// One input line, decided for forwarding.
#[derive(Debug, PartialEq)]
pub enum Line<'a> {
	/// Forwarded byte-for-byte.
	Raw(&'a [u8]),
	/// A JSON-RPC object, candidate for rewriting.
	Message(Value),
}

/// Whether a line is framed as a JSON-RPC message: its first non-space
/// character is `{`. Arrays and scalars are not messages.
pub fn looks_like_message(content: &[u8]) -> bool {
	content.trim_ascii_start().first() == Some(&b'{')
}

/// Classify a line's content (without terminator).
///
/// Returns `MalformedDocument` when the line is framed as a message but does
/// not parse; callers forward such lines unchanged.
pub fn classify(content: &[u8]) -> Result<Line<'_>> {
	if looks_like_message(content) {
		Ok(Line::Message(parse(content)?))
	} else {
		Ok(Line::Raw(content))
	}
}

/// Split a line read with `read_until(b'\n')` into content and terminator.
///
/// The terminator is `\r\n`, `\n`, or empty for a final unterminated line.
pub fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
	if let Some(rest) = line.strip_suffix(b"\r\n") {
		(rest, &line[rest.len()..])
	} else if let Some(rest) = line.strip_suffix(b"\n") {
		(rest, &line[rest.len()..])
	} else {
		(line, &line[line.len()..])
	}
}
