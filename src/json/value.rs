use crate::error::{BridgeError, Result};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Parse one JSON document.
///
/// Objects keep their key order and numbers keep their exact decimal text,
/// so ids and source positions never drift through a float. A document with
/// a repeated object key is rejected: `Value` cannot hold both entries, and
/// merging them would change the message.
pub fn parse(text: &[u8]) -> Result<Value> {
	serde_json::from_slice::<UniqueKeys>(text)
		.and_then(|UniqueKeys| serde_json::from_slice(text))
		.map_err(|source| BridgeError::MalformedDocument { source })
}

/// Walks a document without building it, failing on the first object that
/// repeats a key.
struct UniqueKeys;

impl<'de> Deserialize<'de> for UniqueKeys {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		deserializer.deserialize_any(UniqueKeysVisitor)
	}
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
	type Value = UniqueKeys;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a JSON value")
	}

	fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_unit<E: de::Error>(self) -> std::result::Result<UniqueKeys, E> {
		Ok(UniqueKeys)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<UniqueKeys, A::Error> {
		while seq.next_element::<UniqueKeys>()?.is_some() {}
		Ok(UniqueKeys)
	}

	// Exact-decimal numbers also arrive here, as a single-entry map.
	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<UniqueKeys, A::Error> {
		let mut seen = HashSet::new();
		while let Some(key) = map.next_key::<String>()? {
			if seen.contains(&key) {
				return Err(de::Error::custom(format_args!("duplicate key `{key}`")));
			}
			map.next_value::<UniqueKeys>()?;
			seen.insert(key);
		}
		Ok(UniqueKeys)
	}
}

/// Serialize a document as compact single-line JSON.
///
/// Total for any `Value`: object keys are always strings.
pub fn serialize(value: &Value) -> String {
	value.to_string()
}
