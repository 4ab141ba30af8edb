//! Fixture layouts.
//!
//! Two layouts are accepted:
//!
//! | Layout | Shape |
//! |--------|-------|
//! | map | one JSON object, `{ "key": packet, ... }` |
//! | lines | one `{"key": ..., "packet": ...}` object per line |
//!
//! Key order in the file is registry order. Blank lines in the lines layout
//! are skipped.

use std::fmt;

use msgprep_core::{InsertMode, Registry};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{json, Value};

use crate::FixtureError;

/// Parse fixture text in either layout.
pub fn parse_fixture(text: &str, mode: InsertMode) -> Result<Registry, FixtureError> {
    if is_lines_layout(text) {
        parse_lines(text, mode)
    } else {
        parse_map(text, mode)
    }
}

/// Pretty-printed map layout, in registry order.
pub fn write_fixture(registry: &Registry) -> String {
    let map: serde_json::Map<String, Value> = registry
        .entries()
        .map(|(key, record)| (key.to_string(), record.to_packet()))
        .collect();
    format!("{:#}\n", Value::Object(map))
}

/// Lines layout, one entry per line, in registry order.
pub fn write_fixture_lines(registry: &Registry) -> String {
    registry
        .entries()
        .map(|(key, record)| format!("{}\n", json!({ "key": key, "packet": record.to_packet() })))
        .collect()
}

// ---------------------------------------------------------------------------
// Layout detection
// ---------------------------------------------------------------------------

fn is_lines_layout(text: &str) -> bool {
    let mut values = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match (values.next(), values.next()) {
        (Some(Ok(first)), None) => is_entry(&first),
        (Some(Ok(_)), Some(_)) => true,
        _ => false,
    }
}

fn is_entry(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.len() == 2 && object.get("key").is_some_and(Value::is_string) && object.contains_key("packet")
    })
}

// ---------------------------------------------------------------------------
// Map layout
// ---------------------------------------------------------------------------

/// Object entries in document order, duplicates included.
struct Entries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping keys to packets")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Entries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Value>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn parse_map(text: &str, mode: InsertMode) -> Result<Registry, FixtureError> {
    let Entries(entries) = serde_json::from_str(text).map_err(|source| FixtureError::Json { source })?;
    let mut registry = Registry::with_mode(mode);
    for (key, packet) in entries {
        ingest(&mut registry, key, packet)?;
    }
    Ok(registry)
}

// ---------------------------------------------------------------------------
// Lines layout
// ---------------------------------------------------------------------------

fn parse_lines(text: &str, mode: InsertMode) -> Result<Registry, FixtureError> {
    let mut registry = Registry::with_mode(mode);
    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| FixtureError::JsonLine {
            line: line_no,
            source,
        })?;
        let Value::Object(mut entry) = value else {
            return Err(FixtureError::Entry { line: line_no });
        };
        let (Some(Value::String(key)), Some(packet)) = (entry.remove("key"), entry.remove("packet")) else {
            return Err(FixtureError::Entry { line: line_no });
        };
        ingest(&mut registry, key, packet)?;
    }
    Ok(registry)
}

fn ingest(registry: &mut Registry, key: String, packet: Value) -> Result<(), FixtureError> {
    registry
        .ingest(key.clone(), packet)
        .map_err(|source| FixtureError::Record { key, source })
}
