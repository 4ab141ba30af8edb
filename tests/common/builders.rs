//! Test builders — ergonomic constructors for wire packets, grips and
//! registries.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use std::sync::Arc;

use msgprep_core::{RawRecord, Registry};
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// PacketBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for console-API wire packets.
///
/// # Example
///
/// ```rust
/// let packet = PacketBuilder::new("log")
///     .arg("myobject")
///     .object_arg(object_grip("obj1", &[("red", "redValue")]))
///     .build();
/// ```
pub struct PacketBuilder {
    fields: Map<String, Value>,
    arguments: Vec<Value>,
    stacktrace: Vec<Value>,
}

impl PacketBuilder {
    pub fn new(level: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("level".into(), level.into());
        fields.insert("filename".into(), "https://example.com/test.html".into());
        fields.insert("lineNumber".into(), 1.into());
        fields.insert("columnNumber".into(), 27.into());
        fields.insert("timeStamp".into(), 1_700_000_000_000u64.into());
        Self {
            fields,
            arguments: Vec::new(),
            stacktrace: Vec::new(),
        }
    }

    pub fn log() -> Self {
        Self::new("log")
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.arguments.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.arguments.extend(values.into_iter().map(Into::into));
        self
    }

    /// A front-shaped argument carrying its grip inline.
    pub fn object_arg(mut self, grip: Value) -> Self {
        let actor = grip["actor"].clone();
        self.arguments.push(json!({ "_grip": grip, "actorID": actor }));
        self
    }

    /// A reference whose grip is not in the packet.
    pub fn dangling_arg(mut self, actor: &str) -> Self {
        self.arguments.push(json!({ "actorID": actor }));
        self
    }

    pub fn counter(self, label: &str, count: u64) -> Self {
        self.field("counter", json!({ "label": label, "count": count }))
    }

    pub fn timer(self, name: &str, duration: f64) -> Self {
        self.field("timer", json!({ "name": name, "duration": duration }))
    }

    pub fn styles(self, styles: &[&str]) -> Self {
        self.field("styles", json!(styles))
    }

    pub fn frame(mut self, function: &str, line: u32) -> Self {
        self.stacktrace.push(json!({
            "filename": "https://example.com/test.html",
            "functionName": function,
            "lineNumber": line,
            "columnNumber": 1
        }));
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fields.remove(key);
        self
    }

    pub fn build(self) -> Value {
        let mut fields = self.fields;
        fields.insert("arguments".into(), Value::Array(self.arguments));
        if !self.stacktrace.is_empty() {
            fields.insert("stacktrace".into(), Value::Array(self.stacktrace));
        }
        Value::Object(fields)
    }

    pub fn record(self) -> Arc<RawRecord> {
        Arc::new(RawRecord::from_packet(self.build()).expect("builder produced a valid packet"))
    }
}

// ---------------------------------------------------------------------------
// Grips
// ---------------------------------------------------------------------------

/// A plain object grip with an `Object` preview of string properties.
pub fn object_grip(actor: &str, properties: &[(&str, &str)]) -> Value {
    let own: Map<String, Value> = properties
        .iter()
        .map(|(name, value)| ((*name).to_string(), json!({ "value": value, "enumerable": true })))
        .collect();
    json!({
        "type": "object",
        "actor": actor,
        "class": "Object",
        "ownPropertyLength": properties.len(),
        "preview": {
            "kind": "Object",
            "ownProperties": own,
            "ownPropertiesLength": properties.len()
        }
    })
}

/// An `Array` grip with an `ArrayLike` preview.
pub fn array_grip(actor: &str, items: &[&str]) -> Value {
    json!({
        "type": "object",
        "actor": actor,
        "class": "Array",
        "ownPropertyLength": items.len() + 1,
        "preview": { "kind": "ArrayLike", "length": items.len(), "items": items }
    })
}

pub fn symbol_grip(actor: &str, name: &str) -> Value {
    json!({ "type": "symbol", "actor": actor, "name": name })
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// An overwrite-mode registry holding `entries` in order.
pub fn registry_of(entries: Vec<(&str, Value)>) -> Registry {
    let mut registry = Registry::new();
    for (key, packet) in entries {
        registry.ingest(key, packet).expect("valid packet");
    }
    registry
}
