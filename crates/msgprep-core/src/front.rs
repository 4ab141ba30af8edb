//! Fronts — local, display-ready snapshots of producer-side values.
//!
//! A [`Front`] is built from a [`Grip`] once per actor and shared behind an
//! `Arc`. Its [`Preview`] is shallow: nested values are reduced to their
//! class name, and array items, map entries and own properties are capped by
//! [`PreviewLimits`] while the total size the producer reported is kept
//! separately.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::grip::{Grip, GripPreview, ObjectGrip, PropertyDescriptor};
use crate::record::{ActorId, ReferenceType};
use crate::types::{format_number, Literal};

/// Maximum number of children a preview keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLimits {
    #[serde(default = "default_limit")]
    pub max_items: usize,
    #[serde(default = "default_limit")]
    pub max_properties: usize,
    #[serde(default = "default_limit")]
    pub max_entries: usize,
}

/// Items shown per preview when not configured otherwise.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_PREVIEW_LIMIT
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_PREVIEW_LIMIT,
            max_properties: DEFAULT_PREVIEW_LIMIT,
            max_entries: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectFlags {
    pub extensible: bool,
    pub frozen: bool,
    pub sealed: bool,
    pub is_error: bool,
}

/// Resolved local representation of an [`ObjectReference`](crate::record::ObjectReference).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Front {
    pub actor: ActorId,
    pub kind: ReferenceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_property_length: Option<usize>,
    pub flags: ObjectFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_string: Option<String>,
    pub preview: Preview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Preview {
    None,
    Object {
        properties: Vec<PreviewProperty>,
        total: usize,
    },
    ArrayLike {
        items: Vec<PreviewValue>,
        length: usize,
    },
    MapLike {
        entries: Vec<PreviewEntry>,
        size: usize,
    },
    Url {
        url: String,
    },
    Error {
        name: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    Symbol {
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    LongString {
        initial: String,
        length: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewProperty {
    pub name: String,
    pub value: PreviewValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewEntry {
    pub key: PreviewValue,
    pub value: PreviewValue,
}

/// A child value inside a preview. Nested objects are not expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PreviewValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Literal(Literal),
    Object { class: String },
    Symbol { symbol: Option<String> },
    LongString { initial: String, length: usize },
    Getter { getter: bool },
}

impl Front {
    /// Build the front for a grip, capping its preview at `limits`.
    pub fn from_grip(grip: &Grip, limits: &PreviewLimits) -> Front {
        match grip {
            Grip::Object(object) => object_front(object, limits),
            Grip::Symbol(symbol) => Front {
                actor: symbol.actor.clone(),
                kind: ReferenceType::Symbol,
                class_name: None,
                own_property_length: None,
                flags: ObjectFlags::default(),
                display_string: None,
                preview: Preview::Symbol {
                    name: symbol.name.clone(),
                },
            },
            Grip::LongString(long) => Front {
                actor: long.actor.clone(),
                kind: ReferenceType::LongString,
                class_name: None,
                own_property_length: None,
                flags: ObjectFlags::default(),
                display_string: None,
                preview: Preview::LongString {
                    initial: long.initial.clone(),
                    length: long.length,
                },
            },
        }
    }

    pub fn summary(&self) -> String {
        self.to_string()
    }
}

fn object_front(grip: &ObjectGrip, limits: &PreviewLimits) -> Front {
    let preview = match &grip.preview {
        Some(GripPreview::Object {
            own_properties,
            own_properties_length,
        }) => Preview::Object {
            properties: capped_properties(own_properties, limits.max_properties),
            total: own_properties_length
                .or(grip.own_property_length)
                .unwrap_or(own_properties.len()),
        },
        Some(GripPreview::ArrayLike { length, items }) => Preview::ArrayLike {
            items: items
                .iter()
                .take(limits.max_items)
                .map(PreviewValue::from_value)
                .collect(),
            length: *length,
        },
        Some(GripPreview::MapLike { size, entries }) => Preview::MapLike {
            entries: entries
                .iter()
                .take(limits.max_entries)
                .map(|(key, value)| PreviewEntry {
                    key: PreviewValue::from_value(key),
                    value: PreviewValue::from_value(value),
                })
                .collect(),
            size: *size,
        },
        Some(GripPreview::ObjectWithUrl { url }) => Preview::Url { url: url.clone() },
        Some(GripPreview::Error {
            name,
            message,
            stack,
        }) => Preview::Error {
            name: name.clone(),
            message: message.clone(),
            stack: stack.clone(),
        },
        Some(GripPreview::Other) | None => match &grip.own_properties {
            Some(own_properties) => Preview::Object {
                properties: capped_properties(own_properties, limits.max_properties),
                total: own_properties.len(),
            },
            None => Preview::None,
        },
    };

    Front {
        actor: grip.actor.clone(),
        kind: ReferenceType::Object,
        class_name: Some(grip.class.clone()),
        own_property_length: grip.own_property_length,
        flags: ObjectFlags {
            extensible: grip.extensible,
            frozen: grip.frozen,
            sealed: grip.sealed,
            is_error: grip.is_error,
        },
        display_string: grip.display_string.clone(),
        preview,
    }
}

fn capped_properties(
    properties: &indexmap::IndexMap<String, PropertyDescriptor>,
    cap: usize,
) -> Vec<PreviewProperty> {
    properties
        .iter()
        .take(cap)
        .map(|(name, descriptor)| PreviewProperty {
            name: name.clone(),
            value: PreviewValue::from_descriptor(descriptor),
        })
        .collect()
}

impl PreviewValue {
    fn from_descriptor(descriptor: &PropertyDescriptor) -> PreviewValue {
        match (&descriptor.value, &descriptor.get) {
            (Some(value), _) => PreviewValue::from_value(value),
            (None, Some(_)) => PreviewValue::Getter { getter: true },
            (None, None) => PreviewValue::Literal(Literal::Undefined),
        }
    }

    /// Reduce a wire value to a preview child. Grips nested inside a preview
    /// keep only their class (or symbol name / long-string head).
    pub fn from_value(value: &Value) -> PreviewValue {
        match value {
            Value::String(s) => PreviewValue::Text(s.clone()),
            Value::Number(n) => PreviewValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::Bool(b) => PreviewValue::Bool(*b),
            Value::Null => PreviewValue::Literal(Literal::Null),
            Value::Array(_) => PreviewValue::Object {
                class: "Array".to_string(),
            },
            Value::Object(map) => match map.get("type").and_then(Value::as_str) {
                Some("object") => PreviewValue::Object {
                    class: map
                        .get("class")
                        .and_then(Value::as_str)
                        .unwrap_or("Object")
                        .to_string(),
                },
                Some("symbol") => PreviewValue::Symbol {
                    symbol: map.get("name").and_then(Value::as_str).map(str::to_string),
                },
                Some("longString") => PreviewValue::LongString {
                    initial: map
                        .get("initial")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    length: map.get("length").and_then(Value::as_u64).unwrap_or(0) as usize,
                },
                _ => serde_json::from_value::<Literal>(value.clone())
                    .map(PreviewValue::Literal)
                    .unwrap_or(PreviewValue::Literal(Literal::Undefined)),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl std::fmt::Display for PreviewValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewValue::Text(s) => write!(f, "{s:?}"),
            PreviewValue::Number(n) => f.write_str(&format_number(*n)),
            PreviewValue::Bool(b) => write!(f, "{b}"),
            PreviewValue::Literal(lit) => write!(f, "{lit}"),
            PreviewValue::Object { class } => f.write_str(class),
            PreviewValue::Symbol { symbol } => write_symbol(f, symbol.as_deref()),
            PreviewValue::LongString { initial, length } => {
                write!(f, "{:?}", long_string_head(initial, *length))
            }
            PreviewValue::Getter { .. } => f.write_str("Getter"),
        }
    }
}

impl std::fmt::Display for Front {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = self.class_name.as_deref().unwrap_or("Object");
        match &self.preview {
            Preview::Object { properties, total } => {
                let parts: Vec<String> = properties
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.value))
                    .collect();
                write!(f, "{class} ")?;
                write_list(f, '{', &parts, *total > properties.len(), '}')
            }
            Preview::ArrayLike { items, length } => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "{class}({length}) ")?;
                write_list(f, '[', &parts, *length > items.len(), ']')
            }
            Preview::MapLike { entries, size } => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|e| format!("{} → {}", e.key, e.value))
                    .collect();
                write!(f, "{class}({size}) ")?;
                write_list(f, '{', &parts, *size > entries.len(), '}')
            }
            Preview::Url { url } => write!(f, "{class} {url}"),
            Preview::Error { name, message, .. } if message.is_empty() => f.write_str(name),
            Preview::Error { name, message, .. } => write!(f, "{name}: {message}"),
            Preview::Symbol { name } => write_symbol(f, name.as_deref()),
            Preview::LongString { initial, length } => {
                f.write_str(&long_string_head(initial, *length))
            }
            Preview::None => match &self.display_string {
                Some(display) => f.write_str(display),
                None => f.write_str(class),
            },
        }
    }
}

fn write_list(
    f: &mut std::fmt::Formatter<'_>,
    open: char,
    parts: &[String],
    truncated: bool,
    close: char,
) -> std::fmt::Result {
    if parts.is_empty() && !truncated {
        return write!(f, "{open}{close}");
    }
    write!(f, "{open} {}", parts.join(", "))?;
    if truncated {
        if parts.is_empty() {
            f.write_str("…")?;
        } else {
            f.write_str(", …")?;
        }
    }
    write!(f, " {close}")
}

fn write_symbol(f: &mut std::fmt::Formatter<'_>, name: Option<&str>) -> std::fmt::Result {
    write!(f, "Symbol({})", name.unwrap_or_default())
}

fn long_string_head(initial: &str, length: usize) -> String {
    if initial.chars().count() < length {
        format!("{initial}…")
    } else {
        initial.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
