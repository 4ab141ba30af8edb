//! Grips — the producer's wire description of a value that lives on the
//! producer side (an object, a symbol, a long string).
//!
//! Grips are what a record's object table maps actor ids to. They are kept
//! close to the wire shape; [`crate::front`] turns them into capped,
//! display-ready [`Front`](crate::front::Front)s.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{ActorId, ReferenceType};

/// A typed grip, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Grip {
    #[serde(rename = "object")]
    Object(ObjectGrip),
    #[serde(rename = "symbol")]
    Symbol(SymbolGrip),
    #[serde(rename = "longString")]
    LongString(LongStringGrip),
}

impl Grip {
    pub fn actor(&self) -> &ActorId {
        match self {
            Grip::Object(g) => &g.actor,
            Grip::Symbol(g) => &g.actor,
            Grip::LongString(g) => &g.actor,
        }
    }

    pub fn reference_type(&self) -> ReferenceType {
        match self {
            Grip::Object(_) => ReferenceType::Object,
            Grip::Symbol(_) => ReferenceType::Symbol,
            Grip::LongString(_) => ReferenceType::LongString,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGrip {
    pub actor: ActorId,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own_property_length: Option<usize>,
    #[serde(default = "default_extensible")]
    pub extensible: bool,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub sealed: bool,
    #[serde(default)]
    pub is_error: bool,
    /// Pre-rendered form for values such as regular expressions and dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<GripPreview>,
    /// Full property table, sent instead of a preview for `console.table`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub own_properties: Option<IndexMap<String, PropertyDescriptor>>,
}

fn default_class() -> String {
    "Object".to_string()
}

fn default_extensible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolGrip {
    pub actor: ActorId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongStringGrip {
    pub actor: ActorId,
    pub initial: String,
    pub length: usize,
}

/// The producer's shallow preview of an object grip, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GripPreview {
    #[serde(rename_all = "camelCase")]
    Object {
        #[serde(default)]
        own_properties: IndexMap<String, PropertyDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        own_properties_length: Option<usize>,
    },
    ArrayLike {
        #[serde(default)]
        length: usize,
        #[serde(default)]
        items: Vec<Value>,
    },
    MapLike {
        #[serde(default)]
        size: usize,
        #[serde(default)]
        entries: Vec<(Value, Value)>,
    },
    #[serde(rename = "ObjectWithURL")]
    ObjectWithUrl {
        #[serde(default)]
        url: String,
    },
    Error {
        #[serde(default)]
        name: String,
        #[serde(default)]
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stack: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Value>,
    #[serde(default)]
    pub configurable: bool,
    #[serde(default)]
    pub enumerable: bool,
    #[serde(default)]
    pub writable: bool,
}
