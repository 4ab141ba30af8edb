//! Raw records — a console call exactly as the producer captured it.
//!
//! A [`RawRecord`] is built once by [`RawRecord::from_packet`](crate::ingest)
//! and never mutated afterwards; the registry hands it out behind an `Arc`.
//! Arguments that stand for producer-side values are [`ObjectReference`]s
//! whose descriptions live in the record's [`ObjectTable`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::grip::Grip;
use crate::types::{CountPayload, Level, Literal, SourceLocation, TimerPayload, TracePayload};

// ---------------------------------------------------------------------------
// Actor references
// ---------------------------------------------------------------------------

/// Identifier of a producer-side value within one logging session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        ActorId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        ActorId(id.to_string())
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        ActorId(id)
    }
}

/// What kind of producer-side value a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceType {
    Object,
    Symbol,
    LongString,
}

impl ReferenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceType::Object => "object",
            ReferenceType::Symbol => "symbol",
            ReferenceType::LongString => "longString",
        }
    }
}

impl std::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder in an argument list for an opaque producer-side value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectReference {
    pub actor: ActorId,
    pub type_tag: ReferenceType,
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// One argument of a console call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Text(String),
    Number(f64),
    Bool(bool),
    Literal(Literal),
    Reference(ObjectReference),
}

impl Argument {
    pub fn as_reference(&self) -> Option<&ObjectReference> {
        match self {
            Argument::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Object table
// ---------------------------------------------------------------------------

/// Actor id → grip mapping that accompanies a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTable(IndexMap<ActorId, Grip>);

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a grip under its own actor id, replacing any earlier
    /// description of the same actor.
    pub fn insert(&mut self, grip: Grip) {
        self.0.insert(grip.actor().clone(), grip);
    }

    pub fn get(&self, actor: &ActorId) -> Option<&Grip> {
        self.0.get(actor)
    }

    pub fn contains(&self, actor: &ActorId) -> bool {
        self.0.contains_key(actor)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActorId, &Grip)> {
        self.0.iter()
    }
}

impl FromIterator<Grip> for ObjectTable {
    fn from_iter<I: IntoIterator<Item = Grip>>(iter: I) -> Self {
        let mut table = ObjectTable::new();
        for grip in iter {
            table.insert(grip);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A record's level together with the payload that level carries.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    Log,
    Info,
    Warn,
    Debug,
    Dir,
    Dirxml,
    Table,
    Clear,
    Group,
    GroupCollapsed,
    GroupEnd,
    Error(Option<TracePayload>),
    Assert(Option<TracePayload>),
    Trace(TracePayload),
    Count(CountPayload),
    CountReset(CountPayload),
    Time(TimerPayload),
    TimeLog(TimerPayload),
    TimeEnd(TimerPayload),
}

impl RecordKind {
    pub fn level(&self) -> Level {
        match self {
            RecordKind::Log => Level::Log,
            RecordKind::Info => Level::Info,
            RecordKind::Warn => Level::Warn,
            RecordKind::Debug => Level::Debug,
            RecordKind::Dir => Level::Dir,
            RecordKind::Dirxml => Level::Dirxml,
            RecordKind::Table => Level::Table,
            RecordKind::Clear => Level::Clear,
            RecordKind::Group => Level::Group,
            RecordKind::GroupCollapsed => Level::GroupCollapsed,
            RecordKind::GroupEnd => Level::GroupEnd,
            RecordKind::Error(_) => Level::Error,
            RecordKind::Assert(_) => Level::Assert,
            RecordKind::Trace(_) => Level::Trace,
            RecordKind::Count(_) => Level::Count,
            RecordKind::CountReset(_) => Level::CountReset,
            RecordKind::Time(_) => Level::Time,
            RecordKind::TimeLog(_) => Level::TimeLog,
            RecordKind::TimeEnd(_) => Level::TimeEnd,
        }
    }

    pub fn counter(&self) -> Option<&CountPayload> {
        match self {
            RecordKind::Count(counter) | RecordKind::CountReset(counter) => Some(counter),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<&TimerPayload> {
        match self {
            RecordKind::Time(timer) | RecordKind::TimeLog(timer) | RecordKind::TimeEnd(timer) => {
                Some(timer)
            }
            _ => None,
        }
    }

    pub fn stacktrace(&self) -> Option<&TracePayload> {
        match self {
            RecordKind::Trace(trace) => Some(trace),
            RecordKind::Error(trace) | RecordKind::Assert(trace) => trace.as_ref(),
            _ => None,
        }
    }
}

/// A single console call as captured by the producer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub kind: RecordKind,
    pub arguments: Vec<Argument>,
    pub location: SourceLocation,
    pub time_stamp: DateTime<Utc>,
    pub inner_window_id: Option<u64>,
    /// CSS directives the producer already split out of a `%c` format string,
    /// one per leading argument.
    pub styles: Vec<String>,
    pub resource_type: String,
    pub is_already_existing_resource: bool,
    pub objects: ObjectTable,
}

pub const CONSOLE_MESSAGE_RESOURCE: &str = "console-message";

impl RawRecord {
    /// A record of the given kind with no arguments, logged at the Unix epoch
    /// from an unknown location.
    pub fn new(kind: RecordKind) -> Self {
        RawRecord {
            kind,
            arguments: Vec::new(),
            location: SourceLocation::default(),
            time_stamp: DateTime::UNIX_EPOCH,
            inner_window_id: None,
            styles: Vec::new(),
            resource_type: CONSOLE_MESSAGE_RESOURCE.to_string(),
            is_already_existing_resource: false,
            objects: ObjectTable::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.kind.level()
    }

    /// Every object reference among the arguments, in argument order.
    /// A repeated reference is yielded once per occurrence.
    pub fn references(&self) -> impl Iterator<Item = &ObjectReference> {
        self.arguments.iter().filter_map(Argument::as_reference)
    }
}
