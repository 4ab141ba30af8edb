//! Message preparation — derives display-ready [`PreparedMessage`]s.
//!
//! Preparation runs in two steps:
//!
//! 1. [`ParsedPacket::parse`] resolves every object reference of a record
//!    through a [`ResolveFront`] implementation. A record with an
//!    unresolvable reference stops here.
//! 2. [`prepare_packet`] draws an id from the injected [`IdSource`] and
//!    builds the message: directive expansion, counter/timer text, stack
//!    flattening.
//!
//! [`prepare`] runs both. The result depends only on the record and the id
//! drawn, so preparing the same record twice with the same id yields equal
//! messages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::format::{format_arguments, Formatted};
use crate::front::Front;
use crate::record::{Argument, RawRecord, RecordKind};
use crate::resolver::ResolveFront;
use crate::types::{
    format_number, CountPayload, Level, Literal, Severity, SourceLocation, StackFrame,
    TimerPayload,
};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Source of message ids. Ids must be unique within a session; the policy is
/// up to the caller.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

impl<F: FnMut() -> String> IdSource for F {
    fn next_id(&mut self) -> String {
        self()
    }
}

/// `"1"`, `"2"`, `"3"`, …
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        id.to_string()
    }
}

/// Hands out the same id every time, as stub generation does.
#[derive(Debug, Clone)]
pub struct FixedId(pub String);

impl IdSource for FixedId {
    fn next_id(&mut self) -> String {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Parameters and packets
// ---------------------------------------------------------------------------

/// A fully resolved argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parameter {
    Text(String),
    Number(f64),
    Bool(bool),
    Literal(Literal),
    Front(Arc<Front>),
}

impl Parameter {
    /// How the parameter reads inside message text.
    pub fn to_text(&self) -> String {
        match self {
            Parameter::Text(s) => s.clone(),
            Parameter::Number(n) => format_number(*n),
            Parameter::Bool(b) => b.to_string(),
            Parameter::Literal(lit) => lit.to_string(),
            Parameter::Front(front) => front.summary(),
        }
    }

    pub fn as_front(&self) -> Option<&Arc<Front>> {
        match self {
            Parameter::Front(front) => Some(front),
            _ => None,
        }
    }

    fn resolve(argument: &Argument, resolver: &mut impl ResolveFront) -> Result<Parameter> {
        Ok(match argument {
            Argument::Text(s) => Parameter::Text(s.clone()),
            Argument::Number(n) => Parameter::Number(*n),
            Argument::Bool(b) => Parameter::Bool(*b),
            Argument::Literal(lit) => Parameter::Literal(lit.clone()),
            Argument::Reference(reference) => Parameter::Front(resolver.resolve(reference)?),
        })
    }
}

/// A record whose arguments have all been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPacket {
    pub record: Arc<RawRecord>,
    pub arguments: Vec<Parameter>,
}

impl ParsedPacket {
    pub fn parse(record: Arc<RawRecord>, resolver: &mut impl ResolveFront) -> Result<ParsedPacket> {
        let arguments = record
            .arguments
            .iter()
            .map(|argument| Parameter::resolve(argument, resolver))
            .collect::<Result<Vec<_>>>()?;
        Ok(ParsedPacket { record, arguments })
    }

    /// The record's wire packet with every reference replaced by its
    /// serialized front.
    pub fn to_json(&self) -> serde_json::Value {
        let mut packet = self.record.to_packet();
        if let Some(map) = packet.as_object_mut() {
            map.insert(
                "arguments".into(),
                serde_json::to_value(&self.arguments).unwrap_or_default(),
            );
            map.remove("objects");
        }
        packet
    }
}

// ---------------------------------------------------------------------------
// Prepared messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageSource {
    ConsoleApi,
}

/// Canonical, display-ready form of a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedMessage {
    pub id: String,
    pub source: MessageSource,
    pub kind: Level,
    pub severity: Severity,
    pub text: String,
    pub parameters: Vec<Parameter>,
    pub styles: Vec<String>,
    pub location: SourceLocation,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_window_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<CountPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<Vec<StackFrame>>,
}

/// Resolve and prepare one record.
pub fn prepare(
    record: &Arc<RawRecord>,
    ids: &mut impl IdSource,
    resolver: &mut impl ResolveFront,
) -> Result<PreparedMessage> {
    let packet = ParsedPacket::parse(Arc::clone(record), resolver)?;
    Ok(prepare_packet(&packet, ids))
}

/// Build the prepared message for an already parsed packet.
pub fn prepare_packet(packet: &ParsedPacket, ids: &mut impl IdSource) -> PreparedMessage {
    let record = &packet.record;
    let kind = record.level();
    let mut severity = kind.severity();

    let formatted = match &record.kind {
        RecordKind::Count(counter) | RecordKind::CountReset(counter) => {
            if counter.error.is_some() {
                severity = Severity::Warn;
            }
            text_only(counter_text(counter))
        }
        RecordKind::Time(timer) | RecordKind::TimeLog(timer) | RecordKind::TimeEnd(timer)
            if timer.error.is_some() =>
        {
            severity = Severity::Warn;
            text_only(timer_text(kind, timer))
        }
        RecordKind::TimeLog(timer) => {
            let mut extra = packet.arguments.clone();
            if matches!(extra.first(), Some(Parameter::Text(label)) if *label == timer.name) {
                extra.remove(0);
            }
            let mut formatted = Formatted::plain(extra);
            formatted.text = join(timer_text(kind, timer), formatted.text);
            formatted
        }
        RecordKind::Time(timer) | RecordKind::TimeEnd(timer) => text_only(timer_text(kind, timer)),
        RecordKind::Clear => text_only("Console was cleared.".to_string()),
        _ if !record.styles.is_empty() => {
            Formatted::pre_styled(packet.arguments.clone(), record.styles.clone())
        }
        _ if kind.expands_directives() => format_arguments(packet.arguments.clone()),
        _ => Formatted::plain(packet.arguments.clone()),
    };

    let text = match kind {
        Level::Assert if formatted.text.is_empty() => "Assertion failed".to_string(),
        Level::Assert => format!("Assertion failed: {}", formatted.text),
        Level::Trace if formatted.text.is_empty() => "console.trace()".to_string(),
        _ => formatted.text,
    };

    let message = PreparedMessage {
        id: ids.next_id(),
        source: MessageSource::ConsoleApi,
        kind,
        severity,
        text,
        parameters: formatted.parameters,
        styles: formatted.styles,
        location: record.location.clone(),
        timestamp: record.time_stamp,
        inner_window_id: record.inner_window_id,
        counter: record.kind.counter().cloned(),
        timer: record.kind.timer().cloned(),
        stacktrace: record.kind.stacktrace().map(|trace| trace.frames.clone()),
    };
    tracing::debug!(id = %message.id, kind = %message.kind, "message prepared");
    message
}

fn text_only(text: String) -> Formatted {
    Formatted {
        parameters: Vec::new(),
        styles: Vec::new(),
        text,
    }
}

fn join(head: String, tail: String) -> String {
    if tail.is_empty() {
        head
    } else {
        format!("{head} {tail}")
    }
}

fn counter_text(counter: &CountPayload) -> String {
    match counter.error.as_deref() {
        Some("counterDoesntExist") => format!("Counter “{}” doesn’t exist.", counter.label),
        Some("maxCountersExceeded") => "Too many counters on the page.".to_string(),
        Some(other) => format!("{}: {other}", counter.label),
        None => format!("{}: {}", counter.label, counter.count.unwrap_or(0)),
    }
}

fn timer_text(kind: Level, timer: &TimerPayload) -> String {
    let name = &timer.name;
    match timer.error.as_deref() {
        Some("timerAlreadyExists") => return format!("Timer “{name}” already exists."),
        Some("timerDoesntExist") => return format!("Timer “{name}” doesn’t exist."),
        Some("maxTimersExceeded") => return "Too many timers on the page.".to_string(),
        Some(other) => return format!("{name}: {other}"),
        None => {}
    }
    let duration = format_number(timer.duration.unwrap_or(0.0));
    match kind {
        Level::Time => format!("{name}: timer started"),
        Level::TimeEnd => format!("{name}: {duration}ms - timer ended"),
        _ => format!("{name}: {duration}ms"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::PreviewLimits;
    use crate::resolver::FixtureResolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(packet: serde_json::Value) -> Arc<RawRecord> {
        Arc::new(RawRecord::from_packet(packet).unwrap())
    }

    fn prepare_one(record: &Arc<RawRecord>) -> PreparedMessage {
        let mut resolver = FixtureResolver::new(&record.objects, PreviewLimits::default());
        prepare(record, &mut FixedId("1".into()), &mut resolver).unwrap()
    }

    #[test]
    fn counter_is_carried_verbatim() {
        let rec = record(json!({
            "level": "count",
            "arguments": ["bar"],
            "counter": {"count": 7, "label": "bar"}
        }));
        let msg = prepare_one(&rec);
        assert_eq!(msg.kind, Level::Count);
        assert_eq!(msg.counter.as_ref().and_then(|c| c.count), Some(7));
        assert_eq!(msg.text, "bar: 7");
        assert!(msg.parameters.is_empty());
    }

    #[test]
    fn timer_errors_are_warnings() {
        let rec = record(json!({
            "level": "timeEnd",
            "arguments": ["bar"],
            "timer": {"error": "timerDoesntExist", "name": "bar"}
        }));
        let msg = prepare_one(&rec);
        assert_eq!(msg.severity, Severity::Warn);
        assert_eq!(msg.text, "Timer “bar” doesn’t exist.");
    }

    #[test]
    fn time_log_drops_label_and_keeps_extra_arguments() {
        let rec = record(json!({
            "level": "timeLog",
            "arguments": ["bar", "second call"],
            "timer": {"duration": 5, "name": "bar"}
        }));
        let msg = prepare_one(&rec);
        assert_eq!(msg.text, "bar: 5ms second call");
        assert_eq!(msg.parameters, vec![Parameter::Text("second call".into())]);
    }

    #[test]
    fn assert_is_prefixed_and_an_error() {
        let rec = record(json!({"level": "assert", "arguments": ["x is %d", 3]}));
        let msg = prepare_one(&rec);
        assert_eq!(msg.text, "Assertion failed: x is 3");
        assert_eq!(msg.severity, Severity::Error);
    }

    #[test]
    fn table_arguments_are_not_formatted() {
        let rec = record(json!({"level": "table", "arguments": ["%s", "bar"]}));
        let msg = prepare_one(&rec);
        assert_eq!(msg.text, "%s bar");
    }

    #[test]
    fn ids_come_from_the_injected_source() {
        let rec = record(json!({"level": "log", "arguments": ["a"]}));
        let mut ids = SequentialIds::default();
        let mut resolver = FixtureResolver::new(&rec.objects, PreviewLimits::default());
        let first = prepare(&rec, &mut ids, &mut resolver).unwrap();
        let second = prepare(&rec, &mut ids, &mut resolver).unwrap();
        assert_eq!((first.id.as_str(), second.id.as_str()), ("1", "2"));
    }
}
