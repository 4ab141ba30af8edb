//! Ingestion — converts wire packets into [`RawRecord`]s and back.
//!
//! Structural problems (missing `level`, missing `arguments`, unknown level,
//! wrongly typed fields, counter/timer levels without their payload) are
//! rejected here with [`PipelineError::MalformedRecord`]. Nothing downstream
//! attempts partial recovery.
//!
//! Two argument shapes carry producer-side values:
//!
//! - a bare grip: `{"type": "object", "actor": "…", "class": "…", …}`
//! - a front-shaped entry as written by the stub generator:
//!   `{"_grip": {…}, "actorID": "…"}`
//!
//! Both move the grip into the record's object table and leave an
//! [`ObjectReference`] in the argument list. A front-shaped entry without a
//! `_grip` is a dangling reference whose description must come from the
//! packet's optional top-level `objects` table.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};
use crate::grip::Grip;
use crate::record::{
    ActorId, Argument, ObjectReference, ObjectTable, RawRecord, RecordKind, ReferenceType,
    CONSOLE_MESSAGE_RESOURCE,
};
use crate::types::{
    CountPayload, Level, Literal, SourceLocation, StackFrame, TimerPayload, TracePayload,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePacket {
    level: Option<String>,
    arguments: Option<Vec<Value>>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    line_number: Option<u32>,
    #[serde(default)]
    column_number: Option<u32>,
    #[serde(default)]
    source_id: Option<String>,
    #[serde(default)]
    time_stamp: Option<f64>,
    #[serde(default, rename = "innerWindowID")]
    inner_window_id: Option<u64>,
    #[serde(default)]
    counter: Option<CountPayload>,
    #[serde(default)]
    timer: Option<TimerPayload>,
    #[serde(default)]
    stacktrace: Option<Vec<StackFrame>>,
    #[serde(default)]
    styles: Option<Vec<String>>,
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(default)]
    is_already_existing_resource: bool,
    #[serde(default)]
    objects: Option<Vec<Grip>>,
}

impl RawRecord {
    /// Build a record from a wire packet.
    pub fn from_packet(packet: Value) -> Result<RawRecord> {
        let wire: WirePacket = serde_json::from_value(packet)
            .map_err(|e| PipelineError::malformed(format!("invalid packet: {e}")))?;

        let level_name = wire
            .level
            .ok_or_else(|| PipelineError::malformed("missing `level`"))?;
        let level = Level::from_wire(&level_name)
            .ok_or_else(|| PipelineError::malformed(format!("unknown level {level_name:?}")))?;
        let raw_arguments = wire
            .arguments
            .ok_or_else(|| PipelineError::malformed("missing `arguments`"))?;

        let mut objects: ObjectTable = wire.objects.unwrap_or_default().into_iter().collect();
        let arguments = raw_arguments
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_argument(value, index, &mut objects))
            .collect::<Result<Vec<_>>>()?;

        let stacktrace = wire.stacktrace.map(|frames| TracePayload { frames });
        let kind = match level {
            Level::Log => RecordKind::Log,
            Level::Info => RecordKind::Info,
            Level::Warn => RecordKind::Warn,
            Level::Debug => RecordKind::Debug,
            Level::Dir => RecordKind::Dir,
            Level::Dirxml => RecordKind::Dirxml,
            Level::Table => RecordKind::Table,
            Level::Clear => RecordKind::Clear,
            Level::Group => RecordKind::Group,
            Level::GroupCollapsed => RecordKind::GroupCollapsed,
            Level::GroupEnd => RecordKind::GroupEnd,
            Level::Error => RecordKind::Error(stacktrace),
            Level::Assert => RecordKind::Assert(stacktrace),
            Level::Trace => RecordKind::Trace(stacktrace.unwrap_or_default()),
            Level::Count => RecordKind::Count(require_counter(wire.counter, level)?),
            Level::CountReset => RecordKind::CountReset(require_counter(wire.counter, level)?),
            Level::Time => RecordKind::Time(require_timer(wire.timer, level)?),
            Level::TimeLog => RecordKind::TimeLog(require_timer(wire.timer, level)?),
            Level::TimeEnd => RecordKind::TimeEnd(require_timer(wire.timer, level)?),
        };

        let time_stamp = match wire.time_stamp {
            None => DateTime::UNIX_EPOCH,
            Some(ms) => DateTime::from_timestamp_micros((ms * 1000.0).round() as i64)
                .ok_or_else(|| {
                    PipelineError::malformed(format!("timeStamp {ms} is out of range"))
                })?,
        };

        Ok(RawRecord {
            kind,
            arguments,
            location: SourceLocation {
                filename: wire.filename.unwrap_or_default(),
                line_number: wire.line_number.unwrap_or(0),
                column_number: wire.column_number.unwrap_or(0),
                source_id: wire.source_id,
            },
            time_stamp,
            inner_window_id: wire.inner_window_id,
            styles: wire.styles.unwrap_or_default(),
            resource_type: wire
                .resource_type
                .unwrap_or_else(|| CONSOLE_MESSAGE_RESOURCE.to_string()),
            is_already_existing_resource: wire.is_already_existing_resource,
            objects,
        })
    }

    /// Serialize back into the wire shape accepted by [`RawRecord::from_packet`].
    ///
    /// Referenced grips are written inline in bare form; grips nobody
    /// references go to a top-level `objects` list.
    pub fn to_packet(&self) -> Value {
        let mut inlined = Vec::new();
        let arguments: Vec<Value> = self
            .arguments
            .iter()
            .map(|argument| match argument {
                Argument::Text(s) => Value::String(s.clone()),
                Argument::Number(n) => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Argument::Bool(b) => Value::Bool(*b),
                Argument::Literal(lit) => serde_json::to_value(lit).unwrap_or(Value::Null),
                Argument::Reference(reference) => match self.objects.get(&reference.actor) {
                    Some(grip) => {
                        inlined.push(reference.actor.clone());
                        serde_json::to_value(grip).unwrap_or(Value::Null)
                    }
                    None => serde_json::json!({
                        "actorID": reference.actor,
                        "type": reference.type_tag,
                    }),
                },
            })
            .collect();

        let mut packet = Map::new();
        packet.insert("arguments".into(), Value::Array(arguments));
        packet.insert("columnNumber".into(), self.location.column_number.into());
        packet.insert("filename".into(), self.location.filename.clone().into());
        packet.insert("level".into(), self.level().as_str().into());
        packet.insert("lineNumber".into(), self.location.line_number.into());
        packet.insert("timeStamp".into(), time_stamp_ms(&self.time_stamp));
        if let Some(source_id) = &self.location.source_id {
            packet.insert("sourceId".into(), source_id.clone().into());
        }
        if let Some(id) = self.inner_window_id {
            packet.insert("innerWindowID".into(), id.into());
        }
        if let Some(counter) = self.kind.counter() {
            packet.insert("counter".into(), to_value(counter));
        }
        if let Some(timer) = self.kind.timer() {
            packet.insert("timer".into(), to_value(timer));
        }
        if let Some(trace) = self.kind.stacktrace() {
            packet.insert("stacktrace".into(), to_value(trace));
        }
        if !self.styles.is_empty() {
            packet.insert("styles".into(), to_value(&self.styles));
        }
        let extra: Vec<&Grip> = self
            .objects
            .iter()
            .filter(|(actor, _)| !inlined.contains(actor))
            .map(|(_, grip)| grip)
            .collect();
        if !extra.is_empty() {
            packet.insert("objects".into(), to_value(&extra));
        }
        packet.insert("resourceType".into(), self.resource_type.clone().into());
        packet.insert(
            "isAlreadyExistingResource".into(),
            self.is_already_existing_resource.into(),
        );
        Value::Object(packet)
    }
}

/// Milliseconds since the epoch, as an integer unless the record carries
/// sub-millisecond precision.
fn time_stamp_ms(time_stamp: &DateTime<Utc>) -> Value {
    let micros = time_stamp.timestamp_micros();
    if micros % 1000 == 0 {
        Value::from(micros / 1000)
    } else {
        Value::from(micros as f64 / 1000.0)
    }
}

fn to_value<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn require_counter(counter: Option<CountPayload>, level: Level) -> Result<CountPayload> {
    counter.ok_or_else(|| PipelineError::malformed(format!("{level} record without `counter`")))
}

fn require_timer(timer: Option<TimerPayload>, level: Level) -> Result<TimerPayload> {
    timer.ok_or_else(|| PipelineError::malformed(format!("{level} record without `timer`")))
}

fn parse_argument(value: Value, index: usize, objects: &mut ObjectTable) -> Result<Argument> {
    match value {
        Value::String(s) => Ok(Argument::Text(s)),
        Value::Bool(b) => Ok(Argument::Bool(b)),
        Value::Null => Ok(Argument::Literal(Literal::Null)),
        Value::Number(n) => n.as_f64().map(Argument::Number).ok_or_else(|| {
            PipelineError::malformed(format!("argument {index}: number {n} is not representable"))
        }),
        Value::Array(_) => Err(PipelineError::malformed(format!(
            "argument {index}: bare arrays must be sent as object grips"
        ))),
        Value::Object(mut map) => {
            if let Some(grip) = map.remove("_grip") {
                return inline_grip(grip, index, objects);
            }
            if let Some(actor) = map.get("actorID").and_then(Value::as_str) {
                let type_tag = match map.get("type") {
                    Some(tag) => serde_json::from_value::<ReferenceType>(tag.clone())
                        .map_err(|e| PipelineError::malformed(format!("argument {index}: {e}")))?,
                    None => ReferenceType::Object,
                };
                return Ok(Argument::Reference(ObjectReference {
                    actor: ActorId::from(actor),
                    type_tag,
                }));
            }
            match map.get("type").and_then(Value::as_str) {
                Some("object" | "symbol" | "longString") => {
                    inline_grip(Value::Object(map), index, objects)
                }
                Some(_) => serde_json::from_value::<Literal>(Value::Object(map))
                    .map(Argument::Literal)
                    .map_err(|e| PipelineError::malformed(format!("argument {index}: {e}"))),
                None => Err(PipelineError::malformed(format!(
                    "argument {index}: object without a `type` tag"
                ))),
            }
        }
    }
}

fn inline_grip(value: Value, index: usize, objects: &mut ObjectTable) -> Result<Argument> {
    let grip: Grip = serde_json::from_value(value)
        .map_err(|e| PipelineError::malformed(format!("argument {index}: invalid grip: {e}")))?;
    let reference = ObjectReference {
        actor: grip.actor().clone(),
        type_tag: grip.reference_type(),
    };
    objects.insert(grip);
    Ok(Argument::Reference(reference))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn packet(level: &str, arguments: Value) -> Value {
        json!({
            "arguments": arguments,
            "columnNumber": 35,
            "filename": "https://example.com/test-console-api.html",
            "level": level,
            "lineNumber": 1,
            "timeStamp": 1572867483805u64,
            "sourceId": "server0.conn0.child1/source22",
            "innerWindowID": 8589934593u64,
            "resourceType": "console-message",
            "isAlreadyExistingResource": false
        })
    }

    #[test]
    fn plain_strings_become_text_arguments() {
        let record = RawRecord::from_packet(packet("log", json!(["foobar", "test"]))).unwrap();
        assert_eq!(record.level(), Level::Log);
        assert_eq!(
            record.arguments,
            vec![Argument::Text("foobar".into()), Argument::Text("test".into())]
        );
        assert_eq!(record.location.line_number, 1);
        assert_eq!(record.time_stamp.timestamp_millis(), 1572867483805);
        assert_eq!(record.inner_window_id, Some(8589934593));
    }

    #[test]
    fn front_shaped_grips_move_into_the_object_table() {
        let record = RawRecord::from_packet(packet(
            "log",
            json!([{
                "_grip": {
                    "type": "object",
                    "actor": "server0.conn0.process5//obj29",
                    "class": "Object",
                    "ownPropertyLength": 1
                },
                "actorID": "server0.conn0.process5//obj29"
            }]),
        ))
        .unwrap();

        let actor = ActorId::from("server0.conn0.process5//obj29");
        assert_eq!(
            record.arguments,
            vec![Argument::Reference(ObjectReference {
                actor: actor.clone(),
                type_tag: ReferenceType::Object,
            })]
        );
        assert!(record.objects.contains(&actor));
    }

    #[test]
    fn literal_grips_are_recognised() {
        let record = RawRecord::from_packet(packet(
            "log",
            json!([{"type": "undefined"}, {"type": "NaN"}, {"type": "null"}]),
        ))
        .unwrap();
        assert_eq!(
            record.arguments,
            vec![
                Argument::Literal(Literal::Undefined),
                Argument::Literal(Literal::NaN),
                Argument::Literal(Literal::Null),
            ]
        );
    }

    #[test]
    fn missing_level_is_malformed() {
        let mut value = packet("log", json!([]));
        value.as_object_mut().unwrap().remove("level");
        let err = RawRecord::from_packet(value).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedRecord { .. }));
    }

    #[test]
    fn missing_arguments_is_malformed() {
        let mut value = packet("log", json!([]));
        value.as_object_mut().unwrap().remove("arguments");
        let err = RawRecord::from_packet(value).unwrap_err();
        assert_eq!(err, PipelineError::malformed("missing `arguments`"));
    }

    #[test]
    fn count_without_counter_is_malformed() {
        let err = RawRecord::from_packet(packet("count", json!(["bar"]))).unwrap_err();
        assert!(err.to_string().contains("without `counter`"));
    }

    #[test]
    fn trace_without_stacktrace_has_no_frames() {
        let record = RawRecord::from_packet(packet("trace", json!([]))).unwrap();
        assert_eq!(record.kind, RecordKind::Trace(TracePayload::default()));
    }

    #[test]
    fn to_packet_reingests_to_the_same_record() {
        let mut value = packet(
            "timeLog",
            json!([
                "bar",
                {"type": "symbol", "actor": "server0.conn0.process7//symbol46", "name": "foo"}
            ]),
        );
        value
            .as_object_mut()
            .unwrap()
            .insert("timer".into(), json!({"duration": 5, "name": "bar"}));
        let record = RawRecord::from_packet(value).unwrap();
        let again = RawRecord::from_packet(record.to_packet()).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn fractional_time_stamps_survive_the_raw_view() {
        let mut value = packet("log", json!(["x"]));
        value
            .as_object_mut()
            .unwrap()
            .insert("timeStamp".into(), json!(1572867483805.25));
        let record = RawRecord::from_packet(value).unwrap();
        assert_eq!(record.time_stamp.timestamp_micros(), 1572867483805250);
        assert_eq!(record.to_packet()["timeStamp"], json!(1572867483805.25));

        let whole = RawRecord::from_packet(packet("log", json!(["x"]))).unwrap();
        assert_eq!(whole.to_packet()["timeStamp"], json!(1572867483805u64));
    }
}
