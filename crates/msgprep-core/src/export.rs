//! Export surface — three read-only views over a populated registry.
//!
//! | View | Contents |
//! |------|----------|
//! | raw | the records as stored |
//! | packets | records with every reference resolved to a front |
//! | messages | prepared messages |
//!
//! All three are keyed by exactly the registry's key set, in registry order.
//! A record that fails resolution keeps its slot: [`Exported::packet`] and
//! [`Exported::message`] report it as absent and [`Exported::failure`] holds
//! the error.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::error::PipelineError;
use crate::front::PreviewLimits;
use crate::live::{parse_packet_live, GripSource, LiveResolver};
use crate::prepare::{prepare_packet, IdSource, ParsedPacket, PreparedMessage};
use crate::record::RawRecord;
use crate::registry::Registry;
use crate::resolver::FixtureResolver;

type Slot<T> = Result<T, PipelineError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Raw,
    Packets,
    Messages,
}

#[derive(Debug, Clone, Default)]
pub struct Exported {
    raw: IndexMap<String, Arc<RawRecord>>,
    packets: IndexMap<String, Slot<ParsedPacket>>,
    messages: IndexMap<String, Slot<PreparedMessage>>,
}

/// Resolve every record against its own object table and prepare it.
pub fn export(registry: &Registry, ids: &mut impl IdSource, limits: &PreviewLimits) -> Exported {
    let mut exported = Exported::default();
    for (key, record) in registry.entries() {
        let mut resolver = FixtureResolver::new(&record.objects, *limits);
        let packet = ParsedPacket::parse(Arc::clone(record), &mut resolver);
        exported.insert(key, record, packet, ids);
    }
    exported
}

/// [`export`] with references resolved through a live grip source.
pub async fn export_live<S: GripSource>(
    registry: &Registry,
    ids: &mut impl IdSource,
    resolver: &LiveResolver<S>,
) -> Exported {
    let mut exported = Exported::default();
    for (key, record) in registry.entries() {
        let packet = parse_packet_live(Arc::clone(record), resolver).await;
        exported.insert(key, record, packet, ids);
    }
    exported
}

impl Exported {
    fn insert(
        &mut self,
        key: &str,
        record: &Arc<RawRecord>,
        packet: Slot<ParsedPacket>,
        ids: &mut impl IdSource,
    ) {
        let message = match &packet {
            Ok(packet) => Ok(prepare_packet(packet, ids)),
            Err(err) => {
                tracing::warn!(key, error = %err, "record left out of the prepared view");
                Err(err.clone())
            }
        };
        self.raw.insert(key.to_string(), Arc::clone(record));
        self.packets.insert(key.to_string(), packet);
        self.messages.insert(key.to_string(), message);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.raw.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<&Arc<RawRecord>> {
        self.raw.get(key)
    }

    pub fn packet(&self, key: &str) -> Option<&ParsedPacket> {
        self.packets.get(key)?.as_ref().ok()
    }

    pub fn message(&self, key: &str) -> Option<&PreparedMessage> {
        self.messages.get(key)?.as_ref().ok()
    }

    pub fn failure(&self, key: &str) -> Option<&PipelineError> {
        self.messages.get(key)?.as_ref().err()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PipelineError)> + '_ {
        self.messages
            .iter()
            .filter_map(|(key, slot)| slot.as_ref().err().map(|err| (key.as_str(), err)))
    }

    pub fn messages(&self) -> impl Iterator<Item = (&str, &PreparedMessage)> + '_ {
        self.messages
            .iter()
            .filter_map(|(key, slot)| slot.as_ref().ok().map(|msg| (key.as_str(), msg)))
    }

    /// Whether the three views are keyed identically and in the same order.
    pub fn views_aligned(&self) -> bool {
        self.raw.keys().eq(self.packets.keys()) && self.raw.keys().eq(self.messages.keys())
    }

    /// One view as a JSON object keyed like the registry. Failed slots hold
    /// `{"error": "…"}`.
    pub fn to_json(&self, view: View) -> Value {
        let map: serde_json::Map<String, Value> = self
            .raw
            .iter()
            .map(|(key, record)| {
                let value = match view {
                    View::Raw => record.to_packet(),
                    View::Packets => slot_json(self.packets.get(key), ParsedPacket::to_json),
                    View::Messages => slot_json(self.messages.get(key), |msg| {
                        serde_json::to_value(msg).unwrap_or_default()
                    }),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

fn slot_json<T>(slot: Option<&Slot<T>>, to_json: impl Fn(&T) -> Value) -> Value {
    match slot {
        Some(Ok(value)) => to_json(value),
        Some(Err(err)) => json!({ "error": err.to_string() }),
        None => Value::Null,
    }
}
