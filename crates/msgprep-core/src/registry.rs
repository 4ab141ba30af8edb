//! Registry — ordered key → [`RawRecord`] store.
//!
//! Insertion order is replay order. Re-inserting a key replaces its record
//! in place: the key keeps the slot of its first insertion. In
//! [`InsertMode::Strict`] re-insertion is an error instead.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertMode {
    /// Duplicate keys silently overwrite, as stub generation tooling does.
    #[default]
    Overwrite,
    /// Duplicate keys fail with [`PipelineError::DuplicateKey`].
    Strict,
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: IndexMap<String, Arc<RawRecord>>,
    mode: InsertMode,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: InsertMode) -> Self {
        Self {
            records: IndexMap::new(),
            mode,
        }
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    /// Store `record` under `key`.
    pub fn put(&mut self, key: impl Into<String>, record: RawRecord) -> Result<()> {
        let key = key.into();
        if self.records.contains_key(&key) {
            match self.mode {
                InsertMode::Strict => return Err(PipelineError::DuplicateKey { key }),
                InsertMode::Overwrite => tracing::debug!(key = %key, "overwriting record"),
            }
        }
        self.records.insert(key, Arc::new(record));
        Ok(())
    }

    /// Parse a wire packet and store it under `key`.
    pub fn ingest(&mut self, key: impl Into<String>, packet: serde_json::Value) -> Result<()> {
        let record = RawRecord::from_packet(packet)?;
        self.put(key, record)
    }

    /// `(key, record)` pairs in insertion order. Each call starts a fresh
    /// pass over the registry.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<RawRecord>)> + Clone + '_ {
        self.records.iter().map(|(key, record)| (key.as_str(), record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.records.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Arc<RawRecord>> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Argument, RecordKind};
    use pretty_assertions::assert_eq;

    fn log(text: &str) -> RawRecord {
        let mut record = RawRecord::new(RecordKind::Log);
        record.arguments.push(Argument::Text(text.to_string()));
        record
    }

    #[test]
    fn overwrite_keeps_first_slot() {
        let mut registry = Registry::new();
        registry.put("a", log("first")).unwrap();
        registry.put("b", log("b")).unwrap();
        registry.put("a", log("final")).unwrap();

        let seen: Vec<(&str, Vec<Argument>)> = registry
            .entries()
            .map(|(key, record)| (key, record.arguments.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("a", vec![Argument::Text("final".into())]),
                ("b", vec![Argument::Text("b".into())]),
            ]
        );
    }

    #[test]
    fn strict_mode_rejects_duplicates() {
        let mut registry = Registry::with_mode(InsertMode::Strict);
        registry.put("a", log("first")).unwrap();
        let err = registry.put("a", log("again")).unwrap_err();
        assert_eq!(err, PipelineError::DuplicateKey { key: "a".into() });
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn entries_can_be_restarted() {
        let mut registry = Registry::new();
        registry.put("x", log("x")).unwrap();
        registry.put("y", log("y")).unwrap();
        let pass = registry.entries();
        let first: Vec<&str> = pass.clone().map(|(k, _)| k).collect();
        let second: Vec<&str> = pass.map(|(k, _)| k).collect();
        assert_eq!(first, second);
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
