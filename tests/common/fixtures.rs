//! The bundled console-API corpus and one-call preparation helpers.

use std::sync::Arc;

use msgprep_core::error::Result;
use msgprep_core::{
    prepare, FixedId, FixtureResolver, PreparedMessage, PreviewLimits, RawRecord, Registry,
};

/// The bundled stub corpus.
pub fn stub_registry() -> Registry {
    msgprep_fixtures::console_api_registry().expect("bundled corpus parses")
}

/// One record of the bundled corpus.
pub fn stub(key: &str) -> Arc<RawRecord> {
    let registry = stub_registry();
    let record = registry
        .get(key)
        .unwrap_or_else(|| panic!("no stub under key {key:?}"));
    Arc::clone(record)
}

/// Prepare a record against its own object table with id `"1"`.
pub fn prepare_record(record: &Arc<RawRecord>) -> Result<PreparedMessage> {
    let mut resolver = FixtureResolver::new(&record.objects, PreviewLimits::default());
    prepare(record, &mut FixedId("1".into()), &mut resolver)
}

/// Prepare one record of the bundled corpus.
pub fn prepare_stub(key: &str) -> PreparedMessage {
    prepare_record(&stub(key)).unwrap_or_else(|err| panic!("stub {key:?} failed: {err}"))
}
