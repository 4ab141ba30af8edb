//! Bundled console-API stub corpus.
//!
//! One packet per console call shape: plain logs, printf directives, `%c`
//! styling, counters, timers, traces, groups and object previews.

use msgprep_core::{InsertMode, Registry};

use crate::layout::parse_fixture;
use crate::FixtureError;

pub const CONSOLE_API: &str = include_str!("../stubs/console_api.json");

/// The stub corpus as a registry, in file order.
pub fn console_api_registry() -> Result<Registry, FixtureError> {
    parse_fixture(CONSOLE_API, InsertMode::Overwrite)
}
