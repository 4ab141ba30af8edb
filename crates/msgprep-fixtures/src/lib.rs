//! msgprep-fixtures — fixture sources and layouts for msgprep.
//!
//! A fixture is a keyed set of console-API wire packets. Each source reads
//! the fixture text asynchronously; [`layout::parse_fixture`] turns that text
//! into a [`msgprep_core::Registry`].
//!
//! ```text
//! FileSource ──┐
//!              ├──► text ──► parse_fixture ──► Registry
//! StdinSource ─┘
//! ```

use std::future::Future;

use msgprep_core::{InsertMode, Registry};

pub mod error;
pub mod file;
pub mod layout;
pub mod stdin;
pub mod stubs;

pub use error::FixtureError;
pub use file::FileSource;
pub use layout::{parse_fixture, write_fixture, write_fixture_lines};
pub use stdin::StdinSource;
pub use stubs::{console_api_registry, CONSOLE_API};

/// Trait implemented by each fixture source.
pub trait FixtureSource: Send {
    /// Read the whole fixture text.
    fn read(&mut self) -> impl Future<Output = Result<String, FixtureError>> + Send;

    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;
}

/// Either source, chosen from a command-line argument.
#[derive(Debug)]
pub enum AnySource {
    File(FileSource),
    Stdin(StdinSource),
}

impl AnySource {
    /// `-` selects stdin; anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            AnySource::Stdin(StdinSource::new())
        } else {
            AnySource::File(FileSource::new(arg))
        }
    }
}

impl FixtureSource for AnySource {
    async fn read(&mut self) -> Result<String, FixtureError> {
        match self {
            AnySource::File(source) => source.read().await,
            AnySource::Stdin(source) => source.read().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnySource::File(source) => source.describe(),
            AnySource::Stdin(source) => source.describe(),
        }
    }
}

/// Read `source` and parse it into a registry.
pub async fn load(source: &mut impl FixtureSource, mode: InsertMode) -> Result<Registry, FixtureError> {
    let text = source.read().await?;
    let registry = parse_fixture(&text, mode)?;
    tracing::debug!(
        origin = %source.describe(),
        records = registry.len(),
        "fixture loaded"
    );
    Ok(registry)
}
