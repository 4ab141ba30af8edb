//! msgprep-core — console message preparation core library.
//!
//! This crate exposes the pipeline stages as public modules, plus the shared
//! types used across all stages.
//!
//! # Architecture
//!
//! ```text
//! packet ──► ingest ──► Registry ──► resolver ──► prepare ──► Exported
//!                           │            ▲                      │
//!                           │      FixtureResolver              │
//!                           │      LiveResolver (async)         │
//!                           └──────────── raw view ◄────────────┘
//! ```
//!
//! The synchronous pipeline runs on the caller's thread with no shared
//! state; the registry is passed by reference to every stage. Only the live
//! resolver is async, and it is the only piece that may be shared between
//! tasks.

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod front;
pub mod grip;
pub mod ingest;
pub mod live;
pub mod prepare;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod types;

pub use error::PipelineError;
pub use export::{export, export_live, Exported, View};
pub use front::{Front, Preview, PreviewLimits};
pub use live::{prepare_live, GripSource, LiveResolver};
pub use prepare::{
    prepare, prepare_packet, FixedId, IdSource, Parameter, ParsedPacket, PreparedMessage,
    SequentialIds,
};
pub use record::{ActorId, Argument, ObjectReference, ObjectTable, RawRecord, RecordKind, ReferenceType};
pub use registry::{InsertMode, Registry};
pub use resolver::{FixtureResolver, ResolveFront, ResolvedFronts};
pub use types::{Level, Severity};
