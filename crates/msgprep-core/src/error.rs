//! Pipeline error type.

use thiserror::Error;

use crate::record::{ActorId, ReferenceType};

/// Errors raised by the ingestion, registry, resolution and preparation
/// stages.
///
/// The type is `Clone` so that a failed single-flight resolution can be
/// handed to every waiter, and so the export surface can keep the error in
/// the slot of the record that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The packet is structurally invalid (missing `level`, missing
    /// `arguments`, unknown level, …). Rejected at ingestion.
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// Strict-mode registry insertion under a key that already exists.
    #[error("duplicate registry key {key:?}")]
    DuplicateKey { key: String },

    /// An argument references an actor that the accompanying object table
    /// does not describe. Fatal for that one record only.
    #[error("unresolvable {type_tag} reference to actor {actor}")]
    UnresolvableReference {
        actor: ActorId,
        type_tag: ReferenceType,
    },

    /// A live grip source failed while fetching an actor's description.
    #[error("grip source unavailable for actor {actor}: {reason}")]
    SourceUnavailable { actor: ActorId, reason: String },
}

impl PipelineError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        PipelineError::MalformedRecord {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
