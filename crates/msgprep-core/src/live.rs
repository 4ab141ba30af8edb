//! Live resolution — asynchronous, single-flight front resolution against a
//! producer that answers grip requests.
//!
//! Resolution of one actor id runs exactly once: concurrent callers for the
//! same actor wait on a shared `tokio::sync::OnceCell` and receive the same
//! `Arc<Front>`. Distinct actors resolve concurrently, in no particular
//! order. A failed fetch leaves the cell empty so a later call retries.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::error::{PipelineError, Result};
use crate::front::{Front, PreviewLimits};
use crate::grip::Grip;
use crate::prepare::{prepare_packet, IdSource, ParsedPacket, PreparedMessage};
use crate::record::{ActorId, ObjectReference, ObjectTable, RawRecord};
use crate::resolver::{unresolvable, ResolvedFronts};

/// Something that can describe producer-side actors on request.
///
/// `Ok(None)` means the producer does not know the actor;
/// transport failures should be reported as
/// [`PipelineError::SourceUnavailable`].
pub trait GripSource: Send + Sync {
    fn fetch(&self, actor: &ActorId) -> impl Future<Output = Result<Option<Grip>>> + Send;
}

impl GripSource for ObjectTable {
    fn fetch(&self, actor: &ActorId) -> impl Future<Output = Result<Option<Grip>>> + Send {
        std::future::ready(Ok(self.get(actor).cloned()))
    }
}

impl<S: GripSource> GripSource for Arc<S> {
    fn fetch(&self, actor: &ActorId) -> impl Future<Output = Result<Option<Grip>>> + Send {
        (**self).fetch(actor)
    }
}

type Cell = Arc<OnceCell<Arc<Front>>>;

pub struct LiveResolver<S> {
    source: S,
    limits: PreviewLimits,
    cells: Mutex<HashMap<ActorId, Cell>>,
}

impl<S: GripSource> LiveResolver<S> {
    pub fn new(source: S, limits: PreviewLimits) -> Self {
        Self {
            source,
            limits,
            cells: Mutex::new(HashMap::new()),
        }
    }

    fn cell(&self, actor: &ActorId) -> Cell {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry(actor.clone()).or_default())
    }

    /// Resolve one reference, fetching its grip at most once per actor.
    pub async fn resolve(&self, reference: &ObjectReference) -> Result<Arc<Front>> {
        let cell = self.cell(&reference.actor);
        cell.get_or_try_init(|| async {
            tracing::debug!(actor = %reference.actor, "fetching grip");
            let grip = self
                .source
                .fetch(&reference.actor)
                .await?
                .filter(|grip| grip.reference_type() == reference.type_tag)
                .ok_or_else(|| unresolvable(reference))?;
            Ok::<_, PipelineError>(Arc::new(Front::from_grip(&grip, &self.limits)))
        })
        .await
        .cloned()
    }

    /// Resolve every distinct reference of a record concurrently.
    pub async fn resolve_record(&self, record: &RawRecord) -> Result<ResolvedFronts> {
        let mut seen = HashSet::new();
        let pending = record
            .references()
            .filter(|reference| seen.insert(&reference.actor))
            .map(|reference| self.resolve(reference));
        let fronts = futures::future::try_join_all(pending).await?;
        Ok(fronts.into_iter().collect())
    }

    /// Number of actors whose front has been created.
    pub fn cached_count(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}

/// Resolve a record's references through `resolver`, then parse the packet.
pub async fn parse_packet_live<S: GripSource>(
    record: Arc<RawRecord>,
    resolver: &LiveResolver<S>,
) -> Result<ParsedPacket> {
    let mut fronts = resolver.resolve_record(&record).await?;
    ParsedPacket::parse(record, &mut fronts)
}

/// [`prepare`](crate::prepare::prepare) for a live session.
pub async fn prepare_live<S: GripSource>(
    record: Arc<RawRecord>,
    ids: &mut impl IdSource,
    resolver: &LiveResolver<S>,
) -> Result<PreparedMessage> {
    let packet = parse_packet_live(record, resolver).await?;
    Ok(prepare_packet(&packet, ids))
}
