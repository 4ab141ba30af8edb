//! Front resolution — replaces [`ObjectReference`]s with shared [`Front`]s.
//!
//! The preparer only sees the [`ResolveFront`] trait. Two implementations
//! live here:
//!
//! - [`FixtureResolver`]: synchronous lookup in an object table (fixture
//!   replay).
//! - [`ResolvedFronts`]: a finished actor → front map, produced by the
//!   asynchronous [`LiveResolver`](crate::live::LiveResolver) before
//!   preparation starts.
//!
//! Both return the identical `Arc<Front>` for repeated references to one
//! actor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{PipelineError, Result};
use crate::front::{Front, PreviewLimits};
use crate::record::{ActorId, ObjectReference, ObjectTable};

/// Capability to turn an object reference into its front.
pub trait ResolveFront {
    fn resolve(&mut self, reference: &ObjectReference) -> Result<Arc<Front>>;
}

impl<R: ResolveFront + ?Sized> ResolveFront for &mut R {
    fn resolve(&mut self, reference: &ObjectReference) -> Result<Arc<Front>> {
        (**self).resolve(reference)
    }
}

/// Resolves references against a fixed object table, creating each front on
/// first use and caching it by actor id.
#[derive(Debug)]
pub struct FixtureResolver<'a> {
    table: &'a ObjectTable,
    limits: PreviewLimits,
    cache: HashMap<ActorId, Arc<Front>>,
}

impl<'a> FixtureResolver<'a> {
    pub fn new(table: &'a ObjectTable, limits: PreviewLimits) -> Self {
        Self {
            table,
            limits,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct fronts created so far.
    pub fn resolved_count(&self) -> usize {
        self.cache.len()
    }
}

impl ResolveFront for FixtureResolver<'_> {
    fn resolve(&mut self, reference: &ObjectReference) -> Result<Arc<Front>> {
        if let Some(front) = self.cache.get(&reference.actor) {
            return Ok(Arc::clone(front));
        }
        let grip = self
            .table
            .get(&reference.actor)
            .filter(|grip| grip.reference_type() == reference.type_tag)
            .ok_or_else(|| unresolvable(reference))?;
        let front = Arc::new(Front::from_grip(grip, &self.limits));
        tracing::debug!(actor = %reference.actor, "front created");
        self.cache
            .insert(reference.actor.clone(), Arc::clone(&front));
        Ok(front)
    }
}

/// Fronts that were resolved ahead of time.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFronts(HashMap<ActorId, Arc<Front>>);

impl ResolvedFronts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, front: Arc<Front>) {
        self.0.insert(front.actor.clone(), front);
    }

    pub fn get(&self, actor: &ActorId) -> Option<&Arc<Front>> {
        self.0.get(actor)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Arc<Front>> for ResolvedFronts {
    fn from_iter<I: IntoIterator<Item = Arc<Front>>>(iter: I) -> Self {
        let mut fronts = ResolvedFronts::new();
        for front in iter {
            fronts.insert(front);
        }
        fronts
    }
}

impl ResolveFront for ResolvedFronts {
    fn resolve(&mut self, reference: &ObjectReference) -> Result<Arc<Front>> {
        self.0
            .get(&reference.actor)
            .filter(|front| front.kind == reference.type_tag)
            .cloned()
            .ok_or_else(|| unresolvable(reference))
    }
}

pub(crate) fn unresolvable(reference: &ObjectReference) -> PipelineError {
    PipelineError::UnresolvableReference {
        actor: reference.actor.clone(),
        type_tag: reference.type_tag,
    }
}
