//! Per-call resolution context.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::format::FormatHints;

/// The game entity a resolution concerns.
///
/// Implemented by host entity handles (players, worlds, parties).
/// Providers that know the concrete entity type recover it through
/// [`Subject::as_any`]; the engine itself only reads the identity, which
/// keys cached results.
pub trait Subject: Send + Sync {
    /// Stable identity for this entity (e.g. a session-unique player id).
    fn identity(&self) -> u64;

    /// Downcast hook for providers bound to a concrete entity type.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable name, when the entity has one.
    fn display_name(&self) -> Option<&str> {
        None
    }
}

/// A read-only view of the caller's game state for one resolution call.
///
/// The context borrows its subject, so it cannot outlive the call that
/// created it — game-state handles are never owned here and never dangle
/// across game ticks. One instance per call; never shared across threads.
///
/// # Example
///
/// ```
/// use tagfill::{FormatHints, ResolutionContext};
///
/// let ctx = ResolutionContext::detached()
///     .with_hints(FormatHints::new().with_group_separator(','));
/// assert!(ctx.subject().is_none());
/// ```
pub struct ResolutionContext<'a> {
    subject: Option<&'a dyn Subject>,
    hints: FormatHints,
}

impl<'a> ResolutionContext<'a> {
    /// A context with no subject, for non-entity-scoped templates.
    pub fn detached() -> Self {
        Self {
            subject: None,
            hints: FormatHints::default(),
        }
    }

    /// A context scoped to a subject entity.
    pub fn for_subject(subject: &'a dyn Subject) -> Self {
        Self {
            subject: Some(subject),
            hints: FormatHints::default(),
        }
    }

    /// Attach formatting hints.
    pub fn with_hints(mut self, hints: FormatHints) -> Self {
        self.hints = hints;
        self
    }

    /// The subject entity, if any.
    pub fn subject(&self) -> Option<&dyn Subject> {
        self.subject
    }

    /// Downcast the subject to a concrete entity type.
    pub fn subject_as<T: 'static>(&self) -> Option<&T> {
        self.subject?.as_any().downcast_ref()
    }

    /// The formatting hints for this call.
    pub fn hints(&self) -> &FormatHints {
        &self.hints
    }

    /// Identity of this context for result caching: subject identity plus
    /// formatting hints, so hint changes never surface stale renderings.
    pub(crate) fn cache_identity(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match self.subject {
            Some(subject) => hasher.write_u64(subject.identity()),
            None => hasher.write_u64(u64::MAX),
        }
        self.hints.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for ResolutionContext<'_> {
    fn default() -> Self {
        Self::detached()
    }
}
