//! Bookkeeping shared by every objective.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{ObjectiveError, Result};
use crate::pool::SubObjectives;

/// Process-unique identity of an objective.
///
/// Ids are handles, not references: holding one never keeps the objective
/// alive, and every lookup goes through the owning [`SubObjectives`] pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveId(u64);

impl ObjectiveId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// State every objective carries regardless of its behavior.
///
/// # Fields
///
/// - `priority`: cache of the last computed score
/// - `priority_modifier`: static weighting chosen at construction
/// - `devotion`: slowly-earned static priority, grows while the objective is
///   being updated and is clamped to `0..=100`
/// - `abandoned`: sticky failure flag, never cleared once set
/// - `sub_objectives`: exclusively owned children
pub struct ObjectiveCore<C: ?Sized> {
    id: ObjectiveId,
    priority: f32,
    priority_modifier: f32,
    devotion: f32,
    devotion_rate: f32,
    is_loop: bool,
    abandoned: bool,
    sub_objectives: SubObjectives<C>,
}

impl<C: ?Sized> ObjectiveCore<C> {
    pub const MAX_DEVOTION: f32 = 100.0;

    pub fn new() -> Self {
        Self {
            id: ObjectiveId::next(),
            priority: 0.0,
            priority_modifier: 1.0,
            devotion: 0.0,
            devotion_rate: 0.0,
            is_loop: false,
            abandoned: false,
            sub_objectives: SubObjectives::new(),
        }
    }

    /// Core for an objective that never reports completion.
    pub fn looping() -> Self {
        Self {
            is_loop: true,
            ..Self::new()
        }
    }

    /// Sets the static priority weighting.
    pub fn with_priority_modifier(mut self, priority_modifier: f32) -> Result<Self> {
        if !priority_modifier.is_finite() || priority_modifier < 0.0 {
            return Err(ObjectiveError::InvalidPriorityModifier(priority_modifier));
        }
        self.priority_modifier = priority_modifier;
        Ok(self)
    }

    /// Sets how fast devotion accrues per time unit of updates.
    pub fn with_devotion_rate(mut self, devotion_rate: f32) -> Self {
        self.devotion_rate = devotion_rate.max(0.0);
        self
    }

    #[inline]
    pub fn id(&self) -> ObjectiveId {
        self.id
    }

    #[inline]
    pub fn priority(&self) -> f32 {
        self.priority
    }

    #[inline]
    pub(crate) fn cache_priority(&mut self, priority: f32) {
        self.priority = priority;
    }

    #[inline]
    pub fn priority_modifier(&self) -> f32 {
        self.priority_modifier
    }

    #[inline]
    pub fn devotion(&self) -> f32 {
        self.devotion
    }

    pub fn set_devotion(&mut self, devotion: f32) {
        self.devotion = devotion.clamp(0.0, Self::MAX_DEVOTION);
    }

    /// Grows devotion for `delta_time` units of active pursuit.
    pub fn accrue_devotion(&mut self, delta_time: f32) {
        if self.devotion_rate > 0.0 {
            self.set_devotion(self.devotion + self.devotion_rate * self.priority_modifier * delta_time);
        }
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    #[inline]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
    }

    /// Marks the objective as impossible to complete. Irreversible.
    pub fn abandon(&mut self) {
        if !self.abandoned {
            tracing::debug!("objective {} abandoned", self.id);
        }
        self.abandoned = true;
    }

    #[inline]
    pub fn sub_objectives(&self) -> &SubObjectives<C> {
        &self.sub_objectives
    }

    #[inline]
    pub fn sub_objectives_mut(&mut self) -> &mut SubObjectives<C> {
        &mut self.sub_objectives
    }
}

impl<C: ?Sized> Default for ObjectiveCore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for ObjectiveCore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectiveCore")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("priority_modifier", &self.priority_modifier)
            .field("devotion", &self.devotion)
            .field("is_loop", &self.is_loop)
            .field("abandoned", &self.abandoned)
            .field("sub_objectives", &self.sub_objectives.len())
            .finish()
    }
}
