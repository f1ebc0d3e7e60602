//! Owned sub-objective pool.
//!
//! Every objective owns its children through a [`SubObjectives`] pool. Children
//! are boxed trait objects owned by exactly one pool; anything else that needs
//! to refer to a child (a target map, a "gear fetch" slot) keeps an
//! [`ObjectiveId`] handle and looks it up here. Removing a child drops it
//! immediately, so a stale handle simply stops resolving.

use crate::core::ObjectiveId;
use crate::objective::Objective;
use crate::scheduler::SchedulerState;
use crate::status::Status;

/// Ordered collection of exclusively owned child objectives.
///
/// # Semantics
///
/// On every [`update`](SubObjectives::update):
/// - children that completed or can no longer be completed are removed first
/// - a sequential pool ticks only its first child, which then **demands
///   control**: the parent's own action is skipped
/// - a concurrent pool ticks every child and lets the parent act as well
pub struct SubObjectives<C: ?Sized> {
    children: Vec<Box<dyn Objective<C>>>,
    concurrent: bool,
}

impl<C: ?Sized> SubObjectives<C> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            concurrent: false,
        }
    }

    #[inline]
    pub fn is_concurrent(&self) -> bool {
        self.concurrent
    }

    pub fn set_concurrent(&mut self, concurrent: bool) {
        self.concurrent = concurrent;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn contains(&self, id: ObjectiveId) -> bool {
        self.children.iter().any(|child| child.core().id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Objective<C>> + '_ {
        self.children.iter().map(|child| &**child)
    }

    pub fn get(&self, id: ObjectiveId) -> Option<&dyn Objective<C>> {
        self.children
            .iter()
            .find(|child| child.core().id() == id)
            .map(|child| &**child)
    }

    pub fn get_mut(&mut self, id: ObjectiveId) -> Option<&mut (dyn Objective<C> + 'static)> {
        self.children
            .iter_mut()
            .find(|child| child.core().id() == id)
            .map(|child| &mut **child)
    }

    /// Adds a child unless an equivalent one is already being pursued.
    ///
    /// Returns the id of the child that now represents this goal: the new
    /// child's id, or the existing duplicate's id (the new child is dropped).
    pub fn add(&mut self, child: Box<dyn Objective<C>>) -> ObjectiveId {
        if let Some(existing) = self
            .children
            .iter()
            .find(|existing| existing.is_duplicate_of(child.as_ref()))
        {
            tracing::trace!(
                "skipping duplicate '{}' objective, keeping {}",
                child.debug_tag(),
                existing.core().id()
            );
            return existing.core().id();
        }

        let id = child.core().id();
        tracing::debug!("adding '{}' objective {}", child.debug_tag(), id);
        self.children.push(child);
        id
    }

    /// Create-if-absent: adds the child built by `make` unless `slot` already
    /// points at a live child in this pool.
    ///
    /// A slot whose child has been removed (completed or abandoned) is
    /// refilled, so a finished goal is retried rather than duplicated.
    /// Returns `true` if a new child was created.
    pub fn try_add<F>(&mut self, slot: &mut Option<ObjectiveId>, make: F) -> bool
    where
        F: FnOnce() -> Box<dyn Objective<C>>,
    {
        if let Some(id) = *slot
            && self.contains(id)
        {
            return false;
        }
        *slot = Some(self.add(make()));
        true
    }

    /// Detaches and returns a child. The caller decides whether to drop it.
    pub fn remove(&mut self, id: ObjectiveId) -> Option<Box<dyn Objective<C>>> {
        let index = self
            .children
            .iter()
            .position(|child| child.core().id() == id)?;
        let child = self.children.remove(index);
        tracing::debug!("removed '{}' objective {}", child.debug_tag(), id);
        Some(child)
    }

    /// Keeps only the children for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&dyn Objective<C>) -> bool,
    {
        self.children.retain(|child| keep(child.as_ref()));
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Removes every child that has completed or can no longer be completed.
    pub fn reap(&mut self, ctx: &mut C, scheduler: &SchedulerState) {
        self.children.retain_mut(|child| match child.status(ctx, scheduler) {
            Status::Active => true,
            status => {
                tracing::debug!(
                    "'{}' objective {} {}",
                    child.debug_tag(),
                    child.core().id(),
                    status.as_str()
                );
                false
            }
        });
    }

    /// Reaps finished children and ticks the remaining ones.
    ///
    /// Returns `true` if a child demands control this tick, in which case the
    /// parent must not act.
    pub fn update(&mut self, ctx: &mut C, scheduler: &SchedulerState, delta_time: f32) -> bool {
        self.reap(ctx, scheduler);

        if self.concurrent {
            for child in &mut self.children {
                child.update(ctx, scheduler, delta_time);
            }
            return false;
        }

        match self.children.first_mut() {
            Some(child) => {
                child.update(ctx, scheduler, delta_time);
                true
            }
            None => false,
        }
    }
}

impl<C: ?Sized> Default for SubObjectives<C> {
    fn default() -> Self {
        Self::new()
    }
}
