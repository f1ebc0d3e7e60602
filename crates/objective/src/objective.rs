//! Core objective trait.
//!
//! This module defines the [`Objective`] trait, the fundamental abstraction for
//! every behavior an agent can pursue. The trait is generic over a context type
//! `C` through which objectives read the world and command their agent; the
//! context is passed into every call so objectives never hold a reference to
//! the agent that owns them.

use std::any::Any;

use crate::core::ObjectiveCore;
use crate::scheduler::SchedulerState;
use crate::status::Status;

/// A behavior an agent can pursue, scored by priority and possibly decomposed
/// into owned sub-objectives.
///
/// # Tick Order
///
/// [`update`](Objective::update) runs once per simulation step on the active
/// objective:
///
/// 1. [`refresh`](Objective::refresh) advances priority-relevant state
///    (timers, target lists)
/// 2. devotion accrues
/// 3. finished children are reaped, then the first child (or every child for
///    concurrent objectives) is updated
/// 4. [`act`](Objective::act) runs only if no child demands control
pub trait Objective<C: ?Sized> {
    fn core(&self) -> &ObjectiveCore<C>;

    fn core_mut(&mut self) -> &mut ObjectiveCore<C>;

    /// Short label for log output.
    fn debug_tag(&self) -> &'static str;

    /// Computes the current priority score.
    ///
    /// Must return `scheduler.order_priority()` exactly when this objective is
    /// the scheduler's current order; otherwise a value bounded by the type's
    /// own policy.
    fn evaluate_priority(&self, ctx: &C, scheduler: &SchedulerState) -> f32;

    /// Performs this objective's own work for one tick.
    fn act(&mut self, ctx: &mut C, scheduler: &SchedulerState, delta_time: f32);

    /// Returns `true` once the goal is reached. Loop objectives return `false`.
    fn is_completed(&mut self, ctx: &mut C) -> bool;

    /// Returns `false` when the objective should be abandoned or replaced.
    fn can_be_completed(&mut self, _ctx: &mut C, _scheduler: &SchedulerState) -> bool {
        !self.core().is_abandoned()
    }

    /// Returns `true` if pursuing both objectives at once would be redundant.
    fn is_duplicate_of(&self, other: &dyn Objective<C>) -> bool;

    /// Clears transient state back to initial conditions.
    fn reset(&mut self, _ctx: &mut C) {}

    /// Called by the scheduler when this objective becomes the active one.
    fn on_selected(&mut self, _ctx: &mut C, _scheduler: &SchedulerState) {}

    /// Hook for per-tick bookkeeping that must run before children.
    fn refresh(&mut self, _ctx: &mut C, _scheduler: &SchedulerState, _delta_time: f32) {}

    fn as_any(&self) -> &dyn Any;

    /// Computes the priority and caches it in the core.
    fn priority(&mut self, ctx: &C, scheduler: &SchedulerState) -> f32 {
        let priority = self.evaluate_priority(ctx, scheduler);
        self.core_mut().cache_priority(priority);
        priority
    }

    /// Checks completion first, then viability.
    fn status(&mut self, ctx: &mut C, scheduler: &SchedulerState) -> Status {
        if !self.core().is_loop() && self.is_completed(ctx) {
            Status::Completed
        } else if !self.can_be_completed(ctx, scheduler) {
            Status::Abandoned
        } else {
            Status::Active
        }
    }

    /// Advances this objective by one tick.
    fn update(&mut self, ctx: &mut C, scheduler: &SchedulerState, delta_time: f32) {
        self.refresh(ctx, scheduler, delta_time);
        self.core_mut().accrue_devotion(delta_time);

        let delegated = self
            .core_mut()
            .sub_objectives_mut()
            .update(ctx, scheduler, delta_time);

        if !delegated {
            self.act(ctx, scheduler, delta_time);
        }
    }
}
