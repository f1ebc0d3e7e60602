//! Recurring multi-target objectives.
//!
//! A [`RecurringObjective`] never completes. It periodically asks its
//! [`TargetSource`] which targets deserve attention, keeps exactly one child
//! objective per live target, and backs off from targets whose child turned out
//! to be impossible by putting them on an ignore list until the list is
//! cleared.
//!
//! # Per-tick Refresh
//!
//! 1. Ignore-list clearing (only when `ignore_list_clear_interval > 0`)
//! 2. Periodic target discovery every `target_update_interval`
//! 3. Non-viable children put their target on the ignore list and force a
//!    discovery on the next tick; children of vanished targets are detached
//! 4. Children of targets that left the candidate list are detached, and map
//!    entries whose child has left the pool are dropped
//! 5. With no children left but live targets remaining, children are recreated

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::core::{ObjectiveCore, ObjectiveId};
use crate::error::{ObjectiveError, Result, check_interval};
use crate::objective::Objective;
use crate::priority;
use crate::scheduler::SchedulerState;

/// Domain hooks that specialize a [`RecurringObjective`].
pub trait TargetSource<C: ?Sized> {
    type Target: Clone + Eq + Hash + fmt::Debug;

    fn debug_tag(&self) -> &'static str;

    /// Every possible target, relevant or not.
    fn candidates(&self, ctx: &C) -> Vec<Self::Target>;

    /// Returns `true` if the candidate currently needs attention.
    fn filter(&self, target: &Self::Target, ctx: &C) -> bool;

    /// Domain value of the live targets as a whole. May exceed 100.
    fn target_value(&self, targets: &[Self::Target], ctx: &C) -> f32;

    /// Builds the child objective that handles one target.
    fn build_objective(&self, target: &Self::Target, ctx: &C) -> Box<dyn Objective<C>>;

    /// Returns `false` when the objective cannot apply at all (e.g. the agent
    /// is not aboard a vessel). Such an objective scores zero.
    fn is_applicable(&self, _ctx: &C) -> bool {
        true
    }
}

/// Timing configuration for a [`RecurringObjective`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecurringConfig {
    /// How often the ignore list is cleared. `0` keeps ignored targets until
    /// an explicit reset.
    pub ignore_list_clear_interval: f32,

    /// How often targets are rediscovered.
    pub target_update_interval: f32,
}

impl RecurringConfig {
    pub const DEFAULT_IGNORE_LIST_CLEAR_INTERVAL: f32 = 0.0;
    pub const DEFAULT_TARGET_UPDATE_INTERVAL: f32 = 2.0;

    pub fn new() -> Self {
        Self {
            ignore_list_clear_interval: Self::DEFAULT_IGNORE_LIST_CLEAR_INTERVAL,
            target_update_interval: Self::DEFAULT_TARGET_UPDATE_INTERVAL,
        }
    }

    pub fn with_ignore_list_clear_interval(mut self, interval: f32) -> Self {
        self.ignore_list_clear_interval = interval;
        self
    }

    pub fn with_target_update_interval(mut self, interval: f32) -> Self {
        self.target_update_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_interval("ignore_list_clear_interval", self.ignore_list_clear_interval)?;
        let update = check_interval("target_update_interval", self.target_update_interval)?;
        if update == 0.0 {
            return Err(ObjectiveError::ZeroUpdateInterval(update));
        }
        Ok(())
    }
}

impl Default for RecurringConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Never-completing composite keeping one child per live target.
pub struct RecurringObjective<C: ?Sized, S: TargetSource<C>> {
    core: ObjectiveCore<C>,
    source: S,
    config: RecurringConfig,
    targets: Vec<S::Target>,
    objectives: HashMap<S::Target, ObjectiveId>,
    ignored: HashSet<S::Target>,
    ignore_timer: f32,
    target_timer: f32,
}

impl<C, S> RecurringObjective<C, S>
where
    C: ?Sized,
    S: TargetSource<C>,
{
    /// Creates the objective and runs an initial discovery pass.
    pub fn new(source: S, config: RecurringConfig, ctx: &C) -> Result<Self> {
        Self::with_core(source, config, ObjectiveCore::looping(), ctx)
    }

    /// Like [`new`](Self::new), with a pre-configured core (priority modifier,
    /// devotion rate).
    pub fn with_core(source: S, config: RecurringConfig, core: ObjectiveCore<C>, ctx: &C) -> Result<Self> {
        config.validate()?;
        let mut objective = Self {
            core,
            source,
            config,
            targets: Vec::new(),
            objectives: HashMap::new(),
            ignored: HashSet::new(),
            ignore_timer: 0.0,
            target_timer: 0.0,
        };
        objective.restart(ctx);
        Ok(objective)
    }

    /// Live targets in discovery order.
    pub fn targets(&self) -> &[S::Target] {
        &self.targets
    }

    pub fn is_ignored(&self, target: &S::Target) -> bool {
        self.ignored.contains(target)
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored.len()
    }

    /// Handle of the child pursuing `target`, if any.
    pub fn objective_for(&self, target: &S::Target) -> Option<ObjectiveId> {
        self.objectives.get(target).copied()
    }

    /// Targets that currently have a child.
    pub fn tracked_targets(&self) -> impl Iterator<Item = &S::Target> + '_ {
        self.objectives.keys()
    }

    /// Puts a target on the ignore list and drops it from the live set at the
    /// next discovery.
    pub fn ignore(&mut self, target: S::Target) {
        tracing::debug!("[{}] ignoring target {:?}", self.source.debug_tag(), target);
        self.ignored.insert(target);
        self.target_timer = self.config.target_update_interval;
    }

    /// Clears the ignore list and rediscovers targets immediately.
    fn restart(&mut self, ctx: &C) {
        self.ignored.clear();
        self.ignore_timer = 0.0;
        self.target_timer = 0.0;
        self.rediscover(ctx);
    }

    /// Rebuilds the live target list and aligns children with it.
    ///
    /// Candidates are kept in enumeration order, first occurrence wins, and
    /// ignored or filtered-out candidates are skipped. Afterwards the target
    /// map holds exactly one entry per live target.
    pub fn rediscover(&mut self, ctx: &C) {
        self.targets.clear();
        for candidate in self.source.candidates(ctx) {
            if !self.source.filter(&candidate, ctx) {
                continue;
            }
            if self.ignored.contains(&candidate) || self.targets.contains(&candidate) {
                continue;
            }
            self.targets.push(candidate);
        }

        self.retire_stale_objectives();
        self.create_objectives(ctx);

        tracing::trace!(
            "[{}] discovered {} target(s), {} ignored",
            self.source.debug_tag(),
            self.targets.len(),
            self.ignored.len()
        );
    }

    /// Detaches children of targets that are no longer live and forgets
    /// entries whose child has already left the pool.
    fn retire_stale_objectives(&mut self) {
        let targets = &self.targets;
        let pool = self.core.sub_objectives_mut();
        self.objectives.retain(|target, id| {
            if !targets.contains(target) {
                pool.remove(*id);
                return false;
            }
            pool.contains(*id)
        });
    }

    fn create_objectives(&mut self, ctx: &C) {
        for target in &self.targets {
            if self.objectives.contains_key(target) {
                continue;
            }
            let objective = self.source.build_objective(target, ctx);
            let id = self.core.sub_objectives_mut().add(objective);
            self.objectives.insert(target.clone(), id);
        }
    }

    /// Detaches children whose target is no longer a candidate and drops map
    /// entries whose child is no longer owned by the pool.
    fn reconcile(&mut self, ctx: &C) {
        let candidates = self.source.candidates(ctx);
        let tag = self.source.debug_tag();
        let pool = self.core.sub_objectives_mut();
        self.objectives.retain(|target, id| {
            if !candidates.contains(target) {
                tracing::debug!("[{}] target {:?} is gone, dropping its objective", tag, target);
                pool.remove(*id);
                return false;
            }
            pool.contains(*id)
        });
        self.targets.retain(|target| candidates.contains(target));
    }
}

impl<C, S> Objective<C> for RecurringObjective<C, S>
where
    C: ?Sized + 'static,
    S: TargetSource<C> + 'static,
{
    fn core(&self) -> &ObjectiveCore<C> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectiveCore<C> {
        &mut self.core
    }

    fn debug_tag(&self) -> &'static str {
        self.source.debug_tag()
    }

    fn evaluate_priority(&self, ctx: &C, scheduler: &SchedulerState) -> f32 {
        if !self.source.is_applicable(ctx) || self.targets.is_empty() {
            return 0.0;
        }
        let Some(target_value) = priority::above_noise_floor(self.source.target_value(&self.targets, ctx)) else {
            return 0.0;
        };
        if scheduler.is_current_order(self.core.id()) {
            return scheduler.order_priority();
        }
        priority::aggregate(
            target_value,
            self.core.devotion(),
            self.core.priority_modifier(),
            scheduler.order_priority(),
        )
    }

    fn act(&mut self, _ctx: &mut C, _scheduler: &SchedulerState, _delta_time: f32) {}

    fn is_completed(&mut self, _ctx: &mut C) -> bool {
        false
    }

    fn can_be_completed(&mut self, _ctx: &mut C, _scheduler: &SchedulerState) -> bool {
        true
    }

    fn is_duplicate_of(&self, other: &dyn Objective<C>) -> bool {
        other.as_any().downcast_ref::<Self>().is_some()
    }

    fn reset(&mut self, ctx: &mut C) {
        self.restart(ctx);
    }

    fn on_selected(&mut self, ctx: &mut C, scheduler: &SchedulerState) {
        if scheduler.is_current_order(self.core.id()) {
            tracing::debug!("[{}] reissued as order, resetting", self.source.debug_tag());
            self.restart(ctx);
        }
    }

    fn refresh(&mut self, ctx: &mut C, scheduler: &SchedulerState, delta_time: f32) {
        if self.config.ignore_list_clear_interval > 0.0 {
            self.ignore_timer += delta_time;
            if self.ignore_timer >= self.config.ignore_list_clear_interval {
                tracing::trace!("[{}] clearing ignore list", self.source.debug_tag());
                self.restart(ctx);
            }
        }

        self.target_timer += delta_time;
        if self.target_timer >= self.config.target_update_interval {
            self.target_timer = 0.0;
            self.rediscover(ctx);
        }

        for (target, &id) in &self.objectives {
            let Some(child) = self.core.sub_objectives_mut().get_mut(id) else {
                continue;
            };
            if !child.can_be_completed(ctx, scheduler) {
                tracing::debug!(
                    "[{}] objective for {:?} cannot be completed, ignoring target",
                    self.source.debug_tag(),
                    target
                );
                self.ignored.insert(target.clone());
                self.target_timer = self.config.target_update_interval;
            }
            if !self.targets.contains(target) {
                self.core.sub_objectives_mut().remove(id);
            }
        }

        self.reconcile(ctx);

        if self.objectives.is_empty() && !self.targets.is_empty() {
            self.create_objectives(ctx);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
