//! Diving gear acquisition.

use std::any::Any;

use objective::{Objective, ObjectiveId, SchedulerState};

use crate::config::NavigationConfig;
use crate::context::{CrewCore, Ctx};
use crate::navigate::{NavigateObjective, close_enough_for};
use crate::world::EntityId;

/// Walks to the nearest diving gear and puts it on.
///
/// Completes as soon as the agent wears gear, however it got it. Abandons when
/// no gear is available, when the walk to the chosen gear fails, or when
/// equipping fails.
pub struct FetchGearObjective {
    core: CrewCore,
    config: NavigationConfig,
    gear: Option<EntityId>,
    walk: Option<ObjectiveId>,
}

impl FetchGearObjective {
    pub fn new(config: &NavigationConfig) -> Self {
        Self {
            core: CrewCore::new(),
            config: *config,
            gear: None,
            walk: None,
        }
    }

    /// The gear item currently being fetched.
    pub fn gear(&self) -> Option<EntityId> {
        self.gear
    }

    fn in_reach(&self, ctx: &Ctx, gear: EntityId) -> bool {
        let world = ctx.world();
        let position = ctx.agent_position();
        if world.is_inside_trigger(gear, position) {
            return true;
        }
        let radius = close_enough_for(world, gear, &self.config);
        world
            .sim_position(gear)
            .is_some_and(|item| item.distance_squared(position) < radius * radius)
    }
}

impl Objective<Ctx> for FetchGearObjective {
    fn core(&self) -> &CrewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CrewCore {
        &mut self.core
    }

    fn debug_tag(&self) -> &'static str {
        "find diving gear"
    }

    fn evaluate_priority(&self, _ctx: &Ctx, scheduler: &SchedulerState) -> f32 {
        if scheduler.is_current_order(self.core.id()) {
            scheduler.order_priority()
        } else {
            self.config.baseline_priority
        }
    }

    fn refresh(&mut self, ctx: &mut Ctx, _scheduler: &SchedulerState, _delta_time: f32) {
        if self.core.is_abandoned() || ctx.world().has_diving_gear(ctx.agent()) {
            return;
        }

        let Some(nearest) = ctx.world().nearest_diving_gear(ctx.agent()) else {
            tracing::debug!("[find diving gear] no diving gear available");
            self.core.abandon();
            return;
        };

        if self.gear != Some(nearest) {
            if let Some(walk) = self.walk.take() {
                self.core.sub_objectives_mut().remove(walk);
            }
            tracing::trace!("[find diving gear] heading for {:?}", nearest);
            self.gear = Some(nearest);
        }
    }

    fn act(&mut self, ctx: &mut Ctx, _scheduler: &SchedulerState, _delta_time: f32) {
        let Some(gear) = self.gear.filter(|_| !self.core.is_abandoned()) else {
            return;
        };

        if self.in_reach(ctx, gear) {
            if !ctx.equip(gear) {
                tracing::debug!("[find diving gear] could not equip {:?}", gear);
                self.core.abandon();
            }
            return;
        }

        // The walk child is gone but the gear is still out of reach.
        if let Some(walk) = self.walk
            && !self.core.sub_objectives().contains(walk)
        {
            tracing::debug!("[find diving gear] could not reach {:?}", gear);
            self.core.abandon();
            return;
        }

        let config = self.config;
        self.core.sub_objectives_mut().try_add(&mut self.walk, || {
            Box::new(NavigateObjective::to_entity(gear, ctx, &config).with_gear_fetching(false))
        });
    }

    fn is_completed(&mut self, ctx: &mut Ctx) -> bool {
        ctx.world().has_diving_gear(ctx.agent())
    }

    fn is_duplicate_of(&self, other: &dyn Objective<Ctx>) -> bool {
        other.as_any().is::<Self>()
    }

    fn reset(&mut self, _ctx: &mut Ctx) {
        self.core.sub_objectives_mut().clear();
        self.gear = None;
        self.walk = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
