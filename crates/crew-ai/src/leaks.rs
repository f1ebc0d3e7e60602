//! Leak repair.
//!
//! [`FixLeaks`] plugs crew knowledge into the generic recurring engine: every
//! open leak in the agent's vessel becomes a target, and each target gets a
//! [`RepairLeakObjective`] that walks over and seals it.

use std::any::Any;

use objective::{Objective, ObjectiveCore, ObjectiveId, RecurringObjective, SchedulerState, TargetSource, priority};

use crate::config::{AiConfig, NavigationConfig};
use crate::context::{BoxedObjective, CrewCore, Ctx};
use crate::error::Result;
use crate::navigate::NavigateObjective;
use crate::world::{EntityId, Facing};

/// Leak-fixing objective as scheduled for an agent.
pub type FixLeaksObjective = RecurringObjective<Ctx, FixLeaks>;

/// Target source enumerating the open leaks of the agent's vessel.
#[derive(Clone, Debug)]
pub struct FixLeaks {
    navigation: NavigationConfig,
}

impl FixLeaks {
    pub fn new(navigation: &NavigationConfig) -> Self {
        Self {
            navigation: *navigation,
        }
    }
}

/// Builds the leak-fixing objective for the agent in `ctx`.
pub fn fix_leaks(ctx: &Ctx, config: &AiConfig) -> Result<FixLeaksObjective> {
    let core = ObjectiveCore::looping().with_devotion_rate(config.devotion_rate);
    Ok(RecurringObjective::with_core(
        FixLeaks::new(&config.navigation),
        config.leaks,
        core,
        ctx,
    )?)
}

impl TargetSource<Ctx> for FixLeaks {
    type Target = EntityId;

    fn debug_tag(&self) -> &'static str {
        "fix leaks"
    }

    fn candidates(&self, ctx: &Ctx) -> Vec<EntityId> {
        ctx.world().leaks()
    }

    fn filter(&self, leak: &EntityId, ctx: &Ctx) -> bool {
        let world = ctx.world();
        if world.is_removed(*leak) || world.leak_open_amount(*leak) <= 0.0 {
            return false;
        }
        let vessel = world.vessel(ctx.agent());
        vessel.is_some() && world.vessel(*leak) == vessel
    }

    /// Sum of the open amounts, on a 0..100 scale per leak.
    fn target_value(&self, leaks: &[EntityId], ctx: &Ctx) -> f32 {
        let world = ctx.world();
        leaks.iter().map(|leak| world.leak_open_amount(*leak) * 100.0).sum()
    }

    fn build_objective(&self, leak: &EntityId, _ctx: &Ctx) -> BoxedObjective {
        Box::new(RepairLeakObjective::new(*leak, &self.navigation))
    }

    fn is_applicable(&self, ctx: &Ctx) -> bool {
        ctx.world().vessel(ctx.agent()).is_some()
    }
}

/// Walks to one leak and repairs it until it is sealed.
pub struct RepairLeakObjective {
    core: CrewCore,
    leak: EntityId,
    navigation: NavigationConfig,
    walk: Option<ObjectiveId>,
}

impl RepairLeakObjective {
    pub fn new(leak: EntityId, navigation: &NavigationConfig) -> Self {
        Self {
            core: CrewCore::new(),
            leak,
            navigation: *navigation,
            walk: None,
        }
    }

    pub fn leak(&self) -> EntityId {
        self.leak
    }

    fn in_reach(&self, ctx: &Ctx) -> bool {
        let radius = self.navigation.close_enough;
        ctx.world()
            .sim_position(self.leak)
            .is_some_and(|leak| leak.distance_squared(ctx.agent_position()) < radius * radius)
    }
}

impl Objective<Ctx> for RepairLeakObjective {
    fn core(&self) -> &CrewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CrewCore {
        &mut self.core
    }

    fn debug_tag(&self) -> &'static str {
        "fix leak"
    }

    fn evaluate_priority(&self, ctx: &Ctx, scheduler: &SchedulerState) -> f32 {
        let world = ctx.world();
        if world.is_removed(self.leak) {
            return 0.0;
        }
        if scheduler.is_current_order(self.core.id()) {
            return scheduler.order_priority();
        }
        priority::aggregate(
            world.leak_open_amount(self.leak) * 100.0,
            self.core.devotion(),
            self.core.priority_modifier(),
            scheduler.order_priority(),
        )
    }

    fn refresh(&mut self, ctx: &mut Ctx, scheduler: &SchedulerState, _delta_time: f32) {
        let Some(walk) = self.walk else {
            return;
        };
        let Some(child) = self.core.sub_objectives_mut().get_mut(walk) else {
            return;
        };
        if !child.can_be_completed(ctx, scheduler) {
            tracing::debug!("[fix leak] cannot reach leak {:?}", self.leak);
            self.core.abandon();
        }
    }

    fn act(&mut self, ctx: &mut Ctx, _scheduler: &SchedulerState, delta_time: f32) {
        if self.core.is_abandoned() {
            return;
        }

        if self.in_reach(ctx) {
            if let Some(leak) = ctx.world().sim_position(self.leak) {
                let position = ctx.agent_position();
                ctx.face(Facing::towards(position.x, leak.x));
            }
            ctx.steering_mut().reset();
            ctx.repair(self.leak, delta_time);
            return;
        }

        let (leak, navigation) = (self.leak, self.navigation);
        self.core.sub_objectives_mut().try_add(&mut self.walk, || {
            Box::new(NavigateObjective::to_entity(leak, ctx, &navigation))
        });
    }

    fn is_completed(&mut self, ctx: &mut Ctx) -> bool {
        let world = ctx.world();
        world.is_removed(self.leak) || world.leak_open_amount(self.leak) <= 0.0
    }

    fn is_duplicate_of(&self, other: &dyn Objective<Ctx>) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| other.leak == self.leak)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
