//! Navigation objective: walk the agent to an entity or a point.
//!
//! # Failure Handling
//!
//! Navigation never reports errors. A vanished target, a missing controlled
//! character, a forbidden trip outside, a locked door on the path, or a path
//! that stays unreachable past the grace countdown all *abandon* the
//! objective. Abandonment is sticky; every later viability check resets
//! steering and, while the agent is under orders, says "cannot reach"
//! (rate-limited).

use std::any::Any;

use glam::Vec2;
use objective::{Objective, ObjectiveId, SchedulerState};

use crate::config::NavigationConfig;
use crate::context::{CrewCore, Ctx};
use crate::gear::FetchGearObjective;
use crate::world::{CrewWorld, EntityId, EntityKind, Facing};

const CANNOT_REACH_LINE: &str = "I can't get there.";
const CANNOT_REACH_ID: &str = "cannotreach";

/// Where a [`NavigateObjective`] is heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Destination {
    Entity(EntityId),

    /// A point in the agent's simulation frame.
    Point(Vec2),

    /// Whoever the player currently controls. `current` is the character being
    /// approached; it is refreshed on every action.
    ControlledCharacter { current: Option<EntityId> },
}

impl Destination {
    /// The entity being approached right now, if any.
    fn resolve(&self) -> Option<EntityId> {
        match *self {
            Destination::Entity(entity) => Some(entity),
            Destination::Point(_) => None,
            Destination::ControlledCharacter { current } => current,
        }
    }

    /// `true` when following the controlled character and nobody is controlled.
    fn lost_controlled(&self, world: &dyn CrewWorld) -> bool {
        matches!(self, Destination::ControlledCharacter { .. }) && world.controlled_character().is_none()
    }
}

pub struct NavigateObjective {
    core: CrewCore,
    destination: Destination,
    config: NavigationConfig,
    close_enough: f32,
    grace: f32,
    repeat: bool,
    fetch_gear_if_needed: bool,
    ignore_if_target_dead: bool,
    allow_going_outside: bool,
    check_visibility: bool,
    gear: Option<ObjectiveId>,
}

impl NavigateObjective {
    fn with_destination(destination: Destination, close_enough: f32, grace: f32, config: &NavigationConfig) -> Self {
        Self {
            core: CrewCore::new(),
            destination,
            config: *config,
            close_enough,
            grace,
            repeat: false,
            fetch_gear_if_needed: true,
            ignore_if_target_dead: false,
            allow_going_outside: false,
            check_visibility: false,
            gear: None,
        }
    }

    /// Walks to `target`. Items enlarge the arrival radius to their
    /// interaction distance.
    pub fn to_entity(target: EntityId, ctx: &Ctx, config: &NavigationConfig) -> Self {
        let close_enough = close_enough_for(ctx.world(), target, config);
        Self::with_destination(Destination::Entity(target), close_enough, config.entity_grace, config)
    }

    pub fn to_point(point: Vec2, config: &NavigationConfig) -> Self {
        Self::with_destination(Destination::Point(point), config.close_enough, config.point_grace, config)
    }

    /// Keeps following whichever character the player controls.
    pub fn follow_controlled(ctx: &Ctx, config: &NavigationConfig) -> Self {
        let current = ctx.world().controlled_character();
        Self::with_destination(
            Destination::ControlledCharacter { current },
            config.close_enough,
            config.entity_grace,
            config,
        )
    }

    /// A repeating objective never completes and never gives up on an
    /// unreachable path.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_gear_fetching(mut self, enabled: bool) -> Self {
        self.fetch_gear_if_needed = enabled;
        self
    }

    pub fn ignoring_dead_target(mut self) -> Self {
        self.ignore_if_target_dead = true;
        self
    }

    pub fn allowing_outside(mut self) -> Self {
        self.allow_going_outside = true;
        self
    }

    /// Only count as arrived while the target is in sight.
    pub fn with_visibility_check(mut self) -> Self {
        self.check_visibility = true;
        self
    }

    pub fn with_priority_modifier(mut self, priority_modifier: f32) -> objective::Result<Self> {
        self.core = self.core.with_priority_modifier(priority_modifier)?;
        Ok(self)
    }

    /// Overrides the arrival radius. Never drops below the configured default.
    pub fn with_close_enough(mut self, close_enough: f32) -> Self {
        self.close_enough = close_enough.max(self.config.close_enough);
        self
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn close_enough(&self) -> f32 {
        self.close_enough
    }

    /// Remaining grace before an unreachable path abandons the objective.
    pub fn grace(&self) -> f32 {
        self.grace
    }

    /// `true` once this objective has gone after diving gear.
    pub fn keeps_diving_gear_on(&self) -> bool {
        self.gear.is_some()
    }

    /// Target position in the agent's frame.
    ///
    /// Entities outside any vessel report world positions; when the agent is
    /// aboard, those are translated by the vessel position.
    fn effective_point(&self, ctx: &Ctx) -> Option<Vec2> {
        let world = ctx.world();
        let target = match self.destination {
            Destination::Point(point) => return Some(point),
            _ => self.destination.resolve()?,
        };

        let mut position = world.sim_position(target)?;
        if world.vessel(target).is_none()
            && let Some(vessel) = world.vessel(ctx.agent())
            && let Some(offset) = world.vessel_position(vessel)
        {
            position -= offset;
        }
        Some(position)
    }

    fn within_close_enough(&self, agent: Vec2, point: Vec2) -> bool {
        agent.distance_squared(point) < self.close_enough * self.close_enough
    }

    fn is_target_visible(&self, ctx: &Ctx, target: Option<EntityId>) -> bool {
        let Some(target) = target.filter(|_| self.check_visibility) else {
            return true;
        };
        let world = ctx.world();
        match world.kind(target) {
            Some(EntityKind::Character) => world.can_see_character(ctx.agent(), target),
            _ => world.can_see_target(ctx.agent(), target),
        }
    }

    /// Whether reaching the target requires diving gear the agent lacks.
    fn needs_gear(&self, ctx: &Ctx, target: Option<EntityId>, destination_outside: bool) -> bool {
        let world = ctx.world();
        if world.has_diving_gear(ctx.agent()) {
            return false;
        }
        if destination_outside {
            return true;
        }
        target
            .and_then(|target| world.hull(target))
            .is_some_and(|hull| world.needs_diving_gear(ctx.agent(), hull))
    }
}

/// Arrival radius for `target`: the item's scaled interaction distance when
/// that is larger than the default.
pub(crate) fn close_enough_for(world: &dyn CrewWorld, target: EntityId, config: &NavigationConfig) -> f32 {
    let interact = match world.kind(target) {
        Some(EntityKind::Item) => world.interact_distance(target).unwrap_or(0.0),
        _ => 0.0,
    };
    (interact * config.interact_distance_factor).max(config.close_enough)
}

impl Objective<Ctx> for NavigateObjective {
    fn core(&self) -> &CrewCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CrewCore {
        &mut self.core
    }

    fn debug_tag(&self) -> &'static str {
        "go to"
    }

    fn evaluate_priority(&self, ctx: &Ctx, scheduler: &SchedulerState) -> f32 {
        let world = ctx.world();
        if self.destination.lost_controlled(world) {
            return 0.0;
        }
        let target = self.destination.resolve();

        if let Some(target) = target {
            if world.is_removed(target) {
                return 0.0;
            }
            if self.ignore_if_target_dead && world.kind(target) == Some(EntityKind::Character) && world.is_dead(target) {
                return 0.0;
            }
        }

        if scheduler.is_current_order(self.core.id()) {
            scheduler.order_priority()
        } else {
            self.config.baseline_priority
        }
    }

    fn act(&mut self, ctx: &mut Ctx, _scheduler: &SchedulerState, delta_time: f32) {
        if let Destination::ControlledCharacter { current } = &mut self.destination {
            let Some(controlled) = ctx.world().controlled_character() else {
                return;
            };
            *current = Some(controlled);
        }

        let agent = ctx.agent();
        let target = self.destination.resolve();
        if target == Some(agent) {
            ctx.steering_mut().reset();
            return;
        }

        self.grace -= delta_time;
        if let Some(target) = target {
            ctx.select_target(target);
        }

        let Some(point) = self.effective_point(ctx) else {
            ctx.steering_mut().reset();
            return;
        };
        let position = ctx.agent_position();

        if self.is_target_visible(ctx, target) && self.within_close_enough(position, point) {
            ctx.steering_mut().reset();
            ctx.face(Facing::towards(position.x, point.x));
            return;
        }

        let world = ctx.world();
        let inside = world.hull(agent).is_some();
        let path = ctx.steering().clean_path();
        let destination_outside =
            target.is_some_and(|target| world.vessel(target).is_none()) || path.is_some_and(|path| path.has_outdoor_segments);

        if inside && destination_outside && !self.allow_going_outside {
            tracing::debug!("[go to] {:?} lies outside, abandoning", self.destination);
            self.core.abandon();
            return;
        }
        if path.is_some() && !ctx.steering().has_access_to_current_path() {
            tracing::debug!("[go to] no access to path towards {:?}, abandoning", self.destination);
            self.core.abandon();
            return;
        }

        let wants_gear = self.fetch_gear_if_needed && self.needs_gear(ctx, target, destination_outside);
        ctx.steering_mut().seek(point);

        if wants_gear {
            let config = self.config;
            let created = self
                .core
                .sub_objectives_mut()
                .try_add(&mut self.gear, || Box::new(FetchGearObjective::new(&config)));
            if created {
                tracing::debug!("[go to] fetching diving gear first");
            }
        }
    }

    fn is_completed(&mut self, ctx: &mut Ctx) -> bool {
        if self.repeat {
            return false;
        }

        let world = ctx.world();
        let agent = ctx.agent();
        let position = ctx.agent_position();
        let target = self.destination.resolve();

        let in_reach = match target.and_then(|target| world.kind(target).map(|kind| (target, kind))) {
            Some((item, EntityKind::Item)) => world.is_inside_trigger(item, position),
            Some((character, EntityKind::Character)) => world.can_interact_with(agent, character),
            _ => false,
        };
        let completed = in_reach
            || self
                .effective_point(ctx)
                .is_some_and(|point| self.within_close_enough(position, point));

        if completed {
            ctx.steering_mut().reset();
        }
        completed
    }

    fn can_be_completed(&mut self, ctx: &mut Ctx, scheduler: &SchedulerState) -> bool {
        if !self.core.is_abandoned() {
            let world = ctx.world();
            let target = self.destination.resolve();

            if self.destination.lost_controlled(world) {
                tracing::debug!("[go to] no controlled character to follow, abandoning");
                self.core.abandon();
            } else if target.is_some_and(|target| world.is_removed(target)) {
                tracing::debug!("[go to] target {:?} was removed, abandoning", target);
                self.core.abandon();
            } else if !self.repeat
                && self.grace <= 0.0
                && ctx.steering().current_path().is_some_and(|path| path.unreachable)
            {
                tracing::debug!("[go to] path to {:?} is unreachable, abandoning", self.destination);
                self.core.abandon();
            }
        }

        if !self.core.is_abandoned() {
            return true;
        }

        tracing::trace!("[go to] cannot reach {:?}", self.destination);
        if scheduler.has_order() {
            ctx.speak(CANNOT_REACH_LINE, CANNOT_REACH_ID, self.config.cannot_reach_interval);
        }
        ctx.steering_mut().reset();
        false
    }

    fn is_duplicate_of(&self, other: &dyn Objective<Ctx>) -> bool {
        let Some(other) = other.as_any().downcast_ref::<Self>() else {
            return false;
        };
        match (self.destination, other.destination) {
            (Destination::Entity(a), Destination::Entity(b)) => a == b,
            (Destination::Point(a), Destination::Point(b)) => a == b,
            (Destination::ControlledCharacter { .. }, Destination::ControlledCharacter { .. }) => true,
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
