//! In-memory world for tests and headless runs.
//!
//! [`SandboxWorld`] is a flat table of entities with just enough physics to
//! exercise crew objectives: agents slide straight towards their seek target,
//! leaks close while being repaired, and diving gear disappears into the
//! wearer's inventory when equipped. Path state is not computed; tests set it
//! on [`SandboxSteering`] directly.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;

use crate::context::AgentContext;
use crate::speech::SpeechLimiter;
use crate::steering::{PathState, Steering};
use crate::world::{CrewWorld, EntityId, EntityKind, Facing, HullId, VesselId};

#[derive(Clone, Debug)]
struct SandboxEntity {
    kind: EntityKind,
    position: Vec2,
    vessel: Option<VesselId>,
    hull: Option<HullId>,
    removed: bool,
    dead: bool,
    interact_distance: Option<f32>,
    trigger_radius: Option<f32>,
    leak_open: Option<f32>,
    diving_gear: bool,
}

impl SandboxEntity {
    fn new(kind: EntityKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            vessel: None,
            hull: None,
            removed: false,
            dead: false,
            interact_distance: None,
            trigger_radius: None,
            leak_open: None,
            diving_gear: false,
        }
    }
}

/// Entity table implementing [`CrewWorld`].
#[derive(Clone, Debug)]
pub struct SandboxWorld {
    entities: BTreeMap<EntityId, SandboxEntity>,
    next_id: u32,
    vessels: HashMap<VesselId, Vec2>,
    controlled: Option<EntityId>,
    flooded: HashSet<HullId>,
    wearing_gear: HashSet<EntityId>,
    hidden: HashSet<EntityId>,
    character_reach: f32,
}

impl SandboxWorld {
    pub const DEFAULT_CHARACTER_REACH: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
            vessels: HashMap::new(),
            controlled: None,
            flooded: HashSet::new(),
            wearing_gear: HashSet::new(),
            hidden: HashSet::new(),
            character_reach: Self::DEFAULT_CHARACTER_REACH,
        }
    }

    fn insert(&mut self, entity: SandboxEntity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    fn entity(&self, id: EntityId) -> Option<&SandboxEntity> {
        self.entities.get(&id).filter(|entity| !entity.removed)
    }

    fn entity_mut(&mut self, id: EntityId) -> Option<&mut SandboxEntity> {
        self.entities.get_mut(&id).filter(|entity| !entity.removed)
    }

    pub fn add_vessel(&mut self, vessel: VesselId, position: Vec2) {
        self.vessels.insert(vessel, position);
    }

    pub fn spawn_character(&mut self, position: Vec2) -> EntityId {
        self.insert(SandboxEntity::new(EntityKind::Character, position))
    }

    /// Spawns an item whose interaction trigger is a circle of
    /// `interact_distance` around it.
    pub fn spawn_item(&mut self, position: Vec2, interact_distance: f32) -> EntityId {
        let mut item = SandboxEntity::new(EntityKind::Item, position);
        item.interact_distance = Some(interact_distance);
        item.trigger_radius = Some(interact_distance);
        self.insert(item)
    }

    pub fn spawn_diving_gear(&mut self, position: Vec2) -> EntityId {
        let id = self.spawn_item(position, 0.5);
        if let Some(gear) = self.entity_mut(id) {
            gear.diving_gear = true;
        }
        id
    }

    pub fn spawn_hull(&mut self, hull: HullId, vessel: VesselId, position: Vec2) -> EntityId {
        let mut entity = SandboxEntity::new(EntityKind::Hull, position);
        entity.vessel = Some(vessel);
        entity.hull = Some(hull);
        self.insert(entity)
    }

    /// Spawns a leak with the given open amount (`0.0..=1.0`).
    pub fn spawn_leak(&mut self, position: Vec2, open: f32) -> EntityId {
        let mut leak = SandboxEntity::new(EntityKind::Structure, position);
        leak.leak_open = Some(open.clamp(0.0, 1.0));
        self.insert(leak)
    }

    /// Puts an entity aboard `vessel`, inside `hull` if given.
    pub fn place(&mut self, entity: EntityId, vessel: Option<VesselId>, hull: Option<HullId>) {
        if let Some(entity) = self.entity_mut(entity) {
            entity.vessel = vessel;
            entity.hull = hull;
        }
    }

    pub fn set_position(&mut self, entity: EntityId, position: Vec2) {
        if let Some(entity) = self.entity_mut(entity) {
            entity.position = position;
        }
    }

    pub fn remove(&mut self, entity: EntityId) {
        if let Some(entity) = self.entities.get_mut(&entity) {
            entity.removed = true;
        }
    }

    pub fn kill(&mut self, character: EntityId) {
        if let Some(character) = self.entity_mut(character) {
            character.dead = true;
        }
    }

    pub fn set_controlled(&mut self, character: Option<EntityId>) {
        self.controlled = character;
    }

    /// Marks a hull as requiring diving gear.
    pub fn flood(&mut self, hull: HullId) {
        self.flooded.insert(hull);
    }

    /// Hides an entity from every line-of-sight check.
    pub fn hide(&mut self, entity: EntityId) {
        self.hidden.insert(entity);
    }

    pub fn reveal(&mut self, entity: EntityId) {
        self.hidden.remove(&entity);
    }

    pub fn set_leak_open(&mut self, leak: EntityId, open: f32) {
        if let Some(entity) = self.entity_mut(leak)
            && entity.leak_open.is_some()
        {
            entity.leak_open = Some(open.clamp(0.0, 1.0));
        }
    }

    /// Gives `agent` diving gear without picking anything up.
    pub fn give_diving_gear(&mut self, agent: EntityId) {
        self.wearing_gear.insert(agent);
    }
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CrewWorld for SandboxWorld {
    fn controlled_character(&self) -> Option<EntityId> {
        self.controlled.filter(|id| self.entity(*id).is_some())
    }

    fn kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.entity(entity).map(|entity| entity.kind)
    }

    fn is_removed(&self, entity: EntityId) -> bool {
        self.entity(entity).is_none()
    }

    fn sim_position(&self, entity: EntityId) -> Option<Vec2> {
        self.entity(entity).map(|entity| entity.position)
    }

    fn vessel(&self, entity: EntityId) -> Option<VesselId> {
        self.entity(entity).and_then(|entity| entity.vessel)
    }

    fn vessel_position(&self, vessel: VesselId) -> Option<Vec2> {
        self.vessels.get(&vessel).copied()
    }

    fn hull(&self, entity: EntityId) -> Option<HullId> {
        self.entity(entity).and_then(|entity| entity.hull)
    }

    fn interact_distance(&self, item: EntityId) -> Option<f32> {
        self.entity(item).and_then(|item| item.interact_distance)
    }

    fn is_dead(&self, character: EntityId) -> bool {
        self.entity(character).is_some_and(|character| character.dead)
    }

    fn is_inside_trigger(&self, item: EntityId, position: Vec2) -> bool {
        self.entity(item)
            .and_then(|item| item.trigger_radius.map(|radius| (item.position, radius)))
            .is_some_and(|(center, radius)| center.distance_squared(position) < radius * radius)
    }

    fn can_interact_with(&self, agent: EntityId, character: EntityId) -> bool {
        match (self.sim_position(agent), self.sim_position(character)) {
            (Some(a), Some(b)) => a.distance(b) < self.character_reach,
            _ => false,
        }
    }

    fn can_see_character(&self, _agent: EntityId, character: EntityId) -> bool {
        !self.hidden.contains(&character)
    }

    fn can_see_target(&self, _agent: EntityId, target: EntityId) -> bool {
        !self.hidden.contains(&target)
    }

    fn needs_diving_gear(&self, _agent: EntityId, hull: HullId) -> bool {
        self.flooded.contains(&hull)
    }

    fn has_diving_gear(&self, agent: EntityId) -> bool {
        self.wearing_gear.contains(&agent)
    }

    fn nearest_diving_gear(&self, agent: EntityId) -> Option<EntityId> {
        let origin = self.sim_position(agent)?;
        self.entities
            .iter()
            .filter(|(_, entity)| entity.diving_gear && !entity.removed)
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(origin)
                    .total_cmp(&b.position.distance_squared(origin))
            })
            .map(|(id, _)| *id)
    }

    fn leaks(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.leak_open.is_some())
            .map(|(id, _)| *id)
            .collect()
    }

    fn leak_open_amount(&self, leak: EntityId) -> f32 {
        self.entity(leak).and_then(|leak| leak.leak_open).unwrap_or(0.0)
    }
}

/// Straight-line steering with a scriptable path state.
#[derive(Clone, Debug)]
pub struct SandboxSteering {
    /// Point being sought, if any.
    pub target: Option<Vec2>,

    /// Reported path state; left untouched by [`Steering::reset`].
    pub path: Option<PathState>,

    pub has_access: bool,

    /// Distance covered per time unit.
    pub speed: f32,

    pub resets: usize,
}

impl SandboxSteering {
    pub const DEFAULT_SPEED: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            target: None,
            path: None,
            has_access: true,
            speed: Self::DEFAULT_SPEED,
            resets: 0,
        }
    }
}

impl Default for SandboxSteering {
    fn default() -> Self {
        Self::new()
    }
}

impl Steering for SandboxSteering {
    fn seek(&mut self, target: Vec2) {
        self.target = Some(target);
    }

    fn reset(&mut self) {
        self.target = None;
        self.resets += 1;
    }

    fn current_path(&self) -> Option<PathState> {
        self.path
    }

    fn has_access_to_current_path(&self) -> bool {
        self.has_access
    }
}

/// One agent living in a [`SandboxWorld`].
#[derive(Clone, Debug)]
pub struct Sandbox {
    pub world: SandboxWorld,
    pub steering: SandboxSteering,
    pub agent: EntityId,
    pub facing: Facing,
    pub selected_target: Option<EntityId>,
    /// Leak open amount removed per time unit of repair.
    pub repair_rate: f32,
    spoken: Vec<String>,
    speech: SpeechLimiter,
    clock: f32,
}

impl Sandbox {
    pub const DEFAULT_REPAIR_RATE: f32 = 0.25;

    /// Wraps `world`, driving the character `agent`.
    pub fn new(world: SandboxWorld, agent: EntityId) -> Self {
        Self {
            world,
            steering: SandboxSteering::new(),
            agent,
            facing: Facing::Right,
            selected_target: None,
            repair_rate: Self::DEFAULT_REPAIR_RATE,
            spoken: Vec::new(),
            speech: SpeechLimiter::new(),
            clock: 0.0,
        }
    }

    /// Simulation time elapsed through [`advance`](Self::advance).
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Lines actually spoken, in order.
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    /// Advances time and moves the agent towards its seek target.
    pub fn advance(&mut self, delta_time: f32) {
        self.clock += delta_time;

        let Some(target) = self.steering.target else {
            return;
        };
        let Some(position) = self.world.sim_position(self.agent) else {
            return;
        };
        let step = self.steering.speed * delta_time;
        let offset = target - position;
        let next = if offset.length() <= step {
            target
        } else {
            position + offset.normalize_or_zero() * step
        };
        self.world.set_position(self.agent, next);
    }
}

impl AgentContext for Sandbox {
    fn agent(&self) -> EntityId {
        self.agent
    }

    fn world(&self) -> &dyn CrewWorld {
        &self.world
    }

    fn steering(&self) -> &dyn Steering {
        &self.steering
    }

    fn steering_mut(&mut self) -> &mut dyn Steering {
        &mut self.steering
    }

    fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    fn select_target(&mut self, target: EntityId) {
        self.selected_target = Some(target);
    }

    fn equip(&mut self, item: EntityId) -> bool {
        let is_gear = self.world.entity(item).is_some_and(|item| item.diving_gear);
        if !is_gear {
            return false;
        }
        self.world.remove(item);
        self.world.give_diving_gear(self.agent);
        tracing::debug!("{:?} equipped diving gear {:?}", self.agent, item);
        true
    }

    fn repair(&mut self, leak: EntityId, delta_time: f32) {
        let open = self.world.leak_open_amount(leak);
        self.world.set_leak_open(leak, open - self.repair_rate * delta_time);
    }

    fn speak(&mut self, line: &str, identifier: &'static str, min_interval: f32) {
        if self.speech.allow(identifier, self.clock, min_interval) {
            tracing::info!("{:?}: {}", self.agent, line);
            self.spoken.push(line.to_string());
        }
    }
}
