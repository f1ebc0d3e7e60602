//! World queries consumed by crew objectives.
//!
//! The simulation owns every entity. Objectives only hold [`EntityId`]s and
//! ask the world about them each tick, so an id whose entity disappeared simply
//! reports as removed.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VesselId(pub u32);

/// An enclosed compartment of a vessel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HullId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Character,
    Item,
    Hull,
    /// Walls, leaks and other static structure.
    Structure,
}

/// Horizontal facing of a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Facing needed at `from_x` to look at `to_x`.
    pub fn towards(from_x: f32, to_x: f32) -> Self {
        if to_x > from_x { Facing::Right } else { Facing::Left }
    }
}

/// Read-only view of the simulation.
///
/// Positions are in simulation units. An entity inside a vessel reports its
/// position in the vessel's frame; entities outside any vessel report world
/// positions.
pub trait CrewWorld {
    /// The character currently controlled by the local player, if any.
    fn controlled_character(&self) -> Option<EntityId>;

    fn kind(&self, entity: EntityId) -> Option<EntityKind>;

    /// `true` for removed entities and for ids the world does not know.
    fn is_removed(&self, entity: EntityId) -> bool;

    fn sim_position(&self, entity: EntityId) -> Option<Vec2>;

    fn vessel(&self, entity: EntityId) -> Option<VesselId>;

    fn vessel_position(&self, vessel: VesselId) -> Option<Vec2>;

    /// The hull the entity is in. A hull reports itself.
    fn hull(&self, entity: EntityId) -> Option<HullId>;

    /// Interaction distance of an item, in simulation units.
    fn interact_distance(&self, item: EntityId) -> Option<f32>;

    fn is_dead(&self, character: EntityId) -> bool;

    /// Whether `position` lies inside the item's interaction trigger.
    fn is_inside_trigger(&self, item: EntityId, position: Vec2) -> bool;

    fn can_interact_with(&self, agent: EntityId, character: EntityId) -> bool;

    fn can_see_character(&self, agent: EntityId, character: EntityId) -> bool;

    fn can_see_target(&self, agent: EntityId, target: EntityId) -> bool;

    /// Whether being in `hull` requires protective equipment.
    fn needs_diving_gear(&self, agent: EntityId, hull: HullId) -> bool;

    fn has_diving_gear(&self, agent: EntityId) -> bool;

    /// Closest unclaimed diving gear the agent could pick up.
    fn nearest_diving_gear(&self, agent: EntityId) -> Option<EntityId>;

    fn leaks(&self) -> Vec<EntityId>;

    /// How open a leak is, `0.0` (sealed) to `1.0` (fully open).
    fn leak_open_amount(&self, leak: EntityId) -> f32;
}
