//! Agent context handed to crew objectives.
//!
//! The context is the objectives' only access to their agent and the world.
//! It is passed into every call, so objectives never hold the agent and the
//! agent's lifetime is never tied to its behavior tree.

use glam::Vec2;
use objective::{Objective, ObjectiveCore};

use crate::steering::Steering;
use crate::world::{CrewWorld, EntityId, Facing};

/// Context type crew objectives are generic over.
///
/// Spelled as an alias so that `&mut Ctx` in impl signatures keeps the
/// `'static` object bound the engine traits are instantiated with.
pub type Ctx = dyn AgentContext;

/// Core state of a crew objective.
pub type CrewCore = ObjectiveCore<Ctx>;

/// Owned crew objective.
pub type BoxedObjective = Box<dyn Objective<Ctx>>;

/// One agent's view of the simulation for the duration of a tick.
pub trait AgentContext {
    /// The agent being driven.
    fn agent(&self) -> EntityId;

    fn world(&self) -> &dyn CrewWorld;

    fn steering(&self) -> &dyn Steering;

    fn steering_mut(&mut self) -> &mut dyn Steering;

    fn face(&mut self, facing: Facing);

    /// Marks `target` as the agent's current AI target.
    fn select_target(&mut self, _target: EntityId) {}

    /// Picks up and wears `item`. Returns `false` if that was not possible.
    fn equip(&mut self, item: EntityId) -> bool;

    /// Works on sealing `leak` for `delta_time` units.
    fn repair(&mut self, leak: EntityId, delta_time: f32);

    /// Says `line` unless a line with the same `identifier` was said less than
    /// `min_interval` time units ago.
    fn speak(&mut self, line: &str, identifier: &'static str, min_interval: f32);

    fn agent_position(&self) -> Vec2 {
        self.world().sim_position(self.agent()).unwrap_or_default()
    }
}
