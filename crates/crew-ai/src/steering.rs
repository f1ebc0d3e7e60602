//! Steering executor contract.
//!
//! Pathfinding and movement physics live in the simulation. Objectives only
//! issue seek/reset commands and read the state of the path being followed.

use glam::Vec2;

/// Snapshot of the path the agent is currently following.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PathState {
    /// The pathfinder found no route to the destination.
    pub unreachable: bool,

    /// The path is stale and will be recomputed.
    pub dirty: bool,

    /// Some nodes of the path lie outside any vessel.
    pub has_outdoor_segments: bool,
}

pub trait Steering {
    /// Steers the agent toward `target` (agent-local simulation frame).
    fn seek(&mut self, target: Vec2);

    /// Stops all steering.
    fn reset(&mut self);

    /// The followed path, or `None` when the agent is not path-following or
    /// has no path yet.
    fn current_path(&self) -> Option<PathState>;

    /// Whether the agent may pass every door on the current path.
    fn has_access_to_current_path(&self) -> bool;

    /// The current path, unless it is about to be recomputed.
    fn clean_path(&self) -> Option<PathState> {
        self.current_path().filter(|path| !path.dirty)
    }
}
