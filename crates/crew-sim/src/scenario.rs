//! Demo scenario: one crew member aboard a leaking vessel.

use crew_ai::sandbox::{Sandbox, SandboxWorld};
use crew_ai::{AiConfig, BoxedObjective, EntityId, HullId, NavigateObjective, VesselId, fix_leaks};
use glam::Vec2;
use objective::{Objective, ObjectiveId};

const VESSEL: VesselId = VesselId(1);
const DRY_HULL: HullId = HullId(1);
const FLOODED_HULL: HullId = HullId(2);

pub struct Scenario {
    pub sandbox: Sandbox,
    pub objectives: Vec<BoxedObjective>,
    /// Objective handed out as an order at startup.
    pub order: Option<ObjectiveId>,
    pub leaks: Vec<EntityId>,
}

/// Builds the world and the agent's candidate objectives.
///
/// Layout (vessel frame):
///
/// ```text
///   agent(0)  gear(3)  leak(5)  | flooded: leak(9) valve(12)
/// ```
pub fn build(config: &AiConfig) -> anyhow::Result<Scenario> {
    let mut world = SandboxWorld::new();
    world.add_vessel(VESSEL, Vec2::new(250.0, -40.0));

    let agent = world.spawn_character(Vec2::ZERO);
    world.place(agent, Some(VESSEL), Some(DRY_HULL));
    world.set_controlled(Some(agent));

    let gear = world.spawn_diving_gear(Vec2::new(3.0, 0.0));
    world.place(gear, Some(VESSEL), Some(DRY_HULL));

    let mut leaks = Vec::new();
    for (x, open, hull) in [(5.0, 0.6, DRY_HULL), (9.0, 0.3, FLOODED_HULL)] {
        let leak = world.spawn_leak(Vec2::new(x, 0.0), open);
        world.place(leak, Some(VESSEL), Some(hull));
        leaks.push(leak);
    }

    let valve = world.spawn_item(Vec2::new(12.0, 0.0), 1.0);
    world.place(valve, Some(VESSEL), Some(FLOODED_HULL));
    world.flood(FLOODED_HULL);

    let sandbox = Sandbox::new(world, agent);

    let fix = fix_leaks(&sandbox, config)?;
    let order = Some(fix.core().id());
    let check_valve = NavigateObjective::to_entity(valve, &sandbox, &config.navigation);
    let objectives: Vec<BoxedObjective> = vec![Box::new(fix), Box::new(check_valve)];

    Ok(Scenario {
        sandbox,
        objectives,
        order,
        leaks,
    })
}
