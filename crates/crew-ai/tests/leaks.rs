use crew_ai::sandbox::{Sandbox, SandboxWorld};
use crew_ai::{AiConfig, ConfigError, CrewWorld, EntityId, FixLeaksObjective, HullId, PathState, VesselId, fix_leaks};
use glam::Vec2;
use objective::{Objective, SchedulerState, Status};

const VESSEL: VesselId = VesselId(1);

struct Scene {
    sandbox: Sandbox,
    leaks: Vec<EntityId>,
}

/// Agent at the origin of a vessel with leaks at the given points.
fn scene(leaks: &[(f32, f32)]) -> Scene {
    let mut world = SandboxWorld::new();
    world.add_vessel(VESSEL, Vec2::ZERO);
    let agent = world.spawn_character(Vec2::ZERO);
    world.place(agent, Some(VESSEL), Some(HullId(1)));

    let leaks = leaks
        .iter()
        .map(|&(x, open)| {
            let leak = world.spawn_leak(Vec2::new(x, 0.0), open);
            world.place(leak, Some(VESSEL), Some(HullId(1)));
            leak
        })
        .collect();

    Scene {
        sandbox: Sandbox::new(world, agent),
        leaks,
    }
}

fn objective(scene: &Scene) -> FixLeaksObjective {
    fix_leaks(&scene.sandbox, &AiConfig::default()).unwrap()
}

fn run(objective: &mut FixLeaksObjective, sandbox: &mut Sandbox, ticks: usize, dt: f32) {
    let scheduler = SchedulerState::new();
    for _ in 0..ticks {
        objective.update(sandbox, &scheduler, dt);
        sandbox.advance(dt);
    }
}

#[test]
fn targets_open_leaks_of_agents_vessel_only() {
    let mut scene = scene(&[(2.0, 0.5), (4.0, 0.0), (6.0, 0.3)]);
    let foreign = scene.sandbox.world.spawn_leak(Vec2::new(1.0, 0.0), 1.0);
    scene.sandbox.world.place(foreign, Some(VesselId(2)), None);

    let objective = objective(&scene);
    assert_eq!(objective.targets(), &[scene.leaks[0], scene.leaks[2]]);
    assert!(objective.objective_for(&scene.leaks[1]).is_none());
    assert!(objective.objective_for(&foreign).is_none());
}

#[test]
fn priority_follows_total_open_amount() {
    let scene = scene(&[(2.0, 0.5), (6.0, 0.3)]);
    let mut objective = objective(&scene);
    let mut scheduler = SchedulerState::new();

    // value 80, ceiling 69
    let priority = objective.priority(&scene.sandbox, &scheduler);
    assert!((priority - 55.2).abs() < 1e-3);

    scheduler.set_current_order(Some(objective.core().id()));
    assert_eq!(objective.priority(&scene.sandbox, &scheduler), 70.0);
}

#[test]
fn agent_outside_vessel_has_nothing_to_fix() {
    let mut scene = scene(&[(2.0, 1.0)]);
    let agent = scene.sandbox.agent;
    scene.sandbox.world.place(agent, None, None);

    let mut objective = objective(&scene);
    assert!(objective.targets().is_empty());
    assert_eq!(objective.priority(&scene.sandbox, &SchedulerState::new()), 0.0);
}

#[test]
fn repairs_every_leak_in_turn() {
    let mut scene = scene(&[(2.0, 0.5), (4.0, 0.25)]);
    let mut objective = objective(&scene);

    run(&mut objective, &mut scene.sandbox, 60, 0.5);

    for leak in &scene.leaks {
        assert_eq!(scene.sandbox.world.leak_open_amount(*leak), 0.0);
    }
    assert!(objective.targets().is_empty());
    assert_eq!(objective.priority(&scene.sandbox, &SchedulerState::new()), 0.0);
    assert_eq!(objective.status(&mut scene.sandbox, &SchedulerState::new()), Status::Active);
}

#[test]
fn unreachable_leak_is_ignored_until_reset() {
    let mut scene = scene(&[(2.0, 0.5)]);
    scene.sandbox.steering.path = Some(PathState::default());
    scene.sandbox.steering.has_access = false;
    let leak = scene.leaks[0];
    let mut objective = objective(&scene);

    run(&mut objective, &mut scene.sandbox, 6, 0.1);
    assert!(objective.is_ignored(&leak));
    assert!(objective.targets().is_empty());
    assert!(objective.core().sub_objectives().is_empty());

    scene.sandbox.steering.has_access = true;
    objective.reset(&mut scene.sandbox);
    assert_eq!(objective.targets(), &[leak]);
    assert!(objective.objective_for(&leak).is_some());
}

#[test]
fn new_leak_is_picked_up_on_next_discovery() {
    let mut scene = scene(&[]);
    let mut objective = objective(&scene);

    run(&mut objective, &mut scene.sandbox, 1, 0.5);
    let leak = scene.sandbox.world.spawn_leak(Vec2::new(3.0, 0.0), 0.6);
    scene.sandbox.world.place(leak, Some(VESSEL), Some(HullId(1)));

    run(&mut objective, &mut scene.sandbox, 2, 0.5);
    assert!(objective.targets().is_empty());

    run(&mut objective, &mut scene.sandbox, 1, 0.5);
    assert_eq!(objective.targets(), &[leak]);
}

#[test]
fn invalid_leak_config_is_rejected() {
    let scene = scene(&[]);
    let mut config = AiConfig::default();
    config.leaks.target_update_interval = 0.0;

    assert!(matches!(fix_leaks(&scene.sandbox, &config), Err(ConfigError::Objective(_))));
}
