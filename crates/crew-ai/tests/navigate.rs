use crew_ai::sandbox::{Sandbox, SandboxWorld};
use crew_ai::{CrewWorld, Destination, Facing, HullId, NavigateObjective, NavigationConfig, PathState, VesselId};
use glam::Vec2;
use objective::{Objective, SchedulerState, Status};

const VESSEL: VesselId = VesselId(1);

fn config() -> NavigationConfig {
    NavigationConfig::default()
}

/// Agent at the origin, standing outside any vessel.
fn open_water() -> Sandbox {
    let mut world = SandboxWorld::new();
    let agent = world.spawn_character(Vec2::ZERO);
    Sandbox::new(world, agent)
}

/// Agent at the origin of a vessel, inside hull 1.
fn aboard() -> Sandbox {
    let mut world = SandboxWorld::new();
    world.add_vessel(VESSEL, Vec2::new(100.0, 0.0));
    let agent = world.spawn_character(Vec2::ZERO);
    world.place(agent, Some(VESSEL), Some(HullId(1)));
    Sandbox::new(world, agent)
}

fn run(objective: &mut NavigateObjective, sandbox: &mut Sandbox, scheduler: &SchedulerState, ticks: usize, dt: f32) {
    for _ in 0..ticks {
        objective.update(sandbox, scheduler, dt);
        sandbox.advance(dt);
    }
}

#[test]
fn completes_strictly_inside_close_enough_radius() {
    let mut sandbox = open_water();

    let mut inside = NavigateObjective::to_point(Vec2::new(0.0, 0.24f32.sqrt()), &config());
    assert!(inside.is_completed(&mut sandbox));

    let mut outside = NavigateObjective::to_point(Vec2::new(0.0, 0.26f32.sqrt()), &config());
    assert!(!outside.is_completed(&mut sandbox));
}

#[test]
fn completion_resets_steering() {
    let mut sandbox = open_water();
    let mut objective = NavigateObjective::to_point(Vec2::new(0.2, 0.0), &config());

    sandbox.steering.target = Some(Vec2::new(0.2, 0.0));
    assert!(objective.is_completed(&mut sandbox));
    assert_eq!(sandbox.steering.target, None);
}

#[test]
fn repeating_objective_never_completes() {
    let mut sandbox = open_water();
    let mut objective = NavigateObjective::to_point(Vec2::ZERO, &config()).with_repeat(true);
    assert!(!objective.is_completed(&mut sandbox));
}

#[test]
fn item_targets_complete_inside_trigger() {
    let mut sandbox = open_water();
    let item = sandbox.world.spawn_item(Vec2::new(1.5, 0.0), 2.0);
    let mut objective = NavigateObjective::to_entity(item, &sandbox, &config());

    assert!((objective.close_enough() - 1.8).abs() < 1e-6);
    assert!(objective.is_completed(&mut sandbox));
}

#[test]
fn small_items_keep_default_radius() {
    let mut sandbox = open_water();
    let item = sandbox.world.spawn_item(Vec2::new(5.0, 0.0), 0.1);
    let objective = NavigateObjective::to_entity(item, &sandbox, &config());
    assert_eq!(objective.close_enough(), NavigationConfig::DEFAULT_CLOSE_ENOUGH);

    let objective = objective.with_close_enough(0.1);
    assert_eq!(objective.close_enough(), NavigationConfig::DEFAULT_CLOSE_ENOUGH);
}

#[test]
fn character_targets_complete_within_interaction_range() {
    let mut sandbox = open_water();
    let friend = sandbox.world.spawn_character(Vec2::new(0.8, 0.0));
    let mut objective = NavigateObjective::to_entity(friend, &sandbox, &config());
    assert!(objective.is_completed(&mut sandbox));

    sandbox.world.set_position(friend, Vec2::new(3.0, 0.0));
    assert!(!objective.is_completed(&mut sandbox));
}

#[test]
fn duplicates_are_symmetric() {
    let mut sandbox = open_water();
    let a = sandbox.world.spawn_item(Vec2::new(1.0, 0.0), 1.0);
    let b = sandbox.world.spawn_item(Vec2::new(2.0, 0.0), 1.0);
    sandbox.world.set_controlled(Some(sandbox.agent));

    let to_a = NavigateObjective::to_entity(a, &sandbox, &config());
    let to_a_again = NavigateObjective::to_entity(a, &sandbox, &config()).with_repeat(true);
    let to_b = NavigateObjective::to_entity(b, &sandbox, &config());
    assert!(to_a.is_duplicate_of(&to_a_again));
    assert!(to_a_again.is_duplicate_of(&to_a));
    assert!(!to_a.is_duplicate_of(&to_b));
    assert!(!to_b.is_duplicate_of(&to_a));

    let here = NavigateObjective::to_point(Vec2::new(4.0, 2.0), &config());
    let here_again = NavigateObjective::to_point(Vec2::new(4.0, 2.0), &config());
    let there = NavigateObjective::to_point(Vec2::new(4.0, 3.0), &config());
    assert!(here.is_duplicate_of(&here_again) && here_again.is_duplicate_of(&here));
    assert!(!here.is_duplicate_of(&there));
    assert!(!here.is_duplicate_of(&to_a) && !to_a.is_duplicate_of(&here));

    let follow = NavigateObjective::follow_controlled(&sandbox, &config());
    let follow_again = NavigateObjective::follow_controlled(&sandbox, &config());
    assert!(follow.is_duplicate_of(&follow_again) && follow_again.is_duplicate_of(&follow));
}

#[test]
fn unreachable_point_is_abandoned_after_grace_and_stays_abandoned() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    sandbox.steering.path = Some(PathState {
        unreachable: true,
        ..PathState::default()
    });
    let mut objective = NavigateObjective::to_point(Vec2::new(10.0, 0.0), &config());

    for _ in 0..9 {
        objective.update(&mut sandbox, &scheduler, 0.5);
        assert!(objective.can_be_completed(&mut sandbox, &scheduler));
    }

    // 10 * 0.5 = 5.0 time units
    objective.update(&mut sandbox, &scheduler, 0.5);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));

    sandbox.steering.path = Some(PathState::default());
    objective.update(&mut sandbox, &scheduler, 0.5);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(objective.status(&mut sandbox, &scheduler), Status::Abandoned);
}

#[test]
fn repeating_objective_ignores_unreachable_path() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    sandbox.steering.path = Some(PathState {
        unreachable: true,
        ..PathState::default()
    });
    let mut objective = NavigateObjective::to_point(Vec2::new(10.0, 0.0), &config()).with_repeat(true);

    run(&mut objective, &mut sandbox, &scheduler, 20, 0.5);
    assert!(objective.can_be_completed(&mut sandbox, &scheduler));
}

#[test]
fn entity_targets_use_shorter_grace() {
    let mut sandbox = open_water();
    let item = sandbox.world.spawn_item(Vec2::new(10.0, 0.0), 0.5);
    let point = NavigateObjective::to_point(Vec2::new(10.0, 0.0), &config());
    let entity = NavigateObjective::to_entity(item, &sandbox, &config());

    assert_eq!(point.grace(), 5.0);
    assert_eq!(entity.grace(), 1.0);
}

#[test]
fn priority_is_order_priority_only_for_current_order() {
    let mut sandbox = open_water();
    let item = sandbox.world.spawn_item(Vec2::new(3.0, 0.0), 0.5);
    let mut objective = NavigateObjective::to_entity(item, &sandbox, &config());
    let mut scheduler = SchedulerState::new();

    assert_eq!(objective.priority(&sandbox, &scheduler), 1.0);

    scheduler.set_current_order(Some(objective.core().id()));
    assert_eq!(objective.priority(&sandbox, &scheduler), 70.0);
    assert_eq!(objective.core().priority(), 70.0);

    // An invalid target scores zero even as the current order.
    sandbox.world.remove(item);
    assert_eq!(objective.priority(&sandbox, &scheduler), 0.0);
}

#[test]
fn dead_target_scores_zero_when_ignored() {
    let mut sandbox = open_water();
    let friend = sandbox.world.spawn_character(Vec2::new(3.0, 0.0));
    let scheduler = SchedulerState::new();
    let mut caring = NavigateObjective::to_entity(friend, &sandbox, &config());
    let mut indifferent = NavigateObjective::to_entity(friend, &sandbox, &config()).ignoring_dead_target();

    sandbox.world.kill(friend);
    assert_eq!(caring.priority(&sandbox, &scheduler), 1.0);
    assert_eq!(indifferent.priority(&sandbox, &scheduler), 0.0);
}

#[test]
fn following_without_controlled_character_is_invalid() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    let mut objective = NavigateObjective::follow_controlled(&sandbox, &config());

    assert_eq!(objective.priority(&sandbox, &scheduler), 0.0);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
}

#[test]
fn following_tracks_the_controlled_character() {
    let mut sandbox = open_water();
    let first = sandbox.world.spawn_character(Vec2::new(5.0, 0.0));
    let second = sandbox.world.spawn_character(Vec2::new(-5.0, 0.0));
    let scheduler = SchedulerState::new();
    sandbox.world.set_controlled(Some(first));
    let mut objective = NavigateObjective::follow_controlled(&sandbox, &config())
        .with_repeat(true)
        .with_gear_fetching(false);

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.steering.target, Some(Vec2::new(5.0, 0.0)));

    sandbox.world.set_controlled(Some(second));
    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.steering.target, Some(Vec2::new(-5.0, 0.0)));
    assert_eq!(
        objective.destination(),
        Destination::ControlledCharacter { current: Some(second) }
    );
    assert_eq!(sandbox.selected_target, Some(second));
}

#[test]
fn arriving_faces_the_target() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();

    let mut right = NavigateObjective::to_point(Vec2::new(0.3, 0.0), &config());
    right.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.facing, Facing::Right);
    assert_eq!(sandbox.steering.target, None);

    let mut left = NavigateObjective::to_point(Vec2::new(-0.3, 0.0), &config());
    left.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.facing, Facing::Left);
}

#[test]
fn hidden_target_is_not_reached() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    let item = sandbox.world.spawn_item(Vec2::new(0.2, 0.0), 0.5);
    sandbox.world.hide(item);
    let mut objective = NavigateObjective::to_entity(item, &sandbox, &config())
        .with_visibility_check()
        .with_gear_fetching(false);

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.steering.target, Some(Vec2::new(0.2, 0.0)));

    sandbox.world.reveal(item);
    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.steering.target, None);
}

#[test]
fn target_outside_vessel_is_translated_into_agent_frame() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    let buoy = sandbox.world.spawn_item(Vec2::new(103.0, 0.0), 0.5);
    let mut objective = NavigateObjective::to_entity(buoy, &sandbox, &config())
        .allowing_outside()
        .with_gear_fetching(false);

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(sandbox.steering.target, Some(Vec2::new(3.0, 0.0)));
}

#[test]
fn leaving_the_vessel_requires_permission() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    let buoy = sandbox.world.spawn_item(Vec2::new(103.0, 0.0), 0.5);
    let mut objective = NavigateObjective::to_entity(buoy, &sandbox, &config());

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert!(sandbox.steering.target.is_none());
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
}

#[test]
fn outdoor_path_counts_as_outside() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    sandbox.steering.path = Some(PathState {
        has_outdoor_segments: true,
        ..PathState::default()
    });
    let mut objective = NavigateObjective::to_point(Vec2::new(8.0, 0.0), &config());

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert!(objective.core().is_abandoned());
}

#[test]
fn locked_path_abandons() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    sandbox.steering.path = Some(PathState::default());
    sandbox.steering.has_access = false;
    let mut objective = NavigateObjective::to_point(Vec2::new(8.0, 0.0), &config());

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert!(objective.core().is_abandoned());

    // A dirty path is about to be replaced and does not count.
    let mut sandbox = aboard();
    sandbox.steering.path = Some(PathState {
        dirty: true,
        ..PathState::default()
    });
    sandbox.steering.has_access = false;
    let mut objective = NavigateObjective::to_point(Vec2::new(8.0, 0.0), &config());

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert!(!objective.core().is_abandoned());
}

#[test]
fn cannot_reach_is_spoken_under_orders_and_rate_limited() {
    let mut sandbox = open_water();
    let item = sandbox.world.spawn_item(Vec2::new(3.0, 0.0), 0.5);
    let mut objective = NavigateObjective::to_entity(item, &sandbox, &config());
    let mut scheduler = SchedulerState::new();
    sandbox.world.remove(item);

    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert!(sandbox.spoken().is_empty());

    scheduler.set_current_order(Some(objective.core().id()));
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    sandbox.advance(9.0);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(sandbox.spoken().len(), 1);

    sandbox.advance(1.0);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(sandbox.spoken().len(), 2);
}

#[test]
fn abandoned_objective_resets_steering_on_every_viability_check() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    let item = sandbox.world.spawn_item(Vec2::new(3.0, 0.0), 0.5);
    let mut objective = NavigateObjective::to_entity(item, &sandbox, &config());

    sandbox.steering.target = Some(Vec2::new(3.0, 0.0));
    assert!(objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(sandbox.steering.target, Some(Vec2::new(3.0, 0.0)));
    assert_eq!(sandbox.steering.resets, 0);

    sandbox.world.remove(item);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(sandbox.steering.target, None);
    assert_eq!(sandbox.steering.resets, 1);

    sandbox.steering.target = Some(Vec2::new(3.0, 0.0));
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
    assert_eq!(sandbox.steering.target, None);
    assert_eq!(sandbox.steering.resets, 2);
}

#[test]
fn following_keeps_the_last_resolved_character_until_the_next_action() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    let near = sandbox.world.spawn_character(Vec2::new(0.3, 0.0));
    let far = sandbox.world.spawn_character(Vec2::new(6.0, 0.0));
    sandbox.world.set_controlled(Some(near));
    let mut objective = NavigateObjective::follow_controlled(&sandbox, &config()).with_gear_fetching(false);

    sandbox.world.set_controlled(Some(far));
    assert!(objective.is_completed(&mut sandbox));

    objective.update(&mut sandbox, &scheduler, 0.1);
    assert_eq!(objective.destination(), Destination::ControlledCharacter { current: Some(far) });
    assert!(!objective.is_completed(&mut sandbox));

    // Losing control entirely invalidates the objective even with a stored target.
    sandbox.world.set_controlled(None);
    assert_eq!(objective.priority(&sandbox, &scheduler), 0.0);
    assert!(!objective.can_be_completed(&mut sandbox, &scheduler));
}

#[test]
fn flooded_destination_fetches_diving_gear_first() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    let gear = sandbox.world.spawn_diving_gear(Vec2::new(2.0, 0.0));
    sandbox.world.place(gear, Some(VESSEL), Some(HullId(1)));
    let valve = sandbox.world.spawn_item(Vec2::new(6.0, 0.0), 1.0);
    sandbox.world.place(valve, Some(VESSEL), Some(HullId(2)));
    sandbox.world.flood(HullId(2));

    let mut objective = NavigateObjective::to_entity(valve, &sandbox, &config());
    objective.update(&mut sandbox, &scheduler, 0.5);
    assert!(objective.keeps_diving_gear_on());
    assert_eq!(objective.core().sub_objectives().len(), 1);

    let agent = sandbox.agent;
    for _ in 0..20 {
        if sandbox.world.has_diving_gear(agent) {
            break;
        }
        objective.update(&mut sandbox, &scheduler, 0.5);
        sandbox.advance(0.5);
    }
    assert!(sandbox.world.has_diving_gear(agent));
    assert!(sandbox.world.is_removed(gear));

    for _ in 0..40 {
        if objective.status(&mut sandbox, &scheduler) == Status::Completed {
            break;
        }
        objective.update(&mut sandbox, &scheduler, 0.5);
        sandbox.advance(0.5);
    }
    assert_eq!(objective.status(&mut sandbox, &scheduler), Status::Completed);
    assert!(objective.keeps_diving_gear_on());
}

#[test]
fn gear_is_not_fetched_when_disabled_or_unneeded() {
    let mut sandbox = aboard();
    let scheduler = SchedulerState::new();
    let valve = sandbox.world.spawn_item(Vec2::new(6.0, 0.0), 1.0);
    sandbox.world.place(valve, Some(VESSEL), Some(HullId(2)));

    let mut dry = NavigateObjective::to_entity(valve, &sandbox, &config());
    dry.update(&mut sandbox, &scheduler, 0.5);
    assert!(!dry.keeps_diving_gear_on());

    sandbox.world.flood(HullId(2));
    let mut disabled = NavigateObjective::to_entity(valve, &sandbox, &config()).with_gear_fetching(false);
    disabled.update(&mut sandbox, &scheduler, 0.5);
    assert!(!disabled.keeps_diving_gear_on());
    assert!(disabled.core().sub_objectives().is_empty());
}

#[test]
fn target_is_self_only_stops_steering() {
    let mut sandbox = open_water();
    let scheduler = SchedulerState::new();
    let agent = sandbox.agent;
    let mut objective = NavigateObjective::to_entity(agent, &sandbox, &config()).with_repeat(true);
    sandbox.steering.target = Some(Vec2::ONE);

    objective.update(&mut sandbox, &scheduler, 5.0);
    assert_eq!(sandbox.steering.target, None);
    assert_eq!(objective.grace(), 1.0);
}
