//! Headless crew simulation.
//!
//! Runs a single crew member through the demo scenario: every step the
//! highest-priority objective is selected and updated, finished objectives are
//! dropped, and the sandbox advances.
//!
//! # Configuration
//!
//! - `CREW_AI_CONFIG` - Optional RON file with [`AiConfig`] settings
//! - `CREW_AI_*` - Individual overrides, see [`AiConfig::from_env`]
//! - `RUST_LOG` - Log filter (default: `info`)

mod scenario;

use std::path::Path;

use anyhow::{Context, Result};
use crew_ai::sandbox::Sandbox;
use crew_ai::{AiConfig, BoxedObjective, CrewWorld};
use objective::{ObjectiveId, SchedulerState, Status};

const DELTA_TIME: f32 = 0.25;
const MAX_STEPS: usize = 400;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let mut scheduler = config.scheduler()?;
    let mut scenario = scenario::build(&config)?;
    scheduler.set_current_order(scenario.order);

    tracing::info!("Starting crew simulation");
    tracing::info!("Order priority: {}", scheduler.order_priority());
    tracing::info!("Candidate objectives: {}", scenario.objectives.len());

    let mut active: Option<ObjectiveId> = None;
    for step in 0..MAX_STEPS {
        let Some(index) = select(&mut scenario.objectives, &scenario.sandbox, &scheduler) else {
            tracing::info!("Nothing left to do after {} steps", step);
            break;
        };

        let sandbox = &mut scenario.sandbox;
        let objective = &mut scenario.objectives[index];
        let id = objective.core().id();
        if active != Some(id) {
            tracing::info!(
                "Step {}: pursuing '{}' {} (priority {:.1})",
                step,
                objective.debug_tag(),
                id,
                objective.core().priority()
            );
            objective.on_selected(sandbox, &scheduler);
            active = Some(id);
        }

        objective.update(sandbox, &scheduler, DELTA_TIME);
        sandbox.advance(DELTA_TIME);

        scenario.objectives.retain_mut(|objective| {
            match objective.status(&mut scenario.sandbox, &scheduler) {
                Status::Active => true,
                status => {
                    tracing::info!("'{}' {} {}", objective.debug_tag(), objective.core().id(), status.as_str());
                    false
                }
            }
        });
    }

    report(&scenario.sandbox, &scenario.leaks);
    Ok(())
}

fn load_config() -> Result<AiConfig> {
    let config = match std::env::var("CREW_AI_CONFIG") {
        Ok(path) => AiConfig::load_from_file(Path::new(&path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => AiConfig::default(),
    };

    let config = config.with_env_overrides();
    config.validate().context("Invalid crew AI configuration")?;
    Ok(config)
}

/// Index of the objective with the highest positive priority. Ties go to the
/// earlier objective.
fn select(objectives: &mut [BoxedObjective], sandbox: &Sandbox, scheduler: &SchedulerState) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, objective) in objectives.iter_mut().enumerate() {
        let priority = objective.priority(sandbox, scheduler);
        if priority > 0.0 && best.is_none_or(|(_, top)| priority > top) {
            best = Some((index, priority));
        }
    }
    best.map(|(index, _)| index)
}

fn report(sandbox: &Sandbox, leaks: &[crew_ai::EntityId]) {
    let world = &sandbox.world;
    tracing::info!("Simulated {:.1} time units", sandbox.clock());
    tracing::info!("Agent position: {}", world.sim_position(sandbox.agent).unwrap_or_default());
    tracing::info!("Wearing diving gear: {}", world.has_diving_gear(sandbox.agent));
    for leak in leaks {
        tracing::info!("Leak {:?}: {:.0}% open", leak, world.leak_open_amount(*leak) * 100.0);
    }
    for line in sandbox.spoken() {
        tracing::info!("Said: {}", line);
    }
}
