//! Crew objectives for agents aboard vessels.
//!
//! This crate specializes the [`objective`] engine for crew characters:
//!
//! - [`NavigateObjective`]: walk to an entity or a point, fetching diving gear
//!   on the way when the destination requires it
//! - [`FetchGearObjective`]: find and equip diving gear
//! - [`FixLeaks`]: recurring objective source that keeps one
//!   [`RepairLeakObjective`] per open leak
//!
//! The simulation itself stays outside: objectives see the world through
//! [`CrewWorld`], move the agent through [`Steering`], and receive both via an
//! [`AgentContext`] on every call. [`sandbox`] provides an in-memory
//! implementation for tests and headless runs.

pub mod config;
pub mod context;
pub mod error;
pub mod gear;
pub mod leaks;
pub mod navigate;
pub mod sandbox;
pub mod speech;
pub mod steering;
pub mod world;

pub use config::{AiConfig, NavigationConfig};
pub use context::{AgentContext, BoxedObjective, CrewCore, Ctx};
pub use error::ConfigError;
pub use gear::FetchGearObjective;
pub use leaks::{FixLeaks, FixLeaksObjective, RepairLeakObjective, fix_leaks};
pub use navigate::{Destination, NavigateObjective};
pub use speech::SpeechLimiter;
pub use steering::{PathState, Steering};
pub use world::{CrewWorld, EntityId, EntityKind, Facing, HullId, VesselId};
