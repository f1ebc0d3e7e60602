//! Utility-scored objective trees for step-driven agents.
//!
//! An agent pursues one top-level [`Objective`] per simulation step. Every
//! objective owns its sub-objectives exclusively, scores itself with a
//! priority, and reports completion or abandonment upward. Nothing here blocks
//! or suspends: a tick runs to completion before the next one starts.
//!
//! - **No shared ownership**: children live in a [`SubObjectives`] pool and are
//!   addressed through plain [`ObjectiveId`] handles
//! - **No ambient state**: the scheduler's current order travels in an explicit
//!   [`SchedulerState`]
//! - **No exceptions for expected failures**: abandonment is a sticky flag
//!
//! # Architecture
//!
//! - [`Objective`]: Core trait for every behavior
//! - [`ObjectiveCore`]: Shared bookkeeping (priority cache, devotion, children)
//! - [`SubObjectives`]: Ordered pool of owned children
//! - [`RecurringObjective`]: Generic "one child per live target" engine driven
//!   by a [`TargetSource`]
//! - [`priority`]: Aggregate priority arithmetic

pub mod core;
pub mod error;
pub mod objective;
pub mod pool;
pub mod priority;
pub mod recurring;
pub mod scheduler;
pub mod status;

// Re-export core types for ergonomic API
pub use crate::core::{ObjectiveCore, ObjectiveId};
pub use error::{ObjectiveError, Result};
pub use objective::Objective;
pub use pool::SubObjectives;
pub use recurring::{RecurringConfig, RecurringObjective, TargetSource};
pub use scheduler::SchedulerState;
pub use status::Status;
