//! Scheduler state shared with every objective of one agent.

use crate::core::ObjectiveId;
use crate::error::{ObjectiveError, Result};

/// Per-agent state owned by the external scheduler.
///
/// The scheduler decides which objective is the agent's *current order*.
/// Objectives never store this; it is handed to every priority and update
/// call so that order override works without global state.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerState {
    order_priority: f32,
    current_order: Option<ObjectiveId>,
}

impl SchedulerState {
    /// Priority returned verbatim by any objective that is the current order.
    pub const DEFAULT_ORDER_PRIORITY: f32 = 70.0;

    pub fn new() -> Self {
        Self {
            order_priority: Self::DEFAULT_ORDER_PRIORITY,
            current_order: None,
        }
    }

    /// Creates a scheduler state with a custom order priority.
    ///
    /// The value must exceed 1 so that organic priorities (capped at
    /// `order_priority - 1`) stay below the order tier.
    pub fn with_order_priority(order_priority: f32) -> Result<Self> {
        if !order_priority.is_finite() || order_priority <= 1.0 {
            return Err(ObjectiveError::InvalidOrderPriority(order_priority));
        }
        Ok(Self {
            order_priority,
            current_order: None,
        })
    }

    #[inline]
    pub fn order_priority(&self) -> f32 {
        self.order_priority
    }

    #[inline]
    pub fn current_order(&self) -> Option<ObjectiveId> {
        self.current_order
    }

    #[inline]
    pub fn has_order(&self) -> bool {
        self.current_order.is_some()
    }

    #[inline]
    pub fn is_current_order(&self, id: ObjectiveId) -> bool {
        self.current_order == Some(id)
    }

    pub fn set_current_order(&mut self, order: Option<ObjectiveId>) {
        if self.current_order != order {
            tracing::debug!("current order changed: {:?} -> {:?}", self.current_order, order);
        }
        self.current_order = order;
    }
}

impl Default for SchedulerState {
    fn default() -> Self {
        Self::new()
    }
}
