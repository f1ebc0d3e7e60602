//! Crew AI configuration.
//!
//! Settings are resolved in three layers: built-in defaults, an optional RON
//! file, then `CREW_AI_*` environment overrides.
use std::env;
use std::path::Path;
use std::str::FromStr;

use objective::{RecurringConfig, SchedulerState, priority};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Tunables for navigation and gear fetching.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Default arrival radius; item interaction distances may enlarge it.
    pub close_enough: f32,

    /// Fraction of an item's interaction distance used as arrival radius.
    pub interact_distance_factor: f32,

    /// Grace before an unreachable path counts as failure, entity targets.
    pub entity_grace: f32,

    /// Grace before an unreachable path counts as failure, point targets.
    pub point_grace: f32,

    /// Priority of a valid navigation objective that is not an order.
    pub baseline_priority: f32,

    /// Minimum time between repeated "cannot reach" lines.
    pub cannot_reach_interval: f32,
}

impl NavigationConfig {
    pub const DEFAULT_CLOSE_ENOUGH: f32 = 0.5;
    pub const DEFAULT_INTERACT_DISTANCE_FACTOR: f32 = 0.9;
    pub const DEFAULT_ENTITY_GRACE: f32 = 1.0;
    pub const DEFAULT_POINT_GRACE: f32 = 5.0;
    pub const DEFAULT_BASELINE_PRIORITY: f32 = 1.0;
    pub const DEFAULT_CANNOT_REACH_INTERVAL: f32 = 10.0;

    pub fn new() -> Self {
        Self {
            close_enough: Self::DEFAULT_CLOSE_ENOUGH,
            interact_distance_factor: Self::DEFAULT_INTERACT_DISTANCE_FACTOR,
            entity_grace: Self::DEFAULT_ENTITY_GRACE,
            point_grace: Self::DEFAULT_POINT_GRACE,
            baseline_priority: Self::DEFAULT_BASELINE_PRIORITY,
            cannot_reach_interval: Self::DEFAULT_CANNOT_REACH_INTERVAL,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check("navigation.close_enough", self.close_enough)?;
        check("navigation.interact_distance_factor", self.interact_distance_factor)?;
        check("navigation.entity_grace", self.entity_grace)?;
        check("navigation.point_grace", self.point_grace)?;
        check("navigation.baseline_priority", self.baseline_priority)?;
        check("navigation.cannot_reach_interval", self.cannot_reach_interval)?;
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level crew AI settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Priority of whatever objective is the current order.
    pub order_priority: f32,

    /// Devotion gained per time unit of active pursuit.
    pub devotion_rate: f32,

    pub navigation: NavigationConfig,

    /// Timing of the leak-fixing objective.
    pub leaks: RecurringConfig,
}

impl AiConfig {
    pub const DEFAULT_DEVOTION_RATE: f32 = 0.1;

    pub fn new() -> Self {
        Self {
            order_priority: SchedulerState::DEFAULT_ORDER_PRIORITY,
            devotion_rate: Self::DEFAULT_DEVOTION_RATE,
            navigation: NavigationConfig::new(),
            leaks: RecurringConfig::new(),
        }
    }

    /// Defaults with environment overrides applied.
    ///
    /// Environment variables:
    /// - `CREW_AI_ORDER_PRIORITY` - Priority of the current order (default: 70)
    /// - `CREW_AI_DEVOTION_RATE` - Devotion gained per time unit (default: 0.1)
    /// - `CREW_AI_CLOSE_ENOUGH` - Default arrival radius (default: 0.5)
    /// - `CREW_AI_ENTITY_GRACE` - Unreachable grace for entity targets (default: 1.0)
    /// - `CREW_AI_POINT_GRACE` - Unreachable grace for point targets (default: 5.0)
    /// - `CREW_AI_TARGET_UPDATE_INTERVAL` - Leak rediscovery interval (default: 2.0)
    /// - `CREW_AI_IGNORE_LIST_CLEAR_INTERVAL` - Leak ignore-list clear interval (default: 0, never)
    pub fn from_env() -> Self {
        Self::new().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies `CREW_AI_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| parse_override::<f32>(key, lookup(key));

        if let Some(value) = read("CREW_AI_ORDER_PRIORITY") {
            self.order_priority = value;
        }
        if let Some(value) = read("CREW_AI_DEVOTION_RATE") {
            self.devotion_rate = value;
        }
        if let Some(value) = read("CREW_AI_CLOSE_ENOUGH") {
            self.navigation.close_enough = value;
        }
        if let Some(value) = read("CREW_AI_ENTITY_GRACE") {
            self.navigation.entity_grace = value;
        }
        if let Some(value) = read("CREW_AI_POINT_GRACE") {
            self.navigation.point_grace = value;
        }
        if let Some(value) = read("CREW_AI_TARGET_UPDATE_INTERVAL") {
            self.leaks.target_update_interval = value;
        }
        if let Some(value) = read("CREW_AI_IGNORE_LIST_CLEAR_INTERVAL") {
            self.leaks.ignore_list_clear_interval = value;
        }

        self
    }

    /// Load configuration from a RON file. Missing fields keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: AiConfig = ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check("devotion_rate", self.devotion_rate)?;
        self.navigation.validate()?;
        self.leaks.validate()?;
        self.scheduler()?;

        let ceiling = priority::organic_ceiling(self.order_priority);
        if self.navigation.baseline_priority > ceiling {
            return Err(ConfigError::AboveOrderTier {
                name: "navigation.baseline_priority",
                value: self.navigation.baseline_priority,
                ceiling,
            });
        }
        Ok(())
    }

    /// Scheduler state carrying the configured order priority.
    pub fn scheduler(&self) -> Result<SchedulerState> {
        Ok(SchedulerState::with_order_priority(self.order_priority)?)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn check(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}

fn parse_override<T>(key: &str, raw: Option<String>) -> Option<T>
where
    T: FromStr,
{
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a number", key, raw);
            None
        }
    }
}
