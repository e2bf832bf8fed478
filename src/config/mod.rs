//! # Configuration System
//!
//! Environment-aware YAML configuration. A base `grievance.yaml` is loaded
//! from the config directory and merged with an optional per-environment
//! override file (`grievance-production.yaml`, ...). Every section has
//! sensible defaults so an empty or missing file still yields a usable
//! configuration for embedded/in-memory use.

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use crate::constants::points;
use crate::models::TaskPriority;

/// Root configuration structure mirroring `grievance.yaml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GrievanceConfig {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub points: PointsConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

/// Connection settings for the PostgreSQL adapter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `None` selects the in-memory adapter
    pub url: Option<String>,
    pub pool: u32,
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool: 10,
            connect_timeout_seconds: 10,
        }
    }
}

/// Workflow attachment defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Warning threshold applied when a template does not set one
    pub default_warning_threshold: i32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_warning_threshold: 80,
        }
    }
}

/// Point awards per completed step, keyed by task priority.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PointsConfig {
    pub low: i32,
    pub medium: i32,
    pub high: i32,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            low: points::LOW_PRIORITY,
            medium: points::MEDIUM_PRIORITY,
            high: points::HIGH_PRIORITY,
        }
    }
}

impl PointsConfig {
    pub fn for_priority(&self, priority: TaskPriority) -> i32 {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
        }
    }
}

/// Lifecycle event broadcast settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub publisher_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            publisher_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = PointsConfig::default();
        assert_eq!(config.for_priority(TaskPriority::Low), 5);
        assert_eq!(config.for_priority(TaskPriority::Medium), 10);
        assert_eq!(config.for_priority(TaskPriority::High), 20);
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: GrievanceConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.database.pool, 10);
        assert_eq!(config.workflow.default_warning_threshold, 80);
        assert_eq!(config.events.publisher_capacity, 1024);
    }
}
