//! # System Constants
//!
//! Core constants that define the operational boundaries of the grievance
//! workflow engine: lifecycle event names published on the broadcast channel
//! and the default point awards for resolved steps.

/// Lifecycle events published by the engine for downstream consumers.
pub mod events {
    // Task lifecycle
    pub const TASK_CREATED: &str = "task.created";
    pub const TASK_STARTED: &str = "task.started";
    pub const TASK_COMPLETED: &str = "task.completed";
    pub const TASK_DELETED: &str = "task.deleted";

    // Step lifecycle
    pub const STEP_COMPLETED: &str = "step.completed";

    // Scheduled event approvals
    pub const EVENT_CREATED: &str = "event.created";
    pub const EVENT_APPROVED: &str = "event.approved";
    pub const EVENT_REJECTED: &str = "event.rejected";
    pub const APPROVAL_RECORDED: &str = "event.approval_recorded";
}

/// Default point awards for completing a step, keyed by task priority.
/// Overridable through [`crate::config::PointsConfig`].
pub mod points {
    pub const LOW_PRIORITY: i32 = 5;
    pub const MEDIUM_PRIORITY: i32 = 10;
    pub const HIGH_PRIORITY: i32 = 20;
}

/// Sentinel sub-category scope meaning "every sub-category of the category
/// not otherwise covered by a more specific template".
pub const SCOPE_ALL: &str = "all";
