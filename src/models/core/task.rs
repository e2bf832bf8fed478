//! # Task Model
//!
//! The grievance record. A task arrives through one of the intake channels,
//! is classified by category/sub-category, and carries a denormalized
//! progress percentage derived from its attached steps. The step set is the
//! source of truth; `progress` is a cache recomputed after every step change.
//!
//! Tasks are tenant-scoped and soft-deleted: a deleted task stays in storage
//! with `deleted = true` and is invisible to every read path. The
//! `lock_version` column backs the optimistic-concurrency check that makes
//! step completion plus progress recomputation a single atomic unit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::state_machine::states::TaskStatus;

/// Task priority. Drives the point award granted for each completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid task priority: {s}")),
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Channel a grievance arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeChannel {
    Qr,
    Ivr,
    Bot,
    WalkIn,
    Email,
    Manual,
}

impl fmt::Display for IntakeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qr => write!(f, "qr"),
            Self::Ivr => write!(f, "ivr"),
            Self::Bot => write!(f, "bot"),
            Self::WalkIn => write!(f, "walk_in"),
            Self::Email => write!(f, "email"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for IntakeChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qr" => Ok(Self::Qr),
            "ivr" => Ok(Self::Ivr),
            "bot" => Ok(Self::Bot),
            "walk_in" => Ok(Self::WalkIn),
            "email" => Ok(Self::Email),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Invalid intake channel: {s}")),
        }
    }
}

impl Default for IntakeChannel {
    fn default() -> Self {
        Self::Manual
    }
}

/// A citizen-reported issue tracked to resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_uuid: Uuid,
    pub tenant_uuid: Uuid,
    pub title: String,
    pub summary: Option<String>,
    /// Category slug, referencing `Category::value`
    pub category: String,
    pub sub_category: Option<String>,
    pub channel: IntakeChannel,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Denormalized 0-100 completion cache; source of truth is the step set
    pub progress: i32,
    pub deleted: bool,
    /// Optimistic-concurrency version, bumped on every task mutation
    pub lock_version: i64,
    /// Resolution deadline stamped from the matched template's SLA
    pub sla_due_at: Option<DateTime<Utc>>,
    /// Warning threshold percent copied from the matched template
    pub sla_warning_threshold: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// New task for creation. Lifecycle fields (status, progress, lock_version)
/// are initialized by the storage adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub tenant_uuid: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub channel: IntakeChannel,
    pub priority: TaskPriority,
    pub sla_due_at: Option<DateTime<Utc>>,
    pub sla_warning_threshold: Option<i32>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fraction of the SLA window already consumed, as a 0-100 percentage.
    /// `None` when the task has no SLA or the window is degenerate.
    pub fn sla_elapsed_percent(&self, now: DateTime<Utc>) -> Option<i32> {
        let due = self.sla_due_at?;
        let window = due - self.created_at;
        if window <= Duration::zero() {
            return None;
        }
        let elapsed = now - self.created_at;
        let percent =
            (elapsed.num_seconds() as f64 / window.num_seconds() as f64 * 100.0).round() as i64;
        Some(percent.clamp(0, i64::from(i32::MAX)) as i32)
    }

    /// Whether the task has crossed its template's SLA warning threshold
    /// without being completed.
    pub fn sla_at_risk(&self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }
        match (self.sla_elapsed_percent(now), self.sla_warning_threshold) {
            (Some(elapsed), Some(threshold)) => elapsed >= threshold,
            _ => false,
        }
    }
}
