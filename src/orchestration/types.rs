//! # Operation Payloads
//!
//! Explicit tagged request/response structs for every core operation,
//! validated at the boundary before any state change reaches the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    EventPriority, IntakeChannel, StepTemplate, Task, TaskPriority, TaskStep, TemplateScope,
};
use crate::state_machine::states::TaskStatus;
use crate::validation;
use chrono::{DateTime, Utc};

/// Request to open a new grievance task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub summary: Option<String>,
    pub category: String,
    pub sub_category: Option<String>,
    #[serde(default)]
    pub channel: IntakeChannel,
    #[serde(default)]
    pub priority: TaskPriority,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<()> {
        validation::validate_title("task title", &self.title)?;
        validation::validate_text("task summary", self.summary.as_deref())?;
        validation::validate_slug(&self.category)?;
        Ok(())
    }
}

/// Result of task creation: the task plus whatever checklist was attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInitializationResult {
    pub task: Task,
    pub steps: Vec<TaskStep>,
    /// Template the checklist was cloned from, `None` for manual tasks
    pub template_uuid: Option<Uuid>,
}

impl TaskInitializationResult {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Request to complete one step of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteStepRequest {
    pub task_uuid: Uuid,
    pub step_uuid: Uuid,
    pub actor_uuid: Uuid,
    pub notes: Option<String>,
}

impl CompleteStepRequest {
    pub fn validate(&self) -> Result<()> {
        validation::validate_text("step notes", self.notes.as_deref())
    }
}

/// A best-effort side effect that failed after the primary transition
/// committed. Informational: the operation itself succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffectFailure {
    /// Which effect failed, e.g. `point_award`, `notification`
    pub effect: String,
    pub detail: String,
}

/// Result of a step completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCompletionResult {
    pub step: TaskStep,
    pub task_status: TaskStatus,
    pub progress: i32,
    /// Whether this completion finished the whole task
    pub task_completed: bool,
    /// Non-fatal side-effect failures, already logged
    pub side_effect_failures: Vec<SideEffectFailure>,
}

/// Request to create a workflow template for a category scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub category_uuid: Uuid,
    /// `"all"` or an exact sub-category label
    pub scope: TemplateScope,
    pub sla_days: i32,
    pub sla_hours: i32,
    pub warning_threshold: i32,
    pub steps: Vec<StepTemplate>,
}

/// Request to schedule an event requiring approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub event_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub priority: EventPriority,
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<()> {
        validation::validate_title("event title", &self.title)?;
        validation::validate_title("event type", &self.event_type)?;
        Ok(())
    }
}

/// Approve or reject one stage of an event's approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideApprovalRequest {
    pub event_uuid: Uuid,
    /// 0-based stage the decision targets; must be the event's current stage
    pub stage: i32,
    pub decision: ApprovalDecision,
    pub actor_uuid: Uuid,
}
