//! # Task Step Model
//!
//! Per-task, mutable copy of a workflow template step. Steps are materialized
//! once at task creation (a value copy, never a live reference), so template
//! edits after the fact cannot retroactively alter an in-flight task.
//!
//! `sequence`, `title`, `description` and `required` are immutable after
//! attachment; only completion state, actor, timestamp and notes change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::states::StepStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    pub task_step_uuid: Uuid,
    pub task_uuid: Uuid,
    /// 1-based position within the task's checklist, inherited from the template
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    /// Required steps gate later steps and task completion; optional steps do not
    pub required: bool,
    pub status: StepStatus,
    pub completed_by: Option<Uuid>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New step record, produced by the step attacher from a template step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTaskStep {
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
}

impl TaskStep {
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Apply a completion to this step, recording who and when.
    pub fn complete(&mut self, actor: Uuid, notes: Option<String>, at: DateTime<Utc>) {
        self.status = StepStatus::Completed;
        self.completed_by = Some(actor);
        self.completed_at = Some(at);
        self.notes = notes;
        self.updated_at = at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_records_actor_and_timestamp() {
        let now = Utc::now();
        let actor = Uuid::new_v4();
        let mut step = TaskStep {
            task_step_uuid: Uuid::new_v4(),
            task_uuid: Uuid::new_v4(),
            sequence: 1,
            title: "Verify complaint details".to_string(),
            description: None,
            required: true,
            status: StepStatus::Pending,
            completed_by: None,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        step.complete(actor, Some("spoke with the complainant".to_string()), now);

        assert!(step.is_completed());
        assert_eq!(step.completed_by, Some(actor));
        assert_eq!(step.completed_at, Some(now));
        assert_eq!(step.notes.as_deref(), Some("spoke with the complainant"));
    }
}
