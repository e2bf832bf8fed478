//! # Transition Guards
//!
//! Pure guard checks evaluated before a step completion is applied. Guards
//! operate on the step snapshot loaded inside the atomic update unit, so a
//! passing check cannot be invalidated by a concurrent writer: the
//! conditional task update catches the race and the caller retries.

use crate::error::{CoreError, Result};
use crate::models::{Task, TaskStep};

/// Check that `step` may be completed right now: the owning task must not be
/// terminal, the step must not already be completed, and every required step
/// earlier in the sequence must be complete.
pub fn ensure_step_completable(task: &Task, step: &TaskStep, steps: &[TaskStep]) -> Result<()> {
    if task.status.is_terminal() {
        return Err(CoreError::AlreadyCompleted(format!(
            "task {} is already completed",
            task.task_uuid
        )));
    }

    if step.is_completed() {
        return Err(CoreError::AlreadyCompleted(format!(
            "step {} (sequence {}) is already completed",
            step.task_step_uuid, step.sequence
        )));
    }

    if let Some(predecessor) = first_unmet_required_before(steps, step.sequence) {
        return Err(CoreError::SequenceViolation {
            step_sequence: step.sequence,
            predecessor_sequence: predecessor.sequence,
            predecessor_title: predecessor.title.clone(),
        });
    }

    Ok(())
}

/// The earliest required, still-pending step with a sequence number below
/// `sequence`. Optional steps never block.
pub fn first_unmet_required_before(steps: &[TaskStep], sequence: i32) -> Option<&TaskStep> {
    steps
        .iter()
        .filter(|s| s.required && !s.is_completed() && s.sequence < sequence)
        .min_by_key(|s| s.sequence)
}

/// Whether every required step is complete. Optional steps do not block task
/// completion.
pub fn all_required_complete(steps: &[TaskStep]) -> bool {
    steps.iter().filter(|s| s.required).all(|s| s.is_completed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntakeChannel;
    use crate::models::TaskPriority;
    use crate::state_machine::states::{StepStatus, TaskStatus};
    use chrono::Utc;
    use uuid::Uuid;

    fn step(sequence: i32, required: bool, completed: bool) -> TaskStep {
        let now = Utc::now();
        TaskStep {
            task_step_uuid: Uuid::new_v4(),
            task_uuid: Uuid::nil(),
            sequence,
            title: format!("Step {sequence}"),
            description: None,
            required,
            status: if completed { StepStatus::Completed } else { StepStatus::Pending },
            completed_by: None,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn task(status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            task_uuid: Uuid::new_v4(),
            tenant_uuid: Uuid::new_v4(),
            title: "No water supply".to_string(),
            summary: None,
            category: "water".to_string(),
            sub_category: None,
            channel: IntakeChannel::Manual,
            priority: TaskPriority::Medium,
            status,
            progress: 0,
            deleted: false,
            lock_version: 1,
            sla_due_at: None,
            sla_warning_threshold: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[test]
    fn blocks_on_earliest_unmet_required_predecessor() {
        let steps = vec![step(1, true, false), step(2, true, false), step(3, true, false)];
        let err = ensure_step_completable(&task(TaskStatus::Open), &steps[2], &steps).unwrap_err();
        match err {
            CoreError::SequenceViolation {
                step_sequence,
                predecessor_sequence,
                ..
            } => {
                assert_eq!(step_sequence, 3);
                assert_eq!(predecessor_sequence, 1);
            }
            other => panic!("expected SequenceViolation, got {other:?}"),
        }
    }

    #[test]
    fn optional_predecessors_do_not_block() {
        let steps = vec![step(1, false, false), step(2, true, false)];
        assert!(ensure_step_completable(&task(TaskStatus::Open), &steps[1], &steps).is_ok());
    }

    #[test]
    fn optional_step_still_respects_required_predecessors() {
        let steps = vec![step(1, true, false), step(2, false, false)];
        let err = ensure_step_completable(&task(TaskStatus::Open), &steps[1], &steps).unwrap_err();
        assert!(matches!(err, CoreError::SequenceViolation { .. }));
    }

    #[test]
    fn optional_steps_may_complete_out_of_order() {
        let steps = vec![step(1, true, true), step(2, false, false), step(3, false, false)];
        assert!(ensure_step_completable(&task(TaskStatus::InProgress), &steps[2], &steps).is_ok());
    }

    #[test]
    fn completed_step_rejected() {
        let steps = vec![step(1, true, true)];
        let err = ensure_step_completable(&task(TaskStatus::InProgress), &steps[0], &steps)
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyCompleted(_)));
    }

    #[test]
    fn completed_task_rejects_any_step() {
        let steps = vec![step(1, true, false)];
        let err = ensure_step_completable(&task(TaskStatus::Completed), &steps[0], &steps)
            .unwrap_err();
        assert!(matches!(err, CoreError::AlreadyCompleted(_)));
    }

    #[test]
    fn required_completion_ignores_optional_steps() {
        let steps = vec![step(1, true, true), step(2, false, false)];
        assert!(all_required_complete(&steps));

        let steps = vec![step(1, true, true), step(2, true, false)];
        assert!(!all_required_complete(&steps));
    }
}
