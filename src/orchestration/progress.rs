//! # Progress Calculator
//!
//! Derives the 0-100 completion percentage from a task's step records. The
//! percentage is a denormalized cache persisted on the task row; the step set
//! is always the source of truth. With zero steps the progress is defined as
//! 0 and never auto-derived: stepless tasks only reach 100 through direct
//! completion.

use crate::models::TaskStep;

/// `round(100 * completed / total)`; 0 when the task has no steps.
pub fn completion_percent(steps: &[TaskStep]) -> i32 {
    let total = steps.len();
    if total == 0 {
        return 0;
    }
    let completed = steps.iter().filter(|s| s.is_completed()).count();
    (completed as f64 / total as f64 * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::states::StepStatus;
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn steps(completed: usize, pending: usize) -> Vec<TaskStep> {
        let now = Utc::now();
        (0..completed + pending)
            .map(|i| TaskStep {
                task_step_uuid: Uuid::new_v4(),
                task_uuid: Uuid::nil(),
                sequence: i as i32 + 1,
                title: format!("Step {}", i + 1),
                description: None,
                required: true,
                status: if i < completed { StepStatus::Completed } else { StepStatus::Pending },
                completed_by: None,
                completed_at: None,
                notes: None,
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    #[test]
    fn three_step_progression_rounds_half_up() {
        assert_eq!(completion_percent(&steps(0, 3)), 0);
        assert_eq!(completion_percent(&steps(1, 2)), 33);
        assert_eq!(completion_percent(&steps(2, 1)), 67);
        assert_eq!(completion_percent(&steps(3, 0)), 100);
    }

    #[test]
    fn zero_steps_is_zero_progress() {
        assert_eq!(completion_percent(&[]), 0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let set = steps(2, 3);
        assert_eq!(completion_percent(&set), completion_percent(&set));
    }

    proptest! {
        #[test]
        fn percent_is_bounded(completed in 0usize..30, pending in 0usize..30) {
            let pct = completion_percent(&steps(completed, pending));
            prop_assert!((0..=100).contains(&pct));
        }

        #[test]
        fn completing_a_step_never_decreases_progress(completed in 0usize..30, pending in 1usize..30) {
            let before = completion_percent(&steps(completed, pending));
            let after = completion_percent(&steps(completed + 1, pending - 1));
            prop_assert!(after >= before);
        }

        #[test]
        fn all_completed_is_exactly_100(total in 1usize..50) {
            prop_assert_eq!(completion_percent(&steps(total, 0)), 100);
        }
    }
}
