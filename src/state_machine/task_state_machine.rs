//! # Task State Machine
//!
//! Pure transition table for the monotonic task lifecycle
//! `open -> in_progress -> completed`. The table is side-effect free: the
//! orchestration layer resolves the target state here, then persists the
//! whole read-modify-write unit through the storage port in one conditional
//! update.

use super::events::TaskEvent;
use super::states::TaskStatus;
use crate::error::{CoreError, Result};

/// Resolve the target state for `event` from `current`, or fail when the
/// transition is not part of the lifecycle.
pub fn next_state(current: TaskStatus, event: TaskEvent) -> Result<TaskStatus> {
    let target = match (current, event) {
        (TaskStatus::Open, TaskEvent::Start) => TaskStatus::InProgress,
        (TaskStatus::InProgress, TaskEvent::Complete) => TaskStatus::Completed,
        // Direct completion of a stepless task skips in_progress entirely
        (TaskStatus::Open, TaskEvent::CompleteManually) => TaskStatus::Completed,

        (TaskStatus::Completed, event) => {
            return Err(CoreError::AlreadyCompleted(format!(
                "task is already completed, cannot apply '{}'",
                event.event_type()
            )))
        }
        (from, event) => {
            return Err(CoreError::Internal(format!(
                "invalid task transition: '{}' from state '{from}'",
                event.event_type()
            )))
        }
    };

    Ok(target)
}
