//! # Structured Error Handling
//!
//! Crate-wide error taxonomy for the grievance workflow engine. Every failure
//! carries enough context (which step, which predecessor, which stage) for a
//! caller to present an actionable message.
//!
//! Sequencing and completion errors (`SequenceViolation`, `AlreadyCompleted`,
//! `ConcurrentModification`) are recoverable: the caller may retry with a
//! corrected request, and the atomic update unit guarantees no partial state
//! was applied. Validation errors are rejected before any state change.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("category still referenced by existing tasks: {0}")]
    CategoryInUse(String),

    #[error("workflow template conflict: {0}")]
    TemplateConflict(String),

    #[error("task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("task step not found: {0}")]
    StepNotFound(Uuid),

    #[error(
        "step {step_sequence} is blocked by incomplete required step \
         {predecessor_sequence} ({predecessor_title})"
    )]
    SequenceViolation {
        step_sequence: i32,
        predecessor_sequence: i32,
        predecessor_title: String,
    },

    #[error("already completed: {0}")]
    AlreadyCompleted(String),

    #[error("scheduled event not found: {0}")]
    EventNotFound(Uuid),

    #[error("approval chain exhausted: {0}")]
    ApprovalChainExhausted(String),

    #[error("approval stage mismatch: expected stage {expected}, got {got}")]
    StageMismatch { expected: i32, got: i32 },

    #[error("concurrent modification detected, retry the operation")]
    ConcurrentModification,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Whether a retry of the same logical request can succeed once the
    /// underlying condition clears.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SequenceViolation { .. } | Self::ConcurrentModification
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_violation_names_predecessor() {
        let err = CoreError::SequenceViolation {
            step_sequence: 3,
            predecessor_sequence: 1,
            predecessor_title: "Site inspection".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("step 3"));
        assert!(msg.contains("required step 1"));
        assert!(msg.contains("Site inspection"));
    }

    #[test]
    fn recoverability_classification() {
        assert!(CoreError::ConcurrentModification.is_recoverable());
        assert!(!CoreError::AlreadyCompleted("step".into()).is_recoverable());
        assert!(!CoreError::InvalidInput("bad slug".into()).is_recoverable());
    }
}
