use serde::{Deserialize, Serialize};

/// Events that drive task state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEvent {
    /// First step completion on an open task
    Start,
    /// Every required step is now complete
    Complete,
    /// Direct completion of a task with no attached workflow
    CompleteManually,
}

impl TaskEvent {
    /// String form used in logs and transition errors.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::CompleteManually => "complete_manually",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::CompleteManually)
    }
}
