//! # Task and Step State Management
//!
//! Lifecycle states, the pure transition table, and the guard checks the
//! orchestration layer evaluates inside its atomic update unit.

pub mod events;
pub mod guards;
pub mod states;
pub mod task_state_machine;

pub use events::TaskEvent;
pub use guards::{all_required_complete, ensure_step_completable, first_unmet_required_before};
pub use states::{StepStatus, TaskStatus};
pub use task_state_machine::next_state;
