//! # Workflow Orchestration
//!
//! The request-scoped engines behind the service surface: task creation with
//! workflow attachment, the atomic step-completion unit with progress
//! recomputation, task-level finalization, and the facade wiring them to the
//! storage ports.

pub mod core;
pub mod progress;
pub mod step_completer;
pub mod task_finalizer;
pub mod task_initializer;
pub mod types;

pub use core::{CoreDependencies, GrievanceCore};
pub use progress::completion_percent;
pub use step_completer::StepCompleter;
pub use task_finalizer::TaskFinalizer;
pub use task_initializer::{attach_steps, TaskInitializer};
pub use types::{
    ApprovalDecision, CompleteStepRequest, CreateEventRequest, CreateTaskRequest,
    CreateTemplateRequest, DecideApprovalRequest, SideEffectFailure, StepCompletionResult,
    TaskInitializationResult,
};
