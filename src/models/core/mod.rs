//! Core domain models for the grievance workflow engine.

pub mod category;
pub mod scheduled_event;
pub mod task;
pub mod task_step;
pub mod workflow_template;

pub use category::{Category, CategoryUpdate, NewCategory};
pub use scheduled_event::{
    ApprovalRecord, ApprovalStatus, ApproverRole, EventPriority, EventStatus, NewScheduledEvent,
    ScheduledEvent,
};
pub use task::{IntakeChannel, NewTask, Task, TaskPriority};
pub use task_step::{NewTaskStep, TaskStep};
pub use workflow_template::{NewWorkflowTemplate, StepTemplate, TemplateScope, WorkflowTemplate};
