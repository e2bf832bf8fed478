//! # Data Model Layer
//!
//! Domain models for tasks, steps, categories, workflow templates and
//! scheduled events. Models are plain serde structs; persistence concerns
//! live behind the [`crate::storage`] port traits so the engine can run
//! against PostgreSQL or the in-memory adapter interchangeably.

pub mod core;

pub use core::{
    ApprovalRecord, ApprovalStatus, ApproverRole, Category, CategoryUpdate, EventPriority,
    EventStatus, IntakeChannel, NewCategory, NewScheduledEvent, NewTask, NewTaskStep,
    NewWorkflowTemplate, ScheduledEvent, StepTemplate, Task, TaskPriority, TaskStep,
    TemplateScope, WorkflowTemplate,
};
