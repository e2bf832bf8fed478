//! # Storage Ports
//!
//! Persistence is injected through narrow async port traits so the engine is
//! testable without a live database. Two adapters implement the ports: the
//! [`memory`] adapter (unit/integration tests, embedded use) and the
//! [`postgres`] adapter backed by SQLx.
//!
//! ## Atomicity contract
//!
//! Step completion plus progress recomputation must land as one unit.
//! [`TaskStore::commit_step_completion`] and the other conditional writes
//! take the `lock_version` the caller read; an adapter must apply the write
//! only if the stored version still matches, bump the version, and fail with
//! [`StorageError::VersionConflict`] otherwise. The in-memory adapter holds a
//! store-wide write lock for the check-and-swap; the PostgreSQL adapter uses
//! a conditional `UPDATE` inside a transaction.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    ApprovalRecord, Category, CategoryUpdate, NewCategory, NewScheduledEvent, NewTask,
    NewTaskStep, NewWorkflowTemplate, ScheduledEvent, Task, TaskPriority, TaskStep,
    TemplateScope, WorkflowTemplate,
};
use crate::state_machine::states::TaskStatus;
use crate::tenancy::TenantContext;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Optimistic-concurrency check failed; the row moved under the caller
    #[error("row version conflict")]
    VersionConflict,

    /// Uniqueness constraint violated (slug, template scope)
    #[error("uniqueness conflict: {0}")]
    Conflict(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
        }
        Self::Backend(err.to_string())
    }
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::VersionConflict => Self::ConcurrentModification,
            StorageError::Conflict(msg) => Self::InvalidInput(format!("uniqueness violation: {msg}")),
            StorageError::Backend(msg) => Self::Storage(msg),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Filter for tenant-scoped task listings. Soft-deleted rows are always
/// excluded by the adapter.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub priority: Option<TaskPriority>,
}

/// Category reference data. Global, not tenant-scoped.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Insert a category; `Conflict` when the slug already exists.
    async fn insert(&self, category: NewCategory) -> StorageResult<Category>;

    /// Apply a partial update; `None` when the category does not exist.
    async fn update(&self, category_uuid: Uuid, update: CategoryUpdate)
        -> StorageResult<Option<Category>>;

    /// Delete a category; `false` when it did not exist. Referential guards
    /// are the registry's responsibility.
    async fn delete(&self, category_uuid: Uuid) -> StorageResult<bool>;

    async fn find_by_slug(&self, slug: &str) -> StorageResult<Option<Category>>;

    async fn find_by_uuid(&self, category_uuid: Uuid) -> StorageResult<Option<Category>>;

    async fn list(&self) -> StorageResult<Vec<Category>>;
}

/// Workflow templates and their ordered step templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Insert a template; `Conflict` when the (category, scope) pair is taken.
    async fn insert(&self, template: NewWorkflowTemplate) -> StorageResult<WorkflowTemplate>;

    async fn find_by_scope(
        &self,
        category_uuid: Uuid,
        scope: &TemplateScope,
    ) -> StorageResult<Option<WorkflowTemplate>>;

    async fn list_for_category(&self, category_uuid: Uuid)
        -> StorageResult<Vec<WorkflowTemplate>>;
}

/// Tasks and their exclusively-owned step records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task and attach its materialized steps in one unit. The
    /// adapter initializes lifecycle fields: status `open`, progress 0,
    /// `lock_version` 1.
    async fn insert_with_steps(
        &self,
        task: NewTask,
        steps: Vec<NewTaskStep>,
    ) -> StorageResult<(Task, Vec<TaskStep>)>;

    /// Tenant-scoped lookup; soft-deleted rows and rows outside the caller's
    /// tenant are invisible.
    async fn find(&self, ctx: &TenantContext, task_uuid: Uuid) -> StorageResult<Option<Task>>;

    /// Tenant-scoped filtered listing, newest first.
    async fn list(&self, ctx: &TenantContext, filter: &TaskFilter) -> StorageResult<Vec<Task>>;

    /// All steps of a task ordered by sequence. Visibility of the owning
    /// task must already have been established by the caller.
    async fn steps_for_task(&self, task_uuid: Uuid) -> StorageResult<Vec<TaskStep>>;

    /// Whether any task (including soft-deleted ones) references the slug.
    async fn category_in_use(&self, category_slug: &str) -> StorageResult<bool>;

    /// Persist an updated step together with its recomputed task row, iff the
    /// task's stored `lock_version` equals `expected_version`.
    async fn commit_step_completion(
        &self,
        task: &Task,
        expected_version: i64,
        step: &TaskStep,
    ) -> StorageResult<()>;

    /// Conditionally persist a task row alone (manual completion, soft
    /// deletion).
    async fn update_task(&self, task: &Task, expected_version: i64) -> StorageResult<()>;
}

/// Scheduled events and their approval chains.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create an event with its materialized approval records; the adapter
    /// initializes status `pending`, stage 0, `lock_version` 1.
    async fn insert(
        &self,
        event: NewScheduledEvent,
        approvals: Vec<ApprovalRecord>,
    ) -> StorageResult<ScheduledEvent>;

    /// Tenant-scoped lookup.
    async fn find(
        &self,
        ctx: &TenantContext,
        event_uuid: Uuid,
    ) -> StorageResult<Option<ScheduledEvent>>;

    /// Conditionally persist a decided event (records + stage + status).
    async fn update(&self, event: &ScheduledEvent, expected_version: i64) -> StorageResult<()>;
}
