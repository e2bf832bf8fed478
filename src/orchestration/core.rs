//! # Unified Engine Facade
//!
//! Single bootstrap path wiring the registries, the task lifecycle engines
//! and the approval engine to one set of injected storage ports. Entry
//! points choose the adapter (`in_memory`, `with_postgres`) or inject their
//! own through [`CoreDependencies`]; every operation then flows through the
//! same components regardless of backend.

use std::sync::Arc;
use uuid::Uuid;

use crate::approvals::ApprovalEngine;
use crate::config::GrievanceConfig;
use crate::error::{CoreError, Result};
use crate::events::{EventPublisher, LifecycleEvent};
use crate::models::{
    Category, CategoryUpdate, NewCategory, NewWorkflowTemplate, ScheduledEvent, Task, TaskStep,
    WorkflowTemplate,
};
use crate::registry::{CategoryRegistry, TemplateRegistry};
use crate::services::{
    InMemoryPointLedger, NoopNotifier, Notifier, PointAwarder, PointLedger,
};
use crate::storage::{
    CategoryStore, EventStore, InMemoryStorage, PgStorage, TaskFilter, TaskStore, TemplateStore,
};
use crate::tenancy::TenantContext;
use tokio::sync::broadcast;

use super::step_completer::StepCompleter;
use super::task_finalizer::TaskFinalizer;
use super::task_initializer::TaskInitializer;
use super::types::{
    CompleteStepRequest, CreateEventRequest, CreateTaskRequest, CreateTemplateRequest,
    DecideApprovalRequest, StepCompletionResult, TaskInitializationResult,
};

/// Injected collaborators for a [`GrievanceCore`].
pub struct CoreDependencies {
    pub categories: Arc<dyn CategoryStore>,
    pub templates: Arc<dyn TemplateStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub events: Arc<dyn EventStore>,
    pub points: Arc<dyn PointLedger>,
    pub notifier: Arc<dyn Notifier>,
}

/// The grievance workflow engine's service surface. All operations are
/// tenant-scoped through the mandatory [`TenantContext`] parameter.
pub struct GrievanceCore {
    category_registry: CategoryRegistry,
    template_registry: Arc<TemplateRegistry>,
    task_initializer: TaskInitializer,
    step_completer: StepCompleter,
    task_finalizer: TaskFinalizer,
    approval_engine: ApprovalEngine,
    tasks: Arc<dyn TaskStore>,
    publisher: EventPublisher,
}

impl GrievanceCore {
    pub fn new(deps: CoreDependencies, config: &GrievanceConfig) -> Self {
        let publisher = EventPublisher::new(config.events.publisher_capacity);

        let template_registry = Arc::new(TemplateRegistry::new(
            deps.templates,
            deps.categories.clone(),
        ));
        let category_registry = CategoryRegistry::new(deps.categories, deps.tasks.clone());
        let task_initializer = TaskInitializer::new(
            template_registry.clone(),
            deps.tasks.clone(),
            publisher.clone(),
        );
        let awarder = PointAwarder::new(deps.points, config.points.clone());
        let step_completer = StepCompleter::new(
            deps.tasks.clone(),
            awarder,
            deps.notifier.clone(),
            publisher.clone(),
        );
        let task_finalizer = TaskFinalizer::new(deps.tasks.clone(), publisher.clone());
        let approval_engine = ApprovalEngine::new(deps.events, deps.notifier, publisher.clone());

        Self {
            category_registry,
            template_registry,
            task_initializer,
            step_completer,
            task_finalizer,
            approval_engine,
            tasks: deps.tasks,
            publisher,
        }
    }

    /// Engine over the in-memory adapter with no-op notification: the test
    /// and embedded configuration.
    pub fn in_memory(config: &GrievanceConfig) -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        Self::new(
            CoreDependencies {
                categories: storage.clone(),
                templates: storage.clone(),
                tasks: storage.clone(),
                events: storage,
                points: Arc::new(InMemoryPointLedger::new()),
                notifier: Arc::new(NoopNotifier),
            },
            config,
        )
    }

    /// Engine over the PostgreSQL adapter.
    pub fn with_postgres(pool: sqlx::PgPool, config: &GrievanceConfig) -> Self {
        let storage = Arc::new(PgStorage::new(pool));
        Self::new(
            CoreDependencies {
                categories: storage.clone(),
                templates: storage.clone(),
                tasks: storage.clone(),
                events: storage,
                points: Arc::new(InMemoryPointLedger::new()),
                notifier: Arc::new(NoopNotifier),
            },
            config,
        )
    }

    // --- task lifecycle ---

    pub async fn create_task(
        &self,
        ctx: &TenantContext,
        request: CreateTaskRequest,
    ) -> Result<TaskInitializationResult> {
        self.task_initializer.create_task(ctx, request).await
    }

    pub async fn complete_step(
        &self,
        ctx: &TenantContext,
        request: CompleteStepRequest,
    ) -> Result<StepCompletionResult> {
        self.step_completer.complete_step(ctx, request).await
    }

    /// Direct completion for tasks without an attached workflow.
    pub async fn complete_task(
        &self,
        ctx: &TenantContext,
        task_uuid: Uuid,
        actor_uuid: Uuid,
    ) -> Result<Task> {
        self.task_finalizer.complete_task(ctx, task_uuid, actor_uuid).await
    }

    pub async fn soft_delete_task(&self, ctx: &TenantContext, task_uuid: Uuid) -> Result<()> {
        self.task_finalizer.soft_delete_task(ctx, task_uuid).await
    }

    pub async fn get_task(&self, ctx: &TenantContext, task_uuid: Uuid) -> Result<Task> {
        self.tasks
            .find(ctx, task_uuid)
            .await?
            .ok_or(CoreError::TaskNotFound(task_uuid))
    }

    pub async fn list_tasks(&self, ctx: &TenantContext, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self.tasks.list(ctx, filter).await?)
    }

    /// A task's steps ordered by sequence. Visibility follows the task:
    /// cross-tenant and soft-deleted tasks yield `TaskNotFound`.
    pub async fn list_task_steps(
        &self,
        ctx: &TenantContext,
        task_uuid: Uuid,
    ) -> Result<Vec<TaskStep>> {
        let task = self.get_task(ctx, task_uuid).await?;
        Ok(self.tasks.steps_for_task(task.task_uuid).await?)
    }

    // --- reference data ---

    pub async fn create_category(
        &self,
        ctx: &TenantContext,
        category: NewCategory,
    ) -> Result<Category> {
        self.category_registry.create_category(ctx, category).await
    }

    pub async fn update_category(
        &self,
        ctx: &TenantContext,
        category_uuid: Uuid,
        update: CategoryUpdate,
    ) -> Result<Category> {
        self.category_registry
            .update_category(ctx, category_uuid, update)
            .await
    }

    pub async fn delete_category(&self, ctx: &TenantContext, category_uuid: Uuid) -> Result<()> {
        self.category_registry.delete_category(ctx, category_uuid).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.category_registry.list_categories().await
    }

    pub async fn get_category(&self, slug: &str) -> Result<Category> {
        self.category_registry.get_by_slug(slug).await
    }

    pub async fn create_workflow_template(
        &self,
        ctx: &TenantContext,
        request: CreateTemplateRequest,
    ) -> Result<WorkflowTemplate> {
        let template = NewWorkflowTemplate {
            category_uuid: request.category_uuid,
            scope: request.scope,
            sla_days: request.sla_days,
            sla_hours: request.sla_hours,
            warning_threshold: request.warning_threshold,
            steps: request.steps,
        };
        self.template_registry.create_template(ctx, template).await
    }

    /// Resolve which template applies to (category, sub-category); `None`
    /// when the category has no matching workflow.
    pub async fn resolve_workflow(
        &self,
        category_slug: &str,
        sub_category: Option<&str>,
    ) -> Result<Option<WorkflowTemplate>> {
        self.template_registry.resolve(category_slug, sub_category).await
    }

    // --- scheduled events ---

    pub async fn create_event(
        &self,
        ctx: &TenantContext,
        request: CreateEventRequest,
    ) -> Result<ScheduledEvent> {
        self.approval_engine.create_event(ctx, request).await
    }

    pub async fn decide_approval(
        &self,
        ctx: &TenantContext,
        request: DecideApprovalRequest,
    ) -> Result<ScheduledEvent> {
        self.approval_engine.decide_approval(ctx, request).await
    }

    pub async fn get_event(
        &self,
        ctx: &TenantContext,
        event_uuid: Uuid,
    ) -> Result<ScheduledEvent> {
        self.approval_engine.get_event(ctx, event_uuid).await
    }

    // --- observability ---

    pub fn subscribe_events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.publisher.subscribe()
    }
}
