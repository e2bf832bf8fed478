//! # In-Memory Storage Adapter
//!
//! DashMap-backed implementation of the storage ports used by the test
//! suites and embedded deployments. Multi-row writes take a store-wide
//! `parking_lot` mutex so the optimistic-concurrency contract matches the
//! PostgreSQL adapter: a conditional write observes a consistent snapshot,
//! and a stale `lock_version` fails with `VersionConflict` instead of
//! clobbering a concurrent update.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::{
    ApprovalRecord, Category, CategoryUpdate, EventStatus, NewCategory, NewScheduledEvent,
    NewTask, NewTaskStep, NewWorkflowTemplate, ScheduledEvent, Task, TaskStep, TemplateScope,
    WorkflowTemplate,
};
use crate::state_machine::states::{StepStatus, TaskStatus};
use crate::tenancy::TenantContext;

use super::{
    CategoryStore, EventStore, StorageError, StorageResult, TaskFilter, TaskStore, TemplateStore,
};

/// All five entity maps in one struct; implements every storage port.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    categories: DashMap<Uuid, Category>,
    templates: DashMap<Uuid, WorkflowTemplate>,
    tasks: DashMap<Uuid, Task>,
    steps: DashMap<Uuid, TaskStep>,
    events: DashMap<Uuid, ScheduledEvent>,
    /// Serializes multi-map writes and version check-and-swaps
    write_lock: Mutex<()>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryStorage {
    async fn insert(&self, category: NewCategory) -> StorageResult<Category> {
        let _guard = self.write_lock.lock();
        if self.categories.iter().any(|c| c.value == category.value) {
            return Err(StorageError::Conflict(format!(
                "category slug '{}' already exists",
                category.value
            )));
        }

        let now = Utc::now();
        let row = Category {
            category_uuid: Uuid::new_v4(),
            value: category.value,
            label: category.label,
            sub_categories: category.sub_categories,
            created_at: now,
            updated_at: now,
        };
        self.categories.insert(row.category_uuid, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        category_uuid: Uuid,
        update: CategoryUpdate,
    ) -> StorageResult<Option<Category>> {
        let _guard = self.write_lock.lock();
        let Some(mut entry) = self.categories.get_mut(&category_uuid) else {
            return Ok(None);
        };
        if let Some(label) = update.label {
            entry.label = label;
        }
        if let Some(subs) = update.sub_categories {
            entry.sub_categories = subs;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, category_uuid: Uuid) -> StorageResult<bool> {
        let _guard = self.write_lock.lock();
        Ok(self.categories.remove(&category_uuid).is_some())
    }

    async fn find_by_slug(&self, slug: &str) -> StorageResult<Option<Category>> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.value == slug)
            .map(|c| c.value().clone()))
    }

    async fn find_by_uuid(&self, category_uuid: Uuid) -> StorageResult<Option<Category>> {
        Ok(self.categories.get(&category_uuid).map(|c| c.value().clone()))
    }

    async fn list(&self) -> StorageResult<Vec<Category>> {
        let mut rows: Vec<Category> = self.categories.iter().map(|c| c.value().clone()).collect();
        rows.sort_by(|a, b| a.value.cmp(&b.value));
        Ok(rows)
    }
}

#[async_trait]
impl TemplateStore for InMemoryStorage {
    async fn insert(&self, template: NewWorkflowTemplate) -> StorageResult<WorkflowTemplate> {
        let _guard = self.write_lock.lock();
        let taken = self
            .templates
            .iter()
            .any(|t| t.category_uuid == template.category_uuid && t.scope == template.scope);
        if taken {
            return Err(StorageError::Conflict(format!(
                "template scope '{}' already covered for category {}",
                template.scope, template.category_uuid
            )));
        }

        let row = WorkflowTemplate {
            template_uuid: Uuid::new_v4(),
            category_uuid: template.category_uuid,
            scope: template.scope,
            sla_days: template.sla_days,
            sla_hours: template.sla_hours,
            warning_threshold: template.warning_threshold,
            steps: template.steps,
            created_at: Utc::now(),
        };
        self.templates.insert(row.template_uuid, row.clone());
        Ok(row)
    }

    async fn find_by_scope(
        &self,
        category_uuid: Uuid,
        scope: &TemplateScope,
    ) -> StorageResult<Option<WorkflowTemplate>> {
        Ok(self
            .templates
            .iter()
            .find(|t| t.category_uuid == category_uuid && t.scope == *scope)
            .map(|t| t.value().clone()))
    }

    async fn list_for_category(
        &self,
        category_uuid: Uuid,
    ) -> StorageResult<Vec<WorkflowTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.category_uuid == category_uuid)
            .map(|t| t.value().clone())
            .collect())
    }
}

#[async_trait]
impl TaskStore for InMemoryStorage {
    async fn insert_with_steps(
        &self,
        task: NewTask,
        steps: Vec<NewTaskStep>,
    ) -> StorageResult<(Task, Vec<TaskStep>)> {
        let _guard = self.write_lock.lock();
        let now = Utc::now();
        let task_row = Task {
            task_uuid: Uuid::new_v4(),
            tenant_uuid: task.tenant_uuid,
            title: task.title,
            summary: task.summary,
            category: task.category,
            sub_category: task.sub_category,
            channel: task.channel,
            priority: task.priority,
            status: TaskStatus::Open,
            progress: 0,
            deleted: false,
            lock_version: 1,
            sla_due_at: task.sla_due_at,
            sla_warning_threshold: task.sla_warning_threshold,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        let step_rows: Vec<TaskStep> = steps
            .into_iter()
            .map(|s| TaskStep {
                task_step_uuid: Uuid::new_v4(),
                task_uuid: task_row.task_uuid,
                sequence: s.sequence,
                title: s.title,
                description: s.description,
                required: s.required,
                status: StepStatus::Pending,
                completed_by: None,
                completed_at: None,
                notes: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        self.tasks.insert(task_row.task_uuid, task_row.clone());
        for step in &step_rows {
            self.steps.insert(step.task_step_uuid, step.clone());
        }
        Ok((task_row, step_rows))
    }

    async fn find(&self, ctx: &TenantContext, task_uuid: Uuid) -> StorageResult<Option<Task>> {
        Ok(self
            .tasks
            .get(&task_uuid)
            .filter(|t| !t.deleted && ctx.can_view(t.tenant_uuid))
            .map(|t| t.value().clone()))
    }

    async fn list(&self, ctx: &TenantContext, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let mut rows: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| !t.deleted && ctx.can_view(t.tenant_uuid))
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.category.as_deref().map_or(true, |c| t.category == c))
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .map(|t| t.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn steps_for_task(&self, task_uuid: Uuid) -> StorageResult<Vec<TaskStep>> {
        let mut rows: Vec<TaskStep> = self
            .steps
            .iter()
            .filter(|s| s.task_uuid == task_uuid)
            .map(|s| s.value().clone())
            .collect();
        rows.sort_by_key(|s| s.sequence);
        Ok(rows)
    }

    async fn category_in_use(&self, category_slug: &str) -> StorageResult<bool> {
        Ok(self.tasks.iter().any(|t| t.category == category_slug))
    }

    async fn commit_step_completion(
        &self,
        task: &Task,
        expected_version: i64,
        step: &TaskStep,
    ) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        {
            let Some(mut stored) = self.tasks.get_mut(&task.task_uuid) else {
                return Err(StorageError::Backend(format!(
                    "task {} vanished during commit",
                    task.task_uuid
                )));
            };
            if stored.lock_version != expected_version {
                return Err(StorageError::VersionConflict);
            }
            *stored = Task {
                lock_version: expected_version + 1,
                ..task.clone()
            };
        }
        self.steps.insert(step.task_step_uuid, step.clone());
        Ok(())
    }

    async fn update_task(&self, task: &Task, expected_version: i64) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let Some(mut stored) = self.tasks.get_mut(&task.task_uuid) else {
            return Err(StorageError::Backend(format!(
                "task {} vanished during commit",
                task.task_uuid
            )));
        };
        if stored.lock_version != expected_version {
            return Err(StorageError::VersionConflict);
        }
        *stored = Task {
            lock_version: expected_version + 1,
            ..task.clone()
        };
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryStorage {
    async fn insert(
        &self,
        event: NewScheduledEvent,
        approvals: Vec<ApprovalRecord>,
    ) -> StorageResult<ScheduledEvent> {
        let _guard = self.write_lock.lock();
        let now = Utc::now();
        let row = ScheduledEvent {
            event_uuid: Uuid::new_v4(),
            tenant_uuid: event.tenant_uuid,
            title: event.title,
            event_type: event.event_type,
            scheduled_at: event.scheduled_at,
            priority: event.priority,
            status: EventStatus::Pending,
            current_stage: 0,
            approvals,
            lock_version: 1,
            created_at: now,
            updated_at: now,
        };
        self.events.insert(row.event_uuid, row.clone());
        Ok(row)
    }

    async fn find(
        &self,
        ctx: &TenantContext,
        event_uuid: Uuid,
    ) -> StorageResult<Option<ScheduledEvent>> {
        Ok(self
            .events
            .get(&event_uuid)
            .filter(|e| ctx.can_view(e.tenant_uuid))
            .map(|e| e.value().clone()))
    }

    async fn update(&self, event: &ScheduledEvent, expected_version: i64) -> StorageResult<()> {
        let _guard = self.write_lock.lock();
        let Some(mut stored) = self.events.get_mut(&event.event_uuid) else {
            return Err(StorageError::Backend(format!(
                "event {} vanished during commit",
                event.event_uuid
            )));
        };
        if stored.lock_version != expected_version {
            return Err(StorageError::VersionConflict);
        }
        *stored = ScheduledEvent {
            lock_version: expected_version + 1,
            updated_at: Utc::now(),
            ..event.clone()
        };
        Ok(())
    }
}
