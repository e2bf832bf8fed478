//! # Task Finalizer
//!
//! Task-level lifecycle mutations outside step completion: direct completion
//! of stepless (manual) tasks and admin soft deletion. Both go through the
//! same version-conditional task update as the step completer.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::constants::events;
use crate::error::{CoreError, Result};
use crate::events::EventPublisher;
use crate::models::Task;
use crate::state_machine::{self, TaskEvent};
use crate::storage::TaskStore;
use crate::tenancy::TenantContext;

pub struct TaskFinalizer {
    tasks: Arc<dyn TaskStore>,
    publisher: EventPublisher,
}

impl TaskFinalizer {
    pub fn new(tasks: Arc<dyn TaskStore>, publisher: EventPublisher) -> Self {
        Self { tasks, publisher }
    }

    /// Complete a task that has no attached workflow. Tasks with steps must
    /// be worked through `complete_step`; this path forces progress to 100
    /// and stamps the completion timestamp.
    #[instrument(skip(self, ctx), fields(task_uuid = %task_uuid))]
    pub async fn complete_task(
        &self,
        ctx: &TenantContext,
        task_uuid: Uuid,
        actor_uuid: Uuid,
    ) -> Result<Task> {
        let task = self
            .tasks
            .find(ctx, task_uuid)
            .await?
            .ok_or(CoreError::TaskNotFound(task_uuid))?;

        let steps = self.tasks.steps_for_task(task.task_uuid).await?;
        if !steps.is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "task {task_uuid} has an attached workflow; complete its steps instead"
            )));
        }

        let now = chrono::Utc::now();
        let mut updated = task.clone();
        updated.status = state_machine::next_state(task.status, TaskEvent::CompleteManually)?;
        updated.progress = 100;
        updated.completed_at = Some(now);
        updated.updated_at = now;

        self.tasks.update_task(&updated, task.lock_version).await?;

        info!(task_uuid = %task_uuid, actor_uuid = %actor_uuid, "Completed task directly");
        self.publisher.publish(
            events::TASK_COMPLETED,
            json!({
                "task_uuid": task_uuid,
                "completed_at": updated.completed_at,
                "manual": true,
            }),
        );

        updated.lock_version += 1;
        Ok(updated)
    }

    /// Soft-delete a task (admin only). The row stays in storage with the
    /// deleted flag set; every read path, steps included, stops seeing it.
    #[instrument(skip(self, ctx), fields(task_uuid = %task_uuid))]
    pub async fn soft_delete_task(&self, ctx: &TenantContext, task_uuid: Uuid) -> Result<()> {
        ctx.require_admin()?;

        let task = self
            .tasks
            .find(ctx, task_uuid)
            .await?
            .ok_or(CoreError::TaskNotFound(task_uuid))?;

        let mut updated = task.clone();
        updated.deleted = true;
        updated.updated_at = chrono::Utc::now();

        self.tasks.update_task(&updated, task.lock_version).await?;

        info!(task_uuid = %task_uuid, "Soft-deleted task");
        self.publisher
            .publish(events::TASK_DELETED, json!({ "task_uuid": task_uuid }));
        Ok(())
    }
}
