//! # Step Completer
//!
//! The atomic read-modify-write unit for step completion: load the task and
//! its step snapshot, validate the ordering and at-most-once guards, apply
//! the completion, recompute progress and the derived task status, and
//! persist everything through one version-conditional storage write. Two
//! concurrent completions cannot both pass the guards against a stale
//! snapshot: the loser's commit fails with `ConcurrentModification` and the
//! caller retries against fresh state.
//!
//! Point award and notification are best-effort side effects dispatched after
//! the commit; their failures are logged, reported in the result, and never
//! roll back the completion.

use futures::future::join;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::constants::events;
use crate::error::{CoreError, Result};
use crate::events::EventPublisher;
use crate::models::TaskStep;
use crate::services::{Notification, Notifier, PointAwarder};
use crate::state_machine::{self, guards, TaskEvent, TaskStatus};
use crate::storage::TaskStore;
use crate::tenancy::TenantContext;

use super::progress;
use super::types::{CompleteStepRequest, SideEffectFailure, StepCompletionResult};

pub struct StepCompleter {
    tasks: Arc<dyn TaskStore>,
    awarder: PointAwarder,
    notifier: Arc<dyn Notifier>,
    publisher: EventPublisher,
}

impl StepCompleter {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        awarder: PointAwarder,
        notifier: Arc<dyn Notifier>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            tasks,
            awarder,
            notifier,
            publisher,
        }
    }

    /// Complete one step of a task.
    #[instrument(skip(self, ctx, request), fields(task_uuid = %request.task_uuid, step_uuid = %request.step_uuid))]
    pub async fn complete_step(
        &self,
        ctx: &TenantContext,
        request: CompleteStepRequest,
    ) -> Result<StepCompletionResult> {
        request.validate()?;

        let task = self
            .tasks
            .find(ctx, request.task_uuid)
            .await?
            .ok_or(CoreError::TaskNotFound(request.task_uuid))?;
        let steps = self.tasks.steps_for_task(task.task_uuid).await?;

        let step = steps
            .iter()
            .find(|s| s.task_step_uuid == request.step_uuid)
            .ok_or(CoreError::StepNotFound(request.step_uuid))?;

        guards::ensure_step_completable(&task, step, &steps)?;

        let now = chrono::Utc::now();
        let mut completed_step = step.clone();
        completed_step.complete(request.actor_uuid, request.notes.clone(), now);

        let updated_steps: Vec<TaskStep> = steps
            .iter()
            .map(|s| {
                if s.task_step_uuid == completed_step.task_step_uuid {
                    completed_step.clone()
                } else {
                    s.clone()
                }
            })
            .collect();

        let started = task.status == TaskStatus::Open;
        let finished = guards::all_required_complete(&updated_steps);

        let mut updated_task = task.clone();
        if started {
            updated_task.status = state_machine::next_state(updated_task.status, TaskEvent::Start)?;
        }
        if finished {
            updated_task.status =
                state_machine::next_state(updated_task.status, TaskEvent::Complete)?;
            updated_task.progress = 100;
            updated_task.completed_at = Some(now);
        } else {
            updated_task.progress = progress::completion_percent(&updated_steps);
        }
        updated_task.updated_at = now;

        self.tasks
            .commit_step_completion(&updated_task, task.lock_version, &completed_step)
            .await?;

        info!(
            task_uuid = %task.task_uuid,
            sequence = completed_step.sequence,
            progress = updated_task.progress,
            status = %updated_task.status,
            "Completed step"
        );

        let side_effect_failures = self
            .dispatch_side_effects(&updated_task, &completed_step, finished, request.actor_uuid)
            .await;

        self.publish_lifecycle(&updated_task, &completed_step, started, finished);

        Ok(StepCompletionResult {
            step: completed_step,
            task_status: updated_task.status,
            progress: updated_task.progress,
            task_completed: finished,
            side_effect_failures,
        })
    }

    /// Run the best-effort side effects; failures are collected, not raised.
    async fn dispatch_side_effects(
        &self,
        task: &crate::models::Task,
        step: &TaskStep,
        finished: bool,
        actor_uuid: uuid::Uuid,
    ) -> Vec<SideEffectFailure> {
        let award = self
            .awarder
            .award_for_completion(actor_uuid, task.task_uuid, task.priority);
        let notify = async {
            if finished {
                self.notifier
                    .deliver(Notification::TaskCompleted {
                        task_uuid: task.task_uuid,
                        tenant_uuid: task.tenant_uuid,
                    })
                    .await
            } else {
                Ok(())
            }
        };

        let (award_result, notify_result) = join(award, notify).await;

        let mut failures = Vec::new();
        if let Err(err) = award_result {
            warn!(
                task_uuid = %task.task_uuid,
                step_uuid = %step.task_step_uuid,
                error = %err,
                "Point award failed, step completion stands"
            );
            failures.push(SideEffectFailure {
                effect: "point_award".to_string(),
                detail: err.to_string(),
            });
        }
        if let Err(err) = notify_result {
            warn!(
                task_uuid = %task.task_uuid,
                error = %err,
                "Completion notification failed, step completion stands"
            );
            failures.push(SideEffectFailure {
                effect: "notification".to_string(),
                detail: err.to_string(),
            });
        }
        failures
    }

    fn publish_lifecycle(
        &self,
        task: &crate::models::Task,
        step: &TaskStep,
        started: bool,
        finished: bool,
    ) {
        self.publisher.publish(
            events::STEP_COMPLETED,
            json!({
                "task_uuid": task.task_uuid,
                "step_uuid": step.task_step_uuid,
                "sequence": step.sequence,
                "progress": task.progress,
            }),
        );
        if started && !finished {
            self.publisher.publish(
                events::TASK_STARTED,
                json!({ "task_uuid": task.task_uuid }),
            );
        }
        if finished {
            self.publisher.publish(
                events::TASK_COMPLETED,
                json!({
                    "task_uuid": task.task_uuid,
                    "completed_at": task.completed_at,
                }),
            );
        }
    }
}
