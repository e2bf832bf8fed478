//! # Task Initializer
//!
//! Task creation with workflow attachment. The initializer resolves the
//! applicable template through the matcher, materializes its steps onto the
//! new task as a value copy, stamps the SLA deadline from the template, and
//! persists task plus steps as one storage unit.
//!
//! A task whose category has no matching template is created with zero steps
//! and progress 0; it is completed later through the direct-completion path.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::constants::events;
use crate::error::Result;
use crate::events::EventPublisher;
use crate::models::{NewTask, NewTaskStep, WorkflowTemplate};
use crate::registry::TemplateRegistry;
use crate::storage::TaskStore;
use crate::tenancy::TenantContext;

use super::types::{CreateTaskRequest, TaskInitializationResult};

pub struct TaskInitializer {
    registry: Arc<TemplateRegistry>,
    tasks: Arc<dyn TaskStore>,
    publisher: EventPublisher,
}

impl TaskInitializer {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        tasks: Arc<dyn TaskStore>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            registry,
            tasks,
            publisher,
        }
    }

    /// Create a task, attaching the matched workflow's steps.
    #[instrument(skip(self, ctx, request), fields(category = %request.category, tenant = %ctx.tenant_uuid))]
    pub async fn create_task(
        &self,
        ctx: &TenantContext,
        request: CreateTaskRequest,
    ) -> Result<TaskInitializationResult> {
        request.validate()?;

        let template = self
            .registry
            .resolve(&request.category, request.sub_category.as_deref())
            .await?;

        let now = chrono::Utc::now();
        let (sla_due_at, sla_warning_threshold) = match template.as_ref() {
            Some(t) => (Some(now + t.sla_duration()), Some(t.warning_threshold)),
            None => (None, None),
        };

        let new_task = NewTask {
            tenant_uuid: ctx.tenant_uuid,
            title: request.title,
            summary: request.summary,
            category: request.category,
            sub_category: request.sub_category,
            channel: request.channel,
            priority: request.priority,
            sla_due_at,
            sla_warning_threshold,
        };

        let new_steps = template.as_ref().map(attach_steps).unwrap_or_default();
        let (task, steps) = self.tasks.insert_with_steps(new_task, new_steps).await?;

        info!(
            task_uuid = %task.task_uuid,
            category = %task.category,
            step_count = steps.len(),
            template_matched = template.is_some(),
            "Created task"
        );

        if steps.is_empty() && template.is_none() {
            warn!(
                task_uuid = %task.task_uuid,
                category = %task.category,
                "No workflow template matched, task created without checklist"
            );
        }

        self.publisher.publish(
            events::TASK_CREATED,
            json!({
                "task_uuid": task.task_uuid,
                "tenant_uuid": task.tenant_uuid,
                "category": task.category,
                "sub_category": task.sub_category,
                "step_count": steps.len(),
            }),
        );

        Ok(TaskInitializationResult {
            task,
            steps,
            template_uuid: template.map(|t| t.template_uuid),
        })
    }
}

/// Materialize a template's steps as new per-task step records. This is a
/// value copy: later template edits never alter steps already attached.
pub fn attach_steps(template: &WorkflowTemplate) -> Vec<NewTaskStep> {
    template
        .steps
        .iter()
        .map(|step| NewTaskStep {
            sequence: step.sequence,
            title: step.title.clone(),
            description: step.description.clone(),
            required: step.required,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StepTemplate, TemplateScope};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn attach_copies_every_template_field() {
        let template = WorkflowTemplate {
            template_uuid: Uuid::new_v4(),
            category_uuid: Uuid::new_v4(),
            scope: TemplateScope::All,
            sla_days: 1,
            sla_hours: 0,
            warning_threshold: 80,
            steps: vec![
                StepTemplate {
                    sequence: 1,
                    title: "Acknowledge complaint".to_string(),
                    description: Some("Call the citizen back".to_string()),
                    required: true,
                    estimated_minutes: Some(15),
                },
                StepTemplate {
                    sequence: 2,
                    title: "Photograph site".to_string(),
                    description: None,
                    required: false,
                    estimated_minutes: None,
                },
            ],
            created_at: Utc::now(),
        };

        let attached = attach_steps(&template);
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[0].sequence, 1);
        assert_eq!(attached[0].title, "Acknowledge complaint");
        assert!(attached[0].required);
        assert_eq!(attached[1].sequence, 2);
        assert!(!attached[1].required);
    }
}
