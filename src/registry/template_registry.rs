//! # Template Registry and Workflow Matcher
//!
//! Creation of workflow templates (one per category/scope pair) and the
//! matcher that resolves which template applies to an incoming task.
//!
//! ## Matching
//!
//! A template scoped to the exact (category, sub-category) pair always wins
//! over the `all` fallback. Resolving to no template at all is a legitimate
//! outcome, not an error: such tasks carry zero steps and are completed
//! directly.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{Category, NewWorkflowTemplate, TemplateScope, WorkflowTemplate};
use crate::storage::{CategoryStore, StorageError, TemplateStore};
use crate::tenancy::TenantContext;
use crate::validation;

pub struct TemplateRegistry {
    templates: Arc<dyn TemplateStore>,
    categories: Arc<dyn CategoryStore>,
}

impl TemplateRegistry {
    pub fn new(templates: Arc<dyn TemplateStore>, categories: Arc<dyn CategoryStore>) -> Self {
        Self {
            templates,
            categories,
        }
    }

    /// Create a workflow template. Rejects a second template for the same
    /// (category, scope) pair with `TemplateConflict`.
    #[instrument(skip(self, ctx, template), fields(category_uuid = %template.category_uuid, scope = %template.scope))]
    pub async fn create_template(
        &self,
        ctx: &TenantContext,
        template: NewWorkflowTemplate,
    ) -> Result<WorkflowTemplate> {
        ctx.require_admin()?;
        validation::validate_warning_threshold(template.warning_threshold)?;
        validation::validate_step_templates(&template.steps)?;
        if template.sla_days < 0 || template.sla_hours < 0 {
            return Err(CoreError::InvalidInput(
                "SLA days and hours must be non-negative".to_string(),
            ));
        }

        let category = self
            .categories
            .find_by_uuid(template.category_uuid)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(template.category_uuid.to_string()))?;

        if let TemplateScope::SubCategory(ref name) = template.scope {
            if !category.has_sub_category(name) {
                return Err(CoreError::InvalidInput(format!(
                    "category '{}' has no sub-category '{name}'",
                    category.value
                )));
            }
        }

        if self
            .templates
            .find_by_scope(template.category_uuid, &template.scope)
            .await?
            .is_some()
        {
            return Err(CoreError::TemplateConflict(format!(
                "scope '{}' already covered for category '{}'",
                template.scope, category.value
            )));
        }

        let created = self.templates.insert(template).await.map_err(|err| {
            // Losing the race to another writer is still a scope conflict
            match err {
                StorageError::Conflict(msg) => CoreError::TemplateConflict(msg),
                other => other.into(),
            }
        })?;

        info!(
            template_uuid = %created.template_uuid,
            category = %category.value,
            scope = %created.scope,
            step_count = created.step_count(),
            "Created workflow template"
        );
        Ok(created)
    }

    /// Resolve the template applying to (category, sub-category), or `None`
    /// when the category has no matching workflow.
    #[instrument(skip(self), fields(category = %category_slug))]
    pub async fn resolve(
        &self,
        category_slug: &str,
        sub_category: Option<&str>,
    ) -> Result<Option<WorkflowTemplate>> {
        let category = self
            .categories
            .find_by_slug(category_slug)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(category_slug.to_string()))?;

        if let Some(sub) = sub_category.filter(|s| !s.trim().is_empty()) {
            let scoped = self
                .templates
                .find_by_scope(category.category_uuid, &TemplateScope::SubCategory(sub.to_string()))
                .await?;
            if let Some(template) = scoped {
                debug!(
                    template_uuid = %template.template_uuid,
                    sub_category = sub,
                    "Matched sub-category template"
                );
                return Ok(Some(template));
            }
        }

        let fallback = self
            .templates
            .find_by_scope(category.category_uuid, &TemplateScope::All)
            .await?;
        if let Some(ref template) = fallback {
            debug!(template_uuid = %template.template_uuid, "Matched 'all' fallback template");
        } else {
            debug!("No workflow template for category");
        }
        Ok(fallback)
    }

    pub async fn list_for_category(&self, category: &Category) -> Result<Vec<WorkflowTemplate>> {
        Ok(self
            .templates
            .list_for_category(category.category_uuid)
            .await?)
    }
}
