//! Shared fixtures for the integration suites: an in-memory engine, tenant
//! contexts, and seed helpers for the water-supply category used throughout.

#![allow(dead_code)]

use grievance_core::config::GrievanceConfig;
use grievance_core::models::{Category, NewCategory, StepTemplate, TemplateScope, WorkflowTemplate};
use grievance_core::orchestration::{CreateTaskRequest, CreateTemplateRequest, GrievanceCore};
use grievance_core::tenancy::{TenantContext, TenantRole};
use uuid::Uuid;

pub fn test_core() -> GrievanceCore {
    GrievanceCore::in_memory(&GrievanceConfig::default())
}

pub fn admin_ctx(tenant: Uuid) -> TenantContext {
    TenantContext::new(tenant, TenantRole::Admin)
}

pub fn staff_ctx(tenant: Uuid) -> TenantContext {
    TenantContext::new(tenant, TenantRole::Staff)
}

pub fn super_admin_ctx() -> TenantContext {
    TenantContext::new(Uuid::new_v4(), TenantRole::SuperAdmin)
}

pub fn required_step(sequence: i32, title: &str) -> StepTemplate {
    StepTemplate {
        sequence,
        title: title.to_string(),
        description: None,
        required: true,
        estimated_minutes: Some(30),
    }
}

pub fn optional_step(sequence: i32, title: &str) -> StepTemplate {
    StepTemplate {
        required: false,
        ..required_step(sequence, title)
    }
}

/// Three required-only resolution steps for a pipe leak.
pub fn pipe_leak_steps() -> Vec<StepTemplate> {
    vec![
        required_step(1, "Verify leak location"),
        required_step(2, "Dispatch repair crew"),
        required_step(3, "Confirm resolution with citizen"),
    ]
}

pub async fn seed_category(
    core: &GrievanceCore,
    ctx: &TenantContext,
    slug: &str,
    sub_categories: &[&str],
) -> Category {
    core.create_category(
        ctx,
        NewCategory {
            value: slug.to_string(),
            label: slug.replace('_', " "),
            sub_categories: sub_categories.iter().map(|s| s.to_string()).collect(),
        },
    )
    .await
    .expect("seed category")
}

pub async fn seed_template(
    core: &GrievanceCore,
    ctx: &TenantContext,
    category: &Category,
    scope: TemplateScope,
    steps: Vec<StepTemplate>,
) -> WorkflowTemplate {
    core.create_workflow_template(
        ctx,
        CreateTemplateRequest {
            category_uuid: category.category_uuid,
            scope,
            sla_days: 3,
            sla_hours: 0,
            warning_threshold: 80,
            steps,
        },
    )
    .await
    .expect("seed template")
}

pub fn task_request(category: &str, sub_category: Option<&str>) -> CreateTaskRequest {
    CreateTaskRequest {
        title: "Water pipe burst near the vegetable market".to_string(),
        summary: Some("Reported by three residents of ward 12".to_string()),
        category: category.to_string(),
        sub_category: sub_category.map(|s| s.to_string()),
        channel: Default::default(),
        priority: Default::default(),
    }
}
