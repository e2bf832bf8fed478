//! Workflow matching precedence, template scope conflicts, and category
//! registry guards.

mod common;

use grievance_core::models::{CategoryUpdate, NewCategory, TemplateScope};
use grievance_core::CoreError;
use uuid::Uuid;

use common::*;

#[tokio::test]
async fn exact_sub_category_match_beats_all_scope() {
    let core = test_core();
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);

    let water = seed_category(&core, &admin, "water", &["Pipe Leak", "Contamination"]).await;
    let fallback = seed_template(
        &core,
        &admin,
        &water,
        TemplateScope::All,
        vec![required_step(1, "Generic triage")],
    )
    .await;
    let specific = seed_template(
        &core,
        &admin,
        &water,
        TemplateScope::SubCategory("Pipe Leak".to_string()),
        pipe_leak_steps(),
    )
    .await;

    let resolved = core
        .resolve_workflow("water", Some("Pipe Leak"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.template_uuid, specific.template_uuid);

    // a sub-category without its own template falls back to 'all'
    let resolved = core
        .resolve_workflow("water", Some("Contamination"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.template_uuid, fallback.template_uuid);

    // no sub-category supplied also falls back to 'all'
    let resolved = core.resolve_workflow("water", None).await.unwrap().unwrap();
    assert_eq!(resolved.template_uuid, fallback.template_uuid);
}

#[tokio::test]
async fn no_matching_template_is_not_an_error() {
    let core = test_core();
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);
    let staff = staff_ctx(tenant);

    seed_category(&core, &admin, "general", &[]).await;

    assert!(core.resolve_workflow("general", None).await.unwrap().is_none());

    // task creation still succeeds, with zero steps
    let created = core
        .create_task(&staff, task_request("general", None))
        .await
        .unwrap();
    assert_eq!(created.step_count(), 0);
}

#[tokio::test]
async fn unknown_category_fails_resolution_and_creation() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let err = core.resolve_workflow("sewage", None).await.unwrap_err();
    assert!(matches!(err, CoreError::CategoryNotFound(_)));

    let err = core
        .create_task(&staff, task_request("sewage", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::CategoryNotFound(_)));
}

#[tokio::test]
async fn duplicate_scope_is_a_template_conflict() {
    let core = test_core();
    let admin = admin_ctx(Uuid::new_v4());

    let water = seed_category(&core, &admin, "water", &["Pipe Leak"]).await;
    seed_template(&core, &admin, &water, TemplateScope::All, pipe_leak_steps()).await;

    let err = core
        .create_workflow_template(
            &admin,
            grievance_core::orchestration::CreateTemplateRequest {
                category_uuid: water.category_uuid,
                scope: TemplateScope::All,
                sla_days: 1,
                sla_hours: 0,
                warning_threshold: 50,
                steps: vec![required_step(1, "Different triage")],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::TemplateConflict(_)));
}

#[tokio::test]
async fn template_validation_rejects_bad_requests() {
    let core = test_core();
    let admin = admin_ctx(Uuid::new_v4());
    let water = seed_category(&core, &admin, "water", &["Pipe Leak"]).await;

    // scope must name a real sub-category
    let err = core
        .create_workflow_template(
            &admin,
            grievance_core::orchestration::CreateTemplateRequest {
                category_uuid: water.category_uuid,
                scope: TemplateScope::SubCategory("Sewage".to_string()),
                sla_days: 1,
                sla_hours: 0,
                warning_threshold: 50,
                steps: vec![required_step(1, "Triage")],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    // sequences must be contiguous from 1
    let err = core
        .create_workflow_template(
            &admin,
            grievance_core::orchestration::CreateTemplateRequest {
                category_uuid: water.category_uuid,
                scope: TemplateScope::SubCategory("Pipe Leak".to_string()),
                sla_days: 1,
                sla_hours: 0,
                warning_threshold: 50,
                steps: vec![required_step(1, "Triage"), required_step(3, "Repair")],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn template_edits_never_touch_attached_steps() {
    let core = test_core();
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);
    let staff = staff_ctx(tenant);

    let water = seed_category(&core, &admin, "water", &["Pipe Leak", "Contamination"]).await;
    seed_template(
        &core,
        &admin,
        &water,
        TemplateScope::SubCategory("Pipe Leak".to_string()),
        pipe_leak_steps(),
    )
    .await;

    let created = core
        .create_task(&staff, task_request("water", Some("Pipe Leak")))
        .await
        .unwrap();

    // a later template for the same category under another scope, and a
    // category relabel, change nothing on the in-flight task
    seed_template(
        &core,
        &admin,
        &water,
        TemplateScope::All,
        vec![required_step(1, "Completely different step")],
    )
    .await;
    core.update_category(
        &admin,
        water.category_uuid,
        CategoryUpdate {
            label: Some("Water & Drainage".to_string()),
            sub_categories: None,
        },
    )
    .await
    .unwrap();

    let steps = core
        .list_task_steps(&staff, created.task.task_uuid)
        .await
        .unwrap();
    let titles: Vec<&str> = steps.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Verify leak location",
            "Dispatch repair crew",
            "Confirm resolution with citizen"
        ]
    );
}

#[tokio::test]
async fn category_lifecycle_guards() {
    let core = test_core();
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);
    let staff = staff_ctx(tenant);

    // staff cannot manage reference data
    let err = core
        .create_category(
            &staff,
            NewCategory {
                value: "water".to_string(),
                label: "Water".to_string(),
                sub_categories: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    // bad slug rejected before any write
    let err = core
        .create_category(
            &admin,
            NewCategory {
                value: "Water Supply".to_string(),
                label: "Water".to_string(),
                sub_categories: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    let water = seed_category(&core, &admin, "water", &[]).await;

    // duplicate slug rejected
    let err = core
        .create_category(
            &admin,
            NewCategory {
                value: "water".to_string(),
                label: "Water again".to_string(),
                sub_categories: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));

    // referenced categories cannot be deleted
    core.create_task(&staff, task_request("water", None))
        .await
        .unwrap();
    let err = core
        .delete_category(&admin, water.category_uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::CategoryInUse(_)));

    // unreferenced ones can
    let unused = seed_category(&core, &admin, "street_lights", &[]).await;
    core.delete_category(&admin, unused.category_uuid)
        .await
        .unwrap();
    assert!(matches!(
        core.get_category("street_lights").await.unwrap_err(),
        CoreError::CategoryNotFound(_)
    ));
}
