//! Optimistic-concurrency behavior of the step-completion unit: a stale
//! snapshot can never clobber a newer write, and racing completers resolve to
//! exactly one winner.

mod common;

use std::sync::Arc;

use grievance_core::config::GrievanceConfig;
use grievance_core::models::TemplateScope;
use grievance_core::orchestration::{CompleteStepRequest, CoreDependencies, GrievanceCore};
use grievance_core::services::{InMemoryPointLedger, NoopNotifier};
use grievance_core::storage::{InMemoryStorage, StorageError, TaskStore};
use grievance_core::CoreError;
use uuid::Uuid;

use common::*;

/// Engine plus a handle on its storage for direct port-level assertions.
fn core_with_storage() -> (GrievanceCore, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let core = GrievanceCore::new(
        CoreDependencies {
            categories: storage.clone(),
            templates: storage.clone(),
            tasks: storage.clone(),
            events: storage.clone(),
            points: Arc::new(InMemoryPointLedger::new()),
            notifier: Arc::new(NoopNotifier),
        },
        &GrievanceConfig::default(),
    );
    (core, storage)
}

#[tokio::test]
async fn stale_snapshot_cannot_commit() {
    let (core, storage) = core_with_storage();
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);
    let staff = staff_ctx(tenant);

    let water = seed_category(&core, &admin, "water", &[]).await;
    seed_template(&core, &admin, &water, TemplateScope::All, pipe_leak_steps()).await;
    let created = core
        .create_task(&staff, task_request("water", None))
        .await
        .unwrap();

    // a writer holding the creation-time snapshot (version 1)...
    let stale_task = created.task.clone();
    let mut stale_step = created.steps[0].clone();
    stale_step.complete(Uuid::new_v4(), None, chrono::Utc::now());

    // ...loses once the engine has advanced the task
    core.complete_step(
        &staff,
        CompleteStepRequest {
            task_uuid: created.task.task_uuid,
            step_uuid: created.steps[0].task_step_uuid,
            actor_uuid: Uuid::new_v4(),
            notes: None,
        },
    )
    .await
    .unwrap();

    let err = storage
        .commit_step_completion(&stale_task, stale_task.lock_version, &stale_step)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::VersionConflict));

    // the committed progress survived the stale attempt
    let task = core.get_task(&staff, created.task.task_uuid).await.unwrap();
    assert_eq!(task.progress, 33);
}

#[tokio::test]
async fn racing_completers_produce_one_winner() {
    let (core, _storage) = core_with_storage();
    let core = Arc::new(core);
    let tenant = Uuid::new_v4();
    let admin = admin_ctx(tenant);
    let staff = staff_ctx(tenant);

    let water = seed_category(&core, &admin, "water", &[]).await;
    seed_template(&core, &admin, &water, TemplateScope::All, pipe_leak_steps()).await;
    let created = core
        .create_task(&staff, task_request("water", None))
        .await
        .unwrap();

    let request = CompleteStepRequest {
        task_uuid: created.task.task_uuid,
        step_uuid: created.steps[0].task_step_uuid,
        actor_uuid: Uuid::new_v4(),
        notes: None,
    };

    let first = {
        let core = core.clone();
        let request = request.clone();
        let staff = staff;
        tokio::spawn(async move { core.complete_step(&staff, request).await })
    };
    let second = {
        let core = core.clone();
        let request = request.clone();
        tokio::spawn(async move { core.complete_step(&staff, request).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one completer must win");

    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    CoreError::AlreadyCompleted(_) | CoreError::ConcurrentModification
                ),
                "loser must fail recoverably, got {err:?}"
            );
        }
    }

    // state reflects exactly one completion
    let task = core.get_task(&staff, created.task.task_uuid).await.unwrap();
    assert_eq!(task.progress, 33);
}
