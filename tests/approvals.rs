//! Approval chain resolution and stage-by-stage decision handling for
//! scheduled events.

mod common;

use chrono::{Duration, Utc};
use grievance_core::models::{ApprovalStatus, ApproverRole, EventPriority, EventStatus};
use grievance_core::orchestration::{ApprovalDecision, CreateEventRequest, DecideApprovalRequest};
use grievance_core::CoreError;
use uuid::Uuid;

use common::*;

fn event_request(event_type: &str, priority: EventPriority) -> CreateEventRequest {
    CreateEventRequest {
        title: "Ward 12 public meeting".to_string(),
        event_type: event_type.to_string(),
        scheduled_at: Utc::now() + Duration::days(7),
        priority,
    }
}

fn decide(event: Uuid, stage: i32, decision: ApprovalDecision) -> DecideApprovalRequest {
    DecideApprovalRequest {
        event_uuid: event,
        stage,
        decision,
        actor_uuid: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn chains_materialize_per_event_type() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let press = core
        .create_event(&staff, event_request("press_conference", EventPriority::Medium))
        .await
        .unwrap();
    let roles: Vec<ApproverRole> = press.approvals.iter().map(|r| r.role).collect();
    assert_eq!(
        roles,
        vec![
            ApproverRole::EventManager,
            ApproverRole::CampaignDirector,
            ApproverRole::ChiefOfStaff
        ]
    );
    assert_eq!(press.status, EventStatus::Pending);
    assert_eq!(press.current_stage, 0);
    assert!(press
        .approvals
        .iter()
        .all(|r| r.status == ApprovalStatus::Pending));
}

#[tokio::test]
async fn urgent_escalation_appends_chief_of_staff_without_duplicates() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    // unmapped type, urgent: default chain plus the escalation role
    let meeting = core
        .create_event(&staff, event_request("meeting", EventPriority::Urgent))
        .await
        .unwrap();
    let roles: Vec<ApproverRole> = meeting.approvals.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![ApproverRole::EventManager, ApproverRole::ChiefOfStaff]);

    // chain already ends with chief_of_staff: no duplicate append
    let emergency = core
        .create_event(&staff, event_request("emergency_meeting", EventPriority::Urgent))
        .await
        .unwrap();
    let roles: Vec<ApproverRole> = emergency.approvals.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![ApproverRole::ChiefOfStaff]);
}

#[tokio::test]
async fn approving_every_stage_approves_the_event() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let event = core
        .create_event(&staff, event_request("town_hall", EventPriority::Medium))
        .await
        .unwrap();
    assert_eq!(event.approvals.len(), 2);

    let after_first = core
        .decide_approval(&staff, decide(event.event_uuid, 0, ApprovalDecision::Approve))
        .await
        .unwrap();
    assert_eq!(after_first.status, EventStatus::Pending);
    assert_eq!(after_first.current_stage, 1);
    assert_eq!(after_first.approvals[0].status, ApprovalStatus::Approved);
    assert!(after_first.approvals[0].decided_at.is_some());

    let after_second = core
        .decide_approval(&staff, decide(event.event_uuid, 1, ApprovalDecision::Approve))
        .await
        .unwrap();
    assert_eq!(after_second.status, EventStatus::Approved);
}

#[tokio::test]
async fn rejection_short_circuits_the_chain() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let event = core
        .create_event(&staff, event_request("press_conference", EventPriority::Medium))
        .await
        .unwrap();

    let rejected = core
        .decide_approval(&staff, decide(event.event_uuid, 0, ApprovalDecision::Reject))
        .await
        .unwrap();
    assert_eq!(rejected.status, EventStatus::Rejected);
    // later stages stay untouched
    assert_eq!(rejected.approvals[1].status, ApprovalStatus::Pending);
    assert_eq!(rejected.approvals[2].status, ApprovalStatus::Pending);

    // any further decision fails: the chain is exhausted
    let err = core
        .decide_approval(&staff, decide(event.event_uuid, 1, ApprovalDecision::Approve))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ApprovalChainExhausted(_)));
}

#[tokio::test]
async fn decisions_must_target_the_current_stage() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let event = core
        .create_event(&staff, event_request("town_hall", EventPriority::Medium))
        .await
        .unwrap();

    let err = core
        .decide_approval(&staff, decide(event.event_uuid, 1, ApprovalDecision::Approve))
        .await
        .unwrap_err();
    match err {
        CoreError::StageMismatch { expected, got } => {
            assert_eq!(expected, 0);
            assert_eq!(got, 1);
        }
        other => panic!("expected StageMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn approved_event_accepts_no_further_decisions() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());

    let event = core
        .create_event(&staff, event_request("emergency_meeting", EventPriority::Urgent))
        .await
        .unwrap();

    core.decide_approval(&staff, decide(event.event_uuid, 0, ApprovalDecision::Approve))
        .await
        .unwrap();

    let err = core
        .decide_approval(&staff, decide(event.event_uuid, 0, ApprovalDecision::Approve))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ApprovalChainExhausted(_)));
}

#[tokio::test]
async fn events_are_tenant_scoped() {
    let core = test_core();
    let staff = staff_ctx(Uuid::new_v4());
    let other_office = staff_ctx(Uuid::new_v4());

    let event = core
        .create_event(&staff, event_request("rally", EventPriority::High))
        .await
        .unwrap();

    let err = core
        .get_event(&other_office, event.event_uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::EventNotFound(_)));

    let err = core
        .decide_approval(
            &other_office,
            decide(event.event_uuid, 0, ApprovalDecision::Approve),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::EventNotFound(_)));

    assert!(core.get_event(&super_admin_ctx(), event.event_uuid).await.is_ok());
}
