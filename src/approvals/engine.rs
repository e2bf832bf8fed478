//! # Approval Workflow Engine
//!
//! Creation of scheduled events with their materialized approval chains, and
//! stage-by-stage decision handling. Approving the current stage advances the
//! stage pointer; the event becomes `approved` once every required record is
//! approved, and `rejected` immediately on any single rejection. Decisions on
//! an already-decided event fail with `ApprovalChainExhausted`.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::constants::events;
use crate::error::{CoreError, Result};
use crate::events::EventPublisher;
use crate::models::{ApprovalRecord, ApprovalStatus, EventStatus, NewScheduledEvent, ScheduledEvent};
use crate::services::{Notification, Notifier};
use crate::storage::EventStore;
use crate::tenancy::TenantContext;

use super::chain::resolve_approval_chain;
use crate::orchestration::types::{ApprovalDecision, CreateEventRequest, DecideApprovalRequest};

pub struct ApprovalEngine {
    events: Arc<dyn EventStore>,
    notifier: Arc<dyn Notifier>,
    publisher: EventPublisher,
}

impl ApprovalEngine {
    pub fn new(
        events: Arc<dyn EventStore>,
        notifier: Arc<dyn Notifier>,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            events,
            notifier,
            publisher,
        }
    }

    /// Schedule an event, materializing one pending approval record per chain
    /// position.
    #[instrument(skip(self, ctx, request), fields(event_type = %request.event_type, tenant = %ctx.tenant_uuid))]
    pub async fn create_event(
        &self,
        ctx: &TenantContext,
        request: CreateEventRequest,
    ) -> Result<ScheduledEvent> {
        request.validate()?;

        let chain = resolve_approval_chain(&request.event_type, request.priority);
        let approvals: Vec<ApprovalRecord> = chain
            .into_iter()
            .enumerate()
            .map(|(stage, role)| ApprovalRecord::pending_for(stage as i32, role))
            .collect();

        let new_event = NewScheduledEvent {
            tenant_uuid: ctx.tenant_uuid,
            title: request.title,
            event_type: request.event_type,
            scheduled_at: request.scheduled_at,
            priority: request.priority,
        };

        let event = self.events.insert(new_event, approvals).await?;

        info!(
            event_uuid = %event.event_uuid,
            event_type = %event.event_type,
            chain_length = event.approvals.len(),
            "Created scheduled event"
        );
        self.publisher.publish(
            events::EVENT_CREATED,
            json!({
                "event_uuid": event.event_uuid,
                "event_type": event.event_type,
                "chain": event.approvals.iter().map(|r| r.role.to_string()).collect::<Vec<_>>(),
            }),
        );

        Ok(event)
    }

    /// Decide the current approval stage of an event.
    #[instrument(skip(self, ctx, request), fields(event_uuid = %request.event_uuid, stage = request.stage))]
    pub async fn decide_approval(
        &self,
        ctx: &TenantContext,
        request: DecideApprovalRequest,
    ) -> Result<ScheduledEvent> {
        let event = self
            .events
            .find(ctx, request.event_uuid)
            .await?
            .ok_or(CoreError::EventNotFound(request.event_uuid))?;

        if event.status.is_decided() {
            return Err(CoreError::ApprovalChainExhausted(format!(
                "event {} is already {}",
                event.event_uuid, event.status
            )));
        }

        if request.stage != event.current_stage {
            return Err(CoreError::StageMismatch {
                expected: event.current_stage,
                got: request.stage,
            });
        }

        let now = chrono::Utc::now();
        let mut updated = event.clone();
        {
            let record = updated
                .approvals
                .iter_mut()
                .find(|r| r.stage == request.stage)
                .ok_or_else(|| {
                    CoreError::Internal(format!(
                        "event {} has no approval record for stage {}",
                        event.event_uuid, request.stage
                    ))
                })?;

            if record.is_decided() {
                return Err(CoreError::AlreadyCompleted(format!(
                    "approval stage {} is already {}",
                    record.stage, record.status
                )));
            }

            record.decided_by = Some(request.actor_uuid);
            record.decided_at = Some(now);
            record.status = match request.decision {
                ApprovalDecision::Approve => ApprovalStatus::Approved,
                ApprovalDecision::Reject => ApprovalStatus::Rejected,
            };
        }

        match request.decision {
            ApprovalDecision::Approve => {
                updated.current_stage += 1;
                if updated.all_required_approved() {
                    updated.status = EventStatus::Approved;
                }
            }
            // Short-circuit: remaining pending records are not evaluated
            ApprovalDecision::Reject => {
                updated.status = EventStatus::Rejected;
            }
        }
        updated.updated_at = now;

        self.events.update(&updated, event.lock_version).await?;
        updated.lock_version += 1;

        info!(
            event_uuid = %updated.event_uuid,
            stage = request.stage,
            decision = ?request.decision,
            status = %updated.status,
            "Recorded approval decision"
        );

        self.publisher.publish(
            events::APPROVAL_RECORDED,
            json!({
                "event_uuid": updated.event_uuid,
                "stage": request.stage,
                "decision": match request.decision {
                    ApprovalDecision::Approve => "approve",
                    ApprovalDecision::Reject => "reject",
                },
            }),
        );
        match updated.status {
            EventStatus::Approved => self.publisher.publish(
                events::EVENT_APPROVED,
                json!({ "event_uuid": updated.event_uuid }),
            ),
            EventStatus::Rejected => self.publisher.publish(
                events::EVENT_REJECTED,
                json!({ "event_uuid": updated.event_uuid }),
            ),
            EventStatus::Pending => {}
        }

        if updated.status.is_decided() {
            let delivery = self
                .notifier
                .deliver(Notification::EventDecided {
                    event_uuid: updated.event_uuid,
                    tenant_uuid: updated.tenant_uuid,
                    approved: updated.status == EventStatus::Approved,
                })
                .await;
            if let Err(err) = delivery {
                warn!(
                    event_uuid = %updated.event_uuid,
                    error = %err,
                    "Decision notification failed, approval outcome stands"
                );
            }
        }

        Ok(updated)
    }

    pub async fn get_event(
        &self,
        ctx: &TenantContext,
        event_uuid: uuid::Uuid,
    ) -> Result<ScheduledEvent> {
        self.events
            .find(ctx, event_uuid)
            .await?
            .ok_or(CoreError::EventNotFound(event_uuid))
    }
}
