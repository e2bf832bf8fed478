//! # Staff Point Awards
//!
//! Completing a step awards the acting staff member a fixed point value keyed
//! by the task's priority. The award is an independently-retryable side
//! effect, eventually consistent with step completion.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::config::PointsConfig;
use crate::models::TaskPriority;

use super::SideEffectError;

/// Port for the staff points store.
#[async_trait]
pub trait PointLedger: Send + Sync {
    async fn award(
        &self,
        actor_uuid: Uuid,
        task_uuid: Uuid,
        points: i32,
    ) -> Result<(), SideEffectError>;
}

/// Maps a completion to its point value and records it on the ledger.
pub struct PointAwarder {
    ledger: std::sync::Arc<dyn PointLedger>,
    config: PointsConfig,
}

impl PointAwarder {
    pub fn new(ledger: std::sync::Arc<dyn PointLedger>, config: PointsConfig) -> Self {
        Self { ledger, config }
    }

    pub fn points_for(&self, priority: TaskPriority) -> i32 {
        self.config.for_priority(priority)
    }

    pub async fn award_for_completion(
        &self,
        actor_uuid: Uuid,
        task_uuid: Uuid,
        priority: TaskPriority,
    ) -> Result<(), SideEffectError> {
        let points = self.points_for(priority);
        self.ledger.award(actor_uuid, task_uuid, points).await?;
        debug!(
            actor_uuid = %actor_uuid,
            task_uuid = %task_uuid,
            points = points,
            "Awarded completion points"
        );
        Ok(())
    }
}

/// In-memory ledger used by tests and embedded deployments.
#[derive(Debug, Default)]
pub struct InMemoryPointLedger {
    totals: DashMap<Uuid, i64>,
}

impl InMemoryPointLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_for(&self, actor_uuid: Uuid) -> i64 {
        self.totals.get(&actor_uuid).map(|t| *t).unwrap_or(0)
    }
}

#[async_trait]
impl PointLedger for InMemoryPointLedger {
    async fn award(
        &self,
        actor_uuid: Uuid,
        _task_uuid: Uuid,
        points: i32,
    ) -> Result<(), SideEffectError> {
        *self.totals.entry(actor_uuid).or_insert(0) += i64::from(points);
        Ok(())
    }
}
