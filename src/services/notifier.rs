//! # Notification Port
//!
//! Delivery mechanics (SMS, WhatsApp, email digests) are an external concern;
//! the engine only hands a structured notification to this port, best-effort,
//! after the primary transition has committed.

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::SideEffectError;

/// What happened, addressed to whoever subscribed to the affected record.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    TaskCompleted { task_uuid: Uuid, tenant_uuid: Uuid },
    EventDecided { event_uuid: Uuid, tenant_uuid: Uuid, approved: bool },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, notification: Notification) -> Result<(), SideEffectError>;
}

/// Default no-op sink.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn deliver(&self, _notification: Notification) -> Result<(), SideEffectError> {
        Ok(())
    }
}

/// Captures notifications for test assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, notification: Notification) -> Result<(), SideEffectError> {
        self.delivered.lock().push(notification);
        Ok(())
    }
}
