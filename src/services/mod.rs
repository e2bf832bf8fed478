//! # Side-Effect Services
//!
//! Best-effort collaborators invoked after a primary state transition has
//! committed: staff point awards and interested-party notifications. A
//! failure here is logged, collected into the operation result as a
//! non-fatal side-effect failure, and never rolls back the transition.

pub mod notifier;
pub mod point_awarder;

use thiserror::Error;

pub use notifier::{NoopNotifier, Notification, Notifier, RecordingNotifier};
pub use point_awarder::{InMemoryPointLedger, PointAwarder, PointLedger};

/// Failure of a best-effort side effect. Deliberately not a `CoreError`:
/// these never surface as operation errors.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SideEffectError(pub String);
