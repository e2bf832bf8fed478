//! # Event System
//!
//! Fire-and-forget lifecycle event publication for downstream consumers
//! (dashboards, notification workers). Event names live in
//! [`crate::constants::events`].

pub mod publisher;

pub use publisher::{EventPublisher, LifecycleEvent};
