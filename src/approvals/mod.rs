//! # Scheduled-Event Approvals
//!
//! The parallel approval domain: role-chain resolution and the engine that
//! tracks per-stage approval records for scheduled events.

pub mod chain;
pub mod engine;

pub use chain::resolve_approval_chain;
pub use engine::ApprovalEngine;
