#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Grievance Core
//!
//! Core engine for a citizen-grievance intake and resolution tracker used by
//! political offices. Grievances arrive from multiple channels (QR code,
//! voice IVR, messaging bot, walk-in, email), are classified by
//! category/sub-category, and are worked through an ordered checklist of
//! resolution steps before being marked complete.
//!
//! ## Architecture
//!
//! The crate implements the **workflow attachment and progress engine**:
//!
//! - [`registry`] resolves which ordered step template applies to an incoming
//!   task (exact sub-category match wins over the `all` fallback)
//! - [`orchestration`] clones the matched checklist onto the task, enforces
//!   ordered at-most-once completion of required steps inside one atomic
//!   read-modify-write unit, and recomputes the denormalized progress cache
//! - [`state_machine`] holds the monotonic `open -> in_progress -> completed`
//!   lifecycle and its guards
//! - [`approvals`] drives the parallel multi-level approval workflow for
//!   scheduled events
//! - [`tenancy`] threads the mandatory tenant context through every operation
//!
//! Rendering, authentication, channel payload parsing, calendar OAuth and
//! notification delivery are external collaborators reached through the
//! narrow ports in [`storage`] and [`services`].
//!
//! ## Quick Start
//!
//! ```rust
//! use grievance_core::config::GrievanceConfig;
//! use grievance_core::orchestration::{CreateTaskRequest, GrievanceCore};
//! use grievance_core::tenancy::{TenantContext, TenantRole};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let core = GrievanceCore::in_memory(&GrievanceConfig::default());
//! let ctx = TenantContext::new(uuid::Uuid::new_v4(), TenantRole::Admin);
//!
//! let category = core
//!     .create_category(&ctx, grievance_core::models::NewCategory {
//!         value: "water".to_string(),
//!         label: "Water Supply".to_string(),
//!         sub_categories: vec!["Pipe Leak".to_string()],
//!     })
//!     .await?;
//!
//! let created = core
//!     .create_task(&ctx, CreateTaskRequest {
//!         title: "Pipe burst near market".to_string(),
//!         summary: None,
//!         category: category.value,
//!         sub_category: Some("Pipe Leak".to_string()),
//!         channel: Default::default(),
//!         priority: Default::default(),
//!     })
//!     .await?;
//! println!("task {} with {} steps", created.task.task_uuid, created.step_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Unit tests live beside the code; the integration suites under `tests/`
//! run the full engine against the in-memory storage adapter:
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod approvals;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod services;
pub mod state_machine;
pub mod storage;
pub mod tenancy;
pub mod validation;

pub use config::{ConfigManager, GrievanceConfig, PointsConfig};
pub use error::{CoreError, Result};
pub use orchestration::{CoreDependencies, GrievanceCore};
pub use state_machine::{StepStatus, TaskStatus};
pub use storage::{InMemoryStorage, PgStorage, TaskFilter};
pub use tenancy::{TenantContext, TenantRole};
