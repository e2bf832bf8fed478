//! # Registries
//!
//! Reference-data management: grievance categories and the workflow templates
//! scoped to them, including the matcher that picks the template for an
//! incoming task.

pub mod category_registry;
pub mod template_registry;

pub use category_registry::CategoryRegistry;
pub use template_registry::TemplateRegistry;
