//! # Category Model
//!
//! Grievance categories and their ordered sub-category labels. Categories are
//! reference data shared across tenants: they are created by administrators,
//! referenced (never owned) by tasks and workflow templates, and cannot be
//! deleted while any task still points at them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_uuid: Uuid,
    /// Unique machine slug, matching `^[a-z][a-z0-9_]*$`
    pub value: String,
    /// Human-facing display label
    pub label: String,
    /// Ordered sub-category labels, e.g. `["Pipe Leak", "Contamination"]`
    pub sub_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub value: String,
    pub label: String,
    pub sub_categories: Vec<String>,
}

/// Partial update; `None` fields are left untouched. The slug is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub label: Option<String>,
    pub sub_categories: Option<Vec<String>>,
}

impl Category {
    pub fn has_sub_category(&self, name: &str) -> bool {
        self.sub_categories.iter().any(|s| s == name)
    }
}
