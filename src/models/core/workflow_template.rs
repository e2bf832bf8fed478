//! # Workflow Template Model
//!
//! An ordered, reusable checklist of resolution steps scoped to a category
//! and either one specific sub-category or the `all` fallback scope. At most
//! one template may exist per (category, scope) pair.
//!
//! Templates are read-only inputs to step attachment: task activity never
//! mutates them, and editing a template never touches steps already attached
//! to existing tasks.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::SCOPE_ALL;

/// Sub-category scope of a template. `All` is the sentinel fallback applying
/// to every sub-category of the category not otherwise covered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TemplateScope {
    All,
    SubCategory(String),
}

impl TemplateScope {
    /// Parse a request-level scope string; the literal `all` (any case) is
    /// the fallback sentinel, anything else is an exact sub-category.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(SCOPE_ALL) {
            Self::All
        } else {
            Self::SubCategory(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => SCOPE_ALL,
            Self::SubCategory(name) => name,
        }
    }
}

impl fmt::Display for TemplateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<TemplateScope> for String {
    fn from(scope: TemplateScope) -> Self {
        scope.as_str().to_string()
    }
}

impl TryFrom<String> for TemplateScope {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&raw))
    }
}

/// One checklist entry within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTemplate {
    /// 1-based position, unique and contiguous within the template
    pub sequence: i32,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub estimated_minutes: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub template_uuid: Uuid,
    pub category_uuid: Uuid,
    pub scope: TemplateScope,
    /// Service-level target, days + hours, for resolving a matched task
    pub sla_days: i32,
    pub sla_hours: i32,
    /// Percent of the SLA window after which the task is flagged at risk
    pub warning_threshold: i32,
    pub steps: Vec<StepTemplate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkflowTemplate {
    pub category_uuid: Uuid,
    pub scope: TemplateScope,
    pub sla_days: i32,
    pub sla_hours: i32,
    pub warning_threshold: i32,
    pub steps: Vec<StepTemplate>,
}

impl WorkflowTemplate {
    pub fn sla_duration(&self) -> Duration {
        Duration::days(i64::from(self.sla_days)) + Duration::hours(i64::from(self.sla_hours))
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parse_recognizes_sentinel() {
        assert_eq!(TemplateScope::parse("all"), TemplateScope::All);
        assert_eq!(TemplateScope::parse("ALL"), TemplateScope::All);
        assert_eq!(
            TemplateScope::parse("Pipe Leak"),
            TemplateScope::SubCategory("Pipe Leak".to_string())
        );
    }

    #[test]
    fn scope_serde_round_trip() {
        let scope = TemplateScope::SubCategory("Pipe Leak".to_string());
        let json = serde_json::to_string(&scope).unwrap();
        assert_eq!(json, "\"Pipe Leak\"");
        let parsed: TemplateScope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scope);

        let all: TemplateScope = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, TemplateScope::All);
    }

    #[test]
    fn sla_duration_combines_days_and_hours() {
        let template = WorkflowTemplate {
            template_uuid: Uuid::new_v4(),
            category_uuid: Uuid::new_v4(),
            scope: TemplateScope::All,
            sla_days: 2,
            sla_hours: 6,
            warning_threshold: 75,
            steps: vec![],
            created_at: Utc::now(),
        };
        assert_eq!(template.sla_duration(), Duration::hours(54));
    }
}
