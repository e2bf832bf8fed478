//! # Scheduled Event Model
//!
//! The parallel approval domain: campaign events (press conferences, rallies,
//! town halls) that must clear an ordered chain of approver roles before they
//! are confirmed. Each chain position is materialized as an `ApprovalRecord`
//! at event creation; a single rejection short-circuits the whole chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Event priority. `Urgent` escalates the approval chain to the chief of
/// staff when the chain does not already end there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for EventPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for EventPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(format!("Invalid event priority: {s}")),
        }
    }
}

/// Overall approval outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    /// A decided event accepts no further approval activity.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid event status: {s}")),
        }
    }
}

/// Per-record approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Invalid approval status: {s}")),
        }
    }
}

/// Roles that can sit on an approval chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverRole {
    EventManager,
    CampaignDirector,
    SecurityLead,
    ChiefOfStaff,
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventManager => write!(f, "event_manager"),
            Self::CampaignDirector => write!(f, "campaign_director"),
            Self::SecurityLead => write!(f, "security_lead"),
            Self::ChiefOfStaff => write!(f, "chief_of_staff"),
        }
    }
}

impl std::str::FromStr for ApproverRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event_manager" => Ok(Self::EventManager),
            "campaign_director" => Ok(Self::CampaignDirector),
            "security_lead" => Ok(Self::SecurityLead),
            "chief_of_staff" => Ok(Self::ChiefOfStaff),
            _ => Err(format!("Invalid approver role: {s}")),
        }
    }
}

/// One position on an event's approval chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    /// 0-based chain position
    pub stage: i32,
    pub role: ApproverRole,
    pub status: ApprovalStatus,
    pub required: bool,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl ApprovalRecord {
    pub fn pending_for(stage: i32, role: ApproverRole) -> Self {
        Self {
            stage,
            role,
            status: ApprovalStatus::Pending,
            required: true,
            decided_by: None,
            decided_at: None,
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self.status, ApprovalStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub event_uuid: Uuid,
    pub tenant_uuid: Uuid,
    pub title: String,
    /// Free-form event type key, e.g. `press_conference`; unmapped types get
    /// the default single-role chain
    pub event_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub priority: EventPriority,
    pub status: EventStatus,
    /// Index of the chain position currently awaiting a decision
    pub current_stage: i32,
    pub approvals: Vec<ApprovalRecord>,
    /// Optimistic-concurrency version, bumped on every decision
    pub lock_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduledEvent {
    pub tenant_uuid: Uuid,
    pub title: String,
    pub event_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub priority: EventPriority,
}

impl ScheduledEvent {
    /// Whether every required chain position has been approved.
    pub fn all_required_approved(&self) -> bool {
        self.approvals
            .iter()
            .filter(|r| r.required)
            .all(|r| r.status == ApprovalStatus::Approved)
    }

    pub fn record_at_stage(&self, stage: i32) -> Option<&ApprovalRecord> {
        self.approvals.iter().find(|r| r.stage == stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!(ApproverRole::ChiefOfStaff.to_string(), "chief_of_staff");
        assert_eq!(
            "campaign_director".parse::<ApproverRole>().unwrap(),
            ApproverRole::CampaignDirector
        );
        assert!("mayor".parse::<ApproverRole>().is_err());
    }

    #[test]
    fn all_required_approved_ignores_optional_records() {
        let mut event = ScheduledEvent {
            event_uuid: Uuid::new_v4(),
            tenant_uuid: Uuid::new_v4(),
            title: "Press briefing".to_string(),
            event_type: "press_conference".to_string(),
            scheduled_at: Utc::now(),
            priority: EventPriority::Medium,
            status: EventStatus::Pending,
            current_stage: 0,
            approvals: vec![
                ApprovalRecord::pending_for(0, ApproverRole::EventManager),
                ApprovalRecord {
                    required: false,
                    ..ApprovalRecord::pending_for(1, ApproverRole::SecurityLead)
                },
            ],
            lock_version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(!event.all_required_approved());
        event.approvals[0].status = ApprovalStatus::Approved;
        assert!(event.all_required_approved());
    }
}
