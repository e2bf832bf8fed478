//! # Approval Chain Resolution
//!
//! Static mapping from event type to the ordered list of approver roles.
//! Unmapped types get the default single-role chain. Urgent events escalate:
//! when the chain does not already end with the chief of staff, that role is
//! appended as a final stage.

use crate::models::{ApproverRole, EventPriority};

/// Resolve the ordered approver-role chain for an event.
pub fn resolve_approval_chain(event_type: &str, priority: EventPriority) -> Vec<ApproverRole> {
    use ApproverRole::*;

    let mut chain = match event_type {
        "press_conference" => vec![EventManager, CampaignDirector, ChiefOfStaff],
        "rally" => vec![EventManager, SecurityLead, CampaignDirector],
        "town_hall" => vec![EventManager, CampaignDirector],
        "emergency_meeting" => vec![ChiefOfStaff],
        _ => vec![EventManager],
    };

    if priority == EventPriority::Urgent && chain.last() != Some(&ChiefOfStaff) {
        chain.push(ChiefOfStaff);
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApproverRole::*;

    #[test]
    fn mapped_types_resolve_their_chain() {
        assert_eq!(
            resolve_approval_chain("press_conference", EventPriority::Medium),
            vec![EventManager, CampaignDirector, ChiefOfStaff]
        );
        assert_eq!(
            resolve_approval_chain("rally", EventPriority::Low),
            vec![EventManager, SecurityLead, CampaignDirector]
        );
    }

    #[test]
    fn unmapped_type_gets_default_chain() {
        assert_eq!(
            resolve_approval_chain("meeting", EventPriority::Medium),
            vec![EventManager]
        );
    }

    #[test]
    fn urgent_appends_chief_of_staff() {
        assert_eq!(
            resolve_approval_chain("meeting", EventPriority::Urgent),
            vec![EventManager, ChiefOfStaff]
        );
        assert_eq!(
            resolve_approval_chain("rally", EventPriority::Urgent),
            vec![EventManager, SecurityLead, CampaignDirector, ChiefOfStaff]
        );
    }

    #[test]
    fn urgent_never_duplicates_a_trailing_chief_of_staff() {
        assert_eq!(
            resolve_approval_chain("emergency_meeting", EventPriority::Urgent),
            vec![ChiefOfStaff]
        );
        assert_eq!(
            resolve_approval_chain("press_conference", EventPriority::Urgent),
            vec![EventManager, CampaignDirector, ChiefOfStaff]
        );
    }
}
