//! Member card view-models, including placeholder text for unresolved profiles.

use crate::models::{AttendeeForTagging, CardView, DetailState, DetailStatus};

pub const LOADING_NAME: &str = "Loading...";
pub const UNKNOWN_NAME: &str = "Unknown member";
const UNKNOWN_INITIALS: &str = "?";

fn initials(first: &str, last: &str) -> String {
    first
        .chars()
        .next()
        .into_iter()
        .chain(last.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn card_view(attendee: &AttendeeForTagging, is_selected: bool) -> CardView {
    let (detail_status, display_name, display_email, initials) = match &attendee.details {
        DetailState::Loading => (
            DetailStatus::Loading,
            LOADING_NAME.to_string(),
            None,
            UNKNOWN_INITIALS.to_string(),
        ),
        DetailState::Resolved(details) => (
            DetailStatus::Resolved,
            details.full_name(),
            Some(details.email.clone()).filter(|e| !e.is_empty()),
            initials(&details.first_name, &details.last_name),
        ),
        DetailState::Unresolved => (
            DetailStatus::Unresolved,
            UNKNOWN_NAME.to_string(),
            None,
            UNKNOWN_INITIALS.to_string(),
        ),
    };

    CardView {
        pk: attendee.pk.clone(),
        sk: attendee.sk.clone(),
        user_id: attendee.user_id.clone(),
        role: attendee.role.clone(),
        organization_name: attendee.organization_name.clone(),
        event_id: attendee.event_id.clone(),
        user_details: attendee.user_details().cloned(),
        is_loading_details: attendee.is_loading_details(),
        detail_status,
        display_name,
        display_email,
        initials,
        is_selected,
        is_selectable: attendee.is_selectable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserDetails;

    #[test]
    fn test_resolved_card() {
        let mut attendee = AttendeeForTagging::new("u1", "org", "ev");
        attendee.details = DetailState::Resolved(UserDetails {
            id: "u1".to_string(),
            email: "ada@example.com".to_string(),
            first_name: "ada".to_string(),
            last_name: "Lovelace".to_string(),
        });

        let card = card_view(&attendee, true);
        assert_eq!(card.display_name, "ada Lovelace");
        assert_eq!(card.display_email.as_deref(), Some("ada@example.com"));
        assert_eq!(card.initials, "AL");
        assert!(card.is_selected);
        assert!(card.is_selectable);
        assert!(!card.is_loading_details);
    }

    #[test]
    fn test_unresolved_card_keeps_details_empty() {
        let mut attendee = AttendeeForTagging::new("u2", "org", "ev");
        attendee.details = DetailState::Unresolved;

        let card = card_view(&attendee, false);
        assert_eq!(card.detail_status, DetailStatus::Unresolved);
        assert_eq!(card.display_name, UNKNOWN_NAME);
        assert!(card.user_details.is_none());
        assert!(!card.is_selectable);
        assert!(!card.is_loading_details);
    }

    #[test]
    fn test_loading_card() {
        let card = card_view(&AttendeeForTagging::new("u3", "org", "ev"), false);
        assert_eq!(card.detail_status, DetailStatus::Loading);
        assert_eq!(card.display_name, LOADING_NAME);
        assert!(card.is_loading_details);
    }
}
