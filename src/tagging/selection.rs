//! The set of attendees chosen for tagging.

use std::collections::HashSet;

use crate::models::AttendeeForTagging;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    user_ids: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.user_ids.contains(user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.user_ids.clear();
    }

    /// Flip the selection of an attendee.
    ///
    /// Attendees without resolved details cannot be selected; returns `false` on no-op.
    pub fn toggle(&mut self, attendee: &AttendeeForTagging) -> bool {
        if !attendee.is_selectable() {
            return false;
        }
        if !self.user_ids.remove(&attendee.user_id) {
            self.user_ids.insert(attendee.user_id.clone());
        }
        true
    }

    /// Selected IDs in attendee-list order.
    pub fn ordered_ids(&self, attendees: &[AttendeeForTagging]) -> Vec<String> {
        attendees
            .iter()
            .filter(|a| self.user_ids.contains(&a.user_id))
            .map(|a| a.user_id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetailState, UserDetails};

    fn resolved(id: &str) -> AttendeeForTagging {
        let mut attendee = AttendeeForTagging::new(id, "org", "ev");
        attendee.details = DetailState::Resolved(UserDetails {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
        });
        attendee
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let attendee = resolved("u1");
        let mut selection = Selection::new();

        assert!(selection.toggle(&attendee));
        assert!(selection.contains("u1"));
        assert!(selection.toggle(&attendee));
        assert!(!selection.contains("u1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_is_noop_while_loading_or_unresolved() {
        let loading = AttendeeForTagging::new("u1", "org", "ev");
        let mut unresolved = AttendeeForTagging::new("u2", "org", "ev");
        unresolved.details = DetailState::Unresolved;

        let mut selection = Selection::new();
        assert!(!selection.toggle(&loading));
        assert!(!selection.toggle(&unresolved));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_ordered_ids_follow_list_order() {
        let list = vec![resolved("a"), resolved("b"), resolved("c")];
        let mut selection = Selection::new();
        selection.toggle(&list[2]);
        selection.toggle(&list[0]);

        assert_eq!(selection.ordered_ids(&list), vec!["a", "c"]);
    }
}
