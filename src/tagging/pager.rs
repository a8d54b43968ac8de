//! Client-side search filtering and incremental "load more" paging.

use crate::models::{AttendeeForTagging, DetailState};

/// Default number of cards added per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Case-insensitive match of an attendee against a lowercase search needle.
fn matches(attendee: &AttendeeForTagging, needle: &str) -> bool {
    match &attendee.details {
        DetailState::Resolved(details) => {
            details.full_name().to_lowercase().contains(needle)
                || details.email.to_lowercase().contains(needle)
        }
        DetailState::Loading | DetailState::Unresolved => {
            attendee.user_id.to_lowercase().contains(needle)
        }
    }
}

/// Indices of the attendees matching `term`, in list order.
///
/// A blank term matches everything.
pub fn filter_attendees(attendees: &[AttendeeForTagging], term: &str) -> Vec<usize> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return (0..attendees.len()).collect();
    }

    attendees
        .iter()
        .enumerate()
        .filter(|(_, attendee)| matches(attendee, &needle))
        .map(|(index, _)| index)
        .collect()
}

/// Size of the visible window over a filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    display_count: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            display_count: page_size,
        }
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    /// Back to the first page, e.g. after the search term changes.
    pub fn reset(&mut self) {
        self.display_count = self.page_size;
    }

    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.display_count < filtered_len
    }

    /// Number of entries currently visible.
    pub fn window_len(&self, filtered_len: usize) -> usize {
        self.display_count.min(filtered_len)
    }

    /// Grow the window by one page, capped at the filtered length.
    ///
    /// Returns `false` when there was nothing more to show.
    pub fn load_more(&mut self, filtered_len: usize) -> bool {
        if !self.has_more(filtered_len) {
            return false;
        }
        self.display_count = (self.display_count + self.page_size).min(filtered_len);
        true
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserDetails;

    fn attendees(n: usize) -> Vec<AttendeeForTagging> {
        (0..n)
            .map(|i| AttendeeForTagging::new(&format!("user-{}", i), "org", "ev"))
            .collect()
    }

    fn resolved(id: &str, first: &str, last: &str, email: &str) -> AttendeeForTagging {
        let mut attendee = AttendeeForTagging::new(id, "org", "ev");
        attendee.details = DetailState::Resolved(UserDetails {
            id: id.to_string(),
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        });
        attendee
    }

    #[test]
    fn test_initial_window() {
        for n in [0, 1, 11, 12, 13, 30] {
            let pager = Pager::default();
            assert_eq!(pager.window_len(n), n.min(12), "n = {}", n);
            assert_eq!(pager.has_more(n), n > 12, "n = {}", n);
        }
    }

    #[test]
    fn test_load_more_grows_by_one_page_until_exhausted() {
        let mut pager = Pager::default();
        let len = 40;

        assert!(pager.load_more(len));
        assert_eq!(pager.display_count(), 24);
        assert!(pager.load_more(len));
        assert_eq!(pager.display_count(), 36);
        assert!(pager.load_more(len));
        assert_eq!(pager.display_count(), 40);
        assert!(!pager.has_more(len));
        assert!(!pager.load_more(len));
        assert_eq!(pager.display_count(), 40);
    }

    #[test]
    fn test_reset_returns_to_first_page() {
        let mut pager = Pager::new(5);
        pager.load_more(20);
        pager.load_more(20);
        assert_eq!(pager.display_count(), 15);
        pager.reset();
        assert_eq!(pager.display_count(), 5);
    }

    #[test]
    fn test_blank_term_matches_all() {
        let list = attendees(5);
        assert_eq!(filter_attendees(&list, ""), vec![0, 1, 2, 3, 4]);
        assert_eq!(filter_attendees(&list, "   "), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_loading_attendees_match_raw_id() {
        let list = attendees(15);
        // user-1, user-10 .. user-14
        assert_eq!(filter_attendees(&list, "USER-1").len(), 6);
    }

    #[test]
    fn test_resolved_attendees_match_name_or_email_not_id() {
        let list = vec![
            resolved("u1", "Ada", "Lovelace", "ada@example.com"),
            resolved("u2", "Grace", "Hopper", "grace@navy.mil"),
        ];

        assert_eq!(filter_attendees(&list, "ada love"), vec![0]);
        assert_eq!(filter_attendees(&list, "NAVY"), vec![1]);
        assert!(filter_attendees(&list, "u1").is_empty());
    }

    #[test]
    fn test_unresolved_attendees_fall_back_to_raw_id() {
        let mut attendee = AttendeeForTagging::new("u-missing", "org", "ev");
        attendee.details = DetailState::Unresolved;
        assert_eq!(filter_attendees(&[attendee], "missing"), vec![0]);
    }
}
