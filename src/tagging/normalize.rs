//! Normalization of raw attendee entries into tagging view-models.

use std::collections::HashSet;

use crate::models::{AttendeeForTagging, PhotoRoute, RawAttendee};

/// Separator between a record-key type prefix and the identifier (`USER#id`).
pub const KEY_SEPARATOR: char = '#';

/// Strip a `TYPE#` record-key prefix from an identifier.
///
/// Only the first separator is significant: `USER#a#b` yields `a#b`.
pub fn strip_key_prefix(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.split_once(KEY_SEPARATOR) {
        Some((_, id)) => id.trim(),
        None => raw,
    }
}

/// Reduce a raw attendee entry to a bare user ID. Unusable entries yield `""`.
pub fn normalize_attendee_id(raw: &RawAttendee) -> String {
    match raw {
        RawAttendee::Id(id) => strip_key_prefix(id).to_string(),
        RawAttendee::Record(record) => strip_key_prefix(&record.user_id).to_string(),
        RawAttendee::Other(_) => String::new(),
    }
}

/// Build the attendee list for a route, dropping empty and duplicate IDs.
pub fn build_attendees(raw: &[RawAttendee], route: &PhotoRoute) -> Vec<AttendeeForTagging> {
    let mut seen = HashSet::new();

    raw.iter()
        .map(normalize_attendee_id)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .map(|id| AttendeeForTagging::new(&id, &route.organization_id, &route.event_id))
        .collect()
}
