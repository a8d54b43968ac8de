//! Wire models exchanged with the backend for events and photo tags.

use serde::{Deserialize, Serialize};

use super::RawAttendee;

/// Request body for `POST .../photos/{photoId}/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPhotoRequest {
    pub user_ids: Vec<String>,
}

/// Error body the backend may send with a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Event record returned by `GET /organizations/{orgId}/events/{eventId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub title: Option<String>,
}

/// The attendee list comes back either bare or wrapped in an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttendeeListResponse {
    List(Vec<RawAttendee>),
    Wrapped { attendees: Vec<RawAttendee> },
}

impl AttendeeListResponse {
    pub fn into_entries(self) -> Vec<RawAttendee> {
        match self {
            AttendeeListResponse::List(entries) => entries,
            AttendeeListResponse::Wrapped { attendees } => attendees,
        }
    }
}
