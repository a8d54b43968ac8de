//! Attendee models: raw backend entries, user profiles and the tagging view-model.

use serde::{Deserialize, Serialize};

/// Role assigned to every attendee on the tagging screen.
pub const DEFAULT_ROLE: &str = "member";

/// Profile details of a user, as shown on a member card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub id: String,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserDetails {
    /// Build details from a backend user record.
    ///
    /// Returns `None` unless both first and last name are present.
    pub fn from_record(user_id: &str, record: UserRecord) -> Option<Self> {
        let first_name = record.first_name.filter(|s| !s.trim().is_empty())?;
        let last_name = record.last_name.filter(|s| !s.trim().is_empty())?;

        Some(Self {
            id: record.id.unwrap_or_else(|| user_id.to_string()),
            email: record.email.unwrap_or_default(),
            first_name,
            last_name,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// User record returned by `GET /users/{userId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// One entry of the event attendee list as the backend returns it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAttendee {
    /// Plain or key-prefixed identifier, e.g. `"u1"` or `"USER#u1"`.
    Id(String),
    /// Attendance record carrying a `userId` field.
    Record(RawAttendeeRecord),
    /// Anything else; normalizes to an empty ID and is dropped.
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttendeeRecord {
    pub user_id: String,
}

/// Resolution state of an attendee's profile details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Resolved(UserDetails),
    /// The fetch failed or returned incomplete data.
    Unresolved,
}

/// An event attendee that can be tagged in the photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeForTagging {
    pub pk: String,
    pub sk: String,
    pub user_id: String,
    pub role: String,
    pub organization_name: String,
    pub event_id: String,
    pub details: DetailState,
}

impl AttendeeForTagging {
    pub fn new(user_id: &str, organization_name: &str, event_id: &str) -> Self {
        Self {
            pk: format!("USER#{}", user_id),
            sk: format!("EVENT#{}", event_id),
            user_id: user_id.to_string(),
            role: DEFAULT_ROLE.to_string(),
            organization_name: organization_name.to_string(),
            event_id: event_id.to_string(),
            details: DetailState::Loading,
        }
    }

    pub fn user_details(&self) -> Option<&UserDetails> {
        match &self.details {
            DetailState::Resolved(details) => Some(details),
            _ => None,
        }
    }

    pub fn is_loading_details(&self) -> bool {
        matches!(self.details, DetailState::Loading)
    }

    /// Only attendees with resolved details can be selected.
    pub fn is_selectable(&self) -> bool {
        self.user_details().is_some()
    }
}
