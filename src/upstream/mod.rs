//! Client for the backend REST API (organizations, events, users, photo tags).

mod client;
mod error;

#[cfg(test)]
pub mod fake;

pub use client::HttpPhotoApi;
pub use error::ClientError;

use async_trait::async_trait;

use crate::models::{EventRecord, RawAttendee, TagPhotoRequest, UserRecord};

/// Backend operations the tagging page depends on.
#[async_trait]
pub trait PhotoApi: Send + Sync {
    /// `GET /organizations/{orgId}/events/{eventId}`
    async fn get_event(&self, org_id: &str, event_id: &str) -> Result<EventRecord, ClientError>;

    /// Raw attendee entries of an event.
    async fn list_event_attendees(
        &self,
        org_id: &str,
        event_id: &str,
    ) -> Result<Vec<RawAttendee>, ClientError>;

    /// `GET /users/{userId}`
    async fn get_user(&self, user_id: &str) -> Result<UserRecord, ClientError>;

    /// `POST /organizations/{orgId}/events/{eventId}/photos/{photoId}/tags`
    async fn tag_photo(
        &self,
        org_id: &str,
        event_id: &str,
        photo_id: &str,
        request: &TagPhotoRequest,
    ) -> Result<(), ClientError>;
}
