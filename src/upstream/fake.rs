//! In-memory `PhotoApi` used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{ClientError, PhotoApi};
use crate::models::{EventRecord, RawAttendee, TagPhotoRequest, UserRecord};

#[derive(Default)]
pub struct FakePhotoApi {
    event_title: Option<String>,
    attendees: Option<Vec<RawAttendee>>,
    users: HashMap<String, UserRecord>,
    tag_error: Option<ClientError>,
    user_gate: Option<Arc<Semaphore>>,
    pub user_calls: Mutex<Vec<String>>,
    pub tag_calls: Mutex<Vec<(String, String, String, TagPhotoRequest)>>,
    pub attendee_calls: Mutex<usize>,
}

impl FakePhotoApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_title(mut self, title: &str) -> Self {
        self.event_title = Some(title.to_string());
        self
    }

    pub fn with_attendees(mut self, ids: &[&str]) -> Self {
        self.attendees = Some(ids.iter().map(|id| RawAttendee::Id(id.to_string())).collect());
        self
    }

    pub fn with_user(mut self, id: &str, first: &str, last: &str, email: &str) -> Self {
        self.users.insert(
            id.to_string(),
            UserRecord {
                id: Some(id.to_string()),
                email: Some(email.to_string()),
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
            },
        );
        self
    }

    pub fn with_tag_error(mut self, status: u16, message: Option<&str>) -> Self {
        self.tag_error = Some(ClientError::Remote {
            status,
            message: message.map(str::to_string),
        });
        self
    }

    /// Hold every `get_user` call until the gate hands out a permit.
    pub fn with_user_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.user_gate = Some(gate);
        self
    }

    pub fn tag_requests(&self) -> Vec<TagPhotoRequest> {
        self.tag_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, _, request)| request.clone())
            .collect()
    }

    pub fn fetched_users(&self) -> Vec<String> {
        self.user_calls.lock().unwrap().clone()
    }
}

fn not_found() -> ClientError {
    ClientError::Remote {
        status: 404,
        message: Some("Not found".to_string()),
    }
}

#[async_trait]
impl PhotoApi for FakePhotoApi {
    async fn get_event(&self, _org_id: &str, _event_id: &str) -> Result<EventRecord, ClientError> {
        match &self.event_title {
            Some(title) => Ok(EventRecord {
                title: Some(title.clone()),
            }),
            None => Err(not_found()),
        }
    }

    async fn list_event_attendees(
        &self,
        _org_id: &str,
        _event_id: &str,
    ) -> Result<Vec<RawAttendee>, ClientError> {
        *self.attendee_calls.lock().unwrap() += 1;
        match &self.attendees {
            Some(entries) => Ok(entries.clone()),
            None => Err(ClientError::Remote {
                status: 500,
                message: None,
            }),
        }
    }

    async fn get_user(&self, user_id: &str) -> Result<UserRecord, ClientError> {
        self.user_calls.lock().unwrap().push(user_id.to_string());
        if let Some(gate) = &self.user_gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.users.get(user_id).cloned().ok_or_else(not_found)
    }

    async fn tag_photo(
        &self,
        org_id: &str,
        event_id: &str,
        photo_id: &str,
        request: &TagPhotoRequest,
    ) -> Result<(), ClientError> {
        self.tag_calls.lock().unwrap().push((
            org_id.to_string(),
            event_id.to_string(),
            photo_id.to_string(),
            request.clone(),
        ));
        match &self.tag_error {
            Some(ClientError::Remote { status, message }) => Err(ClientError::Remote {
                status: *status,
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }
}
