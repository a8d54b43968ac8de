//! Page session models: route parameters, requests and the page view snapshot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserDetails;

/// Identifiers taken from the screen's URL path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteParams {
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub photo_id: Option<String>,
}

/// A complete set of route identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRoute {
    pub organization_id: String,
    pub event_id: String,
    pub photo_id: String,
}

impl PhotoRoute {
    /// Path of the photo detail view, used for cancel and post-submit redirect.
    pub fn photo_path(&self) -> String {
        format!(
            "/organizations/{}/events/{}/photos/{}",
            self.organization_id, self.event_id, self.photo_id
        )
    }
}

impl RouteParams {
    pub fn new(organization_id: &str, event_id: &str, photo_id: &str) -> Self {
        Self {
            organization_id: Some(organization_id.to_string()),
            event_id: Some(event_id.to_string()),
            photo_id: Some(photo_id.to_string()),
        }
    }

    /// Returns the full route, or `None` when any identifier is missing or blank.
    pub fn complete(&self) -> Option<PhotoRoute> {
        fn present(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Some(PhotoRoute {
            organization_id: present(&self.organization_id)?,
            event_id: present(&self.event_id)?,
            photo_id: present(&self.photo_id)?,
        })
    }
}

/// Request body for opening a tagging page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    #[serde(flatten)]
    pub route: RouteParams,
    /// Profile of the authenticated viewer, already known to the client.
    #[serde(default)]
    pub viewer: Option<UserDetails>,
}

/// Request body for updating the search term.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
}

/// Load state of the attendee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Loading,
    Ready,
    Failed,
}

/// Detail resolution as reported on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStatus {
    Loading,
    Resolved,
    Unresolved,
}

/// One member card in the visible window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub pk: String,
    pub sk: String,
    pub user_id: String,
    pub role: String,
    pub organization_name: String,
    pub event_id: String,
    pub user_details: Option<UserDetails>,
    pub is_loading_details: bool,
    pub detail_status: DetailStatus,
    pub display_name: String,
    pub display_email: Option<String>,
    pub initials: String,
    pub is_selected: bool,
    pub is_selectable: bool,
}

/// Snapshot of a page session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub id: Uuid,
    pub route: RouteParams,
    pub event_title: String,
    pub status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_error: Option<String>,
    pub search_term: String,
    pub cards: Vec<CardView>,
    pub total_count: usize,
    pub filtered_count: usize,
    pub display_count: usize,
    pub has_more: bool,
    pub is_loading_more: bool,
    pub selected_user_ids: Vec<String>,
    pub is_submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<String>,
    pub version: u64,
    pub created_at: String,
    pub updated_at: String,
}

/// Response to cancelling a page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub navigate_to: Option<String>,
}
