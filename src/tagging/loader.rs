//! Attendee loading and background detail enrichment.

use std::sync::Arc;

use futures_util::{stream, Stream, StreamExt};

use super::normalize::build_attendees;
use crate::models::{AttendeeForTagging, DetailState, PhotoRoute, UserDetails};
use crate::upstream::{ClientError, PhotoApi};

/// Header label used when the event title cannot be fetched.
pub const FALLBACK_EVENT_TITLE: &str = "Event";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load event attendees. Please try again later.";

/// Fetch the event title; failures fall back to a generic label.
pub async fn load_event_title(api: &dyn PhotoApi, route: &PhotoRoute) -> String {
    match api.get_event(&route.organization_id, &route.event_id).await {
        Ok(event) => event
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_EVENT_TITLE.to_string()),
        Err(e) => {
            tracing::warn!(event_id = %route.event_id, "Failed to load event title: {}", e);
            FALLBACK_EVENT_TITLE.to_string()
        }
    }
}

/// Fetch and normalize the attendee list. Every entry starts out loading.
pub async fn load_attendees(
    api: &dyn PhotoApi,
    route: &PhotoRoute,
) -> Result<Vec<AttendeeForTagging>, ClientError> {
    let raw = api
        .list_event_attendees(&route.organization_id, &route.event_id)
        .await?;
    let attendees = build_attendees(&raw, route);

    tracing::info!(
        event_id = %route.event_id,
        raw = raw.len(),
        attendees = attendees.len(),
        "Loaded event attendees"
    );
    Ok(attendees)
}

/// Resolve one attendee's profile.
///
/// The viewer's own profile is used as-is; other users are fetched and only
/// accepted with both names present.
pub async fn resolve_details(
    api: &dyn PhotoApi,
    viewer: Option<&UserDetails>,
    user_id: &str,
) -> DetailState {
    if let Some(viewer) = viewer.filter(|v| v.id == user_id) {
        return DetailState::Resolved(viewer.clone());
    }

    match api.get_user(user_id).await {
        Ok(record) => match UserDetails::from_record(user_id, record) {
            Some(details) => DetailState::Resolved(details),
            None => {
                tracing::debug!(user_id, "User record is missing a name");
                DetailState::Unresolved
            }
        },
        Err(e) => {
            tracing::warn!(user_id, "Failed to load user details: {}", e);
            DetailState::Unresolved
        }
    }
}

/// Resolve details for every user, at most `concurrency` at a time.
///
/// Results arrive in completion order, each tagged with its user ID.
pub fn enrich_details(
    api: Arc<dyn PhotoApi>,
    viewer: Option<UserDetails>,
    user_ids: Vec<String>,
    concurrency: usize,
) -> impl Stream<Item = (String, DetailState)> + Send {
    stream::iter(user_ids)
        .map(move |user_id| {
            let api = api.clone();
            let viewer = viewer.clone();
            async move {
                let state = resolve_details(api.as_ref(), viewer.as_ref(), &user_id).await;
                (user_id, state)
            }
        })
        .buffer_unordered(concurrency.max(1))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::RouteParams;
    use crate::upstream::fake::FakePhotoApi;

    fn route() -> PhotoRoute {
        RouteParams::new("org-1", "ev-1", "ph-1").complete().unwrap()
    }

    fn viewer() -> UserDetails {
        UserDetails {
            id: "u1".to_string(),
            email: "me@example.com".to_string(),
            first_name: "Me".to_string(),
            last_name: "Myself".to_string(),
        }
    }

    #[tokio::test]
    async fn test_event_title_falls_back() {
        let api = FakePhotoApi::new();
        assert_eq!(load_event_title(&api, &route()).await, "Event");

        let api = FakePhotoApi::new().with_event_title("Summer Gala");
        assert_eq!(load_event_title(&api, &route()).await, "Summer Gala");
    }

    #[tokio::test]
    async fn test_load_attendees_propagates_list_failure() {
        let api = FakePhotoApi::new();
        assert!(load_attendees(&api, &route()).await.is_err());
    }

    #[tokio::test]
    async fn test_viewer_resolves_without_fetch() {
        let api = FakePhotoApi::new();
        let me = viewer();

        let state = resolve_details(&api, Some(&me), "u1").await;
        assert_eq!(state, DetailState::Resolved(me));
        assert!(api.fetched_users().is_empty());
    }

    #[tokio::test]
    async fn test_failed_or_incomplete_fetch_is_unresolved() {
        let api = FakePhotoApi::new().with_user("u3", "Ada", "", "ada@example.com");

        assert_eq!(resolve_details(&api, None, "u2").await, DetailState::Unresolved);
        assert_eq!(resolve_details(&api, None, "u3").await, DetailState::Unresolved);
    }

    #[tokio::test]
    async fn test_enrich_details_yields_one_result_per_user() {
        let api: Arc<dyn PhotoApi> = Arc::new(
            FakePhotoApi::new()
                .with_user("u2", "Grace", "Hopper", "grace@example.com")
                .with_user("u3", "Alan", "Turing", "alan@example.com"),
        );
        let ids = vec!["u1".to_string(), "u2".to_string(), "u3".to_string(), "u4".to_string()];

        let results: HashMap<String, DetailState> =
            enrich_details(api, Some(viewer()), ids, 2).collect().await;

        assert_eq!(results.len(), 4);
        assert!(matches!(results["u1"], DetailState::Resolved(_)));
        assert!(matches!(results["u2"], DetailState::Resolved(_)));
        assert!(matches!(results["u3"], DetailState::Resolved(_)));
        assert_eq!(results["u4"], DetailState::Unresolved);
    }
}
