//! Validation and submission of a tagging request.

use crate::models::{PhotoRoute, RouteParams, TagPhotoRequest};
use crate::upstream::{ClientError, PhotoApi};

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select at least one member to tag.";
pub const MISSING_IDENTIFIERS_MESSAGE: &str = "Missing organization, event, or photo identifier.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to tag members. Please try again.";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Members tagged successfully!";

/// A validated submission, ready to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub route: PhotoRoute,
    pub request: TagPhotoRequest,
}

/// Check the preconditions of a submission; the error is the user-visible message.
pub fn prepare_submission(
    route: &RouteParams,
    selected_user_ids: Vec<String>,
) -> Result<Submission, &'static str> {
    if selected_user_ids.is_empty() {
        return Err(EMPTY_SELECTION_MESSAGE);
    }
    let route = route.complete().ok_or(MISSING_IDENTIFIERS_MESSAGE)?;

    Ok(Submission {
        route,
        request: TagPhotoRequest {
            user_ids: selected_user_ids,
        },
    })
}

/// Post the submission to the backend.
pub async fn submit(api: &dyn PhotoApi, submission: &Submission) -> Result<(), ClientError> {
    let route = &submission.route;
    tracing::info!(
        photo_id = %route.photo_id,
        count = submission.request.user_ids.len(),
        "Tagging members in photo"
    );

    api.tag_photo(
        &route.organization_id,
        &route.event_id,
        &route.photo_id,
        &submission.request,
    )
    .await
}

/// User-visible message for a failed submission.
pub fn failure_message(err: &ClientError) -> String {
    err.backend_message()
        .unwrap_or(SUBMIT_FAILED_MESSAGE)
        .to_string()
}
