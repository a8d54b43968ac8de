//! Tagging page endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CancelResponse, CreatePageRequest, PageView, SearchRequest};
use crate::tagging::{PageAction, PageHandle};
use crate::AppState;

/// Maximum accepted search term length.
const MAX_SEARCH_TERM_LEN: usize = 200;

fn parse_page_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid page id: {}", raw)))
}

async fn page(state: &AppState, raw_id: &str) -> Result<PageHandle, AppError> {
    let id = parse_page_id(raw_id)?;
    state.registry.get(id).await
}

/// POST /api/tag-pages - Open a tagging page.
pub async fn open_page(
    State(state): State<AppState>,
    Json(request): Json<CreatePageRequest>,
) -> ApiResult<PageView> {
    success(state.registry.open(request).await?)
}

/// GET /api/tag-pages/:id - Current page view.
pub async fn get_page(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PageView> {
    success(page(&state, &id).await?.view().await?)
}

/// DELETE /api/tag-pages/:id - Close a page.
pub async fn close_page(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.registry.close(parse_page_id(&id)?).await?;
    success(())
}

/// PUT /api/tag-pages/:id/search - Set the search term.
pub async fn search_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SearchRequest>,
) -> ApiResult<PageView> {
    if request.term.chars().count() > MAX_SEARCH_TERM_LEN {
        return Err(AppError::Validation(format!(
            "Search term must be at most {} characters",
            MAX_SEARCH_TERM_LEN
        )));
    }

    let handle = page(&state, &id).await?;
    success(handle.act(PageAction::Search(request.term)).await?)
}

/// POST /api/tag-pages/:id/load-more - Show the next page of cards.
pub async fn load_more(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PageView> {
    success(page(&state, &id).await?.act(PageAction::LoadMore).await?)
}

/// POST /api/tag-pages/:id/selection/:user_id - Toggle an attendee's selection.
pub async fn toggle_selection(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<PageView> {
    let handle = page(&state, &id).await?;
    success(handle.act(PageAction::Toggle(user_id)).await?)
}

/// POST /api/tag-pages/:id/submit - Tag the selected attendees in the photo.
pub async fn submit_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PageView> {
    success(page(&state, &id).await?.submit().await?)
}

/// DELETE /api/tag-pages/:id/alerts - Dismiss success and error alerts.
pub async fn dismiss_alerts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PageView> {
    success(page(&state, &id).await?.act(PageAction::DismissAlerts).await?)
}

/// POST /api/tag-pages/:id/cancel - Leave for the photo detail view.
pub async fn cancel_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CancelResponse> {
    let navigate_to = state.registry.cancel(parse_page_id(&id)?).await?;
    success(CancelResponse { navigate_to })
}
