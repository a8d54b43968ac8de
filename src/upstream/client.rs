use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};

use super::error::ClientError;
use super::PhotoApi;
use crate::models::{
    AttendeeListResponse, EventRecord, RawAttendee, TagPhotoRequest, UpstreamErrorBody,
    UserRecord,
};

/// `PhotoApi` backed by the backend's REST endpoints.
#[derive(Clone)]
pub struct HttpPhotoApi {
    http_client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpPhotoApi {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base_url: Url = base_url
            .parse()
            .map_err(|e| ClientError::Url(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Url(format!("{} cannot be a base URL", base_url)));
        }

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            token,
        })
    }

    /// Append percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get(&self, segments: &[&str]) -> Result<Response, ClientError> {
        let url = self.url(segments)?;
        let response = self.authorize(self.http_client.get(url)).send().await?;
        ensure_success(response).await
    }
}

/// Turn a non-success status into `ClientError::Remote`, keeping the backend's message.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<UpstreamErrorBody>(&body)
        .ok()
        .and_then(|b| b.message);

    Err(ClientError::Remote { status, message })
}

#[async_trait]
impl PhotoApi for HttpPhotoApi {
    async fn get_event(&self, org_id: &str, event_id: &str) -> Result<EventRecord, ClientError> {
        let response = self
            .get(&["organizations", org_id, "events", event_id])
            .await?;
        Ok(response.json().await?)
    }

    async fn list_event_attendees(
        &self,
        org_id: &str,
        event_id: &str,
    ) -> Result<Vec<RawAttendee>, ClientError> {
        let response = self
            .get(&["organizations", org_id, "events", event_id, "attendees"])
            .await?;
        let list: AttendeeListResponse = response.json().await?;
        Ok(list.into_entries())
    }

    async fn get_user(&self, user_id: &str) -> Result<UserRecord, ClientError> {
        let response = self.get(&["users", user_id]).await?;
        Ok(response.json().await?)
    }

    async fn tag_photo(
        &self,
        org_id: &str,
        event_id: &str,
        photo_id: &str,
        request: &TagPhotoRequest,
    ) -> Result<(), ClientError> {
        let url = self.url(&[
            "organizations",
            org_id,
            "events",
            event_id,
            "photos",
            photo_id,
            "tags",
        ])?;
        let response = self
            .authorize(self.http_client.post(url))
            .json(request)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
