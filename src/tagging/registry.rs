//! Registry of open tagging pages.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::page::{PageAction, PageHandle, PageSettings};
use crate::errors::AppError;
use crate::models::{CreatePageRequest, PageView};
use crate::upstream::PhotoApi;

/// Upper bound on how often idle pages are swept.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// All live pages, keyed by page ID.
pub struct PageRegistry {
    pages: RwLock<HashMap<Uuid, PageHandle>>,
    api: Arc<dyn PhotoApi>,
    settings: PageSettings,
}

impl PageRegistry {
    pub fn new(api: Arc<dyn PhotoApi>, settings: PageSettings) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            api,
            settings,
        }
    }

    /// Open a page for a route; attendees load in the background.
    pub async fn open(&self, request: CreatePageRequest) -> Result<PageView, AppError> {
        let id = Uuid::new_v4();
        let handle = PageHandle::spawn(
            id,
            request.route,
            request.viewer,
            self.api.clone(),
            self.settings.clone(),
        );
        self.pages.write().await.insert(id, handle.clone());

        tracing::info!(page_id = %id, "Opened tagging page");
        handle.view().await
    }

    pub async fn get(&self, id: Uuid) -> Result<PageHandle, AppError> {
        self.pages
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", id)))
    }

    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let handle = self
            .pages
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Page {} not found", id)))?;
        handle.close().await;

        tracing::info!(page_id = %id, "Closed tagging page");
        Ok(())
    }

    /// Leave the page for the photo detail view. Returns the navigation target.
    pub async fn cancel(&self, id: Uuid) -> Result<Option<String>, AppError> {
        let view = self.get(id).await?.act(PageAction::Cancel).await?;
        self.close(id).await?;
        Ok(view.navigate_to)
    }

    /// Close pages that have not received a command within `ttl`.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let expired: Vec<PageHandle> = {
            let mut pages = self.pages.write().await;
            let ids: Vec<Uuid> = pages
                .iter()
                .filter(|(_, handle)| handle.idle_for() >= ttl)
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| pages.remove(id)).collect()
        };

        for handle in &expired {
            tracing::info!(page_id = %handle.id(), "Evicting idle tagging page");
            handle.close().await;
        }
        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }
}

/// Periodically evict idle pages.
pub fn spawn_idle_sweeper(registry: Arc<PageRegistry>, ttl: Duration) -> JoinHandle<()> {
    let period = ttl.min(MAX_SWEEP_INTERVAL).max(Duration::from_millis(10));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = registry.evict_idle(ttl).await;
            if evicted > 0 {
                let remaining = registry.len().await;
                tracing::debug!(
                    evicted,
                    remaining,
                    "Swept idle tagging pages"
                );
            }
        }
    })
}
