//! State of one tagging page and the task that owns it.
//!
//! Every mutation goes through the page's command channel and is applied by a
//! single task, one command at a time. Upstream calls run in their own tasks and
//! report back through the same channel, so detail results, user commands and
//! submission outcomes never interleave.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use uuid::Uuid;

use super::loader::{
    enrich_details, load_attendees, load_event_title, FALLBACK_EVENT_TITLE, LOAD_FAILED_MESSAGE,
};
use super::pager::{filter_attendees, Pager, DEFAULT_PAGE_SIZE};
use super::selection::Selection;
use super::submitter::{
    failure_message, prepare_submission, submit, Submission, MISSING_IDENTIFIERS_MESSAGE,
    SUBMIT_SUCCESS_MESSAGE,
};
use super::view::card_view;
use crate::errors::AppError;
use crate::models::{
    AttendeeForTagging, DetailState, PageStatus, PageView, PhotoRoute, RouteParams, UserDetails,
};
use crate::upstream::{ClientError, PhotoApi};

const COMMAND_BUFFER: usize = 64;

/// Tunables shared by all pages.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub page_size: usize,
    pub detail_concurrency: usize,
    pub load_more_delay: Duration,
    pub redirect_delay: Duration,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            detail_concurrency: 8,
            load_more_delay: Duration::from_millis(200),
            redirect_delay: Duration::from_millis(1500),
        }
    }
}

/// Everything the tagging screen shows, owned by the page task.
#[derive(Debug)]
pub struct PageState {
    id: Uuid,
    route: RouteParams,
    event_title: String,
    status: PageStatus,
    load_error: Option<String>,
    attendees: Vec<AttendeeForTagging>,
    positions: HashMap<String, usize>,
    filtered: Vec<usize>,
    search_term: String,
    pager: Pager,
    is_loading_more: bool,
    selection: Selection,
    is_submitting: bool,
    success_message: Option<String>,
    error_message: Option<String>,
    navigate_to: Option<String>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PageState {
    pub fn new(id: Uuid, route: RouteParams, page_size: usize) -> Self {
        let now = Utc::now();
        Self {
            id,
            route,
            event_title: FALLBACK_EVENT_TITLE.to_string(),
            status: PageStatus::Loading,
            load_error: None,
            attendees: Vec::new(),
            positions: HashMap::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            pager: Pager::new(page_size),
            is_loading_more: false,
            selection: Selection::new(),
            is_submitting: false,
            success_message: None,
            error_message: None,
            navigate_to: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    fn refilter(&mut self) {
        self.filtered = filter_attendees(&self.attendees, &self.search_term);
    }

    pub fn set_event_title(&mut self, title: String) {
        self.event_title = title;
        self.touch();
    }

    /// Fatal load failure: nothing is shown except the error.
    pub fn fail_load(&mut self, message: &str) {
        self.status = PageStatus::Failed;
        self.load_error = Some(message.to_string());
        self.attendees.clear();
        self.positions.clear();
        self.filtered.clear();
        self.touch();
    }

    pub fn set_attendees(&mut self, attendees: Vec<AttendeeForTagging>) {
        self.positions = attendees
            .iter()
            .enumerate()
            .map(|(i, a)| (a.user_id.clone(), i))
            .collect();
        self.attendees = attendees;
        self.status = PageStatus::Ready;
        self.load_error = None;
        self.refilter();
        self.touch();
    }

    /// Record the outcome of an attendee's detail fetch.
    ///
    /// Only the first outcome per attendee is applied.
    pub fn apply_details(&mut self, user_id: &str, state: DetailState) -> bool {
        let Some(&index) = self.positions.get(user_id) else {
            return false;
        };
        let attendee = &mut self.attendees[index];
        if !attendee.is_loading_details() || state == DetailState::Loading {
            return false;
        }
        attendee.details = state;
        self.refilter();
        self.touch();
        true
    }

    pub fn set_search_term(&mut self, term: String) {
        self.search_term = term;
        self.pager.reset();
        self.refilter();
        self.touch();
    }

    /// Grow the visible window; the loading indicator stays on until `finish_load_more`.
    pub fn load_more(&mut self) -> bool {
        if !self.pager.load_more(self.filtered.len()) {
            return false;
        }
        self.is_loading_more = true;
        self.touch();
        true
    }

    pub fn finish_load_more(&mut self) {
        if self.is_loading_more {
            self.is_loading_more = false;
            self.touch();
        }
    }

    pub fn toggle_selection(&mut self, user_id: &str) -> bool {
        let Some(&index) = self.positions.get(user_id) else {
            return false;
        };
        let changed = self.selection.toggle(&self.attendees[index]);
        if changed {
            self.touch();
        }
        changed
    }

    /// Validate and mark the page as submitting.
    ///
    /// Validation failures become the error alert. Returns `None` when nothing
    /// should be posted.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.is_submitting {
            return None;
        }
        self.success_message = None;
        self.error_message = None;

        let result = prepare_submission(&self.route, self.selection.ordered_ids(&self.attendees));
        let submission = match result {
            Ok(submission) => {
                self.is_submitting = true;
                Some(submission)
            }
            Err(message) => {
                self.error_message = Some(message.to_string());
                None
            }
        };
        self.touch();
        submission
    }

    /// Apply the submission outcome. Returns `true` on success.
    pub fn finish_submit(&mut self, result: &Result<(), ClientError>) -> bool {
        self.is_submitting = false;
        let succeeded = match result {
            Ok(()) => {
                self.success_message = Some(SUBMIT_SUCCESS_MESSAGE.to_string());
                self.selection.clear();
                true
            }
            Err(e) => {
                tracing::warn!(page_id = %self.id, "Tagging request failed: {}", e);
                self.error_message = Some(failure_message(e));
                false
            }
        };
        self.touch();
        succeeded
    }

    /// Point the client back at the photo detail view.
    pub fn navigate_to_photo(&mut self) {
        self.navigate_to = self.route.complete().map(|route| route.photo_path());
        self.touch();
    }

    pub fn dismiss_alerts(&mut self) {
        self.success_message = None;
        self.error_message = None;
        self.touch();
    }

    pub fn view(&self) -> PageView {
        let window = self.pager.window_len(self.filtered.len());
        let cards = self.filtered[..window]
            .iter()
            .map(|&i| {
                let attendee = &self.attendees[i];
                card_view(attendee, self.selection.contains(&attendee.user_id))
            })
            .collect();

        PageView {
            id: self.id,
            route: self.route.clone(),
            event_title: self.event_title.clone(),
            status: self.status,
            load_error: self.load_error.clone(),
            search_term: self.search_term.clone(),
            cards,
            total_count: self.attendees.len(),
            filtered_count: self.filtered.len(),
            display_count: self.pager.display_count(),
            has_more: self.pager.has_more(self.filtered.len()),
            is_loading_more: self.is_loading_more,
            selected_user_ids: self.selection.ordered_ids(&self.attendees),
            is_submitting: self.is_submitting,
            success_message: self.success_message.clone(),
            error_message: self.error_message.clone(),
            navigate_to: self.navigate_to.clone(),
            version: self.version,
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

/// User commands that reply with the resulting view.
#[derive(Debug, Clone)]
pub enum PageAction {
    Snapshot,
    Search(String),
    LoadMore,
    Toggle(String),
    DismissAlerts,
    Cancel,
}

enum PageCommand {
    Action {
        action: PageAction,
        reply: oneshot::Sender<PageView>,
    },
    Submit {
        reply: oneshot::Sender<PageView>,
    },
    Close,
    EventTitleLoaded(String),
    AttendeesLoaded(Result<Vec<AttendeeForTagging>, String>),
    DetailsResolved {
        user_id: String,
        state: DetailState,
    },
    LoadMoreSettled,
    SubmitFinished {
        result: Result<(), ClientError>,
        reply: oneshot::Sender<PageView>,
    },
    Navigate,
}

/// Cloneable handle to a running page.
#[derive(Clone)]
pub struct PageHandle {
    id: Uuid,
    sender: mpsc::Sender<PageCommand>,
    last_active: Arc<Mutex<Instant>>,
}

impl PageHandle {
    /// Start a page task and, when the route is complete, its loader.
    pub fn spawn(
        id: Uuid,
        route: RouteParams,
        viewer: Option<UserDetails>,
        api: Arc<dyn PhotoApi>,
        settings: PageSettings,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let mut state = PageState::new(id, route.clone(), settings.page_size);

        match route.complete() {
            Some(photo_route) => {
                tokio::spawn(run_loader(
                    api.clone(),
                    photo_route,
                    viewer,
                    settings.detail_concurrency,
                    sender.clone(),
                ));
            }
            None => {
                tracing::warn!(page_id = %id, "Page opened without complete route identifiers");
                state.fail_load(MISSING_IDENTIFIERS_MESSAGE);
            }
        }

        let actor = PageActor {
            state,
            api,
            settings,
            sender: sender.downgrade(),
            receiver,
        };
        tokio::spawn(actor.run());

        Self {
            id,
            sender,
            last_active: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Time since the last command sent through this handle.
    pub fn idle_for(&self) -> Duration {
        let last = *self.last_active.lock().unwrap_or_else(|e| e.into_inner());
        last.elapsed()
    }

    fn mark_active(&self) {
        *self.last_active.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<PageView>) -> PageCommand,
    ) -> Result<PageView, AppError> {
        self.mark_active();
        let (reply, response) = oneshot::channel();
        self.sender
            .send(command(reply))
            .await
            .map_err(|_| self.closed())?;
        response.await.map_err(|_| self.closed())
    }

    fn closed(&self) -> AppError {
        AppError::NotFound(format!("Page {} is closed", self.id))
    }

    pub async fn act(&self, action: PageAction) -> Result<PageView, AppError> {
        self.request(|reply| PageCommand::Action { action, reply })
            .await
    }

    pub async fn view(&self) -> Result<PageView, AppError> {
        self.act(PageAction::Snapshot).await
    }

    /// Submit the selection and wait for the outcome.
    pub async fn submit(&self) -> Result<PageView, AppError> {
        self.request(|reply| PageCommand::Submit { reply }).await
    }

    /// Stop the page task. Late upstream results are discarded.
    pub async fn close(&self) {
        let _ = self.sender.send(PageCommand::Close).await;
    }
}

struct PageActor {
    state: PageState,
    api: Arc<dyn PhotoApi>,
    settings: PageSettings,
    sender: mpsc::WeakSender<PageCommand>,
    receiver: mpsc::Receiver<PageCommand>,
}

impl PageActor {
    async fn run(mut self) {
        while let Some(command) = self.receiver.recv().await {
            if let PageCommand::Close = command {
                break;
            }
            self.handle(command);
        }
        tracing::debug!(page_id = %self.state.id(), "Page task stopped");
    }

    fn handle(&mut self, command: PageCommand) {
        match command {
            PageCommand::Action { action, reply } => {
                self.apply(action);
                let _ = reply.send(self.state.view());
            }
            PageCommand::Submit { reply } => self.start_submit(reply),
            PageCommand::SubmitFinished { result, reply } => {
                if self.state.finish_submit(&result) {
                    self.send_later(self.settings.redirect_delay, PageCommand::Navigate);
                }
                let _ = reply.send(self.state.view());
            }
            PageCommand::EventTitleLoaded(title) => self.state.set_event_title(title),
            PageCommand::AttendeesLoaded(Ok(attendees)) => self.state.set_attendees(attendees),
            PageCommand::AttendeesLoaded(Err(message)) => self.state.fail_load(&message),
            PageCommand::DetailsResolved { user_id, state } => {
                self.state.apply_details(&user_id, state);
            }
            PageCommand::LoadMoreSettled => self.state.finish_load_more(),
            PageCommand::Navigate => self.state.navigate_to_photo(),
            PageCommand::Close => {}
        }
    }

    fn apply(&mut self, action: PageAction) {
        match action {
            PageAction::Snapshot => {}
            PageAction::Search(term) => self.state.set_search_term(term),
            PageAction::LoadMore => {
                if self.state.load_more() {
                    self.send_later(self.settings.load_more_delay, PageCommand::LoadMoreSettled);
                }
            }
            PageAction::Toggle(user_id) => {
                if !self.state.toggle_selection(&user_id) {
                    tracing::debug!(page_id = %self.state.id(), user_id = %user_id, "Ignored selection toggle");
                }
            }
            PageAction::DismissAlerts => self.state.dismiss_alerts(),
            PageAction::Cancel => self.state.navigate_to_photo(),
        }
    }

    fn start_submit(&mut self, reply: oneshot::Sender<PageView>) {
        let Some(sender) = self.sender.upgrade() else {
            let _ = reply.send(self.state.view());
            return;
        };
        let Some(submission) = self.state.begin_submit() else {
            let _ = reply.send(self.state.view());
            return;
        };

        let api = self.api.clone();
        tokio::spawn(async move {
            let result = submit(api.as_ref(), &submission).await;
            let _ = sender
                .send(PageCommand::SubmitFinished { result, reply })
                .await;
        });
    }

    /// Deliver `command` to this page after `delay`.
    fn send_later(&self, delay: Duration, command: PageCommand) {
        let Some(sender) = self.sender.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(command).await;
        });
    }
}

/// Load the title and attendees, then stream detail results into the page.
async fn run_loader(
    api: Arc<dyn PhotoApi>,
    route: PhotoRoute,
    viewer: Option<UserDetails>,
    concurrency: usize,
    sender: mpsc::Sender<PageCommand>,
) {
    let title = load_event_title(api.as_ref(), &route).await;
    if sender
        .send(PageCommand::EventTitleLoaded(title))
        .await
        .is_err()
    {
        return;
    }

    let attendees = match load_attendees(api.as_ref(), &route).await {
        Ok(attendees) => attendees,
        Err(e) => {
            tracing::error!(event_id = %route.event_id, "Failed to load attendees: {}", e);
            let _ = sender
                .send(PageCommand::AttendeesLoaded(Err(
                    LOAD_FAILED_MESSAGE.to_string()
                )))
                .await;
            return;
        }
    };

    let user_ids: Vec<String> = attendees.iter().map(|a| a.user_id.clone()).collect();
    if sender
        .send(PageCommand::AttendeesLoaded(Ok(attendees)))
        .await
        .is_err()
    {
        return;
    }

    let mut results = std::pin::pin!(enrich_details(api, viewer, user_ids, concurrency));
    while let Some((user_id, state)) = results.next().await {
        if sender
            .send(PageCommand::DetailsResolved { user_id, state })
            .await
            .is_err()
        {
            tracing::debug!(event_id = %route.event_id, "Page closed during enrichment");
            break;
        }
    }
}
