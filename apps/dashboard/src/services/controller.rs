//! Sequencing of user actions against the collaborator endpoints.
//!
//! The controller owns the connection state and the current accounts
//! snapshot. It is shared behind an `Rc` on the UI thread; no `RefCell`
//! borrow is held across an `.await`, so overlapping actions interleave
//! freely and the request tracker decides which results may land.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::models::{AccountsSnapshot, QuestionAnswer};
use crate::services::aggregate::aggregate_by_type;
use crate::services::browser::{Browser, CallbackParams};
use crate::services::fetcher::DataFetcher;
use crate::state::{Action, DashboardState, Ticket};
use crate::ui::render::{
    render_accounts_table, render_analysis, render_analysis_unavailable, render_answer,
    render_chart, render_connection, render_table_error, AnalysisView, AnswerView,
    ChartDataset, ConnectionView, Control, Notice, TableRow, ViewRenderer,
    LOADING_ACCOUNTS_MESSAGE,
};

pub const NOT_CONNECTED_MESSAGE: &str =
    "Not connected to QuickBooks. Connect your account before loading data.";
pub const MISSING_REALM_MESSAGE: &str =
    "Connected, but no company (realm) id was reported. Reconnect to QuickBooks.";
pub const LOAD_ACCOUNTS_FIRST_MESSAGE: &str = "Please load your accounts before asking a question.";
pub const ANALYZE_WITHOUT_ACCOUNTS_MESSAGE: &str =
    "Please load your accounts before running an analysis.";
pub const EMPTY_QUESTION_MESSAGE: &str = "Please enter a question.";
pub const AUTH_SUCCESS_MESSAGE: &str = "Authentication successful! Returning to your dashboard...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed(String),
    /// A precondition was not met; no request was sent for the action itself.
    Blocked(String),
    /// A newer request of the same action was issued; this result was dropped.
    Superseded,
}

#[derive(Clone, Debug)]
pub struct ControllerSettings {
    pub dashboard_path: String,
    pub callback_redirect_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            dashboard_path: "/dashboard".into(),
            callback_redirect_delay: Duration::from_millis(2_000),
        }
    }
}

pub struct InteractionController<F, R, B> {
    fetcher: F,
    renderer: R,
    browser: B,
    settings: ControllerSettings,
    state: RefCell<DashboardState>,
}

pub type SharedController<F, R, B> = Rc<InteractionController<F, R, B>>;

impl<F, R, B> InteractionController<F, R, B>
where
    F: DataFetcher,
    R: ViewRenderer,
    B: Browser,
{
    pub fn new(fetcher: F, renderer: R, browser: B, settings: ControllerSettings) -> Self {
        Self {
            fetcher,
            renderer,
            browser,
            settings,
            state: RefCell::new(DashboardState::default()),
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[cfg(test)]
    pub fn browser(&self) -> &B {
        &self.browser
    }

    #[cfg(test)]
    pub fn connection(&self) -> crate::state::ConnectionState {
        self.state.borrow().connection.clone()
    }

    pub fn snapshot(&self) -> Option<Rc<AccountsSnapshot>> {
        self.state.borrow().snapshot.clone()
    }

    /// Page-load sequence: initial render, callback handling, then the status
    /// probe and suggested questions side by side. The callback redirect timer
    /// runs alongside the probes.
    pub async fn start(&self) {
        self.renderer.render_table(render_accounts_table(None));
        self.renderer.render_chart(ChartDataset::default());
        self.renderer.render_panels(AnalysisView::Idle);
        self.renderer.render_answer(AnswerView::Empty);
        self.renderer.set_enabled(Control::Connect, true);
        self.renderer.set_enabled(Control::LoadAccounts, true);
        self.renderer.set_enabled(Control::Analyze, false);
        self.renderer.set_enabled(Control::Ask, false);

        let callback = self
            .browser
            .query_string()
            .and_then(|query| CallbackParams::from_query(&query));

        if let Some(callback) = callback.as_ref() {
            info!(realm_id = %callback.realm_id, "authorization callback detected");
            if let Err(err) = self.browser.remember_realm_id(&callback.realm_id) {
                warn!("could not store realm id hint: {err}");
            }
            self.renderer
                .render_notice(Some(Notice::success(AUTH_SUCCESS_MESSAGE)));
        }

        let strip_callback = async {
            if callback.is_none() {
                return;
            }
            self.browser
                .sleep(self.settings.callback_redirect_delay)
                .await;
            if let Err(err) = self.browser.navigate(&self.settings.dashboard_path) {
                error!("failed to strip callback parameters: {err}");
            }
        };

        futures::join!(
            self.refresh_status(),
            self.load_suggested_questions(),
            strip_callback
        );
    }

    /// Probes the collaborator. Returns `true` only when the probe succeeded
    /// and reported a live session.
    pub async fn refresh_status(&self) -> bool {
        self.renderer.render_connection(ConnectionView::checking());

        let hint = self.browser.stored_realm_id();
        let result = self.fetcher.fetch_connection_status(hint.as_deref()).await;

        let connection = {
            let mut state = self.state.borrow_mut();
            match &result {
                Ok(status) => state.connection.apply(status),
                Err(failure) => state.connection.fail(failure.message.clone()),
            }
            state.connection.clone()
        };

        match &result {
            Ok(status) => {
                info!(connected = status.connected, realm_id = ?status.realm_id, "connection status");
                if let Some(realm_id) = connection.confirmed_realm() {
                    if let Err(err) = self.browser.remember_realm_id(realm_id) {
                        warn!("could not store realm id hint: {err}");
                    }
                }
            }
            Err(failure) => error!(kind = ?failure.kind, "connection status probe failed: {failure}"),
        }

        self.renderer.render_connection(render_connection(&connection));
        connection.connected
    }

    /// Sends the browser to the authorization URL. Completion is detected by
    /// the status probe when the page comes back.
    pub async fn begin_connect(&self) -> ActionOutcome {
        self.renderer.set_enabled(Control::Connect, false);

        let outcome = match self.fetcher.fetch_auth_url().await {
            Ok(url) => match self.browser.navigate(&url) {
                Ok(()) => {
                    info!("redirecting to authorization page");
                    ActionOutcome::Completed
                }
                Err(err) => {
                    error!("authorization redirect failed: {err}");
                    ActionOutcome::Failed(err.to_string())
                }
            },
            Err(failure) => {
                error!("failed to obtain authorization url: {failure}");
                ActionOutcome::Failed(failure.message)
            }
        };

        if let ActionOutcome::Failed(message) = &outcome {
            self.renderer.render_connection(ConnectionView {
                label: format!("Could not start QuickBooks connection: {message}"),
                tone: crate::ui::render::StatusTone::Error,
            });
        }
        self.renderer.set_enabled(Control::Connect, true);
        outcome
    }

    pub async fn load_suggested_questions(&self) {
        match self.fetcher.fetch_suggested_questions().await {
            Ok(questions) => {
                debug!(count = questions.len(), "suggested questions loaded");
                self.renderer.render_suggestions(questions);
            }
            Err(failure) => {
                warn!("suggested questions unavailable: {failure}");
                self.renderer.render_suggestions(Vec::new());
            }
        }
    }

    /// Copies a suggestion into the question input without submitting it.
    pub fn choose_suggestion(&self, question: &str) {
        self.renderer.fill_question(question);
    }

    pub async fn load_accounts(&self) -> ActionOutcome {
        let ticket = self.issue(Action::LoadAccounts);
        self.renderer.set_enabled(Control::LoadAccounts, false);
        self.renderer
            .render_table(vec![TableRow::Placeholder(LOADING_ACCOUNTS_MESSAGE.into())]);

        let realm_id = match self.resolve_realm().await {
            Ok(realm_id) => realm_id,
            Err(message) => {
                if !self.is_current(ticket) {
                    return ActionOutcome::Superseded;
                }
                warn!("load accounts blocked: {message}");
                self.renderer.render_table(vec![TableRow::Error(message.clone())]);
                self.renderer.set_enabled(Control::LoadAccounts, true);
                return ActionOutcome::Blocked(message);
            }
        };

        if !self.is_current(ticket) {
            return ActionOutcome::Superseded;
        }

        info!(%realm_id, seq = ticket.seq, "loading accounts");
        let result = self.fetcher.fetch_accounts(&realm_id).await;

        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, "discarding stale accounts response");
            return ActionOutcome::Superseded;
        }

        match result {
            Ok(snapshot) => {
                let snapshot = Rc::new(snapshot);
                self.replace_snapshot(Some(Rc::clone(&snapshot)));
                info!(count = snapshot.len(), "accounts loaded");

                self.renderer
                    .render_table(render_accounts_table(Some(&snapshot)));
                self.renderer
                    .render_chart(render_chart(&aggregate_by_type(&snapshot)));
                self.renderer.set_enabled(Control::Ask, true);
                self.renderer.set_enabled(Control::LoadAccounts, true);

                self.analyze().await;
                ActionOutcome::Completed
            }
            Err(failure) => {
                error!(kind = ?failure.kind, "failed to load accounts: {failure}");
                self.replace_snapshot(None);

                self.renderer.render_table(render_table_error(&failure.message));
                self.renderer.render_chart(ChartDataset::default());
                self.renderer.render_panels(AnalysisView::Idle);
                self.renderer.set_enabled(Control::Ask, false);
                self.renderer.set_enabled(Control::Analyze, false);
                self.renderer.set_enabled(Control::LoadAccounts, true);
                ActionOutcome::Failed(failure.message)
            }
        }
    }

    pub async fn analyze(&self) -> ActionOutcome {
        let Some(snapshot) = self.snapshot() else {
            warn!("analysis requested before accounts were loaded");
            self.renderer
                .render_panels(AnalysisView::Message(ANALYZE_WITHOUT_ACCOUNTS_MESSAGE.into()));
            return ActionOutcome::Blocked(ANALYZE_WITHOUT_ACCOUNTS_MESSAGE.into());
        };

        let ticket = self.issue(Action::Analyze);
        self.renderer.set_enabled(Control::Analyze, false);
        self.renderer.render_panels(AnalysisView::Loading);

        let result = self.fetcher.fetch_analysis(&snapshot).await;

        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, "discarding stale analysis");
            return ActionOutcome::Superseded;
        }

        let outcome = match result {
            Ok(analysis) => {
                self.renderer
                    .render_panels(AnalysisView::Ready(render_analysis(&analysis)));
                ActionOutcome::Completed
            }
            Err(failure) => {
                error!(kind = ?failure.kind, "analysis failed: {failure}");
                self.renderer.render_panels(AnalysisView::Ready(
                    render_analysis_unavailable(&failure.message),
                ));
                ActionOutcome::Failed(failure.message)
            }
        };

        self.renderer
            .set_enabled(Control::Analyze, self.snapshot().is_some());
        outcome
    }

    pub async fn ask_question(&self, question: &str) -> ActionOutcome {
        let Some(snapshot) = self.snapshot() else {
            warn!("question asked before accounts were loaded");
            self.renderer
                .render_answer(AnswerView::Error(LOAD_ACCOUNTS_FIRST_MESSAGE.into()));
            return ActionOutcome::Blocked(LOAD_ACCOUNTS_FIRST_MESSAGE.into());
        };

        let question = question.trim();
        if question.is_empty() {
            self.renderer
                .render_answer(AnswerView::Error(EMPTY_QUESTION_MESSAGE.into()));
            return ActionOutcome::Blocked(EMPTY_QUESTION_MESSAGE.into());
        }

        let ticket = self.issue(Action::Ask);
        self.renderer.set_enabled(Control::Ask, false);
        self.renderer.render_answer(AnswerView::Pending {
            question: question.to_string(),
        });

        let result = self.fetcher.fetch_answer(&snapshot, question).await;

        if !self.is_current(ticket) {
            debug!(seq = ticket.seq, "discarding stale answer");
            return ActionOutcome::Superseded;
        }

        let outcome = match result {
            Ok(answer) => {
                self.renderer.render_answer(render_answer(&QuestionAnswer {
                    question: question.to_string(),
                    answer,
                }));
                ActionOutcome::Completed
            }
            Err(failure) => {
                error!(kind = ?failure.kind, "question failed: {failure}");
                self.renderer.render_answer(AnswerView::Error(format!(
                    "Could not answer the question: {}",
                    failure.message
                )));
                ActionOutcome::Failed(failure.message)
            }
        };

        self.renderer.set_enabled(Control::Ask, self.snapshot().is_some());
        outcome
    }

    /// Realm id confirmed by the session, re-probing when it is not yet confirmed.
    async fn resolve_realm(&self) -> Result<String, String> {
        if let Some(realm_id) = self.state.borrow().connection.confirmed_realm() {
            return Ok(realm_id.to_string());
        }

        if !self.refresh_status().await {
            return Err(NOT_CONNECTED_MESSAGE.into());
        }

        self.state
            .borrow()
            .connection
            .confirmed_realm()
            .map(str::to_string)
            .ok_or_else(|| MISSING_REALM_MESSAGE.to_string())
    }

    /// Swaps the current snapshot. Analyses and answers still in flight were
    /// computed from the previous snapshot, so their tickets are retired and
    /// any answer on screen is cleared.
    fn replace_snapshot(&self, snapshot: Option<Rc<AccountsSnapshot>>) {
        {
            let mut state = self.state.borrow_mut();
            state.snapshot = snapshot;
            state.tracker.issue(Action::Analyze);
            state.tracker.issue(Action::Ask);
        }
        self.renderer.render_answer(AnswerView::Empty);
    }

    fn issue(&self, action: Action) -> Ticket {
        self.state.borrow_mut().tracker.issue(action)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.state.borrow().tracker.is_current(ticket)
    }
}
