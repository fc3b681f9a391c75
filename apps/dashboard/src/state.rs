use std::rc::Rc;

use dioxus::prelude::*;

use crate::models::{AccountsSnapshot, ConnectionStatus};
use crate::ui::render::{
    AnalysisView, AnswerView, ChartDataset, ConnectionView, Control, Notice, TableRow,
};

pub type ViewSignal = Signal<DashboardView>;

/// Whether the accounting session is live, and for which realm.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub connected: bool,
    pub realm_id: Option<String>,
    pub expires_at: Option<String>,
    pub error: Option<String>,
}

impl ConnectionState {
    pub fn apply(&mut self, status: &ConnectionStatus) {
        self.connected = status.connected;
        self.realm_id = status.realm_id.clone().filter(|id| !id.trim().is_empty());
        self.expires_at = status.expires_at.clone();
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.connected = false;
        self.error = Some(message);
    }

    /// Realm id usable for data calls: only when the session is confirmed.
    pub fn confirmed_realm(&self) -> Option<&str> {
        if self.connected {
            self.realm_id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    LoadAccounts,
    Analyze,
    Ask,
}

impl Action {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Self::LoadAccounts => 0,
            Self::Analyze => 1,
            Self::Ask => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub action: Action,
    pub seq: u64,
}

/// Monotonic per-action sequence numbers; only the latest ticket may apply its result.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
    latest: [u64; Action::COUNT],
}

impl RequestTracker {
    pub fn issue(&mut self, action: Action) -> Ticket {
        let slot = &mut self.latest[action.index()];
        *slot += 1;
        Ticket { action, seq: *slot }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest[ticket.action.index()] == ticket.seq
    }
}

/// Domain state owned by the interaction controller.
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    pub connection: ConnectionState,
    pub snapshot: Option<Rc<AccountsSnapshot>>,
    pub tracker: RequestTracker,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlStates {
    pub connect: bool,
    pub load_accounts: bool,
    pub analyze: bool,
    pub ask: bool,
}

impl Default for ControlStates {
    fn default() -> Self {
        Self {
            connect: true,
            load_accounts: true,
            analyze: false,
            ask: false,
        }
    }
}

impl ControlStates {
    pub fn set(&mut self, control: Control, enabled: bool) {
        match control {
            Control::Connect => self.connect = enabled,
            Control::LoadAccounts => self.load_accounts = enabled,
            Control::Analyze => self.analyze = enabled,
            Control::Ask => self.ask = enabled,
        }
    }
}

/// Everything the page displays. Written by the renderer, read by components.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub connection: ConnectionView,
    pub table: Vec<TableRow>,
    pub chart: ChartDataset,
    pub analysis: AnalysisView,
    pub answer: AnswerView,
    pub suggestions: Vec<String>,
    pub notice: Option<Notice>,
    pub question_input: String,
    pub controls: ControlStates,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self {
            connection: ConnectionView::checking(),
            table: crate::ui::render::render_accounts_table(None),
            chart: ChartDataset::default(),
            analysis: AnalysisView::Idle,
            answer: AnswerView::Empty,
            suggestions: Vec::new(),
            notice: None,
            question_input: String::new(),
            controls: ControlStates::default(),
        }
    }
}

pub fn use_dashboard_view() -> ViewSignal {
    use_context::<ViewSignal>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(Action::LoadAccounts);
        let second = tracker.issue(Action::LoadAccounts);
        let analysis = tracker.issue(Action::Analyze);

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
        assert!(tracker.is_current(analysis));
        assert!(second.seq > first.seq);
    }

    #[test]
    fn realm_requires_confirmed_connection() {
        let mut connection = ConnectionState::default();
        connection.apply(&ConnectionStatus {
            connected: false,
            realm_id: Some("9130".into()),
            expires_at: None,
        });
        assert_eq!(connection.confirmed_realm(), None);

        connection.apply(&ConnectionStatus {
            connected: true,
            realm_id: Some("9130".into()),
            expires_at: None,
        });
        assert_eq!(connection.confirmed_realm(), Some("9130"));

        connection.fail("timeout".into());
        assert_eq!(connection.confirmed_realm(), None);
        assert_eq!(connection.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn blank_realm_is_treated_as_unknown() {
        let mut connection = ConnectionState::default();
        connection.apply(&ConnectionStatus {
            connected: true,
            realm_id: Some("  ".into()),
            expires_at: None,
        });
        assert_eq!(connection.confirmed_realm(), None);
    }
}
