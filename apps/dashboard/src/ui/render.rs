//! Pure projections from domain data to what the page shows, plus the
//! [`ViewRenderer`] seam the controller draws through.
//!
//! Projections never mutate their input and give identical output for
//! identical input.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AccountsSnapshot, AnalysisResult, CategoryTotals, Insight, QuestionAnswer};
use crate::state::ConnectionState;

pub const NO_DATA_MESSAGE: &str = "No data available. Load your accounts to get started.";
pub const NO_ACCOUNTS_MESSAGE: &str = "No accounts found for this company.";
pub const LOADING_ACCOUNTS_MESSAGE: &str = "Loading accounts...";

/// Segment colors, assigned by position.
pub const CHART_PALETTE: [&str; 10] = [
    "#4F46E5", "#10B981", "#F59E0B", "#EF4444", "#3B82F6", "#8B5CF6", "#EC4899", "#14B8A6",
    "#F97316", "#64748B",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Connect,
    LoadAccounts,
    Analyze,
    Ask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Checking,
    Connected,
    NotConnected,
    Error,
}

impl StatusTone {
    pub fn color(self) -> &'static str {
        match self {
            Self::Checking => "gray",
            Self::Connected => "green",
            Self::NotConnected => "yellow",
            Self::Error => "red",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionView {
    pub label: String,
    pub tone: StatusTone,
}

impl ConnectionView {
    pub fn checking() -> Self {
        Self {
            label: "Checking connection...".into(),
            tone: StatusTone::Checking,
        }
    }
}

pub fn render_connection(connection: &ConnectionState) -> ConnectionView {
    if let Some(message) = connection.error.as_ref() {
        return ConnectionView {
            label: format!("Error checking connection: {message}"),
            tone: StatusTone::Error,
        };
    }

    if connection.connected {
        let mut label = "Connected to QuickBooks".to_string();
        if let Some(expires) = connection.expires_at.as_ref() {
            label.push_str(&format!(" (session expires {expires})"));
        }
        ConnectionView {
            label,
            tone: StatusTone::Connected,
        }
    } else {
        ConnectionView {
            label: "Not connected to QuickBooks".into(),
            tone: StatusTone::NotConnected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableRow {
    Account {
        name: String,
        account_type: String,
        balance: String,
    },
    Placeholder(String),
    Error(String),
}

/// `None` means nothing has been loaded; `Some` of an empty snapshot means the
/// company has no accounts. The two get different placeholder rows.
pub fn render_accounts_table(snapshot: Option<&AccountsSnapshot>) -> Vec<TableRow> {
    let Some(snapshot) = snapshot else {
        return vec![TableRow::Placeholder(NO_DATA_MESSAGE.into())];
    };

    if snapshot.is_empty() {
        return vec![TableRow::Placeholder(NO_ACCOUNTS_MESSAGE.into())];
    }

    snapshot
        .accounts
        .iter()
        .map(|account| TableRow::Account {
            name: account.name.clone(),
            account_type: account.account_type.clone(),
            balance: format_currency(account.current_balance),
        })
        .collect()
}

pub fn render_table_error(message: &str) -> Vec<TableRow> {
    vec![TableRow::Error(format!("Error loading accounts: {message}"))]
}

/// `$1,234.50` style, rounded half away from zero to cents.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${grouped}.{cents}", if negative { "-" } else { "" })
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSegment {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartDataset {
    pub segments: Vec<ChartSegment>,
}

impl ChartDataset {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Share of each segment in the total magnitude, in percent.
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self.segments.iter().map(|s| s.value.abs()).sum();
        self.segments
            .iter()
            .map(|s| {
                if total > 0.0 {
                    s.value.abs() / total * 100.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

pub fn render_chart(totals: &CategoryTotals) -> ChartDataset {
    let segments = totals
        .iter()
        .enumerate()
        .map(|(idx, (label, value))| ChartSegment {
            label: label.clone(),
            value: value.to_f64().unwrap_or_default(),
            color: CHART_PALETTE[idx % CHART_PALETTE.len()],
        })
        .collect();
    ChartDataset { segments }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelKind {
    Positive,
    Concern,
    Recommendation,
}

impl PanelKind {
    pub const ALL: [PanelKind; 3] = [Self::Positive, Self::Concern, Self::Recommendation];

    pub fn heading(self) -> &'static str {
        match self {
            Self::Positive => "Positive Insights",
            Self::Concern => "Areas of Concern",
            Self::Recommendation => "Recommendations",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Positive => "Insight",
            Self::Concern => "Concern",
            Self::Recommendation => "Recommendation",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Self::Positive => "No positive insights found.",
            Self::Concern => "No concerns found.",
            Self::Recommendation => "No recommendations found.",
        }
    }

    pub fn unavailable_message(self) -> &'static str {
        match self {
            Self::Positive => "Insights unavailable.",
            Self::Concern => "Concerns unavailable.",
            Self::Recommendation => "Recommendations unavailable.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelEntry {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelBody {
    Entries(Vec<PanelEntry>),
    Placeholder(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelView {
    pub kind: PanelKind,
    pub body: PanelBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisPanels {
    pub summary: String,
    pub panels: Vec<PanelView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisView {
    Idle,
    Loading,
    /// Inline note shown in place of the panels.
    Message(String),
    Ready(AnalysisPanels),
}

fn render_panel(kind: PanelKind, insights: Option<&[Insight]>) -> PanelView {
    let body = match insights {
        None => PanelBody::Placeholder(kind.unavailable_message().into()),
        Some([]) => PanelBody::Placeholder(kind.empty_message().into()),
        Some(items) => PanelBody::Entries(
            items
                .iter()
                .map(|insight| PanelEntry {
                    title: insight
                        .title
                        .clone()
                        .unwrap_or_else(|| kind.default_title().to_string()),
                    description: insight.description.clone(),
                })
                .collect(),
        ),
    };
    PanelView { kind, body }
}

pub fn render_analysis(result: &AnalysisResult) -> AnalysisPanels {
    AnalysisPanels {
        summary: result
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "No summary available.".into()),
        panels: vec![
            render_panel(PanelKind::Positive, result.positive_insights.as_deref()),
            render_panel(PanelKind::Concern, result.concerns.as_deref()),
            render_panel(PanelKind::Recommendation, result.recommendations.as_deref()),
        ],
    }
}

/// Every panel shows its "unavailable" placeholder; the summary carries the reason.
pub fn render_analysis_unavailable(message: &str) -> AnalysisPanels {
    AnalysisPanels {
        summary: format!("Analysis unavailable: {message}"),
        panels: PanelKind::ALL
            .iter()
            .map(|kind| render_panel(*kind, None))
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerView {
    Empty,
    Pending { question: String },
    Answer { question: String, answer: String },
    Error(String),
}

pub fn render_answer(qa: &QuestionAnswer) -> AnswerView {
    AnswerView::Answer {
        question: qa.question.clone(),
        answer: qa.answer.clone(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Where the controller sends rendered output.
pub trait ViewRenderer {
    fn render_connection(&self, view: ConnectionView);
    fn render_table(&self, rows: Vec<TableRow>);
    fn render_chart(&self, dataset: ChartDataset);
    fn render_panels(&self, view: AnalysisView);
    fn render_answer(&self, view: AnswerView);
    fn render_suggestions(&self, questions: Vec<String>);
    fn render_notice(&self, notice: Option<Notice>);
    fn fill_question(&self, question: &str);
    fn set_enabled(&self, control: Control, enabled: bool);
}
