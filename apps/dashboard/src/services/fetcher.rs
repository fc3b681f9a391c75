//! Network boundary of the dashboard.
//!
//! Every collaborator call goes through [`DataFetcher`] and comes back either
//! as data or as a [`FetchFailure`]; nothing past this point sees a raw
//! transport or decode error.

use std::fmt;

use crate::api::ClientError;
use crate::models::{AccountsSnapshot, AnalysisResult, ConnectionStatus};

pub type FetchResult<T> = Result<T, FetchFailure>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, DNS or timeout.
    Transport,
    /// Non-2xx status, malformed body, or an error the server reported.
    Server,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Server,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<ClientError> for FetchFailure {
    fn from(err: ClientError) -> Self {
        if err.is_transport() {
            Self::transport(err.to_string())
        } else {
            Self::server(err.to_string())
        }
    }
}

/// One operation per collaborator endpoint.
///
/// Futures are not `Send`: everything runs on the browser's UI thread.
#[allow(async_fn_in_trait)]
pub trait DataFetcher {
    async fn fetch_connection_status(&self, realm_hint: Option<&str>) -> FetchResult<ConnectionStatus>;

    async fn fetch_auth_url(&self) -> FetchResult<String>;

    async fn fetch_suggested_questions(&self) -> FetchResult<Vec<String>>;

    /// Callers must resolve a confirmed realm id first.
    async fn fetch_accounts(&self, realm_id: &str) -> FetchResult<AccountsSnapshot>;

    async fn fetch_analysis(&self, snapshot: &AccountsSnapshot) -> FetchResult<AnalysisResult>;

    async fn fetch_answer(&self, snapshot: &AccountsSnapshot, question: &str) -> FetchResult<String>;
}
