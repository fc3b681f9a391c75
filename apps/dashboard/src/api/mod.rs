use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{
    AccountsSnapshot, AnalysisResult, AnalyzeRequest, AnswerPayload, AskRequest, AuthUrlPayload,
    ConnectionStatus, ReportedError, SuggestedQuestionsPayload,
};
use crate::services::fetcher::{DataFetcher, FetchResult};

pub type ClientResult<T> = Result<T, ClientError>;

/// HTTP client for the financial collaborator endpoints.
#[derive(Clone)]
pub struct FinancialClient {
    inner: reqwest::Client,
    base_url: String,
}

impl FinancialClient {
    pub fn new(config: AppConfig, origin: Option<&str>) -> ClientResult<Self> {
        let base_url = config.resolved_api_base(origin);

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let client = builder.build().map_err(ClientError::from)?;

        Ok(Self {
            inner: client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_connection_status(
        &self,
        realm_hint: Option<&str>,
    ) -> ClientResult<ConnectionStatus> {
        let mut builder = self.request(Method::GET, "connection-status");
        if let Some(realm_id) = realm_hint {
            builder = builder.query(&[("realm_id", realm_id)]);
        }
        self.send(builder).await
    }

    pub async fn get_auth_url(&self) -> ClientResult<String> {
        let builder = self.request(Method::GET, "auth-url");
        let payload: AuthUrlPayload = self.send(builder).await?;
        Ok(payload.auth_url)
    }

    pub async fn get_suggested_questions(&self) -> ClientResult<Vec<String>> {
        let builder = self.request(Method::GET, "suggested-questions");
        let payload: SuggestedQuestionsPayload = self.send(builder).await?;
        Ok(payload.questions)
    }

    pub async fn get_accounts(&self, realm_id: &str) -> ClientResult<AccountsSnapshot> {
        let builder = self
            .request(Method::GET, "accounts")
            .query(&[("realm_id", realm_id)]);
        let raw: Value = self.send(builder).await?;
        AccountsSnapshot::from_envelope(raw).map_err(ClientError::from)
    }

    pub async fn post_analyze(&self, snapshot: &AccountsSnapshot) -> ClientResult<AnalysisResult> {
        let builder = self
            .request(Method::POST, "analyze")
            .json(&AnalyzeRequest {
                accounts_data: &snapshot.raw,
            });
        let raw: Value = self.send(builder).await?;
        reject_reported_error(&raw)?;
        serde_json::from_value(raw).map_err(ClientError::from)
    }

    pub async fn post_ask(&self, snapshot: &AccountsSnapshot, question: &str) -> ClientResult<String> {
        let builder = self.request(Method::POST, "ask").json(&AskRequest {
            accounts_data: &snapshot.raw,
            question,
        });
        let raw: Value = self.send(builder).await?;
        reject_reported_error(&raw)?;
        let payload: AnswerPayload = serde_json::from_value(raw)?;
        payload
            .answer
            .ok_or_else(|| ClientError::Reported("the response did not include an answer".into()))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.join_path(path);
        self.inner
            .request(method, url)
            .header(header::ACCEPT, "application/json")
    }

    fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T>(&self, builder: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await.map_err(ClientError::from)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ClientError::from)?;

        if !status.is_success() {
            return Err(ClientError::Server {
                status,
                detail: error_detail(&bytes),
            });
        }

        if bytes.is_empty() {
            return Err(ClientError::EmptyResponse(status));
        }

        serde_json::from_slice(&bytes).map_err(ClientError::from)
    }
}

impl DataFetcher for FinancialClient {
    async fn fetch_connection_status(&self, realm_hint: Option<&str>) -> FetchResult<ConnectionStatus> {
        Ok(self.get_connection_status(realm_hint).await?)
    }

    async fn fetch_auth_url(&self) -> FetchResult<String> {
        Ok(self.get_auth_url().await?)
    }

    async fn fetch_suggested_questions(&self) -> FetchResult<Vec<String>> {
        Ok(self.get_suggested_questions().await?)
    }

    async fn fetch_accounts(&self, realm_id: &str) -> FetchResult<AccountsSnapshot> {
        Ok(self.get_accounts(realm_id).await?)
    }

    async fn fetch_analysis(&self, snapshot: &AccountsSnapshot) -> FetchResult<AnalysisResult> {
        Ok(self.post_analyze(snapshot).await?)
    }

    async fn fetch_answer(&self, snapshot: &AccountsSnapshot, question: &str) -> FetchResult<String> {
        Ok(self.post_ask(snapshot, question).await?)
    }
}

#[derive(Deserialize)]
struct DetailBody {
    detail: Value,
}

/// Pulls a readable message out of a `{"detail": ...}` error body.
fn error_detail(bytes: &[u8]) -> Option<String> {
    let body: DetailBody = serde_json::from_slice(bytes).ok()?;
    match body.detail {
        Value::String(message) => Some(message),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn reject_reported_error(raw: &Value) -> ClientResult<()> {
    let reported: ReportedError = serde_json::from_value(raw.clone()).unwrap_or_default();
    match reported.error {
        Some(message) => Err(ClientError::Reported(message)),
        None => Ok(()),
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not read the server response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("empty response body ({0})")]
    EmptyResponse(StatusCode),
    #[error("server returned {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("{0}")]
    Reported(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::EmptyResponse(status) => Some(*status),
            Self::Server { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_message_is_extracted() {
        let body = br#"{"detail": "Failed to get accounts: token expired"}"#;
        assert_eq!(
            error_detail(body).as_deref(),
            Some("Failed to get accounts: token expired")
        );
        assert_eq!(error_detail(b"<html>oops</html>"), None);
    }

    #[test]
    fn reported_error_body_is_rejected() {
        let raw = json!({"error": "Could not parse GPT response as JSON", "raw_response": "..."});
        let err = reject_reported_error(&raw).unwrap_err();
        assert_eq!(err.to_string(), "Could not parse GPT response as JSON");
        assert!(reject_reported_error(&json!({"summary": "ok"})).is_ok());
    }

    #[test]
    fn server_error_message_includes_detail() {
        let err = ClientError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("Analysis failed".into()),
        };
        assert_eq!(
            err.to_string(),
            "server returned 500 Internal Server Error: Analysis failed"
        );
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn paths_are_joined_onto_base() {
        let client = FinancialClient::new(
            AppConfig {
                api_base_url: "https://books.example.com/api/financial/".into(),
                ..AppConfig::default()
            },
            None,
        )
        .unwrap();
        assert_eq!(
            client.join_path("/accounts"),
            "https://books.example.com/api/financial/accounts"
        );
    }
}
