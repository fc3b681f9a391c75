use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuthUrlPayload {
    pub auth_url: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuggestedQuestionsPayload {
    #[serde(default)]
    pub questions: Vec<String>,
}

/// One entry of the chart of accounts, as the accounting service names it.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Account {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "AccountType", default)]
    pub account_type: String,
    /// Missing, null or non-numeric balances read as zero.
    #[serde_as(as = "DefaultOnError")]
    #[serde(rename = "CurrentBalance", default)]
    pub current_balance: Decimal,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct AccountsEnvelope {
    #[serde(rename = "QueryResponse", default)]
    query_response: AccountsQueryResponse,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct AccountsQueryResponse {
    #[serde(rename = "Account", default)]
    account: Vec<Account>,
}

/// The accounts retrieved by one fetch. `raw` is the untouched service
/// envelope, which is what the analysis and question endpoints expect back.
#[derive(Clone, Debug, PartialEq)]
pub struct AccountsSnapshot {
    pub accounts: Vec<Account>,
    pub raw: Value,
}

impl AccountsSnapshot {
    pub fn from_envelope(raw: Value) -> Result<Self, serde_json::Error> {
        let envelope: AccountsEnvelope = serde_json::from_value(raw.clone())?;
        Ok(Self {
            accounts: envelope.query_response.account,
            raw,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }
}

/// Summed balance per account type, ordered by type name.
pub type CategoryTotals = BTreeMap<String, Decimal>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insight {
    pub title: Option<String>,
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InsightRepr {
    Text(String),
    Detailed {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: String,
    },
}

impl<'de> Deserialize<'de> for Insight {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match InsightRepr::deserialize(deserializer)? {
            InsightRepr::Text(description) => Insight {
                title: None,
                description,
            },
            InsightRepr::Detailed { title, description } => Insight {
                title: title.filter(|value| !value.trim().is_empty()),
                description,
            },
        })
    }
}

/// Analysis returned by the model-backed collaborator.
///
/// A panel list that is missing or not a list of insights deserializes to
/// `None` so the affected panel alone can degrade.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AnalysisResult {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub summary: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub positive_insights: Option<Vec<Insight>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub concerns: Option<Vec<Insight>>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub recommendations: Option<Vec<Insight>>,
}

/// Body shape the collaborator uses to report a model failure with a 2xx.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReportedError {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnswerPayload {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct AnalyzeRequest<'a> {
    pub accounts_data: &'a Value,
}

#[derive(Serialize)]
pub struct AskRequest<'a> {
    pub accounts_data: &'a Value,
    pub question: &'a str,
}
