use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE_URL: &str = "/api/financial";
const DEFAULT_DASHBOARD_PATH: &str = "/dashboard";
const DEFAULT_CALLBACK_REDIRECT_MS: u64 = 2_000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }

    pub fn log_level(self) -> tracing::Level {
        match self {
            Self::Dev => tracing::Level::DEBUG,
            Self::Prod => tracing::Level::INFO,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub dashboard_path: String,
    pub profile: AppProfile,
    pub callback_redirect_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            dashboard_path: DEFAULT_DASHBOARD_PATH.to_string(),
            profile: AppProfile::Dev,
            callback_redirect_delay: Duration::from_millis(DEFAULT_CALLBACK_REDIRECT_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        let mut config = Self::default();

        if let Some(url) = read_env("LEDGER_INSIGHT_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(path) = read_env("LEDGER_INSIGHT_DASHBOARD_PATH") {
            config.dashboard_path = path;
        }

        let profile_raw = read_env("LEDGER_INSIGHT_PROFILE");
        config.profile = AppProfile::from_env(profile_raw);

        if let Some(ms) = read_env("LEDGER_INSIGHT_CALLBACK_REDIRECT_MS")
            .and_then(|value| value.parse::<u64>().ok())
        {
            config.callback_redirect_delay = Duration::from_millis(ms);
        }

        if let Some(secs) = read_env("LEDGER_INSIGHT_REQUEST_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }

    /// Absolute API base URL. Relative bases are joined onto the page origin.
    pub fn resolved_api_base(&self, origin: Option<&str>) -> String {
        let base = self.api_base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.trim_end_matches('/').to_string();
        }

        let origin = origin.unwrap_or("http://localhost:8000");
        format!(
            "{}/{}",
            origin.trim_end_matches('/'),
            base.trim_start_matches('/').trim_end_matches('/')
        )
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
        .filter(|value| !value.trim().is_empty())
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "LEDGER_INSIGHT_API_BASE_URL" => option_env!("LEDGER_INSIGHT_API_BASE_URL"),
        "LEDGER_INSIGHT_DASHBOARD_PATH" => option_env!("LEDGER_INSIGHT_DASHBOARD_PATH"),
        "LEDGER_INSIGHT_PROFILE" => option_env!("LEDGER_INSIGHT_PROFILE"),
        "LEDGER_INSIGHT_CALLBACK_REDIRECT_MS" => option_env!("LEDGER_INSIGHT_CALLBACK_REDIRECT_MS"),
        "LEDGER_INSIGHT_REQUEST_TIMEOUT_SECS" => option_env!("LEDGER_INSIGHT_REQUEST_TIMEOUT_SECS"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_base_is_joined_onto_origin() {
        let config = AppConfig::default();
        assert_eq!(
            config.resolved_api_base(Some("https://books.example.com/")),
            "https://books.example.com/api/financial"
        );
    }

    #[test]
    fn absolute_base_is_kept() {
        let config = AppConfig {
            api_base_url: "https://api.example.com/v1/".into(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolved_api_base(Some("https://ignored.example.com")),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn profile_parsing_defaults_to_dev() {
        assert_eq!(AppProfile::from_env(Some("production".into())), AppProfile::Prod);
        assert_eq!(AppProfile::from_env(Some("staging".into())), AppProfile::Dev);
        assert_eq!(AppProfile::from_env(None), AppProfile::Dev);
    }

    #[test]
    fn production_profile_logs_less() {
        assert_eq!(AppProfile::Dev.log_level(), tracing::Level::DEBUG);
        assert_eq!(AppProfile::Prod.log_level(), tracing::Level::INFO);
    }
}
