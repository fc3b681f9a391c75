use std::time::Duration;

use anyhow::anyhow;
use reqwest::Url;
use wasm_bindgen::JsValue;

const REALM_STORAGE_KEY: &str = "ledger_insight.realm_id";

/// Page-level capabilities the controller needs from the browser.
#[allow(async_fn_in_trait)]
pub trait Browser {
    /// Query string of the current page, without the leading `?`.
    fn query_string(&self) -> Option<String>;

    /// Full navigation; the current page is torn down.
    fn navigate(&self, url: &str) -> anyhow::Result<()>;

    fn stored_realm_id(&self) -> Option<String>;

    fn remember_realm_id(&self, realm_id: &str) -> anyhow::Result<()>;

    async fn sleep(&self, delay: Duration);
}

/// Markers left on the dashboard URL after the authorization round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackParams {
    pub realm_id: String,
}

impl CallbackParams {
    /// Accepts the accounting service's own `code` + `realmId` callback, or the
    /// server's post-exchange redirect carrying `realm_id`.
    pub fn from_query(query: &str) -> Option<Self> {
        let url = Url::parse(&format!("http://callback.local/?{}", query.trim_start_matches('?'))).ok()?;

        let mut code = None;
        let mut realm = None;
        let mut redirected_realm = None;
        for (key, value) in url.query_pairs() {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "code" => code = Some(value),
                "realmId" => realm = Some(value),
                "realm_id" => redirected_realm = Some(value),
                _ => {}
            }
        }

        match (code, realm, redirected_realm) {
            (Some(_), Some(realm_id), _) => Some(Self { realm_id }),
            (_, _, Some(realm_id)) => Some(Self { realm_id }),
            _ => None,
        }
    }
}

fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WebBrowser;

impl WebBrowser {
    pub fn origin() -> Option<String> {
        web_sys::window().and_then(|window| window.location().origin().ok())
    }
}

impl Browser for WebBrowser {
    fn query_string(&self) -> Option<String> {
        let search = web_sys::window()?.location().search().ok()?;
        let trimmed = search.trim_start_matches('?');
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn navigate(&self, url: &str) -> anyhow::Result<()> {
        let window = web_sys::window().ok_or_else(|| anyhow!("window is not available"))?;
        window
            .location()
            .set_href(url)
            .map_err(|err| anyhow!("navigation to {url} failed: {}", describe_js_error(&err)))
    }

    fn stored_realm_id(&self) -> Option<String> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::get::<String>(REALM_STORAGE_KEY).ok()
    }

    fn remember_realm_id(&self, realm_id: &str) -> anyhow::Result<()> {
        use gloo_storage::{LocalStorage, Storage};
        LocalStorage::set(REALM_STORAGE_KEY, realm_id)
            .map_err(|err| anyhow!("failed to store realm id: {err}"))
    }

    async fn sleep(&self, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }
}
