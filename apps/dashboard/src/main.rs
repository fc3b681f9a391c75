#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod services;
mod state;
mod ui;

use api::{ClientError, FinancialClient};
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use hooks::dashboard::use_dashboard;
use once_cell::sync::OnceCell;
use services::browser::WebBrowser;
use state::DashboardView;
use tracing::{error, info};
use ui::accounts::AccountsTable;
use ui::analysis::AnalysisSection;
use ui::chart::CategoryChart;
use ui::connection::ConnectionPanel;
use ui::notifications::NotificationCenter;
use ui::question::QuestionPanel;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static API_CLIENT: OnceCell<FinancialClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::from_env();
    init_logging(config.profile.log_level());
    bootstrap_infrastructure(config);
    dioxus::LaunchBuilder::web()
        .with_cfg(dioxus_web::Config::new().rootname("main"))
        .launch(App);
}

fn init_logging(level: tracing::Level) {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(level);
    });
}

fn bootstrap_infrastructure(config: AppConfig) {
    info!(profile = ?config.profile, "starting dashboard");
    let _ = APP_CONFIG.set(config.clone());

    let origin = WebBrowser::origin();
    match FinancialClient::new(config, origin.as_deref()) {
        Ok(client) => {
            info!(base_url = client.base_url(), "financial client initialized");
            let _ = API_CLIENT.set(client);
        }
        Err(err) => {
            report_client_error("failed to initialize the financial client", &err);
        }
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let view = use_signal(DashboardView::default);

    use_context_provider(|| view);

    rsx! {
        div { class: "relative",
            Router::<Route> {}
            NotificationCenter {}
        }
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/dashboard")]
    Dashboard {},
}

#[component]
fn Home() -> Element {
    rsx! { Dashboard {} }
}

#[component]
fn Dashboard() -> Element {
    let controller = use_dashboard();
    use_context_provider(|| controller.clone());

    let api_endpoint = API_CLIENT
        .get()
        .map(|client| client.base_url().to_string())
        .unwrap_or_else(|| "API not configured".to_string());

    rsx! {
        div { class: "app-shell mx-auto max-w-6xl space-y-4 p-4",
            section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm",
                h1 { class: "text-xl font-semibold text-slate-900", "Financial insights" }
                p { class: "text-xs text-slate-500", "API: {api_endpoint}" }
            }
            ConnectionPanel {}
            div { class: "grid gap-4 md:grid-cols-2",
                AccountsTable {}
                CategoryChart {}
            }
            AnalysisSection {}
            QuestionPanel {}
        }
    }
}
