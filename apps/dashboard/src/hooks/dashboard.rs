use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_signals::{Signal, Writable};

use crate::api::FinancialClient;
use crate::services::browser::WebBrowser;
use crate::services::controller::{ControllerSettings, InteractionController, SharedController};
use crate::state::{use_dashboard_view, DashboardView};
use crate::ui::render::{
    AnalysisView, AnswerView, ChartDataset, ConnectionView, Control, Notice, TableRow,
    ViewRenderer,
};
use crate::{API_CLIENT, APP_CONFIG};

pub type DashboardController = SharedController<FinancialClient, SignalRenderer, WebBrowser>;

/// Renders into the page's [`DashboardView`] signal.
#[derive(Clone, Copy)]
pub struct SignalRenderer {
    view: Signal<DashboardView>,
}

impl SignalRenderer {
    pub fn new(view: Signal<DashboardView>) -> Self {
        Self { view }
    }
}

impl ViewRenderer for SignalRenderer {
    fn render_connection(&self, connection: ConnectionView) {
        let mut view = self.view;
        view.write().connection = connection;
    }

    fn render_table(&self, rows: Vec<TableRow>) {
        let mut view = self.view;
        view.write().table = rows;
    }

    fn render_chart(&self, dataset: ChartDataset) {
        let mut view = self.view;
        view.write().chart = dataset;
    }

    fn render_panels(&self, analysis: AnalysisView) {
        let mut view = self.view;
        view.write().analysis = analysis;
    }

    fn render_answer(&self, answer: AnswerView) {
        let mut view = self.view;
        view.write().answer = answer;
    }

    fn render_suggestions(&self, questions: Vec<String>) {
        let mut view = self.view;
        view.write().suggestions = questions;
    }

    fn render_notice(&self, notice: Option<Notice>) {
        let mut view = self.view;
        view.write().notice = notice;
    }

    fn fill_question(&self, question: &str) {
        let mut view = self.view;
        view.write().question_input = question.to_string();
    }

    fn set_enabled(&self, control: Control, enabled: bool) {
        let mut view = self.view;
        view.write().controls.set(control, enabled);
    }
}

/// Builds the controller once and runs the page-load sequence.
pub fn use_dashboard() -> Option<DashboardController> {
    let mut view = use_dashboard_view();

    let controller = use_hook(move || {
        let client = API_CLIENT.get().cloned()?;
        let settings = APP_CONFIG
            .get()
            .map(|cfg| ControllerSettings {
                dashboard_path: cfg.dashboard_path.clone(),
                callback_redirect_delay: cfg.callback_redirect_delay,
            })
            .unwrap_or_default();

        Some(Rc::new(InteractionController::new(
            client,
            SignalRenderer::new(view),
            WebBrowser,
            settings,
        )))
    });

    let starter = controller.clone();
    use_future(move || {
        let starter = starter.clone();
        async move {
            match starter {
                Some(controller) => controller.start().await,
                None => {
                    tracing::error!("dashboard started without an API client");
                    view.write().notice = Some(Notice::error(
                        "The dashboard could not reach its API client. Reload the page to retry.",
                    ));
                }
            }
        }
    });

    controller
}

pub fn use_controller() -> Option<DashboardController> {
    use_context::<Option<DashboardController>>()
}
