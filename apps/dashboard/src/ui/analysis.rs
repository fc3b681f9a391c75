use dioxus::prelude::*;

use crate::hooks::dashboard::use_controller;
use crate::state::use_dashboard_view;
use crate::ui::render::{AnalysisView, PanelBody, PanelKind, PanelView};

fn panel_accent(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Positive => "border-emerald-400",
        PanelKind::Concern => "border-amber-400",
        PanelKind::Recommendation => "border-indigo-400",
    }
}

#[component]
fn InsightPanel(panel: PanelView) -> Element {
    let heading = panel.kind.heading();
    let accent = panel_accent(panel.kind);

    rsx! {
        div { class: format!("rounded-lg border-t-4 bg-slate-50 p-3 shadow-sm space-y-2 {accent}"),
            h3 { class: "text-sm font-semibold text-slate-800", "{heading}" }
            {match panel.body {
                PanelBody::Entries(entries) => rsx! {
                    ul { class: "space-y-2",
                        for (idx, entry) in entries.into_iter().enumerate() {
                            li { key: "{idx}",
                                p { class: "text-xs font-semibold text-slate-700", "{entry.title}" }
                                p { class: "text-xs text-slate-600", "{entry.description}" }
                            }
                        }
                    }
                },
                PanelBody::Placeholder(message) => rsx! {
                    p { class: "text-xs italic text-slate-500", "{message}" }
                },
            }}
        }
    }
}

#[component]
pub fn AnalysisSection() -> Element {
    let controller = use_controller();
    let view = use_dashboard_view();
    let snapshot = view.read();
    let analysis = snapshot.analysis.clone();
    let can_refresh = snapshot.controls.analyze;
    drop(snapshot);

    let on_refresh = move |_: MouseEvent| {
        if let Some(controller) = controller.clone() {
            spawn(async move {
                controller.analyze().await;
            });
        }
    };

    let body = match analysis {
        AnalysisView::Idle => rsx! {
            p { class: "text-xs italic text-slate-500", "Load your accounts to see an AI analysis." }
        },
        AnalysisView::Loading => rsx! {
            p { class: "text-xs text-slate-500 animate-pulse", "Analyzing your accounts..." }
        },
        AnalysisView::Message(message) => rsx! {
            p { class: "text-xs italic text-slate-500", "{message}" }
        },
        AnalysisView::Ready(panels) => {
            let summary = panels.summary;
            let keyed: Vec<(&'static str, PanelView)> = panels
                .panels
                .into_iter()
                .map(|panel| (panel.kind.heading(), panel))
                .collect();
            rsx! {
                div { class: "space-y-3",
                    p { class: "text-sm text-slate-700", "{summary}" }
                    div { class: "grid gap-3 md:grid-cols-3",
                        for (heading, panel) in keyed.into_iter() {
                            InsightPanel { key: "{heading}", panel }
                        }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-3",
            header { class: "flex items-center justify-between",
                h2 { class: "text-lg font-semibold text-slate-900", "Financial analysis" }
                button {
                    class: "rounded bg-slate-200 px-2 py-1 text-xs text-slate-700 disabled:opacity-50",
                    disabled: !can_refresh,
                    onclick: on_refresh,
                    "Refresh analysis"
                }
            }
            {body}
        }
    }
}
