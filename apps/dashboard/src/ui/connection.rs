use dioxus::prelude::*;

use crate::hooks::dashboard::use_controller;
use crate::state::use_dashboard_view;
use crate::ui::render::StatusTone;

fn tone_classes(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Checking => "border-slate-300 bg-slate-50 text-slate-600",
        StatusTone::Connected => "border-emerald-500 bg-emerald-50 text-emerald-700",
        StatusTone::NotConnected => "border-amber-500 bg-amber-50 text-amber-700",
        StatusTone::Error => "border-red-500 bg-red-50 text-red-700",
    }
}

#[component]
pub fn ConnectionPanel() -> Element {
    let controller = use_controller();
    let view = use_dashboard_view();
    let snapshot = view.read();
    let connection = snapshot.connection.clone();
    let controls = snapshot.controls;
    drop(snapshot);

    let on_connect = {
        let controller = controller.clone();
        move |_: MouseEvent| {
            if let Some(controller) = controller.clone() {
                spawn(async move {
                    controller.begin_connect().await;
                });
            }
        }
    };

    let on_load = move |_: MouseEvent| {
        if let Some(controller) = controller.clone() {
            spawn(async move {
                controller.load_accounts().await;
            });
        }
    };

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-3",
            header { class: "flex flex-col gap-1",
                h2 { class: "text-lg font-semibold text-slate-900", "QuickBooks connection" }
                p { class: "text-xs text-slate-500", "Connect your company, then load the chart of accounts." }
            }
            div {
                class: format!("rounded border-l-4 px-3 py-2 text-sm {}", tone_classes(connection.tone)),
                "data-status": connection.tone.color(),
                "{connection.label}"
            }
            div { class: "flex gap-2",
                button {
                    class: "rounded bg-indigo-600 px-3 py-2 text-sm text-white disabled:opacity-50",
                    disabled: !controls.connect,
                    onclick: on_connect,
                    "Connect to QuickBooks"
                }
                button {
                    class: "rounded bg-slate-800 px-3 py-2 text-sm text-white disabled:opacity-50",
                    disabled: !controls.load_accounts,
                    onclick: on_load,
                    "Load accounts"
                }
            }
        }
    }
}
