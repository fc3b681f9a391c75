use dioxus::prelude::*;

use crate::state::use_dashboard_view;

/// Horizontal bars, one per account type, sized by share of total magnitude.
#[component]
pub fn CategoryChart() -> Element {
    let view = use_dashboard_view();
    let dataset = view.read().chart.clone();
    let shares = dataset.shares();

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-3",
            h2 { class: "text-lg font-semibold text-slate-900", "Balance by account type" }
            if dataset.is_empty() {
                p { class: "text-xs italic text-slate-500", "Nothing to chart yet." }
            } else {
                ul { class: "space-y-2",
                    for (segment, share) in dataset.segments.iter().zip(shares.iter()) {
                        li { key: "{segment.label}", class: "space-y-1",
                            div { class: "flex justify-between text-xs text-slate-600",
                                span { "{segment.label}" }
                                span { class: "font-mono", {format!("{:.2} ({:.1}%)", segment.value, share)} }
                            }
                            div { class: "h-2 w-full rounded bg-slate-100",
                                div {
                                    class: "h-2 rounded",
                                    style: format!("width: {:.1}%; background-color: {};", share, segment.color),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
