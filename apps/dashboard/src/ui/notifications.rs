use dioxus::prelude::*;

use crate::state::use_dashboard_view;
use crate::ui::render::NoticeKind;

impl NoticeKind {
    fn accent_classes(self) -> (&'static str, &'static str) {
        match self {
            Self::Success => ("border-emerald-500 bg-emerald-50", "text-emerald-700"),
            Self::Error => ("border-red-500 bg-red-50", "text-red-700"),
        }
    }
}

#[component]
pub fn NotificationCenter() -> Element {
    let mut view = use_dashboard_view();
    let notice = view.read().notice.clone();

    let Some(notice) = notice else {
        return rsx! {};
    };

    let (container_class, accent_text) = notice.kind.accent_classes();

    rsx! {
        div { class: "pointer-events-none fixed right-4 top-4 z-50 w-80",
            div { class: format!("pointer-events-auto rounded-lg border-l-4 p-4 shadow-lg {}", container_class),
                div { class: "flex items-start justify-between gap-4",
                    p { class: format!("text-sm {}", accent_text), "{notice.message}" }
                    button {
                        class: "rounded bg-slate-200 px-2 py-1 text-[11px] text-slate-600 transition hover:bg-slate-300",
                        onclick: move |_| view.write().notice = None,
                        "Close"
                    }
                }
            }
        }
    }
}
