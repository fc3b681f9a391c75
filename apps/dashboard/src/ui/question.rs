use dioxus::prelude::*;

use crate::hooks::dashboard::use_controller;
use crate::state::use_dashboard_view;
use crate::ui::render::AnswerView;

#[component]
pub fn QuestionPanel() -> Element {
    let controller = use_controller();
    let mut view = use_dashboard_view();
    let snapshot = view.read();
    let suggestions = snapshot.suggestions.clone();
    let question = snapshot.question_input.clone();
    let answer = snapshot.answer.clone();
    let can_ask = snapshot.controls.ask;
    drop(snapshot);

    let on_submit = {
        let controller = controller.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let question = view.read().question_input.clone();
            if let Some(controller) = controller.clone() {
                spawn(async move {
                    controller.ask_question(&question).await;
                });
            }
        }
    };

    let answer_body = match answer {
        AnswerView::Empty => rsx! {},
        AnswerView::Pending { question } => rsx! {
            div { class: "rounded bg-slate-50 p-3 text-xs text-slate-500 animate-pulse",
                "Thinking about \"{question}\"..."
            }
        },
        AnswerView::Answer { question, answer } => rsx! {
            div { class: "rounded bg-slate-50 p-3 space-y-1",
                p { class: "text-xs font-semibold text-slate-700", "{question}" }
                p { class: "whitespace-pre-wrap text-sm text-slate-800", "{answer}" }
            }
        },
        AnswerView::Error(message) => rsx! {
            p { class: "rounded bg-red-50 p-2 text-xs text-red-700", "{message}" }
        },
    };

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-3",
            h2 { class: "text-lg font-semibold text-slate-900", "Ask about your finances" }
            if !suggestions.is_empty() {
                div { class: "flex flex-wrap gap-2",
                    for suggestion in suggestions.into_iter() {
                        button {
                            key: "{suggestion}",
                            r#type: "button",
                            class: "rounded-full border border-slate-300 px-3 py-1 text-xs text-slate-600 hover:bg-slate-100",
                            onclick: {
                                let controller = controller.clone();
                                let suggestion = suggestion.clone();
                                move |_: MouseEvent| {
                                    if let Some(controller) = controller.as_ref() {
                                        controller.choose_suggestion(&suggestion);
                                    }
                                }
                            },
                            "{suggestion}"
                        }
                    }
                }
            }
            form { class: "flex gap-2", onsubmit: on_submit,
                input {
                    class: "flex-1 rounded border border-slate-300 p-2 text-sm",
                    placeholder: "e.g. Is my debt-to-equity ratio healthy?",
                    value: "{question}",
                    oninput: move |evt: FormEvent| view.write().question_input = evt.value(),
                }
                button {
                    r#type: "submit",
                    class: "rounded bg-indigo-600 px-3 py-2 text-sm text-white disabled:opacity-50",
                    disabled: !can_ask,
                    "Ask"
                }
            }
            {answer_body}
        }
    }
}
