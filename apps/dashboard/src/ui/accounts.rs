use dioxus::prelude::*;

use crate::state::use_dashboard_view;
use crate::ui::render::TableRow;

#[component]
pub fn AccountsTable() -> Element {
    let view = use_dashboard_view();
    let rows = view.read().table.clone();

    rsx! {
        section { class: "rounded-lg border border-slate-200 bg-white p-4 shadow-sm space-y-3",
            h2 { class: "text-lg font-semibold text-slate-900", "Chart of accounts" }
            table { class: "w-full text-sm",
                thead {
                    tr { class: "border-b border-slate-200 text-left text-xs uppercase text-slate-500",
                        th { class: "py-2", "Account" }
                        th { class: "py-2", "Type" }
                        th { class: "py-2 text-right", "Balance" }
                    }
                }
                tbody {
                    for (idx, row) in rows.into_iter().enumerate() {
                        {match row {
                            TableRow::Account { name, account_type, balance } => rsx! {
                                tr { key: "{idx}", class: "border-b border-slate-100",
                                    td { class: "py-1 text-slate-800", "{name}" }
                                    td { class: "py-1 text-slate-600", "{account_type}" }
                                    td { class: "py-1 text-right font-mono", "{balance}" }
                                }
                            },
                            TableRow::Placeholder(message) => rsx! {
                                tr { key: "{idx}",
                                    td { colspan: "3", class: "py-4 text-center text-xs italic text-slate-500", "{message}" }
                                }
                            },
                            TableRow::Error(message) => rsx! {
                                tr { key: "{idx}",
                                    td { colspan: "3", class: "py-4 text-center text-xs text-red-600", "{message}" }
                                }
                            },
                        }}
                    }
                }
            }
        }
    }
}
