//! Admin attendance report: summary cards plus a searchable user x date table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Loads every record from `GET /attendance` once per visit and pivots it into
//! an `AttendanceReport`. Searching filters rows locally; the summary always
//! covers the full report.

#[cfg(test)]
#[path = "attendance_test.rs"]
mod attendance_test;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::net::types::AttendanceRecord;
use crate::state::attendance::{AttendanceReport, AttendanceSummary, status_label};

/// Label/value pairs for the summary cards.
fn summary_cards(summary: AttendanceSummary) -> [(&'static str, String); 4] {
    [
        ("Users", summary.total_users.to_string()),
        ("Days", summary.total_days.to_string()),
        ("Present marks", summary.total_present.to_string()),
        ("Attendance rate", format!("{}%", summary.attendance_rate)),
    ]
}

#[component]
pub fn AttendancePage() -> impl IntoView {
    let records = LocalResource::new(crate::net::api::fetch_attendance);
    let search = RwSignal::new(String::new());

    view! {
        <div class="attendance-page">
            <header class="attendance-page__header">
                <h1>"Attendance"</h1>
                <input
                    class="attendance-page__search"
                    type="search"
                    placeholder="Search by id or username"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
            </header>
            <Suspense fallback=move || view! { <p class="attendance-page__loading">"Loading attendance..."</p> }>
                {move || records.get().map(move |result| render_report(result, search))}
            </Suspense>
        </div>
    }
}

fn render_report(result: Result<Vec<AttendanceRecord>, ApiError>, search: RwSignal<String>) -> AnyView {
    let records = match result {
        Ok(records) => records,
        Err(e) => return view! { <p class="attendance-page__error">{e.to_string()}</p> }.into_any(),
    };
    let report = AttendanceReport::from_records(&records);
    let cards = summary_cards(report.summary());
    let dates = report.dates.clone();
    let report = StoredValue::new(report);

    let rows = move || {
        let term = search.get();
        report.with_value(|report| {
            report
                .filter_users(&term)
                .into_iter()
                .map(|user| {
                    let cells = report
                        .dates
                        .iter()
                        .map(|date| view! { <td>{status_label(user.status(date))}</td> })
                        .collect_view();
                    view! {
                        <tr>
                            <td>{user.id.clone()}</td>
                            <td>{user.username.clone()}</td>
                            {cells}
                        </tr>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <section class="attendance-page__summary">
            {cards
                .into_iter()
                .map(|(label, value)| {
                    view! {
                        <div class="summary-card">
                            <span class="summary-card__label">{label}</span>
                            <span class="summary-card__value">{value}</span>
                        </div>
                    }
                })
                .collect_view()}
        </section>
        <table class="attendance-table">
            <thead>
                <tr>
                    <th>"ID"</th>
                    <th>"Username"</th>
                    {dates.into_iter().map(|date| view! { <th>{date}</th> }).collect_view()}
                </tr>
            </thead>
            <tbody>{rows}</tbody>
        </table>
    }
        .into_any()
}
