//! Personal attendance page for any signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Fetches `GET /user_attendance/{username}` for the username in the current
//! auth snapshot and lists each recorded date with a present/absent tally.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use std::collections::BTreeMap;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::state::attendance::{presence_counts, status_label};
use crate::state::auth::AuthState;

fn tally_text(days: &BTreeMap<String, bool>) -> String {
    let (present, absent) = presence_counts(days);
    format!("{present} present, {absent} absent")
}

#[component]
pub fn UserPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let username = Memo::new(move |_| auth.get().snapshot.username);

    let days = LocalResource::new(move || {
        let username = username.get();
        async move {
            if username.is_empty() {
                return Ok(BTreeMap::new());
            }
            crate::net::api::fetch_user_attendance(&username).await
        }
    });

    view! {
        <div class="user-page">
            <h1>{move || format!("Attendance for {}", username.get())}</h1>
            <Suspense fallback=move || view! { <p class="user-page__loading">"Loading attendance..."</p> }>
                {move || days.get().map(render_days)}
            </Suspense>
        </div>
    }
}

fn render_days(result: Result<BTreeMap<String, bool>, ApiError>) -> AnyView {
    let days = match result {
        Ok(days) => days,
        Err(e) => return view! { <p class="user-page__error">{e.to_string()}</p> }.into_any(),
    };
    if days.is_empty() {
        return view! { <p class="user-page__empty">"No attendance recorded yet."</p> }.into_any();
    }

    let tally = tally_text(&days);
    view! {
        <p class="user-page__tally">{tally}</p>
        <table class="attendance-table">
            <thead>
                <tr>
                    <th>"Date"</th>
                    <th>"Status"</th>
                </tr>
            </thead>
            <tbody>
                {days
                    .into_iter()
                    .map(|(date, present)| {
                        view! {
                            <tr>
                                <td>{date}</td>
                                <td>{status_label(Some(present))}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
        .into_any()
}
