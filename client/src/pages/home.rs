//! Admin landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Greets the signed-in admin, counts down the minutes until the auth gate
//! logs them out, and manages registered users: list them, promote one to
//! admin, delete one, and preview the face image stored for the admin.
//!
//! DESIGN
//! ======
//! The countdown reads a `now` signal ticked by a browser interval, so the
//! text moves while the page stays open. Every user action reports through a
//! single status line and re-fetches the roster when it succeeds.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::net::api::ApiError;
use crate::net::types::{ManagedUser, UsersResponse};
use crate::state::auth::{AuthSnapshot, AuthState};
use crate::state::session::Role;
use crate::util::timer::{Clock, SystemClock};

const MS_PER_MINUTE: i64 = 60_000;
#[cfg(feature = "hydrate")]
const EXPIRY_REFRESH_MS: u32 = 15_000;

const LOAD_USERS_FAILED: &str = "Failed to load users.";
const ROLE_UPDATE_FAILED: &str = "Failed to update user role.";
const DELETE_FAILED: &str = "Failed to delete user.";
const NO_STORED_IMAGE: &str = "No stored image found for this user.";

/// Whole minutes left in the session, rounded up.
fn minutes_left(snapshot: &AuthSnapshot, now: i64) -> i64 {
    (snapshot.remaining_ms(now) + MS_PER_MINUTE - 1) / MS_PER_MINUTE
}

fn expiry_text(snapshot: &AuthSnapshot, now: i64) -> String {
    format!("Session expires in {} min", minutes_left(snapshot, now))
}

/// Status text for a failed user action: the API's own message when it sent
/// one, `fallback` otherwise.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_owned()
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn delete_prompt(roll_number: &str) -> String {
    format!("Delete {roll_number}? This action cannot be undone.")
}

fn roster_heading(count: usize) -> String {
    match count {
        1 => "1 registered user".to_owned(),
        n => format!("{n} registered users"),
    }
}

/// Admins cannot be promoted again.
fn can_promote(user: &ManagedUser) -> bool {
    user.role() != Role::Admin
}

fn role_pill_class(role: Role) -> &'static str {
    match role {
        Role::Admin => "role-pill role-pill--admin",
        Role::User => "role-pill",
    }
}

fn stored_image_src(base64: &str) -> String {
    format!("data:image/jpeg;base64,{base64}")
}

#[cfg(feature = "hydrate")]
fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let username = Memo::new(move |_| auth.get().snapshot.username);
    let now = RwSignal::new(SystemClock.now_ms());
    let status = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let ticker = StoredValue::new_local(Some(gloo_timers::callback::Interval::new(EXPIRY_REFRESH_MS, move || {
            now.set(SystemClock.now_ms());
        })));
        on_cleanup(move || ticker.update_value(|t| drop(t.take())));
    }

    let users = LocalResource::new(crate::net::api::fetch_users);
    let stored_image = LocalResource::new(move || {
        let username = username.get();
        async move {
            if username.is_empty() {
                return Ok(None);
            }
            crate::net::api::fetch_stored_image(&username).await
        }
    });

    let promote = move |roll_number: String| {
        #[cfg(feature = "hydrate")]
        {
            status.set("Updating user role...".to_owned());
            leptos::task::spawn_local(async move {
                match crate::net::api::promote_to_admin(&roll_number).await {
                    Ok(()) => {
                        log::info!("promoted {roll_number} to admin");
                        status.set("User updated to admin.".to_owned());
                        users.refetch();
                    }
                    Err(e) => {
                        log::warn!("role update for {roll_number} failed: {e}");
                        status.set(failure_message(&e, ROLE_UPDATE_FAILED));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = roll_number;
    };

    let remove = move |roll_number: String| {
        #[cfg(feature = "hydrate")]
        {
            if !confirm(&delete_prompt(&roll_number)) {
                return;
            }
            status.set("Deleting user...".to_owned());
            leptos::task::spawn_local(async move {
                match crate::net::api::delete_user(&roll_number).await {
                    Ok(()) => {
                        log::info!("deleted user {roll_number}");
                        status.set("User deleted.".to_owned());
                        users.refetch();
                    }
                    Err(e) => {
                        log::warn!("delete of {roll_number} failed: {e}");
                        status.set(failure_message(&e, DELETE_FAILED));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = roll_number;
    };

    let greeting = move || format!("Welcome, {}", username.get());
    let role = move || auth.get().snapshot.role.as_str();
    let expiry = move || expiry_text(&auth.get().snapshot, now.get());

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <h1>{greeting}</h1>
                <p class="home-page__role">"Role: " {role}</p>
                <p class="home-page__expiry">{expiry}</p>
            </header>
            <section class="home-page__actions">
                <a class="btn btn--primary" href="/attendance">
                    "View attendance report"
                </a>
            </section>
            <section class="home-page__image">
                <h2>"Stored face image"</h2>
                <Suspense fallback=move || view! { <p class="home-page__loading">"Loading image..."</p> }>
                    {move || stored_image.get().map(render_stored_image)}
                </Suspense>
            </section>
            <section class="home-page__users">
                <h2>"Users"</h2>
                <Show when=move || !status.get().is_empty()>
                    <p class="home-page__status">{move || status.get()}</p>
                </Show>
                <Suspense fallback=move || view! { <p class="home-page__loading">"Loading users..."</p> }>
                    {move || users.get().map(|result| render_roster(result, promote, remove))}
                </Suspense>
            </section>
        </div>
    }
}

fn render_stored_image(result: Result<Option<String>, ApiError>) -> AnyView {
    match result {
        Ok(Some(image)) => {
            view! { <img class="home-page__stored-image" src=stored_image_src(&image) alt="Stored face"/> }.into_any()
        }
        Ok(None) => view! { <p class="home-page__empty">{NO_STORED_IMAGE}</p> }.into_any(),
        Err(e) => view! { <p class="home-page__empty">{failure_message(&e, NO_STORED_IMAGE)}</p> }.into_any(),
    }
}

fn render_roster<P, D>(result: Result<UsersResponse, ApiError>, promote: P, remove: D) -> AnyView
where
    P: Fn(String) + Copy + Send + Sync + 'static,
    D: Fn(String) + Copy + Send + Sync + 'static,
{
    let roster = match result {
        Ok(roster) => roster,
        Err(e) => {
            log::warn!("loading users failed: {e}");
            return view! { <p class="home-page__error">{failure_message(&e, LOAD_USERS_FAILED)}</p> }.into_any();
        }
    };

    view! {
        <p class="home-page__count">{roster_heading(roster.count)}</p>
        <table class="users-table">
            <thead>
                <tr>
                    <th>"Roll number"</th>
                    <th>"Username"</th>
                    <th>"Role"</th>
                    <th>"Actions"</th>
                </tr>
            </thead>
            <tbody>
                {roster
                    .users
                    .into_iter()
                    .map(|user| {
                        let role = user.role();
                        let promotable = can_promote(&user);
                        let roll_for_promote = user.roll_number.clone();
                        let roll_for_delete = user.roll_number.clone();
                        view! {
                            <tr>
                                <td>{user.roll_number}</td>
                                <td>{user.username.unwrap_or_default()}</td>
                                <td>
                                    <span class=role_pill_class(role)>{role.as_str()}</span>
                                </td>
                                <td class="users-table__actions">
                                    {promotable
                                        .then(|| {
                                            view! {
                                                <button
                                                    class="btn"
                                                    on:click=move |_: leptos::ev::MouseEvent| promote(roll_for_promote.clone())
                                                >
                                                    "Make admin"
                                                </button>
                                            }
                                        })}
                                    <button
                                        class="btn btn--danger"
                                        on:click=move |_: leptos::ev::MouseEvent| remove(roll_for_delete.clone())
                                    >
                                        "Delete"
                                    </button>
                                </td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
        .into_any()
}
