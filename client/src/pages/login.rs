//! Login page: roll number plus a face capture, verified by the attendance API.
//!
//! SYSTEM CONTEXT
//! ==============
//! Served at `/` and `/login`. A recognised face starts a session in browser
//! storage (which wakes the auth gate) and routes the user to their landing
//! page: `/home` for admins, `/user` for everyone else.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::net::types::LoginResponse;
use crate::state::session::Session;

const MISSING_ROLL_NUMBER: &str = "Please enter your roll number.";
const MISSING_IMAGE: &str = "Failed to capture image. Please try again.";
const NOT_RECOGNISED: &str = "Face not recognized.";

/// Roll numbers are matched upper-case by the API.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn normalize_roll_number(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn validate_login_input(roll_number: &str, has_image: bool) -> Result<String, &'static str> {
    let roll_number = normalize_roll_number(roll_number);
    if roll_number.is_empty() {
        return Err(MISSING_ROLL_NUMBER);
    }
    if !has_image {
        return Err(MISSING_IMAGE);
    }
    Ok(roll_number)
}

/// Turn a login payload into the session to persist, stamped at `now`.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn login_outcome(resp: &LoginResponse, now: i64) -> Result<Session, &'static str> {
    if !resp.is_recognised() {
        return Err(NOT_RECOGNISED);
    }
    Ok(Session::signed_in(resp.name.clone(), resp.role(), now))
}

#[cfg(feature = "hydrate")]
fn selected_image(input: NodeRef<leptos::html::Input>) -> Option<web_sys::File> {
    input.get_untracked()?.files()?.get(0)
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let roll_number = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let file_input = NodeRef::<leptos::html::Input>::new();
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }

        #[cfg(feature = "hydrate")]
        {
            use crate::state::session::SessionRepository;
            use crate::util::timer::Clock;

            let image = selected_image(file_input);
            let roll = match validate_login_input(&roll_number.get_untracked(), image.is_some()) {
                Ok(roll) => roll,
                Err(msg) => {
                    info.set(msg.to_owned());
                    return;
                }
            };
            let Some(image) = image else {
                return;
            };
            busy.set(true);
            info.set("Verifying face...".to_owned());

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(&roll, &image).await {
                    Ok(resp) => match login_outcome(&resp, crate::util::timer::SystemClock.now_ms()) {
                        Ok(session) => {
                            log::info!("login succeeded for {}", session.username);
                            crate::util::session_storage::BrowserSessionStore.write(&session);
                            info.set(String::new());
                            let target = crate::util::auth::post_login_path(session.role);
                            navigate(target, leptos_router::NavigateOptions::default());
                        }
                        Err(msg) => info.set(msg.to_owned()),
                    },
                    Err(e) => {
                        log::warn!("login failed: {e}");
                        info.set(e.to_string());
                    }
                }
                busy.set(false);
            });
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"AttendEasy"</h1>
                <p class="login-card__subtitle">"Face Recognition Login"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Roll number"
                        prop:value=move || roll_number.get()
                        on:input=move |ev| roll_number.set(event_target_value(&ev).to_ascii_uppercase())
                    />
                    <input
                        class="login-input login-input--file"
                        type="file"
                        accept="image/*"
                        capture="user"
                        node_ref=file_input
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Verifying..." } else { "Login" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
