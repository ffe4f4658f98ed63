//! Route authorization and the shared logout action.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route wraps its page in `RequireAuth`. The decision is
//! re-evaluated from storage on each navigation, so a session that expired
//! while the tab slept is caught before the page renders.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::state::auth::{AuthSnapshot, AuthState, validate};
use crate::state::session::{Role, SESSION_TTL_MS, SessionRepository};
use crate::util::session_storage::BrowserSessionStore;
use crate::util::timer::{Clock, SystemClock};

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const USER_PATH: &str = "/user";
pub const HOME_PATH: &str = "/home";

/// Outcome of an authorization check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access<V> {
    Allow(V),
    Redirect(&'static str),
}

/// Decide whether `view` may render for `snapshot`.
///
/// No session sends the user to `/login`; a non-admin asking for an admin view
/// lands on `/user`.
pub fn authorize<V>(snapshot: &AuthSnapshot, view: V, required: Option<Role>) -> Access<V> {
    if !snapshot.is_logged_in {
        return Access::Redirect(LOGIN_PATH);
    }
    if required == Some(Role::Admin) && snapshot.role != Role::Admin {
        return Access::Redirect(USER_PATH);
    }
    Access::Allow(view)
}

/// Validate storage (clearing an expired session) and authorize against the
/// fresh snapshot.
pub fn authorize_now<V>(
    store: &dyn SessionRepository,
    clock: &dyn Clock,
    view: V,
    required: Option<Role>,
) -> Access<V> {
    let snapshot = validate(store, clock.now_ms(), SESSION_TTL_MS);
    authorize(&snapshot, view, required)
}

/// Landing page after a successful login.
pub fn post_login_path(role: Role) -> &'static str {
    match role {
        Role::Admin => HOME_PATH,
        Role::User => USER_PATH,
    }
}

/// Logout action: clear storage first, then navigate to `/login`.
pub fn logout(store: &dyn SessionRepository, navigate: &dyn Fn(&str)) {
    log::info!("logging out");
    store.clear();
    navigate(LOGIN_PATH);
}

/// Full page navigation through `window.location`.
pub fn hard_navigate(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(path);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}

/// Render `children` only when the stored session allows it; otherwise
/// redirect.
///
/// The check runs in an effect, so it only happens in the browser and repeats
/// on each navigation and auth snapshot change.
#[component]
pub fn RequireAuth(#[prop(optional)] role: Option<Role>, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();
    let decision = RwSignal::new(None::<Access<String>>);

    Effect::new(move || {
        let path = location.pathname.get();
        auth.track();
        let next = authorize_now(&BrowserSessionStore, &SystemClock, path, role);
        if let Access::Redirect(target) = &next {
            log::debug!("route guard redirecting to {target}");
        }
        if decision.get_untracked().as_ref() != Some(&next) {
            decision.set(Some(next));
        }
    });

    move || match decision.get() {
        None => view! { <p class="route-guard__pending">"Checking session..."</p> }.into_any(),
        Some(Access::Allow(_)) => children().into_any(),
        Some(Access::Redirect(target)) => view! { <Redirect path=target/> }.into_any(),
    }
}
