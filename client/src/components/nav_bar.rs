//! Top navigation bar with role-dependent links and login/logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered above every route. The link set is a pure function of the current
//! `AuthSnapshot`, so the bar follows login, logout, expiry and cross-tab
//! changes without any state of its own beyond the mobile menu toggle.

#[cfg(test)]
#[path = "nav_bar_test.rs"]
mod nav_bar_test;

use leptos::prelude::*;

use crate::state::auth::{AuthSnapshot, AuthState};
use crate::state::session::Role;
use crate::util::auth::{HOME_PATH, LOGIN_PATH, ROOT_PATH, USER_PATH, hard_navigate, logout};
use crate::util::session_storage::BrowserSessionStore;

const ATTENDANCE_PATH: &str = "/attendance";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// Right-hand session control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionAffordance {
    /// Link to the given login route.
    Login(&'static str),
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavModel {
    pub brand_href: &'static str,
    pub links: Vec<NavLink>,
    pub affordance: SessionAffordance,
}

/// Compose the bar for `snapshot`.
///
/// The admin set is chosen by role alone; `is_logged_in` only toggles the
/// home link and the login/logout control.
pub fn nav_model(snapshot: &AuthSnapshot) -> NavModel {
    let logged_in = snapshot.is_logged_in;
    if snapshot.role == Role::Admin {
        let mut links = Vec::with_capacity(2);
        if logged_in {
            links.push(NavLink { label: "Home", href: HOME_PATH });
        }
        links.push(NavLink { label: "Attendance", href: ATTENDANCE_PATH });
        return NavModel {
            brand_href: HOME_PATH,
            links,
            affordance: if logged_in { SessionAffordance::Logout } else { SessionAffordance::Login(ROOT_PATH) },
        };
    }

    NavModel {
        brand_href: USER_PATH,
        links: if logged_in { vec![NavLink { label: "Home", href: USER_PATH }] } else { Vec::new() },
        affordance: if logged_in { SessionAffordance::Logout } else { SessionAffordance::Login(LOGIN_PATH) },
    }
}

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let nav_open = RwSignal::new(false);
    let model = Memo::new(move |_| nav_model(&auth.get().snapshot));

    let close = move |_: leptos::ev::MouseEvent| nav_open.set(false);
    let on_logout = move |_: leptos::ev::MouseEvent| {
        nav_open.set(false);
        logout(&BrowserSessionStore, &hard_navigate);
    };

    view! {
        <nav class="nav-bar">
            <a class="nav-bar__brand" href=move || model.get().brand_href on:click=close>
                "AttendEasy"
            </a>
            <button
                class="btn nav-bar__toggle"
                aria-label="Toggle navigation"
                aria-expanded=move || nav_open.get().to_string()
                on:click=move |_| nav_open.update(|open| *open = !*open)
            >
                "☰"
            </button>
            <div class=move || if nav_open.get() { "nav-bar__menu nav-bar__menu--open" } else { "nav-bar__menu" }>
                <ul class="nav-bar__links">
                    {move || {
                        model
                            .get()
                            .links
                            .into_iter()
                            .map(|link| {
                                view! {
                                    <li>
                                        <a class="nav-bar__link" href=link.href on:click=close>
                                            {link.label}
                                        </a>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
                {move || match model.get().affordance {
                    SessionAffordance::Login(href) => {
                        view! {
                            <a class="btn nav-bar__login" href=href on:click=close>
                                "Login"
                            </a>
                        }
                            .into_any()
                    }
                    SessionAffordance::Logout => {
                        view! {
                            <button class="btn nav-bar__logout" on:click=on_logout>
                                "Logout"
                            </button>
                        }
                            .into_any()
                    }
                }}
            </div>
        </nav>
    }
}
