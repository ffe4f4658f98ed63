//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::nav_bar::NavBar;
use crate::pages::{attendance::AttendancePage, home::HomePage, login::LoginPage, user::UserPage};
use crate::state::auth::AuthState;
use crate::state::session::Role;
use crate::util::auth::RequireAuth;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth context and, in the browser, mounts the single auth gate
/// that keeps it current.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    provide_context(auth);

    // The gate holds browser callbacks and lives outside the reactive
    // context; it is mounted after hydration and dropped with the app.
    #[cfg(feature = "hydrate")]
    {
        use crate::state::session::SESSION_TTL_MS;
        use crate::util::auth_gate::{AuthGate, GatePorts};

        let gate = StoredValue::new_local(None::<AuthGate>);
        Effect::new(move || {
            if gate.with_value(Option::is_some) {
                return;
            }
            let mounted = AuthGate::mount(GatePorts::browser(), SESSION_TTL_MS, move |snapshot| {
                auth.set(AuthState::ready(snapshot.clone()));
            });
            gate.set_value(Some(mounted));
        });
        on_cleanup(move || gate.update_value(|g| drop(g.take())));
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/attendeasy.css"/>
        <Title text="AttendEasy"/>

        <Router>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=LoginPage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route
                        path=StaticSegment("home")
                        view=|| view! { <RequireAuth role=Role::Admin><HomePage/></RequireAuth> }
                    />
                    <Route
                        path=StaticSegment("attendance")
                        view=|| view! { <RequireAuth role=Role::Admin><AttendancePage/></RequireAuth> }
                    />
                    <Route path=StaticSegment("user") view=|| view! { <RequireAuth><UserPage/></RequireAuth> }/>
                </Routes>
            </main>
        </Router>
    }
}
