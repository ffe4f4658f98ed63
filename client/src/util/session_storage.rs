//! `localStorage`-backed session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every tab of the app shares one origin-scoped storage area. Mutations made
//! here are announced to this tab with an `auth-change` window event; changes
//! made by other tabs arrive through the platform `storage` event. Outside the
//! browser the store reads as logged out and ignores writes.

#[cfg(test)]
#[path = "session_storage_test.rs"]
mod session_storage_test;

#[cfg(feature = "hydrate")]
use crate::state::session::{KEY_LOGGED_IN, KEY_LOGIN_AT, KEY_ROLE, KEY_USERNAME};
use crate::state::session::{ChangeListener, ExternalChangeFeed, Session, SessionRepository, Subscription};

/// In-process notification fired after every `write`/`clear`.
pub const AUTH_CHANGE_EVENT: &str = "auth-change";
/// Browser notification for storage changes made by another context.
pub const STORAGE_EVENT: &str = "storage";

/// Handle to the browser's session storage. Stateless; every call goes to
/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSessionStore;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn dispatch_auth_change() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Ok(event) = web_sys::Event::new(AUTH_CHANGE_EVENT) {
        let _ = window.dispatch_event(&event);
    }
}

#[cfg(feature = "hydrate")]
fn listen_window(event: &'static str, listener: ChangeListener) -> Subscription {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return Subscription::inert();
    };
    let callback = Closure::<dyn Fn()>::new(move || listener());
    if window
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("could not subscribe to window event {event}");
        return Subscription::inert();
    }
    Subscription::new(move || {
        let _ = window.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
    })
}

impl SessionRepository for BrowserSessionStore {
    fn read(&self) -> Session {
        #[cfg(feature = "hydrate")]
        {
            let Some(storage) = local_storage() else {
                return Session::default();
            };
            Session::from_lookup(|key| storage.get_item(key).ok().flatten())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Session::default()
        }
    }

    fn write(&self, session: &Session) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                for (key, value) in session.to_entries() {
                    let _ = storage.set_item(key, &value);
                }
            }
            dispatch_auth_change();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(KEY_LOGGED_IN, "false");
                for key in [KEY_USERNAME, KEY_LOGIN_AT, KEY_ROLE] {
                    let _ = storage.remove_item(key);
                }
            }
            dispatch_auth_change();
        }
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        #[cfg(feature = "hydrate")]
        {
            listen_window(AUTH_CHANGE_EVENT, listener)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = listener;
            Subscription::inert()
        }
    }
}

impl ExternalChangeFeed for BrowserSessionStore {
    fn subscribe_external(&self, listener: ChangeListener) -> Subscription {
        #[cfg(feature = "hydrate")]
        {
            listen_window(STORAGE_EVENT, listener)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = listener;
            Subscription::inert()
        }
    }
}
