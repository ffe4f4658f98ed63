//! Persisted session record and the storage ports it travels through.
//!
//! DESIGN
//! ======
//! The session lives in a flat string key/value area shared by every open
//! view of the app. Components never touch that area directly: they go
//! through `SessionRepository` (read/write/clear + local change listeners)
//! and `ExternalChangeFeed` (changes made by other browser contexts), so the
//! validator and auth gate can run against `MemorySessionStore` in tests.
//!
//! Decoding is total. Missing or malformed values fall back to the logged-out
//! defaults instead of surfacing an error.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Session lifetime measured from `login_at`.
pub const SESSION_TTL_MS: i64 = 60 * 60 * 1000;

pub const KEY_LOGGED_IN: &str = "userLoggedIn";
pub const KEY_USERNAME: &str = "username";
pub const KEY_LOGIN_AT: &str = "loginAt";
pub const KEY_ROLE: &str = "role";

/// Authorization level granted by the attendance API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Total parse: anything other than `"admin"` is a plain user.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "admin" { Self::Admin } else { Self::User }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Raw persisted session fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub logged_in: bool,
    pub username: String,
    pub role: Role,
    /// Milliseconds since the Unix epoch; `0` means no session.
    pub login_at: i64,
}

impl Session {
    /// Session for a principal the API just verified.
    pub fn signed_in(username: impl Into<String>, role: Role, login_at: i64) -> Self {
        Self { logged_in: true, username: username.into(), role, login_at }
    }

    /// Decode from a key lookup, applying defaults to absent or corrupt values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            logged_in: lookup(KEY_LOGGED_IN).as_deref() == Some("true"),
            username: lookup(KEY_USERNAME).unwrap_or_default(),
            role: lookup(KEY_ROLE).as_deref().map_or(Role::User, Role::parse),
            login_at: lookup(KEY_LOGIN_AT).as_deref().map_or(0, parse_login_at),
        }
    }

    /// Encode as the four persisted key/value pairs.
    pub fn to_entries(&self) -> [(&'static str, String); 4] {
        [
            (KEY_LOGGED_IN, if self.logged_in { "true" } else { "false" }.to_owned()),
            (KEY_USERNAME, self.username.clone()),
            (KEY_LOGIN_AT, self.login_at.to_string()),
            (KEY_ROLE, self.role.as_str().to_owned()),
        ]
    }
}

fn parse_login_at(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}

/// Callback invoked after the session changed.
pub type ChangeListener = Rc<dyn Fn()>;

/// Guard for a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A guard with nothing to release.
    pub fn inert() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Process-wide session storage.
///
/// `write` and `clear` notify local subscribers after the mutation has been
/// applied, so a listener never observes the pre-mutation state.
pub trait SessionRepository {
    fn read(&self) -> Session;
    fn write(&self, session: &Session);
    /// Logout/expiry: `loggedIn` becomes `false`, the other fields are removed.
    /// Clearing an already-clear store leaves it unchanged.
    fn clear(&self);
    fn subscribe(&self, listener: ChangeListener) -> Subscription;
}

/// Change notifications originating in another context sharing the storage.
pub trait ExternalChangeFeed {
    fn subscribe_external(&self, listener: ChangeListener) -> Subscription;
}

#[derive(Default)]
struct ListenerSet {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, ChangeListener)>>,
}

impl ListenerSet {
    fn add(set: &Rc<Self>, listener: ChangeListener) -> Subscription {
        let id = set.next_id.get();
        set.next_id.set(id + 1);
        set.entries.borrow_mut().push((id, listener));
        let weak: Weak<Self> = Rc::downgrade(set);
        Subscription::new(move || {
            if let Some(set) = weak.upgrade() {
                set.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    fn notify(&self) {
        // Snapshot first: listeners may subscribe or unsubscribe while running.
        let listeners: Vec<ChangeListener> = self.entries.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener();
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

#[derive(Default)]
struct MemoryInner {
    entries: RefCell<BTreeMap<String, String>>,
    mutations: Cell<u64>,
    local: Rc<ListenerSet>,
    external: Rc<ListenerSet>,
}

/// In-process key/value session store.
///
/// Clones share the same storage, like several components holding the same
/// browser storage handle.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Rc<MemoryInner>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `session`, without notifying anyone.
    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        store.put_entries(session);
        store
    }

    /// Raw value for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.entries.borrow().get(key).cloned()
    }

    /// Set a raw value, bypassing encoding and notifications.
    pub fn set_raw(&self, key: &str, value: &str) {
        self.inner.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    /// Replace the stored session as another context would, then fire the
    /// external feed instead of the local one.
    pub fn apply_external(&self, session: Option<&Session>) {
        match session {
            Some(session) => self.put_entries(session),
            None => self.clear_entries(),
        }
        self.inner.external.notify();
    }

    /// Number of `write`/`clear` calls served so far.
    pub fn mutation_count(&self) -> u64 {
        self.inner.mutations.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.local.len() + self.inner.external.len()
    }

    fn put_entries(&self, session: &Session) {
        let mut entries = self.inner.entries.borrow_mut();
        for (key, value) in session.to_entries() {
            entries.insert(key.to_owned(), value);
        }
    }

    fn clear_entries(&self) {
        let mut entries = self.inner.entries.borrow_mut();
        entries.insert(KEY_LOGGED_IN.to_owned(), "false".to_owned());
        entries.remove(KEY_USERNAME);
        entries.remove(KEY_LOGIN_AT);
        entries.remove(KEY_ROLE);
    }

    fn bump(&self) {
        self.inner.mutations.set(self.inner.mutations.get() + 1);
    }
}

impl SessionRepository for MemorySessionStore {
    fn read(&self) -> Session {
        let entries = self.inner.entries.borrow();
        Session::from_lookup(|key| entries.get(key).cloned())
    }

    fn write(&self, session: &Session) {
        self.put_entries(session);
        self.bump();
        self.inner.local.notify();
    }

    fn clear(&self) {
        self.clear_entries();
        self.bump();
        self.inner.local.notify();
    }

    fn subscribe(&self, listener: ChangeListener) -> Subscription {
        ListenerSet::add(&self.inner.local, listener)
    }
}

impl ExternalChangeFeed for MemorySessionStore {
    fn subscribe_external(&self, listener: ChangeListener) -> Subscription {
        ListenerSet::add(&self.inner.external, listener)
    }
}
