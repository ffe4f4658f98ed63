//! Auth snapshot derived from the persisted session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards, the navigation bar and the auth gate all decide from an
//! `AuthSnapshot`. The snapshot is recomputed from storage on every change
//! signal and every navigation; it is never written back.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::session::{Role, Session, SessionRepository};

/// Point-in-time view of session validity.
///
/// `expires_at` is `login_at + ttl` for a live session and `0` otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_logged_in: bool,
    pub username: String,
    pub role: Role,
    pub expires_at: i64,
}

impl AuthSnapshot {
    /// The logged-out snapshot.
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn is_admin(&self) -> bool {
        self.is_logged_in && self.role == Role::Admin
    }

    /// Milliseconds left before expiry, `0` when logged out or already past.
    pub fn remaining_ms(&self, now: i64) -> i64 {
        if self.is_logged_in { self.expires_at.saturating_sub(now).max(0) } else { 0 }
    }
}

/// Classification of a raw session at a given instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedOut,
    /// Logged in, but `now - login_at` exceeded the TTL.
    Expired,
    Active(AuthSnapshot),
}

/// Classify `raw` without side effects.
///
/// A `login_at` that is not a positive timestamp, or whose age or expiry does
/// not fit in an `i64`, is corrupt and classifies as logged out.
pub fn evaluate(raw: &Session, now: i64, ttl: i64) -> SessionStatus {
    if !raw.logged_in || raw.login_at <= 0 {
        return SessionStatus::LoggedOut;
    }
    let (Some(age), Some(expires_at)) = (now.checked_sub(raw.login_at), raw.login_at.checked_add(ttl)) else {
        return SessionStatus::LoggedOut;
    };
    if age > ttl {
        return SessionStatus::Expired;
    }
    SessionStatus::Active(AuthSnapshot {
        is_logged_in: true,
        username: raw.username.clone(),
        role: raw.role,
        expires_at,
    })
}

/// Read the store and derive the current snapshot.
///
/// An expired session is cleared from the store before the logged-out
/// snapshot is returned.
pub fn validate(store: &dyn SessionRepository, now: i64, ttl: i64) -> AuthSnapshot {
    match evaluate(&store.read(), now, ttl) {
        SessionStatus::Active(snapshot) => snapshot,
        SessionStatus::LoggedOut => AuthSnapshot::logged_out(),
        SessionStatus::Expired => {
            log::info!("session expired; clearing stored credentials");
            store.clear();
            AuthSnapshot::logged_out()
        }
    }
}

/// Authentication state shared through Leptos context.
///
/// `loading` stays `true` until the browser has evaluated the stored
/// session, so server-rendered markup and the first hydrated render agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub snapshot: AuthSnapshot,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { snapshot: AuthSnapshot::logged_out(), loading: true }
    }
}

impl AuthState {
    pub fn ready(snapshot: AuthSnapshot) -> Self {
        Self { snapshot, loading: false }
    }
}
