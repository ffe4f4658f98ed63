//! Live auth snapshot with automatic expiry.
//!
//! SYSTEM CONTEXT
//! ==============
//! One gate is mounted per app instance. It keeps the current `AuthSnapshot`
//! in sync with storage and guarantees an expired session is cleared and the
//! user sent back to `/login` without waiting for the next navigation.
//!
//! DESIGN
//! ======
//! - Local `auth-change` signals and cross-tab `storage` signals both land in
//!   `recompute`.
//! - At most one expiry task is outstanding. Every recomputation cancels the
//!   previous task before scheduling the next one.
//! - Clearing an expired session emits a change signal while a recomputation
//!   is already running. Nested signals only mark the gate dirty; the running
//!   recomputation loops until storage is stable.
//! - Listeners and the timer hold weak references, so dropping the gate is a
//!   complete teardown.

#[cfg(test)]
#[path = "auth_gate_test.rs"]
mod auth_gate_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::state::auth::{AuthSnapshot, SessionStatus, evaluate, validate};
use crate::state::session::{ExternalChangeFeed, SessionRepository, Subscription};
use crate::util::auth::LOGIN_PATH;
use crate::util::timer::{Clock, ScheduledTask, Scheduler};

/// Collaborators the gate talks to.
pub struct GatePorts {
    pub store: Rc<dyn SessionRepository>,
    pub external: Rc<dyn ExternalChangeFeed>,
    pub clock: Rc<dyn Clock>,
    pub scheduler: Rc<dyn Scheduler>,
    /// Full navigation to a path, used when the session expires.
    pub navigate: Rc<dyn Fn(&str)>,
}

impl GatePorts {
    /// Browser storage, wall clock, `setTimeout` and `location.href`.
    pub fn browser() -> Self {
        use crate::util::session_storage::BrowserSessionStore;
        use crate::util::timer::{SystemClock, TimeoutScheduler};

        Self {
            store: Rc::new(BrowserSessionStore),
            external: Rc::new(BrowserSessionStore),
            clock: Rc::new(SystemClock),
            scheduler: Rc::new(TimeoutScheduler),
            navigate: Rc::new(crate::util::auth::hard_navigate),
        }
    }
}

struct GateInner {
    ports: GatePorts,
    ttl_ms: i64,
    on_change: Box<dyn Fn(&AuthSnapshot)>,
    snapshot: RefCell<AuthSnapshot>,
    expiry: RefCell<Option<ScheduledTask>>,
    subscriptions: RefCell<Vec<Subscription>>,
    mounted: Cell<bool>,
    /// Set once the first snapshot has been reported through `on_change`.
    announced: Cell<bool>,
    recomputing: Cell<bool>,
    dirty: Cell<bool>,
}

/// Mounted auth gate. Dropping it unmounts.
pub struct AuthGate {
    inner: Rc<GateInner>,
}

impl AuthGate {
    /// Compute the initial snapshot, subscribe to both change feeds and arm
    /// the expiry timer. `on_change` runs whenever the snapshot changes,
    /// including once for the initial snapshot.
    pub fn mount(ports: GatePorts, ttl_ms: i64, on_change: impl Fn(&AuthSnapshot) + 'static) -> Self {
        let inner = Rc::new(GateInner {
            ports,
            ttl_ms,
            on_change: Box::new(on_change),
            snapshot: RefCell::new(AuthSnapshot::logged_out()),
            expiry: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
            mounted: Cell::new(true),
            announced: Cell::new(false),
            recomputing: Cell::new(false),
            dirty: Cell::new(false),
        });

        let local = inner.ports.store.subscribe(recompute_listener(&inner));
        let external = inner.ports.external.subscribe_external(recompute_listener(&inner));
        inner.subscriptions.borrow_mut().extend([local, external]);
        recompute(&inner);

        log::debug!("auth gate mounted");
        Self { inner }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Re-read storage now.
    pub fn refresh(&self) {
        recompute(&self.inner);
    }

    /// Logout action: clear the session, then leave for `/login`.
    pub fn logout(&self) {
        crate::util::auth::logout(self.inner.ports.store.as_ref(), self.inner.ports.navigate.as_ref());
        recompute(&self.inner);
    }

    /// Whether an expiry task is currently armed.
    pub fn has_pending_expiry(&self) -> bool {
        self.inner.expiry.borrow().is_some()
    }

    /// Unsubscribe from both feeds and cancel the expiry task.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        drop(subscriptions);
        let expiry = self.inner.expiry.borrow_mut().take();
        drop(expiry);
        log::debug!("auth gate unmounted");
    }
}

impl Drop for AuthGate {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn recompute_listener(inner: &Rc<GateInner>) -> Rc<dyn Fn()> {
    let weak = Rc::downgrade(inner);
    Rc::new(move || {
        if let Some(inner) = weak.upgrade() {
            recompute(&inner);
        }
    })
}

fn recompute(inner: &Rc<GateInner>) {
    if !inner.mounted.get() {
        return;
    }
    if inner.recomputing.replace(true) {
        inner.dirty.set(true);
        return;
    }
    loop {
        inner.dirty.set(false);
        let now = inner.ports.clock.now_ms();
        let next = validate(inner.ports.store.as_ref(), now, inner.ttl_ms);
        apply(inner, next, now);
        if !inner.dirty.get() || !inner.mounted.get() {
            break;
        }
    }
    inner.recomputing.set(false);
}

fn apply(inner: &Rc<GateInner>, next: AuthSnapshot, now: i64) {
    let superseded = inner.expiry.borrow_mut().take();
    drop(superseded);

    let changed = !inner.announced.replace(true) || *inner.snapshot.borrow() != next;
    if changed {
        log::debug!(
            "auth snapshot changed: logged_in={} role={}",
            next.is_logged_in,
            next.role.as_str()
        );
        *inner.snapshot.borrow_mut() = next.clone();
        (inner.on_change)(&next);
    }

    if !next.is_logged_in {
        return;
    }
    let remaining = next.expires_at.saturating_sub(now);
    if remaining <= 0 {
        expire(inner);
        return;
    }
    let weak: Weak<GateInner> = Rc::downgrade(inner);
    let task = inner.ports.scheduler.schedule(
        remaining,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let fired = inner.expiry.borrow_mut().take();
                drop(fired);
                on_timer(&inner);
            }
        }),
    );
    *inner.expiry.borrow_mut() = Some(task);
}

/// Timer callback. Long delays are clamped by the scheduler, so the timer can
/// fire before the deadline; storage is checked again before expiring.
fn on_timer(inner: &Rc<GateInner>) {
    let now = inner.ports.clock.now_ms();
    match evaluate(&inner.ports.store.read(), now, inner.ttl_ms) {
        SessionStatus::Active(snapshot) if snapshot.expires_at > now => {
            log::debug!("expiry timer fired early; rescheduling");
            recompute(inner);
        }
        SessionStatus::LoggedOut => recompute(inner),
        SessionStatus::Active(_) | SessionStatus::Expired => expire(inner),
    }
}

fn expire(inner: &Rc<GateInner>) {
    if !inner.mounted.get() {
        return;
    }
    log::info!("session expired; redirecting to {LOGIN_PATH}");
    inner.ports.store.clear();
    (inner.ports.navigate)(LOGIN_PATH);
    recompute(inner);
}
