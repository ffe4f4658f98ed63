use super::*;

// =============================================================
// Role
// =============================================================

#[test]
fn role_default_is_user() {
    assert_eq!(Role::default(), Role::User);
}

#[test]
fn role_parse_only_accepts_admin_literal() {
    assert_eq!(Role::parse("admin"), Role::Admin);
    assert_eq!(Role::parse(" admin "), Role::Admin);
    assert_eq!(Role::parse("user"), Role::User);
    assert_eq!(Role::parse("ADMIN"), Role::User);
    assert_eq!(Role::parse(""), Role::User);
}

#[test]
fn role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
}

// =============================================================
// Decoding
// =============================================================

#[test]
fn read_on_empty_store_returns_defaults() {
    let store = MemorySessionStore::new();
    assert_eq!(
        store.read(),
        Session { logged_in: false, username: String::new(), role: Role::User, login_at: 0 }
    );
}

#[test]
fn non_numeric_login_at_decodes_to_zero() {
    let store = MemorySessionStore::new();
    store.set_raw(KEY_LOGGED_IN, "true");
    store.set_raw(KEY_LOGIN_AT, "yesterday");
    let session = store.read();
    assert!(session.logged_in);
    assert_eq!(session.login_at, 0);
}

#[test]
fn logged_in_flag_requires_exact_true() {
    let store = MemorySessionStore::new();
    store.set_raw(KEY_LOGGED_IN, "TRUE");
    assert!(!store.read().logged_in);
    store.set_raw(KEY_LOGGED_IN, "1");
    assert!(!store.read().logged_in);
}

#[test]
fn missing_role_decodes_to_user() {
    let store = MemorySessionStore::new();
    store.set_raw(KEY_LOGGED_IN, "true");
    store.set_raw(KEY_USERNAME, "21BD1A0501");
    store.set_raw(KEY_LOGIN_AT, "1700000000000");
    let session = store.read();
    assert_eq!(session.role, Role::User);
    assert_eq!(session.username, "21BD1A0501");
    assert_eq!(session.login_at, 1_700_000_000_000);
}

#[test]
fn to_entries_uses_persisted_key_names() {
    let session = Session::signed_in("ADMIN01", Role::Admin, 42);
    let entries = session.to_entries();
    assert_eq!(entries[0], (KEY_LOGGED_IN, "true".to_owned()));
    assert_eq!(entries[1], (KEY_USERNAME, "ADMIN01".to_owned()));
    assert_eq!(entries[2], (KEY_LOGIN_AT, "42".to_owned()));
    assert_eq!(entries[3], (KEY_ROLE, "admin".to_owned()));
}

// =============================================================
// MemorySessionStore lifecycle
// =============================================================

#[test]
fn write_then_read_returns_same_session() {
    let store = MemorySessionStore::new();
    let session = Session::signed_in("21BD1A0501", Role::User, 1_000);
    store.write(&session);
    assert_eq!(store.read(), session);
    assert_eq!(store.mutation_count(), 1);
}

#[test]
fn clear_sets_flag_false_and_removes_other_keys() {
    let store = MemorySessionStore::with_session(&Session::signed_in("u", Role::Admin, 5));
    store.clear();
    assert_eq!(store.raw(KEY_LOGGED_IN).as_deref(), Some("false"));
    assert_eq!(store.raw(KEY_USERNAME), None);
    assert_eq!(store.raw(KEY_LOGIN_AT), None);
    assert_eq!(store.raw(KEY_ROLE), None);
    assert_eq!(store.read(), Session::default());
}

#[test]
fn clear_twice_is_idempotent() {
    let store = MemorySessionStore::with_session(&Session::signed_in("u", Role::User, 5));
    store.clear();
    let after_first = store.read();
    store.clear();
    assert_eq!(store.read(), after_first);
}

#[test]
fn clones_share_storage() {
    let store = MemorySessionStore::new();
    let other = store.clone();
    store.write(&Session::signed_in("u", Role::User, 9));
    assert_eq!(other.read().username, "u");
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn write_and_clear_notify_local_subscribers() {
    let store = MemorySessionStore::new();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let _sub = store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

    store.write(&Session::signed_in("u", Role::User, 1));
    store.clear();
    assert_eq!(hits.get(), 2);
}

#[test]
fn listener_observes_post_mutation_state() {
    let store = MemorySessionStore::new();
    let seen = Rc::new(RefCell::new(None));
    let seen_in = seen.clone();
    let reader = store.clone();
    let _sub = store.subscribe(Rc::new(move || *seen_in.borrow_mut() = Some(reader.read())));

    store.clear();
    assert_eq!(seen.borrow().clone(), Some(Session::default()));
}

#[test]
fn dropping_subscription_unsubscribes() {
    let store = MemorySessionStore::new();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let sub = store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
    assert_eq!(store.listener_count(), 1);

    drop(sub);
    store.clear();
    assert_eq!(hits.get(), 0);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn apply_external_fires_external_feed_only() {
    let store = MemorySessionStore::new();
    let local = Rc::new(Cell::new(0));
    let external = Rc::new(Cell::new(0));
    let local_in = local.clone();
    let external_in = external.clone();
    let _a = store.subscribe(Rc::new(move || local_in.set(local_in.get() + 1)));
    let _b = store.subscribe_external(Rc::new(move || external_in.set(external_in.get() + 1)));

    store.apply_external(Some(&Session::signed_in("other-tab", Role::User, 3)));
    assert_eq!(local.get(), 0);
    assert_eq!(external.get(), 1);
    assert_eq!(store.read().username, "other-tab");
    assert_eq!(store.mutation_count(), 0);
}

#[test]
fn listener_may_unsubscribe_itself_while_notified() {
    let store = MemorySessionStore::new();
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let slot_in = slot.clone();
    let sub = store.subscribe(Rc::new(move || {
        slot_in.borrow_mut().take();
    }));
    *slot.borrow_mut() = Some(sub);

    store.clear();
    assert_eq!(store.listener_count(), 0);
}
