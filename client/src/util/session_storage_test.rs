#![cfg(not(feature = "hydrate"))]

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::state::session::Role;

#[test]
fn read_is_logged_out_outside_browser() {
    assert_eq!(BrowserSessionStore.read(), Session::default());
}

#[test]
fn write_is_noop_outside_browser() {
    BrowserSessionStore.write(&Session::signed_in("u", Role::Admin, 1));
    assert_eq!(BrowserSessionStore.read(), Session::default());
}

#[test]
fn subscriptions_are_inert_outside_browser() {
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let _local = BrowserSessionStore.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
    let counter = hits.clone();
    let _external = BrowserSessionStore.subscribe_external(Rc::new(move || counter.set(counter.get() + 1)));

    BrowserSessionStore.clear();
    assert_eq!(hits.get(), 0);
}

#[test]
fn event_names_match_browser_contract() {
    assert_eq!(AUTH_CHANGE_EVENT, "auth-change");
    assert_eq!(STORAGE_EVENT, "storage");
}
