//! # client
//!
//! Leptos + WASM front end for the AttendEasy face-recognition attendance
//! system.
//!
//! This crate contains the session/authorization subsystem (browser-stored
//! session, expiry-driven auth gate, role-aware route guards), the navigation
//! shell, and the pages that talk to the external attendance API.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: wire logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
