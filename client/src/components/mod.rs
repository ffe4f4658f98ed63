//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render app chrome around the routed pages, reading shared state
//! from Leptos context providers.

pub mod nav_bar;
