//! Networking modules for the attendance REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the HTTP calls and `types` defines the wire schema they
//! decode into.

pub mod api;
pub mod types;
