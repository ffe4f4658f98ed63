//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `auth`, `attendance`) so pages and
//! components depend on small focused models that test without a browser.

pub mod attendance;
pub mod auth;
pub mod session;
