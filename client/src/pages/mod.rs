//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped data loading. Access control lives in the
//! router (`RequireAuth`), never in the pages themselves.

pub mod attendance;
pub mod home;
pub mod login;
pub mod user;
