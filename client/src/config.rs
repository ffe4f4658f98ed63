//! Build-time client configuration.
//!
//! The attendance API base URL is baked into the WASM bundle from
//! `ATTENDEASY_API_URL` at compile time, falling back to the API's local
//! development address.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Base URL of the attendance API, without a trailing slash.
pub fn api_base_url() -> String {
    normalize_base_url(option_env!("ATTENDEASY_API_URL"))
}

fn normalize_base_url(raw: Option<&str>) -> String {
    let url = raw.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(DEFAULT_API_URL);
    url.trim_end_matches('/').to_owned()
}

/// Absolute URL for an API path such as `/login`.
pub fn api_url(path: &str) -> String {
    join_url(&api_base_url(), path)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{base}/{}", path.trim_start_matches('/'))
}
