//! REST calls to the attendance API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `ApiError::Unavailable`, since the API is
//! only called from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as `ApiError`, whose `Display` text is what pages show
//! to the user. Error bodies of the form `{"error": ..}` / `{"message": ..}`
//! are surfaced verbatim.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;

use super::types::AttendanceRecord;
#[cfg(any(test, feature = "hydrate"))]
use super::types::ApiErrorBody;
use super::types::UsersResponse;
#[cfg(feature = "hydrate")]
use super::types::{AttendanceResponse, LoginResponse, RoleUpdate, StoredImageResponse};

/// Failure talking to the attendance API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Error: {0}")]
    Rejected(String),
    #[error("Error: Server error occurred (HTTP {0})")]
    Status(u16),
    #[error("No response from server. Please check your connection.")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Message the API put in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn user_path(roll_number: &str) -> String {
    format!("/users/{roll_number}")
}

#[cfg(any(test, feature = "hydrate"))]
fn user_role_path(roll_number: &str) -> String {
    format!("/users/{roll_number}/role")
}

#[cfg(any(test, feature = "hydrate"))]
fn user_images_path(username: &str) -> String {
    format!("/users/{username}/images")
}

#[cfg(any(test, feature = "hydrate"))]
fn user_attendance_path(username: &str) -> String {
    format!("/user_attendance/{username}")
}

/// Map a non-success response to an error, preferring the body's message.
#[cfg(any(test, feature = "hydrate"))]
fn error_from_response(status: u16, body: &str) -> ApiError {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.text().map(str::to_owned))
        .map_or(ApiError::Status(status), ApiError::Rejected)
}

#[cfg(feature = "hydrate")]
async fn read_json<T: serde::de::DeserializeOwned>(resp: gloo_net::http::Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let body = resp.text().await.unwrap_or_default();
        return Err(error_from_response(resp.status(), &body));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(feature = "hydrate")]
async fn expect_success(resp: gloo_net::http::Response) -> Result<(), ApiError> {
    if resp.ok() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(error_from_response(resp.status(), &body))
}

/// Verify a face capture against the roll number via `POST /login`.
///
/// # Errors
///
/// Returns an error if the request cannot be sent, the API rejects the
/// capture, or the response cannot be decoded.
#[cfg(feature = "hydrate")]
pub async fn login(roll_number: &str, image: &web_sys::Blob) -> Result<LoginResponse, ApiError> {
    let form = web_sys::FormData::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_blob_and_filename("image", image, "captured_image.jpg")
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_str("rollnumber", roll_number)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;

    let resp = gloo_net::http::Request::post(&crate::config::api_url("/login"))
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(resp).await
}

/// Fetch every attendance record via `GET /attendance`.
///
/// # Errors
///
/// Returns an error if the request fails or the payload is malformed.
pub async fn fetch_attendance() -> Result<Vec<AttendanceRecord>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&crate::config::api_url("/attendance"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: AttendanceResponse = read_json(resp).await?;
        Ok(body.attendance)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Fetch one user's date -> present map via `GET /user_attendance/{username}`.
///
/// # Errors
///
/// Returns an error if the request fails, the user has no records, or the
/// payload is malformed.
pub async fn fetch_user_attendance(username: &str) -> Result<BTreeMap<String, bool>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = crate::config::api_url(&user_attendance_path(username));
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let record: AttendanceRecord = read_json(resp).await?;
        Ok(crate::state::attendance::record_days(&record))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = username;
        Err(ApiError::Unavailable)
    }
}

/// Fetch the registered-user roster via `GET /get_users`.
///
/// # Errors
///
/// Returns an error if the request fails or the payload is malformed.
pub async fn fetch_users() -> Result<UsersResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&crate::config::api_url("/get_users"))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(ApiError::Unavailable)
    }
}

/// Promote a user to admin via `PATCH /users/{roll}/role`.
///
/// # Errors
///
/// Returns an error if the request fails or the API refuses the change.
#[cfg(feature = "hydrate")]
pub async fn promote_to_admin(roll_number: &str) -> Result<(), ApiError> {
    let body = RoleUpdate { role: crate::state::session::Role::Admin };
    let resp = gloo_net::http::Request::patch(&crate::config::api_url(&user_role_path(roll_number)))
        .json(&body)
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    expect_success(resp).await
}

/// Remove a user via `DELETE /users/{roll}`.
///
/// # Errors
///
/// Returns an error if the request fails or the API refuses the deletion.
#[cfg(feature = "hydrate")]
pub async fn delete_user(roll_number: &str) -> Result<(), ApiError> {
    let resp = gloo_net::http::Request::delete(&crate::config::api_url(&user_path(roll_number)))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    expect_success(resp).await
}

/// Fetch the base64 face image stored for `username` via
/// `GET /users/{username}/images`. `None` when the user has none.
///
/// # Errors
///
/// Returns an error if the request fails or the payload is malformed.
pub async fn fetch_stored_image(username: &str) -> Result<Option<String>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(&crate::config::api_url(&user_images_path(username)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body: StoredImageResponse = read_json(resp).await?;
        Ok(body.details.stored_image.filter(|img| !img.is_empty()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = username;
        Err(ApiError::Unavailable)
    }
}
