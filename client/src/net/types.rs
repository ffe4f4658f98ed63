//! Wire types for the attendance API.
//!
//! DESIGN
//! ======
//! Only the fields this front end reads are modelled; everything else in the
//! API's JSON is ignored so server-side additions never break decoding.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::state::session::Role;

/// Names the API returns when a face could not be matched.
const UNRECOGNISED_NAMES: [&str; 2] = ["Unknown", "user not recognised"];

/// Successful `POST /login` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Roll number of the recognised principal.
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub probability: Option<f64>,
}

impl LoginResponse {
    pub fn is_recognised(&self) -> bool {
        !UNRECOGNISED_NAMES.contains(&self.name.as_str())
    }

    /// Role from the payload, `user` when absent.
    pub fn role(&self) -> Role {
        self.role.as_deref().map_or(Role::User, Role::parse)
    }
}

/// Error body shape used by every API endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref()).filter(|s| !s.is_empty())
    }
}

/// One document of the attendance collection, kept as a raw JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceRecord(pub serde_json::Map<String, serde_json::Value>);

/// `GET /attendance` payload.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AttendanceResponse {
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

/// One registered user as listed by `GET /get_users`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ManagedUser {
    #[serde(rename = "rollNumber", default)]
    pub roll_number: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ManagedUser {
    pub fn role(&self) -> Role {
        self.role.as_deref().map_or(Role::User, Role::parse)
    }
}

/// `GET /get_users` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<ManagedUser>,
    #[serde(default)]
    pub count: usize,
}

/// `PATCH /users/{roll}/role` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StoredImageDetails {
    /// Base64-encoded JPEG.
    #[serde(default)]
    pub stored_image: Option<String>,
}

/// `GET /users/{username}/images` payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StoredImageResponse {
    #[serde(default)]
    pub details: StoredImageDetails,
}
