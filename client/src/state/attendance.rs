//! Attendance report model built from the API's per-user records.
//!
//! DESIGN
//! ======
//! Records arrive as loose JSON objects: `username`, an optional `id`, and one
//! key per date holding the presence flag. The report pivots them into a
//! user list and a sorted date axis so the table and the summary cards read
//! from the same model.

#[cfg(test)]
#[path = "attendance_test.rs"]
mod attendance_test;

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::net::types::AttendanceRecord;

const ID_KEY: &str = "id";
const USERNAME_KEY: &str = "username";

/// One row of the attendance table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceUser {
    pub id: String,
    pub username: String,
    /// Presence per date; dates without a value are absent from the map.
    pub days: BTreeMap<String, bool>,
}

impl AttendanceUser {
    pub fn status(&self, date: &str) -> Option<bool> {
        self.days.get(date).copied()
    }
}

/// Headline numbers shown above the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub total_users: usize,
    pub total_days: usize,
    pub total_present: usize,
    /// Rounded percentage of present marks over recorded cells.
    pub attendance_rate: u32,
}

/// Pivoted attendance data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendanceReport {
    pub users: Vec<AttendanceUser>,
    pub dates: Vec<String>,
}

impl AttendanceReport {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let mut users: Vec<AttendanceUser> = Vec::new();
        let mut dates = BTreeSet::new();

        for record in records {
            let username = record.0.get(USERNAME_KEY).map(scalar_text).unwrap_or_default();
            let id = record.0.get(ID_KEY).map(scalar_text).unwrap_or_else(|| username.clone());

            let days = record_days(record);
            dates.extend(days.keys().cloned());

            // Later records for the same user win, matching a keyed lookup.
            match users.iter_mut().find(|u| u.id == id) {
                Some(existing) => {
                    existing.username = username;
                    existing.days = days;
                }
                None => users.push(AttendanceUser { id, username, days }),
            }
        }

        Self { users, dates: dates.into_iter().collect() }
    }

    pub fn summary(&self) -> AttendanceSummary {
        let mut total_present = 0;
        let mut total_records = 0;
        for user in &self.users {
            for date in &self.dates {
                if let Some(present) = user.status(date) {
                    total_records += 1;
                    if present {
                        total_present += 1;
                    }
                }
            }
        }
        AttendanceSummary {
            total_users: self.users.len(),
            total_days: self.dates.len(),
            total_present,
            attendance_rate: rounded_percent(total_present, total_records),
        }
    }

    /// Users whose id or username contains `term`, ignoring case.
    pub fn filter_users(&self, term: &str) -> Vec<&AttendanceUser> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.users.iter().collect();
        }
        self.users
            .iter()
            .filter(|u| u.id.to_lowercase().contains(&term) || u.username.to_lowercase().contains(&term))
            .collect()
    }
}

/// Date -> presence entries of one record, skipping identity keys and nulls.
pub fn record_days(record: &AttendanceRecord) -> BTreeMap<String, bool> {
    record
        .0
        .iter()
        .filter(|(key, value)| key.as_str() != ID_KEY && key.as_str() != USERNAME_KEY && !value.is_null())
        .map(|(key, value)| (key.clone(), is_present(value)))
        .collect()
}

/// Present/absent counts for a single user's date map.
pub fn presence_counts(days: &BTreeMap<String, bool>) -> (usize, usize) {
    let present = days.values().filter(|p| **p).count();
    (present, days.len() - present)
}

/// Table cell text for a presence lookup.
pub fn status_label(status: Option<bool>) -> &'static str {
    match status {
        Some(true) => "Present",
        Some(false) => "Absent",
        None => "-",
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}
