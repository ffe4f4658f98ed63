use super::*;

fn record(value: serde_json::Value) -> AttendanceRecord {
    serde_json::from_value(value).unwrap()
}

fn sample() -> AttendanceReport {
    AttendanceReport::from_records(&[
        record(serde_json::json!({
            "username": "21BD1A0501",
            "2024-03-02": true,
            "2024-03-01": true,
        })),
        record(serde_json::json!({
            "id": 7,
            "username": "21BD1A0502",
            "2024-03-01": false,
            "2024-03-03": true,
        })),
    ])
}

// =============================================================
// Pivot
// =============================================================

#[test]
fn dates_are_unique_and_sorted() {
    assert_eq!(sample().dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
}

#[test]
fn user_id_falls_back_to_username() {
    let report = sample();
    assert_eq!(report.users[0].id, "21BD1A0501");
    assert_eq!(report.users[1].id, "7");
    assert_eq!(report.users[1].username, "21BD1A0502");
}

#[test]
fn missing_date_has_no_status() {
    let report = sample();
    assert_eq!(report.users[0].status("2024-03-01"), Some(true));
    assert_eq!(report.users[0].status("2024-03-03"), None);
    assert_eq!(report.users[1].status("2024-03-01"), Some(false));
}

#[test]
fn duplicate_user_records_collapse_to_latest() {
    let report = AttendanceReport::from_records(&[
        record(serde_json::json!({ "username": "A", "2024-01-01": false })),
        record(serde_json::json!({ "username": "A", "2024-01-01": true })),
    ]);
    assert_eq!(report.users.len(), 1);
    assert_eq!(report.users[0].status("2024-01-01"), Some(true));
}

#[test]
fn null_cells_are_not_recorded() {
    let report = AttendanceReport::from_records(&[record(serde_json::json!({
        "username": "A",
        "2024-01-01": null,
    }))]);
    assert!(report.dates.is_empty());
}

// =============================================================
// Summary
// =============================================================

#[test]
fn summary_counts_recorded_cells_only() {
    let summary = sample().summary();
    assert_eq!(
        summary,
        AttendanceSummary { total_users: 2, total_days: 3, total_present: 3, attendance_rate: 75 }
    );
}

#[test]
fn summary_of_empty_report_has_zero_rate() {
    assert_eq!(AttendanceReport::default().summary(), AttendanceSummary::default());
}

#[test]
fn rate_rounds_to_nearest_percent() {
    let report = AttendanceReport::from_records(&[record(serde_json::json!({
        "username": "A",
        "d1": true,
        "d2": false,
        "d3": false,
    }))]);
    assert_eq!(report.summary().attendance_rate, 33);
}

// =============================================================
// Filtering
// =============================================================

#[test]
fn blank_filter_returns_everyone() {
    assert_eq!(sample().filter_users("   ").len(), 2);
}

#[test]
fn filter_matches_id_or_username_case_insensitively() {
    let report = sample();
    let by_name: Vec<_> = report.filter_users("bd1a0502").iter().map(|u| u.id.clone()).collect();
    assert_eq!(by_name, vec!["7"]);
    let by_id: Vec<_> = report.filter_users("7").iter().map(|u| u.username.clone()).collect();
    assert_eq!(by_id, vec!["21BD1A0502"]);
    assert!(report.filter_users("zzz").is_empty());
}

// =============================================================
// presence_counts
// =============================================================

#[test]
fn presence_counts_splits_present_and_absent() {
    let days: BTreeMap<String, bool> =
        [("a".to_owned(), true), ("b".to_owned(), false), ("c".to_owned(), true)].into_iter().collect();
    assert_eq!(presence_counts(&days), (2, 1));
    assert_eq!(presence_counts(&BTreeMap::new()), (0, 0));
}

#[test]
fn record_days_skips_identity_keys() {
    let days = record_days(&record(serde_json::json!({
        "id": "x",
        "username": "A",
        "2024-01-01": true,
        "2024-01-02": 0,
    })));
    let expected: BTreeMap<String, bool> =
        [("2024-01-01".to_owned(), true), ("2024-01-02".to_owned(), false)].into_iter().collect();
    assert_eq!(days, expected);
}

#[test]
fn status_label_covers_unrecorded_cells() {
    let report = sample();
    let second = &report.users[1];
    assert_eq!(status_label(second.status("2024-03-03")), "Present");
    assert_eq!(status_label(second.status("2024-03-01")), "Absent");
    assert_eq!(status_label(second.status("2024-03-02")), "-");
}
