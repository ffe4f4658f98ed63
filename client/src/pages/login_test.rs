use super::*;
use crate::state::session::Role;

fn response(name: &str, role: Option<&str>) -> LoginResponse {
    LoginResponse { name: name.to_owned(), role: role.map(str::to_owned), probability: Some(0.87) }
}

#[test]
fn normalize_roll_number_trims_and_uppercases() {
    assert_eq!(normalize_roll_number("  21bd1a0501 "), "21BD1A0501");
}

#[test]
fn validate_login_input_requires_roll_number_first() {
    assert_eq!(validate_login_input("   ", false), Err("Please enter your roll number."));
    assert_eq!(validate_login_input("", true), Err("Please enter your roll number."));
}

#[test]
fn validate_login_input_requires_image() {
    assert_eq!(validate_login_input("21bd1a0501", false), Err("Failed to capture image. Please try again."));
}

#[test]
fn validate_login_input_returns_normalized_roll() {
    assert_eq!(validate_login_input(" 21bd1a0501 ", true), Ok("21BD1A0501".to_owned()));
}

#[test]
fn login_outcome_rejects_unrecognised_faces() {
    assert_eq!(login_outcome(&response("Unknown", None), 10), Err("Face not recognized."));
    assert_eq!(login_outcome(&response("user not recognised", Some("admin")), 10), Err("Face not recognized."));
}

#[test]
fn login_outcome_stamps_session_with_now_and_role() {
    let session = login_outcome(&response("ADMIN01", Some("admin")), 1_700_000_000_000).unwrap();
    assert!(session.logged_in);
    assert_eq!(session.username, "ADMIN01");
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.login_at, 1_700_000_000_000);
}

#[test]
fn login_outcome_defaults_missing_role_to_user() {
    let session = login_outcome(&response("21BD1A0501", None), 5).unwrap();
    assert_eq!(session.role, Role::User);
}
