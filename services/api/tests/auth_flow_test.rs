//! Signup, login, and logout behavior against the in-memory store.

mod common;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use std::sync::Arc;

use api_lib::web::auth::{
    login_handler, logout_handler, signup_handler, LoginRequest, SignupRequest,
};
use common::{session_id_from_set_cookie, test_state, MemoryDb, StubFlashcardService};
use flashcard_core::ports::{DatabaseService, PortError};

fn signup_req(username: &str, password: &str) -> Json<SignupRequest> {
    Json(SignupRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn login_req(username: &str, password: &str) -> Json<LoginRequest> {
    Json(LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

#[tokio::test]
async fn duplicate_signup_is_rejected_regardless_of_password() {
    let state = test_state(
        Arc::new(MemoryDb::default()),
        Arc::new(StubFlashcardService::new("")),
    );

    let (status, body) = signup_handler(State(state.clone()), signup_req("alice", "pw-one"))
        .await
        .expect("first signup should succeed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "Signup successful!");

    let err = signup_handler(State(state), signup_req("alice", "different-pw"))
        .await
        .expect_err("second signup with the same username should fail");
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
    assert_eq!(err.1.error, "Username already exists");
}

#[tokio::test]
async fn signup_rejects_missing_fields() {
    let state = test_state(
        Arc::new(MemoryDb::default()),
        Arc::new(StubFlashcardService::new("")),
    );

    let err = signup_handler(State(state.clone()), signup_req("", "pw"))
        .await
        .expect_err("empty username should fail");
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
    assert_eq!(err.1.error, "Username and password are required");

    let err = signup_handler(State(state), signup_req("bob", ""))
        .await
        .expect_err("empty password should fail");
    assert_eq!(err.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_user_and_wrong_password_are_indistinguishable() {
    let state = test_state(
        Arc::new(MemoryDb::default()),
        Arc::new(StubFlashcardService::new("")),
    );
    signup_handler(State(state.clone()), signup_req("alice", "correct-pw"))
        .await
        .expect("signup should succeed");

    let wrong_password = login_handler(State(state.clone()), login_req("alice", "wrong-pw"))
        .await
        .expect_err("wrong password should fail");
    let unknown_user = login_handler(State(state), login_req("nobody", "correct-pw"))
        .await
        .expect_err("unknown username should fail");

    // No distinguishing signal between the two failure modes.
    assert_eq!(wrong_password.0, unknown_user.0);
    assert_eq!(wrong_password.1.error, unknown_user.1.error);
    assert_eq!(wrong_password.1.error, "Invalid credentials");
}

#[tokio::test]
async fn login_establishes_a_session_and_logout_ends_it() {
    let db = Arc::new(MemoryDb::default());
    let state = test_state(db.clone(), Arc::new(StubFlashcardService::new("")));

    signup_handler(State(state.clone()), signup_req("alice", "pw"))
        .await
        .expect("signup should succeed");

    let (status, cookies, body) = login_handler(State(state.clone()), login_req("alice", "pw"))
        .await
        .expect("login should succeed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "Login successful!");

    let session_id = session_id_from_set_cookie(&cookies[0].1);
    let user_id = db
        .validate_auth_session(&session_id)
        .await
        .expect("fresh session should resolve");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        format!("session={}", session_id).parse().unwrap(),
    );
    let (status, _, body) = logout_handler(State(state), headers)
        .await
        .expect("logout should succeed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.message, "Logged out successfully!");

    // Subsequent resolution of the same token must fail.
    let err = db
        .validate_auth_session(&session_id)
        .await
        .expect_err("session should be gone after logout");
    assert!(matches!(err, PortError::Unauthorized));

    // The user record itself is untouched.
    let creds = db
        .get_user_by_username("alice")
        .await
        .expect("user should still exist");
    assert_eq!(creds.user_id, user_id);
}

#[tokio::test]
async fn logout_without_a_cookie_is_unauthorized() {
    let state = test_state(
        Arc::new(MemoryDb::default()),
        Arc::new(StubFlashcardService::new("")),
    );

    let err = logout_handler(State(state), HeaderMap::new())
        .await
        .expect_err("logout without a session should fail");
    assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    assert_eq!(err.1.error, "No session found");
}
