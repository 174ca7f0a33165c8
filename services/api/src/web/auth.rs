//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{failure, ApiFailure};
use crate::web::middleware::session_id_from_cookies;
use crate::web::state::AppState;
use flashcard_core::ports::PortError;

/// Browser sessions live this long; the expiry is fixed at creation.
const SESSION_TTL_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn session_cookie(session_id: &str, max_age_seconds: i64) -> String {
    format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        session_id, max_age_seconds
    )
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /signup - Create a new user account
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created successfully", body = MessageResponse),
        (status = 400, description = "Missing fields or duplicate username", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiFailure> {
    // 1. Validate the request
    if req.username.is_empty() || req.password.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    // 2. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    // 3. Create user in database; the store's unique constraint decides duplicates
    state
        .db
        .create_user(&req.username, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => {
                failure(StatusCode::BAD_REQUEST, "Username already exists")
            }
            _ => {
                error!("Failed to create user: {:?}", e);
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
            }
        })?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Signup successful!".to_string(),
        }),
    ))
}

/// POST /login - Login with existing account
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = MessageResponse),
        (status = 400, description = "Missing fields or invalid credentials", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<MessageResponse>), ApiFailure> {
    // 1. Validate the request
    if req.username.is_empty() || req.password.is_empty() {
        return Err(failure(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    // 2. Look the user up. An unknown username answers with the same generic
    //    failure as a wrong password.
    let user_creds = state
        .db
        .get_user_by_username(&req.username)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => failure(StatusCode::BAD_REQUEST, "Invalid credentials"),
            _ => {
                error!("Failed to get user: {:?}", e);
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get user")
            }
        })?;

    // 3. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(failure(StatusCode::BAD_REQUEST, "Invalid credentials"));
    }

    // 4. Generate auth session ID and expiration
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    // 5. Create auth session in database
    state
        .db
        .create_auth_session(&auth_session_id, user_creds.user_id, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
        })?;

    // 6. Return response with session cookie
    let cookie = session_cookie(
        &auth_session_id,
        Duration::days(SESSION_TTL_DAYS).num_seconds(),
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Login successful!".to_string(),
        }),
    ))
}

/// GET /logout - End the current session
#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 200, description = "Session ended, cookie cleared", body = MessageResponse),
        (status = 401, description = "No active session", body = crate::error::ErrorBody)
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<MessageResponse>), ApiFailure> {
    // 1. Extract session cookie
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "No session found"))?;

    // 2. Parse session ID from cookie
    let auth_session_id = session_id_from_cookies(cookie_header)
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "No session found"))?;

    // 3. Delete auth session from database
    state
        .db
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout")
        })?;

    // 4. Clear cookie
    let cookie = session_cookie("", 0);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: "Logged out successfully!".to_string(),
        }),
    ))
}
