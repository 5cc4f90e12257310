//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for owner registration, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use coloc_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub owner_id: Uuid,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub owner_id: Option<Uuid>,
}

//=========================================================================================
// Password Hashing
//=========================================================================================

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!("Failed to parse password hash: {:?}", e);
            false
        }
    }
}

/// Returns the trimmed value, or `None` when absent or blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new owner account and open a session
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Owner created and logged in", body = AuthResponse),
        (status = 400, description = "Missing fields or email already used"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (Some(name), Some(email), Some(password)) = (
        required(req.name),
        required(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err((StatusCode::BAD_REQUEST, "Missing required fields.".to_string()));
    };

    // 1. Hash the password
    let password_hash = hash_password(&password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    })?;

    // 2. Create the owner
    let owner = state
        .db
        .create_owner(&name, &email, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => (
                StatusCode::BAD_REQUEST,
                "This email is already in use.".to_string(),
            ),
            other => {
                error!("Failed to create owner: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
            }
        })?;

    // 3. Open the session
    let cookie = state.sessions.issue_session(owner.id).map_err(|e| {
        error!("Failed to issue session: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    })?;

    info!(owner_id = %owner.id, "Owner registered");

    let response = AuthResponse {
        owner_id: owner.id.as_uuid(),
        email: owner.email,
    };
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with an existing owner account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (Some(email), Some(password)) = (
        required(req.email),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and password are required.".to_string(),
        ));
    };
    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string());

    // 1. Get owner by email
    let credentials = state
        .db
        .get_owner_credentials_by_email(&email)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => invalid(),
            other => {
                error!("Failed to look up owner: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
            }
        })?;

    // 2. Verify password
    if !verify_password(&password, &credentials.password_hash) {
        return Err(invalid());
    }

    // 3. Open the session
    let cookie = state.sessions.issue_session(credentials.id).map_err(|e| {
        error!("Failed to issue session: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    })?;

    let response = AuthResponse {
        owner_id: credentials.id.as_uuid(),
        email: credentials.email,
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Clear the owner session cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.sessions.clear_session())],
    )
}

/// GET /auth/session - Report who the cookie belongs to, without touching it
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session status", body = SessionStatusResponse)
    )
)]
pub async fn session_status_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse> {
    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    let owner_id = state.sessions.resolve_cookie_header(cookie_header);
    Json(SessionStatusResponse {
        authenticated: owner_id.is_some(),
        owner_id: owner_id.map(|id| id.as_uuid()),
    })
}
