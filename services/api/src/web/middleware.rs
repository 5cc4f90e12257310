//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting owner and moderation routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::web::session::SessionResolution;
use crate::web::state::AppState;

/// Middleware that verifies the owner session cookie.
///
/// If valid, inserts the `OwnerId` into request extensions for handlers to use.
/// If missing, returns 401. If present but invalid (expired, tampered, signed
/// with another secret), returns 401 and clears the cookie.
pub async fn require_owner(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    match state.sessions.resolve(req.headers()) {
        SessionResolution::Authenticated(owner_id) => {
            req.extensions_mut().insert(owner_id);
            next.run(req).await
        }
        SessionResolution::Missing => {
            (StatusCode::UNAUTHORIZED, "Not authenticated.").into_response()
        }
        SessionResolution::Invalid => {
            warn!("Clearing invalid owner session cookie");
            (
                StatusCode::UNAUTHORIZED,
                [(header::SET_COOKIE, state.sessions.clear_session())],
                "Not authenticated.",
            )
                .into_response()
        }
    }
}

/// Header carrying the moderation key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Middleware that guards the moderation routes with `ADMIN_API_KEY`.
///
/// A wrong or missing key returns 401. When no key is configured, every
/// request is refused with 403.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.admin_api_key.as_deref() else {
        warn!("Moderation route called but ADMIN_API_KEY is not set");
        return (StatusCode::FORBIDDEN, "Moderation is disabled.").into_response();
    };

    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        warn!("Rejected moderation request with a bad key");
        return (StatusCode::UNAUTHORIZED, "Not authorized.").into_response();
    }

    next.run(req).await
}
