//! services/api/src/web/renter.rs
//!
//! The renter context travels with the browser in the `renter_context`
//! cookie (base64url-encoded JSON). Handlers read it, merge changes into it
//! and write it back on the response; the server keeps no copy.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use coloc_core::domain::{Vibe, VillaStatus, Zone};
use coloc_core::ports::PortError;
use coloc_core::renter::{BookingDraft, PreferencesUpdate, RenterContext};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::session::find_cookie;
use crate::web::state::AppState;

pub const RENTER_CONTEXT_COOKIE: &str = "renter_context";

const RENTER_CONTEXT_TTL_SECS: i64 = 60 * 60 * 24 * 30;

//=========================================================================================
// Cookie Codec
//=========================================================================================

/// Reads the context from the request. A missing or unreadable cookie gives `None`.
/// The cookie is client-held, so the zone shortlist is re-checked on the way in.
pub fn read_context(headers: &HeaderMap) -> Option<RenterContext> {
    let raw = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|h| find_cookie(h, RENTER_CONTEXT_COOKIE))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|e| debug!("Unreadable renter context cookie: {}", e))
        .ok()?;
    let mut context: RenterContext = serde_json::from_slice(&bytes)
        .map_err(|e| debug!("Malformed renter context: {}", e))
        .ok()?;
    context.preferences.normalize();
    Some(context)
}

/// Reads the context, starting a fresh one when there is none.
pub fn context_or_new(headers: &HeaderMap) -> RenterContext {
    read_context(headers).unwrap_or_default()
}

/// Encodes the context into a `Set-Cookie` value.
pub fn context_cookie(context: &RenterContext, secure: bool) -> Result<String, serde_json::Error> {
    let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(context)?);
    let secure = if secure { "; Secure" } else { "" };
    Ok(format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        RENTER_CONTEXT_COOKIE, encoded, RENTER_CONTEXT_TTL_SECS, secure
    ))
}

fn respond_with_context(
    state: &AppState,
    status: StatusCode,
    context: RenterContext,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let cookie = context_cookie(&context, state.config.production).map_err(|e| {
        error!("Failed to encode renter context: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    })?;
    Ok((status, [(header::SET_COOKIE, cookie)], Json(context)))
}

//=========================================================================================
// Request Types
//=========================================================================================

/// Onboarding answers. Omitted fields keep their stored value; unknown zone
/// or vibe names are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreferencesRequest {
    pub zones: Option<Vec<String>>,
    pub budget: Option<u64>,
    pub vibe: Option<String>,
    pub lifestyle: Option<Vec<String>>,
    pub rhythm: Option<String>,
    pub arrival_date: Option<String>,
    pub duration: Option<String>,
}

impl From<PreferencesRequest> for PreferencesUpdate {
    fn from(req: PreferencesRequest) -> Self {
        Self {
            zones: req
                .zones
                .map(|zones| zones.iter().filter_map(|z| Zone::parse(z)).collect()),
            budget: req.budget,
            vibe: req.vibe.as_deref().and_then(Vibe::parse),
            lifestyle: req.lifestyle,
            rhythm: req.rhythm,
            arrival_date: req.arrival_date,
            duration: req.duration,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub villa_id: Uuid,
    pub arrival_date: Option<String>,
    #[serde(default)]
    pub accept_terms: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /renter/context - The renter's current preferences and booking
#[utoipa::path(
    get,
    path = "/renter/context",
    responses(
        (status = 200, description = "Current renter context")
    )
)]
pub async fn get_context_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    respond_with_context(&state, StatusCode::OK, context_or_new(&headers))
}

/// PATCH /renter/preferences - Merge onboarding answers into the context
#[utoipa::path(
    patch,
    path = "/renter/preferences",
    request_body = PreferencesRequest,
    responses(
        (status = 200, description = "Updated renter context")
    )
)]
pub async fn update_preferences_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<PreferencesRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut context = context_or_new(&headers);
    context.preferences.merge(req.into());
    respond_with_context(&state, StatusCode::OK, context)
}

/// POST /renter/bookings - Reserve a spot in a validated villa
#[utoipa::path(
    post,
    path = "/renter/bookings",
    request_body = BookingRequest,
    responses(
        (status = 201, description = "Booking stored in the renter context"),
        (status = 400, description = "Terms not accepted"),
        (status = 404, description = "No such published villa")
    )
)]
pub async fn create_booking_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BookingRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if !req.accept_terms {
        return Err((
            StatusCode::BAD_REQUEST,
            "The booking terms must be accepted.".to_string(),
        ));
    }

    let villa = match state.db.get_villa(req.villa_id).await {
        Ok(villa) if villa.status == VillaStatus::Validated => villa,
        Ok(_) | Err(PortError::NotFound(_)) => {
            return Err((StatusCode::NOT_FOUND, "Villa not found.".to_string()))
        }
        Err(e) => {
            error!("Failed to load villa for booking: {:?}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string()));
        }
    };

    let mut context = context_or_new(&headers);
    let arrival = req
        .arrival_date
        .or_else(|| context.preferences.arrival_date.clone());
    context.booking = Some(BookingDraft::for_villa(&villa, arrival.as_deref()));

    info!(renter_id = %context.renter_id, villa_id = %villa.id, "Booking recorded");
    respond_with_context(&state, StatusCode::CREATED, context)
}
