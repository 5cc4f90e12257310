//! services/api/src/web/admin.rs
//!
//! Moderation endpoints. A listing only reaches renters once it is moved from
//! pending review to validated here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use coloc_core::domain::VillaStatus;
use coloc_core::ports::PortError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::owner::VillaResponse;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct StatusRequest {
    /// `pending` or `validated`, any casing.
    pub status: Option<String>,
}

/// PATCH /admin/villas/{id}/status - Publish or unpublish a listing
#[utoipa::path(
    patch,
    path = "/admin/villas/{id}/status",
    request_body = StatusRequest,
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Missing or unknown status"),
        (status = 401, description = "Bad moderation key"),
        (status = 403, description = "Moderation disabled"),
        (status = 404, description = "No such villa")
    )
)]
pub async fn update_villa_status_handler(
    State(state): State<Arc<AppState>>,
    Path(villa_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let status = req
        .status
        .as_deref()
        .and_then(VillaStatus::parse)
        .ok_or((
            StatusCode::BAD_REQUEST,
            "status must be pending or validated.".to_string(),
        ))?;

    let server_error = |e: PortError| {
        error!("Failed to change villa status: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    };
    let not_found = || (StatusCode::NOT_FOUND, "Villa not found.".to_string());

    // 1. Record the new status
    match state.db.set_villa_status(villa_id, status).await {
        Ok(()) => {}
        Err(PortError::NotFound(_)) => return Err(not_found()),
        Err(e) => return Err(server_error(e)),
    }

    // 2. Return the listing as renters will now see it
    let villa = match state.db.get_villa(villa_id).await {
        Ok(villa) => villa,
        Err(PortError::NotFound(_)) => return Err(not_found()),
        Err(e) => return Err(server_error(e)),
    };

    info!(villa_id = %villa.id, status = villa.status.as_str(), "Villa status changed");
    Ok(Json(VillaResponse { villa }))
}
