//! services/api/src/web/listings.rs
//!
//! Public listing endpoints: browse with filters and compatibility ranking,
//! and a single listing's detail with its score for the current renter.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use coloc_core::domain::{Vibe, Villa, VillaStatus, Zone};
use coloc_core::ports::PortError;
use coloc_core::scoring::{self, CompatibilityScore, MatchCriteria, ScoredVilla, ScoringWeights};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::web::renter::read_context;
use crate::web::state::AppState;

/// Budget ceiling used when neither the query nor the renter context sets one.
pub const DEFAULT_MAX_BUDGET: u64 = 12_000_000;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Browse filters. `zone` and `vibe` accept any casing; an unknown value
/// (e.g. `all`) means no filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    pub zone: Option<String>,
    pub vibe: Option<String>,
    pub max_budget: Option<u64>,
    pub only_available: Option<bool>,
}

/// The filters as they were applied, after falling back to the renter context.
#[derive(Debug, Serialize)]
pub struct AppliedFilters {
    pub zone: Option<Zone>,
    pub vibe: Option<Vibe>,
    pub max_budget: u64,
    pub only_available: bool,
}

#[derive(Serialize)]
pub struct BrowseResponse {
    pub filters: AppliedFilters,
    pub villas: Vec<ScoredVilla>,
}

#[derive(Serialize)]
pub struct VillaDetailResponse {
    pub villa: Villa,
    pub compatibility: CompatibilityScore,
}

//=========================================================================================
// Filtering
//=========================================================================================

impl AppliedFilters {
    fn matches(&self, villa: &Villa) -> bool {
        self.zone.map_or(true, |zone| villa.zone == zone)
            && self.vibe.map_or(true, |vibe| villa.vibe == vibe)
            && villa.price_per_person <= self.max_budget
            && (!self.only_available || villa.available_slots > 0)
    }

    /// The selected filters double as the scoring criteria.
    fn criteria(&self) -> MatchCriteria {
        MatchCriteria {
            zones: self.zone.into_iter().collect(),
            vibe: self.vibe,
            budget: Some(self.max_budget),
        }
    }
}

/// Filters and ranks listings, best match first.
pub fn browse(villas: Vec<Villa>, filters: &AppliedFilters) -> Vec<ScoredVilla> {
    let matching = villas.into_iter().filter(|villa| filters.matches(villa));
    scoring::rank(&filters.criteria(), matching, &ScoringWeights::browse())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /villas - Browse published listings ranked by compatibility
#[utoipa::path(
    get,
    path = "/villas",
    params(BrowseQuery),
    responses(
        (status = 200, description = "Matching listings, best match first")
    )
)]
pub async fn browse_villas_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BrowseQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let preferences = read_context(&headers)
        .map(|context| context.preferences)
        .unwrap_or_default();

    let filters = AppliedFilters {
        zone: match query.zone {
            Some(zone) => Zone::parse(&zone),
            None => preferences.zones.first().copied(),
        },
        vibe: query.vibe.as_deref().and_then(Vibe::parse),
        max_budget: query
            .max_budget
            .or(preferences.budget)
            .unwrap_or(DEFAULT_MAX_BUDGET),
        only_available: query.only_available.unwrap_or(true),
    };

    let villas = state.db.list_validated_villas().await.map_err(|e| {
        error!("Failed to list published villas: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
    })?;

    let villas = browse(villas, &filters);
    Ok(Json(BrowseResponse { filters, villas }))
}

/// GET /villas/{id} - One published listing with the renter's compatibility
#[utoipa::path(
    get,
    path = "/villas/{id}",
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Listing detail"),
        (status = 404, description = "No such published villa")
    )
)]
pub async fn villa_detail_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(villa_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let villa = match state.db.get_villa(villa_id).await {
        Ok(villa) if villa.status == VillaStatus::Validated => villa,
        Ok(_) | Err(PortError::NotFound(_)) => {
            return Err((StatusCode::NOT_FOUND, "Villa not found.".to_string()))
        }
        Err(e) => {
            error!("Failed to load villa {}: {:?}", villa_id, e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string()));
        }
    };

    let preferences = read_context(&headers)
        .map(|context| context.preferences)
        .unwrap_or_default();
    let compatibility = scoring::score(
        &MatchCriteria::from(&preferences),
        &villa,
        &ScoringWeights::detail(),
    );

    Ok(Json(VillaDetailResponse {
        villa,
        compatibility,
    }))
}
