//! services/api/src/web/owner.rs
//!
//! Owner-only endpoints: account lookup, profile completion and villa
//! management. Every handler here sits behind `require_owner`, which provides
//! the `OwnerId`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use coloc_core::domain::{
    NewVilla, Owner, OwnerId, OwnerProfile, OwnerType, ValidationError, Vibe, Villa, VillaPatch,
    Zone,
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

/// Villa fields as sent by the owner forms. Used for both create (where most
/// fields are required) and partial update.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VillaPayload {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub owner_type: Option<String>,
    pub full_address: Option<String>,
    pub bedrooms: Option<u32>,
    pub total_capacity: Option<u32>,
    pub available_slots: Option<u32>,
    pub total_price: Option<u64>,
    pub price_per_person: Option<u64>,
    pub vibe: Option<String>,
    pub description: Option<String>,
    pub photos: Option<Vec<String>>,
    pub documents: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct OwnerTypeRequest {
    pub owner_type: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DocumentRequest {
    pub document_url: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub personal_address: Option<String>,
    pub national_id_url: Option<String>,
}

#[derive(Serialize)]
pub struct OwnerResponse {
    pub owner: Owner,
}

#[derive(Serialize)]
pub struct VillaResponse {
    pub villa: Villa,
}

#[derive(Serialize)]
pub struct VillaListResponse {
    pub villas: Vec<Villa>,
}

#[derive(Serialize, ToSchema)]
pub struct DocumentsResponse {
    pub documents: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OwnerTypeResponse {
    pub owner_type: String,
}

#[derive(Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

//=========================================================================================
// Payload Conversion
//=========================================================================================

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl VillaPayload {
    /// Builds a new listing. Unknown zones fall back to `Other`, unknown vibes
    /// to `Mix`, unknown owner types to `Owner`.
    pub fn into_new_villa(self, owner_id: OwnerId) -> Result<NewVilla, ValidationError> {
        use ValidationError::MissingField;

        let name = present(self.name).ok_or(MissingField("name"))?;
        let zone = present(self.zone).ok_or(MissingField("zone"))?;
        let owner_type = present(self.owner_type).ok_or(MissingField("owner_type"))?;
        let full_address = present(self.full_address).ok_or(MissingField("full_address"))?;
        let bedrooms = self.bedrooms.ok_or(MissingField("bedrooms"))?;
        let total_capacity = self.total_capacity.ok_or(MissingField("total_capacity"))?;
        let total_price = self.total_price.ok_or(MissingField("total_price"))?;
        let price_per_person = self.price_per_person.ok_or(MissingField("price_per_person"))?;
        let vibe = present(self.vibe).ok_or(MissingField("vibe"))?;
        let description = present(self.description).ok_or(MissingField("description"))?;
        let photos = self.photos.ok_or(MissingField("photos"))?;

        let villa = NewVilla {
            owner_id,
            name,
            zone: Zone::parse(&zone).unwrap_or(Zone::Other),
            owner_type: OwnerType::parse(&owner_type).unwrap_or_default(),
            full_address,
            bedrooms,
            total_capacity,
            available_slots: self.available_slots.unwrap_or(total_capacity),
            total_price,
            price_per_person,
            vibe: Vibe::parse(&vibe).unwrap_or(Vibe::Mix),
            description,
            photos,
            documents: self.documents.unwrap_or_default(),
        };
        villa.validate()?;
        Ok(villa)
    }

    /// Builds a partial update. Unknown enum values keep the current value.
    pub fn into_patch(self) -> VillaPatch {
        VillaPatch {
            name: self.name,
            zone: self.zone.as_deref().and_then(Zone::parse),
            owner_type: self.owner_type.as_deref().and_then(OwnerType::parse),
            full_address: self.full_address,
            bedrooms: self.bedrooms,
            total_capacity: self.total_capacity,
            available_slots: self.available_slots,
            total_price: self.total_price,
            price_per_person: self.price_per_person,
            vibe: self.vibe.as_deref().and_then(Vibe::parse),
            description: self.description,
            photos: self.photos,
            documents: self.documents,
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

fn server_error(context: &str, e: PortError) -> (StatusCode, String) {
    error!("{}: {:?}", context, e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error.".to_string())
}

fn villa_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Villa not found.".to_string())
}

/// Loads a villa, reporting someone else's listing as not found.
async fn load_owned_villa(
    state: &AppState,
    owner_id: OwnerId,
    villa_id: Uuid,
) -> Result<Villa, (StatusCode, String)> {
    match state.db.get_villa(villa_id).await {
        Ok(villa) if villa.is_owned_by(owner_id) => Ok(villa),
        Ok(_) | Err(PortError::NotFound(_)) => Err(villa_not_found()),
        Err(e) => Err(server_error("Failed to load villa", e)),
    }
}

async fn save(state: &AppState, villa: &Villa) -> Result<Villa, (StatusCode, String)> {
    state
        .db
        .save_villa(villa)
        .await
        .map_err(|e| server_error("Failed to save villa", e))
}

//=========================================================================================
// Profile
//=========================================================================================

/// GET /owner/me - The authenticated owner's account, including whether the
/// identity profile has been completed
#[utoipa::path(
    get,
    path = "/owner/me",
    responses(
        (status = 200, description = "Owner account"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    )
)]
pub async fn get_owner_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.db.get_owner(owner_id).await {
        Ok(owner) => Ok(Json(OwnerResponse { owner })),
        Err(PortError::NotFound(_)) => {
            Err((StatusCode::NOT_FOUND, "Owner not found.".to_string()))
        }
        Err(e) => Err(server_error("Failed to load owner", e)),
    }
}

/// POST /owner/profile - Complete the owner's identity profile
#[utoipa::path(
    post,
    path = "/owner/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = OkResponse),
        (status = 400, description = "A field is missing"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Json(req): Json<ProfileRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (Some(first_name), Some(last_name), Some(personal_address), Some(national_id_url)) = (
        present(req.first_name),
        present(req.last_name),
        present(req.personal_address),
        present(req.national_id_url),
    ) else {
        return Err((StatusCode::BAD_REQUEST, "All fields are required.".to_string()));
    };

    let profile = OwnerProfile {
        first_name,
        last_name,
        personal_address,
        national_id_url,
    };
    state
        .db
        .update_owner_profile(owner_id, &profile)
        .await
        .map_err(|e| server_error("Failed to update owner profile", e))?;

    Ok(Json(OkResponse { ok: true }))
}

//=========================================================================================
// Villas
//=========================================================================================

/// GET /owner/villas - The authenticated owner's listings, newest first
#[utoipa::path(
    get,
    path = "/owner/villas",
    responses(
        (status = 200, description = "Owner listings"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_villas_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let villas = state
        .db
        .list_villas_by_owner(owner_id)
        .await
        .map_err(|e| server_error("Failed to list villas", e))?;
    Ok(Json(VillaListResponse { villas }))
}

/// POST /owner/villas - Create a listing (starts out pending review)
#[utoipa::path(
    post,
    path = "/owner/villas",
    request_body = VillaPayload,
    responses(
        (status = 201, description = "Listing created"),
        (status = 400, description = "A required field is missing or slots exceed capacity"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_villa_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Json(payload): Json<VillaPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let new_villa = payload
        .into_new_villa(owner_id)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let villa = state
        .db
        .create_villa(new_villa)
        .await
        .map_err(|e| server_error("Failed to create villa", e))?;

    info!(villa_id = %villa.id, owner_id = %owner_id, "Villa created");
    Ok((StatusCode::CREATED, Json(VillaResponse { villa })))
}

/// PATCH /owner/villas/{id} - Partially update a listing
#[utoipa::path(
    patch,
    path = "/owner/villas/{id}",
    request_body = VillaPayload,
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Listing updated"),
        (status = 400, description = "Slots exceed capacity"),
        (status = 404, description = "No such villa for this owner")
    )
)]
pub async fn update_villa_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Path(villa_id): Path<Uuid>,
    Json(payload): Json<VillaPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut villa = load_owned_villa(&state, owner_id, villa_id).await?;
    payload
        .into_patch()
        .apply(&mut villa)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let villa = save(&state, &villa).await?;
    Ok(Json(VillaResponse { villa }))
}

/// DELETE /owner/villas/{id} - Remove a listing
#[utoipa::path(
    delete,
    path = "/owner/villas/{id}",
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Listing deleted", body = OkResponse),
        (status = 404, description = "No such villa for this owner")
    )
)]
pub async fn delete_villa_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Path(villa_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let villa = load_owned_villa(&state, owner_id, villa_id).await?;
    state
        .db
        .delete_villa(villa.id)
        .await
        .map_err(|e| server_error("Failed to delete villa", e))?;

    info!(villa_id = %villa.id, "Villa deleted");
    Ok(Json(OkResponse { ok: true }))
}

/// PATCH /owner/villas/{id}/owner-type - Change who the lister is to the property
#[utoipa::path(
    patch,
    path = "/owner/villas/{id}/owner-type",
    request_body = OwnerTypeRequest,
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Owner type updated", body = OwnerTypeResponse),
        (status = 400, description = "Missing or unknown owner_type"),
        (status = 404, description = "No such villa for this owner")
    )
)]
pub async fn update_owner_type_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Path(villa_id): Path<Uuid>,
    Json(req): Json<OwnerTypeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let raw = present(req.owner_type)
        .ok_or((StatusCode::BAD_REQUEST, "owner_type is required.".to_string()))?;
    let owner_type = OwnerType::parse(&raw).ok_or((
        StatusCode::BAD_REQUEST,
        format!("Unknown owner_type '{}'.", raw),
    ))?;

    let mut villa = load_owned_villa(&state, owner_id, villa_id).await?;
    villa.owner_type = owner_type;
    let villa = save(&state, &villa).await?;

    Ok(Json(OwnerTypeResponse {
        owner_type: villa.owner_type.as_str().to_string(),
    }))
}

/// POST /owner/villas/{id}/documents - Attach an uploaded document URL
#[utoipa::path(
    post,
    path = "/owner/villas/{id}/documents",
    request_body = DocumentRequest,
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Updated document list", body = DocumentsResponse),
        (status = 400, description = "Missing document_url"),
        (status = 404, description = "No such villa for this owner")
    )
)]
pub async fn add_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Path(villa_id): Path<Uuid>,
    Json(req): Json<DocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut villa = load_owned_villa(&state, owner_id, villa_id).await?;
    let url = present(req.document_url)
        .ok_or((StatusCode::BAD_REQUEST, "document_url is required.".to_string()))?;

    villa.add_document(url);
    let villa = save(&state, &villa).await?;
    Ok(Json(DocumentsResponse {
        documents: villa.documents,
    }))
}

/// DELETE /owner/villas/{id}/documents - Detach a document URL
#[utoipa::path(
    delete,
    path = "/owner/villas/{id}/documents",
    request_body = DocumentRequest,
    params(("id" = Uuid, Path, description = "Villa id")),
    responses(
        (status = 200, description = "Updated document list", body = DocumentsResponse),
        (status = 400, description = "Missing document_url"),
        (status = 404, description = "No such villa for this owner")
    )
)]
pub async fn remove_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(owner_id): Extension<OwnerId>,
    Path(villa_id): Path<Uuid>,
    Json(req): Json<DocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut villa = load_owned_villa(&state, owner_id, villa_id).await?;
    let url = present(req.document_url)
        .ok_or((StatusCode::BAD_REQUEST, "document_url is required.".to_string()))?;

    villa.remove_document(&url);
    let villa = save(&state, &villa).await?;
    Ok(Json(DocumentsResponse {
        documents: villa.documents,
    }))
}
