//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification and the assembly of
//! the HTTP router.

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::web::{
    admin, auth, listings,
    middleware::{require_admin, require_owner},
    owner, renter,
    state::AppState,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::session_status_handler,
        owner::get_owner_handler,
        owner::update_profile_handler,
        owner::list_villas_handler,
        owner::create_villa_handler,
        owner::update_villa_handler,
        owner::delete_villa_handler,
        owner::update_owner_type_handler,
        owner::add_document_handler,
        owner::remove_document_handler,
        listings::browse_villas_handler,
        listings::villa_detail_handler,
        renter::get_context_handler,
        renter::update_preferences_handler,
        renter::create_booking_handler,
        admin::update_villa_status_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth::SessionStatusResponse,
            owner::VillaPayload,
            owner::OwnerTypeRequest,
            owner::DocumentRequest,
            owner::ProfileRequest,
            owner::DocumentsResponse,
            owner::OwnerTypeResponse,
            owner::OkResponse,
            renter::PreferencesRequest,
            renter::BookingRequest,
            admin::StatusRequest,
        )
    ),
    tags(
        (name = "Coloc Bali API", description = "Owner accounts, villa listings and renter matching.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds every API route on top of the shared state.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no owner session required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/session", get(auth::session_status_handler))
        .route("/villas", get(listings::browse_villas_handler))
        .route("/villas/{id}", get(listings::villa_detail_handler))
        .route("/renter/context", get(renter::get_context_handler))
        .route("/renter/preferences", patch(renter::update_preferences_handler))
        .route("/renter/bookings", post(renter::create_booking_handler));

    // Owner routes (session cookie required)
    let owner_routes = Router::new()
        .route("/owner/me", get(owner::get_owner_handler))
        .route("/owner/profile", post(owner::update_profile_handler))
        .route(
            "/owner/villas",
            get(owner::list_villas_handler).post(owner::create_villa_handler),
        )
        .route(
            "/owner/villas/{id}",
            patch(owner::update_villa_handler).delete(owner::delete_villa_handler),
        )
        .route(
            "/owner/villas/{id}/owner-type",
            patch(owner::update_owner_type_handler),
        )
        .route(
            "/owner/villas/{id}/documents",
            post(owner::add_document_handler).delete(owner::remove_document_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_owner,
        ));

    // Moderation routes (ADMIN_API_KEY required)
    let admin_routes = Router::new()
        .route(
            "/admin/villas/{id}/status",
            patch(admin::update_villa_status_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(owner_routes)
        .merge(admin_routes)
        .with_state(app_state)
}
