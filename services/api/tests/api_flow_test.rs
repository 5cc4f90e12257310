//! Integration tests driving the full router against the in-memory store.

use api_lib::adapters::InMemoryDb;
use api_lib::config::Config;
use api_lib::web::session::SessionAuthenticator;
use api_lib::web::{api_router, state::AppState};
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use coloc_core::domain::{OwnerId, VillaStatus};
use coloc_core::ports::DatabaseService;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret";
const ADMIN_KEY: &str = "integration-admin-key";

fn setup_with(config: Config) -> (Router, Arc<InMemoryDb>) {
    let db = Arc::new(InMemoryDb::new());
    let state = AppState::new(db.clone(), Arc::new(config)).unwrap();
    (api_router(Arc::new(state)), db)
}

fn setup() -> (Router, Arc<InMemoryDb>) {
    setup_with(Config::for_tests(SECRET))
}

fn setup_with_moderation() -> (Router, Arc<InMemoryDb>) {
    let mut config = Config::for_tests(SECRET);
    config.admin_api_key = Some(ADMIN_KEY.to_string());
    setup_with(config)
}

fn moderation_request(villa_id: Uuid, status: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PATCH")
        .uri(format!("/admin/villas/{}/status", villa_id))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("x-admin-key", key);
    }
    builder
        .body(Body::from(json!({ "status": status }).to_string()))
        .unwrap()
}

fn request(method: &str, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string())
}

/// `name=value` part of a `Set-Cookie` header, ready to send back.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

async fn register(app: &Router, email: &str) -> String {
    let response = send(
        app,
        request(
            "POST",
            "/auth/register",
            Some(json!({ "name": "Made", "email": email, "password": "s3cret-pass" })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    cookie_pair(&set_cookie(&response).unwrap())
}

fn villa_body(name: &str, zone: &str, vibe: &str, price: u64, available: u32) -> Value {
    json!({
        "name": name,
        "zone": zone,
        "owner_type": "proprietaire",
        "full_address": "Jl. Batu Mejan",
        "bedrooms": 4,
        "total_capacity": 4,
        "available_slots": available,
        "total_price": price * 4,
        "price_per_person": price,
        "vibe": vibe,
        "description": "Co-living with pool",
        "photos": ["https://cdn.example/villa.jpg"]
    })
}

async fn create_villa(app: &Router, cookie: &str, body: Value) -> Uuid {
    let response = send(app, request("POST", "/owner/villas", Some(body), Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["villa"]["id"].as_str().unwrap().parse().unwrap()
}

//=========================================================================================
// Owner sessions
//=========================================================================================

#[tokio::test]
async fn register_login_logout_round_trip() {
    let (app, _db) = setup();
    let cookie = register(&app, "made@example.com").await;
    assert!(cookie.starts_with("owner_session="));

    let response = send(&app, request("GET", "/owner/villas", None, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["villas"], json!([]));

    let response = send(&app, request("POST", "/auth/logout", None, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response).unwrap();
    assert!(cleared.contains("Max-Age=0"));

    // The browser now sends the cleared cookie back.
    let response = send(
        &app,
        request("GET", "/owner/villas", None, Some(&cookie_pair(&cleared))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "made@example.com", "password": "wrong" })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());

    let response = send(
        &app,
        request(
            "POST",
            "/auth/login",
            Some(json!({ "email": "made@example.com", "password": "s3cret-pass" })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = cookie_pair(&set_cookie(&response).unwrap());
    let response = send(&app, request("GET", "/owner/villas", None, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn registration_validates_input() {
    let (app, _db) = setup();
    register(&app, "ketut@example.com").await;

    let response = send(
        &app,
        request(
            "POST",
            "/auth/register",
            Some(json!({ "name": "Ketut", "email": "ketut@example.com", "password": "x" })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request(
            "POST",
            "/auth/register",
            Some(json!({ "email": "new@example.com", "password": "x" })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request("POST", "/auth/login", Some(json!({ "email": "ketut@example.com" })), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_session_is_rejected_without_touching_cookies() {
    let (app, _db) = setup();
    let response = send(&app, request("GET", "/owner/villas", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn broken_session_cookie_is_cleared() {
    let (app, _db) = setup();

    let foreign = SessionAuthenticator::new("some-other-secret", false)
        .issue_token(OwnerId::new())
        .unwrap();
    for cookie in [
        "owner_session=garbage".to_string(),
        format!("owner_session={}", foreign),
    ] {
        let response = send(&app, request("GET", "/owner/villas", None, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let cleared = set_cookie(&response).expect("invalid cookie should be cleared");
        assert!(cleared.starts_with("owner_session=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn session_status_reads_without_side_effects() {
    let (app, _db) = setup();
    let cookie = register(&app, "wayan@example.com").await;

    let response = send(&app, request("GET", "/auth/session", None, Some(&cookie))).await;
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], json!(true));
    assert!(json["owner_id"].is_string());

    let response = send(
        &app,
        request("GET", "/auth/session", None, Some("owner_session=garbage")),
    )
    .await;
    assert!(set_cookie(&response).is_none());
    let json = body_json(response).await;
    assert_eq!(json["authenticated"], json!(false));
    assert_eq!(json["owner_id"], Value::Null);
}

//=========================================================================================
// Owner villa management
//=========================================================================================

#[tokio::test]
async fn owner_manages_a_villa() {
    let (app, db) = setup();
    let cookie = register(&app, "nyoman@example.com").await;

    let mut incomplete = villa_body("Villa Padi", "canggu", "work", 6_000_000, 3);
    incomplete.as_object_mut().unwrap().remove("zone");
    let response = send(
        &app,
        request("POST", "/owner/villas", Some(incomplete), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing field zone.");

    let too_many_slots = villa_body("Villa Padi", "canggu", "work", 6_000_000, 5);
    let response = send(
        &app,
        request("POST", "/owner/villas", Some(too_many_slots), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let villa_id = create_villa(
        &app,
        &cookie,
        villa_body("Villa Padi", "canggu", "work", 6_000_000, 3),
    )
    .await;
    let stored = db.get_villa(villa_id).await.unwrap();
    assert_eq!(stored.status, VillaStatus::Pending);

    let response = send(
        &app,
        request(
            "PATCH",
            &format!("/owner/villas/{}", villa_id),
            Some(json!({ "name": "Villa Padi Baru", "zone": "Atlantis", "vibe": "chill" })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["villa"]["name"], json!("Villa Padi Baru"));
    assert_eq!(json["villa"]["zone"], json!("Canggu"));
    assert_eq!(json["villa"]["vibe"], json!("Chill"));

    let response = send(
        &app,
        request(
            "PATCH",
            &format!("/owner/villas/{}/owner-type", villa_id),
            Some(json!({ "owner_type": "gestionnaire" })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(body_json(response).await["owner_type"], json!("manager"));

    let documents_uri = format!("/owner/villas/{}/documents", villa_id);
    for url in ["https://files.example/lease.pdf", "https://files.example/permit.pdf"] {
        let response = send(
            &app,
            request("POST", &documents_uri, Some(json!({ "document_url": url })), Some(&cookie)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = send(
        &app,
        request(
            "DELETE",
            &documents_uri,
            Some(json!({ "document_url": "https://files.example/lease.pdf" })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(
        body_json(response).await["documents"],
        json!(["https://files.example/permit.pdf"])
    );

    let response = send(
        &app,
        request("POST", &documents_uri, Some(json!({})), Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request("DELETE", &format!("/owner/villas/{}", villa_id), None, Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, request("GET", "/owner/villas", None, Some(&cookie))).await;
    assert_eq!(body_json(response).await["villas"], json!([]));
}

#[tokio::test]
async fn owners_cannot_touch_each_others_villas() {
    let (app, _db) = setup();
    let alice = register(&app, "alice@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let villa_id = create_villa(
        &app,
        &alice,
        villa_body("Villa Alice", "ubud", "chill", 5_000_000, 4),
    )
    .await;

    let response = send(
        &app,
        request(
            "PATCH",
            &format!("/owner/villas/{}", villa_id),
            Some(json!({ "name": "Mine now" })),
            Some(&bob),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        request("DELETE", &format!("/owner/villas/{}", villa_id), None, Some(&bob)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, request("GET", "/owner/villas", None, Some(&bob))).await;
    assert_eq!(body_json(response).await["villas"], json!([]));
}

#[tokio::test]
async fn owner_profile_requires_every_field() {
    let (app, db) = setup();
    let cookie = register(&app, "putu@example.com").await;

    let response = send(
        &app,
        request(
            "POST",
            "/owner/profile",
            Some(json!({ "first_name": "Putu", "last_name": "Ayu" })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request(
            "POST",
            "/owner/profile",
            Some(json!({
                "first_name": "Putu",
                "last_name": "Ayu",
                "personal_address": "Denpasar",
                "national_id_url": "https://files.example/ktp.jpg"
            })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let creds = db
        .get_owner_credentials_by_email("putu@example.com")
        .await
        .unwrap();
    assert!(db.get_owner(creds.id).await.unwrap().profile_completed);
}

#[tokio::test]
async fn owner_account_reports_profile_completion() {
    let (app, _db) = setup();
    let cookie = register(&app, "gede@example.com").await;

    let response = send(&app, request("GET", "/owner/me", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("GET", "/owner/me", None, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["owner"]["email"], json!("gede@example.com"));
    assert_eq!(json["owner"]["name"], json!("Made"));
    assert_eq!(json["owner"]["profile_completed"], json!(false));

    send(
        &app,
        request(
            "POST",
            "/owner/profile",
            Some(json!({
                "first_name": "Gede",
                "last_name": "Putra",
                "personal_address": "Ubud",
                "national_id_url": "https://files.example/ktp-gede.jpg"
            })),
            Some(&cookie),
        ),
    )
    .await;

    let response = send(&app, request("GET", "/owner/me", None, Some(&cookie))).await;
    assert_eq!(
        body_json(response).await["owner"]["profile_completed"],
        json!(true)
    );
}

#[tokio::test]
async fn villa_amounts_must_fit_storage() {
    let (app, _db) = setup();
    let cookie = register(&app, "bigspender@example.com").await;

    let mut body = villa_body("Palace", "seminyak", "party", 6_000_000, 2);
    body["total_price"] = json!(u64::MAX);
    let response = send(&app, request("POST", "/owner/villas", Some(body), Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Field total_price is out of range.");

    let villa_id = create_villa(
        &app,
        &cookie,
        villa_body("Palace", "seminyak", "party", 6_000_000, 2),
    )
    .await;
    let response = send(
        &app,
        request(
            "PATCH",
            &format!("/owner/villas/{}", villa_id),
            Some(json!({ "bedrooms": u32::MAX })),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Field bedrooms is out of range.");
}

//=========================================================================================
// Moderation
//=========================================================================================

#[tokio::test]
async fn moderation_publishes_a_listing() {
    let (app, _db) = setup_with_moderation();
    let cookie = register(&app, "moderated@example.com").await;
    let villa_id = create_villa(
        &app,
        &cookie,
        villa_body("Awaiting Review", "pererenan", "chill", 5_000_000, 3),
    )
    .await;

    let response = send(&app, request("GET", "/villas", None, None)).await;
    assert_eq!(body_json(response).await["villas"], json!([]));

    let response = send(&app, moderation_request(villa_id, "validated", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, moderation_request(villa_id, "validated", Some("nope"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, moderation_request(villa_id, "approved", Some(ADMIN_KEY))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = send(
        &app,
        moderation_request(Uuid::new_v4(), "validated", Some(ADMIN_KEY)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, moderation_request(villa_id, "VALIDATED", Some(ADMIN_KEY))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["villa"]["status"], json!("Validated"));

    let response = send(&app, request("GET", "/villas", None, None)).await;
    assert_eq!(names(&body_json(response).await), vec!["Awaiting Review"]);
    let response = send(&app, request("GET", &format!("/villas/{}", villa_id), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, moderation_request(villa_id, "pending", Some(ADMIN_KEY))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, request("GET", "/villas", None, None)).await;
    assert_eq!(body_json(response).await["villas"], json!([]));
}

#[tokio::test]
async fn moderation_is_refused_without_a_configured_key() {
    let (app, _db) = setup();
    let cookie = register(&app, "nokey@example.com").await;
    let villa_id = create_villa(
        &app,
        &cookie,
        villa_body("Unmoderated", "ubud", "mix", 5_000_000, 3),
    )
    .await;

    let response = send(&app, moderation_request(villa_id, "validated", Some(""))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = send(&app, request("GET", &format!("/villas/{}", villa_id), None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//=========================================================================================
// Public listings and renter context
//=========================================================================================

/// Registers an owner with two published villas and one pending villa.
async fn seed_listings(app: &Router, db: &InMemoryDb) -> (Uuid, Uuid) {
    let cookie = register(app, "lister@example.com").await;
    let roomy = create_villa(
        app,
        &cookie,
        villa_body("Roomy Work", "canggu", "work", 6_000_000, 3),
    )
    .await;
    let cheap = create_villa(
        app,
        &cookie,
        villa_body("Cheap Chill", "canggu", "chill", 5_000_000, 1),
    )
    .await;
    create_villa(
        app,
        &cookie,
        villa_body("Unreviewed", "canggu", "work", 1_000_000, 4),
    )
    .await;

    db.set_villa_status(roomy, VillaStatus::Validated).await.unwrap();
    db.set_villa_status(cheap, VillaStatus::Validated).await.unwrap();
    (roomy, cheap)
}

fn names(json: &Value) -> Vec<String> {
    json["villas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn browse_ranks_published_villas() {
    let (app, db) = setup();
    seed_listings(&app, &db).await;

    let response = send(
        &app,
        request("GET", "/villas?zone=Canggu&max_budget=8000000", None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Roomy Work", "Cheap Chill"]);
    // 70 + 10 zone + 2 surplus + 8 availability
    assert_eq!(json["villas"][0]["compatibility"], json!(90));
    // 70 + 10 zone + 3 surplus
    assert_eq!(json["villas"][1]["compatibility"], json!(83));

    let response = send(
        &app,
        request("GET", "/villas?zone=canggu&vibe=work&max_budget=8000000", None, None),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(names(&json), vec!["Roomy Work"]);
    assert_eq!(json["villas"][0]["compatibility"], json!(98));

    let response = send(&app, request("GET", "/villas?max_budget=5500000", None, None)).await;
    assert_eq!(names(&body_json(response).await), vec!["Cheap Chill"]);
}

#[tokio::test]
async fn renter_context_drives_browse_and_detail() {
    let (app, db) = setup();
    let (roomy, _cheap) = seed_listings(&app, &db).await;

    let response = send(
        &app,
        request(
            "PATCH",
            "/renter/preferences",
            Some(json!({
                "zones": ["Canggu", "Ubud", "Seminyak", "Pererenan"],
                "budget": 8_000_000,
                "arrival_date": "2026-12-01"
            })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let renter_cookie = cookie_pair(&set_cookie(&response).unwrap());
    let json = body_json(response).await;
    assert_eq!(json["preferences"]["zones"], json!(["Canggu", "Ubud", "Seminyak"]));

    // A second partial write keeps what was there.
    let response = send(
        &app,
        request(
            "PATCH",
            "/renter/preferences",
            Some(json!({ "vibe": "work" })),
            Some(&renter_cookie),
        ),
    )
    .await;
    let renter_cookie = cookie_pair(&set_cookie(&response).unwrap());
    let json = body_json(response).await;
    assert_eq!(json["preferences"]["budget"], json!(8_000_000));
    assert_eq!(json["preferences"]["vibe"], json!("Work"));

    // No query: the first preferred zone and the budget become the filters.
    let response = send(&app, request("GET", "/villas", None, Some(&renter_cookie))).await;
    let json = body_json(response).await;
    assert_eq!(json["filters"]["zone"], json!("Canggu"));
    assert_eq!(json["filters"]["max_budget"], json!(8_000_000));
    assert_eq!(names(&json), vec!["Roomy Work", "Cheap Chill"]);

    // Detail: 75 + 8 zone + 2 surplus, not every slot open.
    let response = send(
        &app,
        request("GET", &format!("/villas/{}", roomy), None, Some(&renter_cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["compatibility"], json!(85));

    let response = send(
        &app,
        request(
            "POST",
            "/renter/bookings",
            Some(json!({ "villa_id": roomy })),
            Some(&renter_cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request(
            "POST",
            "/renter/bookings",
            Some(json!({ "villa_id": roomy, "accept_terms": true })),
            Some(&renter_cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["booking"]["villa_name"], json!("Roomy Work"));
    assert_eq!(json["booking"]["dates"], json!("2026-12-01"));
    assert_eq!(json["booking"]["due_later_idr"], json!(6_000_000 - 425_000));
}

#[tokio::test]
async fn unpublished_villas_are_hidden_from_renters() {
    let (app, db) = setup();
    let cookie = register(&app, "hidden@example.com").await;
    let pending = create_villa(
        &app,
        &cookie,
        villa_body("Hidden", "ubud", "mix", 4_000_000, 4),
    )
    .await;

    let response = send(&app, request("GET", &format!("/villas/{}", pending), None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        request(
            "POST",
            "/renter/bookings",
            Some(json!({ "villa_id": pending, "accept_terms": true })),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    db.set_villa_status(pending, VillaStatus::Validated).await.unwrap();
    let response = send(&app, request("GET", &format!("/villas/{}", pending), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    // No renter context: empty zone list matches, 4 of 4 slots open.
    let json = body_json(response).await;
    assert_eq!(json["compatibility"], json!(75 + 8 + 2));
    assert_eq!(json["villa"]["status"], json!("Validated"));
}

#[tokio::test]
async fn edited_renter_cookie_is_brought_back_within_limits() {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let (app, _db) = setup();
    let forged = json!({
        "renter_id": "renter_123456789",
        "preferences": { "zones": ["Ubud", "Ubud", "Canggu", "Seminyak", "Pererenan"] }
    });
    let cookie = format!(
        "renter_context={}",
        URL_SAFE_NO_PAD.encode(forged.to_string())
    );

    let response = send(&app, request("GET", "/renter/context", None, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["renter_id"], json!("renter_123456789"));
    assert_eq!(json["preferences"]["zones"], json!(["Ubud", "Canggu", "Seminyak"]));
}
