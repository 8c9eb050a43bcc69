//! Router-level tests: the full app (middleware included) over in-memory stores
//! and a fixed signing key, driven with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::app::build_router;
use crate::config::Config;
use crate::repos::{CatalogStore, MemoryCatalogStore, MemoryUserStore, UserStore};
use crate::services::auth::{PasswordService, SigningKey, TokenCodec};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

const KEY: [u8; 32] = [9; 32];
const EMAIL: &str = "ana@example.com";
const PASSWORD: &str = "s3cret-pass";

struct TestApp {
    router: Router,
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn CatalogStore>,
    config: Config,
}

fn test_config() -> Config {
    Config::from_source(|_| None).unwrap()
}

fn codec(key: [u8; 32], config: &Config) -> TokenCodec {
    TokenCodec::new(
        &SigningKey::from_bytes(key),
        config.auth_issuer.clone(),
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    )
}

fn build_app(key: [u8; 32], users: Arc<dyn UserStore>, catalog: Arc<dyn CatalogStore>) -> TestApp {
    let config = test_config();
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();
    let state = AppState::new(
        users.clone(),
        catalog.clone(),
        id_codec,
        PasswordService::fast(),
        codec(key, &config),
    );

    TestApp {
        router: build_router(state, &config),
        users,
        catalog,
        config,
    }
}

fn app() -> TestApp {
    build_app(
        KEY,
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryCatalogStore::new()),
    )
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn registration(email: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "first_name": "Ana",
        "paternal_surname": "Lopez",
        "maternal_surname": "Ruiz",
        "address": "Calle 1, Texcoco"
    })
}

async fn register_and_login(app: &TestApp, email: &str) -> String {
    let (status, _) = send(
        app,
        request("POST", "/api/v1/users", None, Some(registration(email))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &TestApp, token: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

#[tokio::test]
async fn health_is_open() {
    let app = app();
    let (status, body) = send(&app, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = app();
    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-123");
    assert_eq!(res.headers()["x-content-type-options"], "nosniff");
    assert_eq!(res.headers()["x-frame-options"], "DENY");

    // generated when the client sends none
    let res = app
        .router
        .clone()
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn register_login_then_protected_call() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, body) = send(&app, request("GET", "/api/v1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["email"], EMAIL);

    let (status, body) = send(&app, request("GET", "/api/v1/users", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"][0]["email"], EMAIL);
    assert_eq!(body["users"][0]["account"]["type"], "standard");
    assert_eq!(body["users"][0]["account"]["status"], "active");
    assert!(body["users"][0].get("password_hash").is_none());
}

#[tokio::test]
async fn login_returns_profile_and_one_hour_token() {
    let app = app();
    register_and_login(&app, EMAIL).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": EMAIL, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(body["expires_at"].is_i64());
    assert_eq!(body["first_name"], "Ana");
    assert_eq!(body["paternal_surname"], "Lopez");
    assert_eq!(body["maternal_surname"], "Ruiz");

    let claims = codec(KEY, &app.config)
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, EMAIL);
    assert_eq!(claims.exp, claims.iat + 3600);
    assert_eq!(body["expires_at"], claims.exp);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app();
    register_and_login(&app, EMAIL).await;

    let (wrong_status, wrong_body) = send(
        &app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": EMAIL, "password": "nope" })),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["success"], false);
}

#[tokio::test]
async fn login_without_fields_is_bad_request() {
    let app = app();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": "  ", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing fields in request");

    let (status, _) = send(&app, request("POST", "/api/v1/login", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_authorization_headers_mean_no_token() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let headers = [
        None,
        Some(String::new()),
        Some(token.clone()),
        Some(format!("bearer {token}")),
        Some(format!("Basic {token}")),
        Some(format!("Bearer {token} extra")),
        Some("Bearer".to_string()),
    ];

    for value in headers {
        let mut builder = Request::builder().method("GET").uri("/api/v1/diseases");
        if let Some(value) = &value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let (status, body) = send(&app, builder.body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {value:?}");
        assert_eq!(body["message"], "token not supplied", "header {value:?}");
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = app();
    register_and_login(&app, EMAIL).await;

    let (expired, _) = codec(KEY, &app.config)
        .issue(EMAIL, Utc::now() - Duration::hours(2))
        .unwrap();

    let (status, body) = send(&app, request("GET", "/api/v1", Some(&expired), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid or expired token");
}

#[tokio::test]
async fn tokens_from_before_a_restart_stop_working() {
    let before = app();
    let token = register_and_login(&before, EMAIL).await;

    // same data, new process key
    let after = build_app([1; 32], before.users.clone(), before.catalog.clone());

    let (status, body) = send(&after, request("GET", "/api/v1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid or expired token");
}

#[tokio::test]
async fn deleting_the_user_invalidates_their_token() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/api/v1/users/email/{EMAIL}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, request("GET", "/api/v1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid or expired token");
}

#[tokio::test]
async fn logout_is_acknowledged_but_token_lives_on() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, body) = send(&app, request("GET", "/api/v1/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logged out");

    let (status, _) = send(&app, request("GET", "/api/v1", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = app();
    register_and_login(&app, EMAIL).await;

    let (status, body) = send(
        &app,
        request("POST", "/api/v1/users", None, Some(registration(EMAIL))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email already exists");
}

#[tokio::test]
async fn update_and_delete_by_email() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/users/email/{EMAIL}"),
            Some(&token),
            Some(json!({ "address": "Calle 2, Chapingo" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["address"], "Calle 2, Chapingo");
    assert_eq!(body["user"]["first_name"], "Ana");

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/users/email/{EMAIL}"),
            Some(&token),
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/v1/users/email/ghost@example.com",
            Some(&token),
            Some(json!({ "address": "nowhere" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            "/api/v1/users/email/ghost@example.com",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn password_change_takes_effect_on_next_login() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/v1/users/email/{EMAIL}"),
            Some(&token),
            Some(json!({ "password": "new-pass" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let login = |password: &'static str| {
        request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "email": EMAIL, "password": password })),
        )
    };
    assert_eq!(send(&app, login(PASSWORD)).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, login("new-pass")).await.0, StatusCode::OK);
}

#[tokio::test]
async fn disease_catalog_round_trip() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, body) = create(
        &app,
        &token,
        "/api/v1/diseases",
        json!({ "name": "Roya <b>del</b> cafe", "description": "Hemileia vastatrix" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(id.len() >= 10);

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/v1/diseases/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disease"]["id"], id.as_str());
    assert_eq!(body["disease"]["name"], "Roya <b>del</b> cafe");

    let (status, body) = send(&app, request("GET", "/api/v1/diseases", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diseases"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn catalog_ids_are_checked() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;
    let codec = IdCodec::new(app.config.sqids_min_length, &app.config.sqids_alphabet).unwrap();
    let unknown = codec.encode(999).unwrap();

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/v1/treatments/{unknown}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "treatment not found");

    let (status, body) = send(
        &app,
        request("GET", "/api/v1/reviews/not-an-id", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = create(
        &app,
        &token,
        "/api/v1/disease_categories",
        json!({ "disease_id": unknown, "name": "Fungal", "description": "rusts" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unknown disease_id");
}

#[tokio::test]
async fn treatments_and_reviews_reference_existing_records() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (_, body) = create(
        &app,
        &token,
        "/api/v1/diseases",
        json!({ "name": "Tizon tardio", "description": "Phytophthora infestans" }),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = create(
        &app,
        &token,
        "/api/v1/treatments",
        json!({
            "disease_id": disease_id,
            "name": "Copper",
            "description": "copper hydroxide",
            "instructions": "spray every 7 days"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let treatment_id = body["id"].as_str().unwrap().to_string();

    let review = |rating: i64| {
        json!({
            "treatment_id": treatment_id,
            "disease_id": disease_id,
            "opinion": "worked",
            "rating": rating
        })
    };

    let (status, body) = create(&app, &token, "/api/v1/reviews", review(6)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating must be between 1 and 5");

    let (status, body) = create(&app, &token, "/api/v1/reviews", review(4)).await;
    assert_eq!(status, StatusCode::CREATED);
    let review_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request("GET", &format!("/api/v1/reviews/{review_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["review"]["rating"], 4);
    assert_eq!(body["review"]["treatment_id"], treatment_id.as_str());
}

#[tokio::test]
async fn images_and_diagnoses_belong_to_the_caller() {
    let app = app();
    let token = register_and_login(&app, EMAIL).await;

    let (status, _) = create(
        &app,
        &token,
        "/api/v1/images",
        json!({
            "url": "https://img.example.com/leaf.jpg",
            "coordinates": { "latitude": 91.0, "longitude": 0.0 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = create(
        &app,
        &token,
        "/api/v1/images",
        json!({
            "url": "https://img.example.com/leaf.jpg",
            "coordinates": { "latitude": 19.45, "longitude": -98.9 }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let image_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = create(
        &app,
        &token,
        "/api/v1/diseases",
        json!({ "name": "Mildiu", "description": "downy mildew" }),
    )
    .await;
    let disease_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = create(
        &app,
        &token,
        "/api/v1/diagnoses",
        json!({ "disease_id": disease_id, "image_id": image_id, "notes": "lower leaves" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let diagnosis_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/v1/diagnoses/{diagnosis_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diagnosis"]["user_email"], EMAIL);
    assert_eq!(body["diagnosis"]["image_id"], image_id.as_str());

    let (status, body) = send(&app, request("GET", "/api/v1/images", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"][0]["user_id"], EMAIL);
    assert_eq!(body["images"][0]["coordinates"]["latitude"], 19.45);
}

#[tokio::test]
async fn protected_routes_reject_anonymous_callers() {
    let app = app();

    for (method, uri) in [
        ("GET", "/api/v1"),
        ("GET", "/api/v1/users"),
        ("GET", "/api/v1/diseases"),
        ("POST", "/api/v1/images"),
        ("GET", "/api/v1/logout"),
    ] {
        let (status, body) = send(&app, request(method, uri, None, Some(json!({})))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "token not supplied");
    }
}
