//! HTTP-level tests: auth flow and error-status mapping through the
//! full router. Requires PostgreSQL via DATABASE_URL.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ims_backend::{build_app, state::AppState};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret";

fn app_for(pool: PgPool) -> Router {
    // All tests share the same value, so the race on the env var is benign.
    std::env::set_var("JWT_SECRET", TEST_SECRET);
    build_app(AppState::new(pool))
}

async fn seed_user(pool: &PgPool, username: &str, password: &str) {
    let hash = bcrypt::hash(password, 4).expect("hash");
    sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(hash)
        .execute(pool)
        .await
        .expect("insert user");
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["access_token"].as_str().expect("token").to_string()
}

#[sqlx::test(migrations = "./migrations")]
async fn login_and_me_flow(pool: PgPool) {
    seed_user(&pool, "alice", "secret-pass").await;
    let app = app_for(pool);

    // Wrong password is rejected.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app, "alice", "secret-pass").await;

    let (status, body) = send(
        &app,
        json_request("GET", "/api/v1/auth/me", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    // Protected routes reject missing and malformed tokens.
    let (status, _) = send(&app, json_request("GET", "/api/v1/products", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        json_request("GET", "/api/v1/products", Some("not-a-token"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn movement_endpoints_map_errors(pool: PgPool) {
    seed_user(&pool, "alice", "secret-pass").await;
    let app = app_for(pool);
    let token = login(&app, "alice", "secret-pass").await;

    let (status, product) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/products",
            Some(&token),
            Some(json!({ "name": "Widget", "code": "W-001" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{product}");
    let product_id = product["id"].as_i64().expect("product id");

    // Inbound creates the row.
    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/inventories/{product_id}/inbound?quantity=10"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["quantity"], 10);

    // Outbound below stock is a 400 and leaves the quantity unchanged.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/inventories/{product_id}/outbound?quantity=11"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/inventories/{product_id}/outbound?quantity=3"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 7);

    // Zero quantity is invalid; unknown product is 404.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/v1/inventories/{product_id}/inbound?quantity=0"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/inventories/999999/inbound?quantity=1",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn role_endpoints_map_errors(pool: PgPool) {
    seed_user(&pool, "alice", "secret-pass").await;
    let app = app_for(pool);
    let token = login(&app, "alice", "secret-pass").await;

    let (status, role) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/roles",
            Some(&token),
            Some(json!({ "name": "editor", "description": "Can edit" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{role}");
    let role_id = role["id"].as_i64().expect("role id");
    assert_eq!(role["permissions"], json!([]));

    // Duplicate name conflicts.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/roles",
            Some(&token),
            Some(json!({ "name": "editor" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Updating a missing role is a 404.
    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/roles/999999",
            Some(&token),
            Some(json!({ "name": "ghost" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/v1/roles/{role_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        json_request("DELETE", &format!("/api/v1/roles/{role_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
