//! End-to-end tests driving the router: login, upload, download, delete,
//! resurrection and logout.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tower::ServiceExt;

use cloudvault::config::Config;
use cloudvault::db::Database;
use cloudvault::error::ErrorBody;
use cloudvault::models::{FileSummary, TokenResponse};
use cloudvault::services::AuthService;
use cloudvault::{create_router, AppState};

const BOUNDARY: &str = "cloudvault-test-boundary";

async fn setup_app() -> Router {
    let db = Database::open_in_memory().await.unwrap();
    db.run_migrations().await.unwrap();

    let password_hash = AuthService::hash_password("secret").unwrap();
    sqlx::query("INSERT INTO users (login, password_hash, roles, created_at) VALUES (?, ?, 'USER', datetime('now'))")
        .bind("u1")
        .bind(password_hash)
        .execute(db.pool())
        .await
        .unwrap();

    let state = AppState::new(db, Config::default()).unwrap();
    create_router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn login(app: &Router, login: &str, password: &str) -> (StatusCode, Vec<u8>) {
    let body = serde_json::json!({ "login": login, "password": password }).to_string();
    let request = Request::post("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

async fn login_token(app: &Router) -> String {
    let (status, body) = login(app, "u1", "secret").await;
    assert_eq!(status, StatusCode::OK);
    let response: TokenResponse = serde_json::from_slice(&body).unwrap();
    response.auth_token
}

fn multipart_body(content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    Request::post(format!("/cloud/file?filename={filename}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(content_type, bytes)))
        .unwrap()
}

fn get_request(token: &str, uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

async fn list(app: &Router, token: &str, limit: i64) -> Vec<FileSummary> {
    let (status, body) = send(app, get_request(token, &format!("/cloud/list?limit={limit}"))).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn login_with_wrong_password_returns_400_with_attribution() {
    let app = setup_app().await;

    let (status, body) = login(&app, "u1", "wrong").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.id, 1);
    assert!(!error.message.is_empty());
}

#[tokio::test]
async fn unknown_login_returns_404() {
    let app = setup_app().await;

    let (status, _) = login(&app, "nobody", "secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cloud_routes_require_authentication() {
    let app = setup_app().await;

    let request = Request::get("/cloud/list?limit=3")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::get("/cloud/list?limit=3")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn alternate_header_carries_the_token() {
    let app = setup_app().await;
    let token = login_token(&app).await;

    let request = Request::get("/cloud/list?limit=3")
        .header("auth-token", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn upload_download_delete_resurrect_logout_flow() {
    let app = setup_app().await;
    let token = login_token(&app).await;

    // upload "hello"
    let (status, _) = send(&app, upload_request(&token, "a.txt", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::OK);

    // download returns exactly the submitted bytes and media type
    let response = app
        .clone()
        .oneshot(get_request(&token, "/cloud/file?filename=a.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    assert_eq!(body, b"hello");

    // listed with the SHA-256 of "hello"
    let files = list(&app, &token, 10).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "a.txt");
    assert_eq!(files[0].hash, sha256_hex(b"hello"));
    assert_eq!(files[0].file_bytes, b"hello");

    // duplicate upload of a live name is rejected
    let (status, _) = send(&app, upload_request(&token, "a.txt", "text/plain", b"again")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // delete hides the file from the listing but not from download
    let request = Request::delete("/cloud/file?filename=a.txt")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    assert!(list(&app, &token, 10).await.is_empty());
    let (status, body) = send(&app, get_request(&token, "/cloud/file?filename=a.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"hello");

    // re-upload resurrects the tombstone: original payload and hash survive
    let (status, _) = send(&app, upload_request(&token, "a.txt", "text/plain", b"world")).await;
    assert_eq!(status, StatusCode::OK);

    let files = list(&app, &token, 10).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hash, sha256_hex(b"hello"));
    assert_eq!(files[0].file_bytes, b"hello");

    // logout revokes the token for all further requests
    let request = Request::post("/logout")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, get_request(&token, "/cloud/list?limit=10")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_upload_is_rejected_with_sentinel_id() {
    let app = setup_app().await;
    let token = login_token(&app).await;

    let (status, body) = send(&app, upload_request(&token, "a.txt", "text/plain", b"")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert_eq!(error.id, 0);
}

#[tokio::test]
async fn rename_moves_the_name_and_rejects_taken_targets() {
    let app = setup_app().await;
    let token = login_token(&app).await;

    send(&app, upload_request(&token, "a.txt", "text/plain", b"hello")).await;
    send(&app, upload_request(&token, "b.txt", "text/plain", b"other")).await;

    // target taken
    let request = Request::put("/cloud/file?filename=a.txt")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"filename":"b.txt"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // free target succeeds, hash unchanged
    let request = Request::put("/cloud/file?filename=a.txt")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"filename":"c.txt"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let files = list(&app, &token, 10).await;
    let names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["b.txt", "c.txt"]);
    let renamed = files.iter().find(|f| f.file_name == "c.txt").unwrap();
    assert_eq!(renamed.hash, sha256_hex(b"hello"));
}

#[tokio::test]
async fn list_honors_the_limit() {
    let app = setup_app().await;
    let token = login_token(&app).await;

    for name in ["a.txt", "b.txt", "c.txt"] {
        send(&app, upload_request(&token, name, "text/plain", b"x")).await;
    }

    assert_eq!(list(&app, &token, 2).await.len(), 2);

    let (status, _) = send(&app, get_request(&token, "/cloud/list?limit=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
