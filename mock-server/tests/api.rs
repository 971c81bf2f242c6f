use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, MockState};
use serde_json::Value;
use tower::ServiceExt;

const AUTH: &str = "login=demo&apiKey=R_key";

fn router() -> (Router, Arc<MockState>) {
    let state = Arc::new(MockState::new("demo", "R_key"));
    (app(state.clone()), state)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let resp = get(app, uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// --- shorten ---

#[tokio::test]
async fn shorten_returns_short_url() {
    let (app, _) = router();
    let body = get_json(
        &app,
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F"),
    )
    .await;

    assert_eq!(body["status_code"], 200);
    let url = body["data"]["url"].as_str().unwrap();
    assert!(url.starts_with("http://bit.ly/"));
    assert_eq!(body["data"]["long_url"], "http://betaworks.com/");
    assert_eq!(body["data"]["new_hash"], 1);
}

#[tokio::test]
async fn shorten_same_url_reuses_hash() {
    let (app, _) = router();
    let uri = format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fexample.com");
    let first = get_json(&app, &uri).await;
    let second = get_json(&app, &uri).await;

    assert_eq!(first["data"]["hash"], second["data"]["hash"]);
    assert_eq!(second["data"]["new_hash"], 0);
}

#[tokio::test]
async fn shorten_without_long_url_reports_missing_arg() {
    let (app, _) = router();
    let body = get_json(&app, &format!("/v3/shorten?{AUTH}")).await;
    assert_eq!(body["status_code"], 500);
    assert_eq!(body["status_txt"], "MISSING_ARG_LONGURL");
}

#[tokio::test]
async fn shorten_rejects_non_http_url() {
    let (app, _) = router();
    let body = get_json(&app, &format!("/v3/shorten?{AUTH}&longUrl=ftp%3A%2F%2Fx")).await;
    assert_eq!(body["status_txt"], "INVALID_URI");
}

#[tokio::test]
async fn bad_credentials_return_error_message() {
    let (app, _) = router();
    let body = get_json(
        &app,
        "/v3/shorten?login=demo&apiKey=wrong&longUrl=http%3A%2F%2Fexample.com",
    )
    .await;
    assert_eq!(body["errorCode"], 203);
    assert_eq!(
        body["errorMessage"],
        "You must be authenticated to access shorten"
    );
}

// --- expand ---

#[tokio::test]
async fn expand_known_hash() {
    let (app, _) = router();
    let shortened = get_json(
        &app,
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fexample.com%2Fpage"),
    )
    .await;
    let hash = shortened["data"]["hash"].as_str().unwrap();

    let body = get_json(&app, &format!("/v3/expand?{AUTH}&hash={hash}")).await;
    assert_eq!(body["data"]["expand"][0]["long_url"], "http://example.com/page");
}

#[tokio::test]
async fn expand_unknown_hash_is_not_found() {
    let (app, _) = router();
    let body = get_json(&app, &format!("/v3/expand?{AUTH}&hash=nope")).await;
    let entry = &body["data"]["expand"][0];
    assert_eq!(entry["error"], "NOT_FOUND");
    assert!(entry.get("long_url").is_none());
}

// --- clicks / redirect ---

#[tokio::test]
async fn following_a_link_counts_a_click() {
    let (app, _) = router();
    let shortened = get_json(
        &app,
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fexample.com%2Fclicked"),
    )
    .await;
    let hash = shortened["data"]["hash"].as_str().unwrap().to_string();

    let resp = get(&app, &format!("/{hash}")).await;
    assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        resp.headers()[header::LOCATION],
        "http://example.com/clicked"
    );

    let body = get_json(&app, &format!("/v3/clicks?{AUTH}&hash={hash}")).await;
    let entry = &body["data"]["clicks"][0];
    assert_eq!(entry["user_clicks"], 1);
    assert_eq!(entry["global_clicks"], 1);
}

#[tokio::test]
async fn following_unknown_hash_is_404() {
    let (app, _) = router();
    let resp = get(&app, "/missing").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- errors ---

#[tokio::test]
async fn errors_lists_codes_and_counts_requests() {
    let (app, state) = router();
    let body = get_json(&app, &format!("/v3/errors?{AUTH}")).await;
    assert_eq!(body["errorMessage"], "");
    assert!(!body["results"].as_array().unwrap().is_empty());

    get_json(&app, &format!("/v3/errors?{AUTH}")).await;
    assert_eq!(state.error_requests(), 2);
}

#[tokio::test]
async fn rejected_errors_request_is_not_counted() {
    let (app, state) = router();
    get_json(&app, "/v3/errors?login=demo&apiKey=wrong").await;
    assert_eq!(state.error_requests(), 0);
}
