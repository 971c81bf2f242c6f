//! In-memory stand-in for the bit.ly v3 API.
//!
//! Serves `/v3/shorten`, `/v3/expand`, `/v3/clicks` and `/v3/errors` with the
//! same JSON shapes as the real service, plus `/{hash}` redirects that bump
//! the click counter. Every response is HTTP 200; failures are reported in
//! the payload, as the real service does.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_SHORT_DOMAIN: &str = "http://bit.ly";

#[derive(Clone, Debug)]
struct Link {
    long_url: String,
    clicks: u64,
}

/// Accepted credentials, stored links and request counters.
#[derive(Debug)]
pub struct MockState {
    login: String,
    api_key: String,
    short_domain: String,
    links: RwLock<HashMap<String, Link>>,
    error_requests: AtomicUsize,
}

pub type SharedState = Arc<MockState>;

impl MockState {
    pub fn new(login: &str, api_key: &str) -> Self {
        Self {
            login: login.to_string(),
            api_key: api_key.to_string(),
            short_domain: DEFAULT_SHORT_DOMAIN.to_string(),
            links: RwLock::new(HashMap::new()),
            error_requests: AtomicUsize::new(0),
        }
    }

    /// Number of `/v3/errors` requests served so far.
    pub fn error_requests(&self) -> usize {
        self.error_requests.load(Ordering::SeqCst)
    }

    fn short_url(&self, hash: &str) -> String {
        format!("{}/{hash}", self.short_domain)
    }
}

type Params = Query<HashMap<String, String>>;
type ApiResult = Result<Json<Value>, Json<Value>>;

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/v3/shorten", get(shorten))
        .route("/v3/expand", get(expand))
        .route("/v3/clicks", get(clicks))
        .route("/v3/errors", get(errors))
        .route("/{hash}", get(follow))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

fn authenticate(
    state: &MockState,
    params: &HashMap<String, String>,
    action: &str,
) -> Result<(), Json<Value>> {
    let login = params.get("login").map(String::as_str);
    let api_key = params.get("apiKey").map(String::as_str);
    if login == Some(state.login.as_str()) && api_key == Some(state.api_key.as_str()) {
        return Ok(());
    }
    debug!(action, ?login, "rejected credentials");
    Err(Json(json!({
        "errorCode": 203,
        "errorMessage": format!("You must be authenticated to access {action}"),
        "statusCode": "ERROR",
    })))
}

fn status_error(status_txt: &str) -> Json<Value> {
    Json(json!({ "status_code": 500, "status_txt": status_txt, "data": [] }))
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "status_code": 200, "status_txt": "OK", "data": data }))
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, Json<Value>> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| status_error(&format!("MISSING_ARG_{}", name.to_uppercase())))
}

fn random_hash() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Draws from `generate` until the hash is not already taken.
fn unused_hash(links: &HashMap<String, Link>, mut generate: impl FnMut() -> String) -> String {
    loop {
        let hash = generate();
        if !links.contains_key(&hash) {
            return hash;
        }
    }
}

async fn shorten(State(state): State<SharedState>, Query(params): Params) -> ApiResult {
    authenticate(&state, &params, "shorten")?;
    let long_url = required(&params, "longUrl")?;
    if !(long_url.starts_with("http://") || long_url.starts_with("https://")) {
        return Err(status_error("INVALID_URI"));
    }

    let mut links = state.links.write().await;
    let existing = links
        .iter()
        .find(|(_, link)| link.long_url == long_url)
        .map(|(hash, _)| hash.clone());
    let (hash, new_hash) = match existing {
        Some(hash) => (hash, 0),
        None => {
            let hash = unused_hash(&links, random_hash);
            links.insert(
                hash.clone(),
                Link {
                    long_url: long_url.to_string(),
                    clicks: 0,
                },
            );
            (hash, 1)
        }
    };

    Ok(ok(json!({
        "url": state.short_url(&hash),
        "hash": hash,
        "global_hash": hash,
        "long_url": long_url,
        "new_hash": new_hash,
    })))
}

async fn expand(State(state): State<SharedState>, Query(params): Params) -> ApiResult {
    authenticate(&state, &params, "expand")?;
    let hash = required(&params, "hash")?;
    let links = state.links.read().await;
    let entry = match links.get(hash) {
        Some(link) => json!({
            "short_url": state.short_url(hash),
            "long_url": link.long_url,
            "user_hash": hash,
            "global_hash": hash,
        }),
        None => json!({ "hash": hash, "error": "NOT_FOUND" }),
    };
    Ok(ok(json!({ "expand": [entry] })))
}

async fn clicks(State(state): State<SharedState>, Query(params): Params) -> ApiResult {
    authenticate(&state, &params, "clicks")?;
    let hash = required(&params, "hash")?;
    let links = state.links.read().await;
    let entry = match links.get(hash) {
        Some(link) => json!({
            "short_url": state.short_url(hash),
            "user_hash": hash,
            "global_hash": hash,
            "user_clicks": link.clicks,
            "global_clicks": link.clicks,
        }),
        None => json!({ "hash": hash, "error": "NOT_FOUND" }),
    };
    Ok(ok(json!({ "clicks": [entry] })))
}

async fn errors(State(state): State<SharedState>, Query(params): Params) -> ApiResult {
    authenticate(&state, &params, "errors")?;
    state.error_requests.fetch_add(1, Ordering::SeqCst);
    Ok(Json(json!({
        "errorCode": 0,
        "errorMessage": "",
        "statusCode": "OK",
        "results": [
            { "errorCode": 203, "errorMessage": "You must be authenticated to access shorten", "statusCode": "ERROR" },
            { "errorCode": 1206, "errorMessage": "URL you tried to shorten was invalid.", "statusCode": "ERROR" },
            { "errorCode": 1203, "errorMessage": "You must be authenticated to access the requested URL.", "statusCode": "ERROR" },
        ],
    })))
}

async fn follow(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
) -> Result<Redirect, StatusCode> {
    let mut links = state.links.write().await;
    let link = links.get_mut(&hash).ok_or(StatusCode::NOT_FOUND)?;
    link.clicks += 1;
    Ok(Redirect::permanent(&link.long_url))
}
