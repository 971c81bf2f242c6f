//! Request builder, response parser and round-trip driver for the bit.ly API.
//!
//! # Design
//! `BitlyClient` holds credentials, configuration and a transport, none of
//! which change after construction. Each operation has a `build_*` method
//! producing an `HttpRequest` and a `parse_*` method consuming an
//! `HttpResponse`; the high-level method runs one through the transport and
//! hands the result to the other. Nothing about a call is stored on the
//! client, so one instance can serve many threads. The error list is the
//! exception: it is fetched once and kept in a `OnceCell`.

use once_cell::sync::OnceCell;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::hash::hash_from_url;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{ClickInfo, Credentials, ErrorCode};

/// Blocking client for the bit.ly v3 API.
#[derive(Debug)]
pub struct BitlyClient<T = UreqTransport> {
    credentials: Credentials,
    config: ClientConfig,
    transport: T,
    error_codes: OnceCell<Vec<ErrorCode>>,
}

impl BitlyClient<UreqTransport> {
    /// Client against the public service with default settings.
    pub fn new(login: &str, api_key: &str) -> Self {
        Self::with_config(login, api_key, ClientConfig::default())
    }

    pub fn with_config(login: &str, api_key: &str, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(Credentials::new(login, api_key), config, transport)
    }
}

impl<T: Transport> BitlyClient<T> {
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            credentials,
            config,
            transport,
            error_codes: OnceCell::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Shortens `long_url` and returns the short URL.
    pub fn shorten(&self, long_url: &str) -> Result<String> {
        let request = self.build_shorten(long_url)?;
        let response = self.execute("shorten", &request)?;
        self.parse_shorten(response)
    }

    /// Returns the long URL behind a short URL or bare hash.
    pub fn expand(&self, url_or_hash: &str) -> Result<String> {
        let request = self.build_expand(url_or_hash)?;
        let response = self.execute("expand", &request)?;
        self.parse_expand(response)
    }

    /// Returns click counts for a short URL or bare hash.
    pub fn clicks(&self, url_or_hash: &str) -> Result<ClickInfo> {
        let request = self.build_clicks(url_or_hash)?;
        let response = self.execute("clicks", &request)?;
        self.parse_clicks(response)
    }

    /// Returns the service's error code list.
    ///
    /// Fetched on the first successful call and cached for the lifetime of
    /// the client. Concurrent first callers wait on a single fetch. A failed
    /// fetch leaves the cache empty.
    pub fn errors(&self) -> Result<&[ErrorCode]> {
        if let Some(cached) = self.error_codes.get() {
            debug!(count = cached.len(), "serving cached error codes");
            return Ok(cached.as_slice());
        }
        let codes = self.error_codes.get_or_try_init(|| {
            let request = self.build_errors();
            let response = self.execute("errors", &request)?;
            self.parse_errors(response)
        })?;
        Ok(codes.as_slice())
    }

    pub fn build_shorten(&self, long_url: &str) -> Result<HttpRequest> {
        if long_url.is_empty() {
            return Err(ApiError::Validation("long URL is empty".to_string()));
        }
        Ok(self.build(
            "shorten",
            &format!("longUrl={}", urlencoding::encode(long_url)),
        ))
    }

    pub fn build_expand(&self, url_or_hash: &str) -> Result<HttpRequest> {
        let hash = required_hash(url_or_hash)?;
        Ok(self.build("expand", &format!("hash={}", urlencoding::encode(hash))))
    }

    pub fn build_clicks(&self, url_or_hash: &str) -> Result<HttpRequest> {
        let hash = required_hash(url_or_hash)?;
        Ok(self.build("clicks", &format!("hash={}", urlencoding::encode(hash))))
    }

    pub fn build_errors(&self) -> HttpRequest {
        self.build("errors", "")
    }

    pub fn parse_shorten(&self, response: HttpResponse) -> Result<String> {
        let payload = decode(response)?;
        string_at(&payload, "/data/url")
    }

    pub fn parse_expand(&self, response: HttpResponse) -> Result<String> {
        let payload = decode(response)?;
        let entry = first_entry(&payload, "/data/expand")?;
        match entry.get("long_url").and_then(Value::as_str) {
            Some(long_url) => Ok(long_url.to_string()),
            None => {
                let reason = entry_error(entry).unwrap_or("missing long_url");
                Err(ApiError::Decode(format!("expand entry has no long_url: {reason}")))
            }
        }
    }

    pub fn parse_clicks(&self, response: HttpResponse) -> Result<ClickInfo> {
        let payload = decode(response)?;
        let entry = first_entry(&payload, "/data/clicks")?;
        if let Some(reason) = entry_error(entry) {
            return Err(ApiError::Decode(format!("clicks entry has no counts: {reason}")));
        }
        Ok(serde_json::from_value(entry.clone())?)
    }

    pub fn parse_errors(&self, response: HttpResponse) -> Result<Vec<ErrorCode>> {
        let payload = decode(response)?;
        let results = payload
            .get("results")
            .ok_or_else(|| ApiError::Decode("response has no results".to_string()))?;
        Ok(serde_json::from_value(results.clone())?)
    }

    fn build(&self, action: &str, params: &str) -> HttpRequest {
        let mut url = format!(
            "{}?{}",
            self.config.endpoint(action),
            self.credentials.query_fragment()
        );
        if !params.is_empty() {
            url.push('&');
            url.push_str(params);
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![("user-agent".to_string(), self.config.user_agent.clone())],
        }
    }

    fn execute(&self, action: &str, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(action, endpoint = %self.config.endpoint(action), "sending request");
        let response = self.transport.execute(request).map_err(|err| {
            warn!(action, code = err.code, error = %err.message, "transport failure");
            ApiError::from(err)
        })?;
        trace!(action, status = response.status, bytes = response.body.len(), "received response");
        Ok(response)
    }
}

fn required_hash(url_or_hash: &str) -> Result<&str> {
    let hash = hash_from_url(url_or_hash);
    if hash.is_empty() {
        return Err(ApiError::Validation(format!("no hash in {url_or_hash:?}")));
    }
    Ok(hash)
}

/// Parse the body and map error payloads to `ApiError::Api`.
fn decode(response: HttpResponse) -> Result<Value> {
    let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
        ApiError::Decode(format!("HTTP {} body is not JSON: {e}", response.status))
    })?;
    check_error_payload(&payload)?;
    Ok(payload)
}

fn check_error_payload(payload: &Value) -> Result<()> {
    let message = payload
        .get("errorMessage")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty());
    if let Some(message) = message {
        return Err(ApiError::Api {
            code: integer_field(payload, "errorCode"),
            message: message.to_string(),
        });
    }

    // v3 envelope: {"status_code": 500, "status_txt": "INVALID_URI", "data": null}
    if let Some(code) = payload.get("status_code").and_then(Value::as_i64) {
        if code != 200 {
            let message = payload
                .get("status_txt")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ApiError::Api {
                code,
                message: message.to_string(),
            });
        }
    }
    Ok(())
}

/// Reads an integer that the service sometimes sends as a string.
fn integer_field(payload: &Value, key: &str) -> i64 {
    match payload.get(key) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => 0,
    }
}

fn string_at(payload: &Value, pointer: &str) -> Result<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode(format!("response has no string at {pointer}")))
}

/// Per-entry failure such as `{"hash": "zzz", "error": "NOT_FOUND"}`.
fn entry_error(entry: &Value) -> Option<&str> {
    entry.get("error").and_then(Value::as_str)
}

fn first_entry<'a>(payload: &'a Value, pointer: &str) -> Result<&'a Value> {
    let entries = payload
        .pointer(pointer)
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::Decode(format!("response has no array at {pointer}")))?;
    entries
        .first()
        .ok_or_else(|| ApiError::Decode(format!("{pointer} is empty")))
}
