//! DTOs for the bit.ly API.
//!
//! # Design
//! Only the fields the client returns are modeled. Everything else in the
//! payloads is read through `serde_json::Value` in the client and ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Login and API key sent on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    api_key: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            api_key: api_key.into(),
        }
    }

    /// `login=<login>&apiKey=<key>`, both percent-encoded.
    pub fn query_fragment(&self) -> String {
        format!(
            "login={}&apiKey={}",
            urlencoding::encode(&self.login),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Click counts for one short URL, the first entry of `data.clicks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClickInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_hash: Option<String>,
    pub user_clicks: u64,
    pub global_clicks: u64,
}

/// One entry of the service's error list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCode {
    pub error_code: i64,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
}
