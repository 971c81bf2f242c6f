//! Blocking client for the bit.ly v3 REST API.
//!
//! # Overview
//! `BitlyClient` shortens and expands URLs, reads click counts and lists the
//! service's error codes. Every operation is one GET round trip: build a
//! query string, send it, decode JSON, pull out one field.
//!
//! # Design
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so callers that own their I/O can
//!   skip the transport entirely.
//! - The high-level methods (`shorten`, `expand`, `clicks`, `errors`) run the
//!   request through a `Transport`. `UreqTransport` is the default.
//! - Per-call state lives on the stack. The only shared state is the
//!   memoized error list, which initializes at most once.

pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod http;
pub mod types;

pub use client::BitlyClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind, TransportError};
pub use hash::hash_from_url;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{ClickInfo, Credentials, ErrorCode};
