//! HTTP transport types and the default ureq-backed transport.
//!
//! # Design
//! Requests and responses are plain data. `BitlyClient::build_*` produces an
//! `HttpRequest` and `BitlyClient::parse_*` consumes an `HttpResponse`
//! without touching the network; a `Transport` sits between the two. Tests
//! swap in a fixture transport, production uses `UreqTransport`.

use std::time::Duration;

use crate::error::{codes, TransportError};

/// HTTP method for a request. The bit.ly API is read entirely over GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one request and returns the raw response.
///
/// Implementations report failures below the HTTP response layer (DNS,
/// connect, TLS, timeout) as `TransportError`. Any response that arrived,
/// whatever its status, is returned as `Ok`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport built on a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let mut response = builder.call().map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(transport_error)?;

        Ok(HttpResponse { status, body })
    }
}

fn transport_error(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => codes::MALFORMED_URL,
        ureq::Error::HostNotFound => codes::HOST_NOT_FOUND,
        ureq::Error::ConnectionFailed => codes::CONNECT_FAILED,
        ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
            codes::CONNECT_FAILED
        }
        ureq::Error::Timeout(_) => codes::TIMEOUT,
        ureq::Error::TooManyRedirects => codes::TOO_MANY_REDIRECTS,
        _ => codes::RECV_FAILED,
    };
    TransportError::new(code, err.to_string())
}
