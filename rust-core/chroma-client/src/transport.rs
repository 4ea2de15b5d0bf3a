// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! HTTP transport for the Chroma REST API.
//!
//! [`HttpTransport`] owns the base URL, the pooled `reqwest` client and the
//! API key. It speaks JSON in both directions but returns untyped
//! [`serde_json::Value`]s: response shapes vary between server versions and
//! are folded into canonical types by [`crate::normalize`].

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ConnectionConfig, TokenHeader};
use crate::error::{ChromaError, Result};

/// Percent-encode one path segment.
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// JSON-over-HTTP transport bound to one server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Versioned API root, e.g. `http://localhost:8000/api/v2`.
    base_url: Url,
    /// Connection-pooled HTTP client.
    http: reqwest::Client,
    /// API key and the header it travels in.
    auth: Option<(TokenHeader, String)>,
    /// Per-request timeout.
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport from a connection config.
    ///
    /// # Errors
    ///
    /// Returns [`ChromaError::Validation`] for an unusable address, or
    /// [`ChromaError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let timeout = config.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ChromaError::Network)?;
        let auth = config
            .api_key
            .as_ref()
            .map(|key| (config.token_header, key.clone()));

        Ok(Self {
            base_url,
            http,
            auth,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for `path`, which must start with `/` and have its
    /// user-supplied segments encoded already.
    fn url(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| ChromaError::Validation(format!("Invalid request path '{path}': {e}")))
    }

    fn apply_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            None => builder,
            Some((TokenHeader::ChromaToken, key)) => builder.header("x-chroma-token", key.as_str()),
            Some((TokenHeader::Bearer, key)) => builder.header(AUTHORIZATION, format!("Bearer {key}")),
        }
    }

    /// Readiness check: `GET /version`.
    pub async fn version(&self) -> Result<Value> {
        self.get("/version").await
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send::<()>(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send::<()>(Method::DELETE, path, None).await
    }

    async fn send<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value> {
        let url = self.url(path)?;
        debug!(%method, %url, "chroma request");

        let mut builder = self.apply_auth(self.http.request(method, url));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ChromaError::Timeout(self.timeout.as_millis() as u64)
            } else {
                ChromaError::Network(e)
            }
        })?;

        Self::handle_response(response).await
    }

    // -- Response handling --------------------------------------------------

    /// Decode a successful response, or turn a failed one into an error.
    ///
    /// JSON bodies are parsed; any other body comes back as a string value,
    /// and an empty body as `null`.
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::extract_error(response).await);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        let body = response.text().await.map_err(ChromaError::Network)?;

        if body.trim().is_empty() {
            Ok(Value::Null)
        } else if is_json {
            serde_json::from_str(&body).map_err(ChromaError::Serialization)
        } else {
            Ok(Value::String(body))
        }
    }

    /// Map a non-2xx response onto the matching [`ChromaError`] variant.
    async fn extract_error(response: reqwest::Response) -> ChromaError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);

        match status {
            404 => ChromaError::NotFound(message),
            401 | 403 => ChromaError::Unauthorized(message),
            409 => ChromaError::Conflict(message),
            _ => ChromaError::Server { status, message },
        }
    }
}

/// Human-readable message from an error body: its JSON `message` or `error`
/// field, else the raw text, else `HTTP <status>`.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(msg)) = obj.get(key) {
                return msg.clone();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("my tenant"), "my%20tenant");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
        assert_eq!(segment("plain_name-1.0~"), "plain_name-1.0~");
    }

    #[test]
    fn test_url_joins_under_api_prefix() {
        let transport = HttpTransport::new(&ConnectionConfig::default()).unwrap();
        let url = transport.url("/tenants/t%20x/databases").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v2/tenants/t%20x/databases");
    }

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(error_message(500, r#"{"message":"bad"}"#), "bad");
        assert_eq!(error_message(409, r#"{"error":"exists"}"#), "exists");
        assert_eq!(error_message(502, "gateway down"), "gateway down");
        assert_eq!(error_message(503, "   "), "HTTP 503");
    }
}
