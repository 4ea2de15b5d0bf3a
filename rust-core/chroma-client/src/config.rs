// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Connection configuration for a Chroma server.
//!
//! A [`ConnectionConfig`] is immutable for the duration of one connection
//! attempt. [`crate::client::ChromaClient::connect`] replaces the active
//! config wholesale; nothing mutates it afterwards.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChromaError, Result};

/// Tenant used when none is configured.
pub const DEFAULT_TENANT: &str = "default_tenant";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "default_database";

/// Path prefix of the versioned REST API.
pub const API_PREFIX: &str = "/api/v2";

/// Header used to carry the API key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenHeader {
    /// `x-chroma-token: <key>`
    #[default]
    ChromaToken,
    /// `Authorization: Bearer <key>`
    Bearer,
}

/// Parameters for connecting to a Chroma server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Hostname, IP, or a full `http(s)://` URL.
    pub host: String,
    /// TCP port. Ignored when `host` already carries a scheme.
    pub port: Option<u16>,
    /// Use `https` when deriving the URL from `host`/`port`.
    pub use_tls: bool,
    /// Active tenant for this session.
    pub tenant: String,
    /// Active database for this session.
    pub database: String,
    /// Optional API key.
    pub api_key: Option<String>,
    /// Header the API key is sent in.
    pub token_header: TokenHeader,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ConnectionConfig {
    /// Config for `host:port` with every other field defaulted.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: Some(port),
            ..Self::default()
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_token_header(mut self, header: TokenHeader) -> Self {
        self.token_header = header;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build a config from `CHROMA_*` environment variables.
    ///
    /// Unset or unparsable variables fall back to [`Default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("CHROMA_HOST").unwrap_or(defaults.host);
        let port = std::env::var("CHROMA_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .or(defaults.port);
        let use_tls = std::env::var("CHROMA_SSL")
            .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.use_tls);
        let tenant = std::env::var("CHROMA_TENANT").unwrap_or(defaults.tenant);
        let database = std::env::var("CHROMA_DATABASE").unwrap_or(defaults.database);
        let api_key = std::env::var("CHROMA_API_KEY").ok().filter(|k| !k.is_empty());
        let timeout_secs = std::env::var("CHROMA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            host,
            port,
            use_tls,
            tenant,
            database,
            api_key,
            token_header: defaults.token_header,
            timeout_secs,
        }
    }

    /// Per-request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL of the versioned API, e.g. `http://localhost:8000/api/v2`.
    ///
    /// # Errors
    ///
    /// Returns [`ChromaError::Validation`] if the result is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim();
        let origin = if host.starts_with("http") {
            host.to_string()
        } else {
            let scheme = if self.use_tls { "https" } else { "http" };
            match self.port {
                Some(port) => format!("{scheme}://{host}:{port}"),
                None => format!("{scheme}://{host}"),
            }
        };
        let origin = origin.trim_end_matches('/');

        Url::parse(&format!("{origin}{API_PREFIX}"))
            .map_err(|e| ChromaError::Validation(format!("Invalid server address '{host}': {e}")))
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: Some(8000),
            use_tls: false,
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            api_key: None,
            token_header: TokenHeader::ChromaToken,
            timeout_secs: 30,
        }
    }
}
