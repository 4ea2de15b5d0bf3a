// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-process stand-in for a Chroma server.
//!
//! Serves canned JSON replies keyed by (method, path) and records every
//! request it receives so tests can assert on paths, headers and bodies.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use chroma_client::{ChromaClient, ConnectionConfig};

/// A request as the fake server saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    /// Raw (still percent-encoded) path.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Default)]
struct Routes {
    replies: HashMap<(Method, String), (StatusCode, Value)>,
    log: Vec<Captured>,
}

type Shared = Arc<Mutex<Routes>>;

#[derive(Clone)]
pub struct FakeChroma {
    addr: SocketAddr,
    routes: Shared,
}

impl FakeChroma {
    /// Start a server on an ephemeral port that answers the readiness check.
    pub async fn start() -> Self {
        let routes: Shared = Arc::new(Mutex::new(Routes::default()));
        let app = Router::new().fallback(handle).with_state(routes.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let fake = Self { addr, routes };
        fake.ok(Method::GET, "/api/v2/version", json!("1.0.0"));
        fake
    }

    pub fn config(&self) -> ConnectionConfig {
        ConnectionConfig::new("127.0.0.1", self.addr.port())
    }

    /// A client already connected to this server.
    pub async fn client(&self) -> ChromaClient {
        let client = ChromaClient::new();
        assert!(client.connect(self.config()).await, "fake server should answer the version check");
        client
    }

    pub fn reply(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .replies
            .insert((method, path.to_string()), (status, body));
    }

    pub fn ok(&self, method: Method, path: &str, body: Value) {
        self.reply(method, path, StatusCode::OK, body);
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.routes.lock().unwrap().log.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Captured> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }
}

async fn handle(
    State(routes): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();

    let mut routes = routes.lock().unwrap();
    routes.log.push(Captured {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    match routes.replies.get(&(method, path)) {
        Some((status, reply)) => (*status, Json(reply.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "no such route" }))).into_response(),
    }
}

/// A port nothing is listening on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
