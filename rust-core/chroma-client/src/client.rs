// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! The data-access client.
//!
//! [`ChromaClient`] presents one CRUD/list/query surface whether or not a
//! Chroma server is reachable. It owns the connection state and a local
//! mirror, and forwards every call to whichever [`StorageBackend`] the
//! current state selects:
//!
//! - disconnected: [`MirrorBackend`], an in-process copy of the hierarchy.
//! - connected: [`RemoteBackend`], the REST API.
//!
//! Connection state only changes through [`ChromaClient::connect`] and
//! [`ChromaClient::disconnect`]. A remote call failing later never flips the
//! client back to the mirror.
//!
//! Callers must not run `connect` concurrently with in-flight operations.
//! The state lock keeps memory safe, but an operation already dispatched to
//! one backend finishes there even if the state changes meanwhile.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::backend::{LocalMirror, MirrorBackend, RemoteBackend, StorageBackend};
use crate::config::ConnectionConfig;
use crate::error::Result;
use crate::transport::HttpTransport;
use crate::types::{CollectionSummary, QueryRequest, Record, RecordInput, RecordPatch};

/// Active configuration plus the remote backend, if connected.
#[derive(Debug)]
struct Session {
    config: ConnectionConfig,
    remote: Option<Arc<RemoteBackend>>,
}

/// Resilient Chroma data-access client.
///
/// # Examples
///
/// ```rust,no_run
/// use chroma_client::{ChromaClient, ConnectionConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let client = ChromaClient::new();
/// if !client.connect(ConnectionConfig::new("localhost", 8000)).await {
///     eprintln!("server unreachable, browsing the local mirror");
/// }
/// let tenants = client.list_tenants().await;
/// # let _ = tenants;
/// # }
/// ```
#[derive(Debug)]
pub struct ChromaClient {
    session: RwLock<Session>,
    mirror: Arc<MirrorBackend>,
}

impl ChromaClient {
    /// A disconnected client over the demonstration mirror.
    pub fn new() -> Self {
        Self::with_mirror(LocalMirror::seeded())
    }

    /// A disconnected client over the given mirror tree.
    pub fn with_mirror(mirror: LocalMirror) -> Self {
        Self {
            session: RwLock::new(Session {
                config: ConnectionConfig::default(),
                remote: None,
            }),
            mirror: Arc::new(MirrorBackend::with_mirror(mirror)),
        }
    }

    fn session(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_session(&self, config: ConnectionConfig, remote: Option<Arc<RemoteBackend>>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session { config, remote };
    }

    /// The backend selected by the current connection state.
    fn backend(&self) -> Arc<dyn StorageBackend> {
        match &self.session().remote {
            Some(remote) => remote.clone(),
            None => self.mirror.clone(),
        }
    }

    // -- Connection -----------------------------------------------------------

    /// Store `config` and ping the server's `/version` endpoint.
    ///
    /// Returns `true` and switches to the remote backend if the ping
    /// succeeds. On any failure returns `false` and falls back to the mirror;
    /// this never errors.
    pub async fn connect(&self, config: ConnectionConfig) -> bool {
        let transport = match HttpTransport::new(&config) {
            Ok(transport) => transport,
            Err(err) => {
                warn!(host = %config.host, error = %err, "invalid connection settings");
                self.replace_session(config, None);
                return false;
            }
        };

        match transport.version().await {
            Ok(version) => {
                info!(url = %transport.base_url(), %version, "connected to chroma");
                let remote = Arc::new(RemoteBackend::new(transport));
                self.replace_session(config, Some(remote));
                true
            }
            Err(err) => {
                warn!(url = %transport.base_url(), error = %err, "chroma unreachable; using local mirror");
                self.replace_session(config, None);
                false
            }
        }
    }

    /// Drop the remote backend and serve from the mirror again.
    pub fn disconnect(&self) {
        let config = self.config();
        self.replace_session(config, None);
        info!("disconnected; using local mirror");
    }

    pub fn is_connected(&self) -> bool {
        self.session().remote.is_some()
    }

    /// The configuration of the current (or last attempted) connection.
    pub fn config(&self) -> ConnectionConfig {
        self.session().config.clone()
    }

    /// Direct handle on the local mirror, regardless of connection state.
    pub fn mirror(&self) -> &MirrorBackend {
        &self.mirror
    }

    // -- Tenants --------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub async fn list_tenants(&self) -> Vec<String> {
        self.backend().list_tenants().await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_tenant(&self, name: &str) -> Result<()> {
        self.backend().create_tenant(name).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_tenant(&self, name: &str) -> Result<()> {
        self.backend().delete_tenant(name).await
    }

    // -- Databases ------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub async fn list_databases(&self, tenant: &str) -> Vec<String> {
        self.backend().list_databases(tenant).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_database(&self, tenant: &str, name: &str) -> Result<()> {
        self.backend().create_database(tenant, name).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_database(&self, tenant: &str, name: &str) -> Result<()> {
        self.backend().delete_database(tenant, name).await
    }

    // -- Collections ----------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub async fn list_collections(&self, tenant: &str, database: &str) -> Vec<CollectionSummary> {
        self.backend().list_collections(tenant, database).await
    }

    /// Translate a collection name into the id the server addresses it by.
    ///
    /// Disconnected, and whenever no match is found or the lookup fails, the
    /// input comes back unchanged. Resolving an id returns the same id.
    #[instrument(level = "debug", skip(self))]
    pub async fn resolve_collection_id(
        &self,
        tenant: &str,
        database: &str,
        collection_or_id: &str,
    ) -> String {
        self.backend()
            .resolve_collection_id(tenant, database, collection_or_id)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn create_collection(&self, tenant: &str, database: &str, name: &str) -> Result<()> {
        self.backend().create_collection(tenant, database, name).await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_collection(&self, tenant: &str, database: &str, name: &str) -> Result<()> {
        self.backend().delete_collection(tenant, database, name).await
    }

    /// Rename a collection.
    ///
    /// Some server versions acknowledge the rename without changing the
    /// listed name; both outcomes count as success here.
    #[instrument(level = "debug", skip(self))]
    pub async fn rename_collection(
        &self,
        tenant: &str,
        database: &str,
        name: &str,
        new_name: &str,
    ) -> Result<()> {
        self.backend()
            .rename_collection(tenant, database, name, new_name)
            .await
    }

    // -- Records --------------------------------------------------------------

    #[instrument(level = "debug", skip(self))]
    pub async fn list_records(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<Record> {
        self.backend()
            .list_records(tenant, database, collection, limit, offset)
            .await
    }

    /// Add a record, returning its id.
    #[instrument(level = "debug", skip(self))]
    pub async fn add_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        input: RecordInput,
    ) -> Result<String> {
        self.backend()
            .add_record(tenant, database, collection, input)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Option<Record> {
        self.backend()
            .get_record(tenant, database, collection, id)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn update_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        patch: RecordPatch,
    ) -> Result<bool> {
        self.backend()
            .update_record(tenant, database, collection, patch)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn delete_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Result<()> {
        self.backend()
            .delete_record(tenant, database, collection, id)
            .await
    }

    // -- Query ----------------------------------------------------------------

    /// Similarity query. Disconnected, or on failure, yields an empty array.
    #[instrument(level = "debug", skip(self))]
    pub async fn query_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        query: QueryRequest,
    ) -> Value {
        self.backend()
            .query_collection(tenant, database, collection, query)
            .await
    }
}

impl Default for ChromaClient {
    fn default() -> Self {
        Self::new()
    }
}
