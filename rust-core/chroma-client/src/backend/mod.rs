// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//
// Storage backend abstraction for the data-access client.
//
// `StorageBackend` is the one contract both data sources satisfy: the
// in-process mirror used while disconnected, and the remote Chroma service.
// The client picks a backend per call based on connection state and never
// branches on it anywhere else.
//
// The signatures encode the error policy. Reads return plain values and
// absorb failures into empty/default results; writes return `Result` so
// callers learn whether an intentional mutation succeeded.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{CollectionSummary, QueryRequest, Record, RecordInput, RecordPatch};

pub mod mirror;
pub mod remote;

pub use mirror::{LocalMirror, MirrorBackend};
pub use remote::RemoteBackend;

/// A source of tenants, databases, collections and records.
///
/// Implementations must be safe to share across tokio tasks.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// A short name for this backend, used in logs.
    fn name(&self) -> &str;

    // ===== Tenants =====

    async fn list_tenants(&self) -> Vec<String>;

    async fn create_tenant(&self, name: &str) -> Result<()>;

    async fn delete_tenant(&self, name: &str) -> Result<()>;

    // ===== Databases =====

    async fn list_databases(&self, tenant: &str) -> Vec<String>;

    async fn create_database(&self, tenant: &str, name: &str) -> Result<()>;

    async fn delete_database(&self, tenant: &str, name: &str) -> Result<()>;

    // ===== Collections =====

    async fn list_collections(&self, tenant: &str, database: &str) -> Vec<CollectionSummary>;

    /// Translate a collection name (or id) into the id the backend addresses
    /// it by. Returns the input unchanged when no match is found.
    async fn resolve_collection_id(&self, tenant: &str, database: &str, collection: &str) -> String;

    async fn create_collection(&self, tenant: &str, database: &str, name: &str) -> Result<()>;

    async fn delete_collection(&self, tenant: &str, database: &str, collection: &str) -> Result<()>;

    async fn rename_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        new_name: &str,
    ) -> Result<()>;

    // ===== Records =====

    /// One page of records, `limit` long starting at `offset`.
    async fn list_records(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<Record>;

    /// Add a record and return its id (generated when the input has none).
    async fn add_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        input: RecordInput,
    ) -> Result<String>;

    /// `None` means the record does not exist or could not be read.
    async fn get_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Option<Record>;

    /// Apply a partial update. `Ok(false)` means no record had that id.
    async fn update_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        patch: RecordPatch,
    ) -> Result<bool>;

    async fn delete_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Result<()>;

    // ===== Query =====

    /// Similarity query. The result is passed through uninterpreted.
    async fn query_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        query: QueryRequest,
    ) -> Value;
}

/// Generate a record id: `id_` + base-36 millisecond timestamp + 8 random
/// hex characters.
pub fn generate_record_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("id_{}{}", to_base36(millis), &random[..8])
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// The id to store for `input`: its own when non-empty, else a fresh one.
pub(crate) fn record_id_for(input: &RecordInput) -> String {
    match input.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_record_id(),
    }
}
