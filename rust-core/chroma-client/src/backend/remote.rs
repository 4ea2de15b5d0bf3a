// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//
// Remote backend over the Chroma REST API.
//
// Every operation that addresses an existing collection resolves the
// caller's collection name to the server-assigned id first; the service
// answers 404 for names. Reads log and swallow failures; writes propagate
// them.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::{record_id_for, StorageBackend};
use crate::error::Result;
use crate::normalize;
use crate::transport::{segment, HttpTransport};
use crate::types::{
    embedding_or_placeholder, CollectionSummary, Metadata, QueryRequest, Record, RecordInput,
    RecordPatch, DEFAULT_N_RESULTS,
};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NameBody<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameBody<'a> {
    new_name: &'a str,
}

/// Body of `/get`: either a page (`limit`/`offset`) or specific `ids`.
#[derive(Debug, Serialize)]
struct GetBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    ids: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<usize>,
    include: [&'static str; 3],
}

const RECORD_FIELDS: [&str; 3] = ["documents", "metadatas", "embeddings"];

#[derive(Debug, Serialize)]
struct AddBody {
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<Metadata>,
    embeddings: Vec<Vec<f32>>,
}

/// Body of `/update`. Absent fields are omitted so the service leaves them
/// untouched.
#[derive(Debug, Serialize)]
struct UpdateBody {
    ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadatas: Option<Vec<Metadata>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embeddings: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct QueryBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    query_texts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query_embeddings: Option<Vec<Vec<f32>>>,
    n_results: usize,
    include: [&'static str; 3],
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

const TENANTS_PATH: &str = "/tenants";

fn tenant_path(tenant: &str) -> String {
    format!("/tenants/{}", segment(tenant))
}

fn databases_path(tenant: &str) -> String {
    format!("{}/databases", tenant_path(tenant))
}

fn database_path(tenant: &str, database: &str) -> String {
    format!("{}/{}", databases_path(tenant), segment(database))
}

fn collections_path(tenant: &str, database: &str) -> String {
    format!("{}/collections", database_path(tenant, database))
}

fn collection_path(tenant: &str, database: &str, collection_id: &str) -> String {
    format!("{}/{}", collections_path(tenant, database), segment(collection_id))
}

// ---------------------------------------------------------------------------
// RemoteBackend
// ---------------------------------------------------------------------------

/// [`StorageBackend`] talking to a live Chroma server.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    transport: HttpTransport,
}

impl RemoteBackend {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Path of a collection-scoped endpoint (`add`, `get`, ...) after
    /// resolving `collection` to its id.
    async fn resolved_path(&self, tenant: &str, database: &str, collection: &str, action: &str) -> String {
        let id = self.resolve_collection_id(tenant, database, collection).await;
        format!("{}/{action}", collection_path(tenant, database, &id))
    }
}

#[async_trait]
impl StorageBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list_tenants(&self) -> Vec<String> {
        match self.transport.get(TENANTS_PATH).await {
            Ok(json) => normalize::names(&json, "tenants"),
            Err(err) => {
                warn!(error = %err, "listing tenants failed");
                Vec::new()
            }
        }
    }

    async fn create_tenant(&self, name: &str) -> Result<()> {
        self.transport.post(TENANTS_PATH, &NameBody { name }).await?;
        Ok(())
    }

    async fn delete_tenant(&self, name: &str) -> Result<()> {
        self.transport.delete(&tenant_path(name)).await?;
        Ok(())
    }

    async fn list_databases(&self, tenant: &str) -> Vec<String> {
        match self.transport.get(&databases_path(tenant)).await {
            Ok(json) => normalize::names(&json, "databases"),
            Err(err) => {
                warn!(tenant, error = %err, "listing databases failed");
                Vec::new()
            }
        }
    }

    async fn create_database(&self, tenant: &str, name: &str) -> Result<()> {
        self.transport
            .post(&databases_path(tenant), &NameBody { name })
            .await?;
        Ok(())
    }

    async fn delete_database(&self, tenant: &str, name: &str) -> Result<()> {
        self.transport.delete(&database_path(tenant, name)).await?;
        Ok(())
    }

    async fn list_collections(&self, tenant: &str, database: &str) -> Vec<CollectionSummary> {
        match self.transport.get(&collections_path(tenant, database)).await {
            Ok(json) => normalize::collections(&json),
            Err(err) => {
                warn!(tenant, database, error = %err, "listing collections failed");
                Vec::new()
            }
        }
    }

    async fn resolve_collection_id(&self, tenant: &str, database: &str, collection: &str) -> String {
        match self.transport.get(&collections_path(tenant, database)).await {
            Ok(json) => normalize::find_collection_id(&normalize::collections(&json), collection)
                .unwrap_or_else(|| collection.to_string()),
            Err(err) => {
                warn!(collection, error = %err, "collection id resolution failed; using input");
                collection.to_string()
            }
        }
    }

    async fn create_collection(&self, tenant: &str, database: &str, name: &str) -> Result<()> {
        self.transport
            .post(&collections_path(tenant, database), &NameBody { name })
            .await?;
        Ok(())
    }

    async fn delete_collection(&self, tenant: &str, database: &str, collection: &str) -> Result<()> {
        let id = self.resolve_collection_id(tenant, database, collection).await;
        self.transport
            .delete(&collection_path(tenant, database, &id))
            .await?;
        Ok(())
    }

    async fn rename_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        new_name: &str,
    ) -> Result<()> {
        let id = self.resolve_collection_id(tenant, database, collection).await;
        self.transport
            .put(
                &collection_path(tenant, database, &id),
                &RenameBody { new_name },
            )
            .await?;
        Ok(())
    }

    async fn list_records(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Vec<Record> {
        let path = self.resolved_path(tenant, database, collection, "get").await;
        let body = GetBody {
            ids: None,
            limit: Some(limit),
            offset: Some(offset),
            include: RECORD_FIELDS,
        };
        match self.transport.post(&path, &body).await {
            Ok(json) => normalize::records(&json),
            Err(err) => {
                warn!(collection, error = %err, "listing records failed");
                Vec::new()
            }
        }
    }

    async fn add_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        input: RecordInput,
    ) -> Result<String> {
        let path = self.resolved_path(tenant, database, collection, "add").await;
        let id = record_id_for(&input);
        let body = AddBody {
            ids: vec![id.clone()],
            documents: vec![input.document.unwrap_or_default()],
            metadatas: vec![input.metadata.unwrap_or_default()],
            embeddings: vec![embedding_or_placeholder(input.embedding)],
        };
        self.transport.post(&path, &body).await?;
        Ok(id)
    }

    async fn get_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Option<Record> {
        let path = self.resolved_path(tenant, database, collection, "get").await;
        let body = GetBody {
            ids: Some(vec![id]),
            limit: None,
            offset: None,
            include: RECORD_FIELDS,
        };
        match self.transport.post(&path, &body).await {
            Ok(json) => normalize::first_record(&json),
            Err(err) => {
                warn!(collection, id, error = %err, "fetching record failed");
                None
            }
        }
    }

    async fn update_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        patch: RecordPatch,
    ) -> Result<bool> {
        let path = self.resolved_path(tenant, database, collection, "update").await;
        let body = UpdateBody {
            ids: vec![patch.id],
            documents: patch.document.map(|d| vec![d]),
            metadatas: patch.metadata.map(|m| vec![m]),
            embeddings: patch
                .embedding
                .map(|e| vec![embedding_or_placeholder(Some(e))]),
        };
        self.transport.post(&path, &body).await?;
        Ok(true)
    }

    async fn delete_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Result<()> {
        let path = self.resolved_path(tenant, database, collection, "delete").await;
        self.transport
            .post(&path, &DeleteBody { ids: vec![id] })
            .await?;
        Ok(())
    }

    async fn query_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        query: QueryRequest,
    ) -> Value {
        let path = self.resolved_path(tenant, database, collection, "query").await;
        let body = QueryBody {
            n_results: query.n_results.unwrap_or(DEFAULT_N_RESULTS),
            query_texts: query.query_texts,
            query_embeddings: query.query_embeddings,
            include: ["documents", "metadatas", "distances"],
        };
        match self.transport.post(&path, &body).await {
            Ok(json) => json,
            Err(err) => {
                warn!(collection, error = %err, "query failed");
                Value::Array(Vec::new())
            }
        }
    }
}
