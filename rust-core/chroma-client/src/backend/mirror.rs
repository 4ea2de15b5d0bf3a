// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//
// In-process mirror backend.
//
// Holds a complete Tenant -> Database -> Collection -> Record tree in a tokio
// `RwLock`. Used whenever the client is not connected. Every mutation is
// applied under the write lock before the call returns, so the next read
// observes it. Nothing is persisted; the tree is lost on drop.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::debug;

use super::{record_id_for, StorageBackend};
use crate::config::{DEFAULT_DATABASE, DEFAULT_TENANT};
use crate::error::{ChromaError, Result};
use crate::types::{
    embedding_or_placeholder, Collection, CollectionSummary, Database, Metadata, QueryRequest,
    Record, RecordInput, RecordPatch, Tenant,
};

/// Name of the collection in the demonstration tree.
pub const DEMO_COLLECTION: &str = "example_collection";

/// Index of the entry named `wanted`, or of the first entry if none matches.
fn position_or_first<T>(items: &[T], wanted: &str, name: impl Fn(&T) -> &str) -> Option<usize> {
    items
        .iter()
        .position(|item| name(item) == wanted)
        .or(if items.is_empty() { None } else { Some(0) })
}

/// The fallback tree: tenants, databases, collections and records.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMirror {
    pub tenants: Vec<Tenant>,
}

impl LocalMirror {
    /// An empty tree.
    pub fn empty() -> Self {
        Self {
            tenants: Vec::new(),
        }
    }

    /// The demonstration tree: `default_tenant` / `default_database` /
    /// `example_collection` holding three records.
    pub fn seeded() -> Self {
        let demo = |id: &str, document: &str, embedding: [f32; 2]| {
            let mut metadata = Metadata::new();
            metadata.insert("source".to_string(), json!("demo"));
            Record {
                id: id.to_string(),
                document: Some(document.to_string()),
                metadata,
                embedding: embedding.to_vec(),
            }
        };

        let mut collection = Collection::new(DEMO_COLLECTION);
        collection.records = vec![
            demo("r1", "Hello world", [0.1, 0.2]),
            demo("r2", "Sample doc", [0.3, 0.4]),
            demo("r3", "Another doc", [0.5, 0.6]),
        ];
        let mut database = Database::new(DEFAULT_DATABASE);
        database.collections.push(collection);
        let mut tenant = Tenant::new(DEFAULT_TENANT);
        tenant.databases.push(database);

        Self {
            tenants: vec![tenant],
        }
    }

    // -- Lookup -------------------------------------------------------------
    //
    // Listing and creation fall back to the first tenant/database when the
    // named one is missing. Every other write requires an exact parent.
    // Collections resolve id-first, then by name.

    pub fn tenant(&self, name: &str) -> Option<&Tenant> {
        let idx = position_or_first(&self.tenants, name, |t| t.name.as_str())?;
        self.tenants.get(idx)
    }

    fn tenant_mut(&mut self, name: &str) -> Option<&mut Tenant> {
        let idx = position_or_first(&self.tenants, name, |t| t.name.as_str())?;
        self.tenants.get_mut(idx)
    }

    fn exact_tenant_mut(&mut self, name: &str) -> Option<&mut Tenant> {
        self.tenants.iter_mut().find(|t| t.name == name)
    }

    pub fn database(&self, tenant: &str, database: &str) -> Option<&Database> {
        let tenant = self.tenant(tenant)?;
        let idx = position_or_first(&tenant.databases, database, |d| d.name.as_str())?;
        tenant.databases.get(idx)
    }

    fn database_mut(&mut self, tenant: &str, database: &str) -> Option<&mut Database> {
        let tenant = self.tenant_mut(tenant)?;
        let idx = position_or_first(&tenant.databases, database, |d| d.name.as_str())?;
        tenant.databases.get_mut(idx)
    }

    fn exact_database_mut(&mut self, tenant: &str, database: &str) -> Option<&mut Database> {
        self.exact_tenant_mut(tenant)?
            .databases
            .iter_mut()
            .find(|d| d.name == database)
    }

    pub fn collection(&self, tenant: &str, database: &str, collection: &str) -> Option<&Collection> {
        let collections = &self.database(tenant, database)?.collections;
        collections.get(collection_position(collections, collection)?)
    }

    fn exact_collection_mut(
        &mut self,
        tenant: &str,
        database: &str,
        collection: &str,
    ) -> Option<&mut Collection> {
        let collections = &mut self.exact_database_mut(tenant, database)?.collections;
        let idx = collection_position(collections, collection)?;
        collections.get_mut(idx)
    }

    fn require_collection(
        &mut self,
        tenant: &str,
        database: &str,
        collection: &str,
    ) -> Result<&mut Collection> {
        self.exact_collection_mut(tenant, database, collection)
            .ok_or_else(|| ChromaError::NotFound(format!("collection '{collection}'")))
    }
}

/// Index of the collection with id `wanted`, else the one named `wanted`.
fn collection_position(collections: &[Collection], wanted: &str) -> Option<usize> {
    collections
        .iter()
        .position(|c| c.server_id == wanted)
        .or_else(|| collections.iter().position(|c| c.name == wanted))
}

/// True if `name` already names or identifies a collection other than the
/// one at `except`. Names and ids share one namespace so that every string
/// resolves to at most one collection.
fn collection_name_taken(collections: &[Collection], name: &str, except: Option<usize>) -> bool {
    collections
        .iter()
        .enumerate()
        .any(|(i, c)| Some(i) != except && c.matches(name))
}

impl Default for LocalMirror {
    fn default() -> Self {
        Self::seeded()
    }
}

/// [`StorageBackend`] over a shared [`LocalMirror`].
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MirrorBackend {
    mirror: Arc<RwLock<LocalMirror>>,
}

impl MirrorBackend {
    /// A backend over the demonstration tree.
    pub fn new() -> Self {
        Self::with_mirror(LocalMirror::seeded())
    }

    pub fn with_mirror(mirror: LocalMirror) -> Self {
        Self {
            mirror: Arc::new(RwLock::new(mirror)),
        }
    }

    /// A copy of the current tree.
    pub async fn snapshot(&self) -> LocalMirror {
        self.mirror.read().await.clone()
    }
}

impl Default for MirrorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MirrorBackend {
    fn name(&self) -> &str {
        "mirror"
    }

    async fn list_tenants(&self) -> Vec<String> {
        let mirror = self.mirror.read().await;
        mirror.tenants.iter().map(|t| t.name.clone()).collect()
    }

    async fn create_tenant(&self, name: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        if mirror.tenants.iter().any(|t| t.name == name) {
            return Err(ChromaError::Conflict(format!("tenant '{name}' already exists")));
        }
        mirror.tenants.push(Tenant::new(name));
        debug!(tenant = name, "mirror: tenant created");
        Ok(())
    }

    async fn delete_tenant(&self, name: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        mirror.tenants.retain(|t| t.name != name);
        Ok(())
    }

    async fn list_databases(&self, tenant: &str) -> Vec<String> {
        let mirror = self.mirror.read().await;
        mirror
            .tenant(tenant)
            .map(|t| t.databases.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default()
    }

    async fn create_database(&self, tenant: &str, name: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        let owner = mirror
            .tenant_mut(tenant)
            .ok_or_else(|| ChromaError::NotFound(format!("tenant '{tenant}'")))?;
        if owner.databases.iter().any(|d| d.name == name) {
            return Err(ChromaError::Conflict(format!("database '{name}' already exists")));
        }
        owner.databases.push(Database::new(name));
        Ok(())
    }

    async fn delete_database(&self, tenant: &str, name: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        if let Some(owner) = mirror.exact_tenant_mut(tenant) {
            owner.databases.retain(|d| d.name != name);
        }
        Ok(())
    }

    async fn list_collections(&self, tenant: &str, database: &str) -> Vec<CollectionSummary> {
        let mirror = self.mirror.read().await;
        mirror
            .database(tenant, database)
            .map(|d| d.collections.iter().map(Collection::summary).collect())
            .unwrap_or_default()
    }

    async fn resolve_collection_id(&self, _tenant: &str, _database: &str, collection: &str) -> String {
        // Names are authoritative in the mirror.
        collection.to_string()
    }

    async fn create_collection(&self, tenant: &str, database: &str, name: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        let owner = mirror
            .database_mut(tenant, database)
            .ok_or_else(|| ChromaError::NotFound(format!("database '{database}'")))?;
        if collection_name_taken(&owner.collections, name, None) {
            return Err(ChromaError::Conflict(format!("collection '{name}' already exists")));
        }
        owner.collections.push(Collection::new(name));
        debug!(collection = name, "mirror: collection created");
        Ok(())
    }

    async fn delete_collection(&self, tenant: &str, database: &str, collection: &str) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        if let Some(owner) = mirror.exact_database_mut(tenant, database) {
            if let Some(idx) = collection_position(&owner.collections, collection) {
                owner.collections.remove(idx);
            }
        }
        Ok(())
    }

    async fn rename_collection(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        new_name: &str,
    ) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        let owner = mirror
            .exact_database_mut(tenant, database)
            .ok_or_else(|| ChromaError::NotFound(format!("database '{database}'")))?;
        let idx = collection_position(&owner.collections, collection)
            .ok_or_else(|| ChromaError::NotFound(format!("collection '{collection}'")))?;
        if collection_name_taken(&owner.collections, new_name, Some(idx)) {
            return Err(ChromaError::Conflict(format!("collection '{new_name}' already exists")));
        }
        owner.collections[idx].name = new_name.to_string();
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
        let mirror = self.mirror.read().await;
        mirror
            .collection(tenant, database, collection)
            .map(|c| c.records.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default()
    }

    async fn add_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        input: RecordInput,
    ) -> Result<String> {
        let mut mirror = self.mirror.write().await;
        let target = mirror.require_collection(tenant, database, collection)?;
        let id = record_id_for(&input);
        if target.records.iter().any(|r| r.id == id) {
            return Err(ChromaError::Conflict(format!("record '{id}' already exists")));
        }
        target.records.push(Record {
            id: id.clone(),
            document: Some(input.document.unwrap_or_default()),
            metadata: input.metadata.unwrap_or_default(),
            embedding: embedding_or_placeholder(input.embedding),
        });
        Ok(id)
    }

    async fn get_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Option<Record> {
        let mirror = self.mirror.read().await;
        mirror
            .collection(tenant, database, collection)?
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    async fn update_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        patch: RecordPatch,
    ) -> Result<bool> {
        let mut mirror = self.mirror.write().await;
        let target = mirror.require_collection(tenant, database, collection)?;
        match target.records.iter_mut().find(|r| r.id == patch.id) {
            Some(record) => {
                patch.apply(record);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_record(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        id: &str,
    ) -> Result<()> {
        let mut mirror = self.mirror.write().await;
        if let Some(target) = mirror.exact_collection_mut(tenant, database, collection) {
            target.records.retain(|r| r.id != id);
        }
        Ok(())
    }

    async fn query_collection(
        &self,
        _tenant: &str,
        _database: &str,
        _collection: &str,
        _query: QueryRequest,
    ) -> Value {
        // Similarity search is not emulated locally.
        Value::Array(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: &str = DEFAULT_TENANT;
    const D: &str = DEFAULT_DATABASE;

    #[tokio::test]
    async fn test_seeded_tree() {
        let backend = MirrorBackend::new();
        assert_eq!(backend.list_tenants().await, vec!["default_tenant"]);
        assert_eq!(backend.list_databases(T).await, vec!["default_database"]);

        let collections = backend.list_collections(T, D).await;
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, DEMO_COLLECTION);
        assert_eq!(collections[0].count, 3);
    }

    #[tokio::test]
    async fn test_unknown_tenant_falls_back_to_first() {
        let backend = MirrorBackend::new();
        assert_eq!(backend.list_databases("nope").await, vec!["default_database"]);
        assert_eq!(backend.list_collections("nope", "nada").await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_mirror_lists_nothing() {
        let backend = MirrorBackend::with_mirror(LocalMirror::empty());
        assert!(backend.list_tenants().await.is_empty());
        assert!(backend.list_databases(T).await.is_empty());
        assert!(backend.list_collections(T, D).await.is_empty());
        assert!(matches!(
            backend.create_database(T, "db").await,
            Err(ChromaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_pagination() {
        let backend = MirrorBackend::new();
        let page = backend.list_records(T, D, DEMO_COLLECTION, 2, 1).await;
        let ids: Vec<_> = page.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3"]);
        assert!(backend.list_records(T, D, DEMO_COLLECTION, 10, 5).await.is_empty());
        assert!(backend.list_records(T, D, "missing", 10, 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_creation_conflicts() {
        let backend = MirrorBackend::new();
        assert!(matches!(
            backend.create_tenant(T).await,
            Err(ChromaError::Conflict(_))
        ));
        assert!(matches!(
            backend.create_collection(T, D, DEMO_COLLECTION).await,
            Err(ChromaError::Conflict(_))
        ));
        let dup = RecordInput::default().with_id("r1");
        assert!(matches!(
            backend.add_record(T, D, DEMO_COLLECTION, dup).await,
            Err(ChromaError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_keeps_id_and_records() {
        let backend = MirrorBackend::new();
        backend
            .rename_collection(T, D, DEMO_COLLECTION, "renamed")
            .await
            .unwrap();

        let collections = backend.list_collections(T, D).await;
        assert_eq!(collections[0].name, "renamed");
        assert_eq!(collections[0].id, DEMO_COLLECTION);
        assert_eq!(backend.list_records(T, D, "renamed", 10, 0).await.len(), 3);
    }

    #[tokio::test]
    async fn test_recreating_a_renamed_name_conflicts_with_its_id() {
        let backend = MirrorBackend::new();
        backend
            .rename_collection(T, D, DEMO_COLLECTION, "renamed")
            .await
            .unwrap();

        // "example_collection" is still the renamed collection's id.
        assert!(matches!(
            backend.create_collection(T, D, DEMO_COLLECTION).await,
            Err(ChromaError::Conflict(_))
        ));

        backend.create_collection(T, D, "fresh").await.unwrap();
        backend
            .add_record(T, D, "fresh", RecordInput::default().with_id("f1"))
            .await
            .unwrap();
        assert_eq!(backend.list_records(T, D, "renamed", 10, 0).await.len(), 3);
        assert_eq!(backend.list_records(T, D, "fresh", 10, 0).await.len(), 1);

        backend.delete_collection(T, D, DEMO_COLLECTION).await.unwrap();
        let left: Vec<_> = backend
            .list_collections(T, D)
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(left, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_rename_onto_another_id_conflicts() {
        let backend = MirrorBackend::new();
        backend
            .rename_collection(T, D, DEMO_COLLECTION, "renamed")
            .await
            .unwrap();
        backend.create_collection(T, D, "other").await.unwrap();

        assert!(matches!(
            backend.rename_collection(T, D, "other", DEMO_COLLECTION).await,
            Err(ChromaError::Conflict(_))
        ));
        // Renaming a collection back to its own id is fine.
        backend
            .rename_collection(T, D, "renamed", DEMO_COLLECTION)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_destructive_writes_need_exact_parents() {
        let backend = MirrorBackend::new();

        backend
            .delete_collection("typo_tenant", "typo_db", DEMO_COLLECTION)
            .await
            .unwrap();
        backend.delete_database("typo_tenant", D).await.unwrap();
        backend
            .delete_record(T, "typo_db", DEMO_COLLECTION, "r1")
            .await
            .unwrap();
        assert_eq!(backend.list_databases(T).await, vec![D]);
        assert_eq!(backend.list_records(T, D, DEMO_COLLECTION, 10, 0).await.len(), 3);

        assert!(matches!(
            backend.rename_collection("typo_tenant", D, DEMO_COLLECTION, "x").await,
            Err(ChromaError::NotFound(_))
        ));
        assert!(matches!(
            backend
                .add_record(T, "typo_db", DEMO_COLLECTION, RecordInput::default())
                .await,
            Err(ChromaError::NotFound(_))
        ));
        assert!(matches!(
            backend
                .update_record("typo_tenant", D, DEMO_COLLECTION, RecordPatch::new("r1").with_document("x"))
                .await,
            Err(ChromaError::NotFound(_))
        ));
        let r1 = backend.get_record(T, D, DEMO_COLLECTION, "r1").await.unwrap();
        assert_eq!(r1.document.as_deref(), Some("Hello world"));
    }

    #[tokio::test]
    async fn test_creation_still_falls_back_to_first_parent() {
        let backend = MirrorBackend::new();
        backend.create_collection("nope", "nada", "docs").await.unwrap();
        let names: Vec<_> = backend
            .list_collections(T, D)
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec![DEMO_COLLECTION, "docs"]);
    }

    #[tokio::test]
    async fn test_rename_missing_collection() {
        let backend = MirrorBackend::new();
        assert!(matches!(
            backend.rename_collection(T, D, "ghost", "x").await,
            Err(ChromaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_add_into_missing_collection() {
        let backend = MirrorBackend::new();
        let result = backend
            .add_record(T, D, "ghost", RecordInput::default())
            .await;
        assert!(matches!(result, Err(ChromaError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_missing_record_reports_false() {
        let backend = MirrorBackend::new();
        let patch = RecordPatch::new("nope").with_document("x");
        assert!(!backend.update_record(T, D, DEMO_COLLECTION, patch).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_is_empty() {
        let backend = MirrorBackend::new();
        let result = backend
            .query_collection(T, D, DEMO_COLLECTION, QueryRequest::texts(["hello"]))
            .await;
        assert_eq!(result, json!([]));
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let backend = MirrorBackend::new();
        let clone = backend.clone();
        backend.create_tenant("other").await.unwrap();
        assert_eq!(clone.list_tenants().await.len(), 2);
        assert_eq!(clone.snapshot().await.tenants[1].name, "other");
    }
}
