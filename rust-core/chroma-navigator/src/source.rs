// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//
// The data the navigator reads through.
//
// `HierarchySource` is the narrow slice of the data-access client the
// navigator depends on. `ChromaClient` implements it directly; tests plug in
// sources that stall or fail on purpose.

use async_trait::async_trait;
use chroma_client::{ChromaClient, CollectionSummary, Record, Result};

#[async_trait]
pub trait HierarchySource: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Tenant shown at the root while connected.
    fn active_tenant(&self) -> String;

    async fn list_databases(&self, tenant: &str) -> Result<Vec<String>>;

    async fn list_collections(&self, tenant: &str, database: &str) -> Result<Vec<CollectionSummary>>;

    async fn list_records(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>>;
}

// The client absorbs read failures itself, so these never return `Err`.
#[async_trait]
impl HierarchySource for ChromaClient {
    fn is_connected(&self) -> bool {
        ChromaClient::is_connected(self)
    }

    fn active_tenant(&self) -> String {
        self.config().tenant
    }

    async fn list_databases(&self, tenant: &str) -> Result<Vec<String>> {
        Ok(ChromaClient::list_databases(self, tenant).await)
    }

    async fn list_collections(&self, tenant: &str, database: &str) -> Result<Vec<CollectionSummary>> {
        Ok(ChromaClient::list_collections(self, tenant, database).await)
    }

    async fn list_records(
        &self,
        tenant: &str,
        database: &str,
        collection: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>> {
        Ok(ChromaClient::list_records(self, tenant, database, collection, limit, offset).await)
    }
}
