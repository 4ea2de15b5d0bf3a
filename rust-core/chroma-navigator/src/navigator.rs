// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Lazy hierarchy expansion.
//!
//! [`HierarchyNavigator::expand`] produces the children of one node at a
//! time. Every call into the source is bounded by
//! [`NavigatorConfig::timeout`]; a failure or timeout becomes a single
//! [`Node::Error`] child instead of an error, so one broken branch never
//! takes down the rest of the tree.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::bounded::bounded;
use crate::error::NavigatorError;
use crate::node::Node;
use crate::source::HierarchySource;

/// Default bound on a single expansion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of records materialized when a collection is expanded.
pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorConfig {
    pub timeout: Duration,
    /// Only the first page of records is shown.
    pub page_size: usize,
}

impl NavigatorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct HierarchyNavigator<S: ?Sized> {
    source: Arc<S>,
    config: NavigatorConfig,
}

impl<S: HierarchySource + ?Sized> HierarchyNavigator<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_config(source, NavigatorConfig::default())
    }

    pub fn with_config(source: Arc<S>, config: NavigatorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Children of `node`, or the root level when `node` is `None`.
    ///
    /// Never fails: errors come back as a single error node. Leaves and
    /// placeholders have no children.
    pub async fn expand(&self, node: Option<&Node>) -> Vec<Node> {
        let Some(node) = node else {
            return self.roots();
        };
        match self.children(node).await {
            Ok(children) => {
                debug!(parent = %node.label(), count = children.len(), "expanded");
                children
            }
            Err(err) => {
                warn!(parent = %node.label(), error = %err, "expansion failed");
                vec![Node::error(err.to_string())]
            }
        }
    }

    fn roots(&self) -> Vec<Node> {
        if self.source.is_connected() {
            vec![Node::Tenant {
                name: self.source.active_tenant(),
            }]
        } else {
            vec![Node::NotConnected]
        }
    }

    async fn children(&self, node: &Node) -> Result<Vec<Node>, NavigatorError> {
        let limit = self.config.timeout;
        match node {
            Node::Tenant { name } => {
                let what = "listing databases";
                let databases = bounded(what, limit, self.source.list_databases(name))
                    .await?
                    .map_err(|source| NavigatorError::Source { what, source })?;
                Ok(databases
                    .into_iter()
                    .map(|database| Node::Database {
                        tenant: name.clone(),
                        name: database,
                    })
                    .collect())
            }
            Node::Database { tenant, name } => {
                let what = "listing collections";
                let collections = bounded(what, limit, self.source.list_collections(tenant, name))
                    .await?
                    .map_err(|source| NavigatorError::Source { what, source })?;
                Ok(collections
                    .into_iter()
                    .map(|c| Node::Collection {
                        tenant: tenant.clone(),
                        database: name.clone(),
                        name: c.name,
                        count: c.count,
                    })
                    .collect())
            }
            Node::Collection {
                tenant,
                database,
                name,
                ..
            } => {
                let what = "listing records";
                let page = self
                    .source
                    .list_records(tenant, database, name, self.config.page_size, 0);
                let records = bounded(what, limit, page)
                    .await?
                    .map_err(|source| NavigatorError::Source { what, source })?;
                Ok(records
                    .into_iter()
                    .map(|r| Node::Record {
                        tenant: tenant.clone(),
                        database: database.clone(),
                        collection: name.clone(),
                        id: r.id,
                        document: r.document,
                    })
                    .collect())
            }
            Node::NotConnected | Node::Record { .. } | Node::Error { .. } => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_client::ChromaClient;

    #[tokio::test]
    async fn test_disconnected_root_is_placeholder() {
        let navigator = HierarchyNavigator::new(Arc::new(ChromaClient::new()));
        assert_eq!(navigator.expand(None).await, vec![Node::NotConnected]);
        assert!(navigator.expand(Some(&Node::NotConnected)).await.is_empty());
    }

    #[tokio::test]
    async fn test_tenant_expansion_carries_context() {
        let navigator = HierarchyNavigator::new(Arc::new(ChromaClient::new()));
        let tenant = Node::Tenant {
            name: "default_tenant".into(),
        };
        let databases = navigator.expand(Some(&tenant)).await;
        assert_eq!(
            databases,
            vec![Node::Database {
                tenant: "default_tenant".into(),
                name: "default_database".into(),
            }]
        );
    }

    #[test]
    fn test_default_config() {
        let config = NavigatorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.with_page_size(10).page_size, 10);
    }
}
