// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Canonical data types shared by both storage backends.
//!
//! The remote service answers in several JSON shapes; [`crate::normalize`]
//! folds all of them into the types defined here so callers only ever see
//! one record shape regardless of where the data came from.

use serde::{Deserialize, Serialize};

/// Opaque key/value metadata attached to a record.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Embedding stored when a caller supplies none. The remote schema rejects
/// zero-length vectors.
pub const PLACEHOLDER_EMBEDDING: [f32; 1] = [0.0];

/// Return `embedding` if it has at least one dimension, else the placeholder.
pub fn embedding_or_placeholder(embedding: Option<Vec<f32>>) -> Vec<f32> {
    match embedding {
        Some(values) if !values.is_empty() => values,
        _ => PLACEHOLDER_EMBEDDING.to_vec(),
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// Top-level namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub name: String,
    pub databases: Vec<Database>,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            databases: Vec::new(),
        }
    }
}

/// Namespace within a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub collections: Vec<Collection>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Vec::new(),
        }
    }
}

/// A container of records.
///
/// `name` is what users see and type; `server_id` is what the remote service
/// addresses the collection by. The two may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub server_id: String,
    pub records: Vec<Record>,
}

impl Collection {
    /// A new, empty collection whose id equals its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            server_id: name.clone(),
            name,
            records: Vec::new(),
        }
    }

    /// True if `name_or_id` is this collection's name or its id.
    pub fn matches(&self, name_or_id: &str) -> bool {
        self.name == name_or_id || self.server_id == name_or_id
    }

    pub fn summary(&self) -> CollectionSummary {
        CollectionSummary {
            id: self.server_id.clone(),
            name: self.name.clone(),
            count: self.records.len() as u64,
        }
    }
}

/// One entry of a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// Identifier the remote service expects in collection paths.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Number of records, when the service reports it.
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stored record: id, optional document text, metadata and an embedding
/// with at least one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub document: Option<String>,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// Payload for adding a record. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    /// Caller-chosen id; generated when absent or empty.
    pub id: Option<String>,
    pub document: Option<String>,
    pub metadata: Option<Metadata>,
    /// Defaults to [`PLACEHOLDER_EMBEDDING`] when absent or empty.
    pub embedding: Option<Vec<f32>>,
}

impl RecordInput {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Partial update of an existing record.
///
/// Fields left as `None` are not touched. An empty embedding is replaced by
/// [`PLACEHOLDER_EMBEDDING`], as on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub id: String,
    pub document: Option<String>,
    pub metadata: Option<Metadata>,
    pub embedding: Option<Vec<f32>>,
}

impl RecordPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            document: None,
            metadata: None,
            embedding: None,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Apply the present fields onto `record`.
    pub fn apply(&self, record: &mut Record) {
        if let Some(document) = &self.document {
            record.document = Some(document.clone());
        }
        if let Some(metadata) = &self.metadata {
            record.metadata = metadata.clone();
        }
        if let Some(embedding) = &self.embedding {
            record.embedding = embedding_or_placeholder(Some(embedding.clone()));
        }
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Number of results requested when a query does not say.
pub const DEFAULT_N_RESULTS: usize = 5;

/// Similarity query against one collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query_texts: Option<Vec<String>>,
    pub query_embeddings: Option<Vec<Vec<f32>>>,
    pub n_results: Option<usize>,
}

impl QueryRequest {
    pub fn texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query_texts: Some(texts.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn embeddings(embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            query_embeddings: Some(embeddings),
            ..Self::default()
        }
    }

    pub fn with_n_results(mut self, n: usize) -> Self {
        self.n_results = Some(n);
        self
    }

    pub fn n_results_or_default(&self) -> usize {
        self.n_results.unwrap_or(DEFAULT_N_RESULTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), json!("demo"));
        Record {
            id: "r1".to_string(),
            document: Some("old".to_string()),
            metadata,
            embedding: vec![0.1, 0.2],
        }
    }

    #[test]
    fn test_placeholder_for_missing_or_empty() {
        assert_eq!(embedding_or_placeholder(None), vec![0.0]);
        assert_eq!(embedding_or_placeholder(Some(vec![])), vec![0.0]);
        assert_eq!(embedding_or_placeholder(Some(vec![1.5])), vec![1.5]);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut r = record();
        RecordPatch::new("r1").with_document("new").apply(&mut r);
        assert_eq!(r.document.as_deref(), Some("new"));
        assert_eq!(r.metadata["source"], json!("demo"));
        assert_eq!(r.embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_patch_with_empty_embedding_keeps_a_dimension() {
        let mut r = record();
        RecordPatch::new("r1").with_embedding(vec![]).apply(&mut r);
        assert_eq!(r.embedding, vec![0.0]);
    }

    #[test]
    fn test_collection_matches_name_or_id() {
        let mut c = Collection::new("docs");
        c.server_id = "abc".to_string();
        assert!(c.matches("docs"));
        assert!(c.matches("abc"));
        assert!(!c.matches("Docs"));
    }

    #[test]
    fn test_query_default_n_results() {
        assert_eq!(QueryRequest::texts(["hi"]).n_results_or_default(), 5);
        assert_eq!(
            QueryRequest::texts(["hi"]).with_n_results(2).n_results_or_default(),
            2
        );
    }
}
