// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Demo dataset for exercising a fresh server: one tenant, one database, a
//! small collection and a collection large enough to page through.
//!
//! Every step runs even if an earlier one failed; entities that already
//! exist are reported and skipped.

use chroma_client::{ChromaClient, Metadata, RecordInput};
use serde_json::json;
use tracing::{info, warn};

pub const SEED_TENANT: &str = "test_tenant";
pub const SEED_DATABASE: &str = "test_db";
pub const SMALL_COLLECTION: &str = "test_collection_small";
pub const BIG_COLLECTION: &str = "test_collection_big";
pub const BIG_COLLECTION_SIZE: usize = 20;

/// Outcome of one seeding step.
#[derive(Debug)]
pub struct Step {
    pub description: String,
    pub outcome: Result<(), String>,
}

impl Step {
    fn record(description: String, outcome: chroma_client::Result<()>) -> Self {
        match &outcome {
            Ok(()) => info!(step = %description, "seeded"),
            Err(err) => warn!(step = %description, error = %err, "seed step skipped"),
        }
        Self {
            description,
            outcome: outcome.map_err(|e| e.to_string()),
        }
    }
}

fn small_records() -> Vec<RecordInput> {
    let docs = [
        ("s1", "small doc one", [0.1, 0.2]),
        ("s2", "small doc two", [0.2, 0.1]),
        ("s3", "small doc three", [0.3, 0.4]),
    ];
    docs.into_iter()
        .map(|(id, doc, embedding)| {
            let mut metadata = Metadata::new();
            metadata.insert("tag".to_string(), json!("small"));
            RecordInput::default()
                .with_id(id)
                .with_document(doc)
                .with_metadata(metadata)
                .with_embedding(embedding.to_vec())
        })
        .collect()
}

fn big_records() -> Vec<RecordInput> {
    (1..=BIG_COLLECTION_SIZE)
        .map(|i| {
            let mut metadata = Metadata::new();
            metadata.insert("index".to_string(), json!(i));
            let x = i as f32 / BIG_COLLECTION_SIZE as f32;
            RecordInput::default()
                .with_id(format!("b{i}"))
                .with_document(format!("big collection doc {i}"))
                .with_metadata(metadata)
                .with_embedding(vec![x, 1.0 - x, 0.5])
        })
        .collect()
}

async fn add_all(client: &ChromaClient, collection: &str, records: Vec<RecordInput>) -> chroma_client::Result<()> {
    for record in records {
        client
            .add_record(SEED_TENANT, SEED_DATABASE, collection, record)
            .await?;
    }
    Ok(())
}

/// Create the demo dataset through `client`, returning every step's outcome.
pub async fn seed(client: &ChromaClient) -> Vec<Step> {
    let mut steps = Vec::new();

    steps.push(Step::record(
        format!("create tenant {SEED_TENANT}"),
        client.create_tenant(SEED_TENANT).await,
    ));
    steps.push(Step::record(
        format!("create database {SEED_DATABASE}"),
        client.create_database(SEED_TENANT, SEED_DATABASE).await,
    ));
    for name in [SMALL_COLLECTION, BIG_COLLECTION] {
        steps.push(Step::record(
            format!("create collection {name}"),
            client.create_collection(SEED_TENANT, SEED_DATABASE, name).await,
        ));
    }

    steps.push(Step::record(
        format!("add 3 records to {SMALL_COLLECTION}"),
        add_all(client, SMALL_COLLECTION, small_records()).await,
    ));
    steps.push(Step::record(
        format!("add {BIG_COLLECTION_SIZE} records to {BIG_COLLECTION}"),
        add_all(client, BIG_COLLECTION, big_records()).await,
    ));

    steps
}
