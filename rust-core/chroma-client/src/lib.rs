// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! # Chroma data-access client
//!
//! A client for the Chroma vector database REST API that keeps working when
//! no server is reachable. Tenants, databases, collections and records are
//! served from a live server once [`ChromaClient::connect`] succeeds, and
//! from an in-process mirror of the same hierarchy otherwise.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chroma_client::{ChromaClient, ConnectionConfig, RecordInput};
//!
//! #[tokio::main]
//! async fn main() -> chroma_client::Result<()> {
//!     let client = ChromaClient::new();
//!     client.connect(ConnectionConfig::from_env()).await;
//!
//!     let id = client
//!         .add_record(
//!             "default_tenant",
//!             "default_database",
//!             "example_collection",
//!             RecordInput::default().with_document("hello"),
//!         )
//!         .await?;
//!     println!("added {id}");
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: The dispatching client and its connection state.
//! - [`backend`]: The `StorageBackend` trait, the mirror and the remote backend.
//! - [`config`]: Connection settings and environment loading.
//! - [`normalize`]: Folding of heterogeneous response shapes.
//! - [`transport`]: JSON-over-HTTP plumbing.
//! - [`types`]: Canonical hierarchy and record types.
//! - [`error`]: Error types and the crate-level `Result` alias.

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod transport;
pub mod types;

pub use backend::{LocalMirror, MirrorBackend, RemoteBackend, StorageBackend};
pub use client::ChromaClient;
pub use config::{ConnectionConfig, TokenHeader, DEFAULT_DATABASE, DEFAULT_TENANT};
pub use error::{ChromaError, Result};
pub use types::{
    Collection, CollectionSummary, Database, Metadata, QueryRequest, Record, RecordInput,
    RecordPatch, Tenant,
};
