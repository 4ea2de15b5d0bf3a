// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! # Chroma Navigator
//!
//! Lazily expands the Tenant → Database → Collection → Record hierarchy one
//! level at a time, with every call into the data source bounded by a fixed
//! timeout so a hung server cannot freeze a tree view.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chroma_client::{ChromaClient, ConnectionConfig};
//! use chroma_navigator::HierarchyNavigator;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = Arc::new(ChromaClient::new());
//! client.connect(ConnectionConfig::from_env()).await;
//!
//! let navigator = HierarchyNavigator::new(client);
//! for node in navigator.expand(None).await {
//!     println!("{}", node.label());
//! }
//! # }
//! ```

pub mod bounded;
pub mod error;
pub mod navigator;
pub mod node;
pub mod source;

pub use bounded::bounded;
pub use error::NavigatorError;
pub use navigator::{HierarchyNavigator, NavigatorConfig, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT};
pub use node::Node;
pub use source::HierarchySource;
