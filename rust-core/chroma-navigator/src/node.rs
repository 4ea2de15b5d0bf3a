// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Hierarchy nodes as a tree renderer consumes them.
//!
//! Every node carries the full path of its parents, so expanding it never
//! needs to consult the client's configuration.

use serde::{Deserialize, Serialize};

/// Longest record description shown before truncation.
pub const DESCRIPTION_LIMIT: usize = 60;

/// One entry of the navigable tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    /// Root placeholder shown while disconnected.
    NotConnected,
    Tenant {
        name: String,
    },
    Database {
        tenant: String,
        name: String,
    },
    Collection {
        tenant: String,
        database: String,
        name: String,
        count: u64,
    },
    Record {
        tenant: String,
        database: String,
        collection: String,
        id: String,
        document: Option<String>,
    },
    /// Synthetic placeholder for a failed expansion.
    Error {
        message: String,
    },
}

impl Node {
    pub fn error(message: impl Into<String>) -> Self {
        Node::Error {
            message: message.into(),
        }
    }

    /// Text shown for the node.
    pub fn label(&self) -> String {
        match self {
            Node::NotConnected => "Not connected".to_string(),
            Node::Tenant { name } | Node::Database { name, .. } => name.clone(),
            Node::Collection { name, count, .. } => format!("{name} ({count})"),
            Node::Record { id, .. } => id.clone(),
            Node::Error { message } => format!("Error: {message}"),
        }
    }

    /// Secondary text; records show their (truncated) document.
    pub fn description(&self) -> Option<String> {
        match self {
            Node::Record { document, .. } => Some(truncate(document.as_deref().unwrap_or(""))),
            _ => None,
        }
    }

    pub fn is_expandable(&self) -> bool {
        matches!(
            self,
            Node::Tenant { .. } | Node::Database { .. } | Node::Collection { .. }
        )
    }

    /// Stable identifier of the node kind, used to pick context actions.
    pub fn context_value(&self) -> &'static str {
        match self {
            Node::NotConnected => "notConnected",
            Node::Tenant { .. } => "tenant",
            Node::Database { .. } => "database",
            Node::Collection { .. } => "collection",
            Node::Record { .. } => "record",
            Node::Error { .. } => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error { .. })
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_LIMIT {
        return text.to_string();
    }
    let mut short: String = text.chars().take(DESCRIPTION_LIMIT - 3).collect();
    short.push_str("...");
    short
}
