// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Depth-first walk of the hierarchy, for printing.

use chroma_navigator::{HierarchyNavigator, HierarchySource, Node};
use colored::Colorize;

/// Expand `roots` depth-first down to `max_depth` levels below them,
/// returning each node with its depth in display order.
pub async fn walk<S>(navigator: &HierarchyNavigator<S>, roots: Vec<Node>, max_depth: usize) -> Vec<(usize, Node)>
where
    S: HierarchySource + ?Sized,
{
    let mut out = Vec::new();
    let mut stack: Vec<(usize, Node)> = roots.into_iter().rev().map(|n| (0, n)).collect();

    while let Some((depth, node)) = stack.pop() {
        if depth < max_depth && node.is_expandable() {
            let children = navigator.expand(Some(&node)).await;
            stack.extend(children.into_iter().rev().map(|c| (depth + 1, c)));
        }
        out.push((depth, node));
    }
    out
}

/// One indented, colored output line.
pub fn render(depth: usize, node: &Node) -> String {
    let indent = "  ".repeat(depth);
    let label = match node {
        Node::Tenant { .. } => node.label().bold().to_string(),
        Node::Database { .. } => node.label().cyan().to_string(),
        Node::Collection { .. } => node.label().green().to_string(),
        Node::Error { .. } | Node::NotConnected => node.label().red().to_string(),
        Node::Record { .. } => node.label(),
    };
    match node.description() {
        Some(desc) if !desc.is_empty() => format!("{indent}{label}  {}", desc.dimmed()),
        _ => format!("{indent}{label}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_client::ChromaClient;
    use std::sync::Arc;

    fn default_tenant() -> Vec<Node> {
        vec![Node::Tenant {
            name: "default_tenant".into(),
        }]
    }

    #[tokio::test]
    async fn test_full_walk_of_demo_tree() {
        let navigator = HierarchyNavigator::new(Arc::new(ChromaClient::new()));
        let lines = walk(&navigator, default_tenant(), 3).await;

        let shape: Vec<_> = lines.iter().map(|(d, n)| (*d, n.label())).collect();
        assert_eq!(
            shape,
            vec![
                (0, "default_tenant".to_string()),
                (1, "default_database".to_string()),
                (2, "example_collection (3)".to_string()),
                (3, "r1".to_string()),
                (3, "r2".to_string()),
                (3, "r3".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_depth_limit_stops_expansion() {
        let navigator = HierarchyNavigator::new(Arc::new(ChromaClient::new()));
        let lines = walk(&navigator, default_tenant(), 1).await;
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_render_indents_by_depth() {
        colored::control::set_override(false);
        let node = Node::Record {
            tenant: "t".into(),
            database: "d".into(),
            collection: "c".into(),
            id: "r1".into(),
            document: Some("Hello".into()),
        };
        assert_eq!(render(2, &node), "    r1  Hello");
    }
}
