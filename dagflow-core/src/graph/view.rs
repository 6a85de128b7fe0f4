//! Rendering helpers for a presentation layer.
//!
//! [`Topology`] is the graph's shape without values or functions, ready to
//! hand to a UI as JSON. The `Display` impl on [`Snapshot`] prints one line
//! per node.

use std::fmt;

use serde::Serialize;

use super::node::{Node, NodeId};
use super::snapshot::Snapshot;

/// The shape of a graph, in topological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topology {
    /// One entry per node.
    pub nodes: Vec<TopologyEntry>,
}

/// One node's edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyEntry {
    /// The node's ID.
    pub id: NodeId,
    /// Declared dependencies, in declaration order.
    pub dependencies: Vec<NodeId>,
    /// Transitive dependents, in topological order.
    pub dependents: Vec<NodeId>,
}

impl<V> From<&Node<V>> for TopologyEntry {
    fn from(node: &Node<V>) -> Self {
        Self {
            id: node.id().clone(),
            dependencies: node.dependencies().to_vec(),
            dependents: node.dependents().iter().cloned().collect(),
        }
    }
}

impl<V> Snapshot<V> {
    /// The graph's shape, without values.
    pub fn topology(&self) -> Topology {
        Topology {
            nodes: self.nodes().map(TopologyEntry::from).collect(),
        }
    }

    /// The graph's shape as a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.topology())
    }
}

fn join(ids: &[NodeId]) -> String {
    ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(" ; ")
}

impl<V: fmt::Display> fmt::Display for Snapshot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Empty graph");
        }

        for (index, entry) in self.topology().nodes.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "Id: {}", entry.id)?;
            match self.value(entry.id.as_str()) {
                Some(value) => write!(f, " | value: {value}")?,
                None => f.write_str(" | value: -")?,
            }
            write!(
                f,
                " | dependents: ({}) | dependencies: ({})",
                join(&entry.dependents),
                join(&entry.dependencies)
            )?;
        }
        Ok(())
    }
}
