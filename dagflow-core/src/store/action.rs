//! Actions
//!
//! The three graph intents as plain values, so they can be queued, logged
//! or sent to a [`Store`](super::Store) before being applied.

use std::fmt;
use std::sync::Arc;

use crate::graph::{Dependencies, DependencyValues, GraphResult, NodeId, RecomputeFn, Snapshot};

/// A request to change the graph.
pub enum Action<V> {
    /// Add a node. See [`Snapshot::add_node`].
    AddNode {
        id: NodeId,
        dependencies: Dependencies,
        recompute: RecomputeFn<V>,
    },

    /// Delete a node. See [`Snapshot::delete_node`].
    DeleteNode { id: NodeId },

    /// Replace a node's recompute function. See [`Snapshot::recompute_node`].
    RecomputeNode { id: NodeId, recompute: RecomputeFn<V> },
}

impl<V> Action<V> {
    pub fn add_node<I, D, F>(id: I, dependencies: D, recompute: F) -> Self
    where
        I: Into<NodeId>,
        D: IntoIterator,
        D::Item: Into<NodeId>,
        F: Fn(DependencyValues<V>) -> V + Send + Sync + 'static,
    {
        Self::AddNode {
            id: id.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            recompute: Arc::new(recompute),
        }
    }

    pub fn delete_node(id: impl Into<NodeId>) -> Self {
        Self::DeleteNode { id: id.into() }
    }

    pub fn recompute_node<I, F>(id: I, recompute: F) -> Self
    where
        I: Into<NodeId>,
        F: Fn(DependencyValues<V>) -> V + Send + Sync + 'static,
    {
        Self::RecomputeNode {
            id: id.into(),
            recompute: Arc::new(recompute),
        }
    }

    /// The node this action targets.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::AddNode { id, .. }
            | Self::DeleteNode { id }
            | Self::RecomputeNode { id, .. } => id,
        }
    }

    /// Short name of the action, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddNode { .. } => "add_node",
            Self::DeleteNode { .. } => "delete_node",
            Self::RecomputeNode { .. } => "recompute_node",
        }
    }
}

impl<V: Clone> Snapshot<V> {
    /// Apply an action, producing the next snapshot.
    pub fn apply(&self, action: Action<V>) -> GraphResult<Self> {
        match action {
            Action::AddNode {
                id,
                dependencies,
                recompute,
            } => self.insert(id, dependencies, recompute),
            Action::DeleteNode { id } => self.delete_node(id.as_str()),
            Action::RecomputeNode { id, recompute } => self.replace(id.as_str(), recompute),
        }
    }
}

impl<V> Clone for Action<V> {
    fn clone(&self) -> Self {
        match self {
            Self::AddNode {
                id,
                dependencies,
                recompute,
            } => Self::AddNode {
                id: id.clone(),
                dependencies: dependencies.clone(),
                recompute: Arc::clone(recompute),
            },
            Self::DeleteNode { id } => Self::DeleteNode { id: id.clone() },
            Self::RecomputeNode { id, recompute } => Self::RecomputeNode {
                id: id.clone(),
                recompute: Arc::clone(recompute),
            },
        }
    }
}

impl<V> fmt::Debug for Action<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddNode { id, dependencies, .. } => f
                .debug_struct("AddNode")
                .field("id", id)
                .field("dependencies", dependencies)
                .finish_non_exhaustive(),
            Self::DeleteNode { id } => f.debug_struct("DeleteNode").field("id", id).finish(),
            Self::RecomputeNode { id, .. } => f
                .debug_struct("RecomputeNode")
                .field("id", id)
                .finish_non_exhaustive(),
        }
    }
}
