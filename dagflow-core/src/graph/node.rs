//! Graph Nodes
//!
//! This module defines the node type that lives in a graph snapshot, along
//! with the identifier and recompute-function types shared by the rest of
//! the crate.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};
use smallvec::SmallVec;

/// Unique, user-chosen identifier for a node in the graph.
///
/// Cloning is cheap: the underlying string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Arc<str>);

impl NodeId {
    /// Create a node ID from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Declared dependencies of a node, in the order the caller gave them.
pub type Dependencies = SmallVec<[NodeId; 4]>;

/// The input handed to a recompute function: the current value of each
/// declared dependency, keyed by dependency ID, in declaration order.
///
/// The map is an owned copy. Changing it has no effect on the graph.
pub type DependencyValues<V> = IndexMap<NodeId, V>;

/// A node's recompute function.
///
/// Shared between snapshots; replacing a node's function swaps the `Arc`,
/// it never mutates the closure.
pub type RecomputeFn<V> = Arc<dyn Fn(DependencyValues<V>) -> V + Send + Sync>;

/// Convenience for nodes without dependencies:
/// `snapshot.add_node("a", NO_DEPS, |_| 1)`.
pub const NO_DEPS: [&str; 0] = [];

/// Wrap a closure as a shareable [`RecomputeFn`].
pub fn recompute_fn<V, F>(f: F) -> RecomputeFn<V>
where
    F: Fn(DependencyValues<V>) -> V + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A recompute function that ignores its inputs and always yields `value`.
pub fn constant<V>(value: V) -> RecomputeFn<V>
where
    V: Clone + Send + Sync + 'static,
{
    Arc::new(move |_| value.clone())
}

/// A node in the dependency graph.
pub struct Node<V> {
    /// Unique identifier for this node.
    id: NodeId,

    /// Nodes this node reads from. Fixed at creation.
    dependencies: Dependencies,

    /// Nodes that read from this node, directly or transitively.
    /// Kept in insertion order, which is a topological order.
    dependents: IndexSet<NodeId>,

    /// Derives this node's value from its dependencies' values.
    recompute: RecomputeFn<V>,
}

impl<V> Node<V> {
    pub(crate) fn new(id: NodeId, dependencies: Dependencies, recompute: RecomputeFn<V>) -> Self {
        Self {
            id,
            dependencies,
            dependents: IndexSet::new(),
            recompute,
        }
    }

    /// Get the node's ID.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Get the declared dependencies, in declaration order.
    pub fn dependencies(&self) -> &[NodeId] {
        &self.dependencies
    }

    /// Get all transitive dependents, in topological order.
    pub fn dependents(&self) -> &IndexSet<NodeId> {
        &self.dependents
    }

    /// Whether any node reads from this one.
    pub fn has_dependents(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// Get the node's recompute function.
    pub fn recompute_fn(&self) -> &RecomputeFn<V> {
        &self.recompute
    }

    /// Run the recompute function on the given inputs.
    pub fn compute(&self, inputs: DependencyValues<V>) -> V {
        (self.recompute)(inputs)
    }

    pub(crate) fn add_dependent(&mut self, node_id: NodeId) {
        self.dependents.insert(node_id);
    }

    /// Order of the remaining dependents is preserved.
    pub(crate) fn remove_dependent(&mut self, node_id: &NodeId) {
        self.dependents.shift_remove(node_id);
    }

    pub(crate) fn set_recompute(&mut self, recompute: RecomputeFn<V>) {
        self.recompute = recompute;
    }
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            dependencies: self.dependencies.clone(),
            dependents: self.dependents.clone(),
            recompute: Arc::clone(&self.recompute),
        }
    }
}

/// Two nodes are equal when they have the same edges and share the same
/// recompute function.
impl<V> PartialEq for Node<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.dependencies == other.dependencies
            && self.dependents == other.dependents
            && Arc::ptr_eq(&self.recompute, &other.recompute)
    }
}

impl<V> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("dependencies", &self.dependencies)
            .field("dependents", &self.dependents)
            .finish_non_exhaustive()
    }
}
