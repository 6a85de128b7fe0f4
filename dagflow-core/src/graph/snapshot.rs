//! Graph Snapshot
//!
//! A snapshot is an immutable, internally consistent view of the whole
//! graph: the topological order of node IDs, the node for each ID, and the
//! current value for each ID.
//!
//! Transitions take `&self` and return a brand new snapshot. The new one is
//! built by cloning the order, node map and value map (recompute functions
//! are shared, not cloned) and editing only the copies, so anyone still
//! holding the previous snapshot keeps seeing it unchanged.
//!
//! # Invariants
//!
//! 1. Dependencies must exist when a node is added, so edges only point at
//!    earlier nodes and the graph cannot contain a cycle.
//! 2. `order` is a topological order. Adds append; deletes keep the
//!    relative order of the survivors.
//! 3. A node's dependent set holds exactly the nodes that read from it,
//!    directly or transitively, in topological order.
//! 4. Only nodes with no dependents can be deleted.
//!
//! Recomputing a node refreshes its own value and then replays its
//! dependent set in stored order. That single linear pass is only correct
//! because of invariants 2 and 3.

use std::collections::HashMap;
use std::sync::Arc;

use super::error::{GraphError, GraphResult};
use super::node::{Dependencies, DependencyValues, Node, NodeId, RecomputeFn};
use super::propagation;

/// An immutable view of the graph at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V> {
    /// All live node IDs, in topological order.
    order: Vec<NodeId>,

    /// Node metadata, indexed by ID.
    nodes: HashMap<NodeId, Node<V>>,

    /// Current values, indexed by ID.
    values: HashMap<NodeId, V>,
}

impl<V> Snapshot<V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            nodes: HashMap::new(),
            values: HashMap::new(),
        }
    }

    /// All node IDs, dependencies before dependents.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether a node with this ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node by ID.
    pub fn node(&self, id: &str) -> Option<&Node<V>> {
        self.nodes.get(id)
    }

    /// Get a node's current value.
    pub fn value(&self, id: &str) -> Option<&V> {
        self.values.get(id)
    }

    /// Iterate over nodes in topological order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<V>> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Iterate over `(id, value)` pairs in topological order.
    pub fn values(&self) -> impl Iterator<Item = (&NodeId, &V)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.values.get(id).map(|value| (id, value)))
    }
}

impl<V: Clone> Snapshot<V> {
    /// Add a node that reads from `dependencies` and derives its value with
    /// `recompute`.
    ///
    /// The value is computed immediately, and the new node is registered as
    /// a dependent of every node it transitively reads from.
    ///
    /// # Errors
    ///
    /// - [`GraphError::AlreadyExists`] if `id` is taken.
    /// - [`GraphError::UnknownDependency`] for the first missing dependency,
    ///   in argument order.
    pub fn add_node<I, D, F>(&self, id: I, dependencies: D, recompute: F) -> GraphResult<Self>
    where
        I: Into<NodeId>,
        D: IntoIterator,
        D::Item: Into<NodeId>,
        F: Fn(DependencyValues<V>) -> V + Send + Sync + 'static,
    {
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.insert(id.into(), dependencies, Arc::new(recompute))
    }

    /// Remove a node that nothing depends on.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotFound`] if `id` is absent.
    /// - [`GraphError::HasDependents`] if other nodes still read from it.
    pub fn delete_node(&self, id: &str) -> GraphResult<Self> {
        let _span = tracing::debug_span!("delete_node", node = id).entered();

        let Some(node) = self.nodes.get(id) else {
            return Err(rejected(GraphError::NotFound(NodeId::from(id))));
        };
        if node.has_dependents() {
            return Err(rejected(GraphError::HasDependents(node.id().clone())));
        }

        let id = node.id().clone();
        let mut next = self.clone();

        let ancestors = propagation::ancestors(&next.nodes, &id);
        for ancestor_id in &ancestors {
            if let Some(ancestor) = next.nodes.get_mut(ancestor_id) {
                ancestor.remove_dependent(&id);
            }
        }

        next.nodes.remove(&id);
        next.values.remove(&id);
        next.order.retain(|node_id| node_id != &id);

        tracing::debug!(ancestors = ancestors.len(), "node deleted");
        Ok(next)
    }

    /// Give a node a new recompute function and propagate the change.
    ///
    /// The node's own value is recomputed first, then each of its dependents
    /// in topological order, each exactly once.
    ///
    /// # Errors
    ///
    /// - [`GraphError::NotFound`] if `id` is absent.
    pub fn recompute_node<F>(&self, id: &str, recompute: F) -> GraphResult<Self>
    where
        F: Fn(DependencyValues<V>) -> V + Send + Sync + 'static,
    {
        self.replace(id, Arc::new(recompute))
    }

    /// The inputs a node's recompute function would receive right now.
    pub fn dependency_values(&self, id: &str) -> Option<DependencyValues<V>> {
        self.nodes
            .get(id)
            .map(|node| propagation::dependency_values(node, &self.values))
    }

    /// Every node `id` transitively reads from, breadth-first.
    pub fn ancestors(&self, id: &str) -> Option<Vec<NodeId>> {
        self.nodes
            .get(id)
            .map(|node| propagation::ancestors(&self.nodes, node.id()))
    }

    /// Run a node's recompute function against this snapshot without
    /// storing the result.
    pub fn evaluate(&self, id: &str) -> Option<V> {
        self.nodes
            .get(id)
            .map(|node| node.compute(propagation::dependency_values(node, &self.values)))
    }

    pub(crate) fn insert(
        &self,
        id: NodeId,
        dependencies: Dependencies,
        recompute: RecomputeFn<V>,
    ) -> GraphResult<Self> {
        let _span = tracing::debug_span!("add_node", node = %id).entered();

        if self.contains(id.as_str()) {
            return Err(rejected(GraphError::AlreadyExists(id)));
        }
        if let Some(missing) = dependencies.iter().find(|dep_id| !self.contains(dep_id.as_str())) {
            return Err(rejected(GraphError::UnknownDependency(missing.clone())));
        }

        let mut next = self.clone();
        next.order.push(id.clone());
        next.nodes.insert(id.clone(), Node::new(id.clone(), dependencies, recompute));
        propagation::refresh_value(&next.nodes, &mut next.values, &id);

        let ancestors = propagation::ancestors(&next.nodes, &id);
        for ancestor_id in &ancestors {
            if let Some(ancestor) = next.nodes.get_mut(ancestor_id) {
                ancestor.add_dependent(id.clone());
            }
        }

        tracing::debug!(ancestors = ancestors.len(), "node added");
        Ok(next)
    }

    pub(crate) fn replace(&self, id: &str, recompute: RecomputeFn<V>) -> GraphResult<Self> {
        let _span = tracing::debug_span!("recompute_node", node = id).entered();

        let Some(node) = self.nodes.get(id) else {
            return Err(rejected(GraphError::NotFound(NodeId::from(id))));
        };

        let id = node.id().clone();
        let mut next = self.clone();

        if let Some(node) = next.nodes.get_mut(&id) {
            node.set_recompute(recompute);
        }
        propagation::refresh_value(&next.nodes, &mut next.values, &id);
        let refreshed = propagation::refresh_dependents(&next.nodes, &mut next.values, &id);

        tracing::debug!(dependents = refreshed, "node recomputed");
        Ok(next)
    }
}

impl<V> Default for Snapshot<V> {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(err: GraphError) -> GraphError {
    tracing::debug!(error = %err, "transition rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::NO_DEPS;

    fn sum(inputs: DependencyValues<i64>) -> i64 {
        inputs.values().sum()
    }

    /// `a = 1`, `b = 2`, `c = a + b`.
    fn base() -> Snapshot<i64> {
        Snapshot::<i64>::new()
            .add_node("a", NO_DEPS, |_| 1)
            .and_then(|s| s.add_node("b", NO_DEPS, |_| 2))
            .and_then(|s| s.add_node("c", ["a", "b"], sum))
            .unwrap()
    }

    fn dependents(snapshot: &Snapshot<i64>, id: &str) -> Vec<NodeId> {
        snapshot.node(id).unwrap().dependents().iter().cloned().collect()
    }

    #[test]
    fn add_free_node() {
        let snapshot = base().add_node("d", NO_DEPS, |_| 5).unwrap();

        assert_eq!(snapshot.order(), ["a", "b", "c", "d"]);
        assert_eq!(snapshot.value("d"), Some(&5));
        let node = snapshot.node("d").unwrap();
        assert!(node.dependencies().is_empty());
        assert!(!node.has_dependents());
    }

    #[test]
    fn add_dependent_node() {
        let snapshot = base().add_node("d", ["b", "c"], sum).unwrap();

        assert_eq!(snapshot.value("d"), Some(&5));
        assert_eq!(snapshot.node("d").unwrap().dependencies(), ["b", "c"]);
        assert_eq!(dependents(&snapshot, "a"), ["c", "d"]);
        assert_eq!(dependents(&snapshot, "b"), ["c", "d"]);
        assert_eq!(dependents(&snapshot, "c"), ["d"]);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let snapshot = base();
        let err = snapshot.add_node("a", NO_DEPS, |_| 99).unwrap_err();
        assert_eq!(err, GraphError::AlreadyExists(NodeId::from("a")));
        assert_eq!(snapshot.value("a"), Some(&1));
    }

    #[test]
    fn add_rejects_first_missing_dependency() {
        let snapshot = base();
        let err = snapshot.add_node("d", ["b", "e", "f"], sum).unwrap_err();
        assert_eq!(err, GraphError::UnknownDependency(NodeId::from("e")));
        assert!(!snapshot.contains("d"));
    }

    #[test]
    fn undeclared_dependency_is_not_visible() {
        let snapshot = base()
            .add_node("d", ["a"], |inputs: DependencyValues<i64>| {
                inputs.get("b").copied().unwrap_or(-1)
            })
            .unwrap();
        assert_eq!(snapshot.value("d"), Some(&-1));
    }

    #[test]
    fn dependents_stay_sorted_over_many_additions() {
        let snapshot = base()
            .add_node("d", ["a", "c"], sum)
            .and_then(|s| s.add_node("e", ["b", "d"], sum))
            .and_then(|s| s.add_node("f", ["d", "e", "c"], sum))
            .unwrap();

        assert_eq!(dependents(&snapshot, "a"), ["c", "d", "e", "f"]);
        assert_eq!(dependents(&snapshot, "b"), ["c", "d", "e", "f"]);
        assert_eq!(dependents(&snapshot, "c"), ["d", "e", "f"]);
        assert_eq!(dependents(&snapshot, "d"), ["e", "f"]);
        assert_eq!(dependents(&snapshot, "e"), ["f"]);
    }

    #[test]
    fn delete_node() {
        let snapshot = base().delete_node("c").unwrap();

        assert!(snapshot.node("c").is_none());
        assert!(snapshot.value("c").is_none());
        assert_eq!(snapshot.order(), ["a", "b"]);
        assert!(dependents(&snapshot, "a").is_empty());
        assert!(dependents(&snapshot, "b").is_empty());
    }

    #[test]
    fn delete_clears_ancestor_dependents() {
        let snapshot = base().add_node("d", ["b", "c"], sum).unwrap();
        let snapshot = snapshot.delete_node("d").unwrap();

        for id in ["a", "b", "c"] {
            assert!(!snapshot.node(id).unwrap().dependents().contains("d"));
        }
        assert_eq!(snapshot.value("c"), Some(&3));
    }

    #[test]
    fn delete_rejects_missing_node() {
        let err = base().delete_node("d").unwrap_err();
        assert_eq!(err, GraphError::NotFound(NodeId::from("d")));
    }

    #[test]
    fn delete_rejects_node_with_dependents() {
        let err = base().delete_node("a").unwrap_err();
        assert_eq!(err, GraphError::HasDependents(NodeId::from("a")));
    }

    #[test]
    fn recompute_updates_node_and_dependents() {
        let snapshot = base().recompute_node("a", |_| 10).unwrap();

        assert_eq!(snapshot.value("a"), Some(&10));
        assert_eq!(snapshot.value("b"), Some(&2));
        assert_eq!(snapshot.value("c"), Some(&12));
    }

    #[test]
    fn recompute_rejects_missing_node() {
        let err = base().recompute_node("d", |_| 0).unwrap_err();
        assert_eq!(err, GraphError::NotFound(NodeId::from("d")));
    }

    #[test]
    fn recompute_replaces_function() {
        let before = base();
        let after = before.recompute_node("a", |_| 3).unwrap();

        let old_fn = before.node("a").unwrap().recompute_fn();
        let new_fn = after.node("a").unwrap().recompute_fn();
        assert!(!Arc::ptr_eq(old_fn, new_fn));
        assert_eq!(after.value("a"), Some(&3));
    }

    #[test]
    fn transitions_leave_previous_snapshot_untouched() {
        let before = base();
        let copy = before.clone();

        let added = before.add_node("d", ["a", "b"], sum).unwrap();
        assert_ne!(added, before);
        assert_eq!(before, copy);

        let deleted = before.delete_node("c").unwrap();
        assert_ne!(deleted, before);
        assert_eq!(before, copy);

        let recomputed = before.recompute_node("a", |_| 3).unwrap();
        assert_ne!(recomputed, before);
        assert_eq!(before, copy);
    }

    #[test]
    fn order_survives_adds_and_deletes() {
        let snapshot = base()
            .add_node("d", NO_DEPS, |_| 0)
            .and_then(|s| s.add_node("e", ["a", "c"], sum))
            .unwrap();
        assert_eq!(snapshot.order(), ["a", "b", "c", "d", "e"]);

        let snapshot = snapshot.delete_node("d").unwrap();
        assert_eq!(snapshot.order(), ["a", "b", "c", "e"]);
    }

    #[test]
    fn evaluate_does_not_store() {
        let snapshot = base();
        assert_eq!(snapshot.evaluate("c"), Some(3));
        assert_eq!(snapshot.evaluate("c"), snapshot.evaluate("c"));
        assert_eq!(snapshot.evaluate("missing"), None);
    }

    #[test]
    fn accessors_follow_topological_order() {
        let snapshot = base();
        let values: Vec<_> = snapshot
            .values()
            .map(|(id, value)| (id.to_string(), *value))
            .collect();
        assert_eq!(values, [("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]);

        let ids: Vec<_> = snapshot.nodes().map(|node| node.id().clone()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(snapshot.len(), 3);
        assert!(!snapshot.is_empty());
        assert!(Snapshot::<i64>::default().is_empty());
    }

    #[test]
    fn ancestors_walk_dependencies_breadth_first() {
        let snapshot = base()
            .add_node("d", ["c", "a"], sum)
            .and_then(|s| s.add_node("e", ["d", "b"], sum))
            .unwrap();

        assert_eq!(snapshot.ancestors("e").unwrap(), ["d", "b", "c", "a"]);
        assert_eq!(snapshot.ancestors("c").unwrap(), ["a", "b"]);
        assert!(snapshot.ancestors("a").unwrap().is_empty());
        assert_eq!(snapshot.ancestors("missing"), None);
    }
}
