//! Propagation Engine
//!
//! The graph walks used by snapshot transitions. None of these own state:
//! they read (and, for value refreshes, write) collections handed to them by
//! the snapshot being built.
//!
//! # Algorithms
//!
//! - **Ancestor walk**: breadth-first over dependency edges from a source
//!   node, yielding every dependency reached exactly once. The source itself
//!   is never yielded. Used to register and deregister a node in its
//!   ancestors' dependent sets.
//!
//! - **Ordered dependent refresh**: replays a node's dependent set in its
//!   stored order. Dependents are registered at their own insertion time, so
//!   that order is already topological and no sort is needed. Removals keep
//!   the relative order of the remaining entries, which keeps this true
//!   across deletes as well.

use std::collections::{HashMap, HashSet, VecDeque};

use super::node::{DependencyValues, Node, NodeId};

/// Every node the source transitively depends on, in breadth-first order.
///
/// Dependencies that are missing from `nodes` are still yielded but not
/// expanded.
pub(crate) fn ancestors<'a, V>(
    nodes: &'a HashMap<NodeId, Node<V>>,
    source: &'a NodeId,
) -> Vec<NodeId> {
    let mut visited = Vec::new();
    let mut seen: HashSet<&NodeId> = HashSet::new();
    let mut queue: VecDeque<&NodeId> = VecDeque::new();

    seen.insert(source);
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let Some(node) = nodes.get(current) else {
            continue;
        };

        for dep_id in node.dependencies() {
            if seen.insert(dep_id) {
                visited.push(dep_id.clone());
                queue.push_back(dep_id);
            }
        }
    }

    visited
}

/// Copy the current values of a node's declared dependencies.
pub(crate) fn dependency_values<V: Clone>(
    node: &Node<V>,
    values: &HashMap<NodeId, V>,
) -> DependencyValues<V> {
    node.dependencies()
        .iter()
        .filter_map(|dep_id| values.get(dep_id).map(|value| (dep_id.clone(), value.clone())))
        .collect()
}

/// Recompute one node's value from its dependencies and store it.
///
/// Returns `false` if the node is unknown.
pub(crate) fn refresh_value<V: Clone>(
    nodes: &HashMap<NodeId, Node<V>>,
    values: &mut HashMap<NodeId, V>,
    node_id: &NodeId,
) -> bool {
    let Some(node) = nodes.get(node_id) else {
        return false;
    };

    let inputs = dependency_values(node, values);
    let value = node.compute(inputs);
    values.insert(node_id.clone(), value);

    tracing::trace!(node = %node_id, "value recomputed");
    true
}

/// Recompute every dependent of `source`, in stored order.
///
/// Returns the number of dependents recomputed.
pub(crate) fn refresh_dependents<V: Clone>(
    nodes: &HashMap<NodeId, Node<V>>,
    values: &mut HashMap<NodeId, V>,
    source: &NodeId,
) -> usize {
    let Some(node) = nodes.get(source) else {
        return 0;
    };

    node.dependents()
        .iter()
        .filter(|dependent_id| refresh_value(nodes, values, dependent_id))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{constant, recompute_fn, Dependencies};

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<NodeId, Node<i64>> {
        edges
            .iter()
            .map(|(id, deps)| {
                let deps: Dependencies = deps.iter().copied().map(NodeId::from).collect();
                (NodeId::from(*id), Node::new(NodeId::from(*id), deps, constant(0)))
            })
            .collect()
    }

    #[test]
    fn ancestors_are_breadth_first() {
        let nodes = graph(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a", "b"]),
            ("d", &["b", "c"]),
            ("e", &["a", "d"]),
            ("f", &["b", "c"]),
            ("g", &["d", "f"]),
        ]);

        assert_eq!(ancestors(&nodes, &NodeId::from("g")), ["d", "f", "b", "c", "a"]);
        assert_eq!(ancestors(&nodes, &NodeId::from("e")), ["a", "d", "b", "c"]);
    }

    #[test]
    fn ancestors_of_root_is_empty() {
        let nodes = graph(&[("a", &[]), ("b", &["a"])]);
        assert!(ancestors(&nodes, &NodeId::from("a")).is_empty());
    }

    #[test]
    fn ancestors_visit_each_node_once() {
        let nodes = graph(&[("a", &[]), ("b", &["a", "a"]), ("c", &["b", "a", "b"])]);
        assert_eq!(ancestors(&nodes, &NodeId::from("c")), ["b", "a"]);
    }

    #[test]
    fn refresh_value_uses_current_inputs() {
        let mut nodes = graph(&[("a", &[]), ("b", &[])]);
        let sum = recompute_fn(|inputs: DependencyValues<i64>| inputs.values().sum());
        let deps: Dependencies = ["a", "b"].into_iter().map(NodeId::from).collect();
        nodes.insert(NodeId::from("c"), Node::new(NodeId::from("c"), deps, sum));

        let mut values: HashMap<NodeId, i64> = HashMap::new();
        values.insert(NodeId::from("a"), 10);
        values.insert(NodeId::from("b"), 2);

        assert!(refresh_value(&nodes, &mut values, &NodeId::from("c")));
        assert_eq!(values.get("c"), Some(&12));
        assert!(!refresh_value(&nodes, &mut values, &NodeId::from("missing")));
    }

    #[test]
    fn dependency_values_keep_declaration_order() {
        let deps: Dependencies = ["b", "a"].into_iter().map(NodeId::from).collect();
        let node = Node::new(NodeId::from("c"), deps, constant(0));

        let mut values: HashMap<NodeId, i64> = HashMap::new();
        values.insert(NodeId::from("a"), 1);
        values.insert(NodeId::from("b"), 2);
        values.insert(NodeId::from("z"), 26);

        let inputs = dependency_values(&node, &values);
        let keys: Vec<_> = inputs.keys().cloned().collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
