//! Dependency Graph
//!
//! This module implements the graph state machine: a directed acyclic graph
//! of named nodes, each deriving its value from its dependencies' values.
//!
//! # Overview
//!
//! - Nodes are identified by user-chosen string IDs.
//! - Edges represent dependencies: if B reads from A, A is a dependency of
//!   B and B is a dependent of A.
//! - Every node keeps the full set of its transitive dependents, in
//!   topological order.
//!
//! When a node's recompute function is replaced, the node and then each of
//! its dependents are recomputed in one pass over that stored order.
//!
//! # Design Decisions
//!
//! 1. Snapshots are values, not a shared mutable store. Every transition
//!    returns a new [`Snapshot`] and leaves the old one untouched.
//!
//! 2. Cycles are impossible by construction: a node can only depend on
//!    nodes that already exist.
//!
//! 3. The global insertion order is the topological order, so propagation
//!    never has to sort.

mod error;
mod node;
mod propagation;
mod snapshot;
mod view;

pub use error::{GraphError, GraphResult};
pub use node::{
    constant, recompute_fn, Dependencies, DependencyValues, Node, NodeId, RecomputeFn, NO_DEPS,
};
pub use snapshot::Snapshot;
pub use view::{Topology, TopologyEntry};
