//! Dagflow Core
//!
//! This crate maintains a directed acyclic graph of named computation
//! nodes. Each node derives its value from its dependencies' values through
//! a recompute function, and the graph keeps every value consistent as
//! nodes are added, deleted and re-derived.
//!
//! It implements:
//!
//! - Immutable graph snapshots with add, delete and recompute transitions
//! - Cycle prevention by construction
//! - Incremental propagation along a stored topological order
//! - A store that serializes writers and notifies subscribers
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: Snapshots, nodes, errors and the propagation walks
//! - `store`: Actions and the shared store
//! - `value`: A dynamically typed value for heterogeneous graphs
//!
//! # Example
//!
//! ```rust,ignore
//! use dagflow_core::{DependencyValues, Snapshot, NO_DEPS};
//!
//! fn sum(inputs: DependencyValues<i64>) -> i64 {
//!     inputs.values().sum()
//! }
//!
//! let graph = Snapshot::new()
//!     .add_node("a", NO_DEPS, |_| 1)?
//!     .add_node("b", NO_DEPS, |_| 2)?
//!     .add_node("c", ["a", "b"], sum)?;
//! assert_eq!(graph.value("c"), Some(&3));
//!
//! // Re-derive `a`; `c` follows.
//! let graph = graph.recompute_node("a", |_| 10)?;
//! assert_eq!(graph.value("c"), Some(&12));
//! ```

pub mod graph;
pub mod store;
pub mod value;

pub use graph::{
    constant, recompute_fn, Dependencies, DependencyValues, GraphError, GraphResult, Node, NodeId,
    RecomputeFn, Snapshot, Topology, TopologyEntry, NO_DEPS,
};
pub use store::{Action, Listener, Store, SubscriberId};
pub use value::{Callable, Value};
