//! Transition errors.

use thiserror::Error;

use super::node::NodeId;

/// Why a graph transition was rejected.
///
/// Every variant is detected before the transition touches anything, so a
/// failed call leaves the caller's snapshot exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node with this ID is already in the graph.
    #[error("node {0} already exists")]
    AlreadyExists(NodeId),

    /// A declared dependency is not in the graph.
    #[error("dependency {0} does not exist")]
    UnknownDependency(NodeId),

    /// The targeted node is not in the graph.
    #[error("node {0} does not exist")]
    NotFound(NodeId),

    /// The node still has dependents and cannot be deleted.
    #[error("cannot delete {0} since it has dependents")]
    HasDependents(NodeId),
}

impl GraphError {
    /// The node ID the error is about.
    pub fn node_id(&self) -> &NodeId {
        match self {
            Self::AlreadyExists(id)
            | Self::UnknownDependency(id)
            | Self::NotFound(id)
            | Self::HasDependents(id) => id,
        }
    }
}

/// Result of a graph transition.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_node() {
        let err = GraphError::HasDependents(NodeId::from("a"));
        assert_eq!(err.to_string(), "cannot delete a since it has dependents");
        assert_eq!(err.node_id(), "a");

        let err = GraphError::UnknownDependency(NodeId::from("x"));
        assert_eq!(err.to_string(), "dependency x does not exist");
    }
}
