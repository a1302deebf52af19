//! Relationship: an edge as persisted by a store.

use serde::{Deserialize, Serialize};

use super::{Edge, NodeId};

/// Store-assigned relationship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelId(pub u64);

impl std::fmt::Display for RelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// A stored edge together with its store identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelId,
    pub edge: Edge,
}

impl Relationship {
    pub fn new(id: RelId, edge: Edge) -> Self {
        Self { id, edge }
    }

    /// The "other" end of the relationship from the given node.
    pub fn other_node(&self, from: &NodeId) -> Option<&NodeId> {
        if *from == self.edge.from { Some(&self.edge.to) }
        else if *from == self.edge.to { Some(&self.edge.from) }
        else { None }
    }
}
