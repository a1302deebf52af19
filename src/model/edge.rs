//! Edge between two translated nodes.

use serde::{Deserialize, Serialize};

use super::{EdgeLabel, NodeId, PropertyMap, Value};

/// A directed, labeled edge. Value type: equal by content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: EdgeLabel,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, label: EdgeLabel) -> Self {
        Self {
            from,
            to,
            label,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Only an edge between two reusable nodes can be produced by more than
    /// one translation; an edge touching a private node is unique.
    pub fn is_reusable(&self) -> bool {
        self.from.is_reusable() && self.to.is_reusable()
    }

    /// Dedup key for reusable edges.
    pub fn key(&self) -> (NodeId, NodeId, EdgeLabel) {
        (self.from.clone(), self.to.clone(), self.label)
    }
}
