//! Node in the property graph.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{NodeLabel, PropertyMap, Value};

/// Node identifier.
///
/// The variant records which identity scheme produced the id, so the
/// reusable/private distinction travels with the id itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    /// Content-addressed: a hex digest of the object's canonical form, or
    /// an interned token when the session uses the interned scheme.
    Content(String),
    /// Session-unique: the next value of a per-session counter.
    Session(u64),
}

impl NodeId {
    /// Reusable ids may be shared by independently translated structures.
    pub fn is_reusable(&self) -> bool {
        matches!(self, NodeId::Content(_))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Content(hex) => f.write_str(hex),
            NodeId::Session(n) => write!(f, "{n}"),
        }
    }
}

/// A node in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Primary label first, category labels after it.
    pub labels: SmallVec<[NodeLabel; 3]>,
    pub properties: PropertyMap,
}

impl Node {
    /// Node with `primary` as its first label followed by its categories.
    pub fn new(id: NodeId, primary: NodeLabel) -> Self {
        let mut labels = SmallVec::new();
        labels.push(primary);
        labels.extend(primary.categories().iter().copied());
        Self {
            id,
            labels,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_labels(id: NodeId, labels: impl IntoIterator<Item = NodeLabel>) -> Self {
        Self {
            id,
            labels: labels.into_iter().collect(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The construct this node encodes. `None` only for a label-less node.
    pub fn primary_label(&self) -> Option<NodeLabel> {
        self.labels.first().copied()
    }

    pub fn has_label(&self, label: NodeLabel) -> bool {
        self.labels.contains(&label)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    pub fn is_reusable(&self) -> bool {
        self.id.is_reusable()
    }
}
