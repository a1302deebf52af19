//! `NodeIndex` over an in-memory `Translation`.

use hashbrown::HashMap;

use super::NodeIndex;
use crate::model::{Edge, EdgeLabel, Node, NodeId};
use crate::translate::Translation;
use crate::{Error, Result};

/// Adjacency of one translation tree.
#[derive(Debug, Default)]
pub struct TranslationIndex {
    nodes: HashMap<NodeId, Node>,
    outgoing: HashMap<NodeId, Vec<Edge>>,
}

impl TranslationIndex {
    pub fn new(translation: &Translation) -> Self {
        let mut index = Self::default();
        index.extend(translation);
        index
    }

    /// Add another translation's nodes and edges.
    pub fn extend(&mut self, translation: &Translation) {
        for node in translation.all_nodes() {
            self.nodes.entry(node.id.clone()).or_insert_with(|| node.clone());
        }
        for edge in translation.all_edges() {
            let out = self.outgoing.entry(edge.from.clone()).or_default();
            if !(edge.is_reusable() && out.contains(edge)) {
                out.push(edge.clone());
            }
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }
}

impl NodeIndex for TranslationIndex {
    fn adjacent(&self, node: &Node, label: EdgeLabel) -> Result<Vec<(Edge, Node)>> {
        self.outgoing
            .get(&node.id)
            .into_iter()
            .flatten()
            .filter(|e| e.label == label)
            .map(|e| {
                let target = self.nodes.get(&e.to).ok_or_else(|| Error::MalformedGraph {
                    node: node.id.to_string(),
                    message: format!("{label} points at unknown node {}", e.to),
                })?;
                Ok((e.clone(), target.clone()))
            })
            .collect()
    }
}
