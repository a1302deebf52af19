//! # Graph to ontology
//!
//! Rebuilds OWL objects from their graph encoding. Dispatch is on a node's
//! primary label; each handler follows the node's outgoing edges by label
//! and maps the targets recursively.
//!
//! The graph is reached through [`NodeIndex`], implemented by
//! [`MemoryStore`](crate::storage::MemoryStore) for stored graphs and by
//! [`TranslationIndex`] for a translation that was never written.

mod handlers;
mod index;
mod mapper;
mod registry;

pub use index::TranslationIndex;
pub use mapper::NodeMapper;
pub use registry::{Handler, HandlerRegistry};

use crate::model::{Edge, EdgeLabel, Node};
use crate::owl::OwlObject;
use crate::translate::Translation;
use crate::{Error, Result};

/// Outgoing-edge lookup over some graph.
pub trait NodeIndex {
    /// Every `label` edge leaving `node`, with its target.
    fn adjacent(&self, node: &Node, label: EdgeLabel) -> Result<Vec<(Edge, Node)>>;

    /// The single target of a mandatory role.
    fn adjacent_one(&self, node: &Node, label: EdgeLabel) -> Result<Node> {
        let mut found = self.adjacent(node, label)?;
        match found.len() {
            1 => Ok(found.remove(0).1),
            n => Err(Error::MalformedGraph {
                node: describe(node),
                message: format!("expected one {label} edge, found {n}"),
            }),
        }
    }

    fn adjacent_nodes(&self, node: &Node, label: EdgeLabel) -> Result<Vec<Node>> {
        Ok(self.adjacent(node, label)?.into_iter().map(|(_, n)| n).collect())
    }
}

/// Reconstruct the object rooted at `node`.
pub fn reconstruct(node: &Node, index: &dyn NodeIndex) -> Result<OwlObject> {
    NodeMapper::new(index, HandlerRegistry::standard()).map(node)
}

/// Reconstruct a translation's root object from the translation alone.
pub fn reconstruct_translation(translation: &Translation) -> Result<OwlObject> {
    let index = TranslationIndex::new(translation);
    reconstruct(&translation.main_node, &index)
}

pub(crate) fn describe(node: &Node) -> String {
    match node.primary_label() {
        Some(label) => format!("{label} {}", node.id),
        None => node.id.to_string(),
    }
}
