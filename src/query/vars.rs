//! Query-scoped variable names.
//!
//! Every node written or matched by one statement gets a variable the
//! first time it appears (`n0`, `n1`, ...); later references reuse it.
//! Relationships get fresh names (`r0`, `r1`, ...).

use std::collections::HashMap;

use super::ast::NodePattern;
use crate::model::{Node, NodeId};
use crate::{Error, Result};

#[derive(Debug, Default)]
pub(crate) struct Vars {
    nodes: HashMap<NodeId, String>,
    next_node: usize,
    next_rel: usize,
}

impl Vars {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_bound(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub(crate) fn name(&self, id: &NodeId) -> Option<&str> {
        self.nodes.get(id).map(String::as_str)
    }

    /// Full pattern on first sight, bare reference afterwards.
    pub(crate) fn node(&mut self, node: &Node) -> NodePattern {
        if let Some(alias) = self.nodes.get(&node.id) {
            return NodePattern::reference(alias.clone());
        }
        let alias = format!("n{}", self.next_node);
        self.next_node += 1;
        self.nodes.insert(node.id.clone(), alias.clone());
        NodePattern {
            alias: Some(alias),
            labels: node.labels.to_vec(),
            properties: node.properties.clone(),
        }
    }

    pub(crate) fn reference(&self, id: &NodeId) -> Result<NodePattern> {
        self.name(id)
            .map(NodePattern::reference)
            .ok_or_else(|| Error::Query(format!("node {id} referenced before it was bound")))
    }

    pub(crate) fn rel(&mut self) -> String {
        let alias = format!("r{}", self.next_rel);
        self.next_rel += 1;
        alias
    }
}
