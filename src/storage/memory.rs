//! In-memory graph store.
//!
//! This is the reference implementation of `GraphStore`. It uses plain
//! maps protected by `parking_lot::RwLock`.
//!
//! ## Transactions
//!
//! - **One writer at a time**: a second `ReadWrite` transaction fails with
//!   `Error::TxConflict` until the first commits or rolls back.
//! - **Undo journal**: writes are applied immediately and journaled;
//!   `rollback_tx()` (or dropping an open transaction) replays the journal
//!   backwards.
//! - **Read-uncommitted**: readers see a writer's changes before commit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::GraphStore;
use crate::model::*;
use crate::reconstruct::NodeIndex;
use crate::tx::{Transaction, TxId, TxMode};
use crate::{Error, Result};

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory property graph storage.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node id → ids of every relationship touching it
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    label_index: RwLock<HashMap<NodeLabel, Vec<NodeId>>>,
    writer: Mutex<Option<TxId>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
    next_tx_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                nodes: RwLock::new(HashMap::new()),
                relationships: RwLock::new(HashMap::new()),
                adjacency: RwLock::new(HashMap::new()),
                label_index: RwLock::new(HashMap::new()),
                writer: Mutex::new(None),
                next_node_id: AtomicU64::new(1),
                next_rel_id: AtomicU64::new(1),
                next_tx_id: AtomicU64::new(1),
            }),
        }
    }

    /// Nodes and edges with store ids stripped, sorted. Two stores holding
    /// the same graph produce equal snapshots regardless of write order.
    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self.inner.nodes.read();
        let mut node_keys: Vec<NodeKey> = nodes.values().map(NodeKey::of).collect();
        node_keys.sort();

        let rels = self.inner.relationships.read();
        let mut edge_keys: Vec<(NodeKey, EdgeLabel, Vec<(String, Value)>, NodeKey)> = rels
            .values()
            .filter_map(|r| {
                let from = nodes.get(&r.edge.from)?;
                let to = nodes.get(&r.edge.to)?;
                Some((
                    NodeKey::of(from),
                    r.edge.label,
                    r.edge.properties.clone().into_iter().collect(),
                    NodeKey::of(to),
                ))
            })
            .collect();
        edge_keys.sort();

        GraphSnapshot { nodes: node_keys, edges: edge_keys }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Id-free view of a node, for comparing graphs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeKey {
    pub labels: Vec<NodeLabel>,
    pub properties: Vec<(String, Value)>,
}

impl NodeKey {
    fn of(node: &Node) -> Self {
        Self {
            labels: node.labels.to_vec(),
            properties: node.properties.clone().into_iter().collect(),
        }
    }
}

/// Id-free view of a whole store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeKey>,
    pub edges: Vec<(NodeKey, EdgeLabel, Vec<(String, Value)>, NodeKey)>,
}

impl MemoryInner {
    fn insert_node(&self, node: Node) {
        let id = node.id.clone();
        {
            let mut idx = self.label_index.write();
            for label in &node.labels {
                idx.entry(*label).or_default().push(id.clone());
            }
        }
        self.nodes.write().insert(id.clone(), node);
        self.adjacency.write().entry(id).or_default();
    }

    fn remove_node(&self, id: &NodeId) -> Option<Node> {
        let removed = self.nodes.write().remove(id);
        self.adjacency.write().remove(id);
        if let Some(node) = &removed {
            let mut idx = self.label_index.write();
            for label in &node.labels {
                if let Some(ids) = idx.get_mut(label) {
                    ids.retain(|nid| nid != id);
                }
            }
        }
        removed
    }

    fn insert_relationship(&self, rel: Relationship) {
        let mut adj = self.adjacency.write();
        adj.entry(rel.edge.from.clone()).or_default().push(rel.id);
        if rel.edge.from != rel.edge.to {
            adj.entry(rel.edge.to.clone()).or_default().push(rel.id);
        }
        drop(adj);
        self.relationships.write().insert(rel.id, rel);
    }

    fn remove_relationship(&self, id: RelId) -> Option<Relationship> {
        let removed = self.relationships.write().remove(&id);
        if let Some(rel) = &removed {
            let mut adj = self.adjacency.write();
            for end in [&rel.edge.from, &rel.edge.to] {
                if let Some(rels) = adj.get_mut(end) {
                    rels.retain(|rid| *rid != id);
                }
            }
        }
        removed
    }

    fn outgoing(&self, node: &NodeId, label: EdgeLabel) -> Vec<Relationship> {
        let adj = self.adjacency.read();
        let rels = self.relationships.read();
        adj.get(node)
            .map(|ids| {
                ids.iter()
                    .filter_map(|rid| rels.get(rid))
                    .filter(|r| r.edge.from == *node && r.edge.label == label)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn undo(&self, journal: Vec<Undo>) {
        for step in journal.into_iter().rev() {
            match step {
                Undo::CreatedNode(id) => {
                    self.remove_node(&id);
                }
                Undo::DeletedNode(node) => self.insert_node(node),
                Undo::CreatedRelationship(id) => {
                    self.remove_relationship(id);
                }
                Undo::DeletedRelationship(rel) => self.insert_relationship(rel),
            }
        }
    }

    fn release(&self, id: TxId) {
        let mut writer = self.writer.lock();
        if *writer == Some(id) {
            *writer = None;
        }
    }
}

// ============================================================================
// MemoryTx
// ============================================================================

enum Undo {
    CreatedNode(NodeId),
    DeletedNode(Node),
    CreatedRelationship(RelId),
    DeletedRelationship(Relationship),
}

/// In-memory transaction. Dropping an open read-write transaction rolls
/// it back.
pub struct MemoryTx {
    id: TxId,
    mode: TxMode,
    inner: Arc<MemoryInner>,
    journal: Vec<Undo>,
    open: bool,
}

impl MemoryTx {
    fn check_writable(&self) -> Result<()> {
        if !self.is_writable() {
            return Err(Error::Query(format!("write attempted in read-only transaction {}", self.id)));
        }
        Ok(())
    }

    fn finish(&mut self, rollback: bool) {
        if !self.open {
            return;
        }
        self.open = false;
        let journal = std::mem::take(&mut self.journal);
        if rollback && !journal.is_empty() {
            debug!(tx = %self.id, steps = journal.len(), "rolling back");
            self.inner.undo(journal);
        }
        if self.mode == TxMode::ReadWrite {
            self.inner.release(self.id);
        }
    }
}

impl Transaction for MemoryTx {
    fn mode(&self) -> TxMode { self.mode }
    fn id(&self) -> TxId { self.id }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        self.finish(true);
    }
}

// ============================================================================
// GraphStore impl
// ============================================================================

#[async_trait]
impl GraphStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin_tx(&self, mode: TxMode) -> Result<MemoryTx> {
        let id = TxId(self.inner.next_tx_id.fetch_add(1, Ordering::Relaxed));
        if mode == TxMode::ReadWrite {
            let mut writer = self.inner.writer.lock();
            if let Some(active) = *writer {
                return Err(Error::TxConflict(format!("{active} holds the write lock")));
            }
            *writer = Some(id);
        }
        Ok(MemoryTx { id, mode, inner: Arc::clone(&self.inner), journal: Vec::new(), open: true })
    }

    async fn commit_tx(&self, mut tx: MemoryTx) -> Result<()> {
        tx.finish(false);
        Ok(())
    }

    async fn rollback_tx(&self, mut tx: MemoryTx) -> Result<()> {
        tx.finish(true);
        Ok(())
    }

    // ========================================================================
    // Node CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut MemoryTx,
        labels: &[NodeLabel],
        props: PropertyMap,
    ) -> Result<NodeId> {
        tx.check_writable()?;
        let id = NodeId::Session(self.inner.next_node_id.fetch_add(1, Ordering::Relaxed));
        let mut node = Node::with_labels(id.clone(), labels.iter().copied());
        node.properties = props;
        self.inner.insert_node(node);
        tx.journal.push(Undo::CreatedNode(id.clone()));
        Ok(id)
    }

    async fn get_node(&self, _tx: &MemoryTx, id: &NodeId) -> Result<Option<Node>> {
        Ok(self.inner.nodes.read().get(id).cloned())
    }

    async fn delete_node(&self, tx: &mut MemoryTx, id: &NodeId) -> Result<bool> {
        tx.check_writable()?;
        {
            let adj = self.inner.adjacency.read();
            if let Some(rels) = adj.get(id) {
                if !rels.is_empty() {
                    return Err(Error::ConstraintViolation(format!(
                        "Cannot delete node {id} with {} relationships. Delete relationships first.",
                        rels.len()
                    )));
                }
            }
        }
        match self.inner.remove_node(id) {
            Some(node) => {
                tx.journal.push(Undo::DeletedNode(node));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut MemoryTx,
        src: &NodeId,
        dst: &NodeId,
        label: EdgeLabel,
        props: PropertyMap,
    ) -> Result<RelId> {
        tx.check_writable()?;
        {
            let nodes = self.inner.nodes.read();
            if !nodes.contains_key(src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.inner.next_rel_id.fetch_add(1, Ordering::Relaxed));
        let mut edge = Edge::new(src.clone(), dst.clone(), label);
        edge.properties = props;
        self.inner.insert_relationship(Relationship::new(id, edge));
        tx.journal.push(Undo::CreatedRelationship(id));
        Ok(id)
    }

    async fn get_relationship(&self, _tx: &MemoryTx, id: RelId) -> Result<Option<Relationship>> {
        Ok(self.inner.relationships.read().get(&id).cloned())
    }

    async fn delete_relationship(&self, tx: &mut MemoryTx, id: RelId) -> Result<bool> {
        tx.check_writable()?;
        match self.inner.remove_relationship(id) {
            Some(rel) => {
                tx.journal.push(Undo::DeletedRelationship(rel));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    async fn get_relationships(
        &self,
        _tx: &MemoryTx,
        node: &NodeId,
        dir: Direction,
        label: Option<EdgeLabel>,
    ) -> Result<Vec<Relationship>> {
        let adj = self.inner.adjacency.read();
        let rels = self.inner.relationships.read();

        let mut result = Vec::new();
        for rid in adj.get(node).map(Vec::as_slice).unwrap_or_default() {
            if let Some(rel) = rels.get(rid) {
                let matches_dir = match dir {
                    Direction::Outgoing => rel.edge.from == *node,
                    Direction::Incoming => rel.edge.to == *node,
                    Direction::Both => true,
                };
                let matches_label = label.is_none_or(|l| rel.edge.label == l);
                if matches_dir && matches_label {
                    result.push(rel.clone());
                }
            }
        }
        Ok(result)
    }

    // ========================================================================
    // Scan
    // ========================================================================

    async fn all_nodes(&self, _tx: &MemoryTx) -> Result<Vec<Node>> {
        Ok(self.inner.nodes.read().values().cloned().collect())
    }

    async fn all_relationships(&self, _tx: &MemoryTx) -> Result<Vec<Relationship>> {
        let mut rels: Vec<Relationship> = self.inner.relationships.read().values().cloned().collect();
        rels.sort_by_key(|r| r.id);
        Ok(rels)
    }

    async fn nodes_by_label(&self, _tx: &MemoryTx, label: NodeLabel) -> Result<Vec<Node>> {
        let idx = self.inner.label_index.read();
        let nodes = self.inner.nodes.read();
        Ok(idx
            .get(&label)
            .map(|ids| ids.iter().filter_map(|id| nodes.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    // ========================================================================
    // Schema introspection
    // ========================================================================

    async fn node_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.nodes.read().len() as u64)
    }

    async fn relationship_count(&self, _tx: &MemoryTx) -> Result<u64> {
        Ok(self.inner.relationships.read().len() as u64)
    }
}

// ============================================================================
// NodeIndex impl
// ============================================================================

impl NodeIndex for MemoryStore {
    fn adjacent(&self, node: &Node, label: EdgeLabel) -> Result<Vec<(Edge, Node)>> {
        let rels = self.inner.outgoing(&node.id, label);
        let nodes = self.inner.nodes.read();
        rels.into_iter()
            .map(|rel| {
                let target = nodes.get(&rel.edge.to).cloned().ok_or_else(|| Error::MalformedGraph {
                    node: node.id.to_string(),
                    message: format!("{} points at missing node {}", label, rel.edge.to),
                })?;
                Ok((rel.edge, target))
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn class(iri: &str) -> PropertyMap {
        props([("iri", iri)])
    }

    #[tokio::test]
    async fn test_create_and_get_node() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let id = db.create_node(&mut tx, &[NodeLabel::Class, NodeLabel::Entity], class("http://x/A")).await.unwrap();
        let node = db.get_node(&tx, &id).await.unwrap().unwrap();

        assert_eq!(node.primary_label(), Some(NodeLabel::Class));
        assert_eq!(node.get_str("iri"), Some("http://x/A"));
        db.commit_tx(tx).await.unwrap();
    }

    #[tokio::test]
    async fn test_cannot_delete_connected_node() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();

        let a = db.create_node(&mut tx, &[NodeLabel::SubClassOf], PropertyMap::new()).await.unwrap();
        let b = db.create_node(&mut tx, &[NodeLabel::Class], class("http://x/A")).await.unwrap();
        let rel = db
            .create_relationship(&mut tx, &a, &b, EdgeLabel::SubClassExpression, PropertyMap::new())
            .await
            .unwrap();
        assert_eq!(db.get_relationship(&tx, rel).await.unwrap().map(|r| r.edge.to), Some(b));

        assert!(db.delete_node(&mut tx, &a).await.is_err());
        assert_eq!(db.detach_delete_node(&mut tx, &a).await.unwrap(), (true, 1));
        assert_eq!(db.relationship_count(&tx).await.unwrap(), 0);
        assert!(db.get_relationship(&tx, rel).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rollback_restores_graph() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        let a = db.create_node(&mut tx, &[NodeLabel::Class], class("http://x/A")).await.unwrap();
        db.commit_tx(tx).await.unwrap();
        let before = db.snapshot();

        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        let b = db.create_node(&mut tx, &[NodeLabel::Class], class("http://x/B")).await.unwrap();
        db.create_relationship(&mut tx, &a, &b, EdgeLabel::ClassExpression, PropertyMap::new()).await.unwrap();
        db.detach_delete_node(&mut tx, &a).await.unwrap();
        db.rollback_tx(tx).await.unwrap();

        assert_eq!(db.snapshot(), before);
    }

    #[tokio::test]
    async fn test_dropped_tx_rolls_back_and_releases_writer() {
        let db = MemoryStore::new();
        {
            let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
            db.create_node(&mut tx, &[NodeLabel::Class], class("http://x/A")).await.unwrap();
        }
        let tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        assert_eq!(db.node_count(&tx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_writer_conflicts() {
        let db = MemoryStore::new();
        let first = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        let err = db.begin_tx(TxMode::ReadWrite).await.err().unwrap();
        assert!(err.is_retryable());
        assert!(db.begin_tx(TxMode::ReadOnly).await.is_ok());
        db.commit_tx(first).await.unwrap();
        assert!(db.begin_tx(TxMode::ReadWrite).await.is_ok());
    }

    #[tokio::test]
    async fn test_read_only_tx_rejects_writes() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadOnly).await.unwrap();
        assert!(db.create_node(&mut tx, &[NodeLabel::Class], PropertyMap::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_nodes_matching_uses_labels_and_props() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        db.create_node(&mut tx, &[NodeLabel::Class, NodeLabel::Entity], class("http://x/A")).await.unwrap();
        db.create_node(&mut tx, &[NodeLabel::Iri], class("http://x/A")).await.unwrap();

        let found = db.nodes_matching(&tx, &[NodeLabel::Class], &class("http://x/A")).await.unwrap();
        assert_eq!(found.len(), 1);
        let found = db.nodes_matching(&tx, &[NodeLabel::Entity], &class("http://x/B")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_node_index_follows_outgoing_edges() {
        let db = MemoryStore::new();
        let mut tx = db.begin_tx(TxMode::ReadWrite).await.unwrap();
        let axiom = db.create_node(&mut tx, &[NodeLabel::SubClassOf], PropertyMap::new()).await.unwrap();
        let a = db.create_node(&mut tx, &[NodeLabel::Class], class("http://x/A")).await.unwrap();
        db.create_relationship(&mut tx, &axiom, &a, EdgeLabel::SubClassExpression, PropertyMap::new())
            .await
            .unwrap();
        db.commit_tx(tx).await.unwrap();

        let tx = db.begin_tx(TxMode::ReadOnly).await.unwrap();
        let axiom_node = db.get_node(&tx, &axiom).await.unwrap().unwrap();
        let a_node = db.get_node(&tx, &a).await.unwrap().unwrap();
        assert_eq!(db.adjacent(&axiom_node, EdgeLabel::SubClassExpression).unwrap().len(), 1);
        assert!(db.adjacent(&a_node, EdgeLabel::SubClassExpression).unwrap().is_empty());
    }
}
