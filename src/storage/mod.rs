//! # Graph Store Trait
//!
//! The contract between the mutation interpreter and a property-graph
//! store. A driver for an external database implements this trait; the
//! crate ships [`MemoryStore`] as the reference implementation.
//!
//! Stores assign their own node ids. The translation's ids never reach the
//! store: reusable nodes are found again by labels plus natural-key
//! properties, private nodes by the structure around them.

pub mod memory;

use async_trait::async_trait;

use crate::model::*;
use crate::tx::{Transaction, TxMode};
use crate::Result;

pub use memory::{GraphSnapshot, MemoryStore, MemoryTx, NodeKey};

/// The universal storage contract.
#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// The transaction type for this store.
    type Tx: Transaction;

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Begin a new transaction. A store that cannot admit another writer
    /// fails with [`crate::Error::TxConflict`].
    async fn begin_tx(&self, mode: TxMode) -> Result<Self::Tx>;

    async fn commit_tx(&self, tx: Self::Tx) -> Result<()>;

    /// Undo every write made in `tx`.
    async fn rollback_tx(&self, tx: Self::Tx) -> Result<()>;

    // ========================================================================
    // Node CRUD
    // ========================================================================

    async fn create_node(
        &self,
        tx: &mut Self::Tx,
        labels: &[NodeLabel],
        props: PropertyMap,
    ) -> Result<NodeId>;

    async fn get_node(&self, tx: &Self::Tx, id: &NodeId) -> Result<Option<Node>>;

    /// Delete a node. Returns true if it existed.
    /// Fails if the node still has relationships.
    async fn delete_node(&self, tx: &mut Self::Tx, id: &NodeId) -> Result<bool>;

    /// `DETACH DELETE n`.
    async fn detach_delete_node(&self, tx: &mut Self::Tx, id: &NodeId) -> Result<(bool, u64)> {
        let rels = self.get_relationships(tx, id, Direction::Both, None).await?;
        let mut removed = 0;
        for rel in &rels {
            if self.delete_relationship(tx, rel.id).await? {
                removed += 1;
            }
        }
        Ok((self.delete_node(tx, id).await?, removed))
    }

    // ========================================================================
    // Relationship CRUD
    // ========================================================================

    async fn create_relationship(
        &self,
        tx: &mut Self::Tx,
        src: &NodeId,
        dst: &NodeId,
        label: EdgeLabel,
        props: PropertyMap,
    ) -> Result<RelId>;

    async fn get_relationship(&self, tx: &Self::Tx, id: RelId) -> Result<Option<Relationship>>;

    /// Delete a relationship. Returns true if it existed.
    async fn delete_relationship(&self, tx: &mut Self::Tx, id: RelId) -> Result<bool>;

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Relationships of a node, optionally filtered by direction and label.
    async fn get_relationships(
        &self,
        tx: &Self::Tx,
        node: &NodeId,
        dir: Direction,
        label: Option<EdgeLabel>,
    ) -> Result<Vec<Relationship>>;

    // ========================================================================
    // Scan
    // ========================================================================

    async fn all_nodes(&self, tx: &Self::Tx) -> Result<Vec<Node>>;

    async fn all_relationships(&self, tx: &Self::Tx) -> Result<Vec<Relationship>>;

    async fn nodes_by_label(&self, tx: &Self::Tx, label: NodeLabel) -> Result<Vec<Node>>;

    /// Nodes carrying every label in `labels` and every property in `props`.
    ///
    /// Default: scan the first label, then filter.
    async fn nodes_matching(
        &self,
        tx: &Self::Tx,
        labels: &[NodeLabel],
        props: &PropertyMap,
    ) -> Result<Vec<Node>> {
        let candidates = match labels.first() {
            Some(label) => self.nodes_by_label(tx, *label).await?,
            None => self.all_nodes(tx).await?,
        };
        Ok(candidates
            .into_iter()
            .filter(|n| labels.iter().all(|l| n.has_label(*l)))
            .filter(|n| contains_all(&n.properties, props))
            .collect())
    }

    // ========================================================================
    // Schema introspection
    // ========================================================================

    async fn node_count(&self, tx: &Self::Tx) -> Result<u64>;

    async fn relationship_count(&self, tx: &Self::Tx) -> Result<u64>;
}
