//! # owl-lpg: OWL2 ontologies as labeled property graphs
//!
//! A bidirectional codec between the OWL2 structural model and a
//! labeled-property-graph encoding, plus the graph mutations needed to
//! keep a stored graph in step with a changing ontology.
//!
//! ## Design Principles
//!
//! 1. **Two kinds of node**: entities, IRIs, literals and the versioning
//!    scaffold are *reusable* (content-addressed, upserted, shared across
//!    axioms); axioms and anonymous expressions are *private* (one node per
//!    occurrence, created and deleted with their axiom).
//! 2. **Translation is a value**: `Translator` builds a `Translation` tree
//!    without touching any store.
//! 3. **Queries are data**: `query::synthesize_create` / `synthesize_delete`
//!    produce a typed Cypher AST that renders to text or runs directly via
//!    `execution::execute` against any `GraphStore`.
//! 4. **Same graph both ways**: live writes and the bulk export share the
//!    `layout` helpers, so both produce the same graph.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use owl_lpg::{OntologyGraph, VersioningContext};
//! use owl_lpg::owl::{Axiom, Class, ClassExpression};
//!
//! # async fn example() -> owl_lpg::Result<()> {
//! let graph = OntologyGraph::open_memory()?;
//! let ctx = VersioningContext::new("project", "main", "pizza.owl");
//!
//! graph.add_axiom(&ctx, &Axiom::declaration(Class::new("http://x/Pizza"))).await?;
//! graph
//!     .add_axiom(&ctx, &Axiom::sub_class_of(ClassExpression::class("http://x/Pizza"), ClassExpression::class("http://x/Food")))
//!     .await?;
//!
//! for axiom in graph.axioms(&ctx).await? {
//!     println!("{axiom}");
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod owl;
pub mod identity;
pub mod session;
pub mod config;
pub mod translate;
pub mod layout;
pub mod query;
pub mod execution;
pub mod storage;
pub mod tx;
pub mod export;
pub mod reconstruct;

use std::fmt;

use tracing::{debug, warn};

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Direction, Edge, EdgeLabel, Node, NodeId, NodeLabel, PropertyMap, RelId, Relationship, Value,
};
pub use identity::{DigestAlgorithm, IdentityPolicy, IdentityScheme};
pub use session::{Session, SessionConfig};
pub use config::{CodecConfig, ExportConfig};
pub use translate::{Translation, Translator};
pub use layout::VersioningContext;
pub use query::{synthesize_create, synthesize_delete, Query};
pub use execution::MutationStats;
pub use storage::{GraphStore, MemoryStore};
pub use tx::{Transaction, TxId, TxMode};
pub use export::{BulkExporter, ExportSummary, RowFormat, TrackerPolicy};
pub use reconstruct::{reconstruct, NodeIndex};

use owl::Axiom;
use reconstruct::{HandlerRegistry, NodeMapper};

// ============================================================================
// Top-level handle
// ============================================================================

/// One change to an ontology document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxiomChange {
    Add(Axiom),
    Remove(Axiom),
}

impl fmt::Display for AxiomChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxiomChange::Add(axiom) => write!(f, "add {axiom}"),
            AxiomChange::Remove(axiom) => write!(f, "remove {axiom}"),
        }
    }
}

/// An ontology stored in a graph. Wraps a store and the session used to
/// translate axioms for it.
pub struct OntologyGraph<S: GraphStore> {
    store: S,
    session: Session,
    config: CodecConfig,
}

impl<S: GraphStore> OntologyGraph<S> {
    pub fn with_store(store: S, config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let session = Session::new(&config.session)?;
        Ok(Self { store, session, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The statement that writes `axiom` under `ctx`.
    pub fn create_query(&self, ctx: &VersioningContext, axiom: &Axiom) -> Result<Query> {
        let translation = Translator::new(&self.session).translate_axiom(axiom)?;
        synthesize_create(&self.session, ctx, &translation)
    }

    /// The statement that removes one occurrence of `axiom` under `ctx`.
    pub fn delete_query(&self, ctx: &VersioningContext, axiom: &Axiom) -> Result<Query> {
        let translation = Translator::new(&self.session).translate_axiom(axiom)?;
        synthesize_delete(&self.session, ctx, &translation)
    }

    pub async fn add_axiom(&self, ctx: &VersioningContext, axiom: &Axiom) -> Result<MutationStats> {
        self.apply(ctx, &[AxiomChange::Add(axiom.clone())]).await
    }

    pub async fn remove_axiom(&self, ctx: &VersioningContext, axiom: &Axiom) -> Result<MutationStats> {
        self.apply(ctx, &[AxiomChange::Remove(axiom.clone())]).await
    }

    /// Apply `changes` in order inside one write transaction. On the first
    /// failure the transaction is rolled back and the error names the
    /// change and its position.
    pub async fn apply(&self, ctx: &VersioningContext, changes: &[AxiomChange]) -> Result<MutationStats> {
        let mut tx = self.store.begin_tx(TxMode::ReadWrite).await?;
        let mut stats = MutationStats::default();

        for (position, change) in changes.iter().enumerate() {
            let applied = match change {
                AxiomChange::Add(axiom) => self.create_query(ctx, axiom),
                AxiomChange::Remove(axiom) => self.delete_query(ctx, axiom),
            };
            let applied = match applied {
                Ok(query) => execution::execute(&self.store, &mut tx, &query).await,
                Err(e) => Err(e),
            };
            match applied {
                Ok(s) => stats.absorb(s),
                Err(e) => {
                    if let Err(rollback) = self.store.rollback_tx(tx).await {
                        warn!(error = %rollback, "rollback after failed change did not complete");
                    }
                    return Err(Error::at_position(position, change, e));
                }
            }
        }

        self.store.commit_tx(tx).await?;
        debug!(changes = changes.len(), ?stats, "changes applied");
        Ok(stats)
    }
}

impl<S: GraphStore + NodeIndex> OntologyGraph<S> {
    /// Every axiom the document links to, rebuilt from the graph and
    /// sorted. An unknown document has no axioms.
    pub async fn axioms(&self, ctx: &VersioningContext) -> Result<Vec<Axiom>> {
        let tx = self.store.begin_tx(TxMode::ReadOnly).await?;
        let documents = self
            .store
            .nodes_matching(
                &tx,
                &[NodeLabel::OntologyDocument],
                &ctx.document_key(),
            )
            .await?;

        let mut axioms = {
            let mut mapper = NodeMapper::new(&self.store, HandlerRegistry::standard());
            let mut axioms = Vec::new();
            for document in &documents {
                for (_, node) in self.store.adjacent(document, EdgeLabel::Axiom)? {
                    axioms.push(mapper.to_axiom(&node)?);
                }
            }
            axioms
        };
        self.store.commit_tx(tx).await?;

        axioms.sort();
        Ok(axioms)
    }
}

impl OntologyGraph<MemoryStore> {
    /// In-memory graph with the default configuration.
    pub fn open_memory() -> Result<Self> {
        Self::with_store(MemoryStore::new(), CodecConfig::default())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot translate {construct}: {message}")]
    Construction { construct: String, message: String },

    #[error("Identity error: {0}")]
    Identity(String),

    #[error("Unrecognized node kind: {0}")]
    UnrecognizedNodeKind(String),

    #[error("Unknown edge label: {0}")]
    UnknownEdgeLabel(String),

    #[error("Malformed graph at {node}: {message}")]
    MalformedGraph { node: String, message: String },

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Query error: {0}")]
    Query(String),

    #[error("Transaction conflict: {0}")]
    TxConflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export failed after {rows} rows ({bytes} bytes): {source}")]
    Export {
        rows: u64,
        bytes: u64,
        #[source]
        source: Box<Error>,
    },

    #[error("#{position} {object}: {source}")]
    AtPosition {
        position: usize,
        object: String,
        #[source]
        source: Box<Error>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Only a conflicting concurrent writer is worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::TxConflict(_) => true,
            Error::AtPosition { source, .. } | Error::Export { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Wrap a per-object failure of a batch.
    pub fn at_position(position: usize, object: &impl fmt::Display, source: Error) -> Self {
        Error::AtPosition { position, object: object.to_string(), source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owl::{Class, ClassExpression};

    fn ctx() -> VersioningContext {
        VersioningContext::new("p", "main", "doc")
    }

    #[test]
    fn test_construction_error_names_construct() {
        let err = Error::Construction { construct: "ObjectUnionOf".into(), message: "needs two operands".into() };
        assert_eq!(err.to_string(), "cannot translate ObjectUnionOf: needs two operands");
    }

    #[test]
    fn test_retryable_sees_through_position() {
        let err = Error::at_position(3, &"add X", Error::TxConflict("busy".into()));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("#3 add X"));
        assert!(!Error::Query("bad".into()).is_retryable());
    }

    #[tokio::test]
    async fn test_add_then_read_back() {
        let graph = OntologyGraph::open_memory().unwrap();
        let decl = Axiom::declaration(Class::new("http://x/A"));
        let sub = Axiom::sub_class_of(ClassExpression::class("http://x/A"), ClassExpression::class("http://x/B"));
        graph.add_axiom(&ctx(), &decl).await.unwrap();
        graph.add_axiom(&ctx(), &sub).await.unwrap();

        let mut expected = vec![decl, sub];
        expected.sort();
        assert_eq!(graph.axioms(&ctx()).await.unwrap(), expected);
        assert!(graph.axioms(&VersioningContext::new("p", "main", "other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back() {
        let graph = OntologyGraph::open_memory().unwrap();
        let before = graph.store().snapshot();
        let bad = Axiom::new(owl::AxiomKind::EquivalentClasses([ClassExpression::class("http://x/A")].into()));
        let err = graph
            .apply(
                &ctx(),
                &[AxiomChange::Add(Axiom::declaration(Class::new("http://x/A"))), AxiomChange::Add(bad)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AtPosition { position: 1, .. }));
        assert_eq!(graph.store().snapshot(), before);
    }
}
