//! Cypher AST for synthesized mutations.
//!
//! Only the subset the synthesizer emits: node/relationship patterns with
//! literal property maps, the read and write clauses that use them, and an
//! orphan sweep. These types are pure data; [`super::render`] turns them
//! into Cypher text and [`crate::execution`] runs them against a store.

use crate::model::{EdgeLabel, NodeLabel, PropertyMap};

/// A complete statement: clauses run in order over a shared row set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// One clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `[OPTIONAL] MATCH p1, p2 [WHERE ...]`. Relationships are distinct
    /// within one clause.
    Match(MatchClause),
    /// `MERGE p`: find the pattern or create it whole.
    Merge(Pattern),
    /// `CREATE p1, p2`
    Create(Vec<Pattern>),
    /// `WITH v1, v2 [LIMIT n]`
    With { variables: Vec<String>, limit: Option<usize> },
    /// `[DETACH] DELETE v1, v2`
    Delete { variables: Vec<String>, detach: bool },
    /// Delete each candidate node that has become an orphan.
    Sweep { candidates: Vec<String>, mode: SweepMode },
}

/// When a swept node counts as orphaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// No incoming relationship left; outgoing ones go with the node.
    NoIncoming,
    /// No relationship at all.
    Isolated,
}

/// MATCH clause with patterns and an optional conjunctive filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClause {
    pub optional: bool,
    pub patterns: Vec<Pattern>,
    pub predicates: Vec<Predicate>,
}

/// Filter conditions on bound variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `COUNT { (v)-->() } = degree`
    OutDegree { variable: String, degree: usize },
}

/// A path: node, then alternating relationship and node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn node(node: NodePattern) -> Self {
        Self { elements: vec![PatternElement::Node(node)] }
    }

    pub fn path(from: NodePattern, rel: RelPattern, to: NodePattern) -> Self {
        Self {
            elements: vec![
                PatternElement::Node(from),
                PatternElement::Relationship(rel),
                PatternElement::Node(to),
            ],
        }
    }
}

/// Element of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElement {
    Node(NodePattern),
    Relationship(RelPattern),
}

/// `(alias:Label1:Label2 {prop: value})`. Empty labels and properties on a
/// bound alias render as a bare reference `(alias)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePattern {
    pub alias: Option<String>,
    pub labels: Vec<NodeLabel>,
    pub properties: PropertyMap,
}

impl NodePattern {
    pub fn reference(alias: impl Into<String>) -> Self {
        Self { alias: Some(alias.into()), labels: Vec::new(), properties: PropertyMap::new() }
    }

    pub fn anonymous() -> Self {
        Self { alias: None, labels: Vec::new(), properties: PropertyMap::new() }
    }

    pub fn is_reference(&self) -> bool {
        self.labels.is_empty() && self.properties.is_empty()
    }
}

/// `-[alias:TYPE {props}]->`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelPattern {
    pub alias: Option<String>,
    pub label: EdgeLabel,
    pub direction: PatternDirection,
    pub properties: PropertyMap,
}

/// Pattern direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternDirection {
    /// ->
    Right,
    /// <-
    Left,
    /// - (undirected)
    Both,
}
