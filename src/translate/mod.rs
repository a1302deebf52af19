//! # Structural Translator
//!
//! Builds a [`Translation`] tree from an OWL object, one `translate_*`
//! method per syntactic category. Each construct gets a main node whose id
//! comes from the session, plus one typed edge and one nested translation
//! per structural child.
//!
//! Translations are plain values built bottom-up; nothing is mutated once
//! a child translation has been returned.

mod entity;
mod expression;
mod annotation;
mod axiom;

pub use entity::entity_label;

use std::collections::HashSet;

use crate::model::{Edge, EdgeLabel, Node, NodeId, NodeLabel, Value};
use crate::owl::OwlObject;
use crate::session::Session;
use crate::{Error, Result};

/// A translated object: its main node, the edges leaving it and one nested
/// translation per edge, in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub translated: OwlObject,
    pub main_node: Node,
    pub edges: Vec<Edge>,
    pub nested: Vec<Translation>,
}

impl Translation {
    /// Leaf translation with no outgoing edges.
    pub fn leaf(translated: OwlObject, main_node: Node) -> Self {
        Self { translated, main_node, edges: Vec::new(), nested: Vec::new() }
    }

    pub fn id(&self) -> &NodeId {
        &self.main_node.id
    }

    /// Outgoing edges paired with the translation each one points to.
    pub fn children(&self) -> impl Iterator<Item = (&Edge, &Translation)> {
        self.edges.iter().zip(self.nested.iter())
    }

    /// Every distinct node in the tree, main node first, depth-first.
    pub fn all_nodes(&self) -> Vec<&Node> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.visit(&mut |t| {
            if seen.insert(&t.main_node.id) {
                out.push(&t.main_node);
            }
        });
        out
    }

    /// Every edge in the tree. A reusable edge reached through more than
    /// one path is listed once.
    pub fn all_edges(&self) -> Vec<&Edge> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.visit(&mut |t| {
            for edge in &t.edges {
                if !edge.is_reusable() || seen.insert(edge.key()) {
                    out.push(edge);
                }
            }
        });
        out
    }

    pub fn nodes_with_label(&self, label: NodeLabel) -> Vec<&Node> {
        self.all_nodes().into_iter().filter(|n| n.has_label(label)).collect()
    }

    pub fn edges_with_label(&self, label: EdgeLabel) -> Vec<&Edge> {
        self.all_edges().into_iter().filter(|e| e.label == label).collect()
    }

    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Translation)) {
        f(self);
        for child in &self.nested {
            child.visit(f);
        }
    }
}

/// Accumulates the children of one construct.
pub(crate) struct Builder {
    translated: OwlObject,
    main_node: Node,
    edges: Vec<Edge>,
    nested: Vec<Translation>,
}

impl Builder {
    pub(crate) fn new(translated: OwlObject, main_node: Node) -> Self {
        Self { translated, main_node, edges: Vec::new(), nested: Vec::new() }
    }

    /// Single-valued role.
    pub(crate) fn child(mut self, label: EdgeLabel, child: Translation) -> Self {
        self.push(Edge::new(self.main_node.id.clone(), child.id().clone(), label), child);
        self
    }

    /// Unordered multi-valued role. A repeated content-addressed child
    /// collapses to one edge; private children never do.
    pub(crate) fn children(
        mut self,
        label: EdgeLabel,
        children: impl IntoIterator<Item = Translation>,
    ) -> Self {
        for child in children {
            let duplicate = child.main_node.is_reusable()
                && self.edges.iter().any(|e| e.label == label && &e.to == child.id());
            if !duplicate {
                self.push(Edge::new(self.main_node.id.clone(), child.id().clone(), label), child);
            }
        }
        self
    }

    /// Ordered multi-valued role. Each edge carries its position as `index`.
    pub(crate) fn indexed_children(mut self, label: EdgeLabel, children: Vec<Translation>) -> Self {
        for (index, child) in children.into_iter().enumerate() {
            let edge = Edge::new(self.main_node.id.clone(), child.id().clone(), label)
                .with_property("index", index);
            self.push(edge, child);
        }
        self
    }

    fn push(&mut self, edge: Edge, child: Translation) {
        self.edges.push(edge);
        self.nested.push(child);
    }

    pub(crate) fn build(self) -> Translation {
        Translation {
            translated: self.translated,
            main_node: self.main_node,
            edges: self.edges,
            nested: self.nested,
        }
    }
}

/// Translator bound to one session.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'s> {
    session: &'s Session,
}

impl<'s> Translator<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'s Session {
        self.session
    }

    /// Translate any object, dispatching on its category.
    pub fn translate(&self, object: &OwlObject) -> Result<Translation> {
        match object {
            OwlObject::Iri(iri) => self.translate_iri(iri),
            OwlObject::Entity(entity) => self.translate_entity(entity),
            OwlObject::AnonymousIndividual(ind) => self.translate_anonymous_individual(ind),
            OwlObject::Literal(literal) => self.translate_literal(literal),
            OwlObject::LanguageTag(tag) => self.translate_language_tag(tag),
            OwlObject::ClassExpression(ce) => self.translate_class_expression(ce),
            OwlObject::ObjectPropertyExpression(ope) => {
                self.translate_object_property_expression(ope)
            }
            OwlObject::DataRange(range) => self.translate_data_range(range),
            OwlObject::FacetRestriction(fr) => self.translate_facet_restriction(fr),
            OwlObject::Annotation(annotation) => self.translate_annotation(annotation),
            OwlObject::Axiom(axiom) => self.translate_axiom(axiom),
        }
    }

    /// Content-addressed node; `canonical` is the object's canonical form.
    pub(crate) fn content_node(&self, label: NodeLabel, canonical: String) -> Result<Node> {
        Ok(Node::new(self.session.assign(label, || canonical)?, label))
    }

    /// Session-unique node.
    pub(crate) fn private_node(&self, label: NodeLabel) -> Result<Node> {
        Ok(Node::new(self.session.assign(label, String::new)?, label))
    }
}

pub(crate) fn construction(construct: &str, message: impl Into<String>) -> Error {
    Error::Construction { construct: construct.to_string(), message: message.into() }
}

pub(crate) fn require_operands(construct: &str, count: usize, min: usize) -> Result<()> {
    if count < min {
        return Err(construction(
            construct,
            format!("needs at least {min} operand(s), got {count}"),
        ));
    }
    Ok(())
}

pub(crate) fn cardinality(n: u32) -> Value {
    Value::Int(i64::from(n))
}
