//! Recursive node → object mapping with a per-run cache.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use super::{describe, HandlerRegistry, NodeIndex};
use crate::model::{EdgeLabel, Node, NodeId};
use crate::owl::*;
use crate::{Error, Result};

/// Maps nodes to OWL objects.
///
/// Reusable nodes are shared by many axioms, so every mapped node is
/// cached by id; an entity reached from a hundred axioms is rebuilt once.
pub struct NodeMapper<'a> {
    index: &'a dyn NodeIndex,
    registry: &'a HandlerRegistry,
    cache: HashMap<NodeId, OwlObject>,
}

impl<'a> NodeMapper<'a> {
    pub fn new(index: &'a dyn NodeIndex, registry: &'a HandlerRegistry) -> Self {
        Self { index, registry, cache: HashMap::new() }
    }

    pub fn map(&mut self, node: &Node) -> Result<OwlObject> {
        if let Some(object) = self.cache.get(&node.id) {
            return Ok(object.clone());
        }
        let label = node
            .primary_label()
            .ok_or_else(|| Error::UnrecognizedNodeKind(format!("unlabeled node {}", node.id)))?;
        let handler = self
            .registry
            .get(label)
            .ok_or_else(|| Error::UnrecognizedNodeKind(label.to_string()))?;
        let object = handler(self, node)?;
        self.cache.insert(node.id.clone(), object.clone());
        Ok(object)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    // ------------------------------------------------------------------
    // Role navigation
    // ------------------------------------------------------------------

    /// Map the single `label` target of `node`.
    pub fn one<T>(&mut self, node: &Node, label: EdgeLabel, f: impl FnOnce(&mut Self, &Node) -> Result<T>) -> Result<T> {
        let target = self.index.adjacent_one(node, label)?;
        f(self, &target)
    }

    /// Map every `label` target of `node` into a set.
    pub fn set<T: Ord>(
        &mut self,
        node: &Node,
        label: EdgeLabel,
        mut f: impl FnMut(&mut Self, &Node) -> Result<T>,
    ) -> Result<BTreeSet<T>> {
        self.index
            .adjacent_nodes(node, label)?
            .iter()
            .map(|target| f(self, target))
            .collect()
    }

    /// Map every `label` target of `node` in `index` edge-property order.
    pub fn ordered<T>(
        &mut self,
        node: &Node,
        label: EdgeLabel,
        mut f: impl FnMut(&mut Self, &Node) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut found = self
            .index
            .adjacent(node, label)?
            .into_iter()
            .map(|(edge, target)| {
                let position = edge.properties.get("index").and_then(|v| v.as_int()).ok_or_else(|| {
                    Error::MalformedGraph {
                        node: describe(node),
                        message: format!("{label} edge without an index"),
                    }
                })?;
                Ok((position, target))
            })
            .collect::<Result<Vec<_>>>()?;
        found.sort_by_key(|(position, _)| *position);
        found.into_iter().map(|(_, target)| f(self, &target)).collect()
    }

    // ------------------------------------------------------------------
    // Typed views
    // ------------------------------------------------------------------

    pub fn to_iri(&mut self, node: &Node) -> Result<Iri> {
        match self.map(node)? {
            OwlObject::Iri(iri) => Ok(iri),
            other => Err(type_error("IRI", &other)),
        }
    }

    pub fn to_entity(&mut self, node: &Node) -> Result<Entity> {
        match self.map(node)? {
            OwlObject::Entity(entity) => Ok(entity),
            other => Err(type_error("Entity", &other)),
        }
    }

    pub fn to_class(&mut self, node: &Node) -> Result<Class> {
        match self.to_entity(node)? {
            Entity::Class(class) => Ok(class),
            other => Err(type_error("Class", &OwlObject::Entity(other))),
        }
    }

    pub fn to_datatype(&mut self, node: &Node) -> Result<Datatype> {
        match self.to_entity(node)? {
            Entity::Datatype(datatype) => Ok(datatype),
            other => Err(type_error("Datatype", &OwlObject::Entity(other))),
        }
    }

    pub fn to_object_property(&mut self, node: &Node) -> Result<ObjectProperty> {
        match self.to_entity(node)? {
            Entity::ObjectProperty(property) => Ok(property),
            other => Err(type_error("ObjectProperty", &OwlObject::Entity(other))),
        }
    }

    pub fn to_data_property(&mut self, node: &Node) -> Result<DataProperty> {
        match self.to_entity(node)? {
            Entity::DataProperty(property) => Ok(property),
            other => Err(type_error("DataProperty", &OwlObject::Entity(other))),
        }
    }

    pub fn to_annotation_property(&mut self, node: &Node) -> Result<AnnotationProperty> {
        match self.to_entity(node)? {
            Entity::AnnotationProperty(property) => Ok(property),
            other => Err(type_error("AnnotationProperty", &OwlObject::Entity(other))),
        }
    }

    pub fn to_individual(&mut self, node: &Node) -> Result<Individual> {
        match self.map(node)? {
            OwlObject::Entity(Entity::NamedIndividual(named)) => Ok(Individual::Named(named)),
            OwlObject::AnonymousIndividual(anon) => Ok(Individual::Anonymous(anon)),
            other => Err(type_error("Individual", &other)),
        }
    }

    pub fn to_anonymous_individual(&mut self, node: &Node) -> Result<AnonymousIndividual> {
        match self.map(node)? {
            OwlObject::AnonymousIndividual(anon) => Ok(anon),
            other => Err(type_error("AnonymousIndividual", &other)),
        }
    }

    pub fn to_literal(&mut self, node: &Node) -> Result<Literal> {
        match self.map(node)? {
            OwlObject::Literal(literal) => Ok(literal),
            other => Err(type_error("Literal", &other)),
        }
    }

    pub fn to_class_expression(&mut self, node: &Node) -> Result<ClassExpression> {
        match self.map(node)? {
            OwlObject::ClassExpression(ce) => Ok(ce),
            OwlObject::Entity(Entity::Class(class)) => Ok(ClassExpression::Class(class)),
            other => Err(type_error("ClassExpression", &other)),
        }
    }

    pub fn to_object_property_expression(&mut self, node: &Node) -> Result<ObjectPropertyExpression> {
        match self.map(node)? {
            OwlObject::ObjectPropertyExpression(ope) => Ok(ope),
            OwlObject::Entity(Entity::ObjectProperty(p)) => Ok(ObjectPropertyExpression::ObjectProperty(p)),
            other => Err(type_error("ObjectPropertyExpression", &other)),
        }
    }

    pub fn to_data_range(&mut self, node: &Node) -> Result<DataRange> {
        match self.map(node)? {
            OwlObject::DataRange(range) => Ok(range),
            OwlObject::Entity(Entity::Datatype(dt)) => Ok(DataRange::Datatype(dt)),
            other => Err(type_error("DataRange", &other)),
        }
    }

    pub fn to_facet_restriction(&mut self, node: &Node) -> Result<FacetRestriction> {
        match self.map(node)? {
            OwlObject::FacetRestriction(fr) => Ok(fr),
            other => Err(type_error("FacetRestriction", &other)),
        }
    }

    pub fn to_annotation(&mut self, node: &Node) -> Result<Annotation> {
        match self.map(node)? {
            OwlObject::Annotation(annotation) => Ok(annotation),
            other => Err(type_error("Annotation", &other)),
        }
    }

    pub fn to_annotation_subject(&mut self, node: &Node) -> Result<AnnotationSubject> {
        match self.map(node)? {
            OwlObject::Iri(iri) => Ok(AnnotationSubject::Iri(iri)),
            OwlObject::AnonymousIndividual(anon) => Ok(AnnotationSubject::Anonymous(anon)),
            other => Err(type_error("AnnotationSubject", &other)),
        }
    }

    pub fn to_annotation_value(&mut self, node: &Node) -> Result<AnnotationValue> {
        match self.map(node)? {
            OwlObject::Iri(iri) => Ok(AnnotationValue::Iri(iri)),
            OwlObject::Literal(literal) => Ok(AnnotationValue::Literal(literal)),
            OwlObject::AnonymousIndividual(anon) => Ok(AnnotationValue::Anonymous(anon)),
            other => Err(type_error("AnnotationValue", &other)),
        }
    }

    pub fn to_axiom(&mut self, node: &Node) -> Result<Axiom> {
        match self.map(node)? {
            OwlObject::Axiom(axiom) => Ok(axiom),
            other => Err(type_error("Axiom", &other)),
        }
    }
}

fn type_error(expected: &str, got: &OwlObject) -> Error {
    Error::TypeError { expected: expected.to_string(), got: got.kind_name().to_string() }
}
