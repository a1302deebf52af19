//! # OWL2 Object Model
//!
//! The structural OWL2 grammar as plain Rust data: entities, literals,
//! class / property / data-range expressions, annotations and axioms.
//!
//! The model is given, fully parsed; nothing here parses or reasons. Every
//! n-ary operand list that OWL2 treats as a set is a `BTreeSet`, so two
//! structurally equal objects compare equal regardless of operand order.
//! The only ordered list is a property chain.

pub mod iri;
pub mod vocab;
pub mod entity;
pub mod literal;
pub mod expression;
pub mod annotation;
pub mod axiom;

pub use iri::Iri;
pub use entity::{
    AnnotationProperty, AnonymousIndividual, Class, DataProperty, Datatype, Entity, EntityType,
    Individual, NamedIndividual, ObjectProperty,
};
pub use literal::Literal;
pub use expression::{ClassExpression, DataRange, FacetRestriction, ObjectPropertyExpression};
pub use annotation::{Annotation, AnnotationSubject, AnnotationValue};
pub use axiom::{Axiom, AxiomKind};

use serde::{Deserialize, Serialize};

/// Any object the codec can translate or reconstruct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OwlObject {
    Iri(Iri),
    Entity(Entity),
    AnonymousIndividual(AnonymousIndividual),
    Literal(Literal),
    LanguageTag(String),
    ClassExpression(ClassExpression),
    ObjectPropertyExpression(ObjectPropertyExpression),
    DataRange(DataRange),
    FacetRestriction(FacetRestriction),
    Annotation(Annotation),
    Axiom(Axiom),
}

impl OwlObject {
    /// Short human-readable name of the construct, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OwlObject::Iri(_) => "IRI",
            OwlObject::Entity(e) => e.entity_type().as_str(),
            OwlObject::AnonymousIndividual(_) => "AnonymousIndividual",
            OwlObject::Literal(_) => "Literal",
            OwlObject::LanguageTag(_) => "LanguageTag",
            OwlObject::ClassExpression(ce) => ce.kind_name(),
            OwlObject::ObjectPropertyExpression(ope) => ope.kind_name(),
            OwlObject::DataRange(dr) => dr.kind_name(),
            OwlObject::FacetRestriction(_) => "FacetRestriction",
            OwlObject::Annotation(_) => "Annotation",
            OwlObject::Axiom(ax) => ax.kind_name(),
        }
    }
}

impl From<Axiom> for OwlObject {
    fn from(ax: Axiom) -> Self { OwlObject::Axiom(ax) }
}

impl From<ClassExpression> for OwlObject {
    fn from(ce: ClassExpression) -> Self { OwlObject::ClassExpression(ce) }
}

impl From<Entity> for OwlObject {
    fn from(e: Entity) -> Self { OwlObject::Entity(e) }
}

impl From<Literal> for OwlObject {
    fn from(l: Literal) -> Self { OwlObject::Literal(l) }
}

impl From<Iri> for OwlObject {
    fn from(i: Iri) -> Self { OwlObject::Iri(i) }
}
