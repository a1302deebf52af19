//! Axioms.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue, Class, ClassExpression,
    DataProperty, DataRange, Datatype, Entity, Individual, Iri, Literal, ObjectPropertyExpression,
};

/// An axiom: its structural kind plus its axiom annotations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Axiom {
    pub kind: AxiomKind,
    pub annotations: BTreeSet<Annotation>,
}

/// The OWL2 axiom kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxiomKind {
    Declaration(Entity),

    // Class axioms
    SubClassOf { sub: ClassExpression, sup: ClassExpression },
    EquivalentClasses(BTreeSet<ClassExpression>),
    DisjointClasses(BTreeSet<ClassExpression>),
    DisjointUnion { class: Class, operands: BTreeSet<ClassExpression> },

    // Object property axioms
    SubObjectPropertyOf { sub: ObjectPropertyExpression, sup: ObjectPropertyExpression },
    SubPropertyChainOf { chain: Vec<ObjectPropertyExpression>, sup: ObjectPropertyExpression },
    EquivalentObjectProperties(BTreeSet<ObjectPropertyExpression>),
    DisjointObjectProperties(BTreeSet<ObjectPropertyExpression>),
    InverseObjectProperties { first: ObjectPropertyExpression, second: ObjectPropertyExpression },
    ObjectPropertyDomain { property: ObjectPropertyExpression, domain: ClassExpression },
    ObjectPropertyRange { property: ObjectPropertyExpression, range: ClassExpression },
    FunctionalObjectProperty(ObjectPropertyExpression),
    InverseFunctionalObjectProperty(ObjectPropertyExpression),
    ReflexiveObjectProperty(ObjectPropertyExpression),
    IrreflexiveObjectProperty(ObjectPropertyExpression),
    SymmetricObjectProperty(ObjectPropertyExpression),
    AsymmetricObjectProperty(ObjectPropertyExpression),
    TransitiveObjectProperty(ObjectPropertyExpression),

    // Data property axioms
    SubDataPropertyOf { sub: DataProperty, sup: DataProperty },
    EquivalentDataProperties(BTreeSet<DataProperty>),
    DisjointDataProperties(BTreeSet<DataProperty>),
    DataPropertyDomain { property: DataProperty, domain: ClassExpression },
    DataPropertyRange { property: DataProperty, range: DataRange },
    FunctionalDataProperty(DataProperty),

    DatatypeDefinition { datatype: Datatype, range: DataRange },
    HasKey {
        class: ClassExpression,
        object_properties: BTreeSet<ObjectPropertyExpression>,
        data_properties: BTreeSet<DataProperty>,
    },

    // Assertions
    SameIndividual(BTreeSet<Individual>),
    DifferentIndividuals(BTreeSet<Individual>),
    ClassAssertion { class: ClassExpression, individual: Individual },
    ObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        subject: Individual,
        object: Individual,
    },
    NegativeObjectPropertyAssertion {
        property: ObjectPropertyExpression,
        subject: Individual,
        object: Individual,
    },
    DataPropertyAssertion { property: DataProperty, subject: Individual, value: Literal },
    NegativeDataPropertyAssertion { property: DataProperty, subject: Individual, value: Literal },

    // Annotation axioms
    AnnotationAssertion {
        property: AnnotationProperty,
        subject: AnnotationSubject,
        value: AnnotationValue,
    },
    SubAnnotationPropertyOf { sub: AnnotationProperty, sup: AnnotationProperty },
    AnnotationPropertyDomain { property: AnnotationProperty, domain: Iri },
    AnnotationPropertyRange { property: AnnotationProperty, range: Iri },
}

impl Axiom {
    pub fn new(kind: AxiomKind) -> Self {
        Self { kind, annotations: BTreeSet::new() }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.insert(annotation);
        self
    }

    pub fn declaration(entity: impl Into<Entity>) -> Self {
        Self::new(AxiomKind::Declaration(entity.into()))
    }

    pub fn sub_class_of(sub: ClassExpression, sup: ClassExpression) -> Self {
        Self::new(AxiomKind::SubClassOf { sub, sup })
    }

    pub fn annotation_assertion(
        property: AnnotationProperty,
        subject: impl Into<Iri>,
        value: impl Into<AnnotationValue>,
    ) -> Self {
        Self::new(AxiomKind::AnnotationAssertion {
            property,
            subject: AnnotationSubject::Iri(subject.into()),
            value: value.into(),
        })
    }

    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, AxiomKind::Declaration(_))
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

impl From<AxiomKind> for Axiom {
    fn from(kind: AxiomKind) -> Self { Axiom::new(kind) }
}

impl AxiomKind {
    pub fn name(&self) -> &'static str {
        match self {
            AxiomKind::Declaration(_) => "Declaration",
            AxiomKind::SubClassOf { .. } => "SubClassOf",
            AxiomKind::EquivalentClasses(_) => "EquivalentClasses",
            AxiomKind::DisjointClasses(_) => "DisjointClasses",
            AxiomKind::DisjointUnion { .. } => "DisjointUnion",
            AxiomKind::SubObjectPropertyOf { .. } => "SubObjectPropertyOf",
            AxiomKind::SubPropertyChainOf { .. } => "SubPropertyChainOf",
            AxiomKind::EquivalentObjectProperties(_) => "EquivalentObjectProperties",
            AxiomKind::DisjointObjectProperties(_) => "DisjointObjectProperties",
            AxiomKind::InverseObjectProperties { .. } => "InverseObjectProperties",
            AxiomKind::ObjectPropertyDomain { .. } => "ObjectPropertyDomain",
            AxiomKind::ObjectPropertyRange { .. } => "ObjectPropertyRange",
            AxiomKind::FunctionalObjectProperty(_) => "FunctionalObjectProperty",
            AxiomKind::InverseFunctionalObjectProperty(_) => "InverseFunctionalObjectProperty",
            AxiomKind::ReflexiveObjectProperty(_) => "ReflexiveObjectProperty",
            AxiomKind::IrreflexiveObjectProperty(_) => "IrreflexiveObjectProperty",
            AxiomKind::SymmetricObjectProperty(_) => "SymmetricObjectProperty",
            AxiomKind::AsymmetricObjectProperty(_) => "AsymmetricObjectProperty",
            AxiomKind::TransitiveObjectProperty(_) => "TransitiveObjectProperty",
            AxiomKind::SubDataPropertyOf { .. } => "SubDataPropertyOf",
            AxiomKind::EquivalentDataProperties(_) => "EquivalentDataProperties",
            AxiomKind::DisjointDataProperties(_) => "DisjointDataProperties",
            AxiomKind::DataPropertyDomain { .. } => "DataPropertyDomain",
            AxiomKind::DataPropertyRange { .. } => "DataPropertyRange",
            AxiomKind::FunctionalDataProperty(_) => "FunctionalDataProperty",
            AxiomKind::DatatypeDefinition { .. } => "DatatypeDefinition",
            AxiomKind::HasKey { .. } => "HasKey",
            AxiomKind::SameIndividual(_) => "SameIndividual",
            AxiomKind::DifferentIndividuals(_) => "DifferentIndividuals",
            AxiomKind::ClassAssertion { .. } => "ClassAssertion",
            AxiomKind::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            AxiomKind::NegativeObjectPropertyAssertion { .. } => "NegativeObjectPropertyAssertion",
            AxiomKind::DataPropertyAssertion { .. } => "DataPropertyAssertion",
            AxiomKind::NegativeDataPropertyAssertion { .. } => "NegativeDataPropertyAssertion",
            AxiomKind::AnnotationAssertion { .. } => "AnnotationAssertion",
            AxiomKind::SubAnnotationPropertyOf { .. } => "SubAnnotationPropertyOf",
            AxiomKind::AnnotationPropertyDomain { .. } => "AnnotationPropertyDomain",
            AxiomKind::AnnotationPropertyRange { .. } => "AnnotationPropertyRange",
        }
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AxiomKind::Declaration(e) => write!(f, "Declaration({}({}))", e.entity_type().as_str(), e.iri()),
            AxiomKind::SubClassOf { sub: ClassExpression::Class(a), sup: ClassExpression::Class(b) } => {
                write!(f, "SubClassOf({} {})", a.iri(), b.iri())
            }
            other => write!(f, "{}(..)", other.name()),
        }
    }
}
