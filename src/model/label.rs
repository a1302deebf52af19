//! Node and edge labels.
//!
//! Both label sets are closed: every label the encoding can produce is a
//! variant here, so dispatch over them is an exhaustive `match`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($err:expr) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($err(other.to_string())),
                }
            }
        }
    };
}

string_enum! {
    /// Node label. The first label on a node is its *primary* label and
    /// names the construct; the rest are category labels.
    pub enum NodeLabel (Error::UnrecognizedNodeKind) {
        // Versioning scaffold
        Project => "Project",
        Branch => "Branch",
        OntologyDocument => "OntologyDocument",

        // Shared leaves
        Iri => "IRI",
        Literal => "Literal",
        LanguageTag => "LanguageTag",
        AnonymousIndividual => "AnonymousIndividual",

        // Entities
        Class => "Class",
        Datatype => "Datatype",
        ObjectProperty => "ObjectProperty",
        DataProperty => "DataProperty",
        AnnotationProperty => "AnnotationProperty",
        NamedIndividual => "NamedIndividual",

        // Class expressions
        ObjectIntersectionOf => "ObjectIntersectionOf",
        ObjectUnionOf => "ObjectUnionOf",
        ObjectComplementOf => "ObjectComplementOf",
        ObjectOneOf => "ObjectOneOf",
        ObjectSomeValuesFrom => "ObjectSomeValuesFrom",
        ObjectAllValuesFrom => "ObjectAllValuesFrom",
        ObjectHasValue => "ObjectHasValue",
        ObjectHasSelf => "ObjectHasSelf",
        ObjectMinCardinality => "ObjectMinCardinality",
        ObjectMaxCardinality => "ObjectMaxCardinality",
        ObjectExactCardinality => "ObjectExactCardinality",
        DataSomeValuesFrom => "DataSomeValuesFrom",
        DataAllValuesFrom => "DataAllValuesFrom",
        DataHasValue => "DataHasValue",
        DataMinCardinality => "DataMinCardinality",
        DataMaxCardinality => "DataMaxCardinality",
        DataExactCardinality => "DataExactCardinality",

        // Property expressions
        ObjectInverseOf => "ObjectInverseOf",

        // Data ranges
        DataIntersectionOf => "DataIntersectionOf",
        DataUnionOf => "DataUnionOf",
        DataComplementOf => "DataComplementOf",
        DataOneOf => "DataOneOf",
        DatatypeRestriction => "DatatypeRestriction",
        FacetRestriction => "FacetRestriction",

        Annotation => "Annotation",

        // Axioms
        Declaration => "Declaration",
        SubClassOf => "SubClassOf",
        EquivalentClasses => "EquivalentClasses",
        DisjointClasses => "DisjointClasses",
        DisjointUnion => "DisjointUnion",
        SubObjectPropertyOf => "SubObjectPropertyOf",
        SubPropertyChainOf => "SubPropertyChainOf",
        EquivalentObjectProperties => "EquivalentObjectProperties",
        DisjointObjectProperties => "DisjointObjectProperties",
        InverseObjectProperties => "InverseObjectProperties",
        ObjectPropertyDomain => "ObjectPropertyDomain",
        ObjectPropertyRange => "ObjectPropertyRange",
        FunctionalObjectProperty => "FunctionalObjectProperty",
        InverseFunctionalObjectProperty => "InverseFunctionalObjectProperty",
        ReflexiveObjectProperty => "ReflexiveObjectProperty",
        IrreflexiveObjectProperty => "IrreflexiveObjectProperty",
        SymmetricObjectProperty => "SymmetricObjectProperty",
        AsymmetricObjectProperty => "AsymmetricObjectProperty",
        TransitiveObjectProperty => "TransitiveObjectProperty",
        SubDataPropertyOf => "SubDataPropertyOf",
        EquivalentDataProperties => "EquivalentDataProperties",
        DisjointDataProperties => "DisjointDataProperties",
        DataPropertyDomain => "DataPropertyDomain",
        DataPropertyRange => "DataPropertyRange",
        FunctionalDataProperty => "FunctionalDataProperty",
        DatatypeDefinition => "DatatypeDefinition",
        HasKey => "HasKey",
        SameIndividual => "SameIndividual",
        DifferentIndividuals => "DifferentIndividuals",
        ClassAssertion => "ClassAssertion",
        ObjectPropertyAssertion => "ObjectPropertyAssertion",
        NegativeObjectPropertyAssertion => "NegativeObjectPropertyAssertion",
        DataPropertyAssertion => "DataPropertyAssertion",
        NegativeDataPropertyAssertion => "NegativeDataPropertyAssertion",
        AnnotationAssertion => "AnnotationAssertion",
        SubAnnotationPropertyOf => "SubAnnotationPropertyOf",
        AnnotationPropertyDomain => "AnnotationPropertyDomain",
        AnnotationPropertyRange => "AnnotationPropertyRange",

        // Category labels (never primary)
        Axiom => "Axiom",
        Entity => "Entity",
        ClassExpression => "ClassExpression",
        Restriction => "Restriction",
        ObjectPropertyExpression => "ObjectPropertyExpression",
        DataPropertyExpression => "DataPropertyExpression",
        DataRange => "DataRange",
        Individual => "Individual",
    }
}

impl NodeLabel {
    /// Category labels attached after the primary label.
    pub fn categories(self) -> &'static [NodeLabel] {
        use NodeLabel::*;
        match self {
            Class => &[ClassExpression, Entity],
            Datatype => &[DataRange, Entity],
            ObjectProperty => &[ObjectPropertyExpression, Entity],
            DataProperty => &[DataPropertyExpression, Entity],
            AnnotationProperty => &[Entity],
            NamedIndividual => &[Individual, Entity],
            AnonymousIndividual => &[Individual],

            ObjectIntersectionOf | ObjectUnionOf | ObjectComplementOf | ObjectOneOf => {
                &[ClassExpression]
            }
            ObjectSomeValuesFrom | ObjectAllValuesFrom | ObjectHasValue | ObjectHasSelf
            | ObjectMinCardinality | ObjectMaxCardinality | ObjectExactCardinality
            | DataSomeValuesFrom | DataAllValuesFrom | DataHasValue | DataMinCardinality
            | DataMaxCardinality | DataExactCardinality => &[ClassExpression, Restriction],

            ObjectInverseOf => &[ObjectPropertyExpression],

            DataIntersectionOf | DataUnionOf | DataComplementOf | DataOneOf
            | DatatypeRestriction => &[DataRange],

            Declaration | SubClassOf | EquivalentClasses | DisjointClasses | DisjointUnion
            | SubObjectPropertyOf | SubPropertyChainOf | EquivalentObjectProperties
            | DisjointObjectProperties | InverseObjectProperties | ObjectPropertyDomain
            | ObjectPropertyRange | FunctionalObjectProperty | InverseFunctionalObjectProperty
            | ReflexiveObjectProperty | IrreflexiveObjectProperty | SymmetricObjectProperty
            | AsymmetricObjectProperty | TransitiveObjectProperty | SubDataPropertyOf
            | EquivalentDataProperties | DisjointDataProperties | DataPropertyDomain
            | DataPropertyRange | FunctionalDataProperty | DatatypeDefinition | HasKey
            | SameIndividual | DifferentIndividuals | ClassAssertion | ObjectPropertyAssertion
            | NegativeObjectPropertyAssertion | DataPropertyAssertion
            | NegativeDataPropertyAssertion | AnnotationAssertion | SubAnnotationPropertyOf
            | AnnotationPropertyDomain | AnnotationPropertyRange => &[Axiom],

            Project | Branch | OntologyDocument | Iri | Literal | LanguageTag
            | FacetRestriction | Annotation => &[],

            Axiom | Entity | ClassExpression | Restriction | ObjectPropertyExpression
            | DataPropertyExpression | DataRange | Individual => &[],
        }
    }

    /// Category labels can never be a node's primary label.
    pub fn is_category(self) -> bool {
        use NodeLabel::*;
        matches!(
            self,
            Axiom | Entity | ClassExpression | Restriction | ObjectPropertyExpression
                | DataPropertyExpression | DataRange | Individual
        )
    }

    pub fn is_axiom(self) -> bool {
        self.categories().contains(&NodeLabel::Axiom)
    }

    pub fn is_entity(self) -> bool {
        self.categories().contains(&NodeLabel::Entity)
    }

    /// Property keys carried by nodes with this primary label, in column order.
    pub fn property_keys(self) -> &'static [&'static str] {
        use NodeLabel::*;
        match self {
            Project => &["projectId"],
            Branch => &["projectId", "branchId"],
            OntologyDocument => &["projectId", "branchId", "ontologyDocumentId"],
            Iri | Class | Datatype | ObjectProperty | DataProperty | AnnotationProperty
            | NamedIndividual => &["iri"],
            Literal => &["lexicalForm", "datatype", "language"],
            LanguageTag => &["language"],
            AnonymousIndividual => &["nodeId"],
            ObjectMinCardinality | ObjectMaxCardinality | ObjectExactCardinality
            | DataMinCardinality | DataMaxCardinality | DataExactCardinality => &["cardinality"],
            _ => &[],
        }
    }
}

string_enum! {
    /// Relationship type. Each construct has a fixed multiset of outgoing
    /// edge labels.
    pub enum EdgeLabel (Error::UnknownEdgeLabel) {
        // Structure
        ClassExpression => "CLASS_EXPRESSION",
        SubClassExpression => "SUB_CLASS_EXPRESSION",
        SuperClassExpression => "SUPER_CLASS_EXPRESSION",
        Class => "CLASS",
        ObjectProperty => "OBJECT_PROPERTY",
        ObjectPropertyExpression => "OBJECT_PROPERTY_EXPRESSION",
        SubObjectPropertyExpression => "SUB_OBJECT_PROPERTY_EXPRESSION",
        SuperObjectPropertyExpression => "SUPER_OBJECT_PROPERTY_EXPRESSION",
        FirstObjectPropertyExpression => "FIRST_OBJECT_PROPERTY_EXPRESSION",
        SecondObjectPropertyExpression => "SECOND_OBJECT_PROPERTY_EXPRESSION",
        DataPropertyExpression => "DATA_PROPERTY_EXPRESSION",
        SubDataPropertyExpression => "SUB_DATA_PROPERTY_EXPRESSION",
        SuperDataPropertyExpression => "SUPER_DATA_PROPERTY_EXPRESSION",
        AnnotationProperty => "ANNOTATION_PROPERTY",
        SubAnnotationProperty => "SUB_ANNOTATION_PROPERTY",
        SuperAnnotationProperty => "SUPER_ANNOTATION_PROPERTY",
        AnnotationSubject => "ANNOTATION_SUBJECT",
        AnnotationValue => "ANNOTATION_VALUE",
        AxiomAnnotation => "AXIOM_ANNOTATION",
        AnnotationAnnotation => "ANNOTATION_ANNOTATION",
        Individual => "INDIVIDUAL",
        SourceIndividual => "SOURCE_INDIVIDUAL",
        TargetIndividual => "TARGET_INDIVIDUAL",
        Literal => "LITERAL",
        TargetValue => "TARGET_VALUE",
        DataRange => "DATA_RANGE",
        Datatype => "DATATYPE",
        LanguageTag => "LANGUAGE_TAG",
        FacetRestriction => "FACET_RESTRICTION",
        ConstrainingFacet => "CONSTRAINING_FACET",
        RestrictionValue => "RESTRICTION_VALUE",
        Domain => "DOMAIN",
        Range => "RANGE",
        Entity => "ENTITY",

        // Linking and scaffold
        EntityIri => "ENTITY_IRI",
        InSignature => "IN_SIGNATURE",
        Axiom => "AXIOM",
        Branch => "BRANCH",
        OntologyDocument => "ONTOLOGY_DOCUMENT",
        OntologyIri => "ONTOLOGY_IRI",
        VersionIri => "VERSION_IRI",
    }
}

impl EdgeLabel {
    /// Edges that relate an entity to the ontology's signature rather than
    /// to one axiom. Deleting an ordinary axiom never removes them.
    pub fn is_signature_link(self) -> bool {
        matches!(self, EdgeLabel::EntityIri | EdgeLabel::InSignature)
    }

    /// Property keys an edge of this label may carry, in column order.
    pub fn property_keys(self) -> &'static [&'static str] {
        match self {
            EdgeLabel::SubObjectPropertyExpression => &["index"],
            EdgeLabel::Axiom => &["structuralSpec"],
            _ => &[],
        }
    }
}
