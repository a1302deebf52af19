//! Class, property and data-range expressions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Class, DataProperty, Datatype, Individual, Iri, Literal, ObjectProperty};

// ============================================================================
// Object property expressions
// ============================================================================

/// Object property or its inverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectPropertyExpression {
    ObjectProperty(ObjectProperty),
    InverseOf(ObjectProperty),
}

impl ObjectPropertyExpression {
    pub fn named(iri: impl Into<Iri>) -> Self {
        ObjectPropertyExpression::ObjectProperty(ObjectProperty::new(iri))
    }

    pub fn inverse(iri: impl Into<Iri>) -> Self {
        ObjectPropertyExpression::InverseOf(ObjectProperty::new(iri))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectPropertyExpression::ObjectProperty(_) => "ObjectProperty",
            ObjectPropertyExpression::InverseOf(_) => "ObjectInverseOf",
        }
    }
}

impl From<ObjectProperty> for ObjectPropertyExpression {
    fn from(p: ObjectProperty) -> Self { ObjectPropertyExpression::ObjectProperty(p) }
}

// ============================================================================
// Class expressions
// ============================================================================

/// The eighteen OWL2 class expression kinds.
///
/// Unqualified cardinality restrictions are written with `owl:Thing`
/// (object) or `rdfs:Literal` (data) as filler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassExpression {
    Class(Class),
    ObjectIntersectionOf(BTreeSet<ClassExpression>),
    ObjectUnionOf(BTreeSet<ClassExpression>),
    ObjectComplementOf(Box<ClassExpression>),
    ObjectOneOf(BTreeSet<Individual>),
    ObjectSomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    ObjectAllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    ObjectHasValue {
        property: ObjectPropertyExpression,
        individual: Individual,
    },
    ObjectHasSelf(ObjectPropertyExpression),
    ObjectMinCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    ObjectMaxCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    ObjectExactCardinality {
        cardinality: u32,
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
    DataSomeValuesFrom {
        property: DataProperty,
        range: DataRange,
    },
    DataAllValuesFrom {
        property: DataProperty,
        range: DataRange,
    },
    DataHasValue {
        property: DataProperty,
        value: Literal,
    },
    DataMinCardinality {
        cardinality: u32,
        property: DataProperty,
        range: DataRange,
    },
    DataMaxCardinality {
        cardinality: u32,
        property: DataProperty,
        range: DataRange,
    },
    DataExactCardinality {
        cardinality: u32,
        property: DataProperty,
        range: DataRange,
    },
}

impl ClassExpression {
    pub fn class(iri: impl Into<Iri>) -> Self {
        ClassExpression::Class(Class::new(iri))
    }

    pub fn some(property: ObjectPropertyExpression, filler: ClassExpression) -> Self {
        ClassExpression::ObjectSomeValuesFrom { property, filler: Box::new(filler) }
    }

    pub fn only(property: ObjectPropertyExpression, filler: ClassExpression) -> Self {
        ClassExpression::ObjectAllValuesFrom { property, filler: Box::new(filler) }
    }

    pub fn and(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        ClassExpression::ObjectIntersectionOf(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = ClassExpression>) -> Self {
        ClassExpression::ObjectUnionOf(operands.into_iter().collect())
    }

    pub fn not(operand: ClassExpression) -> Self {
        ClassExpression::ObjectComplementOf(Box::new(operand))
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            ClassExpression::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ClassExpression::Class(_) => "Class",
            ClassExpression::ObjectIntersectionOf(_) => "ObjectIntersectionOf",
            ClassExpression::ObjectUnionOf(_) => "ObjectUnionOf",
            ClassExpression::ObjectComplementOf(_) => "ObjectComplementOf",
            ClassExpression::ObjectOneOf(_) => "ObjectOneOf",
            ClassExpression::ObjectSomeValuesFrom { .. } => "ObjectSomeValuesFrom",
            ClassExpression::ObjectAllValuesFrom { .. } => "ObjectAllValuesFrom",
            ClassExpression::ObjectHasValue { .. } => "ObjectHasValue",
            ClassExpression::ObjectHasSelf(_) => "ObjectHasSelf",
            ClassExpression::ObjectMinCardinality { .. } => "ObjectMinCardinality",
            ClassExpression::ObjectMaxCardinality { .. } => "ObjectMaxCardinality",
            ClassExpression::ObjectExactCardinality { .. } => "ObjectExactCardinality",
            ClassExpression::DataSomeValuesFrom { .. } => "DataSomeValuesFrom",
            ClassExpression::DataAllValuesFrom { .. } => "DataAllValuesFrom",
            ClassExpression::DataHasValue { .. } => "DataHasValue",
            ClassExpression::DataMinCardinality { .. } => "DataMinCardinality",
            ClassExpression::DataMaxCardinality { .. } => "DataMaxCardinality",
            ClassExpression::DataExactCardinality { .. } => "DataExactCardinality",
        }
    }
}

impl From<Class> for ClassExpression {
    fn from(c: Class) -> Self { ClassExpression::Class(c) }
}

// ============================================================================
// Data ranges
// ============================================================================

/// Facet restriction inside a `DatatypeRestriction`, e.g. `xsd:minInclusive 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacetRestriction {
    pub facet: Iri,
    pub value: Literal,
}

/// The six OWL2 data range kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataRange {
    Datatype(Datatype),
    DataIntersectionOf(BTreeSet<DataRange>),
    DataUnionOf(BTreeSet<DataRange>),
    DataComplementOf(Box<DataRange>),
    DataOneOf(BTreeSet<Literal>),
    DatatypeRestriction {
        datatype: Datatype,
        restrictions: BTreeSet<FacetRestriction>,
    },
}

impl DataRange {
    pub fn datatype(iri: impl Into<Iri>) -> Self {
        DataRange::Datatype(Datatype::new(iri))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DataRange::Datatype(_) => "Datatype",
            DataRange::DataIntersectionOf(_) => "DataIntersectionOf",
            DataRange::DataUnionOf(_) => "DataUnionOf",
            DataRange::DataComplementOf(_) => "DataComplementOf",
            DataRange::DataOneOf(_) => "DataOneOf",
            DataRange::DatatypeRestriction { .. } => "DatatypeRestriction",
        }
    }
}

impl From<Datatype> for DataRange {
    fn from(d: Datatype) -> Self { DataRange::Datatype(d) }
}
