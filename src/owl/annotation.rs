//! Annotations.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AnnotationProperty, AnonymousIndividual, Iri, Literal};

/// What an annotation assertion is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationSubject {
    Iri(Iri),
    Anonymous(AnonymousIndividual),
}

/// The value of an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationValue {
    Iri(Iri),
    Literal(Literal),
    Anonymous(AnonymousIndividual),
}

impl From<Literal> for AnnotationValue {
    fn from(l: Literal) -> Self { AnnotationValue::Literal(l) }
}

impl From<Iri> for AnnotationValue {
    fn from(i: Iri) -> Self { AnnotationValue::Iri(i) }
}

/// `Annotation(property value)`, itself annotatable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    pub property: AnnotationProperty,
    pub value: AnnotationValue,
    pub annotations: BTreeSet<Annotation>,
}

impl Annotation {
    pub fn new(property: AnnotationProperty, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property,
            value: value.into(),
            annotations: BTreeSet::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.insert(annotation);
        self
    }
}
