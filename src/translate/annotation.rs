//! Annotation subjects, values and annotations.

use crate::model::{EdgeLabel, NodeLabel};
use crate::owl::{Annotation, AnnotationSubject, AnnotationValue, Entity, OwlObject};
use crate::Result;

use super::{Builder, Translation, Translator};

impl Translator<'_> {
    pub fn translate_annotation_subject(&self, subject: &AnnotationSubject) -> Result<Translation> {
        match subject {
            AnnotationSubject::Iri(iri) => self.translate_iri(iri),
            AnnotationSubject::Anonymous(anon) => self.translate_anonymous_individual(anon),
        }
    }

    pub fn translate_annotation_value(&self, value: &AnnotationValue) -> Result<Translation> {
        match value {
            AnnotationValue::Iri(iri) => self.translate_iri(iri),
            AnnotationValue::Literal(literal) => self.translate_literal(literal),
            AnnotationValue::Anonymous(anon) => self.translate_anonymous_individual(anon),
        }
    }

    /// Annotations are private to the axiom or annotation carrying them.
    pub fn translate_annotation(&self, annotation: &Annotation) -> Result<Translation> {
        let builder = Builder::new(
            OwlObject::Annotation(annotation.clone()),
            self.private_node(NodeLabel::Annotation)?,
        )
        .child(
            EdgeLabel::AnnotationProperty,
            self.translate_entity(&Entity::AnnotationProperty(annotation.property.clone()))?,
        )
        .child(EdgeLabel::AnnotationValue, self.translate_annotation_value(&annotation.value)?);

        Ok(builder
            .children(EdgeLabel::AnnotationAnnotation, self.annotations(&annotation.annotations)?)
            .build())
    }

    pub(crate) fn annotations<'a>(
        &self,
        annotations: impl IntoIterator<Item = &'a Annotation>,
    ) -> Result<Vec<Translation>> {
        annotations.into_iter().map(|a| self.translate_annotation(a)).collect()
    }
}
