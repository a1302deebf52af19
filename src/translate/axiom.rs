//! Axioms.

use tracing::debug;

use crate::model::{EdgeLabel, NodeLabel};
use crate::owl::{Axiom, AxiomKind, Entity, OwlObject};
use crate::Result;

use super::{require_operands, Builder, Translation, Translator};

/// Primary node label for an axiom kind.
pub(crate) fn axiom_label(kind: &AxiomKind) -> NodeLabel {
    use AxiomKind as K;
    match kind {
        K::Declaration(_) => NodeLabel::Declaration,
        K::SubClassOf { .. } => NodeLabel::SubClassOf,
        K::EquivalentClasses(_) => NodeLabel::EquivalentClasses,
        K::DisjointClasses(_) => NodeLabel::DisjointClasses,
        K::DisjointUnion { .. } => NodeLabel::DisjointUnion,
        K::SubObjectPropertyOf { .. } => NodeLabel::SubObjectPropertyOf,
        K::SubPropertyChainOf { .. } => NodeLabel::SubPropertyChainOf,
        K::EquivalentObjectProperties(_) => NodeLabel::EquivalentObjectProperties,
        K::DisjointObjectProperties(_) => NodeLabel::DisjointObjectProperties,
        K::InverseObjectProperties { .. } => NodeLabel::InverseObjectProperties,
        K::ObjectPropertyDomain { .. } => NodeLabel::ObjectPropertyDomain,
        K::ObjectPropertyRange { .. } => NodeLabel::ObjectPropertyRange,
        K::FunctionalObjectProperty(_) => NodeLabel::FunctionalObjectProperty,
        K::InverseFunctionalObjectProperty(_) => NodeLabel::InverseFunctionalObjectProperty,
        K::ReflexiveObjectProperty(_) => NodeLabel::ReflexiveObjectProperty,
        K::IrreflexiveObjectProperty(_) => NodeLabel::IrreflexiveObjectProperty,
        K::SymmetricObjectProperty(_) => NodeLabel::SymmetricObjectProperty,
        K::AsymmetricObjectProperty(_) => NodeLabel::AsymmetricObjectProperty,
        K::TransitiveObjectProperty(_) => NodeLabel::TransitiveObjectProperty,
        K::SubDataPropertyOf { .. } => NodeLabel::SubDataPropertyOf,
        K::EquivalentDataProperties(_) => NodeLabel::EquivalentDataProperties,
        K::DisjointDataProperties(_) => NodeLabel::DisjointDataProperties,
        K::DataPropertyDomain { .. } => NodeLabel::DataPropertyDomain,
        K::DataPropertyRange { .. } => NodeLabel::DataPropertyRange,
        K::FunctionalDataProperty(_) => NodeLabel::FunctionalDataProperty,
        K::DatatypeDefinition { .. } => NodeLabel::DatatypeDefinition,
        K::HasKey { .. } => NodeLabel::HasKey,
        K::SameIndividual(_) => NodeLabel::SameIndividual,
        K::DifferentIndividuals(_) => NodeLabel::DifferentIndividuals,
        K::ClassAssertion { .. } => NodeLabel::ClassAssertion,
        K::ObjectPropertyAssertion { .. } => NodeLabel::ObjectPropertyAssertion,
        K::NegativeObjectPropertyAssertion { .. } => NodeLabel::NegativeObjectPropertyAssertion,
        K::DataPropertyAssertion { .. } => NodeLabel::DataPropertyAssertion,
        K::NegativeDataPropertyAssertion { .. } => NodeLabel::NegativeDataPropertyAssertion,
        K::AnnotationAssertion { .. } => NodeLabel::AnnotationAssertion,
        K::SubAnnotationPropertyOf { .. } => NodeLabel::SubAnnotationPropertyOf,
        K::AnnotationPropertyDomain { .. } => NodeLabel::AnnotationPropertyDomain,
        K::AnnotationPropertyRange { .. } => NodeLabel::AnnotationPropertyRange,
    }
}

impl Translator<'_> {
    pub fn translate_axiom(&self, axiom: &Axiom) -> Result<Translation> {
        use AxiomKind as K;

        let label = axiom_label(&axiom.kind);
        let name = label.as_str();
        let b = Builder::new(OwlObject::Axiom(axiom.clone()), self.private_node(label)?);

        let b = match &axiom.kind {
            K::Declaration(entity) => b.child(EdgeLabel::Entity, self.translate_entity(entity)?),

            K::SubClassOf { sub, sup } => b
                .child(EdgeLabel::SubClassExpression, self.translate_class_expression(sub)?)
                .child(EdgeLabel::SuperClassExpression, self.translate_class_expression(sup)?),
            K::EquivalentClasses(operands) | K::DisjointClasses(operands) => {
                require_operands(name, operands.len(), 2)?;
                b.children(EdgeLabel::ClassExpression, self.class_expressions(operands)?)
            }
            K::DisjointUnion { class, operands } => {
                require_operands(name, operands.len(), 1)?;
                b.child(EdgeLabel::Class, self.translate_entity(&Entity::Class(class.clone()))?)
                    .children(EdgeLabel::ClassExpression, self.class_expressions(operands)?)
            }

            K::SubObjectPropertyOf { sub, sup } => b
                .child(EdgeLabel::SubObjectPropertyExpression, self.translate_object_property_expression(sub)?)
                .child(EdgeLabel::SuperObjectPropertyExpression, self.translate_object_property_expression(sup)?),
            K::SubPropertyChainOf { chain, sup } => {
                require_operands(name, chain.len(), 2)?;
                b.indexed_children(EdgeLabel::SubObjectPropertyExpression, self.object_property_expressions(chain)?)
                    .child(EdgeLabel::SuperObjectPropertyExpression, self.translate_object_property_expression(sup)?)
            }
            K::EquivalentObjectProperties(operands) | K::DisjointObjectProperties(operands) => {
                require_operands(name, operands.len(), 2)?;
                b.children(EdgeLabel::ObjectPropertyExpression, self.object_property_expressions(operands)?)
            }
            K::InverseObjectProperties { first, second } => b
                .child(EdgeLabel::FirstObjectPropertyExpression, self.translate_object_property_expression(first)?)
                .child(EdgeLabel::SecondObjectPropertyExpression, self.translate_object_property_expression(second)?),
            K::ObjectPropertyDomain { property, domain } => b
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                .child(EdgeLabel::Domain, self.translate_class_expression(domain)?),
            K::ObjectPropertyRange { property, range } => b
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                .child(EdgeLabel::Range, self.translate_class_expression(range)?),
            K::FunctionalObjectProperty(p)
            | K::InverseFunctionalObjectProperty(p)
            | K::ReflexiveObjectProperty(p)
            | K::IrreflexiveObjectProperty(p)
            | K::SymmetricObjectProperty(p)
            | K::AsymmetricObjectProperty(p)
            | K::TransitiveObjectProperty(p) => {
                b.child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(p)?)
            }

            K::SubDataPropertyOf { sub, sup } => b
                .child(EdgeLabel::SubDataPropertyExpression, self.translate_data_property(sub)?)
                .child(EdgeLabel::SuperDataPropertyExpression, self.translate_data_property(sup)?),
            K::EquivalentDataProperties(operands) | K::DisjointDataProperties(operands) => {
                require_operands(name, operands.len(), 2)?;
                b.children(EdgeLabel::DataPropertyExpression, self.data_properties(operands)?)
            }
            K::DataPropertyDomain { property, domain } => b
                .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                .child(EdgeLabel::Domain, self.translate_class_expression(domain)?),
            K::DataPropertyRange { property, range } => b
                .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                .child(EdgeLabel::Range, self.translate_data_range(range)?),
            K::FunctionalDataProperty(p) => {
                b.child(EdgeLabel::DataPropertyExpression, self.translate_data_property(p)?)
            }

            K::DatatypeDefinition { datatype, range } => b
                .child(EdgeLabel::Datatype, self.translate_entity(&Entity::Datatype(datatype.clone()))?)
                .child(EdgeLabel::DataRange, self.translate_data_range(range)?),
            K::HasKey { class, object_properties, data_properties } => {
                require_operands(name, object_properties.len() + data_properties.len(), 1)?;
                b.child(EdgeLabel::ClassExpression, self.translate_class_expression(class)?)
                    .children(EdgeLabel::ObjectPropertyExpression, self.object_property_expressions(object_properties)?)
                    .children(EdgeLabel::DataPropertyExpression, self.data_properties(data_properties)?)
            }

            K::SameIndividual(individuals) | K::DifferentIndividuals(individuals) => {
                require_operands(name, individuals.len(), 2)?;
                let nested = individuals
                    .iter()
                    .map(|i| self.translate_individual(i))
                    .collect::<Result<Vec<_>>>()?;
                b.children(EdgeLabel::Individual, nested)
            }
            K::ClassAssertion { class, individual } => b
                .child(EdgeLabel::ClassExpression, self.translate_class_expression(class)?)
                .child(EdgeLabel::Individual, self.translate_individual(individual)?),
            K::ObjectPropertyAssertion { property, subject, object }
            | K::NegativeObjectPropertyAssertion { property, subject, object } => b
                .child(EdgeLabel::ObjectPropertyExpression, self.translate_object_property_expression(property)?)
                .child(EdgeLabel::SourceIndividual, self.translate_individual(subject)?)
                .child(EdgeLabel::TargetIndividual, self.translate_individual(object)?),
            K::DataPropertyAssertion { property, subject, value }
            | K::NegativeDataPropertyAssertion { property, subject, value } => b
                .child(EdgeLabel::DataPropertyExpression, self.translate_data_property(property)?)
                .child(EdgeLabel::SourceIndividual, self.translate_individual(subject)?)
                .child(EdgeLabel::TargetValue, self.translate_literal(value)?),

            K::AnnotationAssertion { property, subject, value } => b
                .child(
                    EdgeLabel::AnnotationProperty,
                    self.translate_entity(&Entity::AnnotationProperty(property.clone()))?,
                )
                .child(EdgeLabel::AnnotationSubject, self.translate_annotation_subject(subject)?)
                .child(EdgeLabel::AnnotationValue, self.translate_annotation_value(value)?),
            K::SubAnnotationPropertyOf { sub, sup } => b
                .child(
                    EdgeLabel::SubAnnotationProperty,
                    self.translate_entity(&Entity::AnnotationProperty(sub.clone()))?,
                )
                .child(
                    EdgeLabel::SuperAnnotationProperty,
                    self.translate_entity(&Entity::AnnotationProperty(sup.clone()))?,
                ),
            K::AnnotationPropertyDomain { property, domain: iri }
            | K::AnnotationPropertyRange { property, range: iri } => {
                let role = if matches!(axiom.kind, K::AnnotationPropertyDomain { .. }) {
                    EdgeLabel::Domain
                } else {
                    EdgeLabel::Range
                };
                b.child(
                    EdgeLabel::AnnotationProperty,
                    self.translate_entity(&Entity::AnnotationProperty(property.clone()))?,
                )
                .child(role, self.translate_iri(iri)?)
            }
        };

        let translation = b
            .children(EdgeLabel::AxiomAnnotation, self.annotations(&axiom.annotations)?)
            .build();
        debug!(
            axiom = name,
            id = %translation.main_node.id,
            edges = translation.edges.len(),
            "translated axiom"
        );
        Ok(translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::owl::{
        vocab, AnnotationProperty, Class, ClassExpression, Literal, NamedIndividual,
        ObjectPropertyExpression,
    };
    use crate::session::Session;
    use crate::Error;
    use pretty_assertions::assert_eq;

    fn translate(axiom: Axiom) -> Result<Translation> {
        let s = Session::sha256();
        Translator::new(&s).translate_axiom(&axiom)
    }

    #[test]
    fn test_declaration_points_at_entity() {
        let t = translate(Axiom::declaration(Class::new("http://x/E"))).unwrap();
        assert_eq!(t.edges.len(), 1);
        assert_eq!(t.edges[0].label, EdgeLabel::Entity);
        assert!(t.main_node.has_label(NodeLabel::Axiom));
    }

    #[test]
    fn test_annotation_assertion_shape() {
        let axiom = Axiom::annotation_assertion(
            AnnotationProperty::new(vocab::RDFS_LABEL),
            "http://x/A",
            Literal::lang("Paris", "en"),
        )
        .annotated(crate::owl::Annotation::new(
            AnnotationProperty::new(vocab::RDFS_COMMENT),
            Literal::string("source"),
        ));
        let t = translate(axiom).unwrap();
        let labels: Vec<_> = t.edges.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                EdgeLabel::AnnotationProperty,
                EdgeLabel::AnnotationSubject,
                EdgeLabel::AnnotationValue,
                EdgeLabel::AxiomAnnotation,
            ]
        );
        assert_eq!(t.nested[1].main_node.primary_label(), Some(NodeLabel::Iri));
    }

    #[test]
    fn test_property_chain_keeps_order_and_repeats() {
        let p = ObjectPropertyExpression::named("http://x/p");
        let axiom = Axiom::new(AxiomKind::SubPropertyChainOf {
            chain: vec![p.clone(), p.clone()],
            sup: ObjectPropertyExpression::named("http://x/q"),
        });
        let t = translate(axiom).unwrap();
        let chain = t.edges_with_label(EdgeLabel::SubObjectPropertyExpression);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].properties.get("index"), Some(&Value::Int(0)));
        assert_eq!(chain[1].properties.get("index"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_property_assertion_roles() {
        let axiom = Axiom::new(AxiomKind::ObjectPropertyAssertion {
            property: ObjectPropertyExpression::named("http://x/knows"),
            subject: NamedIndividual::new("http://x/a").into(),
            object: NamedIndividual::new("http://x/b").into(),
        });
        let t = translate(axiom).unwrap();
        assert_eq!(t.nested[1].main_node.get_str("iri"), Some("http://x/a"));
        assert_eq!(t.edges[2].label, EdgeLabel::TargetIndividual);
    }

    #[test]
    fn test_single_operand_equivalence_rejected() {
        let axiom = Axiom::new(AxiomKind::EquivalentClasses(
            [ClassExpression::class("http://x/A")].into_iter().collect(),
        ));
        let err = translate(axiom).unwrap_err();
        assert!(matches!(err, Error::Construction { .. }));
    }

    #[test]
    fn test_every_axiom_label_is_an_axiom() {
        let t = translate(Axiom::new(AxiomKind::TransitiveObjectProperty(
            ObjectPropertyExpression::inverse("http://x/p"),
        )))
        .unwrap();
        assert!(t.main_node.primary_label().is_some_and(NodeLabel::is_axiom));
        assert_eq!(t.nested[0].main_node.primary_label(), Some(NodeLabel::ObjectInverseOf));
    }
}
