//! One handler per construct family.

use super::describe;
use super::mapper::NodeMapper;
use crate::model::{EdgeLabel as E, Node, NodeLabel};
use crate::owl::*;
use crate::{Error, Result};

fn primary(node: &Node) -> Result<NodeLabel> {
    node.primary_label()
        .ok_or_else(|| Error::UnrecognizedNodeKind(format!("unlabeled node {}", node.id)))
}

fn required_str<'n>(node: &'n Node, key: &str) -> Result<&'n str> {
    node.get_str(key).ok_or_else(|| Error::MalformedGraph {
        node: describe(node),
        message: format!("missing string property `{key}`"),
    })
}

fn cardinality(node: &Node) -> Result<u32> {
    node.get("cardinality")
        .and_then(|v| v.as_int())
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| Error::MalformedGraph {
            node: describe(node),
            message: "missing or negative `cardinality`".into(),
        })
}

fn unexpected(label: NodeLabel) -> Error {
    Error::UnrecognizedNodeKind(label.to_string())
}

// ============================================================================
// Leaves
// ============================================================================

pub(super) fn iri(_: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    Ok(OwlObject::Iri(Iri::new(required_str(node, "iri")?)))
}

pub(super) fn entity(_: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    let entity_type = match primary(node)? {
        NodeLabel::Class => EntityType::Class,
        NodeLabel::Datatype => EntityType::Datatype,
        NodeLabel::ObjectProperty => EntityType::ObjectProperty,
        NodeLabel::DataProperty => EntityType::DataProperty,
        NodeLabel::AnnotationProperty => EntityType::AnnotationProperty,
        NodeLabel::NamedIndividual => EntityType::NamedIndividual,
        other => return Err(unexpected(other)),
    };
    Ok(OwlObject::Entity(Entity::new(entity_type, required_str(node, "iri")?)))
}

pub(super) fn anonymous_individual(_: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    Ok(OwlObject::AnonymousIndividual(AnonymousIndividual::new(required_str(node, "nodeId")?)))
}

pub(super) fn language_tag(_: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    Ok(OwlObject::LanguageTag(required_str(node, "language")?.to_string()))
}

/// The node's own properties carry the whole literal; its DATATYPE or
/// LANGUAGE_TAG edge is redundant for reading.
pub(super) fn literal(_: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    let lexical_form = required_str(node, "lexicalForm")?;
    let literal = match node.get_str("language") {
        Some(language) if !language.is_empty() => Literal::lang(lexical_form, language),
        _ => Literal::typed(lexical_form, required_str(node, "datatype")?),
    };
    Ok(OwlObject::Literal(literal))
}

// ============================================================================
// Expressions
// ============================================================================

pub(super) fn object_inverse_of(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    let property = m.one(node, E::ObjectProperty, NodeMapper::to_object_property)?;
    Ok(OwlObject::ObjectPropertyExpression(ObjectPropertyExpression::InverseOf(property)))
}

pub(super) fn class_expression(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    use ClassExpression as CE;
    use NodeLabel as L;

    let label = primary(node)?;
    let ce = match label {
        L::ObjectIntersectionOf => CE::ObjectIntersectionOf(m.set(node, E::ClassExpression, NodeMapper::to_class_expression)?),
        L::ObjectUnionOf => CE::ObjectUnionOf(m.set(node, E::ClassExpression, NodeMapper::to_class_expression)?),
        L::ObjectComplementOf => {
            CE::ObjectComplementOf(Box::new(m.one(node, E::ClassExpression, NodeMapper::to_class_expression)?))
        }
        L::ObjectOneOf => CE::ObjectOneOf(m.set(node, E::Individual, NodeMapper::to_individual)?),
        L::ObjectSomeValuesFrom | L::ObjectAllValuesFrom => {
            let property = m.one(node, E::ObjectPropertyExpression, NodeMapper::to_object_property_expression)?;
            let filler = Box::new(m.one(node, E::ClassExpression, NodeMapper::to_class_expression)?);
            if label == L::ObjectSomeValuesFrom {
                CE::ObjectSomeValuesFrom { property, filler }
            } else {
                CE::ObjectAllValuesFrom { property, filler }
            }
        }
        L::ObjectHasValue => CE::ObjectHasValue {
            property: m.one(node, E::ObjectPropertyExpression, NodeMapper::to_object_property_expression)?,
            individual: m.one(node, E::Individual, NodeMapper::to_individual)?,
        },
        L::ObjectHasSelf => {
            CE::ObjectHasSelf(m.one(node, E::ObjectPropertyExpression, NodeMapper::to_object_property_expression)?)
        }
        L::ObjectMinCardinality | L::ObjectMaxCardinality | L::ObjectExactCardinality => {
            let cardinality = cardinality(node)?;
            let property = m.one(node, E::ObjectPropertyExpression, NodeMapper::to_object_property_expression)?;
            let filler = Box::new(m.one(node, E::ClassExpression, NodeMapper::to_class_expression)?);
            match label {
                L::ObjectMinCardinality => CE::ObjectMinCardinality { cardinality, property, filler },
                L::ObjectMaxCardinality => CE::ObjectMaxCardinality { cardinality, property, filler },
                _ => CE::ObjectExactCardinality { cardinality, property, filler },
            }
        }
        L::DataSomeValuesFrom | L::DataAllValuesFrom => {
            let property = m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?;
            let range = m.one(node, E::DataRange, NodeMapper::to_data_range)?;
            if label == L::DataSomeValuesFrom {
                CE::DataSomeValuesFrom { property, range }
            } else {
                CE::DataAllValuesFrom { property, range }
            }
        }
        L::DataHasValue => CE::DataHasValue {
            property: m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?,
            value: m.one(node, E::Literal, NodeMapper::to_literal)?,
        },
        L::DataMinCardinality | L::DataMaxCardinality | L::DataExactCardinality => {
            let cardinality = cardinality(node)?;
            let property = m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?;
            let range = m.one(node, E::DataRange, NodeMapper::to_data_range)?;
            match label {
                L::DataMinCardinality => CE::DataMinCardinality { cardinality, property, range },
                L::DataMaxCardinality => CE::DataMaxCardinality { cardinality, property, range },
                _ => CE::DataExactCardinality { cardinality, property, range },
            }
        }
        other => return Err(unexpected(other)),
    };
    Ok(OwlObject::ClassExpression(ce))
}

pub(super) fn data_range(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    use NodeLabel as L;

    let range = match primary(node)? {
        L::DataIntersectionOf => DataRange::DataIntersectionOf(m.set(node, E::DataRange, NodeMapper::to_data_range)?),
        L::DataUnionOf => DataRange::DataUnionOf(m.set(node, E::DataRange, NodeMapper::to_data_range)?),
        L::DataComplementOf => {
            DataRange::DataComplementOf(Box::new(m.one(node, E::DataRange, NodeMapper::to_data_range)?))
        }
        L::DataOneOf => DataRange::DataOneOf(m.set(node, E::Literal, NodeMapper::to_literal)?),
        L::DatatypeRestriction => DataRange::DatatypeRestriction {
            datatype: m.one(node, E::Datatype, NodeMapper::to_datatype)?,
            restrictions: m.set(node, E::FacetRestriction, NodeMapper::to_facet_restriction)?,
        },
        other => return Err(unexpected(other)),
    };
    Ok(OwlObject::DataRange(range))
}

pub(super) fn facet_restriction(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    Ok(OwlObject::FacetRestriction(FacetRestriction {
        facet: m.one(node, E::ConstrainingFacet, NodeMapper::to_iri)?,
        value: m.one(node, E::RestrictionValue, NodeMapper::to_literal)?,
    }))
}

pub(super) fn annotation(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    Ok(OwlObject::Annotation(Annotation {
        property: m.one(node, E::AnnotationProperty, NodeMapper::to_annotation_property)?,
        value: m.one(node, E::AnnotationValue, NodeMapper::to_annotation_value)?,
        annotations: m.set(node, E::AnnotationAnnotation, NodeMapper::to_annotation)?,
    }))
}

// ============================================================================
// Axioms
// ============================================================================

pub(super) fn axiom(m: &mut NodeMapper<'_>, node: &Node) -> Result<OwlObject> {
    use AxiomKind as K;
    use NodeLabel as L;

    let ope = NodeMapper::to_object_property_expression;
    let label = primary(node)?;
    let kind = match label {
        L::Declaration => K::Declaration(m.one(node, E::Entity, NodeMapper::to_entity)?),

        L::SubClassOf => K::SubClassOf {
            sub: m.one(node, E::SubClassExpression, NodeMapper::to_class_expression)?,
            sup: m.one(node, E::SuperClassExpression, NodeMapper::to_class_expression)?,
        },
        L::EquivalentClasses => K::EquivalentClasses(m.set(node, E::ClassExpression, NodeMapper::to_class_expression)?),
        L::DisjointClasses => K::DisjointClasses(m.set(node, E::ClassExpression, NodeMapper::to_class_expression)?),
        L::DisjointUnion => K::DisjointUnion {
            class: m.one(node, E::Class, NodeMapper::to_class)?,
            operands: m.set(node, E::ClassExpression, NodeMapper::to_class_expression)?,
        },

        L::SubObjectPropertyOf => K::SubObjectPropertyOf {
            sub: m.one(node, E::SubObjectPropertyExpression, ope)?,
            sup: m.one(node, E::SuperObjectPropertyExpression, ope)?,
        },
        L::SubPropertyChainOf => K::SubPropertyChainOf {
            chain: m.ordered(node, E::SubObjectPropertyExpression, ope)?,
            sup: m.one(node, E::SuperObjectPropertyExpression, ope)?,
        },
        L::EquivalentObjectProperties => K::EquivalentObjectProperties(m.set(node, E::ObjectPropertyExpression, ope)?),
        L::DisjointObjectProperties => K::DisjointObjectProperties(m.set(node, E::ObjectPropertyExpression, ope)?),
        L::InverseObjectProperties => K::InverseObjectProperties {
            first: m.one(node, E::FirstObjectPropertyExpression, ope)?,
            second: m.one(node, E::SecondObjectPropertyExpression, ope)?,
        },
        L::ObjectPropertyDomain => K::ObjectPropertyDomain {
            property: m.one(node, E::ObjectPropertyExpression, ope)?,
            domain: m.one(node, E::Domain, NodeMapper::to_class_expression)?,
        },
        L::ObjectPropertyRange => K::ObjectPropertyRange {
            property: m.one(node, E::ObjectPropertyExpression, ope)?,
            range: m.one(node, E::Range, NodeMapper::to_class_expression)?,
        },
        L::FunctionalObjectProperty
        | L::InverseFunctionalObjectProperty
        | L::ReflexiveObjectProperty
        | L::IrreflexiveObjectProperty
        | L::SymmetricObjectProperty
        | L::AsymmetricObjectProperty
        | L::TransitiveObjectProperty => {
            let p = m.one(node, E::ObjectPropertyExpression, ope)?;
            match label {
                L::FunctionalObjectProperty => K::FunctionalObjectProperty(p),
                L::InverseFunctionalObjectProperty => K::InverseFunctionalObjectProperty(p),
                L::ReflexiveObjectProperty => K::ReflexiveObjectProperty(p),
                L::IrreflexiveObjectProperty => K::IrreflexiveObjectProperty(p),
                L::SymmetricObjectProperty => K::SymmetricObjectProperty(p),
                L::AsymmetricObjectProperty => K::AsymmetricObjectProperty(p),
                _ => K::TransitiveObjectProperty(p),
            }
        }

        L::SubDataPropertyOf => K::SubDataPropertyOf {
            sub: m.one(node, E::SubDataPropertyExpression, NodeMapper::to_data_property)?,
            sup: m.one(node, E::SuperDataPropertyExpression, NodeMapper::to_data_property)?,
        },
        L::EquivalentDataProperties => {
            K::EquivalentDataProperties(m.set(node, E::DataPropertyExpression, NodeMapper::to_data_property)?)
        }
        L::DisjointDataProperties => {
            K::DisjointDataProperties(m.set(node, E::DataPropertyExpression, NodeMapper::to_data_property)?)
        }
        L::DataPropertyDomain => K::DataPropertyDomain {
            property: m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?,
            domain: m.one(node, E::Domain, NodeMapper::to_class_expression)?,
        },
        L::DataPropertyRange => K::DataPropertyRange {
            property: m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?,
            range: m.one(node, E::Range, NodeMapper::to_data_range)?,
        },
        L::FunctionalDataProperty => {
            K::FunctionalDataProperty(m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?)
        }

        L::DatatypeDefinition => K::DatatypeDefinition {
            datatype: m.one(node, E::Datatype, NodeMapper::to_datatype)?,
            range: m.one(node, E::DataRange, NodeMapper::to_data_range)?,
        },
        L::HasKey => K::HasKey {
            class: m.one(node, E::ClassExpression, NodeMapper::to_class_expression)?,
            object_properties: m.set(node, E::ObjectPropertyExpression, ope)?,
            data_properties: m.set(node, E::DataPropertyExpression, NodeMapper::to_data_property)?,
        },

        L::SameIndividual => K::SameIndividual(m.set(node, E::Individual, NodeMapper::to_individual)?),
        L::DifferentIndividuals => K::DifferentIndividuals(m.set(node, E::Individual, NodeMapper::to_individual)?),
        L::ClassAssertion => K::ClassAssertion {
            class: m.one(node, E::ClassExpression, NodeMapper::to_class_expression)?,
            individual: m.one(node, E::Individual, NodeMapper::to_individual)?,
        },
        L::ObjectPropertyAssertion | L::NegativeObjectPropertyAssertion => {
            let property = m.one(node, E::ObjectPropertyExpression, ope)?;
            let subject = m.one(node, E::SourceIndividual, NodeMapper::to_individual)?;
            let object = m.one(node, E::TargetIndividual, NodeMapper::to_individual)?;
            if label == L::ObjectPropertyAssertion {
                K::ObjectPropertyAssertion { property, subject, object }
            } else {
                K::NegativeObjectPropertyAssertion { property, subject, object }
            }
        }
        L::DataPropertyAssertion | L::NegativeDataPropertyAssertion => {
            let property = m.one(node, E::DataPropertyExpression, NodeMapper::to_data_property)?;
            let subject = m.one(node, E::SourceIndividual, NodeMapper::to_individual)?;
            let value = m.one(node, E::TargetValue, NodeMapper::to_literal)?;
            if label == L::DataPropertyAssertion {
                K::DataPropertyAssertion { property, subject, value }
            } else {
                K::NegativeDataPropertyAssertion { property, subject, value }
            }
        }

        L::AnnotationAssertion => K::AnnotationAssertion {
            property: m.one(node, E::AnnotationProperty, NodeMapper::to_annotation_property)?,
            subject: m.one(node, E::AnnotationSubject, NodeMapper::to_annotation_subject)?,
            value: m.one(node, E::AnnotationValue, NodeMapper::to_annotation_value)?,
        },
        L::SubAnnotationPropertyOf => K::SubAnnotationPropertyOf {
            sub: m.one(node, E::SubAnnotationProperty, NodeMapper::to_annotation_property)?,
            sup: m.one(node, E::SuperAnnotationProperty, NodeMapper::to_annotation_property)?,
        },
        L::AnnotationPropertyDomain => K::AnnotationPropertyDomain {
            property: m.one(node, E::AnnotationProperty, NodeMapper::to_annotation_property)?,
            domain: m.one(node, E::Domain, NodeMapper::to_iri)?,
        },
        L::AnnotationPropertyRange => K::AnnotationPropertyRange {
            property: m.one(node, E::AnnotationProperty, NodeMapper::to_annotation_property)?,
            range: m.one(node, E::Range, NodeMapper::to_iri)?,
        },

        other => return Err(unexpected(other)),
    };

    let annotations = m.set(node, E::AxiomAnnotation, NodeMapper::to_annotation)?;
    Ok(OwlObject::Axiom(Axiom { kind, annotations }))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;

    use crate::owl::*;
    use crate::reconstruct::reconstruct_translation;
    use crate::session::Session;
    use crate::translate::Translator;

    fn round_trip(axiom: Axiom) {
        let s = Session::sha256();
        let t = Translator::new(&s).translate_axiom(&axiom).unwrap();
        assert_eq!(reconstruct_translation(&t).unwrap(), OwlObject::Axiom(axiom));
    }

    fn p(iri: &str) -> ObjectPropertyExpression {
        ObjectPropertyExpression::named(iri)
    }

    #[test]
    fn test_nested_restriction() {
        round_trip(Axiom::sub_class_of(
            ClassExpression::class("http://x/A"),
            ClassExpression::and([
                ClassExpression::some(p("http://x/r"), ClassExpression::class("http://x/B")),
                ClassExpression::ObjectMinCardinality {
                    cardinality: 2,
                    property: ObjectPropertyExpression::inverse("http://x/s"),
                    filler: Box::new(ClassExpression::not(ClassExpression::class("http://x/C"))),
                },
            ]),
        ));
    }

    #[test]
    fn test_chain_order_survives() {
        round_trip(Axiom::new(AxiomKind::SubPropertyChainOf {
            chain: vec![p("http://x/b"), p("http://x/a"), p("http://x/b")],
            sup: p("http://x/c"),
        }));
    }

    #[test]
    fn test_data_range_and_literals() {
        let restriction = DataRange::DatatypeRestriction {
            datatype: Datatype::new(vocab::XSD_INTEGER),
            restrictions: BTreeSet::from([FacetRestriction {
                facet: Iri::new("http://www.w3.org/2001/XMLSchema#minInclusive"),
                value: Literal::typed("0", vocab::XSD_INTEGER),
            }]),
        };
        round_trip(Axiom::new(AxiomKind::DataPropertyRange {
            property: DataProperty::new("http://x/age"),
            range: DataRange::DataUnionOf(BTreeSet::from([
                restriction,
                DataRange::DataOneOf(BTreeSet::from([Literal::lang("n/a", "en")])),
            ])),
        }));
    }

    #[test]
    fn test_annotated_annotation_assertion() {
        let label = AnnotationProperty::new(vocab::RDFS_LABEL);
        let comment = AnnotationProperty::new(vocab::RDFS_COMMENT);
        round_trip(
            Axiom::annotation_assertion(label.clone(), "http://x/A", Literal::lang("Paris", "fr")).annotated(
                Annotation::new(comment, Literal::string("checked"))
                    .annotated(Annotation::new(label, AnnotationValue::Anonymous(AnonymousIndividual::new("_:b0")))),
            ),
        );
    }

    #[test]
    fn test_assertions_and_keys() {
        let alice = Individual::Named(NamedIndividual::new("http://x/alice"));
        let anon = Individual::Anonymous(AnonymousIndividual::new("_:x"));
        round_trip(Axiom::new(AxiomKind::NegativeObjectPropertyAssertion {
            property: ObjectPropertyExpression::inverse("http://x/knows"),
            subject: alice.clone(),
            object: anon,
        }));
        round_trip(Axiom::new(AxiomKind::HasKey {
            class: ClassExpression::class("http://x/Person"),
            object_properties: BTreeSet::new(),
            data_properties: BTreeSet::from([DataProperty::new("http://x/ssn")]),
        }));
        round_trip(Axiom::declaration(NamedIndividual::new("http://x/alice")));
    }
}
