//! Translate-then-reconstruct tests over the whole OWL2 surface, both
//! in memory (via `TranslationIndex`) and through a stored graph.

use std::collections::BTreeSet;

use owl_lpg::owl::{
    vocab, Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue, AnonymousIndividual,
    Axiom, AxiomKind, Class, ClassExpression, DataProperty, DataRange, Datatype, Entity, EntityType,
    FacetRestriction, Individual, Literal, NamedIndividual,
    ObjectPropertyExpression, OwlObject,
};
use owl_lpg::reconstruct::reconstruct_translation;
use owl_lpg::{EdgeLabel, NodeLabel, OntologyGraph, Session, Translator, Value, VersioningContext};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn x(name: &str) -> String {
    format!("http://example.org/onto#{name}")
}

fn class(name: &str) -> ClassExpression {
    ClassExpression::class(x(name))
}

fn role(name: &str) -> ObjectPropertyExpression {
    ObjectPropertyExpression::named(x(name))
}

fn individual(name: &str) -> Individual {
    NamedIndividual::new(x(name)).into()
}

fn set<T: Ord>(items: impl IntoIterator<Item = T>) -> BTreeSet<T> {
    items.into_iter().collect()
}

fn label(text: &str) -> Annotation {
    Annotation::new(AnnotationProperty::new(vocab::RDFS_LABEL), Literal::lang(text, "en"))
}

fn round_trip(object: OwlObject) {
    let session = Session::sha256();
    let translation = Translator::new(&session).translate(&object).unwrap();
    let back = reconstruct_translation(&translation).unwrap();
    assert_eq!(back, object);
}

/// One axiom of every kind, several with nested operands or annotations.
fn sample_axioms() -> Vec<Axiom> {
    let age = DataProperty::new(x("age"));
    let adult_age = DataRange::DatatypeRestriction {
        datatype: Datatype::new(vocab::XSD_INTEGER),
        restrictions: set([FacetRestriction {
            facet: vocab::XSD_MIN_INCLUSIVE.into(),
            value: Literal::typed("18", vocab::XSD_INTEGER),
        }]),
    };

    vec![
        Axiom::declaration(Class::new(x("Person"))),
        Axiom::declaration(Entity::new(EntityType::ObjectProperty, x("knows"))),
        Axiom::sub_class_of(class("Student"), class("Person")).annotated(label("students")),
        Axiom::sub_class_of(
            class("Parent"),
            ClassExpression::ObjectMinCardinality {
                cardinality: 1,
                property: role("hasChild"),
                filler: Box::new(ClassExpression::and([class("Person"), ClassExpression::not(class("Robot"))])),
            },
        ),
        AxiomKind::EquivalentClasses(set([
            class("Adult"),
            ClassExpression::DataSomeValuesFrom { property: age.clone(), range: adult_age.clone() },
        ]))
        .into(),
        AxiomKind::DisjointClasses(set([class("Cat"), class("Dog"), class("Robot")])).into(),
        AxiomKind::DisjointUnion {
            class: Class::new(x("Pet")),
            operands: set([class("Cat"), class("Dog")]),
        }
        .into(),
        AxiomKind::SubObjectPropertyOf { sub: role("hasMother"), sup: role("hasParent") }.into(),
        AxiomKind::SubPropertyChainOf {
            chain: vec![role("hasParent"), role("hasParent"), ObjectPropertyExpression::inverse(x("hasChild"))],
            sup: role("hasGrandparentSibling"),
        }
        .into(),
        AxiomKind::InverseObjectProperties { first: role("hasParent"), second: role("hasChild") }.into(),
        AxiomKind::ObjectPropertyDomain { property: role("hasChild"), domain: class("Person") }.into(),
        AxiomKind::ObjectPropertyRange {
            property: role("owns"),
            range: ClassExpression::or([class("Pet"), class("Car")]),
        }
        .into(),
        AxiomKind::TransitiveObjectProperty(role("ancestorOf")).into(),
        AxiomKind::FunctionalDataProperty(age.clone()).into(),
        AxiomKind::DataPropertyRange {
            property: age.clone(),
            range: DataRange::DataUnionOf(set([
                DataRange::datatype(vocab::XSD_INTEGER),
                DataRange::DataOneOf(set([Literal::string("unknown")])),
            ])),
        }
        .into(),
        AxiomKind::DatatypeDefinition { datatype: Datatype::new(x("adultAge")), range: adult_age }.into(),
        AxiomKind::HasKey {
            class: class("Person"),
            object_properties: set([role("hasMother")]),
            data_properties: set([DataProperty::new(x("ssn"))]),
        }
        .into(),
        AxiomKind::SameIndividual(set([individual("alice"), individual("ally")])).into(),
        AxiomKind::ClassAssertion {
            class: ClassExpression::ObjectHasValue { property: role("knows"), individual: individual("bob") },
            individual: individual("alice"),
        }
        .into(),
        AxiomKind::ObjectPropertyAssertion {
            property: role("knows"),
            subject: individual("alice"),
            object: AnonymousIndividual::new("_:b0").into(),
        }
        .into(),
        AxiomKind::NegativeDataPropertyAssertion {
            property: age,
            subject: individual("bob"),
            value: Literal::typed("-1", vocab::XSD_INTEGER),
        }
        .into(),
        Axiom::annotation_assertion(
            AnnotationProperty::new(vocab::RDFS_COMMENT),
            x("Person"),
            Literal::string("a human being"),
        )
        .annotated(label("provenance").annotated(Annotation::new(
            AnnotationProperty::new(x("source")),
            AnnotationValue::Iri(x("wiki").into()),
        ))),
        AxiomKind::AnnotationAssertion {
            property: AnnotationProperty::new(vocab::RDFS_LABEL),
            subject: AnnotationSubject::Anonymous(AnonymousIndividual::new("_:b1")),
            value: AnnotationValue::Anonymous(AnonymousIndividual::new("_:b2")),
        }
        .into(),
        AxiomKind::SubAnnotationPropertyOf {
            sub: AnnotationProperty::new(x("prefLabel")),
            sup: AnnotationProperty::new(vocab::RDFS_LABEL),
        }
        .into(),
        AxiomKind::AnnotationPropertyRange {
            property: AnnotationProperty::new(x("prefLabel")),
            range: vocab::XSD_STRING.into(),
        }
        .into(),
    ]
}

// ============================================================================
// In-memory round trips
// ============================================================================

#[test]
fn test_every_axiom_kind_round_trips() {
    for axiom in sample_axioms() {
        round_trip(OwlObject::Axiom(axiom));
    }
}

#[test]
fn test_leaf_objects_round_trip() {
    round_trip(OwlObject::Iri(x("Thing").into()));
    round_trip(OwlObject::Entity(Entity::new(EntityType::NamedIndividual, x("alice"))));
    round_trip(OwlObject::Literal(Literal::lang("chat", "fr")));
    round_trip(OwlObject::Literal(Literal::typed("3.5", vocab::XSD_DECIMAL)));
    round_trip(OwlObject::ObjectPropertyExpression(ObjectPropertyExpression::inverse(x("knows"))));
}

#[test]
fn test_sub_class_of_named_classes_is_three_nodes_two_edges() {
    let session = Session::sha256();
    let t = Translator::new(&session)
        .translate(&Axiom::sub_class_of(class("A"), class("B")).into())
        .unwrap();

    assert_eq!(t.all_nodes().len(), 3);
    assert_eq!(t.all_edges().len(), 2);
    assert!(t.main_node.has_label(NodeLabel::SubClassOf));
    assert!(t.main_node.has_label(NodeLabel::Axiom));
    assert_eq!(t.edges_with_label(EdgeLabel::SubClassExpression).len(), 1);
    assert_eq!(t.edges_with_label(EdgeLabel::SuperClassExpression).len(), 1);
}

#[test]
fn test_language_tagged_and_typed_literals_stay_apart() {
    let session = Session::sha256();
    let translator = Translator::new(&session);
    let tagged = translator.translate(&Literal::lang("Paris", "en").into()).unwrap();
    let typed = translator.translate(&Literal::string("Paris").into()).unwrap();

    assert_ne!(tagged.id(), typed.id());
    assert_eq!(tagged.edges_with_label(EdgeLabel::LanguageTag).len(), 1);
    assert!(tagged.edges_with_label(EdgeLabel::Datatype).is_empty());
    assert_eq!(typed.edges_with_label(EdgeLabel::Datatype).len(), 1);
    assert_eq!(
        tagged.main_node.get("datatype"),
        Some(&Value::from(vocab::RDF_LANG_STRING))
    );
    assert_eq!(tagged.main_node.get("language"), Some(&Value::from("en")));
    assert_eq!(typed.main_node.get("language"), Some(&Value::from("")));
}

#[test]
fn test_equal_axioms_get_distinct_nodes_over_shared_entities() {
    let session = Session::sha256();
    let translator = Translator::new(&session);
    let axiom: OwlObject = Axiom::sub_class_of(class("A"), class("B")).into();
    let first = translator.translate(&axiom).unwrap();
    let second = translator.translate(&axiom).unwrap();

    assert_ne!(first.id(), second.id());
    let classes = |t: &owl_lpg::Translation| {
        t.nodes_with_label(NodeLabel::Class).iter().map(|n| n.id.clone()).collect::<BTreeSet<_>>()
    };
    assert_eq!(classes(&first), classes(&second));
}

#[test]
fn test_chain_with_repeated_property_keeps_both_positions() {
    let session = Session::sha256();
    let axiom: OwlObject = Axiom::new(AxiomKind::SubPropertyChainOf {
        chain: vec![role("p"), role("p")],
        sup: role("q"),
    })
    .into();
    let t = Translator::new(&session).translate(&axiom).unwrap();

    let mut indexes: Vec<_> = t
        .edges_with_label(EdgeLabel::SubObjectPropertyExpression)
        .iter()
        .map(|e| e.properties.get("index").cloned())
        .collect();
    indexes.sort();
    assert_eq!(indexes, vec![Some(Value::Int(0)), Some(Value::Int(1))]);
    assert_eq!(reconstruct_translation(&t).unwrap(), axiom);
}

// ============================================================================
// Stored round trips
// ============================================================================

#[tokio::test]
async fn test_stored_axioms_read_back_unchanged() {
    let graph = OntologyGraph::open_memory().unwrap();
    let ctx = VersioningContext::new("p", "main", "doc-1");

    let mut expected = sample_axioms();
    for axiom in &expected {
        graph.add_axiom(&ctx, axiom).await.unwrap();
    }
    expected.sort();

    assert_eq!(graph.axioms(&ctx).await.unwrap(), expected);
}

#[tokio::test]
async fn test_documents_do_not_see_each_other() {
    let graph = OntologyGraph::open_memory().unwrap();
    let left = VersioningContext::new("p", "main", "left");
    let right = VersioningContext::new("p", "main", "right");

    let shared = Axiom::sub_class_of(class("A"), class("B"));
    let only_right = Axiom::sub_class_of(class("B"), class("C"));
    graph.add_axiom(&left, &shared).await.unwrap();
    graph.add_axiom(&right, &shared).await.unwrap();
    graph.add_axiom(&right, &only_right).await.unwrap();

    assert_eq!(graph.axioms(&left).await.unwrap(), vec![shared.clone()]);
    let mut both = vec![shared, only_right];
    both.sort();
    assert_eq!(graph.axioms(&right).await.unwrap(), both);
    assert!(graph.axioms(&VersioningContext::new("p", "main", "none")).await.unwrap().is_empty());
}

// ============================================================================
// Generated class expressions
// ============================================================================

fn arb_class_expression() -> impl Strategy<Value = ClassExpression> {
    let leaf = prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(class);
    let property = prop::sample::select(vec!["r", "s"]).prop_flat_map(|name| {
        prop_oneof![Just(role(name)), Just(ObjectPropertyExpression::inverse(x(name)))]
    });

    leaf.prop_recursive(4, 24, 3, move |inner| {
        prop_oneof![
            (property.clone(), inner.clone()).prop_map(|(p, f)| ClassExpression::some(p, f)),
            (property.clone(), inner.clone()).prop_map(|(p, f)| ClassExpression::only(p, f)),
            inner.clone().prop_map(ClassExpression::not),
            prop::collection::btree_set(inner.clone(), 2..4).prop_map(ClassExpression::ObjectIntersectionOf),
            prop::collection::btree_set(inner.clone(), 2..4).prop_map(ClassExpression::ObjectUnionOf),
            (0u32..5, property.clone(), inner.clone()).prop_map(|(n, p, f)| {
                ClassExpression::ObjectExactCardinality { cardinality: n, property: p, filler: Box::new(f) }
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_generated_sub_class_of_round_trips(
        sub in arb_class_expression(),
        sup in arb_class_expression(),
    ) {
        let axiom: OwlObject = Axiom::sub_class_of(sub, sup).into();
        let session = Session::sha256();
        let translation = Translator::new(&session).translate(&axiom).unwrap();
        prop_assert_eq!(reconstruct_translation(&translation).unwrap(), axiom);
    }

    #[test]
    fn prop_interned_session_round_trips_too(expr in arb_class_expression()) {
        let object: OwlObject = Axiom::new(AxiomKind::ObjectPropertyDomain { property: role("r"), domain: expr }).into();
        let session = Session::new(&owl_lpg::SessionConfig {
            identity: owl_lpg::IdentityScheme::Interned,
        }).unwrap();
        let translation = Translator::new(&session).translate(&object).unwrap();
        prop_assert_eq!(reconstruct_translation(&translation).unwrap(), object);
    }
}
