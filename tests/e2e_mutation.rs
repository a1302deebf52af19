//! Add / remove tests against the in-memory store.
//!
//! Removal is structural: any stored occurrence shaped like the axiom is
//! taken out, together with private nodes and literals nothing else uses.

use std::collections::BTreeSet;

use owl_lpg::model::props;
use owl_lpg::owl::{
    vocab, Annotation, AnnotationProperty, AnonymousIndividual, Axiom, AxiomKind, Class,
    ClassExpression, Datatype, Literal, NamedIndividual, ObjectProperty, ObjectPropertyExpression,
};
use owl_lpg::{
    AxiomChange, Direction, EdgeLabel, Error, GraphStore, MemoryStore, NodeLabel, OntologyGraph,
    TxMode, VersioningContext,
};
use pretty_assertions::assert_eq;

const A: &str = "http://example.org/zoo#Animal";
const B: &str = "http://example.org/zoo#Bird";
const C: &str = "http://example.org/zoo#Cat";
const EATS: &str = "http://example.org/zoo#eats";

fn ctx() -> VersioningContext {
    VersioningContext::new("zoo", "main", "zoo.owl")
}

fn sub(sub: &str, sup: &str) -> Axiom {
    Axiom::sub_class_of(ClassExpression::class(sub), ClassExpression::class(sup))
}

/// Declares every entity later axioms use, so signature links exist
/// before the snapshot is taken.
async fn declared_graph() -> OntologyGraph<MemoryStore> {
    let graph = OntologyGraph::open_memory().unwrap();
    let declarations: Vec<AxiomChange> = [
        Axiom::declaration(Class::new(A)),
        Axiom::declaration(Class::new(B)),
        Axiom::declaration(Class::new(C)),
        Axiom::declaration(ObjectProperty::new(EATS)),
        Axiom::declaration(AnnotationProperty::new(vocab::RDFS_LABEL)),
        Axiom::declaration(Datatype::new(vocab::XSD_STRING)),
    ]
    .into_iter()
    .map(AxiomChange::Add)
    .collect();
    graph.apply(&ctx(), &declarations).await.unwrap();
    graph
}

/// Labels of edges touching the class `iri`, by direction.
async fn class_edges(store: &MemoryStore, iri: &str, dir: Direction) -> BTreeSet<EdgeLabel> {
    let tx = store.begin_tx(TxMode::ReadOnly).await.unwrap();
    let found = store
        .nodes_matching(&tx, &[NodeLabel::Class], &props([("iri", iri)]))
        .await
        .unwrap();
    let mut labels = BTreeSet::new();
    for node in &found {
        for rel in store.get_relationships(&tx, &node.id, dir, None).await.unwrap() {
            labels.insert(rel.edge.label);
        }
    }
    store.commit_tx(tx).await.unwrap();
    labels
}

async fn count(store: &MemoryStore, label: NodeLabel) -> usize {
    let tx = store.begin_tx(TxMode::ReadOnly).await.unwrap();
    let n = store.nodes_by_label(&tx, label).await.unwrap().len();
    store.commit_tx(tx).await.unwrap();
    n
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_first_axiom_creates_scaffold_structure_and_signature() {
    let graph = OntologyGraph::open_memory().unwrap();
    let stats = graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();

    // Project, Branch, document, the axiom, two classes and their IRIs.
    assert_eq!(stats.nodes_created, 8);
    // Scaffold 2, structure 2, AXIOM 1, IN_SIGNATURE 2, ENTITY_IRI 2.
    assert_eq!(stats.relationships_created, 9);
    assert_eq!(stats.nodes_deleted, 0);
}

#[tokio::test]
async fn test_adding_an_equal_axiom_again_adds_only_private_parts() {
    let graph = OntologyGraph::open_memory().unwrap();
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();
    let stats = graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();

    assert_eq!(stats.nodes_created, 1);
    assert_eq!(stats.relationships_created, 3);
    assert_eq!(count(graph.store(), NodeLabel::SubClassOf).await, 2);
    assert_eq!(count(graph.store(), NodeLabel::Class).await, 2);
    assert_eq!(count(graph.store(), NodeLabel::Project).await, 1);
}

#[tokio::test]
async fn test_entity_used_in_two_documents_is_one_node() {
    let graph = OntologyGraph::open_memory().unwrap();
    let other = VersioningContext::new("zoo", "main", "birds.owl");
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();
    graph.add_axiom(&other, &sub(C, B)).await.unwrap();

    assert_eq!(count(graph.store(), NodeLabel::Class).await, 3);
    assert_eq!(count(graph.store(), NodeLabel::OntologyDocument).await, 2);
    assert_eq!(count(graph.store(), NodeLabel::Branch).await, 1);
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_add_then_remove_restores_the_graph() {
    let graph = declared_graph().await;
    let before = graph.store().snapshot();

    let axiom = Axiom::sub_class_of(
        ClassExpression::class(C),
        ClassExpression::some(
            ObjectPropertyExpression::named(EATS),
            ClassExpression::and([ClassExpression::class(B), ClassExpression::not(ClassExpression::class(A))]),
        ),
    )
    .annotated(Annotation::new(AnnotationProperty::new(vocab::RDFS_LABEL), Literal::string("cats eat birds")))
    .annotated(Annotation::new(AnnotationProperty::new(vocab::RDFS_LABEL), Literal::lang("Katzen", "de")));

    let added = graph.add_axiom(&ctx(), &axiom).await.unwrap();
    assert_ne!(graph.store().snapshot(), before);

    let removed = graph.remove_axiom(&ctx(), &axiom).await.unwrap();
    assert_eq!(graph.store().snapshot(), before);
    assert_eq!(removed.nodes_deleted, added.nodes_created);
    assert_eq!(removed.relationships_deleted, added.relationships_created);
}

#[tokio::test]
async fn test_same_document_id_on_other_branch_or_project_is_separate() {
    let graph = OntologyGraph::open_memory().unwrap();
    let dev = VersioningContext::new("zoo", "dev", "zoo.owl");
    let farm = VersioningContext::new("farm", "main", "zoo.owl");
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();

    assert!(graph.axioms(&dev).await.unwrap().is_empty());
    assert!(graph.axioms(&farm).await.unwrap().is_empty());
    assert!(graph.remove_axiom(&dev, &sub(A, B)).await.unwrap().is_empty());
    assert!(graph.remove_axiom(&farm, &sub(A, B)).await.unwrap().is_empty());
    assert_eq!(graph.axioms(&ctx()).await.unwrap(), vec![sub(A, B)]);

    graph.add_axiom(&dev, &sub(A, B)).await.unwrap();
    graph.add_axiom(&farm, &sub(A, B)).await.unwrap();
    assert_eq!(count(graph.store(), NodeLabel::OntologyDocument).await, 3);
    assert_eq!(count(graph.store(), NodeLabel::Branch).await, 3);
    assert_eq!(count(graph.store(), NodeLabel::Project).await, 2);
    assert_eq!(count(graph.store(), NodeLabel::Class).await, 2);

    graph.remove_axiom(&dev, &sub(A, B)).await.unwrap();
    assert!(graph.axioms(&dev).await.unwrap().is_empty());
    assert_eq!(graph.axioms(&ctx()).await.unwrap(), vec![sub(A, B)]);
    assert_eq!(graph.axioms(&farm).await.unwrap(), vec![sub(A, B)]);
}

#[tokio::test]
async fn test_blank_node_label_is_local_to_its_document() {
    let graph = OntologyGraph::open_memory().unwrap();
    let birds = VersioningContext::new("zoo", "main", "birds.owl");
    let eats_something = Axiom::new(AxiomKind::ObjectPropertyAssertion {
        property: ObjectPropertyExpression::named(EATS),
        subject: NamedIndividual::new("http://example.org/zoo#tom").into(),
        object: AnonymousIndividual::new("_:b0").into(),
    });
    graph.add_axiom(&ctx(), &eats_something).await.unwrap();
    graph.add_axiom(&birds, &eats_something).await.unwrap();
    assert_eq!(count(graph.store(), NodeLabel::AnonymousIndividual).await, 2);
    assert_eq!(count(graph.store(), NodeLabel::NamedIndividual).await, 1);

    graph.remove_axiom(&birds, &eats_something).await.unwrap();
    assert_eq!(count(graph.store(), NodeLabel::AnonymousIndividual).await, 1);
    assert!(graph.axioms(&birds).await.unwrap().is_empty());
    assert_eq!(graph.axioms(&ctx()).await.unwrap(), vec![eats_something]);
}

#[tokio::test]
async fn test_remove_takes_one_occurrence() {
    let graph = declared_graph().await;
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();

    let stats = graph.remove_axiom(&ctx(), &sub(A, B)).await.unwrap();
    assert_eq!(stats.nodes_deleted, 1);
    assert_eq!(stats.relationships_deleted, 3);
    assert_eq!(count(graph.store(), NodeLabel::SubClassOf).await, 1);

    graph.remove_axiom(&ctx(), &sub(A, B)).await.unwrap();
    assert_eq!(count(graph.store(), NodeLabel::SubClassOf).await, 0);
}

#[tokio::test]
async fn test_removing_absent_axiom_changes_nothing() {
    let graph = declared_graph().await;
    let before = graph.store().snapshot();

    let stats = graph.remove_axiom(&ctx(), &sub(A, C)).await.unwrap();
    assert!(stats.is_empty());
    assert_eq!(graph.store().snapshot(), before);
}

#[tokio::test]
async fn test_remove_does_not_match_an_annotated_occurrence() {
    let graph = declared_graph().await;
    let annotated = sub(A, B)
        .annotated(Annotation::new(AnnotationProperty::new(vocab::RDFS_LABEL), Literal::string("kept")));
    graph.add_axiom(&ctx(), &annotated).await.unwrap();

    let stats = graph.remove_axiom(&ctx(), &sub(A, B)).await.unwrap();
    assert!(stats.is_empty());
    assert_eq!(graph.axioms(&ctx()).await.unwrap().into_iter().filter(|a| !a.is_declaration()).collect::<Vec<_>>(), vec![annotated]);
}

#[tokio::test]
async fn test_shared_structure_survives_removal() {
    let graph = declared_graph().await;
    let shared = Literal::lang("Tier", "de");
    let on_animal = Axiom::annotation_assertion(AnnotationProperty::new(vocab::RDFS_LABEL), A, shared.clone());
    let on_cat = Axiom::annotation_assertion(AnnotationProperty::new(vocab::RDFS_LABEL), C, shared);
    graph.add_axiom(&ctx(), &on_animal).await.unwrap();
    graph.add_axiom(&ctx(), &on_cat).await.unwrap();
    graph.add_axiom(&ctx(), &sub(C, A)).await.unwrap();

    graph.remove_axiom(&ctx(), &on_animal).await.unwrap();

    assert_eq!(count(graph.store(), NodeLabel::Literal).await, 1);
    assert_eq!(count(graph.store(), NodeLabel::LanguageTag).await, 1);
    let remaining: Vec<Axiom> =
        graph.axioms(&ctx()).await.unwrap().into_iter().filter(|a| !a.is_declaration()).collect();
    let mut expected = vec![on_cat.clone(), sub(C, A)];
    expected.sort();
    assert_eq!(remaining, expected);

    graph.remove_axiom(&ctx(), &on_cat).await.unwrap();
    assert_eq!(count(graph.store(), NodeLabel::Literal).await, 0);
    assert_eq!(count(graph.store(), NodeLabel::LanguageTag).await, 0);
}

#[tokio::test]
async fn test_removing_declaration_unlinks_entity_but_other_removals_do_not() {
    let graph = OntologyGraph::open_memory().unwrap();
    graph.add_axiom(&ctx(), &Axiom::declaration(Class::new(A))).await.unwrap();
    graph.add_axiom(&ctx(), &Axiom::declaration(Class::new(B))).await.unwrap();
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();

    graph.remove_axiom(&ctx(), &sub(A, B)).await.unwrap();
    assert!(class_edges(graph.store(), A, Direction::Incoming).await.contains(&EdgeLabel::InSignature));
    assert!(class_edges(graph.store(), A, Direction::Outgoing).await.contains(&EdgeLabel::EntityIri));

    graph.remove_axiom(&ctx(), &Axiom::declaration(Class::new(A))).await.unwrap();
    assert!(class_edges(graph.store(), A, Direction::Both).await.is_empty());
    assert!(class_edges(graph.store(), B, Direction::Incoming).await.contains(&EdgeLabel::InSignature));
    assert_eq!(count(graph.store(), NodeLabel::Class).await, 1);
    assert_eq!(count(graph.store(), NodeLabel::Iri).await, 1);
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn test_concurrent_writer_conflict_is_retryable() {
    let graph = OntologyGraph::open_memory().unwrap();
    let held = graph.store().begin_tx(TxMode::ReadWrite).await.unwrap();

    let err = graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap_err();
    assert!(matches!(err, Error::TxConflict(_)), "{err}");
    assert!(err.is_retryable());

    graph.store().rollback_tx(held).await.unwrap();
    graph.add_axiom(&ctx(), &sub(A, B)).await.unwrap();
    assert_eq!(graph.axioms(&ctx()).await.unwrap(), vec![sub(A, B)]);
}

#[tokio::test]
async fn test_batch_failure_names_position_and_rolls_back() {
    let graph = declared_graph().await;
    let before = graph.store().snapshot();
    let malformed = Axiom::sub_class_of(
        ClassExpression::ObjectUnionOf([ClassExpression::class(A)].into_iter().collect()),
        ClassExpression::class(B),
    );

    let err = graph
        .apply(&ctx(), &[AxiomChange::Add(sub(A, B)), AxiomChange::Remove(sub(B, C)), AxiomChange::Add(malformed)])
        .await
        .unwrap_err();

    match &err {
        Error::AtPosition { position, source, .. } => {
            assert_eq!(*position, 2);
            assert!(matches!(**source, Error::Construction { .. }), "{source}");
        }
        other => panic!("expected a positioned error, got {other}"),
    }
    assert!(!err.is_retryable());
    assert_eq!(graph.store().snapshot(), before);
}

#[tokio::test]
async fn test_statements_render_as_cypher() {
    let graph = OntologyGraph::open_memory().unwrap();
    let create = graph.create_query(&ctx(), &sub(A, B)).unwrap().to_string();
    let delete = graph.delete_query(&ctx(), &sub(A, B)).unwrap().to_string();

    assert!(create.starts_with("MERGE (n0:Project {projectId: 'zoo'})"), "{create}");
    assert!(create.contains(":SubClassOf:Axiom)"), "{create}");
    assert!(create.contains(&format!("{{iri: '{A}'}}")), "{create}");
    assert!(
        delete.starts_with("MATCH (n0:OntologyDocument {branchId: 'main', ontologyDocumentId: 'zoo.owl', projectId: 'zoo'})"),
        "{delete}"
    );
    assert!(delete.contains("LIMIT 1"), "{delete}");
    assert!(delete.contains("DELETE r0, r1, r2"), "{delete}");
}
