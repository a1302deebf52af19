//! Delete synthesis: match the axiom's structure, remove its edges, then
//! sweep orphans.
//!
//! The axiom is found by its shape, anchored at the ontology document:
//! private nodes are matched by label and exact out-degree, reusable nodes
//! by their natural key. Any structurally identical occurrence is an equal
//! axiom, so one match (`LIMIT 1`) is removed.
//!
//! Edges between two reusable nodes are never deleted here: a literal's
//! datatype link or an entity's signature link may serve other axioms.
//! The one exception is a declaration, whose removal takes its entity out
//! of the signature.

use std::collections::HashSet;

use tracing::debug;

use super::ast::*;
use super::vars::Vars;
use crate::layout::{Scaffold, VersioningContext};
use crate::model::{EdgeLabel, NodeId, NodeLabel, PropertyMap};
use crate::owl::Iri;
use crate::session::Session;
use crate::translate::{Translation, Translator};
use crate::{Error, Result};

/// Build the statement that removes one occurrence of the axiom
/// `translation` from the document named by `ctx`.
pub fn synthesize_delete(
    session: &Session,
    ctx: &VersioningContext,
    translation: &Translation,
) -> Result<Query> {
    let axiom = &translation.main_node;
    if !axiom.primary_label().is_some_and(NodeLabel::is_axiom) {
        return Err(Error::Query(format!(
            "only axioms can be deleted, got {}",
            translation.translated.kind_name()
        )));
    }

    let scaffold = Scaffold::build(session, ctx)?;
    let mut plan = DeletePlan::default();
    let document = plan.vars.node(&scaffold.document);
    let doc_alias = document.alias.clone().unwrap_or_default();

    let mut query = Query::new();
    query.push(Clause::Match(MatchClause {
        optional: false,
        patterns: vec![Pattern::node(document)],
        predicates: Vec::new(),
    }));

    let anchor = plan.rel(EdgeLabel::Axiom, props_flag());
    plan.deleted.push(anchor.alias.clone().unwrap_or_default());
    let axiom_pattern = plan.vars.node(axiom);
    let axiom_alias = axiom_pattern.alias.clone().unwrap_or_default();
    plan.bound.push(axiom_alias.clone());
    plan.private.push(axiom_alias);
    plan.patterns.push(Pattern::path(NodePattern::reference(doc_alias.as_str()), anchor, axiom_pattern));
    plan.walk(translation)?;

    let mut bound = vec![doc_alias.clone()];
    bound.extend(plan.bound.iter().cloned());
    query.push(Clause::Match(MatchClause {
        optional: false,
        patterns: std::mem::take(&mut plan.patterns),
        predicates: std::mem::take(&mut plan.predicates),
    }));
    query.push(Clause::With { variables: bound, limit: Some(1) });

    if translation.main_node.primary_label() == Some(NodeLabel::Declaration) {
        plan.unlink_declared_entity(session, &mut query, &doc_alias, translation)?;
    }

    query.push(Clause::Delete { variables: plan.deleted, detach: false });
    if !plan.literals.is_empty() {
        query.push(Clause::Sweep { candidates: plan.literals, mode: SweepMode::NoIncoming });
    }
    let mut isolated = plan.private;
    isolated.extend(plan.shared);
    query.push(Clause::Sweep { candidates: isolated, mode: SweepMode::Isolated });

    debug!(
        axiom = translation.translated.kind_name(),
        clauses = query.clauses.len(),
        "synthesized delete"
    );
    Ok(query)
}

fn props_flag() -> PropertyMap {
    let mut props = PropertyMap::new();
    props.insert("structuralSpec".into(), true.into());
    props
}

#[derive(Default)]
struct DeletePlan {
    vars: Vars,
    patterns: Vec<Pattern>,
    predicates: Vec<Predicate>,
    /// Every node and relationship variable bound by the structure match.
    bound: Vec<String>,
    deleted: Vec<String>,
    private: Vec<String>,
    literals: Vec<String>,
    shared: Vec<String>,
    expanded: HashSet<NodeId>,
}

impl DeletePlan {
    fn rel(&mut self, label: EdgeLabel, properties: PropertyMap) -> RelPattern {
        let alias = self.vars.rel();
        self.bound.push(alias.clone());
        RelPattern { alias: Some(alias), label, direction: PatternDirection::Right, properties }
    }

    /// Add one pattern per edge leaving a private node or a literal.
    fn walk(&mut self, t: &Translation) -> Result<()> {
        let parent = &t.main_node;
        if !self.expanded.insert(parent.id.clone()) {
            return Ok(());
        }
        let parent_alias = self.alias(&parent.id)?;
        if !parent.is_reusable() {
            self.predicates.push(Predicate::OutDegree {
                variable: parent_alias.clone(),
                degree: t.edges.len(),
            });
        }

        for (edge, child) in t.children() {
            let first_sight = !self.vars.is_bound(child.id());
            let rel = self.rel(edge.label, edge.properties.clone());
            if !edge.is_reusable() {
                self.deleted.push(rel.alias.clone().unwrap_or_default());
            }
            let target = self.vars.node(&child.main_node);
            let child_alias = target.alias.clone().unwrap_or_default();
            self.patterns.push(Pattern::path(NodePattern::reference(parent_alias.as_str()), rel, target));

            if first_sight {
                self.bound.push(child_alias.clone());
                let node = &child.main_node;
                if !node.is_reusable() {
                    self.private.push(child_alias);
                } else if node.primary_label() == Some(NodeLabel::Literal) {
                    self.literals.push(child_alias);
                } else {
                    self.shared.push(child_alias);
                }
            }

            if !child.main_node.is_reusable() || child.main_node.primary_label() == Some(NodeLabel::Literal) {
                self.walk(child)?;
            }
        }
        Ok(())
    }

    fn alias(&self, id: &NodeId) -> Result<String> {
        self.vars
            .name(id)
            .map(str::to_string)
            .ok_or_else(|| Error::Query(format!("node {id} referenced before it was bound")))
    }

    /// `OPTIONAL MATCH` the declared entity's signature and IRI links so
    /// they are deleted with the declaration.
    fn unlink_declared_entity(
        &mut self,
        session: &Session,
        query: &mut Query,
        doc_alias: &str,
        translation: &Translation,
    ) -> Result<()> {
        let Some(entity) = translation.nested.first() else {
            return Err(Error::Query("declaration without an entity".into()));
        };
        let entity_alias = self.alias(entity.id())?;
        let iri = entity.main_node.get_str("iri").ok_or_else(|| Error::MalformedGraph {
            node: entity.id().to_string(),
            message: "entity node without an iri".into(),
        })?;
        let iri_node = Translator::new(session).translate_iri(&Iri::new(iri))?.main_node;

        let signature = self.rel(EdgeLabel::InSignature, PropertyMap::new());
        let entity_iri = self.rel(EdgeLabel::EntityIri, PropertyMap::new());
        self.deleted.push(signature.alias.clone().unwrap_or_default());
        self.deleted.push(entity_iri.alias.clone().unwrap_or_default());

        query.push(Clause::Match(MatchClause {
            optional: true,
            patterns: vec![Pattern::path(
                NodePattern::reference(doc_alias),
                signature,
                NodePattern::reference(entity_alias.as_str()),
            )],
            predicates: Vec::new(),
        }));

        let first_sight = !self.vars.is_bound(&iri_node.id);
        let target = self.vars.node(&iri_node);
        if first_sight {
            self.shared.push(target.alias.clone().unwrap_or_default());
        }
        query.push(Clause::Match(MatchClause {
            optional: true,
            patterns: vec![Pattern::path(NodePattern::reference(entity_alias.as_str()), entity_iri, target)],
            predicates: Vec::new(),
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owl::{vocab, AnnotationProperty, Axiom, Class, ClassExpression, Literal};

    fn delete_text(axiom: Axiom) -> String {
        let session = Session::sha256();
        let t = Translator::new(&session).translate_axiom(&axiom).unwrap();
        synthesize_delete(&session, &VersioningContext::new("p", "main", "doc"), &t)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_sub_class_of_delete() {
        let text = delete_text(Axiom::sub_class_of(
            ClassExpression::class("http://x/A"),
            ClassExpression::class("http://x/B"),
        ));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "MATCH (n0:OntologyDocument {branchId: 'main', ontologyDocumentId: 'doc', projectId: 'p'})");
        assert!(lines[1].starts_with("MATCH (n0)-[r0:AXIOM {structuralSpec: true}]->(n1:SubClassOf:Axiom)"));
        assert!(lines[1].ends_with("WHERE COUNT { (n1)-->() } = 2"), "{}", lines[1]);
        assert_eq!(lines[2], "WITH n0, r0, n1, r1, n2, r2, n3 LIMIT 1");
        assert_eq!(lines[3], "DELETE r0, r1, r2");
        assert_eq!(
            lines[4],
            "FOREACH (x IN [c IN [n1, n2, n3] WHERE NOT EXISTS { (c)--() }] | DELETE x)"
        );
        assert!(!text.contains("IN_SIGNATURE"));
    }

    #[test]
    fn test_declaration_delete_unlinks_entity() {
        let text = delete_text(Axiom::declaration(Class::new("http://x/E")));
        assert!(text.contains("OPTIONAL MATCH (n0)-[r2:IN_SIGNATURE]->(n2)"), "{text}");
        assert!(text.contains("OPTIONAL MATCH (n2)-[r3:ENTITY_IRI]->(n3:IRI {iri: 'http://x/E'})"), "{text}");
        assert!(text.contains("DELETE r0, r1, r2, r3"), "{text}");
    }

    #[test]
    fn test_literal_links_are_matched_but_kept() {
        let text = delete_text(Axiom::annotation_assertion(
            AnnotationProperty::new(vocab::RDFS_LABEL),
            "http://x/A",
            Literal::lang("Paris", "en"),
        ));
        assert!(text.contains(":LANGUAGE_TAG]"), "{text}");
        assert!(text.contains("DELETE r0, r1, r2, r3\n"), "{text}");
        assert!(text.contains("| DETACH DELETE x)"), "{text}");
    }

    #[test]
    fn test_entity_is_not_deletable() {
        let session = Session::sha256();
        let t = Translator::new(&session)
            .translate_class_expression(&ClassExpression::class("http://x/A"))
            .unwrap();
        let err = synthesize_delete(&session, &VersioningContext::new("p", "b", "d"), &t).unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }
}
