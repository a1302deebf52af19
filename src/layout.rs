//! # Versioned graph layout
//!
//! Every axiom lives under a project / branch / ontology-document scaffold:
//!
//! ```text
//! (:Project)-[:BRANCH]->(:Branch)-[:ONTOLOGY_DOCUMENT]->(:OntologyDocument)
//! (:OntologyDocument)-[:ONTOLOGY_IRI]->(:IRI)
//! (:OntologyDocument)-[:VERSION_IRI]->(:IRI)
//! (:OntologyDocument)-[:AXIOM {structuralSpec: true}]->(axiom)
//! (:OntologyDocument)-[:IN_SIGNATURE]->(entity)-[:ENTITY_IRI]->(:IRI)
//! ```
//!
//! Both the live-write path and the bulk export use these helpers, so the
//! two produce the same graph.

use serde::{Deserialize, Serialize};

use crate::identity::canonical;
use crate::model::{props, Edge, EdgeLabel, Node, NodeLabel, PropertyMap};
use crate::owl::Iri;
use crate::session::Session;
use crate::translate::{Translation, Translator};
use crate::{Error, Result};

/// Where an axiom is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersioningContext {
    pub project_id: String,
    pub branch_id: String,
    pub ontology_document_id: String,
    pub ontology_iri: Option<Iri>,
    pub version_iri: Option<Iri>,
}

impl VersioningContext {
    pub fn new(
        project_id: impl Into<String>,
        branch_id: impl Into<String>,
        ontology_document_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            branch_id: branch_id.into(),
            ontology_document_id: ontology_document_id.into(),
            ontology_iri: None,
            version_iri: None,
        }
    }

    pub fn with_ontology_iri(mut self, iri: impl Into<Iri>) -> Self {
        self.ontology_iri = Some(iri.into());
        self
    }

    pub fn with_version_iri(mut self, iri: impl Into<Iri>) -> Self {
        self.version_iri = Some(iri.into());
        self
    }

    /// Natural key of the document node. A document id is only unique
    /// within its project and branch.
    pub fn document_key(&self) -> PropertyMap {
        props([
            ("projectId", self.project_id.as_str()),
            ("branchId", self.branch_id.as_str()),
            ("ontologyDocumentId", self.ontology_document_id.as_str()),
        ])
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("projectId", &self.project_id),
            ("branchId", &self.branch_id),
            ("ontologyDocumentId", &self.ontology_document_id),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("versioning context has an empty {name}")));
            }
        }
        Ok(())
    }
}

/// Scaffold nodes and edges for one context, all content-addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffold {
    pub project: Node,
    pub branch: Node,
    pub document: Node,
    pub ontology_iri: Option<Node>,
    pub version_iri: Option<Node>,
    pub edges: Vec<Edge>,
}

impl Scaffold {
    pub fn build(session: &Session, ctx: &VersioningContext) -> Result<Self> {
        ctx.validate()?;
        let project = Node::new(
            session.assign(NodeLabel::Project, || canonical::project(&ctx.project_id))?,
            NodeLabel::Project,
        )
        .with_property("projectId", ctx.project_id.as_str());
        let branch = Node::new(
            session.assign(NodeLabel::Branch, || canonical::branch(&ctx.project_id, &ctx.branch_id))?,
            NodeLabel::Branch,
        )
        .with_property("projectId", ctx.project_id.as_str())
        .with_property("branchId", ctx.branch_id.as_str());
        let document = Node::new(
            session.assign(NodeLabel::OntologyDocument, || {
                canonical::ontology_document(&ctx.project_id, &ctx.branch_id, &ctx.ontology_document_id)
            })?,
            NodeLabel::OntologyDocument,
        )
        .with_property("projectId", ctx.project_id.as_str())
        .with_property("branchId", ctx.branch_id.as_str())
        .with_property("ontologyDocumentId", ctx.ontology_document_id.as_str());

        let mut edges = vec![
            Edge::new(project.id.clone(), branch.id.clone(), EdgeLabel::Branch),
            Edge::new(branch.id.clone(), document.id.clone(), EdgeLabel::OntologyDocument),
        ];

        let translator = Translator::new(session);
        let mut iri_node = |iri: &Option<Iri>, label: EdgeLabel| -> Result<Option<Node>> {
            let Some(iri) = iri else { return Ok(None) };
            let node = translator.translate_iri(iri)?.main_node;
            edges.push(Edge::new(document.id.clone(), node.id.clone(), label));
            Ok(Some(node))
        };
        let ontology_iri = iri_node(&ctx.ontology_iri, EdgeLabel::OntologyIri)?;
        let version_iri = iri_node(&ctx.version_iri, EdgeLabel::VersionIri)?;

        Ok(Self { project, branch, document, ontology_iri, version_iri, edges })
    }

    /// Scaffold nodes, outermost first.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut nodes = vec![&self.project, &self.branch, &self.document];
        nodes.extend(self.ontology_iri.iter());
        nodes.extend(self.version_iri.iter());
        nodes
    }
}

/// Edges tying one translation to its document and to the signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Linking {
    /// IRI nodes of the entities the translation touches.
    pub iri_nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Linking {
    pub fn build(session: &Session, document: &Node, translation: &Translation) -> Result<Self> {
        let translator = Translator::new(session);
        let mut linking = Linking::default();

        if translation.main_node.primary_label().is_some_and(NodeLabel::is_axiom) {
            linking.edges.push(
                Edge::new(document.id.clone(), translation.main_node.id.clone(), EdgeLabel::Axiom)
                    .with_property("structuralSpec", true),
            );
        }

        for entity in translation.all_nodes().into_iter().filter(|n| n.has_label(NodeLabel::Entity)) {
            let Some(iri) = entity.get_str("iri") else {
                return Err(Error::MalformedGraph {
                    node: entity.id.to_string(),
                    message: "entity node without an iri".into(),
                });
            };
            let iri_node = translator.translate_iri(&Iri::new(iri))?.main_node;
            linking.edges.push(Edge::new(document.id.clone(), entity.id.clone(), EdgeLabel::InSignature));
            linking.edges.push(Edge::new(entity.id.clone(), iri_node.id.clone(), EdgeLabel::EntityIri));
            if !linking.iri_nodes.iter().any(|n| n.id == iri_node.id) {
                linking.iri_nodes.push(iri_node);
            }
        }
        Ok(linking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::owl::{Axiom, ClassExpression};

    fn ctx() -> VersioningContext {
        VersioningContext::new("p1", "main", "doc1")
            .with_ontology_iri("http://x/onto")
            .with_version_iri("http://x/onto/1.0")
    }

    #[test]
    fn test_scaffold_shape() {
        let s = Session::sha256();
        let scaffold = Scaffold::build(&s, &ctx()).unwrap();
        assert_eq!(scaffold.nodes().len(), 5);
        let labels: Vec<_> = scaffold.edges.iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![EdgeLabel::Branch, EdgeLabel::OntologyDocument, EdgeLabel::OntologyIri, EdgeLabel::VersionIri]
        );
        assert_eq!(scaffold.branch.get_str("branchId"), Some("main"));
    }

    #[test]
    fn test_scaffold_is_content_addressed() {
        let a = Scaffold::build(&Session::sha256(), &ctx()).unwrap();
        let b = Scaffold::build(&Session::sha256(), &ctx()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_document_is_scoped_by_project_and_branch() {
        let s = Session::sha256();
        let main = Scaffold::build(&s, &VersioningContext::new("p1", "main", "doc1")).unwrap();
        let dev = Scaffold::build(&s, &VersioningContext::new("p1", "dev", "doc1")).unwrap();
        let other = Scaffold::build(&s, &VersioningContext::new("p2", "main", "doc1")).unwrap();
        assert_ne!(main.document.id, dev.document.id);
        assert_ne!(main.document.id, other.document.id);
        assert_eq!(main.project.id, dev.project.id);
        assert_eq!(main.document.properties, ctx().document_key());
        assert_eq!(dev.document.get_str("branchId"), Some("dev"));
    }

    #[test]
    fn test_empty_context_rejected() {
        let s = Session::sha256();
        let err = Scaffold::build(&s, &VersioningContext::new("", "main", "doc")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_linking_covers_every_entity() {
        let s = Session::sha256();
        let scaffold = Scaffold::build(&s, &ctx()).unwrap();
        let t = Translator::new(&s)
            .translate_axiom(&Axiom::sub_class_of(
                ClassExpression::class("http://x/A"),
                ClassExpression::class("http://x/B"),
            ))
            .unwrap();
        let linking = Linking::build(&s, &scaffold.document, &t).unwrap();

        assert_eq!(linking.iri_nodes.len(), 2);
        let axiom_edge = &linking.edges[0];
        assert_eq!(axiom_edge.label, EdgeLabel::Axiom);
        assert_eq!(axiom_edge.properties.get("structuralSpec"), Some(&Value::Bool(true)));
        assert_eq!(linking.edges.iter().filter(|e| e.label == EdgeLabel::InSignature).count(), 2);
        assert_eq!(linking.edges.iter().filter(|e| e.label == EdgeLabel::EntityIri).count(), 2);
    }
}
