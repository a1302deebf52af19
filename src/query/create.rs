//! Create synthesis: context scaffold, then axiom structure, then linking.

use tracing::debug;

use super::ast::*;
use super::vars::Vars;
use crate::layout::{Linking, Scaffold, VersioningContext};
use crate::model::{Edge, Node};
use crate::session::Session;
use crate::translate::Translation;
use crate::Result;

/// Build the statement that writes `translation` under `ctx`.
///
/// Reusable nodes and edges between two reusable nodes are upserted with
/// `MERGE`; every other node and edge is written with `CREATE`.
pub fn synthesize_create(
    session: &Session,
    ctx: &VersioningContext,
    translation: &Translation,
) -> Result<Query> {
    let scaffold = Scaffold::build(session, ctx)?;
    let linking = Linking::build(session, &scaffold.document, translation)?;
    let mut writer = CreateWriter { vars: Vars::new(), query: Query::new() };

    for node in scaffold.nodes() {
        writer.node(node);
    }
    for edge in &scaffold.edges {
        writer.edge(edge)?;
    }

    for node in translation.all_nodes() {
        writer.node(node);
    }
    for edge in translation.all_edges() {
        writer.edge(edge)?;
    }

    for node in &linking.iri_nodes {
        writer.node(node);
    }
    for edge in &linking.edges {
        writer.edge(edge)?;
    }

    debug!(
        construct = translation.translated.kind_name(),
        clauses = writer.query.clauses.len(),
        "synthesized create"
    );
    Ok(writer.query)
}

struct CreateWriter {
    vars: Vars,
    query: Query,
}

impl CreateWriter {
    fn node(&mut self, node: &Node) {
        if self.vars.is_bound(&node.id) {
            return;
        }
        let pattern = Pattern::node(self.vars.node(node));
        self.query.push(if node.is_reusable() {
            Clause::Merge(pattern)
        } else {
            Clause::Create(vec![pattern])
        });
    }

    fn edge(&mut self, edge: &Edge) -> Result<()> {
        let rel = RelPattern {
            alias: Some(self.vars.rel()),
            label: edge.label,
            direction: PatternDirection::Right,
            properties: edge.properties.clone(),
        };
        let pattern = Pattern::path(self.vars.reference(&edge.from)?, rel, self.vars.reference(&edge.to)?);
        self.query.push(if edge.is_reusable() {
            Clause::Merge(pattern)
        } else {
            Clause::Create(vec![pattern])
        });
        Ok(())
    }
}
