//! Query execution engine.
//!
//! Runs synthesized statements against any [`GraphStore`]. Clauses are
//! applied in order to a set of rows, each row binding variable names to
//! nodes or relationships, the way a Cypher engine would. A MATCH that
//! finds nothing leaves no rows, so every later clause becomes a no-op.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::*;
use crate::query::{
    Clause, MatchClause, NodePattern, Pattern, PatternDirection, PatternElement, Predicate, Query,
    RelPattern, SweepMode,
};
use crate::storage::GraphStore;
use crate::{Error, Result};

/// Execution statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationStats {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
}

impl MutationStats {
    pub fn is_empty(&self) -> bool {
        *self == MutationStats::default()
    }

    pub fn absorb(&mut self, other: MutationStats) {
        self.nodes_created += other.nodes_created;
        self.nodes_deleted += other.nodes_deleted;
        self.relationships_created += other.relationships_created;
        self.relationships_deleted += other.relationships_deleted;
    }
}

/// What a variable is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Binding {
    Node(NodeId),
    Rel(RelId),
    /// Unmatched OPTIONAL MATCH variable.
    Null,
}

type Row = BTreeMap<String, Binding>;

/// Execute a statement inside `tx`.
pub async fn execute<S: GraphStore>(store: &S, tx: &mut S::Tx, query: &Query) -> Result<MutationStats> {
    let mut stats = MutationStats::default();
    let mut rows: Vec<Row> = vec![Row::new()];

    for clause in &query.clauses {
        rows = match clause {
            Clause::Match(m) => match_clause(store, tx, rows, m).await?,
            Clause::Merge(pattern) => {
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    out.push(merge(store, tx, row, pattern, &mut stats).await?);
                }
                out
            }
            Clause::Create(patterns) => {
                let mut out = Vec::with_capacity(rows.len());
                for mut row in rows {
                    for pattern in patterns {
                        row = create(store, tx, row, pattern, &mut stats).await?;
                    }
                    out.push(row);
                }
                out
            }
            Clause::With { variables, limit } => {
                let projected = rows
                    .into_iter()
                    .map(|row| project(&row, variables))
                    .collect::<Result<Vec<_>>>()?;
                match limit {
                    Some(n) => projected.into_iter().take(*n).collect(),
                    None => projected,
                }
            }
            Clause::Delete { variables, detach } => {
                delete(store, tx, &rows, variables, *detach, &mut stats).await?;
                rows
            }
            Clause::Sweep { candidates, mode } => {
                sweep(store, tx, &rows, candidates, *mode, &mut stats).await?;
                rows
            }
        };
    }

    debug!(?stats, "statement executed");
    Ok(stats)
}

// ============================================================================
// MATCH
// ============================================================================

/// A row being extended through one MATCH clause, with the relationships
/// it has already used.
struct Partial {
    row: Row,
    used: Vec<RelId>,
}

async fn match_clause<S: GraphStore>(
    store: &S,
    tx: &S::Tx,
    rows: Vec<Row>,
    m: &MatchClause,
) -> Result<Vec<Row>> {
    let mut out = Vec::new();
    for row in rows {
        let mut partials = vec![Partial { row: row.clone(), used: Vec::new() }];
        for pattern in &m.patterns {
            let mut next = Vec::new();
            for partial in partials {
                next.extend(match_pattern(store, tx, partial, pattern).await?);
            }
            partials = filter_predicates(store, tx, next, pattern, &m.predicates).await?;
            if partials.is_empty() {
                break;
            }
        }

        if partials.is_empty() {
            if m.optional {
                let mut row = row;
                for alias in pattern_aliases(&m.patterns) {
                    row.entry(alias).or_insert(Binding::Null);
                }
                out.push(row);
            }
        } else {
            out.extend(partials.into_iter().map(|p| p.row));
        }
    }
    Ok(out)
}

async fn match_pattern<S: GraphStore>(
    store: &S,
    tx: &S::Tx,
    start: Partial,
    pattern: &Pattern,
) -> Result<Vec<Partial>> {
    let mut elements = pattern.elements.iter();
    let Some(PatternElement::Node(first)) = elements.next() else {
        return Err(Error::Query("pattern must start with a node".into()));
    };

    // (partial, node the path currently ends at)
    let mut states: Vec<(Partial, NodeId)> = Vec::new();
    match bound_node(&start.row, first)? {
        Some(Some(id)) => {
            if node_satisfies(store, tx, &id, first).await? {
                states.push((start, id));
            }
        }
        Some(None) => {}
        None => {
            for node in store.nodes_matching(tx, &first.labels, &first.properties).await? {
                let mut partial = Partial { row: start.row.clone(), used: start.used.clone() };
                bind(&mut partial.row, &first.alias, Binding::Node(node.id.clone()));
                states.push((partial, node.id));
            }
        }
    }

    while let Some(element) = elements.next() {
        let PatternElement::Relationship(rel) = element else {
            return Err(Error::Query("pattern nodes must be separated by relationships".into()));
        };
        let Some(PatternElement::Node(target)) = elements.next() else {
            return Err(Error::Query("pattern must end with a node".into()));
        };

        let mut next = Vec::new();
        for (partial, current) in states {
            let dir = match rel.direction {
                PatternDirection::Right => Direction::Outgoing,
                PatternDirection::Left => Direction::Incoming,
                PatternDirection::Both => Direction::Both,
            };
            for candidate in store.get_relationships(tx, &current, dir, Some(rel.label)).await? {
                if partial.used.contains(&candidate.id)
                    || !contains_all(&candidate.edge.properties, &rel.properties)
                {
                    continue;
                }
                if let Some(Binding::Rel(existing)) = rel.alias.as_ref().and_then(|a| partial.row.get(a)) {
                    if *existing != candidate.id {
                        continue;
                    }
                }
                let Some(other) = candidate.other_node(&current).cloned() else { continue };
                match bound_node(&partial.row, target)? {
                    Some(Some(id)) if id == other => {}
                    Some(_) => continue,
                    None => {
                        if !node_satisfies(store, tx, &other, target).await? {
                            continue;
                        }
                    }
                }
                let mut extended = Partial { row: partial.row.clone(), used: partial.used.clone() };
                extended.used.push(candidate.id);
                bind(&mut extended.row, &rel.alias, Binding::Rel(candidate.id));
                bind(&mut extended.row, &target.alias, Binding::Node(other.clone()));
                next.push((extended, other));
            }
        }
        states = next;
    }

    Ok(states.into_iter().map(|(p, _)| p).collect())
}

/// `None`: alias unbound. `Some(None)`: bound to null. `Some(Some(id))`: bound.
fn bound_node(row: &Row, pattern: &NodePattern) -> Result<Option<Option<NodeId>>> {
    let Some(alias) = &pattern.alias else { return Ok(None) };
    match row.get(alias) {
        None => Ok(None),
        Some(Binding::Null) => Ok(Some(None)),
        Some(Binding::Node(id)) => Ok(Some(Some(id.clone()))),
        Some(Binding::Rel(_)) => Err(Error::TypeError {
            expected: "Node".into(),
            got: format!("Relationship ({alias})"),
        }),
    }
}

async fn node_satisfies<S: GraphStore>(store: &S, tx: &S::Tx, id: &NodeId, pattern: &NodePattern) -> Result<bool> {
    if pattern.is_reference() {
        return Ok(true);
    }
    Ok(store.get_node(tx, id).await?.is_some_and(|node| {
        pattern.labels.iter().all(|l| node.has_label(*l)) && contains_all(&node.properties, &pattern.properties)
    }))
}

async fn filter_predicates<S: GraphStore>(
    store: &S,
    tx: &S::Tx,
    partials: Vec<Partial>,
    pattern: &Pattern,
    predicates: &[Predicate],
) -> Result<Vec<Partial>> {
    // Each predicate is checked by the pattern that declares its variable.
    let declared: Vec<&str> = pattern
        .elements
        .iter()
        .filter_map(|e| match e {
            PatternElement::Node(n) if !n.is_reference() => n.alias.as_deref(),
            _ => None,
        })
        .collect();
    let relevant: Vec<&Predicate> = predicates
        .iter()
        .filter(|p| match p {
            Predicate::OutDegree { variable, .. } => declared.contains(&variable.as_str()),
        })
        .collect();
    if relevant.is_empty() {
        return Ok(partials);
    }

    let mut kept = Vec::with_capacity(partials.len());
    'rows: for partial in partials {
        for predicate in &relevant {
            match predicate {
                Predicate::OutDegree { variable, degree } => {
                    let Some(Binding::Node(id)) = partial.row.get(variable) else { continue 'rows };
                    let out = store.get_relationships(tx, id, Direction::Outgoing, None).await?;
                    if out.len() != *degree {
                        continue 'rows;
                    }
                }
            }
        }
        kept.push(partial);
    }
    Ok(kept)
}

fn pattern_aliases(patterns: &[Pattern]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|p| p.elements.iter())
        .filter_map(|e| match e {
            PatternElement::Node(n) => n.alias.clone(),
            PatternElement::Relationship(r) => r.alias.clone(),
        })
        .collect()
}

fn bind(row: &mut Row, alias: &Option<String>, binding: Binding) {
    if let Some(alias) = alias {
        row.insert(alias.clone(), binding);
    }
}

// ============================================================================
// MERGE / CREATE
// ============================================================================

async fn merge<S: GraphStore>(
    store: &S,
    tx: &mut S::Tx,
    mut row: Row,
    pattern: &Pattern,
    stats: &mut MutationStats,
) -> Result<Row> {
    match pattern.elements.as_slice() {
        [PatternElement::Node(node)] => {
            if bound_node(&row, node)?.is_some() {
                return Ok(row);
            }
            let existing = store.nodes_matching(tx, &node.labels, &node.properties).await?;
            let id = match existing.into_iter().next() {
                Some(found) => found.id,
                None => {
                    stats.nodes_created += 1;
                    store.create_node(tx, &node.labels, node.properties.clone()).await?
                }
            };
            bind(&mut row, &node.alias, Binding::Node(id));
            Ok(row)
        }
        [PatternElement::Node(from), PatternElement::Relationship(rel), PatternElement::Node(to)] => {
            let (src, dst) = endpoints(&row, from, rel, to)?;
            let existing = store
                .get_relationships(tx, &src, Direction::Outgoing, Some(rel.label))
                .await?
                .into_iter()
                .find(|r| r.edge.to == dst && r.edge.properties == rel.properties);
            let id = match existing {
                Some(found) => found.id,
                None => {
                    stats.relationships_created += 1;
                    store.create_relationship(tx, &src, &dst, rel.label, rel.properties.clone()).await?
                }
            };
            bind(&mut row, &rel.alias, Binding::Rel(id));
            Ok(row)
        }
        _ => Err(Error::Query(format!("unsupported MERGE pattern: {pattern}"))),
    }
}

async fn create<S: GraphStore>(
    store: &S,
    tx: &mut S::Tx,
    mut row: Row,
    pattern: &Pattern,
    stats: &mut MutationStats,
) -> Result<Row> {
    // Unbound nodes are created first, then the relationships between them.
    for element in &pattern.elements {
        if let PatternElement::Node(node) = element {
            if bound_node(&row, node)?.is_none() {
                let id = store.create_node(tx, &node.labels, node.properties.clone()).await?;
                stats.nodes_created += 1;
                bind(&mut row, &node.alias, Binding::Node(id));
            }
        }
    }
    for window in pattern.elements.windows(3).step_by(2) {
        let [PatternElement::Node(from), PatternElement::Relationship(rel), PatternElement::Node(to)] = window else {
            return Err(Error::Query(format!("unsupported CREATE pattern: {pattern}")));
        };
        let (src, dst) = endpoints(&row, from, rel, to)?;
        let id = store.create_relationship(tx, &src, &dst, rel.label, rel.properties.clone()).await?;
        stats.relationships_created += 1;
        bind(&mut row, &rel.alias, Binding::Rel(id));
    }
    Ok(row)
}

fn endpoints(row: &Row, from: &NodePattern, rel: &RelPattern, to: &NodePattern) -> Result<(NodeId, NodeId)> {
    let resolve = |node: &NodePattern| match bound_node(row, node)? {
        Some(Some(id)) => Ok(id),
        _ => Err(Error::Query(format!(
            "{} endpoint {} is not bound",
            rel.label,
            node.alias.as_deref().unwrap_or("_")
        ))),
    };
    let (a, b) = (resolve(from)?, resolve(to)?);
    Ok(match rel.direction {
        PatternDirection::Left => (b, a),
        _ => (a, b),
    })
}

// ============================================================================
// WITH / DELETE / sweep
// ============================================================================

fn project(row: &Row, variables: &[String]) -> Result<Row> {
    variables
        .iter()
        .map(|v| {
            row.get(v)
                .cloned()
                .map(|b| (v.clone(), b))
                .ok_or_else(|| Error::Query(format!("variable `{v}` is not defined")))
        })
        .collect()
}

async fn delete<S: GraphStore>(
    store: &S,
    tx: &mut S::Tx,
    rows: &[Row],
    variables: &[String],
    detach: bool,
    stats: &mut MutationStats,
) -> Result<()> {
    let mut done: HashSet<Binding> = HashSet::new();
    for row in rows {
        for variable in variables {
            let binding = row
                .get(variable)
                .ok_or_else(|| Error::Query(format!("variable `{variable}` is not defined")))?;
            if !done.insert(binding.clone()) {
                continue;
            }
            match binding {
                Binding::Null => {}
                Binding::Rel(id) => {
                    if store.delete_relationship(tx, *id).await? {
                        stats.relationships_deleted += 1;
                    }
                }
                Binding::Node(id) if detach => {
                    let (deleted, rels) = store.detach_delete_node(tx, id).await?;
                    stats.relationships_deleted += rels;
                    stats.nodes_deleted += u64::from(deleted);
                }
                Binding::Node(id) => {
                    if store.delete_node(tx, id).await? {
                        stats.nodes_deleted += 1;
                    }
                }
            }
        }
    }
    Ok(())
}

async fn sweep<S: GraphStore>(
    store: &S,
    tx: &mut S::Tx,
    rows: &[Row],
    candidates: &[String],
    mode: SweepMode,
    stats: &mut MutationStats,
) -> Result<()> {
    for row in rows {
        for candidate in candidates {
            let Some(Binding::Node(id)) = row.get(candidate) else { continue };
            if store.get_node(tx, id).await?.is_none() {
                continue;
            }
            match mode {
                SweepMode::NoIncoming => {
                    if store.get_relationships(tx, id, Direction::Incoming, None).await?.is_empty() {
                        let (deleted, rels) = store.detach_delete_node(tx, id).await?;
                        stats.relationships_deleted += rels;
                        stats.nodes_deleted += u64::from(deleted);
                    }
                }
                SweepMode::Isolated => {
                    if store.get_relationships(tx, id, Direction::Both, None).await?.is_empty()
                        && store.delete_node(tx, id).await?
                    {
                        stats.nodes_deleted += 1;
                    }
                }
            }
        }
    }
    Ok(())
}
