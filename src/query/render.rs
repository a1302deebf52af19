//! Cypher text rendering.

use std::fmt;

use super::ast::*;
use crate::model::{PropertyMap, Value};

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Match(m) => {
                if m.optional {
                    f.write_str("OPTIONAL ")?;
                }
                write!(f, "MATCH {}", join(&m.patterns))?;
                if !m.predicates.is_empty() {
                    write!(f, " WHERE {}", join_with(&m.predicates, " AND "))?;
                }
                Ok(())
            }
            Clause::Merge(pattern) => write!(f, "MERGE {pattern}"),
            Clause::Create(patterns) => write!(f, "CREATE {}", join(patterns)),
            Clause::With { variables, limit } => {
                write!(f, "WITH {}", variables.join(", "))?;
                if let Some(n) = limit {
                    write!(f, " LIMIT {n}")?;
                }
                Ok(())
            }
            Clause::Delete { variables, detach } => {
                if *detach {
                    f.write_str("DETACH ")?;
                }
                write!(f, "DELETE {}", variables.join(", "))
            }
            Clause::Sweep { candidates, mode } => {
                let (test, action) = match mode {
                    SweepMode::NoIncoming => ("()-->(c)", "DETACH DELETE"),
                    SweepMode::Isolated => ("(c)--()", "DELETE"),
                };
                write!(
                    f,
                    "FOREACH (x IN [c IN [{}] WHERE NOT EXISTS {{ {test} }}] | {action} x)",
                    candidates.join(", ")
                )
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::OutDegree { variable, degree } => {
                write!(f, "COUNT {{ ({variable})-->() }} = {degree}")
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.elements {
            match element {
                PatternElement::Node(n) => write!(f, "{n}")?,
                PatternElement::Relationship(r) => write!(f, "{r}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for NodePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(alias) = &self.alias {
            f.write_str(alias)?;
        }
        for label in &self.labels {
            write!(f, ":{label}")?;
        }
        if !self.properties.is_empty() {
            write!(f, " {{{}}}", format_properties(&self.properties))?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for RelPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = match self.direction {
            PatternDirection::Right => ("-", "->"),
            PatternDirection::Left => ("<-", "-"),
            PatternDirection::Both => ("-", "-"),
        };
        write!(f, "{open}[{}:{}", self.alias.as_deref().unwrap_or(""), self.label)?;
        if !self.properties.is_empty() {
            write!(f, " {{{}}}", format_properties(&self.properties))?;
        }
        write!(f, "]{close}")
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    join_with(items, ", ")
}

fn join_with<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items.iter().map(T::to_string).collect::<Vec<_>>().join(sep)
}

/// Format a PropertyMap as a Cypher map body (`key: value, ...`).
pub fn format_properties(props: &PropertyMap) -> String {
    props
        .iter()
        .map(|(key, value)| format!("{key}: {}", format_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a Value as a Cypher literal.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
    }
}
