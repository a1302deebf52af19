//! Row writers.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;

use crate::model::{Edge, Node, PropertyMap, Value};
use crate::{Error, Result};

/// Destination of exported rows. Shared between export workers, so
/// implementations lock internally.
pub trait RowSink: Send + Sync {
    /// Write one node row, returning the bytes written.
    fn write_node(&self, node: &Node) -> Result<u64>;

    /// Write one edge row, returning the bytes written.
    fn write_edge(&self, edge: &Edge) -> Result<u64>;

    /// Flush all output. Returns the names of the files written.
    fn finish(&self) -> Result<Vec<String>>;
}

// ============================================================================
// CSV
// ============================================================================

/// One CSV file per node primary label (`nodes_<Label>.csv`) and per edge
/// label (`rels_<LABEL>.csv`), with `neo4j-admin import` headers:
///
/// ```text
/// id:ID,:LABEL,cardinality:int
/// 17,ObjectMinCardinality;ClassExpression,2
///
/// :START_ID,:END_ID,:TYPE,index:int
/// 4,9f86d0…,SUB_OBJECT_PROPERTY_EXPRESSION,0
/// ```
///
/// Property columns come from the label's property keys; a row missing
/// one leaves the field empty.
pub struct CsvRowSink {
    dir: PathBuf,
    files: Mutex<BTreeMap<String, BufWriter<File>>>,
}

const NODE_HEADER: &[&str] = &["id:ID", ":LABEL"];
const EDGE_HEADER: &[&str] = &[":START_ID", ":END_ID", ":TYPE"];

impl CsvRowSink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, files: Mutex::new(BTreeMap::new()) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write_row(
        &self,
        file_name: String,
        header: &[&str],
        columns: &'static [&'static str],
        fixed: Vec<String>,
        properties: &PropertyMap,
    ) -> Result<u64> {
        if let Some(extra) = properties.keys().find(|k| !columns.contains(&k.as_str())) {
            return Err(Error::ConstraintViolation(format!(
                "property `{extra}` has no column in {file_name}"
            )));
        }

        let mut files = self.files.lock();
        let mut written = 0u64;
        let writer = match files.entry(file_name) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let mut writer = BufWriter::new(File::create(self.dir.join(e.key()))?);
                let line = header
                    .iter()
                    .map(|h| h.to_string())
                    .chain(columns.iter().map(|c| column_header(c)))
                    .collect::<Vec<_>>()
                    .join(",");
                writeln!(writer, "{line}")?;
                written += line.len() as u64 + 1;
                e.insert(writer)
            }
        };

        let line = fixed
            .into_iter()
            .chain(columns.iter().map(|c| properties.get(*c).map(csv_value).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{line}")?;
        Ok(written + line.len() as u64 + 1)
    }
}

impl RowSink for CsvRowSink {
    fn write_node(&self, node: &Node) -> Result<u64> {
        let primary = node.primary_label().ok_or_else(|| Error::MalformedGraph {
            node: node.id.to_string(),
            message: "node has no labels".into(),
        })?;
        let labels = node.labels.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(";");
        self.write_row(
            format!("nodes_{primary}.csv"),
            NODE_HEADER,
            primary.property_keys(),
            vec![csv_field(&node.id.to_string()), csv_field(&labels)],
            &node.properties,
        )
    }

    fn write_edge(&self, edge: &Edge) -> Result<u64> {
        self.write_row(
            format!("rels_{}.csv", edge.label),
            EDGE_HEADER,
            edge.label.property_keys(),
            vec![
                csv_field(&edge.from.to_string()),
                csv_field(&edge.to.to_string()),
                edge.label.as_str().to_string(),
            ],
            &edge.properties,
        )
    }

    fn finish(&self) -> Result<Vec<String>> {
        let mut files = self.files.lock();
        for writer in files.values_mut() {
            writer.flush()?;
        }
        Ok(files.keys().cloned().collect())
    }
}

fn column_header(key: &str) -> String {
    match key {
        "cardinality" | "index" => format!("{key}:int"),
        "structuralSpec" => format!("{key}:boolean"),
        _ => key.to_string(),
    }
}

fn csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => csv_field(s),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
    }
}

/// Quote when needed. An empty string is written as `""` so the loader
/// keeps it instead of reading a missing value.
fn csv_field(s: &str) -> String {
    if s.is_empty() || s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ============================================================================
// JSON lines
// ============================================================================

/// All rows in a single `rows.jsonl`, one JSON object per line.
pub struct JsonLinesRowSink {
    writer: Mutex<BufWriter<File>>,
}

const JSON_LINES_FILE: &str = "rows.jsonl";

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonRow<'a> {
    Node {
        id: String,
        labels: Vec<&'static str>,
        properties: &'a PropertyMap,
    },
    Edge {
        from: String,
        to: String,
        label: &'static str,
        properties: &'a PropertyMap,
    },
}

impl JsonLinesRowSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        let file = File::create(dir.as_ref().join(JSON_LINES_FILE))?;
        Ok(Self { writer: Mutex::new(BufWriter::new(file)) })
    }

    fn write(&self, row: &JsonRow<'_>) -> Result<u64> {
        let line = serde_json::to_string(row)?;
        writeln!(self.writer.lock(), "{line}")?;
        Ok(line.len() as u64 + 1)
    }
}

impl RowSink for JsonLinesRowSink {
    fn write_node(&self, node: &Node) -> Result<u64> {
        self.write(&JsonRow::Node {
            id: node.id.to_string(),
            labels: node.labels.iter().map(|l| l.as_str()).collect(),
            properties: &node.properties,
        })
    }

    fn write_edge(&self, edge: &Edge) -> Result<u64> {
        self.write(&JsonRow::Edge {
            from: edge.from.to_string(),
            to: edge.to.to_string(),
            label: edge.label.as_str(),
            properties: &edge.properties,
        })
    }

    fn finish(&self) -> Result<Vec<String>> {
        self.writer.lock().flush()?;
        Ok(vec![JSON_LINES_FILE.to_string()])
    }
}
