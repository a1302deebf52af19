//! The exporter: translate, link, dedup, write.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use super::progress::{ExportProgress, ExportSummary, ProgressSnapshot};
use super::sink::{CsvRowSink, JsonLinesRowSink, RowSink};
use super::staging::StagedOutput;
use super::tracker::{tracker_for, MembershipTracker, TrackKey};
use super::RowFormat;
use crate::config::ExportConfig;
use crate::layout::{Linking, Scaffold, VersioningContext};
use crate::model::{Edge, Node};
use crate::owl::Axiom;
use crate::session::Session;
use crate::translate::Translator;
use crate::{Error, Result};

/// Streams axioms of one ontology document into a [`RowSink`].
///
/// The scaffold rows are written when the exporter is created. Axioms may
/// then be exported one at a time, as a batch, or as a parallel batch;
/// all workers share the session and the tracker.
pub struct BulkExporter<'s> {
    session: &'s Session,
    scaffold: Scaffold,
    config: ExportConfig,
    tracker: Box<dyn MembershipTracker>,
    sink: Box<dyn RowSink>,
    progress: ExportProgress,
    started_at: DateTime<Utc>,
}

impl<'s> BulkExporter<'s> {
    pub fn new(
        session: &'s Session,
        ctx: &VersioningContext,
        config: &ExportConfig,
        sink: Box<dyn RowSink>,
    ) -> Result<Self> {
        let exporter = Self {
            session,
            scaffold: Scaffold::build(session, ctx)?,
            config: config.clone(),
            tracker: tracker_for(&config.tracker)?,
            sink,
            progress: ExportProgress::new(),
            started_at: Utc::now(),
        };
        info!(
            document = %ctx.ontology_document_id,
            tracker = ?config.tracker,
            format = ?config.format,
            "bulk export started"
        );

        for node in exporter.scaffold.nodes() {
            exporter.emit_node(node)?;
        }
        for edge in &exporter.scaffold.edges {
            exporter.emit_edge(edge)?;
        }
        Ok(exporter)
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    pub fn export_axiom(&self, axiom: &Axiom) -> Result<()> {
        self.progress.axiom_received();
        let translation = Translator::new(self.session).translate_axiom(axiom)?;
        let linking = Linking::build(self.session, &self.scaffold.document, &translation)?;

        for node in translation.all_nodes() {
            self.emit_node(node)?;
        }
        for node in &linking.iri_nodes {
            self.emit_node(node)?;
        }
        for edge in translation.all_edges() {
            self.emit_edge(edge)?;
        }
        for edge in &linking.edges {
            self.emit_edge(edge)?;
        }

        self.progress.axiom_done();
        debug!(axiom = %axiom, "axiom exported");
        Ok(())
    }

    /// Export in order. The first failure stops the batch and names the
    /// offending axiom and its position.
    pub fn export_all(&self, axioms: &[Axiom]) -> Result<()> {
        axioms.iter().enumerate().try_for_each(|(position, axiom)| {
            self.export_axiom(axiom).map_err(|e| Error::at_position(position, axiom, e))
        })
    }

    /// Export on the rayon pool. Row order is unspecified; the set of rows
    /// is the same as [`export_all`](Self::export_all) would write.
    pub fn export_par(&self, axioms: &[Axiom]) -> Result<()> {
        axioms.par_iter().enumerate().try_for_each(|(position, axiom)| {
            self.export_axiom(axiom).map_err(|e| Error::at_position(position, axiom, e))
        })
    }

    pub fn finish(self) -> Result<ExportSummary> {
        let files = self.sink.finish().map_err(|e| self.export_error(e))?;
        self.progress.tracked(self.tracker.len() as u64);
        let summary = ExportSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            format: self.config.format,
            tracker: self.config.tracker.clone(),
            tracker_evicted: self.tracker.evicted(),
            counts: self.progress.snapshot(),
            files,
        };
        info!(
            axioms = summary.counts.axioms,
            node_rows = summary.counts.node_rows,
            edge_rows = summary.counts.edge_rows,
            duplicates_skipped = summary.counts.duplicates_skipped,
            bytes = summary.counts.bytes_written,
            tracked = summary.counts.tracked,
            tracker_evicted = summary.tracker_evicted,
            elapsed_ms = summary.elapsed_ms(),
            "bulk export finished"
        );
        Ok(summary)
    }

    fn emit_node(&self, node: &Node) -> Result<()> {
        if node.is_reusable() {
            if !self.tracker.insert_if_absent(TrackKey::node(node)) {
                self.progress.duplicate();
                return Ok(());
            }
            self.progress.tracked(self.tracker.len() as u64);
        }
        let bytes = self.sink.write_node(node).map_err(|e| self.export_error(e))?;
        self.progress.node_row(bytes);
        Ok(())
    }

    fn emit_edge(&self, edge: &Edge) -> Result<()> {
        if edge.is_reusable() {
            if !self.tracker.insert_if_absent(TrackKey::edge(edge)) {
                self.progress.duplicate();
                return Ok(());
            }
            self.progress.tracked(self.tracker.len() as u64);
        }
        let bytes = self.sink.write_edge(edge).map_err(|e| self.export_error(e))?;
        self.progress.edge_row(bytes);
        Ok(())
    }

    fn export_error(&self, source: Error) -> Error {
        let counts = self.progress.snapshot();
        Error::Export { rows: counts.rows(), bytes: counts.bytes_written, source: Box::new(source) }
    }
}

/// Export `axioms` into a new directory at `target`.
///
/// Rows go to a staging directory beside `target` together with a
/// `manifest.json` summary; the directory is renamed to `target` only if
/// the whole export succeeds.
pub fn export_to_dir(
    session: &Session,
    ctx: &VersioningContext,
    config: &ExportConfig,
    axioms: &[Axiom],
    target: impl AsRef<Path>,
) -> Result<ExportSummary> {
    let staged = StagedOutput::new(target.as_ref())?;
    let sink: Box<dyn RowSink> = match config.format {
        RowFormat::Csv => Box::new(CsvRowSink::new(staged.path())?),
        RowFormat::JsonLines => Box::new(JsonLinesRowSink::new(staged.path())?),
    };

    let exporter = BulkExporter::new(session, ctx, config, sink)?;
    exporter.export_par(axioms)?;
    let summary = exporter.finish()?;

    fs::write(staged.path().join(ExportSummary::MANIFEST), serde_json::to_vec_pretty(&summary)?)?;
    staged.publish()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::TrackerPolicy;
    use crate::model::{EdgeLabel, NodeLabel};
    use crate::owl::{AxiomKind, ClassExpression};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Keeps rows in memory.
    #[derive(Default)]
    struct VecSink {
        nodes: Mutex<Vec<Node>>,
        edges: Mutex<Vec<Edge>>,
    }

    impl RowSink for VecSink {
        fn write_node(&self, node: &Node) -> Result<u64> {
            self.nodes.lock().push(node.clone());
            Ok(1)
        }
        fn write_edge(&self, edge: &Edge) -> Result<u64> {
            self.edges.lock().push(edge.clone());
            Ok(1)
        }
        fn finish(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    impl RowSink for Arc<VecSink> {
        fn write_node(&self, node: &Node) -> Result<u64> {
            self.as_ref().write_node(node)
        }
        fn write_edge(&self, edge: &Edge) -> Result<u64> {
            self.as_ref().write_edge(edge)
        }
        fn finish(&self) -> Result<Vec<String>> {
            self.as_ref().finish()
        }
    }

    /// Fails every edge write.
    struct BrokenSink;

    impl RowSink for BrokenSink {
        fn write_node(&self, _: &Node) -> Result<u64> {
            Ok(1)
        }
        fn write_edge(&self, _: &Edge) -> Result<u64> {
            Err(Error::Io(std::io::Error::other("disk full")))
        }
        fn finish(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn subclass(a: &str, b: &str) -> Axiom {
        Axiom::sub_class_of(ClassExpression::class(a), ClassExpression::class(b))
    }

    fn ctx() -> VersioningContext {
        VersioningContext::new("p", "main", "doc")
    }

    #[test]
    fn test_shared_class_is_written_once() {
        let session = Session::sha256();
        let sink = Arc::new(VecSink::default());
        let axioms: Vec<Axiom> = (0..20).map(|i| subclass("http://x/C", &format!("http://x/D{i}"))).collect();

        let exporter = BulkExporter::new(&session, &ctx(), &ExportConfig::default(), Box::new(sink.clone()))
            .unwrap();
        exporter.export_all(&axioms).unwrap();
        let summary = exporter.finish().unwrap();

        let nodes = sink.nodes.lock();
        let c_rows = nodes
            .iter()
            .filter(|n| n.has_label(NodeLabel::Class) && n.get_str("iri") == Some("http://x/C"))
            .count();
        assert_eq!(c_rows, 1);
        assert_eq!(nodes.iter().filter(|n| n.has_label(NodeLabel::SubClassOf)).count(), 20);
        let axiom_edges = sink.edges.lock().iter().filter(|e| e.label == EdgeLabel::Axiom).count();
        assert_eq!(axiom_edges, 20);
        assert_eq!(summary.counts.axioms, 20);
        assert!(summary.counts.duplicates_skipped > 0);
    }

    #[test]
    fn test_parallel_export_writes_the_same_rows() {
        let axioms: Vec<Axiom> = (0..50).map(|i| subclass(&format!("http://x/C{}", i % 5), "http://x/Top")).collect();

        let count = |parallel: bool| {
            let session = Session::sha256();
            let sink = Arc::new(VecSink::default());
            let exporter =
                BulkExporter::new(&session, &ctx(), &ExportConfig::default(), Box::new(sink.clone())).unwrap();
            if parallel {
                exporter.export_par(&axioms).unwrap();
            } else {
                exporter.export_all(&axioms).unwrap();
            }
            let summary = exporter.finish().unwrap();
            (summary.counts.node_rows, summary.counts.edge_rows)
        };
        assert_eq!(count(true), count(false));
    }

    #[test]
    fn test_writer_failure_reports_progress_and_position() {
        let session = Session::sha256();
        let err = BulkExporter::new(&session, &ctx(), &ExportConfig::default(), Box::new(BrokenSink))
            .err()
            .unwrap();
        // The scaffold's first edge already fails.
        match err {
            Error::Export { rows, source, .. } => {
                assert_eq!(rows, 3);
                assert!(matches!(*source, Error::Io(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_axiom_is_named_with_position() {
        let session = Session::sha256();
        let exporter =
            BulkExporter::new(&session, &ctx(), &ExportConfig::default(), Box::new(VecSink::default())).unwrap();
        let bad = Axiom::new(AxiomKind::EquivalentClasses([ClassExpression::class("http://x/A")].into()));
        let err = exporter.export_all(&[subclass("http://x/A", "http://x/B"), bad]).unwrap_err();
        assert!(matches!(err, Error::AtPosition { position: 1, .. }));
    }

    #[test]
    fn test_bounded_tracker_still_exports() {
        let session = Session::sha256();
        let config = ExportConfig { tracker: TrackerPolicy::Bounded { capacity: 4 }, ..Default::default() };
        let exporter = BulkExporter::new(&session, &ctx(), &config, Box::new(VecSink::default())).unwrap();
        let axioms: Vec<Axiom> = (0..10).map(|i| subclass(&format!("http://x/C{i}"), "http://x/Top")).collect();
        exporter.export_all(&axioms).unwrap();
        let summary = exporter.finish().unwrap();
        assert!(summary.tracker_evicted);
        assert_eq!(summary.counts.tracked, 4);
    }

    #[test]
    fn test_progress_is_live_and_counts_consumed_input() {
        let session = Session::sha256();
        let exporter =
            BulkExporter::new(&session, &ctx(), &ExportConfig::default(), Box::new(VecSink::default())).unwrap();
        // Project, Branch, document and their two edges.
        assert_eq!(exporter.progress().tracked, 5);
        assert_eq!(exporter.progress().axioms_received, 0);

        exporter.export_axiom(&subclass("http://x/A", "http://x/B")).unwrap();
        let after_one = exporter.progress();
        assert_eq!(after_one.axioms_received, 1);
        assert_eq!(after_one.axioms, 1);
        // Two classes, their IRIs, two ENTITY_IRI and two IN_SIGNATURE edges.
        assert_eq!(after_one.tracked, 13);

        let bad = Axiom::new(AxiomKind::EquivalentClasses([ClassExpression::class("http://x/A")].into()));
        exporter.export_all(&[subclass("http://x/A", "http://x/C"), bad]).unwrap_err();
        let after_bad = exporter.progress();
        assert_eq!(after_bad.axioms_received, 3);
        assert_eq!(after_bad.axioms, 2);
        assert_eq!(after_bad.tracked, 17);

        let summary = exporter.finish().unwrap();
        assert_eq!(summary.counts, after_bad);
    }
}
