//! Single-pass feature reconciliation
//!
//! Streams GFF3 features in input order, maps each location through a
//! [`MappingCollection`] and decides per feature:
//!
//! | Classification | Action |
//! |---|---|
//! | Unmapped | emit unchanged if `pass_through_unmapped`, else drop |
//! | Clean | relocate, record the ID as mapped, prune `Parent` to mapped IDs |
//! | Spanning | record as a failure and drop |
//!
//! Parent pruning relies on parents appearing before their children in the
//! stream. Input order is not validated. A child whose parent comes later
//! loses that `Parent` reference even if the parent maps cleanly afterwards:
//! only IDs already in the mapped set are kept, and an unclassified parent is
//! never assumed to have mapped.
//!
//! Passed-through features are written back exactly as read.

use crate::core::error::{FastRemapError, RecordParseError};
use crate::core::index::MappingCollection;
use crate::core::io::ByteLineIterator;
use crate::core::mapper::Classification;
use crate::formats::gff::Feature;
use log::{debug, info};
use std::collections::{BTreeMap, HashSet};
use std::io::{BufRead, Write};

/// Per-run switches
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Emit features with no overlapping mapping unchanged
    pub pass_through_unmapped: bool,
    /// Log every per-feature decision at info level and list failed IDs
    pub verbose: bool,
}

/// Conversion statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Feature records seen
    pub total: usize,
    /// Clean mappings (emitted, relocated)
    pub mapped: usize,
    /// Unmapped features emitted unchanged
    pub passed_through: usize,
    /// Unmapped features dropped
    pub unmapped: usize,
    /// Spanning features (always dropped)
    pub failed: usize,
    /// Clean features that lost one or more `Parent` references
    pub orphaned: usize,
    /// Comment and directive lines copied through
    pub comments: usize,
}

/// What happened to one feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Mapped cleanly; carries the relocated feature
    Remapped(Feature),
    /// Unmapped and passed through unchanged
    PassedThrough(Feature),
    /// Unmapped and dropped
    Dropped,
    /// Spanning; recorded in the failure log and dropped
    Failed,
}

impl Outcome {
    /// The feature to write, if any
    pub fn emitted(&self) -> Option<&Feature> {
        match self {
            Outcome::Remapped(f) | Outcome::PassedThrough(f) => Some(f),
            Outcome::Dropped | Outcome::Failed => None,
        }
    }
}

/// Cross-feature state for one pass
///
/// Both sets only grow during the pass.
#[derive(Debug, Default)]
pub struct ReconcileState {
    mapped_ids: HashSet<String>,
    failures: BTreeMap<String, Vec<Feature>>,
}

impl ReconcileState {
    /// True if a feature with this ID has mapped cleanly so far
    pub fn is_mapped(&self, id: &str) -> bool {
        self.mapped_ids.contains(id)
    }

    pub fn mapped_count(&self) -> usize {
        self.mapped_ids.len()
    }

    /// Failed features grouped by their original sequence name
    pub fn failures(&self) -> &BTreeMap<String, Vec<Feature>> {
        &self.failures
    }
}

/// Applies a mapping collection to a feature stream
pub struct FeatureReconciler<'a> {
    collection: &'a MappingCollection,
    options: ReconcileOptions,
    state: ReconcileState,
    stats: ConversionStats,
}

impl<'a> FeatureReconciler<'a> {
    pub fn new(collection: &'a MappingCollection, options: ReconcileOptions) -> Self {
        Self {
            collection,
            options,
            state: ReconcileState::default(),
            stats: ConversionStats::default(),
        }
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn state(&self) -> &ReconcileState {
        &self.state
    }

    /// Decide the fate of one feature, updating cross-feature state
    pub fn reconcile(&mut self, mut feature: Feature) -> Outcome {
        self.stats.total += 1;
        let query = feature.location();

        match self.collection.classify(&query) {
            Classification::Unmapped => {
                self.log_decision(&feature, "unmapped");
                if self.options.pass_through_unmapped {
                    self.stats.passed_through += 1;
                    Outcome::PassedThrough(feature)
                } else {
                    self.stats.unmapped += 1;
                    Outcome::Dropped
                }
            }
            Classification::Clean(mapped) => {
                feature.relocate(&mapped);
                if let Some(id) = feature.id() {
                    self.state.mapped_ids.insert(id.to_string());
                }
                self.prune_parents(&mut feature);
                self.stats.mapped += 1;
                Outcome::Remapped(feature)
            }
            Classification::Spanning(segments) => {
                self.log_decision(&feature, "spanning");
                debug!("{} split into {} segments", query, segments.len());
                self.stats.failed += 1;
                self.state
                    .failures
                    .entry(feature.seqname.clone())
                    .or_default()
                    .push(feature);
                Outcome::Failed
            }
        }
    }

    /// Keep only `Parent` references that have already mapped
    fn prune_parents(&mut self, feature: &mut Feature) {
        let parents = feature.parents();
        if parents.is_empty() {
            return;
        }
        let kept: Vec<String> = parents
            .iter()
            .filter(|p| self.state.mapped_ids.contains(p.as_str()))
            .cloned()
            .collect();
        if kept.len() == parents.len() {
            return;
        }

        self.stats.orphaned += 1;
        debug!(
            "{}: dropping unmapped parents, keeping {:?}",
            feature.id().unwrap_or("<no ID>"),
            kept
        );
        if kept.is_empty() {
            feature.attributes.remove("Parent");
        } else {
            feature.attributes.set("Parent", kept);
        }
    }

    fn log_decision(&self, feature: &Feature, what: &str) {
        let id = feature.id().unwrap_or("<no ID>");
        if self.options.verbose {
            info!("{} {}:{}-{} is {}", id, feature.seqname, feature.start, feature.end, what);
        } else {
            debug!("{} {}:{}-{} is {}", id, feature.seqname, feature.start, feature.end, what);
        }
    }

    /// Reconcile a whole GFF3 stream
    ///
    /// Comments and directives are copied through in order, except
    /// `##sequence-region` which describes the old coordinate frame. After
    /// `##FASTA` the remainder is copied verbatim. Spanning features are also
    /// written to `failed` when given. A malformed feature row is fatal.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: &mut W,
        mut failed: Option<&mut dyn Write>,
    ) -> Result<ConversionStats, FastRemapError> {
        let mut lines = ByteLineIterator::new(reader);

        while let Some(next) = lines.next_line() {
            let (line_number, line) = next?;
            if line.is_empty() {
                continue;
            }

            if line[0] == b'#' {
                if line.starts_with(b"##sequence-region") {
                    debug!("Dropping directive at line {}", line_number);
                    continue;
                }
                writer.write_all(line)?;
                writer.write_all(b"\n")?;
                self.stats.comments += 1;
                if line.starts_with(b"##FASTA") {
                    while let Some(rest) = lines.next_line() {
                        let (_, rest) = rest?;
                        writer.write_all(rest)?;
                        writer.write_all(b"\n")?;
                    }
                    break;
                }
                continue;
            }

            let feature = Feature::parse(line).map_err(|source| RecordParseError::Gff {
                line: line_number,
                source,
            })?;

            match self.reconcile(feature) {
                Outcome::Remapped(f) => writeln!(writer, "{}", f)?,
                Outcome::PassedThrough(_) => {
                    writer.write_all(line)?;
                    writer.write_all(b"\n")?;
                }
                Outcome::Failed => {
                    if let Some(sink) = failed.as_deref_mut() {
                        sink.write_all(line)?;
                        sink.write_all(b"\n")?;
                    }
                }
                Outcome::Dropped => {}
            }
        }

        writer.flush()?;
        if let Some(sink) = failed.as_deref_mut() {
            sink.flush()?;
        }
        Ok(self.stats.clone())
    }

    /// Summarise the pass for the diagnostic channel
    pub fn failure_report(&self) -> FailureReport {
        FailureReport::new(&self.stats, &self.state)
    }
}

/// Failed-feature identity in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFeature {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Diagnostic summary of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub mapped: usize,
    pub failed: usize,
    pub passed_through: usize,
    pub unmapped: usize,
    /// Sequence name -> failed features, sorted by sequence name
    pub by_seq: Vec<(String, Vec<FailedFeature>)>,
}

impl FailureReport {
    pub fn new(stats: &ConversionStats, state: &ReconcileState) -> Self {
        let by_seq = state
            .failures
            .iter()
            .map(|(seq, features)| {
                let failed = features
                    .iter()
                    .map(|f| FailedFeature {
                        id: f.id().map(str::to_string),
                        name: f.name().map(str::to_string),
                    })
                    .collect();
                (seq.clone(), failed)
            })
            .collect();
        Self {
            mapped: stats.mapped,
            failed: stats.failed,
            passed_through: stats.passed_through,
            unmapped: stats.unmapped,
            by_seq,
        }
    }

    /// Write the report; `verbose` lists each failed feature's ID and Name
    pub fn write_to<W: Write>(&self, out: &mut W, verbose: bool) -> std::io::Result<()> {
        writeln!(out, "Mapped:          {}", self.mapped)?;
        writeln!(out, "Failed:          {}", self.failed)?;
        writeln!(out, "Passed through:  {}", self.passed_through)?;
        writeln!(out, "Unmapped:        {}", self.unmapped)?;
        for (seq, features) in &self.by_seq {
            writeln!(out, "  {}: {} failed", seq, features.len())?;
            if verbose {
                for f in features {
                    writeln!(
                        out,
                        "    ID={}\tName={}",
                        f.id.as_deref().unwrap_or("."),
                        f.name.as_deref().unwrap_or(".")
                    )?;
                }
            }
        }
        Ok(())
    }
}
