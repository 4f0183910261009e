//! Build a [`MappingCollection`] from a mapping source
//!
//! Two sources are supported:
//! - AGP: each sequence-component row maps `component_id:[beg,end]` onto
//!   `object:[beg,end]` with the row's orientation.
//! - GFF3: each feature (optionally of one type) maps its own frame
//!   `ID:[1,len]` onto its location on `seqid`.
//!
//! Malformed rows are logged and skipped. An unreadable or empty source, or
//! one yielding no mappings, is a [`ConfigurationError`].

use crate::core::error::{ConfigurationError, FastRemapError, RecordParseError};
use crate::core::index::MappingCollection;
use crate::core::interval::{Interval, Orientation};
use crate::core::io::{open_reader, ByteLineIterator};
use crate::core::pair::PairMapping;
use crate::formats::agp::AgpRecordView;
use crate::formats::gff::Feature;
use log::{debug, info, warn};
use std::io::BufRead;
use std::path::Path;

/// Mapping source file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingSourceFormat {
    /// Pick from the file name: `.agp` (optionally compressed) is AGP, else GFF3
    #[default]
    Auto,
    Agp,
    Gff,
}

impl MappingSourceFormat {
    /// Parse from string (for CLI argument)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(MappingSourceFormat::Auto),
            "agp" => Some(MappingSourceFormat::Agp),
            "gff" | "gff3" => Some(MappingSourceFormat::Gff),
            _ => None,
        }
    }

    /// Resolve `Auto` against a path
    pub fn resolve(self, path: &Path) -> Self {
        if self != MappingSourceFormat::Auto {
            return self;
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_lowercase();
        let stem = name
            .strip_suffix(".gz")
            .or_else(|| name.strip_suffix(".bz2"))
            .unwrap_or(&name);
        if stem.ends_with(".agp") {
            MappingSourceFormat::Agp
        } else {
            MappingSourceFormat::Gff
        }
    }
}

/// Counters from one build, for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Data rows seen (comments and blank lines excluded)
    pub records: usize,
    /// Rows turned into pair mappings
    pub mappings: usize,
    /// Gap rows, or GFF rows filtered out by type
    pub skipped: usize,
    /// Rows that failed to parse or to form a valid pair
    pub malformed: usize,
}

/// Builds mapping collections from AGP or GFF3 sources
#[derive(Debug, Clone, Default)]
pub struct MappingCollectionBuilder {
    format: MappingSourceFormat,
    feature_type: Option<String>,
    reverse: bool,
}

impl MappingCollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: MappingSourceFormat) -> Self {
        self.format = format;
        self
    }

    /// Restrict GFF3 sources to features of this type
    pub fn feature_type(mut self, feature_type: Option<String>) -> Self {
        self.feature_type = feature_type;
        self
    }

    /// Swap the built collection so queries run assembled -> component
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Build from a file, checking existence, emptiness and the mapping count
    pub fn build_from_file(&self, path: &Path) -> Result<MappingCollection, FastRemapError> {
        if !path.exists() {
            return Err(ConfigurationError::MappingSourceNotFound(path.to_path_buf()).into());
        }
        if std::fs::metadata(path)?.len() == 0 {
            return Err(ConfigurationError::EmptyMappingSource(path.to_path_buf()).into());
        }

        let format = self.format.resolve(path);
        info!("Loading {:?} mapping source: {}", format, path.display());
        let reader = open_reader(path)?;
        self.build_from_reader(reader, format, &path.display().to_string())
    }

    /// Build from any reader; `source_name` is used in errors and logs
    pub fn build_from_reader<R: BufRead>(
        &self,
        reader: R,
        format: MappingSourceFormat,
        source_name: &str,
    ) -> Result<MappingCollection, FastRemapError> {
        let (collection, stats) = match format {
            MappingSourceFormat::Agp => collection_from_agp(reader)?,
            MappingSourceFormat::Gff | MappingSourceFormat::Auto => {
                collection_from_gff(reader, self.feature_type.as_deref())?
            }
        };

        info!(
            "{}: {} records, {} mappings, {} skipped, {} malformed",
            source_name, stats.records, stats.mappings, stats.skipped, stats.malformed
        );

        if collection.is_empty() {
            return Err(ConfigurationError::NoMappings {
                source_name: source_name.to_string(),
            }
            .into());
        }

        if self.reverse {
            debug!("Swapping component and assembled sides");
            Ok(collection.swap())
        } else {
            Ok(collection)
        }
    }
}

/// Collect pair mappings from AGP rows
pub fn collection_from_agp<R: BufRead>(
    reader: R,
) -> Result<(MappingCollection, BuildStats), std::io::Error> {
    let mut collection = MappingCollection::new();
    let mut stats = BuildStats::default();
    let mut lines = ByteLineIterator::new(reader);

    while let Some(next) = lines.next_line() {
        let (line_number, line) = next?;
        if line.is_empty() || line[0] == b'#' {
            continue;
        }
        stats.records += 1;

        let view = match AgpRecordView::parse(line) {
            Ok(view) => view,
            Err(source) => {
                warn!(
                    "{}",
                    RecordParseError::Agp {
                        line: line_number,
                        source
                    }
                );
                stats.malformed += 1;
                continue;
            }
        };
        if !view.is_sequence() {
            stats.skipped += 1;
            continue;
        }

        let pair = Interval::new(
            view.component_id,
            view.component_start,
            view.component_end,
            Orientation::Forward,
        )
        .and_then(|component| {
            Interval::new(view.object, view.object_start, view.object_end, view.orientation)
                .and_then(|assembled| PairMapping::new(component, assembled))
        });
        match pair {
            Ok(pair) => {
                collection.add_mapping(pair);
                stats.mappings += 1;
            }
            Err(e) => {
                warn!("Skipping AGP line {}: {}", line_number, e);
                stats.malformed += 1;
            }
        }
    }

    Ok((collection, stats))
}

/// Collect pair mappings from GFF3 features, optionally of one type
pub fn collection_from_gff<R: BufRead>(
    reader: R,
    feature_type: Option<&str>,
) -> Result<(MappingCollection, BuildStats), std::io::Error> {
    let mut collection = MappingCollection::new();
    let mut stats = BuildStats::default();
    let mut lines = ByteLineIterator::new(reader);

    while let Some(next) = lines.next_line() {
        let (line_number, line) = next?;
        if line.is_empty() {
            continue;
        }
        if line[0] == b'#' {
            if line.starts_with(b"##FASTA") {
                break;
            }
            continue;
        }
        stats.records += 1;

        let feature = match Feature::parse(line) {
            Ok(feature) => feature,
            Err(source) => {
                warn!(
                    "{}",
                    RecordParseError::Gff {
                        line: line_number,
                        source
                    }
                );
                stats.malformed += 1;
                continue;
            }
        };
        if feature_type.is_some_and(|t| t != feature.feature_type) {
            stats.skipped += 1;
            continue;
        }
        let id = match feature.id() {
            Some(id) => id,
            None => {
                warn!(
                    "Skipping GFF line {}: {} feature has no ID",
                    line_number, feature.feature_type
                );
                stats.malformed += 1;
                continue;
            }
        };

        let component = Interval::new_unchecked(id, 1, feature.len(), feature.strand);
        let assembled = Interval::new_unchecked(
            feature.seqname.as_str(),
            feature.start,
            feature.end,
            Orientation::Forward,
        );
        match PairMapping::new(component, assembled) {
            Ok(pair) => {
                collection.add_mapping(pair);
                stats.mappings += 1;
            }
            Err(e) => {
                warn!("Skipping GFF line {}: {}", line_number, e);
                stats.malformed += 1;
            }
        }
    }

    Ok((collection, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGP: &[u8] = b"\
# AGP 2.1
chr1\t1\t1001\t1\tW\tcontig1\t1\t1001\t+
chr1\t1002\t3000\t2\tN\t1999\tscaffold\tyes\tpaired-ends
chr1\t3001\t4001\t3\tW\tcontig2\t1\t1001\t-
chr1\t4002\t4010\t4\tW\tbroken\t1\tten\t+
chr2\t1\t100\t1\tW\tcontig3\t1\t50\t+
";

    const GFF: &[u8] = b"\
##gff-version 3
chr1\t.\tcontig\t1\t1001\t.\t+\t.\tID=contig1
chr1\t.\tcontig\t3001\t4001\t.\t-\t.\tID=contig2
chr1\t.\tgene\t10\t20\t.\t+\t.\tID=gene1
chr1\t.\tcontig\t50\t60\t.\t+\t.\tName=anonymous
##FASTA
>chr1
ACGT
";

    #[test]
    fn test_agp_collection() {
        let (collection, stats) = collection_from_agp(AGP).unwrap();
        assert_eq!(collection.count(), 2);
        assert_eq!(
            stats,
            BuildStats {
                records: 5,
                mappings: 2,
                skipped: 1,
                malformed: 2,
            }
        );
        let pairs = collection.pairs();
        assert_eq!(pairs[1].component().seq_name(), "contig2");
        assert_eq!(pairs[1].assembled().orientation(), Orientation::Reverse);
    }

    #[test]
    fn test_gff_collection_with_type_filter() {
        let (collection, stats) = collection_from_gff(GFF, Some("contig")).unwrap();
        assert_eq!(collection.count(), 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.malformed, 1);

        let pairs = collection.pairs();
        assert_eq!(pairs[0].component().to_string(), "contig1:1-1001(+)");
        assert_eq!(pairs[0].assembled().to_string(), "chr1:1-1001(+)");
        assert_eq!(pairs[1].assembled().to_string(), "chr1:3001-4001(-)");
    }

    #[test]
    fn test_gff_collection_without_filter() {
        let (collection, _) = collection_from_gff(GFF, None).unwrap();
        assert_eq!(collection.count(), 3);
        assert!(collection.has_seq("gene1"));
    }

    #[test]
    fn test_builder_rejects_zero_mappings() {
        let builder = MappingCollectionBuilder::new().feature_type(Some("exon".to_string()));
        let result = builder.build_from_reader(GFF, MappingSourceFormat::Gff, "test.gff");
        assert!(matches!(
            result,
            Err(FastRemapError::Configuration(ConfigurationError::NoMappings { .. }))
        ));
    }

    #[test]
    fn test_builder_reverse_swaps() {
        let collection = MappingCollectionBuilder::new()
            .reverse(true)
            .build_from_reader(AGP, MappingSourceFormat::Agp, "test.agp")
            .unwrap();
        assert!(collection.has_seq("chr1"));
        assert!(!collection.has_seq("contig1"));
    }

    #[test]
    fn test_builder_missing_file() {
        let result = MappingCollectionBuilder::new()
            .build_from_file(Path::new("/nonexistent/assembly.agp"));
        assert!(matches!(
            result,
            Err(FastRemapError::Configuration(ConfigurationError::MappingSourceNotFound(_)))
        ));
    }

    #[test]
    fn test_format_resolution() {
        let auto = MappingSourceFormat::Auto;
        assert_eq!(auto.resolve(Path::new("asm.agp")), MappingSourceFormat::Agp);
        assert_eq!(auto.resolve(Path::new("asm.AGP.gz")), MappingSourceFormat::Agp);
        assert_eq!(auto.resolve(Path::new("contigs.gff3")), MappingSourceFormat::Gff);
        assert_eq!(
            MappingSourceFormat::Agp.resolve(Path::new("contigs.gff3")),
            MappingSourceFormat::Agp
        );
        assert_eq!(MappingSourceFormat::from_str("GFF3"), Some(MappingSourceFormat::Gff));
        assert_eq!(MappingSourceFormat::from_str("bed"), None);
    }
}
