//! FastRemap - remap GFF3 features through AGP or GFF mapping sources
//!
//! Moves features from component coordinates (e.g. contigs) into assembled
//! coordinates (e.g. chromosomes), or back with a swapped collection.
//!
//! # Features
//!
//! - Interval index per component sequence with rust-lapper
//! - Strand-aware linear transforms, including reverse-inserted components
//! - Single-pass streaming with `Parent` pruning for features whose parents failed
//! - Support for compressed inputs (gzip, bzip2)
//!
//! # Example
//!
//! ```ignore
//! use fast_remap::{FeatureReconciler, MappingCollectionBuilder, ReconcileOptions};
//! use std::path::Path;
//!
//! // Build the collection from an AGP file
//! let collection = MappingCollectionBuilder::new()
//!     .build_from_file(Path::new("assembly.agp"))?;
//!
//! // Reconcile a feature stream
//! let mut reconciler = FeatureReconciler::new(&collection, ReconcileOptions::default());
//! let stats = reconciler.run(reader, &mut writer, None)?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    Classification, ConfigurationError, ConversionStats, FailureReport, FastRemapError,
    FeatureReconciler, Interval, MappingCollection, MappingCollectionBuilder, MappingError,
    MappingSourceFormat, Orientation, Outcome, PairMapping, ReconcileOptions, RecordParseError,
    RemapConfig, Segment,
};
pub use crate::formats::{agp, gff};
