//! Core coordinate mapping functionality
//!
//! This module contains the interval model, the pair-mapping index,
//! the mapping-source builders, and the streaming feature reconciler.

pub mod builder;
pub mod config;
mod error;
mod index;
mod interval;
pub mod io;
mod mapper;
mod pair;
pub mod reconcile;

pub use builder::{
    collection_from_agp, collection_from_gff, BuildStats, MappingCollectionBuilder,
    MappingSourceFormat,
};
pub use config::{run, RemapConfig};
pub use error::{
    ConfigurationError, FastRemapError, MappingError, RecordParseError, Result,
};
pub use index::{IndexedPair, MappingCollection, PairInterval};
pub use interval::{intersect_closed, Interval, Orientation, MAX_COORDINATE};
pub use io::{ByteLineIterator, CompressionFormat, DEFAULT_BUFFER_SIZE};
pub use mapper::{Classification, Segment};
pub use pair::PairMapping;
pub use reconcile::{
    ConversionStats, FailedFeature, FailureReport, FeatureReconciler, Outcome, ReconcileOptions,
    ReconcileState,
};
