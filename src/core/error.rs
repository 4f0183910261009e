//! Error types for FastRemap
//!
//! Defines all error types used throughout the library.

use crate::formats::agp::AgpParseError;
use crate::formats::gff::GffParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FastRemap operations
#[derive(Debug, Error)]
pub enum FastRemapError {
    /// Fatal setup problems, raised before any feature is processed
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed record in the feature stream
    #[error("Parse error: {0}")]
    RecordParse(#[from] RecordParseError),

    /// Invalid interval or pair construction
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with the run configuration or the mapping source as a whole
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No mapping source was given
    #[error("No mapping source provided")]
    MissingMappingSource,

    /// Mapping source path does not exist
    #[error("Mapping source not found: {0}")]
    MappingSourceNotFound(PathBuf),

    /// Mapping source exists but has no content
    #[error("Mapping source is empty: {0}")]
    EmptyMappingSource(PathBuf),

    /// Mapping source produced zero pair mappings after filtering
    #[error("No usable mappings found in {source_name}")]
    NoMappings { source_name: String },

    /// No feature stream was given
    #[error("No input feature stream provided")]
    MissingInput,

    /// Feature input path does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),
}

/// A malformed row in one of the record streams
#[derive(Debug, Error)]
pub enum RecordParseError {
    /// Invalid AGP row
    #[error("Invalid AGP record at line {line}: {source}")]
    Agp { line: usize, source: AgpParseError },

    /// Invalid GFF3 row
    #[error("Invalid GFF record at line {line}: {source}")]
    Gff { line: usize, source: GffParseError },
}

/// Errors building intervals and pair mappings
#[derive(Debug, Error)]
pub enum MappingError {
    /// Invalid coordinate range
    #[error("Invalid coordinate range: start ({start}) > end ({end})")]
    InvalidRange { start: u64, end: u64 },

    /// Coordinate too large to index
    #[error("Coordinate out of range: {0}")]
    CoordinateOutOfRange(u64),

    /// Component and assembled ranges differ in length
    #[error("Length mismatch: {component} ({component_len} bp) vs {assembled} ({assembled_len} bp)")]
    LengthMismatch {
        component: String,
        component_len: u64,
        assembled: String,
        assembled_len: u64,
    },
}

/// Result type alias for FastRemap operations
pub type Result<T> = std::result::Result<T, FastRemapError>;
