//! File format adapters
//!
//! Adapters for the mapping-source (AGP, GFF3) and feature (GFF3) formats.

pub mod agp;
pub mod gff;

pub use agp::{AgpParseError, AgpRecordView, ComponentKind};
pub use gff::{Attributes, Feature, GffParseError, GffRecordView};
