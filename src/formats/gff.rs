//! GFF3 format adapter
//!
//! Zero-copy parsing of GFF3 rows, plus an owned [`Feature`] that the
//! reconciler mutates and writes back out.
//! GFF uses 1-based, closed coordinates.

use crate::core::{Interval, Orientation, MAX_COORDINATE};
use memchr::memchr_iter;
use std::fmt;

/// GFF parse error
#[derive(Debug, Clone)]
pub enum GffParseError {
    EmptyLine,
    TooFewFields { expected: usize, found: usize },
    InvalidUtf8(&'static str),
    InvalidNumber(&'static str, String),
    InvalidStrand(String),
    InvalidRange { start: u64, end: u64 },
    CoordinateOutOfRange(u64),
}

impl fmt::Display for GffParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GffParseError::EmptyLine => write!(f, "Empty line"),
            GffParseError::TooFewFields { expected, found } => {
                write!(f, "Too few fields: expected {}, found {}", expected, found)
            }
            GffParseError::InvalidUtf8(field) => write!(f, "Invalid UTF-8 in field: {}", field),
            GffParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
            GffParseError::InvalidStrand(s) => write!(f, "Invalid strand: {}", s),
            GffParseError::InvalidRange { start, end } => {
                write!(f, "Start ({}) greater than end ({})", start, end)
            }
            GffParseError::CoordinateOutOfRange(value) => {
                write!(f, "Coordinate out of range: {}", value)
            }
        }
    }
}

impl std::error::Error for GffParseError {}

/// Zero-copy GFF3 record view for parsing
/// GFF format: seqid, source, type, start, end, score, strand, phase, attributes
pub struct GffRecordView<'a> {
    /// Sequence name
    pub seqname: &'a str,
    /// Source field
    pub source: &'a str,
    /// Feature type
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Score field (as string, may be ".")
    pub score: &'a str,
    /// Strand
    pub strand: Orientation,
    /// Phase field
    pub phase: &'a str,
    /// Attributes field
    pub attributes: &'a str,
}

impl<'a> GffRecordView<'a> {
    /// Parse a GFF3 line with minimal allocation
    /// GFF has exactly 9 tab-separated fields
    pub fn parse(line: &'a [u8]) -> Result<Self, GffParseError> {
        if line.is_empty() {
            return Err(GffParseError::EmptyLine);
        }

        let mut field_bounds = Vec::with_capacity(9);
        let mut start_pos = 0;
        for tab_pos in memchr_iter(b'\t', line) {
            field_bounds.push((start_pos, tab_pos));
            start_pos = tab_pos + 1;
        }
        field_bounds.push((start_pos, line.len()));

        if field_bounds.len() < 9 {
            return Err(GffParseError::TooFewFields {
                expected: 9,
                found: field_bounds.len(),
            });
        }

        let get_field = |idx: usize, name: &'static str| -> Result<&'a str, GffParseError> {
            let (start, end) = field_bounds[idx];
            std::str::from_utf8(&line[start..end]).map_err(|_| GffParseError::InvalidUtf8(name))
        };

        let seqname = get_field(0, "seqid")?;
        let source = get_field(1, "source")?;
        let feature = get_field(2, "type")?;

        let start_str = get_field(3, "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("start", start_str.to_string()))?;

        let end_str = get_field(4, "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| GffParseError::InvalidNumber("end", end_str.to_string()))?;

        if start > end {
            return Err(GffParseError::InvalidRange { start, end });
        }
        if end > MAX_COORDINATE {
            return Err(GffParseError::CoordinateOutOfRange(end));
        }

        let score = get_field(5, "score")?;
        let strand_str = get_field(6, "strand")?;
        let strand = Orientation::from_symbol(strand_str)
            .ok_or_else(|| GffParseError::InvalidStrand(strand_str.to_string()))?;
        let phase = get_field(7, "phase")?;
        // Trailing carriage returns and spaces are not part of the attributes
        let attributes = get_field(8, "attributes")?.trim_end();

        Ok(Self {
            seqname,
            source,
            feature,
            start,
            end,
            score,
            strand,
            phase,
            attributes,
        })
    }

    /// Get the feature size (end - start + 1 for 1-based coordinates)
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// GFF3 attribute column, kept in original key order
///
/// Values are stored as written; no percent-decoding is applied so that
/// untouched features serialise unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, Vec<String>)>,
}

impl Attributes {
    /// Parse `key=v1,v2;key2=v3`; `.` or an empty column gives no attributes
    pub fn parse(column: &str) -> Self {
        let column = column.trim();
        if column.is_empty() || column == "." {
            return Self::default();
        }
        let entries = column
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (
                    key.to_string(),
                    value.split(',').map(str::to_string).collect(),
                ),
                None => (part.to_string(), Vec::new()),
            })
            .collect();
        Self { entries }
    }

    /// All values for `key`
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value for `key`
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Replace the values for `key`, appending the key if it is new
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key.to_string(), values)),
        }
    }

    /// Delete `key` entirely
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, ".");
        }
        for (i, (key, values)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            if values.is_empty() {
                write!(f, "{}", key)?;
            } else {
                write!(f, "{}={}", key, values.join(","))?;
            }
        }
        Ok(())
    }
}

/// Owned GFF3 feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub seqname: String,
    pub source: String,
    pub feature_type: String,
    pub start: u64,
    pub end: u64,
    pub score: String,
    pub strand: Orientation,
    pub phase: String,
    pub attributes: Attributes,
}

impl Feature {
    /// Parse one GFF3 data line into an owned feature
    pub fn parse(line: &[u8]) -> Result<Self, GffParseError> {
        GffRecordView::parse(line).map(Self::from)
    }

    /// The `ID` attribute, if present
    pub fn id(&self) -> Option<&str> {
        self.attributes.first("ID")
    }

    /// The `Name` attribute, if present
    pub fn name(&self) -> Option<&str> {
        self.attributes.first("Name")
    }

    /// All `Parent` references
    pub fn parents(&self) -> &[String] {
        self.attributes.get("Parent").unwrap_or(&[])
    }

    /// Feature length in bases
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false; GFF features cover at least one base
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The feature's own location as a query interval
    pub fn location(&self) -> Interval {
        Interval::new_unchecked(self.seqname.clone(), self.start, self.end, self.strand)
    }

    /// Move the feature to a new location
    pub fn relocate(&mut self, location: &Interval) {
        self.seqname = location.seq_name().to_string();
        self.start = location.start();
        self.end = location.end();
        self.strand = location.orientation();
    }
}

impl<'a> From<GffRecordView<'a>> for Feature {
    fn from(view: GffRecordView<'a>) -> Self {
        Self {
            seqname: view.seqname.to_string(),
            source: view.source.to_string(),
            feature_type: view.feature.to_string(),
            start: view.start,
            end: view.end,
            score: view.score.to_string(),
            strand: view.strand,
            phase: view.phase.to_string(),
            attributes: Attributes::parse(view.attributes),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqname,
            self.source,
            self.feature_type,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.phase,
            self.attributes
        )
    }
}
