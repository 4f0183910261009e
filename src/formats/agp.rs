//! AGP format adapter
//!
//! AGP rows describe how component sequences are placed in an assembled
//! object. Coordinates are 1-based, closed.
//!
//! ```text
//! object  obj_beg  obj_end  part_number  component_type  component_id  component_beg  component_end  orientation
//! ```
//!
//! Gap rows (`N`, `U`) reuse columns 6-9 for gap length, type and linkage.

use crate::core::{Orientation, MAX_COORDINATE};
use memchr::memchr_iter;

/// AGP parse error
#[derive(Debug, Clone)]
pub enum AgpParseError {
    EmptyLine,
    TooFewFields { expected: usize, found: usize },
    InvalidUtf8(&'static str),
    InvalidNumber(&'static str, String),
    CoordinateOutOfRange(&'static str, u64),
}

impl std::fmt::Display for AgpParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgpParseError::EmptyLine => write!(f, "Empty line"),
            AgpParseError::TooFewFields { expected, found } => {
                write!(f, "Too few fields: expected {}, found {}", expected, found)
            }
            AgpParseError::InvalidUtf8(field) => write!(f, "Invalid UTF-8 in field: {}", field),
            AgpParseError::InvalidNumber(field, value) => {
                write!(f, "Invalid number in field {}: {}", field, value)
            }
            AgpParseError::CoordinateOutOfRange(field, value) => {
                write!(f, "Coordinate out of range in field {}: {}", field, value)
            }
        }
    }
}

impl std::error::Error for AgpParseError {}

/// Placement kind from the component_type column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A real sequence: A, D, F, G, O, P, W
    Sequence,
    /// A gap: N (known length) or U (unknown length)
    Gap,
}

impl ComponentKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" | "D" | "F" | "G" | "O" | "P" | "W" => Some(ComponentKind::Sequence),
            "N" | "U" => Some(ComponentKind::Gap),
            _ => None,
        }
    }
}

/// Zero-copy AGP row view
pub struct AgpRecordView<'a> {
    pub object: &'a str,
    pub object_start: u64,
    pub object_end: u64,
    pub part_number: &'a str,
    /// None for unrecognised component types
    pub kind: Option<ComponentKind>,
    pub component_type: &'a str,
    pub component_id: &'a str,
    /// Component coordinates; only parsed for sequence rows
    pub component_start: u64,
    pub component_end: u64,
    /// `+`/`-`; anything else reads as Forward
    pub orientation: Orientation,
}

impl<'a> AgpRecordView<'a> {
    /// Parse an AGP row
    pub fn parse(line: &'a [u8]) -> Result<Self, AgpParseError> {
        if line.is_empty() {
            return Err(AgpParseError::EmptyLine);
        }

        let mut field_bounds = Vec::with_capacity(9);
        let mut start_pos = 0;
        for tab_pos in memchr_iter(b'\t', line) {
            field_bounds.push((start_pos, tab_pos));
            start_pos = tab_pos + 1;
        }
        field_bounds.push((start_pos, line.len()));

        // Gap rows may omit the ninth column in older AGP versions
        if field_bounds.len() < 8 {
            return Err(AgpParseError::TooFewFields {
                expected: 9,
                found: field_bounds.len(),
            });
        }

        let get_field = |idx: usize, name: &'static str| -> Result<&'a str, AgpParseError> {
            match field_bounds.get(idx) {
                Some(&(start, end)) => std::str::from_utf8(&line[start..end])
                    .map(str::trim)
                    .map_err(|_| AgpParseError::InvalidUtf8(name)),
                None => Ok(""),
            }
        };
        let get_number = |idx: usize, name: &'static str| -> Result<u64, AgpParseError> {
            let value = get_field(idx, name)?;
            let number: u64 = value
                .parse()
                .map_err(|_| AgpParseError::InvalidNumber(name, value.to_string()))?;
            if number > MAX_COORDINATE {
                return Err(AgpParseError::CoordinateOutOfRange(name, number));
            }
            Ok(number)
        };

        let object = get_field(0, "object")?;
        let object_start = get_number(1, "object_beg")?;
        let object_end = get_number(2, "object_end")?;
        let part_number = get_field(3, "part_number")?;
        let component_type = get_field(4, "component_type")?;
        let kind = ComponentKind::from_code(component_type);
        let component_id = get_field(5, "component_id")?;

        let (component_start, component_end, orientation) = if kind == Some(ComponentKind::Sequence) {
            if field_bounds.len() < 9 {
                return Err(AgpParseError::TooFewFields {
                    expected: 9,
                    found: field_bounds.len(),
                });
            }
            let orientation = match get_field(8, "orientation")? {
                "-" => Orientation::Reverse,
                _ => Orientation::Forward,
            };
            (
                get_number(6, "component_beg")?,
                get_number(7, "component_end")?,
                orientation,
            )
        } else {
            (0, 0, Orientation::Forward)
        };

        Ok(Self {
            object,
            object_start,
            object_end,
            part_number,
            kind,
            component_type,
            component_id,
            component_start,
            component_end,
            orientation,
        })
    }

    /// True for rows that place a real sequence component
    pub fn is_sequence(&self) -> bool {
        self.kind == Some(ComponentKind::Sequence)
    }
}
