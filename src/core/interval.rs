//! Named-sequence intervals with orientation
//!
//! All coordinates are 1-based and closed: `[start, end]`.

use crate::core::error::MappingError;

/// Largest accepted coordinate; closed ends are stored as `end + 1`
pub const MAX_COORDINATE: u64 = u64::MAX - 1;

/// Orientation of an interval relative to its sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Orientation {
    #[default]
    Forward,
    Reverse,
    Unknown,
}

impl Orientation {
    /// Get the opposite orientation (Unknown stays Unknown)
    ///
    /// # Examples
    /// ```
    /// use fast_remap::core::Orientation;
    /// assert_eq!(Orientation::Forward.flip(), Orientation::Reverse);
    /// assert_eq!(Orientation::Reverse.flip(), Orientation::Forward);
    /// assert_eq!(Orientation::Unknown.flip(), Orientation::Unknown);
    /// ```
    pub fn flip(&self) -> Self {
        match self {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
            Orientation::Unknown => Orientation::Unknown,
        }
    }

    /// Combine a query orientation with a mapping orientation
    ///
    /// - Forward + Forward = Forward
    /// - Forward + Reverse = Reverse
    /// - Reverse + Reverse = Forward
    /// - Unknown + anything = Unknown
    ///
    /// # Examples
    /// ```
    /// use fast_remap::core::Orientation;
    /// assert_eq!(Orientation::Forward.combine(Orientation::Reverse), Orientation::Reverse);
    /// assert_eq!(Orientation::Reverse.combine(Orientation::Reverse), Orientation::Forward);
    /// assert_eq!(Orientation::Unknown.combine(Orientation::Forward), Orientation::Unknown);
    /// ```
    pub fn combine(&self, other: Orientation) -> Orientation {
        match (self, other) {
            (Orientation::Unknown, _) | (_, Orientation::Unknown) => Orientation::Unknown,
            (Orientation::Forward, o) => o,
            (Orientation::Reverse, o) => o.flip(),
        }
    }

    /// Parse a GFF strand / AGP orientation symbol
    ///
    /// `.` and `?` both read as Unknown.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Orientation::Forward),
            "-" => Some(Orientation::Reverse),
            "." | "?" => Some(Orientation::Unknown),
            _ => None,
        }
    }

    /// Output symbol in the GFF3 strand column
    pub fn to_char(&self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
            Orientation::Unknown => '.',
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A closed range on a named sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    seq_name: String,
    start: u64,
    end: u64,
    orientation: Orientation,
}

impl Interval {
    /// Create an interval, rejecting `start > end` and ends past [`MAX_COORDINATE`]
    pub fn new(
        seq_name: impl Into<String>,
        start: u64,
        end: u64,
        orientation: Orientation,
    ) -> Result<Self, MappingError> {
        if start > end {
            return Err(MappingError::InvalidRange { start, end });
        }
        if end > MAX_COORDINATE {
            return Err(MappingError::CoordinateOutOfRange(end));
        }
        Ok(Self {
            seq_name: seq_name.into(),
            start,
            end,
            orientation,
        })
    }

    /// Create an interval whose ordering the caller has already established
    pub(crate) fn new_unchecked(
        seq_name: impl Into<String>,
        start: u64,
        end: u64,
        orientation: Orientation,
    ) -> Self {
        debug_assert!(start <= end);
        Self {
            seq_name: seq_name.into(),
            start,
            end,
            orientation,
        }
    }

    pub fn seq_name(&self) -> &str {
        &self.seq_name
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of bases covered (`end - start + 1`)
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false; a closed interval covers at least one base
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if `other` lies entirely within this interval on the same sequence
    pub fn contains(&self, other: &Interval) -> bool {
        self.seq_name == other.seq_name && self.start <= other.start && other.end <= self.end
    }

    /// Same range with a different orientation
    pub fn with_orientation(&self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..self.clone()
        }
    }

    /// Sub-range `[start, end]` on the same sequence, keeping orientation
    pub(crate) fn sub_range(&self, start: u64, end: u64) -> Self {
        debug_assert!(self.start <= start && start <= end && end <= self.end);
        Self {
            seq_name: self.seq_name.clone(),
            start,
            end,
            orientation: self.orientation,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}({})", self.seq_name, self.start, self.end, self.orientation)
    }
}

/// Compute the intersection of two closed ranges
///
/// # Examples
/// ```
/// use fast_remap::core::intersect_closed;
/// assert_eq!(intersect_closed(1, 100, 50, 150), Some((50, 100)));
/// assert_eq!(intersect_closed(1, 50, 50, 100), Some((50, 50)));
/// assert_eq!(intersect_closed(1, 49, 50, 100), None);
/// ```
#[inline]
pub fn intersect_closed(start1: u64, end1: u64, start2: u64, end2: u64) -> Option<(u64, u64)> {
    if start1 > end2 || end1 < start2 {
        return None;
    }
    Some((start1.max(start2), end1.min(end2)))
}
