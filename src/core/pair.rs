//! Linear transform between a component range and an assembled range

use crate::core::error::MappingError;
use crate::core::interval::{Interval, Orientation};

/// One component-to-assembled interval correspondence
///
/// The component side is always stored Forward. Any orientation given on the
/// component at construction is folded into the assembled orientation, so
/// `assembled.orientation()` is the relative orientation of the insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairMapping {
    component: Interval,
    assembled: Interval,
}

impl PairMapping {
    /// Build a mapping; both ranges must cover the same number of bases
    pub fn new(component: Interval, assembled: Interval) -> Result<Self, MappingError> {
        if component.len() != assembled.len() {
            return Err(MappingError::LengthMismatch {
                component: component.to_string(),
                component_len: component.len(),
                assembled: assembled.to_string(),
                assembled_len: assembled.len(),
            });
        }
        let relative = component.orientation().combine(assembled.orientation());
        Ok(Self {
            component: component.with_orientation(Orientation::Forward),
            assembled: assembled.with_orientation(relative),
        })
    }

    pub fn component(&self) -> &Interval {
        &self.component
    }

    pub fn assembled(&self) -> &Interval {
        &self.assembled
    }

    /// Exchange component and assembled sides
    ///
    /// The relative orientation of a reversed insertion is reversed in both
    /// directions, so it carries over unchanged.
    pub fn inverse(&self) -> Self {
        Self {
            component: self.assembled.with_orientation(Orientation::Forward),
            assembled: self
                .component
                .with_orientation(self.assembled.orientation()),
        }
    }

    /// Transform a sub-range of the component into assembled coordinates
    ///
    /// `query` must lie within `self.component()`; the caller clips first.
    /// Unknown relative orientation uses forward arithmetic.
    pub fn transform(&self, query: &Interval) -> Interval {
        debug_assert!(self.component.contains(&query.with_orientation(Orientation::Forward)));
        let off0 = query.start() - self.component.start();
        let off1 = query.end() - self.component.start();
        let (start, end) = match self.assembled.orientation() {
            Orientation::Reverse => (self.assembled.end() - off1, self.assembled.end() - off0),
            Orientation::Forward | Orientation::Unknown => {
                (self.assembled.start() + off0, self.assembled.start() + off1)
            }
        };
        let orientation = query.orientation().combine(self.assembled.orientation());
        Interval::new_unchecked(self.assembled.seq_name(), start, end, orientation)
    }
}

impl std::fmt::Display for PairMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.component, self.assembled)
    }
}
