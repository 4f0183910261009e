//! Interval index of pair mappings
//!
//! Uses rust-lapper for O(log n + k) overlap queries per component sequence.

use crate::core::pair::PairMapping;
use rust_lapper::{Interval, Lapper};
use std::collections::HashMap;

/// Value stored in each lapper interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedPair {
    /// Insertion order across the whole collection; later wins on overlap
    pub order: usize,
    pub pair: PairMapping,
}

/// Type alias for indexed intervals (half-open `[start, end + 1)`)
pub type PairInterval = Interval<u64, IndexedPair>;

/// Pair mappings organised by component sequence name
///
/// Built once, then read-only while features are reconciled.
#[derive(Default)]
pub struct MappingCollection {
    /// Component sequence -> interval tree
    maps: HashMap<String, Lapper<u64, IndexedPair>>,
    /// Number of pair mappings added so far
    count: usize,
}

impl MappingCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from pairs in the given order
    pub fn from_pairs<I: IntoIterator<Item = PairMapping>>(pairs: I) -> Self {
        let mut by_seq: HashMap<String, Vec<PairInterval>> = HashMap::new();
        let mut count = 0;

        for pair in pairs {
            let interval = to_lapper_interval(count, pair);
            by_seq
                .entry(interval.val.pair.component().seq_name().to_string())
                .or_default()
                .push(interval);
            count += 1;
        }

        let maps = by_seq
            .into_iter()
            .map(|(seq, intervals)| (seq, Lapper::new(intervals)))
            .collect();

        Self { maps, count }
    }

    /// Add one pair mapping
    ///
    /// No overlap check is made here; overlapping component ranges resolve
    /// to the most recently added pair at query time.
    pub fn add_mapping(&mut self, pair: PairMapping) {
        let interval = to_lapper_interval(self.count, pair);
        let seq = interval.val.pair.component().seq_name().to_string();
        match self.maps.get_mut(&seq) {
            Some(lapper) => lapper.insert(interval),
            None => {
                self.maps.insert(seq, Lapper::new(vec![interval]));
            }
        }
        self.count += 1;
    }

    /// Number of pair mappings held
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Intervals on `seq` overlapping the closed range `[start, end]`
    pub fn query(&self, seq: &str, start: u64, end: u64) -> Vec<&IndexedPair> {
        match self.maps.get(seq) {
            Some(lapper) => lapper.find(start, end + 1).map(|iv| &iv.val).collect(),
            None => vec![],
        }
    }

    /// Check if any pair has `seq` as its component sequence
    pub fn has_seq(&self, seq: &str) -> bool {
        self.maps.contains_key(seq)
    }

    /// Get all component sequence names
    pub fn component_seqs(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|s| s.as_str())
    }

    /// Get the number of pairs for a component sequence
    pub fn pair_count(&self, seq: &str) -> usize {
        self.maps.get(seq).map(|l| l.len()).unwrap_or(0)
    }

    /// All pairs in insertion order
    pub fn pairs(&self) -> Vec<&PairMapping> {
        let mut indexed: Vec<&IndexedPair> = self
            .maps
            .values()
            .flat_map(|l| l.iter().map(|iv| &iv.val))
            .collect();
        indexed.sort_by_key(|ip| ip.order);
        indexed.into_iter().map(|ip| &ip.pair).collect()
    }

    /// Exchange component and assembled sides of every pair
    ///
    /// The result answers queries in the opposite direction; insertion order
    /// is preserved.
    pub fn swap(&self) -> Self {
        Self::from_pairs(self.pairs().into_iter().map(|p| p.inverse()))
    }
}

fn to_lapper_interval(order: usize, pair: PairMapping) -> PairInterval {
    Interval {
        start: pair.component().start(),
        stop: pair.component().end() + 1,
        val: IndexedPair { order, pair },
    }
}
