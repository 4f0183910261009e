//! Coordinate mapping algorithm
//!
//! Maps a query interval through a [`MappingCollection`]:
//! 1. Query the index for pairs whose component range overlaps the query
//! 2. Clip each pair to the query, later pairs overriding earlier ones
//! 3. Transform each clipped piece through its pair
//! 4. Fill the uncovered parts of the query with gaps
//!
//! The returned segments are in query order and their union is exactly the
//! query range.

use crate::core::index::MappingCollection;
use crate::core::interval::{intersect_closed, Interval};
use crate::core::pair::PairMapping;

/// One piece of a mapped query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// No mapping covers this part of the query
    Gap(Interval),
    /// This part of the query mapped through a single pair
    Match {
        /// Sub-range of the query that was mapped
        query: Interval,
        /// Where it lands in assembled coordinates
        mapped: Interval,
    },
}

impl Segment {
    /// The part of the query this segment covers
    pub fn query_range(&self) -> &Interval {
        match self {
            Segment::Gap(range) => range,
            Segment::Match { query, .. } => query,
        }
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, Segment::Gap(_))
    }
}

/// Outcome of mapping one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Nothing on the query's sequence overlaps it
    Unmapped,
    /// One pair fully contains the query; carries the mapped range
    Clean(Interval),
    /// Partial overlap, multiple pairs, or a mapped/unmapped boundary
    Spanning(Vec<Segment>),
}

impl Classification {
    /// Classify a segment list produced by [`MappingCollection::map`]
    ///
    /// Exactly one gap is Unmapped, exactly one match is Clean, anything
    /// else is Spanning.
    pub fn of(mut segments: Vec<Segment>) -> Self {
        if segments.len() == 1 {
            match segments.pop() {
                Some(Segment::Gap(_)) => return Classification::Unmapped,
                Some(Segment::Match { mapped, .. }) => return Classification::Clean(mapped),
                None => {}
            }
        }
        Classification::Spanning(segments)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Unmapped => "unmapped",
            Classification::Clean(_) => "clean",
            Classification::Spanning(_) => "spanning",
        }
    }
}

impl MappingCollection {
    /// Map a query interval into assembled coordinates
    ///
    /// Pure function of the collection; see the module docs for ordering
    /// and coverage guarantees.
    pub fn map(&self, query: &Interval) -> Vec<Segment> {
        let mut hits = self.query(query.seq_name(), query.start(), query.end());
        if hits.is_empty() {
            return vec![Segment::Gap(query.clone())];
        }
        hits.sort_by_key(|hit| hit.order);

        // Disjoint covered pieces of the query, painted in insertion order
        let mut pieces: Vec<(u64, u64, &PairMapping)> = Vec::with_capacity(hits.len());
        for hit in hits {
            let component = hit.pair.component();
            let (start, end) = match intersect_closed(
                query.start(),
                query.end(),
                component.start(),
                component.end(),
            ) {
                Some(clip) => clip,
                None => continue,
            };

            let mut painted = Vec::with_capacity(pieces.len() + 2);
            for (ps, pe, p) in pieces {
                if pe < start || ps > end {
                    painted.push((ps, pe, p));
                    continue;
                }
                if ps < start {
                    painted.push((ps, start - 1, p));
                }
                if pe > end {
                    painted.push((end + 1, pe, p));
                }
            }
            painted.push((start, end, &hit.pair));
            pieces = painted;
        }
        pieces.sort_by_key(|&(start, _, _)| start);

        let mut segments = Vec::with_capacity(pieces.len() * 2 + 1);
        let mut cursor = query.start();
        for (start, end, pair) in pieces {
            if start > cursor {
                segments.push(Segment::Gap(query.sub_range(cursor, start - 1)));
            }
            let part = query.sub_range(start, end);
            let mapped = pair.transform(&part);
            segments.push(Segment::Match { query: part, mapped });
            cursor = end + 1;
        }
        if cursor <= query.end() {
            segments.push(Segment::Gap(query.sub_range(cursor, query.end())));
        }

        segments
    }

    /// Map and classify in one step
    pub fn classify(&self, query: &Interval) -> Classification {
        Classification::of(self.map(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interval::Orientation;

    fn iv(name: &str, start: u64, end: u64, o: Orientation) -> Interval {
        Interval::new(name, start, end, o).unwrap()
    }

    fn pair(c: (&str, u64, u64), a: (&str, u64, u64), o: Orientation) -> PairMapping {
        PairMapping::new(
            iv(c.0, c.1, c.2, Orientation::Forward),
            iv(a.0, a.1, a.2, o),
        )
        .unwrap()
    }

    fn create_test_collection() -> MappingCollection {
        let mut collection = MappingCollection::new();
        collection.add_mapping(pair(("contig1", 1, 1001), ("chr1", 1, 1001), Orientation::Forward));
        collection.add_mapping(pair(("S", 1, 1001), ("T", 3001, 4001), Orientation::Reverse));
        collection.add_mapping(pair(("ctg", 101, 200), ("chr2", 1, 100), Orientation::Forward));
        collection.add_mapping(pair(("ctg", 301, 400), ("chr2", 201, 300), Orientation::Forward));
        collection
    }

    #[test]
    fn test_map_clean_forward() {
        let collection = create_test_collection();
        let segments = collection.map(&iv("contig1", 401, 901, Orientation::Forward));
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0],
            Segment::Match {
                query: iv("contig1", 401, 901, Orientation::Forward),
                mapped: iv("chr1", 401, 901, Orientation::Forward),
            }
        );
    }

    #[test]
    fn test_map_clean_reverse() {
        let collection = create_test_collection();
        let result = collection.classify(&iv("S", 1, 501, Orientation::Forward));
        assert_eq!(result, Classification::Clean(iv("T", 3501, 4001, Orientation::Reverse)));
    }

    #[test]
    fn test_map_exact_boundary_is_clean() {
        let collection = create_test_collection();
        let result = collection.classify(&iv("ctg", 101, 200, Orientation::Forward));
        assert_eq!(result, Classification::Clean(iv("chr2", 1, 100, Orientation::Forward)));
    }

    #[test]
    fn test_map_unknown_seq_is_single_gap() {
        let collection = create_test_collection();
        let query = iv("nowhere", 5, 50, Orientation::Forward);
        assert_eq!(collection.map(&query), vec![Segment::Gap(query.clone())]);
        assert_eq!(collection.classify(&query), Classification::Unmapped);
    }

    #[test]
    fn test_map_no_overlap_is_single_gap() {
        let collection = create_test_collection();
        let query = iv("ctg", 201, 300, Orientation::Forward);
        assert_eq!(collection.map(&query), vec![Segment::Gap(query.clone())]);
    }

    #[test]
    fn test_map_partial_overlap() {
        let collection = create_test_collection();
        let segments = collection.map(&iv("ctg", 51, 150, Orientation::Forward));
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::Gap(iv("ctg", 51, 100, Orientation::Forward)));
        assert_eq!(
            segments[1],
            Segment::Match {
                query: iv("ctg", 101, 150, Orientation::Forward),
                mapped: iv("chr2", 1, 50, Orientation::Forward),
            }
        );
        assert!(matches!(
            Classification::of(segments),
            Classification::Spanning(_)
        ));
    }

    #[test]
    fn test_map_across_two_pairs() {
        let collection = create_test_collection();
        let segments = collection.map(&iv("ctg", 150, 350, Orientation::Forward));
        let kinds: Vec<bool> = segments.iter().map(|s| s.is_gap()).collect();
        assert_eq!(kinds, vec![false, true, false]);
        assert_eq!(segments[1].query_range(), &iv("ctg", 201, 300, Orientation::Forward));
    }

    #[test]
    fn test_map_overlapping_pairs_last_wins() {
        let mut collection = MappingCollection::new();
        collection.add_mapping(pair(("c", 1, 100), ("a", 1, 100), Orientation::Forward));
        collection.add_mapping(pair(("c", 41, 60), ("b", 1, 20), Orientation::Forward));

        let inner = collection.classify(&iv("c", 45, 55, Orientation::Forward));
        assert_eq!(inner, Classification::Clean(iv("b", 5, 15, Orientation::Forward)));

        let segments = collection.map(&iv("c", 1, 100, Orientation::Forward));
        let targets: Vec<&str> = segments
            .iter()
            .map(|s| match s {
                Segment::Match { mapped, .. } => mapped.seq_name(),
                Segment::Gap(_) => "-",
            })
            .collect();
        assert_eq!(targets, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_segments_cover_query() {
        let collection = create_test_collection();
        let query = iv("ctg", 1, 500, Orientation::Reverse);
        let segments = collection.map(&query);
        let mut cursor = query.start();
        for segment in &segments {
            assert_eq!(segment.query_range().start(), cursor);
            cursor = segment.query_range().end() + 1;
        }
        assert_eq!(cursor, query.end() + 1);
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::Unmapped.label(), "unmapped");
        assert_eq!(Classification::Spanning(vec![]).label(), "spanning");
    }
}
