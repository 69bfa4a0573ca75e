//! Pairwise overlap detection between calendars.
//!
//! For every unordered pair of calendar positions `(i, j)` with `i < j`, every event of
//! calendar `i` is compared against every event of calendar `j`. Adjacent events (where
//! one ends exactly when another starts) do NOT overlap.
//!
//! The same routine runs on original calendars and on the pseudo-calendars built from
//! a previous overlap level (see [`crate::merger`]).

use crate::event::Event;

/// The intersections found between the calendars at positions `left` and `right`.
#[derive(Debug, Clone, PartialEq)]
pub struct PairOverlap {
    pub left: usize,
    pub right: usize,
    /// Intersection events, in calendar-`left` order then calendar-`right` order.
    pub events: Vec<Event>,
}

/// Intersect every event of `events_a` with every event of `events_b`.
///
/// Two events overlap when `a.start < b.end && b.start < a.end`; the result holds
/// `[max(a.start, b.start), min(a.end, b.end))` for each such pair.
pub fn intersect_lists(events_a: &[Event], events_b: &[Event]) -> Vec<Event> {
    let mut overlaps = Vec::new();

    for a in events_a {
        for b in events_b {
            if a.overlaps(b) {
                overlaps.push(a.intersect(b));
            }
        }
    }

    overlaps
}

/// Find the overlapping events of every unordered calendar pair.
///
/// Pairs are reported in `(0, 1), (0, 2), ..., (1, 2), ...` order. A pair with no
/// overlapping events contributes nothing. Fewer than two calendars yield an empty list.
pub fn find_pairwise_overlaps<C: AsRef<[Event]>>(calendars: &[C]) -> Vec<PairOverlap> {
    let mut pairs = Vec::new();

    for (i, left) in calendars.iter().enumerate() {
        for (j, right) in calendars.iter().enumerate().skip(i + 1) {
            let events = intersect_lists(left.as_ref(), right.as_ref());
            if !events.is_empty() {
                pairs.push(PairOverlap {
                    left: i,
                    right: j,
                    events,
                });
            }
        }
    }

    pairs
}
