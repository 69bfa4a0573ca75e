//! Time points and half-open event intervals.
//!
//! Every timestamp the engine touches is a [`TimePoint`] on the UTC timeline.
//! Conversion from calendar-local representations happens before events are
//! built (see [`crate::ics`] and [`crate::timezone`]).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An absolute instant on the single reference timeline.
pub type TimePoint = DateTime<Utc>;

/// A signed span of time. Negative for inverted (malformed) events.
pub type TimeSpan = Duration;

/// A half-open interval `[start, end)`.
///
/// Events are plain values: equality compares `(start, end)`, and nothing checks
/// that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl Event {
    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        Event { start, end }
    }

    /// `end - start`, not clamped to zero.
    pub fn duration(&self) -> TimeSpan {
        self.end - self.start
    }

    /// True when the event ends before it starts.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    ///
    /// Adjacent events where one ends exactly when the other starts do NOT overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The common part of two events: `[max(starts), min(ends))`.
    ///
    /// Only meaningful after [`Event::overlaps`] returned true; for disjoint inputs
    /// the result ends before it starts.
    pub fn intersect(&self, other: &Event) -> Event {
        Event {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        }
    }
}

impl From<(TimePoint, TimePoint)> for Event {
    fn from((start, end): (TimePoint, TimePoint)) -> Self {
        Event::new(start, end)
    }
}
