//! Compute free time slots from event lists.
//!
//! Sorts events by start time, merges overlapping busy periods, then computes
//! the gaps between merged periods within a given time window. Inverted events
//! (end before start) occupy no time here.

use serde::{Deserialize, Serialize};

use crate::event::{Event, TimePoint};

/// A free time slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: TimePoint,
    pub end: TimePoint,
    pub duration_minutes: i64,
}

impl FreeSlot {
    fn new(start: TimePoint, end: TimePoint) -> Self {
        FreeSlot {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
pub fn merge_busy_periods<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    window_start: TimePoint,
    window_end: TimePoint,
) -> Vec<(TimePoint, TimePoint)> {
    let mut intervals: Vec<(TimePoint, TimePoint)> = events
        .into_iter()
        .filter(|e| !e.is_inverted() && e.start < window_end && e.end > window_start)
        .map(|e| (e.start.max(window_start), e.end.min(window_end)))
        .collect();

    intervals.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(TimePoint, TimePoint)> = Vec::new();
    for (start, end) in intervals {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

fn gaps(merged: &[(TimePoint, TimePoint)], window_start: TimePoint, window_end: TimePoint) -> Vec<FreeSlot> {
    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    for &(busy_start, busy_end) in merged {
        if cursor < busy_start {
            free_slots.push(FreeSlot::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        free_slots.push(FreeSlot::new(cursor, window_end));
    }

    free_slots
}

/// Find free time slots within a given time window, given a list of busy events.
///
/// Events may overlap -- overlapping busy periods are merged before computing gaps.
/// Returns free slots sorted by start time. An empty or inverted window has no slots.
pub fn find_free_slots(events: &[Event], window_start: TimePoint, window_end: TimePoint) -> Vec<FreeSlot> {
    if window_start >= window_end {
        return Vec::new();
    }
    let merged = merge_busy_periods(events, window_start, window_end);
    gaps(&merged, window_start, window_end)
}

/// Find the first free slot of at least `min_duration_minutes` within the window.
pub fn find_first_free_slot(
    events: &[Event],
    window_start: TimePoint,
    window_end: TimePoint,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_free_slots(events, window_start, window_end)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}

/// Free slots shared by every calendar: the gaps in the union of all their events.
pub fn find_common_free_slots<C: AsRef<[Event]>>(
    calendars: &[C],
    window_start: TimePoint,
    window_end: TimePoint,
) -> Vec<FreeSlot> {
    if window_start >= window_end {
        return Vec::new();
    }
    let all_events = calendars.iter().flat_map(|c| c.as_ref().iter());
    let merged = merge_busy_periods(all_events, window_start, window_end);
    gaps(&merged, window_start, window_end)
}

/// The first slot of at least `min_duration_minutes` in which no calendar is busy.
pub fn find_first_common_free_slot<C: AsRef<[Event]>>(
    calendars: &[C],
    window_start: TimePoint,
    window_end: TimePoint,
    min_duration_minutes: i64,
) -> Option<FreeSlot> {
    find_common_free_slots(calendars, window_start, window_end)
        .into_iter()
        .find(|slot| slot.duration_minutes >= min_duration_minutes)
}
