//! Iterative widening of pairwise overlaps into higher-order overlaps.
//!
//! The first level holds the 2-way overlaps between original calendars. Each following
//! level treats the previous level's event lists as pseudo-calendars, reruns the
//! pairwise finder on them, and keys every result by the union of the two source keys.
//! Iteration stops at the first empty level, which is discarded.
//!
//! The smallest key in a level is always strictly larger than the smallest key of the
//! level before it, so at most `n - 1` levels exist for `n` calendars.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::event::Event;
use crate::pairwise::find_pairwise_overlaps;
use crate::participants::ParticipantKey;

/// What happens when two pseudo-pairs of one level union to the same participant key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Append the later events to the key's existing list, repeats included.
    Accumulate,
    /// Replace the key's events with the later pseudo-pair's events. The key keeps
    /// its original position. Matches the legacy analyzer output.
    Overwrite,
    /// Append, skipping intervals already recorded under the key.
    ///
    /// `Accumulate` repeats one interval once per colliding pseudo-pair, and those
    /// repeats multiply at every further level; with many mutually overlapping
    /// calendars the event count grows combinatorially. `Distinct` keeps every
    /// distinct interval and stays bounded.
    #[default]
    Distinct,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergePolicy::Accumulate => write!(f, "accumulate"),
            MergePolicy::Overwrite => write!(f, "overwrite"),
            MergePolicy::Distinct => write!(f, "distinct"),
        }
    }
}

impl FromStr for MergePolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accumulate" => Ok(MergePolicy::Accumulate),
            "overwrite" => Ok(MergePolicy::Overwrite),
            "distinct" => Ok(MergePolicy::Distinct),
            _ => Err(EngineError::InvalidPolicy(s.to_string())),
        }
    }
}

/// All overlap intervals found at one stage of merging, keyed by participants.
///
/// Keys keep insertion order (a `Vec` of pairs rather than a hash map), which later
/// stages rely on for deterministic tie-breaks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlapLevel {
    entries: Vec<(ParticipantKey, Vec<Event>)>,
}

impl OverlapLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 2-way level: overlaps between every pair of original calendars.
    pub fn pairwise<C: AsRef<[Event]>>(calendars: &[C]) -> Self {
        let mut level = OverlapLevel::new();
        for pair in find_pairwise_overlaps(calendars) {
            level.insert(
                ParticipantKey::pair(pair.left, pair.right),
                pair.events,
                MergePolicy::Accumulate,
            );
        }
        level
    }

    /// Record `events` under `key`, resolving an existing key per `policy`.
    pub fn insert(&mut self, key: ParticipantKey, events: Vec<Event>, policy: MergePolicy) {
        let idx = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key, Vec::new()));
                self.entries.len() - 1
            }
        };
        let slot = &mut self.entries[idx].1;
        match policy {
            MergePolicy::Accumulate => slot.extend(events),
            MergePolicy::Overwrite => *slot = events,
            MergePolicy::Distinct => {
                for event in events {
                    if !slot.contains(&event) {
                        slot.push(event);
                    }
                }
            }
        }
    }

    pub fn get(&self, key: &ParticipantKey) -> Option<&[Event]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, events)| events.as_slice())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ParticipantKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn entries(&self) -> &[(ParticipantKey, Vec<Event>)] {
        &self.entries
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total events across all keys.
    pub fn event_count(&self) -> usize {
        self.entries.iter().map(|(_, events)| events.len()).sum()
    }

    /// Every `(key, event)` pair, in key-insertion then per-key order.
    pub fn flatten(&self) -> impl Iterator<Item = (&ParticipantKey, &Event)> {
        self.entries
            .iter()
            .flat_map(|(key, events)| events.iter().map(move |event| (key, event)))
    }
}

/// Build the next level from `level` by pairing its event lists as pseudo-calendars.
pub fn merge_level(level: &OverlapLevel, policy: MergePolicy) -> OverlapLevel {
    let pseudo_calendars: Vec<&[Event]> = level
        .entries
        .iter()
        .map(|(_, events)| events.as_slice())
        .collect();

    let mut next = OverlapLevel::new();
    for pair in find_pairwise_overlaps(&pseudo_calendars) {
        let key = level.entries[pair.left]
            .0
            .union(&level.entries[pair.right].0);
        if policy == MergePolicy::Overwrite && next.get(&key).is_some() {
            tracing::debug!(participants = %key, "overwriting events of colliding participant key");
        }
        next.insert(key, pair.events, policy);
    }
    next
}

/// Compute every non-empty overlap level, starting from the 2-way level.
///
/// Zero or one calendar yields no levels.
pub fn compute_levels<C: AsRef<[Event]>>(calendars: &[C], policy: MergePolicy) -> Vec<OverlapLevel> {
    let mut levels = Vec::new();
    let mut current = OverlapLevel::pairwise(calendars);

    while !current.is_empty() {
        tracing::debug!(
            level = levels.len() + 1,
            keys = current.len(),
            events = current.event_count(),
            "overlap level computed"
        );
        let next = merge_level(&current, policy);
        levels.push(current);
        current = next;
    }

    levels
}
