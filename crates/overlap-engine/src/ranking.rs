//! Flatten overlap levels into one ranked list.

use serde::{Deserialize, Serialize};

use crate::event::{Event, TimeSpan};
use crate::merger::OverlapLevel;
use crate::participants::ParticipantKey;

/// One row of the final output: an overlap interval and the calendars sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participants: ParticipantKey,
    pub event: Event,
}

impl RankingEntry {
    pub fn duration(&self) -> TimeSpan {
        self.event.duration()
    }
}

/// Ranked overlaps: largest participant groups first, longest intervals first within
/// a group.
pub type Ranking = Vec<RankingEntry>;

/// Rank every event of `levels` (given in production order, 2-way level first).
///
/// Levels are visited from the last produced to the first, each level's events in
/// key-insertion then per-key order. That sequence is then stable-sorted by
/// participant count descending and duration descending, so ties keep the visiting
/// order. No deduplication: equal intervals under different keys are separate rows.
pub fn format_ranking(levels: &[OverlapLevel]) -> Ranking {
    let mut ranking: Ranking = levels
        .iter()
        .rev()
        .flat_map(|level| level.flatten())
        .map(|(key, event)| RankingEntry {
            participants: key.clone(),
            event: *event,
        })
        .collect();

    // `sort_by` is stable.
    ranking.sort_by(|a, b| {
        b.participants
            .len()
            .cmp(&a.participants.len())
            .then_with(|| b.duration().cmp(&a.duration()))
    });

    ranking
}
