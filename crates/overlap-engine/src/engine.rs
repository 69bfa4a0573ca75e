//! The overlap engine facade: merge levels, rank, and present.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::event::Event;
use crate::merger::{compute_levels, MergePolicy, OverlapLevel};
use crate::ranking::{format_ranking, Ranking, RankingEntry};
use crate::report::{write_csv, write_report};

/// How inverted events (end before start) are treated on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    /// Keep them; they rank with a negative duration.
    #[default]
    Accept,
    /// Fail the analysis on the first inverted event.
    RejectInverted,
}

/// Runs the merge/rank pipeline with a fixed set of options.
///
/// The engine holds no state between calls; `analyze` is a pure function of its input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapEngine {
    policy: MergePolicy,
    validation: Validation,
    display_zone: Tz,
}

impl Default for OverlapEngine {
    fn default() -> Self {
        OverlapEngine {
            policy: MergePolicy::default(),
            validation: Validation::default(),
            display_zone: chrono_tz::UTC,
        }
    }
}

impl OverlapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for participant keys that collide while merging levels.
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Zone used when printing or exporting timestamps.
    pub fn with_display_zone(mut self, zone: Tz) -> Self {
        self.display_zone = zone;
        self
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    pub fn display_zone(&self) -> Tz {
        self.display_zone
    }

    /// Every non-empty overlap level, 2-way level first.
    pub fn levels<C: AsRef<[Event]>>(&self, calendars: &[C]) -> Result<Vec<OverlapLevel>> {
        self.validate(calendars)?;
        Ok(compute_levels(calendars, self.policy))
    }

    /// Rank all overlaps between `calendars`.
    ///
    /// # Errors
    /// Returns `EngineError::InvertedEvent` only under [`Validation::RejectInverted`].
    pub fn analyze<C: AsRef<[Event]>>(&self, calendars: &[C]) -> Result<Ranking> {
        let levels = self.levels(calendars)?;
        let ranking = format_ranking(&levels);
        tracing::info!(
            calendars = calendars.len(),
            levels = levels.len(),
            entries = ranking.len(),
            policy = %self.policy,
            "overlap analysis complete"
        );
        Ok(ranking)
    }

    /// Print the grouped report to stdout.
    pub fn print(&self, ranking: &[RankingEntry]) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_report(ranking, &mut out, self.display_zone)
            .and_then(|_| out.flush())
            .map_err(|e| EngineError::io("<stdout>", e))
    }

    /// Write the ranking as CSV to `path`, replacing any existing file.
    pub fn export(&self, ranking: &[RankingEntry], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
        let mut out = BufWriter::new(file);
        write_csv(ranking, &mut out, self.display_zone)
            .and_then(|_| out.flush())
            .map_err(|e| EngineError::io(path, e))?;
        tracing::info!(path = %path.display(), rows = ranking.len(), "ranking exported");
        Ok(())
    }

    fn validate<C: AsRef<[Event]>>(&self, calendars: &[C]) -> Result<()> {
        if self.validation == Validation::Accept {
            return Ok(());
        }
        for (calendar, events) in calendars.iter().enumerate() {
            if let Some(index) = events.as_ref().iter().position(Event::is_inverted) {
                return Err(EngineError::InvertedEvent { calendar, index });
            }
        }
        Ok(())
    }
}

/// Rank all overlaps between `calendars` with default options
/// (distinct merge policy, inverted events accepted).
pub fn analyze<C: AsRef<[Event]>>(calendars: &[C]) -> Ranking {
    format_ranking(&compute_levels(calendars, MergePolicy::default()))
}
