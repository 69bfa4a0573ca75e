//! Participant keys: which original calendars share an overlap.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An unordered set of 0-based calendar indices.
///
/// Backed by a `BTreeSet`, so iteration and every rendering are in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantKey(BTreeSet<usize>);

impl ParticipantKey {
    /// Key for a 2-way overlap between calendars `a` and `b`.
    pub fn pair(a: usize, b: usize) -> Self {
        ParticipantKey(BTreeSet::from([a, b]))
    }

    pub fn union(&self, other: &ParticipantKey) -> Self {
        ParticipantKey(self.0.union(&other.0).copied().collect())
    }

    /// Number of participating calendars.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, calendar: usize) -> bool {
        self.0.contains(&calendar)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Canonical, comma-free form used in CSV output: `0;1;2`.
    pub fn canonical(&self) -> String {
        self.iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl FromIterator<usize> for ParticipantKey {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        ParticipantKey(iter.into_iter().collect())
    }
}

/// Renders as `(0, 1, 2)`.
impl fmt::Display for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (n, idx) in self.iter().enumerate() {
            if n > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{idx}")?;
        }
        write!(f, ")")
    }
}

/// Parses the [`ParticipantKey::canonical`] form.
impl FromStr for ParticipantKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(ParticipantKey::default());
        }
        trimmed
            .split(';')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|_| EngineError::CsvParse {
                    line: 0,
                    message: format!("invalid calendar index '{}'", part.trim()),
                })
            })
            .collect()
    }
}
