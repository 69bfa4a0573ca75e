//! # overlap-engine
//!
//! Multi-way overlap detection and ranking across an arbitrary number of calendars.
//!
//! Pairwise intersections between calendars form the first overlap level. Each level's
//! results are then fed back as pseudo-calendars to find overlaps shared by more
//! calendars, until nothing more intersects. The final ranking lists the largest
//! participant groups first and, within a group, the longest intervals first.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use overlap_engine::{analyze, Event};
//!
//! let at = |h, m| Utc.with_ymd_and_hms(2025, 5, 2, h, m, 0).unwrap();
//! let calendars = vec![
//!     vec![Event::new(at(9, 0), at(11, 0))],
//!     vec![Event::new(at(10, 0), at(12, 0))],
//! ];
//! let ranking = analyze(&calendars);
//! assert_eq!(ranking.len(), 1);
//! assert_eq!(ranking[0].event, Event::new(at(10, 0), at(11, 0)));
//! ```
//!
//! ## Modules
//!
//! - [`event`] - `TimePoint`, half-open `Event` intervals, overlap and intersection
//! - [`participants`] - `ParticipantKey` sets of calendar indices
//! - [`pairwise`] - all intersecting event pairs between every two calendars
//! - [`merger`] - iterative widening into 3-way, 4-way, ... overlap levels
//! - [`ranking`] - flatten levels into the ordered `Ranking`
//! - [`engine`] - `OverlapEngine` facade (analyze, print, export)
//! - [`report`] - console report and CSV rendering/reading
//! - [`freebusy`] - free time slots within a window
//! - [`ics`] - read `VEVENT` start/end instants from ICS files
//! - [`timezone`] - zone parsing and local/UTC conversion
//! - [`error`] - Error types

pub mod engine;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod ics;
pub mod merger;
pub mod pairwise;
pub mod participants;
pub mod ranking;
pub mod report;
pub mod timezone;

pub use engine::{analyze, OverlapEngine, Validation};
pub use error::EngineError;
pub use event::{Event, TimePoint, TimeSpan};
pub use freebusy::{find_common_free_slots, find_free_slots, FreeSlot};
pub use merger::{compute_levels, MergePolicy, OverlapLevel};
pub use pairwise::find_pairwise_overlaps;
pub use participants::ParticipantKey;
pub use ranking::{format_ranking, Ranking, RankingEntry};
