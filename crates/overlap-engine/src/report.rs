//! Console and CSV renderings of a ranking.
//!
//! Timestamps render as `YYYY-MM-DD HH:MM:SS+HH:MM` in a caller-chosen zone and
//! durations as `[-]H:MM:SS`. Both formats parse back losslessly at second precision,
//! which is what [`read_csv`] relies on.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::event::{Event, TimePoint, TimeSpan};
use crate::participants::ParticipantKey;
use crate::ranking::RankingEntry;
use crate::timezone::to_local;

pub const CSV_HEADER: &str = "Participants,Start,End,Duration";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";
const GROUP_RULE: &str = "--------------------";
const ROW_RULE: &str = "-----";

pub fn format_time(instant: TimePoint, zone: Tz) -> String {
    to_local(instant, zone).format(TIME_FORMAT).to_string()
}

pub fn parse_time(text: &str) -> Option<TimePoint> {
    DateTime::parse_from_str(text.trim(), TIME_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `[-]H:MM:SS`; hours are not wrapped into days. Sub-second parts are dropped.
pub fn format_duration(span: TimeSpan) -> String {
    let secs = span.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.unsigned_abs();
    format!("{sign}{}:{:02}:{:02}", abs / 3600, (abs % 3600) / 60, abs % 60)
}

pub fn parse_duration(text: &str) -> Option<TimeSpan> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut parts = body.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    let total = Duration::seconds(hours * 3600 + minutes * 60 + seconds);
    Some(if negative { -total } else { total })
}

/// Write the grouped, human-readable report.
///
/// A group header is emitted whenever the participant count differs from the
/// previous row's.
pub fn write_report<W: Write>(ranking: &[RankingEntry], out: &mut W, zone: Tz) -> io::Result<()> {
    if ranking.is_empty() {
        return writeln!(out, "No overlapping events found.");
    }

    writeln!(out, "{GROUP_RULE}")?;
    let mut current_size = None;
    for entry in ranking {
        let size = entry.participants.len();
        if current_size != Some(size) {
            current_size = Some(size);
            writeln!(out)?;
            writeln!(out, "Ranking of calendars with {size} participants:")?;
            writeln!(out, "{GROUP_RULE}")?;
        }
        writeln!(
            out,
            "Participants: {}, Duration: {}, Start: {}, End: {}",
            entry.participants,
            format_duration(entry.duration()),
            format_time(entry.event.start, zone),
            format_time(entry.event.end, zone),
        )?;
        writeln!(out, "{ROW_RULE}")?;
    }
    Ok(())
}

/// Write `Participants,Start,End,Duration` rows. An empty ranking writes the header only.
pub fn write_csv<W: Write>(ranking: &[RankingEntry], out: &mut W, zone: Tz) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for entry in ranking {
        writeln!(
            out,
            "{},{},{},{}",
            entry.participants.canonical(),
            format_time(entry.event.start, zone),
            format_time(entry.event.end, zone),
            format_duration(entry.duration()),
        )?;
    }
    Ok(())
}

/// Read rows produced by [`write_csv`] back into ranking entries.
///
/// The duration column must agree with `End - Start`, and every row needs at least two
/// participants.
pub fn read_csv<R: BufRead>(input: R) -> Result<Vec<RankingEntry>> {
    let mut entries = Vec::new();
    let mut saw_header = false;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| EngineError::CsvParse {
            line: line_no,
            message: e.to_string(),
        })?;
        let line = line.trim_end_matches('\r');
        if !saw_header {
            if line != CSV_HEADER {
                return Err(csv_error(line_no, format!("expected header '{CSV_HEADER}'")));
            }
            saw_header = true;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        entries.push(parse_row(line, line_no)?);
    }

    if !saw_header {
        return Err(csv_error(1, "missing header".to_string()));
    }
    Ok(entries)
}

fn parse_row(line: &str, line_no: usize) -> Result<RankingEntry> {
    let fields: Vec<&str> = line.split(',').collect();
    let [participants, start, end, duration] = fields.as_slice() else {
        return Err(csv_error(line_no, format!("expected 4 fields, found {}", fields.len())));
    };

    let participants: ParticipantKey = participants
        .parse()
        .map_err(|_| csv_error(line_no, format!("invalid participants '{participants}'")))?;
    if participants.len() < 2 {
        return Err(csv_error(
            line_no,
            format!("an overlap needs at least two participants, found '{participants}'"),
        ));
    }
    let start = parse_time(start).ok_or_else(|| csv_error(line_no, format!("invalid start '{start}'")))?;
    let end = parse_time(end).ok_or_else(|| csv_error(line_no, format!("invalid end '{end}'")))?;
    let duration =
        parse_duration(duration).ok_or_else(|| csv_error(line_no, format!("invalid duration '{duration}'")))?;

    let event = Event::new(start, end);
    if event.duration().num_seconds() != duration.num_seconds() {
        return Err(csv_error(
            line_no,
            format!("duration {} does not match End - Start", format_duration(duration)),
        ));
    }

    Ok(RankingEntry { participants, event })
}

fn csv_error(line: usize, message: String) -> EngineError {
    EngineError::CsvParse { line, message }
}
