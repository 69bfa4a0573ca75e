//! Minimal iCalendar (RFC 5545) reader that extracts `VEVENT` start/end instants.
//!
//! Only what the overlap engine consumes is interpreted: content-line unfolding,
//! component nesting, and the `DTSTART` / `DTEND` properties of each `VEVENT`.
//! Everything else (summaries, alarms, `VTIMEZONE` definitions, recurrence rules)
//! is ignored.
//!
//! ## Timestamp forms
//!
//! | Form                              | Interpretation                              |
//! |-----------------------------------|---------------------------------------------|
//! | `20250502T090000Z`                | UTC                                         |
//! | `TZID=Europe/Paris:20250502T090000` | wall-clock time in the named IANA zone    |
//! | `20250502T090000`                 | floating: wall-clock time in `floating`     |
//! | `VALUE=DATE:20250502` / `20250502` | midnight of that date in `floating`        |
//!
//! A `TZID` that is not an IANA name (e.g. Outlook's "W. Europe Standard Time") falls
//! back to the floating zone with a warning.

use std::fs;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::event::{Event, TimePoint};
use crate::timezone::{localize, parse_zone};

/// Read and parse one ICS file.
pub fn read_calendar(path: impl AsRef<Path>, floating: Tz) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
    let events = parse_calendar(&text, floating)?;
    tracing::info!(path = %path.display(), events = events.len(), "calendar loaded");
    Ok(events)
}

/// Read several ICS files; calendar `i` of the result comes from `paths[i]`.
pub fn read_calendars<P: AsRef<Path>>(paths: &[P], floating: Tz) -> Result<Vec<Vec<Event>>> {
    paths.iter().map(|p| read_calendar(p, floating)).collect()
}

/// Parse ICS text into events, in document order.
///
/// `VEVENT`s without both `DTSTART` and `DTEND` are skipped.
pub fn parse_calendar(text: &str, floating: Tz) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    // Open components with the line of their BEGIN.
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut start: Option<TimePoint> = None;
    let mut end: Option<TimePoint> = None;

    for (line_no, raw) in unfold(text) {
        let line = ContentLine::parse(&raw, line_no)?;

        match line.name.as_str() {
            "BEGIN" => {
                let component = line.value.trim().to_ascii_uppercase();
                if component == "VEVENT" {
                    start = None;
                    end = None;
                }
                stack.push((component, line_no));
            }
            "END" => {
                let component = line.value.trim().to_ascii_uppercase();
                match stack.pop() {
                    Some((open, _)) if open == component => {}
                    Some((open, _)) => {
                        return Err(ics_error(
                            line_no,
                            format!("END:{component} does not close BEGIN:{open}"),
                        ))
                    }
                    None => {
                        return Err(ics_error(line_no, format!("END:{component} without BEGIN")))
                    }
                }
                if component == "VEVENT" {
                    match (start.take(), end.take()) {
                        (Some(s), Some(e)) => events.push(Event::new(s, e)),
                        _ => tracing::debug!(line = line_no, "skipping VEVENT without DTSTART/DTEND"),
                    }
                }
            }
            "DTSTART" if in_event(&stack) => {
                start = Some(parse_timestamp(&line, floating, line_no)?);
            }
            "DTEND" if in_event(&stack) => {
                end = Some(parse_timestamp(&line, floating, line_no)?);
            }
            _ => {}
        }
    }

    if let Some((open, begin_line)) = stack.last() {
        return Err(ics_error(*begin_line, format!("unterminated component BEGIN:{open}")));
    }

    Ok(events)
}

fn in_event(stack: &[(String, usize)]) -> bool {
    stack.last().is_some_and(|(component, _)| component == "VEVENT")
}

/// Join folded continuation lines (leading space or tab). Yields the 1-based physical
/// line number where each logical line starts.
fn unfold(text: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    for (idx, physical) in text.split('\n').enumerate() {
        let physical = physical.strip_suffix('\r').unwrap_or(physical);
        if let Some(rest) = physical.strip_prefix([' ', '\t']) {
            if let Some((_, last)) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !physical.trim().is_empty() {
            lines.push((idx + 1, physical.to_string()));
        }
    }
    lines
}

/// `NAME;PARAM=VALUE;...:VALUE`
struct ContentLine {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl ContentLine {
    fn parse(raw: &str, line_no: usize) -> Result<Self> {
        let (head, value) = split_unquoted(raw, ':')
            .split_first()
            .filter(|(_, rest)| !rest.is_empty())
            .map(|(head, _)| (*head, &raw[head.len() + 1..]))
            .ok_or_else(|| ics_error(line_no, format!("missing ':' in '{raw}'")))?;
        let segments = split_unquoted(head, ';');

        let name = segments[0].trim().to_ascii_uppercase();
        if name.is_empty() {
            return Err(ics_error(line_no, "empty property name".to_string()));
        }
        let params = segments[1..]
            .iter()
            .filter_map(|seg| {
                let (k, v) = seg.split_once('=')?;
                Some((k.trim().to_ascii_uppercase(), v.trim().trim_matches('"').to_string()))
            })
            .collect();

        Ok(ContentLine {
            name,
            params,
            value: value.to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Split on `sep` where it is not inside double quotes.
fn split_unquoted(s: &str, sep: char) -> Vec<&str> {
    let mut in_quotes = false;
    let mut parts = Vec::new();
    let mut from = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == sep && !in_quotes => {
                parts.push(&s[from..i]);
                from = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[from..]);
    parts
}

fn parse_timestamp(line: &ContentLine, floating: Tz, line_no: usize) -> Result<TimePoint> {
    let value = line.value.trim();
    let is_date = line.param("VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
        || (value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()));

    if is_date {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d")
            .map_err(|_| ics_error(line_no, format!("invalid date '{value}'")))?;
        let midnight = date.and_time(NaiveTime::MIN);
        return localize(midnight, floating)
            .ok_or_else(|| ics_error(line_no, format!("midnight of {value} does not exist in {floating}")));
    }

    if let Some(utc) = value.strip_suffix(['Z', 'z']) {
        let naive = parse_naive(utc, line_no)?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    let naive = parse_naive(value, line_no)?;
    let zone = match line.param("TZID") {
        Some(tzid) => match parse_zone(tzid.trim_start_matches('/')) {
            Ok(zone) => zone,
            Err(_) => {
                tracing::warn!(tzid, line = line_no, fallback = %floating, "unknown TZID, using floating zone");
                floating
            }
        },
        None => floating,
    };
    localize(naive, zone)
        .ok_or_else(|| ics_error(line_no, format!("local time {value} does not exist in {zone}")))
}

fn parse_naive(value: &str, line_no: usize) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|_| ics_error(line_no, format!("invalid date-time '{value}'")))
}

fn ics_error(line: usize, message: String) -> EngineError {
    EngineError::IcsParse { line, message }
}
