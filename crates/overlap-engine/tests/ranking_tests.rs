//! Tests for ranking order and participant attribution.

use chrono::{Duration, TimeZone, Utc};
use overlap_engine::merger::{compute_levels, MergePolicy};
use overlap_engine::{analyze, format_ranking, Event, ParticipantKey, RankingEntry};

fn event(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Event {
    Event::new(
        Utc.with_ymd_and_hms(2025, 5, 2, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2025, 5, 2, end_hour, end_min, 0)
            .unwrap(),
    )
}

fn entry(indices: &[usize], event: Event) -> RankingEntry {
    RankingEntry {
        participants: indices.iter().copied().collect(),
        event,
    }
}

fn three_calendars() -> Vec<Vec<Event>> {
    vec![
        vec![event(9, 0, 11, 0)],
        vec![event(10, 0, 12, 0)],
        vec![event(10, 30, 11, 30)],
    ]
}

#[test]
fn three_calendar_ranking_under_overwrite() {
    let levels = compute_levels(&three_calendars(), MergePolicy::Overwrite);
    let ranking = format_ranking(&levels);

    assert_eq!(
        ranking,
        vec![
            entry(&[0, 1, 2], event(10, 30, 11, 0)),
            // Equal 1:00 durations keep their level order.
            entry(&[0, 1], event(10, 0, 11, 0)),
            entry(&[1, 2], event(10, 30, 11, 30)),
            entry(&[0, 2], event(10, 30, 11, 0)),
        ]
    );
    assert_eq!(ranking[0].duration(), Duration::minutes(30));
    assert_eq!(ranking[1].duration(), Duration::hours(1));
}

#[test]
fn three_calendar_ranking_by_default() {
    let ranking = analyze(&three_calendars());

    assert_eq!(
        ranking,
        vec![
            entry(&[0, 1, 2], event(10, 30, 11, 0)),
            entry(&[0, 1], event(10, 0, 11, 0)),
            entry(&[1, 2], event(10, 30, 11, 30)),
            entry(&[0, 2], event(10, 30, 11, 0)),
        ]
    );
}

#[test]
fn default_ranking_stays_small_when_everyone_shares_a_meeting() {
    let calendars = vec![vec![event(9, 0, 10, 0)]; 8];

    let ranking = analyze(&calendars);

    let everyone: ParticipantKey = (0..8).collect();
    assert_eq!(
        ranking[0],
        RankingEntry {
            participants: everyone,
            event: event(9, 0, 10, 0),
        }
    );
    // One row per level that reaches the full group, one per distinct key below it.
    assert_eq!(ranking.iter().filter(|e| e.participants.len() == 8).count(), 5);
    assert_eq!(ranking.len(), 457);
}

#[test]
fn three_calendar_ranking_under_accumulate() {
    let ranking = format_ranking(&compute_levels(&three_calendars(), MergePolicy::Accumulate));

    assert_eq!(ranking.len(), 6);
    for row in &ranking[..3] {
        assert_eq!(*row, entry(&[0, 1, 2], event(10, 30, 11, 0)));
    }
    assert_eq!(ranking[3], entry(&[0, 1], event(10, 0, 11, 0)));
    assert_eq!(ranking[4], entry(&[1, 2], event(10, 30, 11, 30)));
    assert_eq!(ranking[5], entry(&[0, 2], event(10, 30, 11, 0)));
}

#[test]
fn equal_events_under_different_keys_keep_their_own_keys() {
    let calendars = vec![vec![event(10, 0, 11, 0)]; 3];
    let levels = compute_levels(&calendars, MergePolicy::Overwrite);
    let ranking = format_ranking(&levels);

    let pair_rows: Vec<_> = ranking
        .iter()
        .filter(|e| e.participants.len() == 2)
        .map(|e| e.participants.clone())
        .collect();
    let expected: Vec<ParticipantKey> = vec![
        [0, 1].into_iter().collect(),
        [0, 2].into_iter().collect(),
        [1, 2].into_iter().collect(),
    ];
    assert_eq!(pair_rows, expected);
}

#[test]
fn inverted_overlap_sinks_to_bottom_of_group() {
    // Calendar 0 holds a malformed 11:00 -> 10:00 event; it still "overlaps" 09:00-12:00.
    let calendars = vec![
        vec![event(11, 0, 10, 0), event(9, 0, 9, 30)],
        vec![event(9, 0, 12, 0)],
    ];

    let ranking = analyze(&calendars);

    assert_eq!(
        ranking,
        vec![
            entry(&[0, 1], event(9, 0, 9, 30)),
            entry(&[0, 1], event(11, 0, 10, 0)),
        ]
    );
    assert_eq!(ranking[1].duration(), Duration::hours(-1));
}

#[test]
fn groups_are_contiguous_when_levels_mix_sizes() {
    let calendars = vec![vec![event(9, 0, 12, 0)]; 4];
    let ranking = analyze(&calendars);

    let sizes: Vec<usize> = ranking.iter().map(|e| e.participants.len()).collect();
    let mut sorted = sizes.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(sizes, sorted);
    assert_eq!(sizes.first(), Some(&4));
    assert_eq!(sizes.last(), Some(&2));
}

#[test]
fn longer_overlaps_rank_first_within_group() {
    let calendars = vec![
        vec![event(9, 0, 9, 15), event(13, 0, 15, 0)],
        vec![event(9, 0, 10, 0), event(14, 0, 16, 0)],
    ];

    let ranking = analyze(&calendars);

    assert_eq!(
        ranking,
        vec![
            entry(&[0, 1], event(14, 0, 15, 0)),
            entry(&[0, 1], event(9, 0, 9, 15)),
        ]
    );
}

#[test]
fn empty_levels_give_empty_ranking() {
    assert!(format_ranking(&[]).is_empty());
    let none: Vec<Vec<Event>> = vec![];
    assert!(analyze(&none).is_empty());
    assert!(analyze(&[vec![event(9, 0, 10, 0)]]).is_empty());
}

#[test]
fn ranking_serializes_to_json() {
    let ranking = analyze(&three_calendars()[..2]);
    let json = serde_json::to_value(&ranking).unwrap();

    assert_eq!(json[0]["participants"], serde_json::json!([0, 1]));
    assert_eq!(json[0]["event"]["start"], "2025-05-02T10:00:00Z");
    assert_eq!(json[0]["event"]["end"], "2025-05-02T11:00:00Z");
}
