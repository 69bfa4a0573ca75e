//! Tests for iterative level merging.

use chrono::{TimeZone, Utc};
use overlap_engine::merger::{compute_levels, merge_level, MergePolicy, OverlapLevel};
use overlap_engine::{Event, ParticipantKey};

fn event(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Event {
    Event::new(
        Utc.with_ymd_and_hms(2025, 5, 2, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2025, 5, 2, end_hour, end_min, 0)
            .unwrap(),
    )
}

fn key(indices: &[usize]) -> ParticipantKey {
    indices.iter().copied().collect()
}

/// Calendar 0: 09:00-11:00, calendar 1: 10:00-12:00, calendar 2: 10:30-11:30.
fn three_calendars() -> Vec<Vec<Event>> {
    vec![
        vec![event(9, 0, 11, 0)],
        vec![event(10, 0, 12, 0)],
        vec![event(10, 30, 11, 30)],
    ]
}

/// Four calendars all busy 09:00-12:00.
fn four_identical_calendars() -> Vec<Vec<Event>> {
    vec![vec![event(9, 0, 12, 0)]; 4]
}

#[test]
fn pairwise_level_of_three_calendars() {
    let level = OverlapLevel::pairwise(&three_calendars());

    let keys: Vec<_> = level.keys().cloned().collect();
    assert_eq!(keys, vec![key(&[0, 1]), key(&[0, 2]), key(&[1, 2])]);
    assert_eq!(level.get(&key(&[0, 1])).unwrap(), &[event(10, 0, 11, 0)]);
    assert_eq!(level.get(&key(&[0, 2])).unwrap(), &[event(10, 30, 11, 0)]);
    assert_eq!(level.get(&key(&[1, 2])).unwrap(), &[event(10, 30, 11, 30)]);
}

#[test]
fn overwrite_collapses_colliding_pseudo_pairs() {
    let levels = compute_levels(&three_calendars(), MergePolicy::Overwrite);

    assert_eq!(levels.len(), 2);
    let top = &levels[1];
    assert_eq!(top.len(), 1);
    assert_eq!(top.get(&key(&[0, 1, 2])).unwrap(), &[event(10, 30, 11, 0)]);
}

#[test]
fn accumulate_keeps_every_colliding_pseudo_pair() {
    let levels = compute_levels(&three_calendars(), MergePolicy::Accumulate);

    assert_eq!(levels.len(), 2);
    let top = &levels[1];
    assert_eq!(top.len(), 1);
    // Pseudo-pairs (0,1), (0,2), (1,2) each intersect to 10:30-11:00.
    assert_eq!(top.get(&key(&[0, 1, 2])).unwrap(), &[event(10, 30, 11, 0); 3]);
}

#[test]
fn overwrite_keeps_only_last_pseudo_pair_events() {
    // Calendar 2 double-books 10:00-11:00 inside 09:00-12:00, so the colliding
    // pseudo-pairs produce different event lists.
    let calendars = vec![
        vec![event(9, 0, 12, 0)],
        vec![event(9, 0, 12, 0)],
        vec![event(9, 0, 12, 0), event(10, 0, 11, 0)],
    ];
    // Level 1: (0,1): [9-12], (0,2): [9-12, 10-11], (1,2): [9-12, 10-11]

    let overwrite = compute_levels(&calendars, MergePolicy::Overwrite);
    let accumulate = compute_levels(&calendars, MergePolicy::Accumulate);

    let all = key(&[0, 1, 2]);
    // The last pseudo-pair, (0,2) with (1,2), wins.
    assert_eq!(
        overwrite[1].get(&all).unwrap(),
        &[
            event(9, 0, 12, 0),
            event(10, 0, 11, 0),
            event(10, 0, 11, 0),
            event(10, 0, 11, 0),
        ]
    );
    // (0,1)x(0,2): 2 events, (0,1)x(1,2): 2 events, (0,2)x(1,2): 4 events
    assert_eq!(accumulate[1].get(&all).unwrap().len(), 8);
    assert_eq!(
        &accumulate[1].get(&all).unwrap()[..2],
        &[event(9, 0, 12, 0), event(10, 0, 11, 0)]
    );
}

#[test]
fn distinct_drops_repeated_intervals_only() {
    let calendars = vec![
        vec![event(9, 0, 12, 0)],
        vec![event(9, 0, 12, 0)],
        vec![event(9, 0, 12, 0), event(10, 0, 11, 0)],
    ];

    let levels = compute_levels(&calendars, MergePolicy::Distinct);

    assert_eq!(
        levels[1].get(&key(&[0, 1, 2])).unwrap(),
        &[event(9, 0, 12, 0), event(10, 0, 11, 0)]
    );
}

#[test]
fn distinct_stays_bounded_for_many_identical_calendars() {
    let calendars = vec![vec![event(9, 0, 12, 0)]; 6];

    let levels = compute_levels(&calendars, MergePolicy::Distinct);

    for level in &levels[1..] {
        assert_eq!(level.event_count(), level.len(), "one interval per key");
    }
    let top = levels.last().unwrap();
    assert_eq!(top.keys().cloned().collect::<Vec<_>>(), vec![key(&[0, 1, 2, 3, 4, 5])]);
}

#[test]
fn union_of_disjoint_keys_jumps_cardinality() {
    let levels = compute_levels(&four_identical_calendars(), MergePolicy::Overwrite);

    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0].len(), 6);

    let sizes: Vec<usize> = levels[1].keys().map(ParticipantKey::len).collect();
    assert_eq!(sizes, vec![3, 3, 4, 3, 3]);
    assert!(levels[1].get(&key(&[0, 1, 2, 3])).is_some());

    let top: Vec<_> = levels[2].keys().cloned().collect();
    assert_eq!(top, vec![key(&[0, 1, 2, 3])]);
}

#[test]
fn default_policy_is_distinct() {
    assert_eq!(MergePolicy::default(), MergePolicy::Distinct);
}

#[test]
fn default_policy_stays_bounded_for_eight_identical_calendars() {
    let calendars = vec![vec![event(9, 0, 10, 0)]; 8];

    let levels = compute_levels(&calendars, MergePolicy::default());

    for level in &levels {
        assert_eq!(level.event_count(), level.len());
    }
    let top = levels.last().unwrap();
    assert_eq!(top.keys().cloned().collect::<Vec<_>>(), vec![key(&[0, 1, 2, 3, 4, 5, 6, 7])]);
    assert_eq!(top.event_count(), 1);
}

#[test]
fn accumulate_repeats_intervals_across_levels() {
    let levels = compute_levels(&four_identical_calendars(), MergePolicy::Accumulate);

    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0].event_count(), 6);
    // Every level-2 key is reached by three pseudo-pairs.
    assert_eq!(levels[1].event_count(), 15);
    // Ten pseudo-pairs of three events each way.
    assert_eq!(levels[2].event_count(), 90);
}

#[test]
fn no_overlaps_no_levels() {
    let calendars = vec![vec![event(9, 0, 10, 0)], vec![event(10, 0, 11, 0)]];
    assert!(compute_levels(&calendars, MergePolicy::default()).is_empty());
}

#[test]
fn zero_or_one_calendar_no_levels() {
    let empty: Vec<Vec<Event>> = vec![];
    assert!(compute_levels(&empty, MergePolicy::default()).is_empty());
    assert!(compute_levels(&[vec![event(9, 0, 10, 0)]], MergePolicy::default()).is_empty());
}

#[test]
fn two_calendars_stop_after_pairwise_level() {
    let calendars = vec![vec![event(9, 0, 11, 0)], vec![event(10, 0, 12, 0)]];
    let levels = compute_levels(&calendars, MergePolicy::default());

    assert_eq!(levels.len(), 1);
    assert!(merge_level(&levels[0], MergePolicy::default()).is_empty());
}

#[test]
fn merge_requires_overlap_between_pseudo_calendars() {
    // (0,1) overlap in the morning, (2,3) in the afternoon: no 3-way overlap.
    let calendars = vec![
        vec![event(9, 0, 10, 0)],
        vec![event(9, 30, 10, 30)],
        vec![event(14, 0, 15, 0)],
        vec![event(14, 30, 15, 30)],
    ];
    let levels = compute_levels(&calendars, MergePolicy::default());

    assert_eq!(levels.len(), 1);
    let keys: Vec<_> = levels[0].keys().cloned().collect();
    assert_eq!(keys, vec![key(&[0, 1]), key(&[2, 3])]);
}
