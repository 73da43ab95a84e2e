//! Tests for overlap clustering and column assignment.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use grid_engine::{compute_day_layouts, compute_layouts, overlaps, DateRange, TimeInterval};
use std::collections::HashSet;

const EPS: f64 = 1e-9;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

/// Helper to create an interval on 2026-03-02 from hour/minute pairs.
fn interval(
    id: &'static str,
    start_hour: u32,
    start_min: u32,
    end_hour: u32,
    end_min: u32,
) -> TimeInterval<&'static str> {
    TimeInterval::new(id, at(start_hour, start_min), at(end_hour, end_min))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn empty_input_yields_empty_map() {
    let layouts = compute_layouts::<&str>(&[]);
    assert!(layouts.is_empty());
}

#[test]
fn single_interval_fills_column() {
    let layouts = compute_layouts(&[interval("a", 8, 0, 9, 0)]);

    let a = layouts["a"];
    assert!(approx(a.width_fraction, 1.0));
    assert!(approx(a.offset_fraction, 0.0));
    assert_eq!(a.column, 0);
    assert_eq!(a.column_count, 1);
}

#[test]
fn disjoint_intervals_are_independent() {
    let layouts = compute_layouts(&[interval("a", 8, 0, 9, 0), interval("b", 11, 0, 12, 0)]);

    for id in ["a", "b"] {
        assert!(approx(layouts[id].width_fraction, 1.0));
        assert!(approx(layouts[id].offset_fraction, 0.0));
    }
    assert_ne!(layouts["a"].cluster_id, layouts["b"].cluster_id);
}

#[test]
fn touching_intervals_do_not_overlap() {
    // 08:00-09:00 and 09:00-10:00 share only the boundary instant.
    let layouts = compute_layouts(&[interval("a", 8, 0, 9, 0), interval("b", 9, 0, 10, 0)]);

    for id in ["a", "b"] {
        assert!(
            approx(layouts[id].width_fraction, 1.0),
            "touching intervals should each take the full width"
        );
        assert!(approx(layouts[id].offset_fraction, 0.0));
    }
    assert_ne!(
        layouts["a"].cluster_id, layouts["b"].cluster_id,
        "touching intervals must land in different clusters"
    );
}

#[test]
fn simple_overlap_splits_in_half() {
    let layouts = compute_layouts(&[interval("a", 8, 0, 9, 0), interval("b", 8, 30, 9, 30)]);

    let (a, b) = (layouts["a"], layouts["b"]);
    assert!(approx(a.width_fraction, 0.5));
    assert!(approx(b.width_fraction, 0.5));
    assert!(approx(a.offset_fraction, 0.0), "earlier start takes column 0");
    assert!(approx(b.offset_fraction, 0.5));
    assert_eq!(a.cluster_id, b.cluster_id);
}

#[test]
fn chain_with_two_concurrent_uses_two_columns() {
    // A overlaps B, B overlaps C, A and C only touch.
    let layouts = compute_layouts(&[
        interval("a", 8, 0, 9, 0),
        interval("b", 8, 30, 9, 30),
        interval("c", 9, 0, 10, 0),
    ]);

    for id in ["a", "b", "c"] {
        assert!(
            approx(layouts[id].width_fraction, 0.5),
            "{} should be half width, not a third",
            id
        );
    }

    let offsets: HashSet<u64> = layouts
        .values()
        .map(|l| (l.offset_fraction * 1000.0).round() as u64)
        .collect();
    assert_eq!(offsets.len(), 2, "exactly two distinct offsets");

    let clusters: HashSet<_> = layouts.values().map(|l| l.cluster_id).collect();
    assert_eq!(clusters.len(), 1, "transitive overlap shares one cluster");

    // C reuses A's column once A has ended.
    assert_eq!(layouts["a"].column, layouts["c"].column);
}

#[test]
fn triple_full_overlap_uses_three_columns() {
    // All three contain 08:45-09:15.
    let layouts = compute_layouts(&[
        interval("a", 8, 0, 9, 15),
        interval("b", 8, 30, 9, 30),
        interval("c", 8, 45, 10, 0),
    ]);

    let mut offsets: Vec<f64> = layouts.values().map(|l| l.offset_fraction).collect();
    offsets.sort_by(|x, y| x.partial_cmp(y).unwrap());

    for layout in layouts.values() {
        assert!(approx(layout.width_fraction, 1.0 / 3.0));
        assert_eq!(layout.column_count, 3);
    }
    assert!(approx(offsets[0], 0.0));
    assert!(approx(offsets[1], 1.0 / 3.0));
    assert!(approx(offsets[2], 2.0 / 3.0));
}

#[test]
fn independent_pairs_resolve_independently() {
    let layouts = compute_layouts(&[
        interval("morning-a", 8, 0, 9, 0),
        interval("morning-b", 8, 30, 9, 30),
        interval("afternoon-a", 14, 0, 15, 0),
        interval("afternoon-b", 14, 30, 15, 30),
    ]);

    assert_eq!(layouts["morning-a"].cluster_id, layouts["morning-b"].cluster_id);
    assert_eq!(
        layouts["afternoon-a"].cluster_id,
        layouts["afternoon-b"].cluster_id
    );
    assert_ne!(
        layouts["morning-a"].cluster_id,
        layouts["afternoon-a"].cluster_id
    );
    for layout in layouts.values() {
        assert!(approx(layout.width_fraction, 0.5));
    }
}

#[test]
fn cluster_ids_follow_chronological_order() {
    let layouts = compute_layouts(&[
        interval("late", 15, 0, 16, 0),
        interval("early", 8, 0, 9, 0),
        interval("mid", 11, 0, 12, 0),
    ]);

    assert_eq!(layouts["early"].cluster_id.0, 0);
    assert_eq!(layouts["mid"].cluster_id.0, 1);
    assert_eq!(layouts["late"].cluster_id.0, 2);
}

#[test]
fn narrow_cluster_is_not_widened_by_neighbours() {
    // A long event overlaps two short ones that do not overlap each other.
    let layouts = compute_layouts(&[
        interval("long", 8, 0, 12, 0),
        interval("short-1", 8, 0, 9, 0),
        interval("short-2", 10, 0, 11, 0),
    ]);

    for layout in layouts.values() {
        assert!(approx(layout.width_fraction, 0.5));
    }
    assert_eq!(layouts["short-1"].column, layouts["short-2"].column);
    assert_ne!(layouts["long"].column, layouts["short-1"].column);
}

#[test]
fn input_order_does_not_matter() {
    let forward = vec![
        interval("a", 8, 0, 9, 0),
        interval("b", 8, 30, 9, 30),
        interval("c", 9, 0, 10, 0),
        interval("d", 9, 15, 9, 45),
        interval("e", 13, 0, 14, 0),
    ];
    let mut backward = forward.clone();
    backward.reverse();

    assert_eq!(compute_layouts(&forward), compute_layouts(&backward));
}

#[test]
fn identical_intervals_get_distinct_columns() {
    let layouts = compute_layouts(&[interval("x", 8, 0, 9, 0), interval("y", 8, 0, 9, 0)]);

    assert_eq!(layouts["x"].column, 0, "ties break on id");
    assert_eq!(layouts["y"].column, 1);
}

#[test]
fn intervals_without_extent_are_skipped() {
    let layouts = compute_layouts(&[
        interval("zero", 8, 0, 8, 0),
        interval("inverted", 10, 0, 9, 0),
        interval("ok", 8, 0, 9, 0),
    ]);

    assert_eq!(layouts.len(), 1);
    assert!(approx(layouts["ok"].width_fraction, 1.0));
}

#[test]
fn overlap_predicate_is_strict() {
    let a = interval("a", 8, 0, 9, 0);
    assert!(overlaps(&a, &interval("b", 8, 59, 10, 0)));
    assert!(!overlaps(&a, &interval("c", 9, 0, 10, 0)));
    assert!(!overlaps(&interval("c", 9, 0, 10, 0), &a));
}

#[test]
fn day_layouts_split_events_crossing_midnight() {
    let day1 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let days = DateRange::new(day1, day2).unwrap();

    let night = TimeInterval::new(
        "night",
        Utc.with_ymd_and_hms(2026, 3, 2, 22, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 3, 2, 0, 0).unwrap(),
    );
    let late = TimeInterval::new(
        "late",
        Utc.with_ymd_and_hms(2026, 3, 2, 23, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap(),
    );
    let early = TimeInterval::new(
        "early",
        Utc.with_ymd_and_hms(2026, 3, 3, 3, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 3, 4, 0, 0).unwrap(),
    );

    let by_day = compute_day_layouts(&[night, late, early], &days, Tz::UTC);

    assert_eq!(by_day.len(), 2);
    let first = &by_day[&day1];
    assert_eq!(first.len(), 2);
    assert!(approx(first["night"].width_fraction, 0.5));

    let second = &by_day[&day2];
    assert_eq!(second.len(), 2, "night continues into the second day");
    assert!(approx(second["night"].width_fraction, 1.0));
    assert!(approx(second["early"].width_fraction, 1.0));
}

#[test]
fn day_layouts_use_local_midnight() {
    // 2026-03-02 23:30 UTC is 2026-03-02 18:30 in New York.
    let tz: Tz = "America/New_York".parse().unwrap();
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let next = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
    let days = DateRange::new(day, next).unwrap();

    let evening = TimeInterval::new(
        "evening",
        Utc.with_ymd_and_hms(2026, 3, 2, 23, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 3, 0, 30, 0).unwrap(),
    );

    let by_day = compute_day_layouts(&[evening], &days, tz);

    assert!(by_day[&day].contains_key("evening"));
    assert!(by_day[&next].is_empty(), "days without events are present but empty");
}
