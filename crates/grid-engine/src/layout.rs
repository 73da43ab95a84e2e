//! Side-by-side layout of overlapping events within a day column.
//!
//! Events that overlap in time are grouped into clusters (connected components
//! of the overlap graph). Each cluster gets its own pool of columns; events are
//! assigned greedily, by start time, to the lowest free column. Every event in a
//! cluster gets the same width, `1 / columns_used`, so the cluster fills the
//! full column width.
//!
//! Overlap is strict: an event ending at 09:00 and another starting at 09:00 do
//! NOT overlap and are laid out independently.
//!
//! The result depends only on the set of intervals, never on their order in the
//! input slice.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::date_range::DateRange;

/// The time span of one calendar event, keyed by the event's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval<K> {
    pub id: K,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl<K> TimeInterval<K> {
    pub fn new(id: K, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeInterval { id, start, end }
    }

    /// Whether the interval has a visual extent (`start < end`).
    pub fn has_extent(&self) -> bool {
        self.start < self.end
    }
}

/// Identifies a cluster of transitively overlapping intervals.
///
/// Clusters are numbered from 0 in order of their earliest interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub usize);

/// Horizontal placement of one interval inside its day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventLayout {
    /// Fraction of the column width the event occupies, in `(0, 1]`.
    pub width_fraction: f64,
    /// Fraction of the column width left of the event, in `[0, 1)`.
    pub offset_fraction: f64,
    pub cluster_id: ClusterId,
    /// Zero-based column index within the cluster.
    pub column: usize,
    /// Number of columns the cluster uses.
    pub column_count: usize,
}

/// Whether two intervals overlap: `a.start < b.end && b.start < a.end`.
///
/// Touching intervals (`a.end == b.start`) do not overlap.
pub fn overlaps<K, L>(a: &TimeInterval<K>, b: &TimeInterval<L>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Compute the layout of every interval.
///
/// Intervals without extent (`start >= end`) are skipped and do not appear in
/// the result. If the same id occurs more than once, the entry for the latest
/// of those intervals in sorted order wins.
pub fn compute_layouts<K>(intervals: &[TimeInterval<K>]) -> HashMap<K, EventLayout>
where
    K: Ord + Hash + Clone,
{
    let mut order: Vec<usize> = (0..intervals.len())
        .filter(|&i| {
            let keep = intervals[i].has_extent();
            if !keep {
                debug!(
                    start = %intervals[i].start,
                    end = %intervals[i].end,
                    "skipping interval without extent"
                );
            }
            keep
        })
        .collect();

    // Stable sort: equal keys keep their input index order.
    order.sort_by(|&a, &b| {
        let (x, y) = (&intervals[a], &intervals[b]);
        x.start
            .cmp(&y.start)
            .then(x.end.cmp(&y.end))
            .then_with(|| x.id.cmp(&y.id))
    });

    let mut layouts = HashMap::with_capacity(order.len());
    let mut cluster: Vec<&TimeInterval<K>> = Vec::new();
    let mut cluster_end: Option<DateTime<Utc>> = None;
    let mut next_cluster = 0usize;

    for &index in &order {
        let interval = &intervals[index];

        // Sorted by start, so nothing later can reach back into the cluster
        // once an interval starts at or after its furthest end.
        if cluster_end.is_some_and(|end| interval.start >= end) {
            layout_cluster(&cluster, ClusterId(next_cluster), &mut layouts);
            next_cluster += 1;
            cluster.clear();
            cluster_end = None;
        }

        cluster_end = Some(cluster_end.map_or(interval.end, |end| end.max(interval.end)));
        cluster.push(interval);
    }

    if !cluster.is_empty() {
        layout_cluster(&cluster, ClusterId(next_cluster), &mut layouts);
        next_cluster += 1;
    }

    debug!(
        intervals = intervals.len(),
        laid_out = layouts.len(),
        clusters = next_cluster,
        "computed event layouts"
    );

    layouts
}

/// Assign columns to one sorted cluster and record its layouts.
fn layout_cluster<K>(
    cluster: &[&TimeInterval<K>],
    cluster_id: ClusterId,
    layouts: &mut HashMap<K, EventLayout>,
) where
    K: Hash + Eq + Clone,
{
    // End time of the interval currently occupying each column.
    let mut column_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut columns = Vec::with_capacity(cluster.len());

    for interval in cluster {
        let column = match column_ends.iter().position(|&end| end <= interval.start) {
            Some(free) => {
                column_ends[free] = interval.end;
                free
            }
            None => {
                column_ends.push(interval.end);
                column_ends.len() - 1
            }
        };
        columns.push(column);
    }

    let column_count = column_ends.len();
    let width_fraction = 1.0 / column_count as f64;

    trace!(
        cluster = cluster_id.0,
        members = cluster.len(),
        column_count,
        "laid out cluster"
    );

    for (interval, column) in cluster.iter().zip(columns) {
        layouts.insert(
            interval.id.clone(),
            EventLayout {
                width_fraction,
                offset_fraction: column as f64 * width_fraction,
                cluster_id,
                column,
                column_count,
            },
        );
    }
}

/// Lay out intervals separately for each day of `days`.
///
/// A day column runs from local midnight to the next local midnight in `tz`.
/// Each interval is clipped to every day it touches, so an event crossing
/// midnight appears in both columns. Days with no events map to an empty
/// layout.
pub fn compute_day_layouts<K>(
    intervals: &[TimeInterval<K>],
    days: &DateRange,
    tz: Tz,
) -> BTreeMap<NaiveDate, HashMap<K, EventLayout>>
where
    K: Ord + Hash + Clone,
{
    let mut by_day = BTreeMap::new();

    for day in days {
        let bounds = day_start(day, tz).zip(day.succ_opt().and_then(|next| day_start(next, tz)));
        let Some((opens, closes)) = bounds else {
            debug!(%day, "no representable day boundaries, skipping");
            continue;
        };

        let clipped: Vec<TimeInterval<K>> = intervals
            .iter()
            .filter(|iv| iv.has_extent() && iv.start < closes && iv.end > opens)
            .map(|iv| TimeInterval {
                id: iv.id.clone(),
                start: iv.start.max(opens),
                end: iv.end.min(closes),
            })
            .collect();

        by_day.insert(day, compute_layouts(&clipped));
    }

    by_day
}

/// The first instant of `day` in `tz`.
///
/// Midnight can fall into a DST gap in some zones; the first valid hour is
/// used then.
fn day_start(day: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    (0..=3)
        .find_map(|hour| {
            let naive = day.and_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&naive).earliest()
        })
        .map(|local| local.with_timezone(&Utc))
}
