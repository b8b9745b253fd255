//! Overlap tests and merging for intervals within a single day.
//!
//! All intervals are half-open `[start, end)`. Back-to-back appointments (one
//! ends exactly when the next starts) are NOT conflicts.

use crate::time::TimeInterval;

/// Whether two half-open intervals overlap.
///
/// `a.start < b.end && b.start < a.end`. Touching endpoints do not count.
pub fn overlaps(a: &TimeInterval, b: &TimeInterval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Whether `candidate` overlaps any interval in `booked`.
pub fn overlaps_any(candidate: &TimeInterval, booked: &[TimeInterval]) -> bool {
    booked.iter().any(|b| overlaps(candidate, b))
}

/// Merge overlapping or adjacent intervals, clipped to `window`.
///
/// Returns a sorted, non-overlapping list. Malformed intervals and intervals
/// entirely outside the window are discarded.
pub fn merge_intervals(intervals: &[TimeInterval], window: &TimeInterval) -> Vec<TimeInterval> {
    let mut clipped: Vec<TimeInterval> = intervals
        .iter()
        .filter(|i| i.is_well_formed() && overlaps(i, window))
        .map(|i| TimeInterval::new(i.start.max(window.start), i.end.min(window.end)))
        .collect();

    if clipped.is_empty() {
        return Vec::new();
    }

    clipped.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<TimeInterval> = Vec::new();
    for interval in clipped {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}
