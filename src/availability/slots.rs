//! Candidate start-time generation

use super::{
    conflicts::ConflictIndex,
    time::{Interval, TimeOfDay},
};

/// Default step between candidate start times, in minutes
pub const DEFAULT_GRANULARITY: i64 = 15;

/// Walk every open interval in `granularity` steps from its start and keep
/// each start `t` where `[t, t + total_duration)` fits before the interval
/// closes and clears every booking in `index`.
///
/// Returns starts in ascending order; an empty list means fully booked.
pub fn generate(
    working: &[Interval],
    index: &ConflictIndex,
    total_duration: i64,
    granularity: i64,
) -> Vec<TimeOfDay> {
    if total_duration <= 0 || granularity <= 0 {
        return Vec::new();
    }

    let mut starts = Vec::new();
    for open in working {
        let mut t = open.start;
        while t + total_duration <= open.end {
            let candidate = Interval::starting_at(t, total_duration);
            if index.first_conflict(&candidate).is_none() {
                if let Some(start) = TimeOfDay::from_minutes(t) {
                    starts.push(start);
                }
            }
            t += granularity;
        }
    }
    starts.sort();
    starts.dedup();
    starts
}
