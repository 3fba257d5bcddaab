//! Booking conflict index for one staff member and date

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use uuid::Uuid;

use super::{local_to_utc, minutes_ceil, minutes_floor, time::Interval, time::MINUTES_PER_DAY, BookingRules};
use crate::models::booking::Booking;

/// A booking projected onto the queried day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub booking_id: Uuid,
    /// The booked time itself
    pub booked: Interval,
    /// `booked` widened by the salon buffers
    pub padded: Interval,
}

/// Two stored bookings that should never have coexisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrityOverlap {
    pub first: Uuid,
    pub second: Uuid,
}

#[derive(Debug, Clone)]
pub struct ConflictIndex {
    pub date: NaiveDate,
    pub rules: BookingRules,
    /// Sorted by padded start
    pub occupied: Vec<OccupiedInterval>,
    pub integrity_overlaps: Vec<IntegrityOverlap>,
}

impl ConflictIndex {
    /// Index the calendar-blocking bookings that can collide with a
    /// candidate on `date`: their padded interval touches the day, or their
    /// booked time touches the day widened by the buffers.
    pub fn build(date: NaiveDate, tz: Tz, rules: BookingRules, bookings: &[Booking]) -> Self {
        let day = Interval::new(0, MINUTES_PER_DAY);
        let reach = day.padded(rules.buffer_before, rules.buffer_after);

        let mut occupied: Vec<OccupiedInterval> = bookings
            .iter()
            .filter(|b| b.status.blocks_calendar())
            .map(|b| {
                let booked = Interval::new(
                    minutes_floor(b.start_time, date, tz),
                    minutes_ceil(b.end_time, date, tz),
                );
                OccupiedInterval {
                    booking_id: b.id,
                    booked,
                    padded: booked.padded(rules.buffer_before, rules.buffer_after),
                }
            })
            .filter(|o| o.padded.overlaps(&day) || o.booked.overlaps(&reach))
            .collect();
        occupied.sort_by_key(|o| (o.padded.start, o.booked.start, o.booking_id));

        let integrity_overlaps = find_integrity_overlaps(&occupied);
        for overlap in &integrity_overlaps {
            tracing::warn!(
                date = %date,
                first = %overlap.first,
                second = %overlap.second,
                "Stored bookings overlap within their buffers"
            );
        }

        Self {
            date,
            rules,
            occupied,
            integrity_overlaps,
        }
    }

    /// First booking that a candidate interval would collide with.
    ///
    /// The candidate may not touch another booking's padded interval, and
    /// its own padded interval may not touch another booking's time.
    pub fn first_conflict(&self, candidate: &Interval) -> Option<&OccupiedInterval> {
        let padded = candidate.padded(self.rules.buffer_before, self.rules.buffer_after);
        self.occupied
            .iter()
            .find(|o| candidate.overlaps(&o.padded) || padded.overlaps(&o.booked))
    }

    pub fn padded_intervals(&self) -> Vec<Interval> {
        self.occupied.iter().map(|o| o.padded).collect()
    }
}

fn find_integrity_overlaps(occupied: &[OccupiedInterval]) -> Vec<IntegrityOverlap> {
    let mut found = Vec::new();
    for (i, a) in occupied.iter().enumerate() {
        for b in &occupied[i + 1..] {
            if b.padded.start >= a.padded.end {
                break;
            }
            if a.booked.overlaps(&b.padded) || b.booked.overlaps(&a.padded) {
                found.push(IntegrityOverlap {
                    first: a.booking_id,
                    second: b.booking_id,
                });
            }
        }
    }
    found
}

/// UTC bounds of the local calendar day `[midnight, next midnight)`
pub fn day_window(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_to_utc(tz, date.and_time(NaiveTime::MIN));
    let next = date.succ_opt().unwrap_or(date);
    let end = local_to_utc(tz, next.and_time(NaiveTime::MIN));
    (start, end)
}

/// Range to query bookings with so that every booking [`ConflictIndex::build`]
/// keeps is returned.
///
/// A booking `[s, e)` must be fetched when `s < window.1 && e > window.0`.
/// Either side of the day can be reached by a booking's own buffer or by a
/// candidate's, so both sides widen by the larger buffer.
pub fn query_window(date: NaiveDate, tz: Tz, rules: BookingRules) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, end) = day_window(date, tz);
    let reach = Duration::minutes(rules.buffer_before.max(rules.buffer_after));
    (start - reach, end + reach)
}
