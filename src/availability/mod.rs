//! Appointment availability engine
//!
//! Pure scheduling arithmetic: resolves a staff member's open hours for a
//! date, indexes the bookings already occupying that day, derives the
//! bookable start times for a requested duration and validates a proposed
//! booking before it is persisted. Nothing here performs I/O or reads the
//! clock; callers load a [`DayInputs`] snapshot and hand it in.

pub mod conflicts;
pub mod slots;
pub mod time;
pub mod validator;
pub mod working_hours;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    booking::Booking,
    schedule::{ClosedDay, DaySchedule},
};

pub use conflicts::ConflictIndex;
pub use time::{has_overlap, Interval, TimeOfDay};

/// Scheduling errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid time format '{0}' (expected HH:MM)")]
    InvalidTimeFormat(String),

    #[error("Schedule slot {start}-{end} does not end after it starts")]
    InvalidScheduleSlot { start: String, end: String },

    #[error("Schedule slots {first} and {second} overlap")]
    OverlappingScheduleSlots { first: String, second: String },

    #[error("Requested time conflicts with an existing booking")]
    SlotConflict { booking_id: Option<Uuid> },

    #[error("Requested time is outside working hours")]
    OutsideWorkingHours,

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Salon-level padding and processing time, in minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingRules {
    pub buffer_before: i64,
    pub buffer_after: i64,
    pub processing_time: i64,
}

impl BookingRules {
    /// Calendar time a booking occupies for the given active service minutes
    pub fn total_duration(&self, service_minutes: i64) -> i64 {
        service_minutes + self.processing_time
    }
}

/// Point-in-time reads needed to schedule one staff member on one local date
#[derive(Debug, Clone)]
pub struct DayInputs {
    pub date: NaiveDate,
    pub tz: Tz,
    pub rules: BookingRules,
    pub schedule: Option<DaySchedule>,
    pub closures: Vec<ClosedDay>,
    pub bookings: Vec<Booking>,
}

impl DayInputs {
    pub fn working_hours(&self) -> Result<Vec<Interval>, AvailabilityError> {
        working_hours::resolve(self.date, self.schedule.as_ref(), &self.closures)
    }

    pub fn conflict_index(&self) -> ConflictIndex {
        ConflictIndex::build(self.date, self.tz, self.rules, &self.bookings)
    }
}

/// Bookable start times for one staff member and date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotList {
    pub slots: Vec<TimeOfDay>,
    pub integrity_overlaps: Vec<conflicts::IntegrityOverlap>,
}

/// Resolve working hours and bookings, then generate candidate starts
pub fn available_slots(
    inputs: &DayInputs,
    total_duration: i64,
    granularity: i64,
) -> Result<SlotList, AvailabilityError> {
    let working = inputs.working_hours()?;
    let index = inputs.conflict_index();
    let slots = slots::generate(&working, &index, total_duration, granularity)
        .into_iter()
        .filter(|slot| holds_on_clock(inputs, slot.minutes(), total_duration, &working, &index))
        .collect();
    Ok(SlotList {
        slots,
        integrity_overlaps: index.integrity_overlaps,
    })
}

/// Whether a start at `minutes` still passes [`authorize_booking`] once it
/// is placed on the salon clock. Around a DST change the wall-clock end
/// differs from `start + total_duration`, so a grid slot can straddle the
/// gap and run past closing or into another booking.
fn holds_on_clock(
    inputs: &DayInputs,
    minutes: i64,
    total_duration: i64,
    working: &[Interval],
    index: &ConflictIndex,
) -> bool {
    let Some(start) = slot_instant(inputs.date, inputs.tz, minutes) else {
        return false;
    };
    let end = start + chrono::Duration::minutes(total_duration);
    let candidate = Interval::new(
        minutes_floor(start, inputs.date, inputs.tz),
        minutes_ceil(end, inputs.date, inputs.tz),
    );
    validator::validate(candidate, working, index).is_ok()
}

/// Authoritative check for a proposed booking `[start, end)`.
///
/// `inputs.date` must be the salon-local date on which `start` falls.
pub fn authorize_booking(
    inputs: &DayInputs,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), AvailabilityError> {
    let candidate = Interval::new(
        minutes_floor(start, inputs.date, inputs.tz),
        minutes_ceil(end, inputs.date, inputs.tz),
    );
    let working = inputs.working_hours()?;
    let index = inputs.conflict_index();
    validator::validate(candidate, &working, &index)
}

pub fn parse_timezone(name: &str) -> Result<Tz, AvailabilityError> {
    name.parse::<Tz>()
        .map_err(|_| AvailabilityError::UnknownTimezone(name.to_string()))
}

/// Salon-local calendar date of an instant
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

fn local_midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// UTC instant of a local wall-clock time, taking the earlier reading when
/// ambiguous and the post-transition reading when it falls in a gap
pub fn local_to_utc(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz.from_utc_datetime(&local).with_timezone(&Utc),
    }
}

/// UTC instant of `minutes` after local midnight of `date`, or `None` when
/// that wall-clock time does not exist
pub fn slot_instant(date: NaiveDate, tz: Tz, minutes: i64) -> Option<DateTime<Utc>> {
    let local = local_midnight(date) + chrono::Duration::minutes(minutes);
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn seconds_since_local_midnight(instant: DateTime<Utc>, date: NaiveDate, tz: Tz) -> i64 {
    (instant.with_timezone(&tz).naive_local() - local_midnight(date)).num_seconds()
}

pub(crate) fn minutes_floor(instant: DateTime<Utc>, date: NaiveDate, tz: Tz) -> i64 {
    seconds_since_local_midnight(instant, date, tz).div_euclid(60)
}

pub(crate) fn minutes_ceil(instant: DateTime<Utc>, date: NaiveDate, tz: Tz) -> i64 {
    -(-seconds_since_local_midnight(instant, date, tz)).div_euclid(60)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Builders shared by engine and service tests

    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::TimeOfDay;
    use crate::models::{
        booking::{Booking, BookingStatus},
        schedule::{DaySchedule, WorkingSlot},
    };

    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    pub fn hm(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    pub fn open_day(slots: &[(&str, &str)]) -> DaySchedule {
        DaySchedule {
            day_of_week: 1,
            is_closed: false,
            slots: slots
                .iter()
                .enumerate()
                .map(|(i, (s, e))| WorkingSlot {
                    start: hm(s),
                    end: hm(e),
                    order: i as i16,
                })
                .collect(),
        }
    }

    pub fn booking_at(
        date: NaiveDate,
        start: (u32, u32),
        minutes: i64,
        status: BookingStatus,
    ) -> Booking {
        let start = Utc.from_utc_datetime(&date.and_hms_opt(start.0, start.1, 0).unwrap());
        Booking {
            id: Uuid::new_v4(),
            salon_id: Uuid::nil(),
            staff_id: Uuid::nil(),
            service_id: Uuid::nil(),
            client_id: Uuid::nil(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(minutes),
            status,
            price: Decimal::ZERO,
            duration: minutes as i32,
            notes: None,
            created_at: start,
            updated_at: None,
        }
    }
}
