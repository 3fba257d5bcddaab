//! Working-hours resolution for a single calendar date

use chrono::NaiveDate;

use super::{time::Interval, AvailabilityError};
use crate::models::schedule::{ClosedDay, DaySchedule, WorkingSlot};

/// Open intervals for `date`, in minutes since local midnight.
///
/// A missing or closed schedule yields an empty list. Slots are returned
/// sorted by start time; overlapping slots are reported, never merged.
/// Closures covering `date` are subtracted afterwards.
pub fn resolve(
    date: NaiveDate,
    schedule: Option<&DaySchedule>,
    closures: &[ClosedDay],
) -> Result<Vec<Interval>, AvailabilityError> {
    let schedule = match schedule {
        Some(s) if !s.is_closed => s,
        _ => return Ok(Vec::new()),
    };

    let mut open = check_slots(&schedule.slots)?;

    for closure in closures.iter().filter(|c| c.covers(date)) {
        match closure.window()? {
            None => return Ok(Vec::new()),
            Some(cut) => {
                open = open.iter().flat_map(|interval| interval.subtract(&cut)).collect();
            }
        }
    }

    Ok(open)
}

/// Sort slots and reject empty or overlapping ones
pub fn check_slots(slots: &[WorkingSlot]) -> Result<Vec<Interval>, AvailabilityError> {
    let mut sorted: Vec<&WorkingSlot> = slots.iter().collect();
    sorted.sort_by_key(|slot| (slot.start, slot.order));

    for slot in &sorted {
        if slot.end <= slot.start {
            return Err(AvailabilityError::InvalidScheduleSlot {
                start: slot.start.to_string(),
                end: slot.end.to_string(),
            });
        }
    }

    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if Interval::from_times(a.start, a.end).overlaps(&Interval::from_times(b.start, b.end)) {
            return Err(AvailabilityError::OverlappingScheduleSlots {
                first: format!("{}-{}", a.start, a.end),
                second: format!("{}-{}", b.start, b.end),
            });
        }
    }

    Ok(sorted
        .into_iter()
        .map(|slot| Interval::from_times(slot.start, slot.end))
        .collect())
}
