//! Authoritative conflict check for a proposed booking

use super::{conflicts::ConflictIndex, time::Interval, AvailabilityError};

/// Accept `candidate` only if one open interval holds it entirely and it
/// clears every indexed booking.
pub fn validate(
    candidate: Interval,
    working: &[Interval],
    index: &ConflictIndex,
) -> Result<(), AvailabilityError> {
    if !working.iter().any(|open| open.contains(&candidate)) {
        return Err(AvailabilityError::OutsideWorkingHours);
    }

    if let Some(hit) = index.first_conflict(&candidate) {
        return Err(AvailabilityError::SlotConflict {
            booking_id: Some(hit.booking_id),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{
        testing::{booking_at, date},
        BookingRules,
    };
    use crate::models::booking::BookingStatus;

    fn working() -> Vec<Interval> {
        vec![Interval::new(600, 720), Interval::new(780, 1140)]
    }

    fn empty_index() -> ConflictIndex {
        ConflictIndex::build(date(), chrono_tz::UTC, BookingRules::default(), &[])
    }

    #[test]
    fn test_accepts_free_slot() {
        assert!(validate(Interval::new(600, 630), &working(), &empty_index()).is_ok());
        assert!(validate(Interval::new(690, 720), &working(), &empty_index()).is_ok());
    }

    #[test]
    fn test_rejects_spanning_break() {
        assert_eq!(
            validate(Interval::new(700, 790), &working(), &empty_index()),
            Err(AvailabilityError::OutsideWorkingHours)
        );
    }

    #[test]
    fn test_rejects_before_opening_and_after_closing() {
        assert!(validate(Interval::new(570, 630), &working(), &empty_index()).is_err());
        assert!(validate(Interval::new(1130, 1160), &working(), &empty_index()).is_err());
    }

    #[test]
    fn test_rejects_empty_candidate() {
        assert_eq!(
            validate(Interval::new(650, 650), &working(), &empty_index()),
            Err(AvailabilityError::OutsideWorkingHours)
        );
    }

    #[test]
    fn test_rejects_padded_conflict() {
        let existing = booking_at(date(), (10, 0), 30, BookingStatus::Confirmed);
        let rules = BookingRules {
            buffer_before: 10,
            buffer_after: 10,
            processing_time: 0,
        };
        let index = ConflictIndex::build(date(), chrono_tz::UTC, rules, &[existing.clone()]);
        assert_eq!(
            validate(Interval::new(630, 660), &working(), &index),
            Err(AvailabilityError::SlotConflict {
                booking_id: Some(existing.id)
            })
        );
        assert!(validate(Interval::new(640, 670), &working(), &index).is_ok());
    }

    #[test]
    fn test_canceled_booking_does_not_block() {
        let canceled = booking_at(date(), (10, 0), 30, BookingStatus::Canceled);
        let index = ConflictIndex::build(date(), chrono_tz::UTC, BookingRules::default(), &[canceled]);
        assert!(validate(Interval::new(600, 630), &working(), &index).is_ok());
    }
}
