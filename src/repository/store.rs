//! Persistence contract consumed by the availability engine

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        schedule::DateRange, Booking, BookingStatus, ClosedDay, DaySchedule, NewBooking, Salon,
        ScheduleOwner, Service, Staff,
    },
};

/// Reads and the conflict-checked insert the scheduling services rely on.
///
/// `insert_booking` must re-validate the booking against freshly read
/// working hours and bookings atomically with the insert, so that two
/// concurrent requests for overlapping times cannot both succeed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn get_salon(&self, id: Uuid) -> AppResult<Salon>;

    async fn get_staff(&self, id: Uuid) -> AppResult<Staff>;

    async fn get_service(&self, id: Uuid) -> AppResult<Service>;

    async fn list_active_staff(&self, salon_id: Uuid) -> AppResult<Vec<Staff>>;

    async fn get_schedule_for_day(
        &self,
        owner: ScheduleOwner,
        day_of_week: i16,
    ) -> AppResult<Option<DaySchedule>>;

    async fn get_closed_days(
        &self,
        owners: &[ScheduleOwner],
        range: DateRange,
    ) -> AppResult<Vec<ClosedDay>>;

    /// Calendar-blocking bookings with `start < to && end > from`
    async fn get_active_bookings(
        &self,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>>;

    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> AppResult<Booking>;

    /// Move a booking from `expected` to `status`. Returns `None` when the
    /// stored status is no longer `expected`.
    async fn update_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> AppResult<Option<Booking>>;
}

#[async_trait]
impl AvailabilityStore for Repository {
    async fn get_salon(&self, id: Uuid) -> AppResult<Salon> {
        self.salons.get_by_id(id).await
    }

    async fn get_staff(&self, id: Uuid) -> AppResult<Staff> {
        self.staff.get_by_id(id).await
    }

    async fn get_service(&self, id: Uuid) -> AppResult<Service> {
        self.services.get_by_id(id).await
    }

    async fn list_active_staff(&self, salon_id: Uuid) -> AppResult<Vec<Staff>> {
        self.staff.list_by_salon(salon_id, true).await
    }

    async fn get_schedule_for_day(
        &self,
        owner: ScheduleOwner,
        day_of_week: i16,
    ) -> AppResult<Option<DaySchedule>> {
        self.schedules.get_day(owner, day_of_week).await
    }

    async fn get_closed_days(
        &self,
        owners: &[ScheduleOwner],
        range: DateRange,
    ) -> AppResult<Vec<ClosedDay>> {
        self.schedules.closures_for(owners, range).await
    }

    async fn get_active_bookings(
        &self,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        self.bookings.active_for_staff(staff_id, from, to).await
    }

    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        self.bookings.create_checked(&booking).await
    }

    async fn get_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.bookings.get_by_id(id).await
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        self.bookings.update_status(id, expected, status).await
    }
}
