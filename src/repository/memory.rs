//! In-process store used by service tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::AvailabilityStore;
use crate::{
    availability::{self, conflicts, DayInputs},
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingStatus, NewBooking},
        schedule::{day_of_week, ClosedDay, DateRange, DaySchedule, ScheduleOwner},
        Salon, Service, Staff,
    },
};

#[derive(Default)]
struct Tables {
    salons: HashMap<Uuid, Salon>,
    staff: HashMap<Uuid, Staff>,
    services: HashMap<Uuid, Service>,
    schedules: HashMap<(ScheduleOwner, i16), DaySchedule>,
    closures: Vec<ClosedDay>,
    bookings: Vec<Booking>,
}

/// All tables behind one lock; `insert_booking` holds it from the
/// re-validation through the insert.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store poisoned".to_string()))
    }

    pub fn put_salon(&self, salon: Salon) {
        if let Ok(mut t) = self.lock() {
            t.salons.insert(salon.id, salon);
        }
    }

    pub fn put_staff(&self, staff: Staff) {
        if let Ok(mut t) = self.lock() {
            t.staff.insert(staff.id, staff);
        }
    }

    pub fn put_service(&self, service: Service) {
        if let Ok(mut t) = self.lock() {
            t.services.insert(service.id, service);
        }
    }

    pub fn put_schedule(&self, owner: ScheduleOwner, schedule: DaySchedule) {
        if let Ok(mut t) = self.lock() {
            t.schedules.insert((owner, schedule.day_of_week), schedule);
        }
    }

    pub fn put_closure(&self, closure: ClosedDay) {
        if let Ok(mut t) = self.lock() {
            t.closures.push(closure);
        }
    }

    pub fn set_status(&self, id: Uuid, status: BookingStatus) {
        if let Ok(mut t) = self.lock() {
            if let Some(b) = t.bookings.iter_mut().find(|b| b.id == id) {
                b.status = status;
            }
        }
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().map(|t| t.bookings.clone()).unwrap_or_default()
    }
}

impl Tables {
    fn salon(&self, id: Uuid) -> AppResult<Salon> {
        self.salons
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Salon {} not found", id)))
    }

    fn staff(&self, id: Uuid) -> AppResult<Staff> {
        self.staff
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))
    }

    fn closures(&self, owners: &[ScheduleOwner], range: DateRange) -> Vec<ClosedDay> {
        self.closures
            .iter()
            .filter(|c| owners.iter().any(|o| o.matches(&c.owner_kind, c.owner_id)))
            .filter(|c| c.start_date <= range.end && c.end_date >= range.start)
            .cloned()
            .collect()
    }

    fn active(&self, staff_id: Uuid, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<Booking> {
        let mut rows: Vec<Booking> = self
            .bookings
            .iter()
            .filter(|b| b.staff_id == staff_id && b.status.blocks_calendar())
            .filter(|b| b.start_time < to && b.end_time > from)
            .cloned()
            .collect();
        rows.sort_by_key(|b| b.start_time);
        rows
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn get_salon(&self, id: Uuid) -> AppResult<Salon> {
        self.lock()?.salon(id)
    }

    async fn get_staff(&self, id: Uuid) -> AppResult<Staff> {
        self.lock()?.staff(id)
    }

    async fn get_service(&self, id: Uuid) -> AppResult<Service> {
        self.lock()?
            .services
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    async fn list_active_staff(&self, salon_id: Uuid) -> AppResult<Vec<Staff>> {
        let mut rows: Vec<Staff> = self
            .lock()?
            .staff
            .values()
            .filter(|s| s.salon_id == salon_id && s.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get_schedule_for_day(
        &self,
        owner: ScheduleOwner,
        day_of_week: i16,
    ) -> AppResult<Option<DaySchedule>> {
        Ok(self.lock()?.schedules.get(&(owner, day_of_week)).cloned())
    }

    async fn get_closed_days(
        &self,
        owners: &[ScheduleOwner],
        range: DateRange,
    ) -> AppResult<Vec<ClosedDay>> {
        Ok(self.lock()?.closures(owners, range))
    }

    async fn get_active_bookings(
        &self,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        Ok(self.lock()?.active(staff_id, from, to))
    }

    async fn insert_booking(&self, booking: NewBooking) -> AppResult<Booking> {
        let mut tables = self.lock()?;

        let salon = tables.salon(booking.salon_id)?;
        let member = tables.staff(booking.staff_id)?;
        let tz = salon.tz()?;
        let rules = salon.rules();
        let date = availability::local_date(booking.start_time, tz);
        let (from, to) = conflicts::query_window(date, tz, rules);

        let inputs = DayInputs {
            date,
            tz,
            rules,
            schedule: tables
                .schedules
                .get(&(member.schedule_owner(), day_of_week(date)))
                .cloned(),
            closures: tables.closures(&member.closure_owners(), DateRange::single(date)),
            bookings: tables.active(member.id, from, to),
        };
        availability::authorize_booking(&inputs, booking.start_time, booking.end_time)?;

        let row = Booking {
            id: Uuid::new_v4(),
            salon_id: booking.salon_id,
            staff_id: booking.staff_id,
            service_id: booking.primary_service(),
            client_id: booking.client_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: BookingStatus::Pending,
            price: booking.price,
            duration: booking.duration,
            notes: booking.notes,
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.bookings.push(row.clone());
        Ok(row)
    }

    async fn get_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.lock()?
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut tables = self.lock()?;
        let updated = tables
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == expected)
            .map(|b| {
                b.status = status;
                b.updated_at = Some(Utc::now());
                b.clone()
            });
        Ok(updated)
    }
}
