//! Booking service

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use super::availability::{ensure_bookable, resolve_services, service_minutes};
use crate::{
    error::{AppError, AppResult},
    models::booking::{
        Booking, BookingPage, BookingQuery, BookingStatus, CreateBooking, NewBooking,
    },
    repository::{AvailabilityStore, Repository},
};

const MAX_PER_PAGE: i64 = 200;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    store: Arc<dyn AvailabilityStore>,
}

impl BookingsService {
    pub fn new(repository: Repository, store: Arc<dyn AvailabilityStore>) -> Self {
        Self { repository, store }
    }

    /// Create a booking. The store re-validates working hours and conflicts
    /// atomically with the insert; the checks here only reject bad input.
    pub async fn create_booking(&self, request: CreateBooking) -> AppResult<Booking> {
        let booking = plan_booking(self.store.as_ref(), request).await?;
        let staff_id = booking.staff_id;
        let start = booking.start_time;

        match self.store.insert_booking(booking).await {
            Ok(created) => {
                tracing::info!(
                    booking_id = %created.id,
                    staff_id = %created.staff_id,
                    start = %created.start_time,
                    end = %created.end_time,
                    "Booking created"
                );
                Ok(created)
            }
            Err(e) if e.is_slot_unavailable() => {
                tracing::info!(%staff_id, %start, error = %e, "Booking rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_booking(&self, id: Uuid) -> AppResult<Booking> {
        self.repository.bookings.get_by_id(id).await
    }

    /// Service IDs of a booking, in the order they were requested
    pub async fn booking_services(&self, id: Uuid) -> AppResult<Vec<Uuid>> {
        self.repository.bookings.get_by_id(id).await?;
        self.repository.bookings.service_ids(id).await
    }

    pub async fn list_bookings(&self, mut query: BookingQuery) -> AppResult<BookingPage> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, MAX_PER_PAGE);
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if to <= from {
                return Err(AppError::BadRequest("'to' must be after 'from'".to_string()));
            }
        }
        query.page = Some(page);
        query.per_page = Some(per_page);

        let (bookings, total) = self.repository.bookings.list(&query).await?;
        Ok(BookingPage {
            bookings,
            total,
            page,
            per_page,
        })
    }

    /// Move a booking along its lifecycle.
    ///
    /// The write only applies if the status read here is still stored, so a
    /// stale request cannot revive a booking whose slot was released.
    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> AppResult<Booking> {
        let current = self.store.get_booking(id).await?;
        if current.status == status {
            return Ok(current);
        }
        check_transition(current.status, status)?;

        match self.store.update_booking_status(id, current.status, status).await? {
            Some(updated) => {
                tracing::info!(booking_id = %id, from = %current.status, to = %status, "Booking status changed");
                Ok(updated)
            }
            None => {
                tracing::info!(booking_id = %id, from = %current.status, to = %status, "Booking status changed concurrently");
                Err(AppError::BusinessRule(format!(
                    "Booking {} is no longer {}",
                    id, current.status
                )))
            }
        }
    }
}

/// Validate a request and derive the booking row: the end includes
/// processing time and the price is the sum of the service prices
pub(crate) async fn plan_booking(
    store: &dyn AvailabilityStore,
    request: CreateBooking,
) -> AppResult<NewBooking> {
    request.validate()?;

    let member = store.get_staff(request.staff_id).await?;
    let salon = store.get_salon(member.salon_id).await?;
    ensure_bookable(&salon, &member)?;

    let services = resolve_services(store, &salon, &request.service_ids).await?;
    let total = salon.rules().total_duration(service_minutes(&services));
    let duration = i32::try_from(total)
        .map_err(|_| AppError::BadRequest("Booking is too long".to_string()))?;
    let price: Decimal = services.iter().map(|s| s.price).sum();

    Ok(NewBooking {
        salon_id: salon.id,
        staff_id: member.id,
        service_ids: request.service_ids,
        client_id: request.client_id,
        start_time: request.start_time,
        end_time: request.start_time + Duration::minutes(total),
        price,
        duration,
        notes: request.notes,
    })
}

fn check_transition(from: BookingStatus, to: BookingStatus) -> AppResult<()> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::BusinessRule(format!(
            "Cannot change booking status from {} to {}",
            from, to
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{testing::open_day, AvailabilityError};
    use crate::models::{schedule::ScheduleOwner, Salon, Service, Staff};
    use crate::repository::{memory::MemoryStore, store::MockAvailabilityStore};
    use chrono::{DateTime, TimeZone, Utc};

    struct Fixture {
        salon: Salon,
        staff: Staff,
        cut: Service,
        colour: Service,
    }

    fn fixture(processing_time: i32) -> Fixture {
        let salon = Salon {
            id: Uuid::new_v4(),
            name: "Studio".to_string(),
            timezone: "Europe/Paris".to_string(),
            buffer_before: 10,
            buffer_after: 10,
            processing_time,
            created_at: Utc::now(),
            updated_at: None,
        };
        let staff = Staff {
            id: Uuid::new_v4(),
            salon_id: salon.id,
            name: "Sam".to_string(),
            is_active: true,
            has_own_schedule: false,
            created_at: Utc::now(),
        };
        let service = |name: &str, duration: i32, cents: i64| Service {
            id: Uuid::new_v4(),
            salon_id: salon.id,
            name: name.to_string(),
            category: None,
            duration,
            price: Decimal::new(cents, 2),
            is_active: true,
            created_at: Utc::now(),
        };
        let cut = service("Cut", 30, 2500);
        let colour = service("Colour", 45, 6000);
        Fixture { salon, staff, cut, colour }
    }

    fn memory_store(f: &Fixture) -> MemoryStore {
        let store = MemoryStore::new();
        store.put_salon(f.salon.clone());
        store.put_staff(f.staff.clone());
        store.put_service(f.cut.clone());
        store.put_service(f.colour.clone());
        // 2026-03-02 is a Monday
        store.put_schedule(
            ScheduleOwner::Salon(f.salon.id),
            open_day(&[("10:00", "12:00"), ("13:00", "19:00")]),
        );
        store
    }

    /// Paris wall-clock time on 2026-03-02 (UTC+1)
    fn paris(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, hour - 1, minute, 0).unwrap()
    }

    fn request(f: &Fixture, services: Vec<Uuid>, start: DateTime<Utc>) -> CreateBooking {
        CreateBooking {
            staff_id: f.staff.id,
            service_ids: services,
            client_id: Uuid::new_v4(),
            start_time: start,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_plan_sums_services_and_processing_time() {
        let f = fixture(15);
        let store = memory_store(&f);
        let planned = plan_booking(&store, request(&f, vec![f.cut.id, f.colour.id], paris(10, 0)))
            .await
            .unwrap();

        assert_eq!(planned.duration, 90);
        assert_eq!(planned.end_time - planned.start_time, Duration::minutes(90));
        assert_eq!(planned.price, Decimal::new(8500, 2));
        assert_eq!(planned.primary_service(), f.cut.id);
        assert_eq!(planned.salon_id, f.salon.id);
    }

    #[tokio::test]
    async fn test_plan_rejects_inactive_staff() {
        let mut f = fixture(0);
        f.staff.is_active = false;
        let store = memory_store(&f);
        let err = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn test_plan_rejects_empty_service_list() {
        let f = fixture(0);
        let store = memory_store(&f);
        let err = plan_booking(&store, request(&f, Vec::new(), paris(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_overlap_and_outside_hours() {
        let f = fixture(0);
        let store = memory_store(&f);

        let first = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let created = store.insert_booking(first).await.unwrap();
        assert_eq!(created.status, BookingStatus::Pending);

        // Starts inside the after-buffer of the first booking
        let clash = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 30))).await.unwrap();
        let err = store.insert_booking(clash).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Availability(AvailabilityError::SlotConflict { booking_id: Some(id) }) if id == created.id
        ));

        // Runs past the 12:00 lunch closing
        let late = plan_booking(&store, request(&f, vec![f.colour.id], paris(11, 30))).await.unwrap();
        let err = store.insert_booking(late).await.unwrap_err();
        assert!(matches!(err, AppError::Availability(AvailabilityError::OutsideWorkingHours)));

        let next = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 40))).await.unwrap();
        assert!(store.insert_booking(next).await.is_ok());
    }

    #[tokio::test]
    async fn test_canceled_bookings_free_the_slot() {
        let f = fixture(0);
        let store = memory_store(&f);
        let first = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let created = store.insert_booking(first).await.unwrap();

        let again = plan_booking(&store, request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        assert!(store.insert_booking(again.clone()).await.is_err());

        store.set_status(created.id, BookingStatus::Canceled);
        assert!(store.insert_booking(again).await.is_ok());
    }

    #[tokio::test]
    async fn test_staff_absence_window_blocks_booking() {
        let f = fixture(0);
        let store = memory_store(&f);
        store.put_closure(crate::models::ClosedDay {
            id: Uuid::new_v4(),
            owner_kind: "staff".to_string(),
            owner_id: f.staff.id,
            start_date: crate::availability::testing::date(),
            end_date: crate::availability::testing::date(),
            start_time: Some("15:00".to_string()),
            end_time: Some("17:00".to_string()),
            reason: Some("Training".to_string()),
            created_at: Utc::now(),
        });

        let during = plan_booking(&store, request(&f, vec![f.cut.id], paris(15, 30))).await.unwrap();
        let err = store.insert_booking(during).await.unwrap_err();
        assert!(matches!(err, AppError::Availability(AvailabilityError::OutsideWorkingHours)));

        let after = plan_booking(&store, request(&f, vec![f.cut.id], paris(17, 0))).await.unwrap();
        assert!(store.insert_booking(after).await.is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_bookings_exactly_one_wins() {
        let f = fixture(0);
        let store = Arc::new(memory_store(&f));
        let a = plan_booking(store.as_ref(), request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let b = plan_booking(store.as_ref(), request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();

        let (sa, sb) = (store.clone(), store.clone());
        let first = tokio::spawn(async move { sa.insert_booking(a).await });
        let second = tokio::spawn(async move { sb.insert_booking(b).await });
        let results = [first.await.unwrap(), second.await.unwrap()];

        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    Err(AppError::Availability(AvailabilityError::SlotConflict { .. }))
                )
            })
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(store.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_create_propagates_conflict_from_store() {
        let f = fixture(0);
        let mut store = MockAvailabilityStore::new();
        let staff = f.staff.clone();
        store.expect_get_staff().returning(move |_| Ok(staff.clone()));
        let salon = f.salon.clone();
        store.expect_get_salon().returning(move |_| Ok(salon.clone()));
        let cut = f.cut.clone();
        store.expect_get_service().returning(move |_| Ok(cut.clone()));
        store
            .expect_insert_booking()
            .times(1)
            .withf(|b| b.duration == 30)
            .returning(|_| Err(AvailabilityError::SlotConflict { booking_id: None }.into()));

        let service = service_over(Arc::new(store));

        let err = service
            .create_booking(request(&f, vec![f.cut.id], paris(10, 0)))
            .await
            .unwrap_err();
        assert!(err.is_slot_unavailable());
    }

    fn service_over(store: Arc<dyn AvailabilityStore>) -> BookingsService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let repository = Repository::new(pool, &crate::config::SchedulingConfig::default());
        BookingsService::new(repository, store)
    }

    #[tokio::test]
    async fn test_status_update_follows_lifecycle() {
        let f = fixture(0);
        let store = Arc::new(memory_store(&f));
        let planned = plan_booking(store.as_ref(), request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let created = store.insert_booking(planned).await.unwrap();
        let service = service_over(store.clone());

        let confirmed = service.update_status(created.id, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert!(confirmed.updated_at.is_some());

        let same = service.update_status(created.id, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(same.status, BookingStatus::Confirmed);

        let err = service.update_status(created.id, BookingStatus::Completed).await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn test_stale_status_cannot_revive_released_slot() {
        let f = fixture(0);
        let store = Arc::new(memory_store(&f));
        let planned = plan_booking(store.as_ref(), request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let first = store.insert_booking(planned).await.unwrap();

        // Another request cancels the booking and the slot is booked again
        store.set_status(first.id, BookingStatus::Canceled);
        let again = plan_booking(store.as_ref(), request(&f, vec![f.cut.id], paris(10, 0))).await.unwrap();
        let second = store.insert_booking(again).await.unwrap();

        // A confirmation that still believes the first booking is pending
        let stale = store
            .update_booking_status(first.id, BookingStatus::Pending, BookingStatus::Confirmed)
            .await
            .unwrap();
        assert!(stale.is_none());

        let active: Vec<Uuid> = store
            .bookings()
            .iter()
            .filter(|b| b.status.blocks_calendar())
            .map(|b| b.id)
            .collect();
        assert_eq!(active, vec![second.id]);
    }

    #[tokio::test]
    async fn test_status_changed_between_read_and_write_is_rejected() {
        let f = fixture(0);
        let planned = plan_booking(&memory_store(&f), request(&f, vec![f.cut.id], paris(10, 0)))
            .await
            .unwrap();
        let pending = Booking {
            id: Uuid::new_v4(),
            salon_id: planned.salon_id,
            staff_id: planned.staff_id,
            service_id: planned.primary_service(),
            client_id: planned.client_id,
            start_time: planned.start_time,
            end_time: planned.end_time,
            status: BookingStatus::Pending,
            price: planned.price,
            duration: planned.duration,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        let mut store = MockAvailabilityStore::new();
        let read = pending.clone();
        store.expect_get_booking().returning(move |_| Ok(read.clone()));
        store
            .expect_update_booking_status()
            .times(1)
            .withf(|_, expected, status| {
                *expected == BookingStatus::Pending && *status == BookingStatus::Confirmed
            })
            .returning(|_, _, _| Ok(None));

        let service = service_over(Arc::new(store));
        let err = service
            .update_status(pending.id, BookingStatus::Confirmed)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }

    #[test]
    fn test_transition_errors_are_business_rules() {
        assert!(check_transition(BookingStatus::Pending, BookingStatus::Confirmed).is_ok());
        let err = check_transition(BookingStatus::Completed, BookingStatus::Canceled).unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)));
    }
}
