//! Availability service: loads day inputs through the store and runs the engine

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    availability::{self, conflicts, DayInputs, TimeOfDay},
    error::{AppError, AppResult},
    models::{
        availability::{
            AvailabilityQuery, AvailabilityResponse, OpenInterval, StaffAvailability,
            WorkingHoursResponse,
        },
        schedule::{day_of_week, DateRange},
        Salon, Service, Staff,
    },
    repository::AvailabilityStore,
};

#[derive(Clone)]
pub struct AvailabilityService {
    store: Arc<dyn AvailabilityStore>,
    granularity: i64,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AvailabilityStore>, granularity: i64) -> Self {
        Self { store, granularity }
    }

    /// Candidate start times per staff member for the requested services.
    ///
    /// Starts earlier than `now` are dropped; `now` is passed in so the
    /// result is reproducible for a given instant.
    pub async fn salon_availability(
        &self,
        salon_id: Uuid,
        query: &AvailabilityQuery,
        now: DateTime<Utc>,
    ) -> AppResult<AvailabilityResponse> {
        let salon = self.store.get_salon(salon_id).await?;
        let tz = salon.tz()?;
        let service_ids = query.parse_service_ids()?;
        let services = resolve_services(self.store.as_ref(), &salon, &service_ids).await?;
        let total = salon.rules().total_duration(service_minutes(&services));

        let members = match query.staff_id {
            Some(staff_id) => {
                let member = self.store.get_staff(staff_id).await?;
                ensure_bookable(&salon, &member)?;
                vec![member]
            }
            None => self.store.list_active_staff(salon.id).await?,
        };

        let mut staff = Vec::with_capacity(members.len());
        for member in members {
            let inputs = load_day_inputs(self.store.as_ref(), &salon, &member, query.date).await?;
            let list = availability::available_slots(&inputs, total, self.granularity)?;
            let slots = drop_past(list.slots, query.date, tz, now);
            staff.push(StaffAvailability {
                staff_id: member.id,
                staff_name: member.name,
                slots,
                integrity_warnings: list.integrity_overlaps,
            });
        }

        tracing::debug!(
            salon_id = %salon.id,
            date = %query.date,
            total_duration = total,
            staff = staff.len(),
            "Computed availability"
        );

        Ok(AvailabilityResponse {
            salon_id: salon.id,
            date: query.date,
            timezone: salon.timezone,
            granularity_minutes: self.granularity,
            total_duration_minutes: total,
            staff,
        })
    }

    /// Resolved open intervals of one staff member on a local date
    pub async fn working_hours(&self, staff_id: Uuid, date: NaiveDate) -> AppResult<WorkingHoursResponse> {
        let member = self.store.get_staff(staff_id).await?;
        let salon = self.store.get_salon(member.salon_id).await?;
        let owner = member.schedule_owner();
        let schedule = self.store.get_schedule_for_day(owner, day_of_week(date)).await?;
        let closures = self
            .store
            .get_closed_days(&member.closure_owners(), DateRange::single(date))
            .await?;

        let intervals = availability::working_hours::resolve(date, schedule.as_ref(), &closures)?
            .into_iter()
            .filter_map(|i| {
                // Schedule slots end at 23:59 at the latest
                Some(OpenInterval {
                    start: TimeOfDay::from_minutes(i.start)?,
                    end: TimeOfDay::from_minutes(i.end)?,
                })
            })
            .collect();

        tracing::debug!(staff_id = %member.id, salon_id = %salon.id, %date, "Resolved working hours");

        Ok(WorkingHoursResponse {
            staff_id: member.id,
            date,
            intervals,
        })
    }
}

/// Point-in-time reads for one staff member and local date
pub(crate) async fn load_day_inputs(
    store: &dyn AvailabilityStore,
    salon: &Salon,
    member: &Staff,
    date: NaiveDate,
) -> AppResult<DayInputs> {
    let tz = salon.tz()?;
    let rules = salon.rules();
    let schedule = store
        .get_schedule_for_day(member.schedule_owner(), day_of_week(date))
        .await?;
    let closures = store
        .get_closed_days(&member.closure_owners(), DateRange::single(date))
        .await?;
    let (from, to) = conflicts::query_window(date, tz, rules);
    let bookings = store.get_active_bookings(member.id, from, to).await?;

    Ok(DayInputs {
        date,
        tz,
        rules,
        schedule,
        closures,
        bookings,
    })
}

/// Load the requested services, each of which must be active and offered by `salon`
pub(crate) async fn resolve_services(
    store: &dyn AvailabilityStore,
    salon: &Salon,
    ids: &[Uuid],
) -> AppResult<Vec<Service>> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("At least one service is required".to_string()));
    }
    let mut services = Vec::with_capacity(ids.len());
    for id in ids {
        let service = store.get_service(*id).await?;
        if service.salon_id != salon.id {
            return Err(AppError::BadRequest(format!(
                "Service {} is not offered by salon {}",
                service.id, salon.id
            )));
        }
        if !service.is_active {
            return Err(AppError::BusinessRule(format!("Service {} is not active", service.id)));
        }
        services.push(service);
    }
    Ok(services)
}

pub(crate) fn service_minutes(services: &[Service]) -> i64 {
    services.iter().map(|s| i64::from(s.duration)).sum()
}

/// A staff member can take bookings for `salon`
pub(crate) fn ensure_bookable(salon: &Salon, member: &Staff) -> AppResult<()> {
    if member.salon_id != salon.id {
        return Err(AppError::BadRequest(format!(
            "Staff {} does not work at salon {}",
            member.id, salon.id
        )));
    }
    if !member.is_active {
        return Err(AppError::BusinessRule(format!("Staff {} is not active", member.id)));
    }
    Ok(())
}

fn drop_past(
    slots: Vec<TimeOfDay>,
    date: NaiveDate,
    tz: chrono_tz::Tz,
    now: DateTime<Utc>,
) -> Vec<TimeOfDay> {
    slots
        .into_iter()
        .filter(|slot| match availability::slot_instant(date, tz, slot.minutes()) {
            Some(instant) => instant >= now,
            None => false,
        })
        .collect()
}
