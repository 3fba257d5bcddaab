//! Schedules service (weekly schedules, closures)

use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::{
    availability::working_hours::check_slots,
    error::{AppError, AppResult},
    models::schedule::{
        ClosedDay, CreateClosedDay, DaySchedule, ScheduleOwner, UpsertDaySchedule,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve a salon ID into a schedule owner, checking it exists
    pub async fn salon_owner(&self, salon_id: Uuid) -> AppResult<ScheduleOwner> {
        self.repository.salons.get_by_id(salon_id).await?;
        Ok(ScheduleOwner::Salon(salon_id))
    }

    /// Resolve a staff ID into a schedule owner, checking it exists
    pub async fn staff_owner(&self, staff_id: Uuid) -> AppResult<ScheduleOwner> {
        self.repository.staff.get_by_id(staff_id).await?;
        Ok(ScheduleOwner::Staff(staff_id))
    }

    // ---- Weekly schedule ----

    pub async fn week(&self, owner: ScheduleOwner) -> AppResult<Vec<DaySchedule>> {
        self.repository.schedules.week(owner).await
    }

    /// Replace one weekday. Slots are validated even on a closed day so
    /// that reopening it later cannot surface bad data.
    pub async fn replace_day(
        &self,
        owner: ScheduleOwner,
        day_of_week: i16,
        data: &UpsertDaySchedule,
    ) -> AppResult<DaySchedule> {
        if !(0..=6).contains(&day_of_week) {
            return Err(AppError::BadRequest(format!(
                "Day of week must be between 0 (Sunday) and 6 (Saturday), got {}",
                day_of_week
            )));
        }
        data.validate()?;
        let slots = data.working_slots()?;
        check_slots(&slots)?;

        let day = self
            .repository
            .schedules
            .replace_day(owner, day_of_week, data.is_closed, &slots)
            .await?;
        tracing::info!(
            owner = owner.kind(),
            owner_id = %owner.id(),
            day_of_week,
            slots = day.slots.len(),
            is_closed = day.is_closed,
            "Schedule day replaced"
        );
        Ok(day)
    }

    // ---- Closures ----

    pub async fn list_closures(
        &self,
        owner: ScheduleOwner,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<ClosedDay>> {
        self.repository.schedules.list_closures(owner, from, to).await
    }

    pub async fn create_closure(&self, owner: ScheduleOwner, data: &CreateClosedDay) -> AppResult<ClosedDay> {
        data.validate()?;
        let end_date = closure_end(data)?;

        let closure = self.repository.schedules.create_closure(owner, data, end_date).await?;
        tracing::info!(
            closure_id = %closure.id,
            owner = owner.kind(),
            owner_id = %owner.id(),
            start = %closure.start_date,
            end = %closure.end_date,
            "Closure created"
        );
        Ok(closure)
    }

    pub async fn delete_closure(&self, id: Uuid) -> AppResult<()> {
        self.repository.schedules.delete_closure(id).await
    }
}

/// Check a closure request and return its last covered date
fn closure_end(data: &CreateClosedDay) -> AppResult<NaiveDate> {
    let end_date = data.end_date.unwrap_or(data.start_date);
    if end_date < data.start_date {
        return Err(AppError::BadRequest("end_date must not be before start_date".to_string()));
    }

    let probe = ClosedDay {
        id: Uuid::nil(),
        owner_kind: String::new(),
        owner_id: Uuid::nil(),
        start_date: data.start_date,
        end_date,
        start_time: data.start_time.clone(),
        end_time: data.end_time.clone(),
        reason: None,
        created_at: chrono::Utc::now(),
    };
    probe.window()?;
    Ok(end_date)
}
