//! Salon and staff management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    availability::parse_timezone,
    error::AppResult,
    models::{
        salon::{CreateSalon, Salon, UpdateSalon},
        staff::{CreateStaff, Staff, UpdateStaff},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SalonsService {
    repository: Repository,
}

impl SalonsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Salons ----

    pub async fn list_salons(&self) -> AppResult<Vec<Salon>> {
        self.repository.salons.list().await
    }

    pub async fn get_salon(&self, id: Uuid) -> AppResult<Salon> {
        self.repository.salons.get_by_id(id).await
    }

    /// Create a salon; the timezone defaults to UTC and must be a known IANA name
    pub async fn create_salon(&self, data: &CreateSalon) -> AppResult<Salon> {
        data.validate()?;
        let timezone = data.timezone.as_deref().unwrap_or("UTC");
        parse_timezone(timezone)?;

        let salon = self.repository.salons.create(data, timezone).await?;
        tracing::info!(salon_id = %salon.id, timezone = %salon.timezone, "Salon created");
        Ok(salon)
    }

    pub async fn update_salon(&self, id: Uuid, data: &UpdateSalon) -> AppResult<Salon> {
        data.validate()?;
        if let Some(ref tz) = data.timezone {
            parse_timezone(tz)?;
        }
        self.repository.salons.update(id, data).await
    }

    // ---- Staff ----

    pub async fn list_staff(&self, salon_id: Uuid, active_only: bool) -> AppResult<Vec<Staff>> {
        self.repository.salons.get_by_id(salon_id).await?;
        self.repository.staff.list_by_salon(salon_id, active_only).await
    }

    pub async fn get_staff(&self, id: Uuid) -> AppResult<Staff> {
        self.repository.staff.get_by_id(id).await
    }

    pub async fn create_staff(&self, salon_id: Uuid, data: &CreateStaff) -> AppResult<Staff> {
        data.validate()?;
        self.repository.salons.get_by_id(salon_id).await?;

        let staff = self.repository.staff.create(salon_id, data).await?;
        tracing::info!(staff_id = %staff.id, %salon_id, "Staff member created");
        Ok(staff)
    }

    /// Update a staff member. Deactivating does not touch existing bookings.
    pub async fn update_staff(&self, id: Uuid, data: &UpdateStaff) -> AppResult<Staff> {
        data.validate()?;
        self.repository.staff.update(id, data).await
    }
}
