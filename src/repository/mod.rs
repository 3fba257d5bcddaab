//! Repository layer for database operations

pub mod bookings;
#[cfg(test)]
pub mod memory;
pub mod salons;
pub mod schedules;
pub mod services;
pub mod staff;
pub mod store;

use sqlx::{Pool, Postgres};

use crate::config::SchedulingConfig;

pub use store::AvailabilityStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub salons: salons::SalonsRepository,
    pub staff: staff::StaffRepository,
    pub services: services::ServicesRepository,
    pub schedules: schedules::SchedulesRepository,
    pub bookings: bookings::BookingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>, scheduling: &SchedulingConfig) -> Self {
        Self {
            salons: salons::SalonsRepository::new(pool.clone()),
            staff: staff::StaffRepository::new(pool.clone()),
            services: services::ServicesRepository::new(pool.clone()),
            schedules: schedules::SchedulesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone(), scheduling.booking_retry_attempts),
            pool,
        }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
