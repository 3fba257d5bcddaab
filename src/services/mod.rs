//! Business logic services

pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod salons;
pub mod schedules;
pub mod stats;

use std::sync::Arc;

use crate::{
    config::SchedulingConfig,
    repository::{AvailabilityStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub salons: salons::SalonsService,
    pub catalog: catalog::CatalogService,
    pub schedules: schedules::SchedulesService,
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingsService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, scheduling: &SchedulingConfig) -> Self {
        let store: Arc<dyn AvailabilityStore> = Arc::new(repository.clone());
        Self {
            salons: salons::SalonsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            schedules: schedules::SchedulesService::new(repository.clone()),
            availability: availability::AvailabilityService::new(
                store.clone(),
                scheduling.slot_granularity_minutes,
            ),
            bookings: bookings::BookingsService::new(repository.clone(), store),
            stats: stats::StatsService::new(repository.clone(), scheduling.max_range_days),
            repository,
        }
    }

    /// Database round-trip for readiness probes
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
