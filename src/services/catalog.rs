//! Service catalog (what a salon offers and for how long)

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::service::{CreateService, Service, UpdateService},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_services(&self, salon_id: Uuid, active_only: bool) -> AppResult<Vec<Service>> {
        self.repository.salons.get_by_id(salon_id).await?;
        self.repository.services.list_by_salon(salon_id, active_only).await
    }

    pub async fn get_service(&self, id: Uuid) -> AppResult<Service> {
        self.repository.services.get_by_id(id).await
    }

    pub async fn create_service(&self, salon_id: Uuid, data: &CreateService) -> AppResult<Service> {
        data.validate()?;
        check_price(data.price)?;
        self.repository.salons.get_by_id(salon_id).await?;

        let service = self.repository.services.create(salon_id, data).await?;
        tracing::info!(service_id = %service.id, %salon_id, duration = service.duration, "Service created");
        Ok(service)
    }

    pub async fn update_service(&self, id: Uuid, data: &UpdateService) -> AppResult<Service> {
        data.validate()?;
        if let Some(price) = data.price {
            check_price(price)?;
        }
        self.repository.services.update(id, data).await
    }
}

fn check_price(price: rust_decimal::Decimal) -> AppResult<()> {
    if price.is_sign_negative() {
        return Err(AppError::Validation("price: must not be negative".to_string()));
    }
    Ok(())
}
