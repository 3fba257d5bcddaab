//! Bookable service (haircut, colour, ...)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Service model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    /// Active work in minutes
    pub duration: i32,
    pub price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateService {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: String,
    #[validate(length(max = 60))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 720, message = "Duration must be 1 to 720 minutes"))]
    pub duration: i32,
    pub price: Decimal,
}

/// Update service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateService {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 60))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 720, message = "Duration must be 1 to 720 minutes"))]
    pub duration: Option<i32>,
    pub price: Option<Decimal>,
    pub is_active: Option<bool>,
}
