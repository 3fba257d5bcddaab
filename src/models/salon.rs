//! Salon model and related types

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::availability::{parse_timezone, AvailabilityError, BookingRules};

/// Salon model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Salon {
    pub id: Uuid,
    pub name: String,
    /// IANA timezone name, e.g. "Europe/Paris"
    pub timezone: String,
    /// Minutes kept free before each booking
    pub buffer_before: i32,
    /// Minutes kept free after each booking
    pub buffer_after: i32,
    /// Unattended minutes added to every booking
    pub processing_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Salon {
    pub fn tz(&self) -> Result<Tz, AvailabilityError> {
        parse_timezone(&self.timezone)
    }

    pub fn rules(&self) -> BookingRules {
        BookingRules {
            buffer_before: i64::from(self.buffer_before),
            buffer_after: i64::from(self.buffer_after),
            processing_time: i64::from(self.processing_time),
        }
    }
}

/// Create salon request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSalon {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: String,
    /// IANA timezone name (defaults to UTC)
    pub timezone: Option<String>,
    #[validate(range(min = 0, max = 240))]
    pub buffer_before: Option<i32>,
    #[validate(range(min = 0, max = 240))]
    pub buffer_after: Option<i32>,
    #[validate(range(min = 0, max = 480))]
    pub processing_time: Option<i32>,
}

/// Update salon request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSalon {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: Option<String>,
    pub timezone: Option<String>,
    #[validate(range(min = 0, max = 240))]
    pub buffer_before: Option<i32>,
    #[validate(range(min = 0, max = 240))]
    pub buffer_after: Option<i32>,
    #[validate(range(min = 0, max = 480))]
    pub processing_time: Option<i32>,
}
