//! Staff model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::schedule::ScheduleOwner;

/// Staff member from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub name: String,
    pub is_active: bool,
    /// Uses its own weekly schedule instead of the salon's
    pub has_own_schedule: bool,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    /// Owner of the weekly schedule that governs this staff member
    pub fn schedule_owner(&self) -> ScheduleOwner {
        if self.has_own_schedule {
            ScheduleOwner::Staff(self.id)
        } else {
            ScheduleOwner::Salon(self.salon_id)
        }
    }

    /// Owners whose closures apply to this staff member
    pub fn closure_owners(&self) -> [ScheduleOwner; 2] {
        [ScheduleOwner::Salon(self.salon_id), ScheduleOwner::Staff(self.id)]
    }
}

/// Create staff request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaff {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: String,
    #[serde(default)]
    pub has_own_schedule: bool,
}

/// Update staff request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStaff {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub has_own_schedule: Option<bool>,
}
