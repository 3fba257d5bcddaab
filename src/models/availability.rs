//! Availability query and response types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::availability::{conflicts::IntegrityOverlap, TimeOfDay};
use crate::error::{AppError, AppResult};

/// Query parameters for salon availability
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityQuery {
    /// Local date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Comma-separated service IDs
    pub service_ids: String,
    /// Restrict to one staff member
    pub staff_id: Option<Uuid>,
}

impl AvailabilityQuery {
    pub fn parse_service_ids(&self) -> AppResult<Vec<Uuid>> {
        let ids = self
            .service_ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                Uuid::parse_str(s)
                    .map_err(|_| AppError::BadRequest(format!("Invalid service id '{}'", s)))
            })
            .collect::<AppResult<Vec<_>>>()?;
        if ids.is_empty() {
            return Err(AppError::BadRequest("At least one service id is required".to_string()));
        }
        Ok(ids)
    }
}

/// Bookable start times for one staff member
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffAvailability {
    pub staff_id: Uuid,
    pub staff_name: String,
    /// Start times (HH:MM, salon-local)
    #[schema(value_type = Vec<String>)]
    pub slots: Vec<TimeOfDay>,
    /// Pairs of stored bookings that overlap; present only when data is inconsistent
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub integrity_warnings: Vec<IntegrityOverlap>,
}

/// Availability for a salon on one date
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub salon_id: Uuid,
    pub date: NaiveDate,
    pub timezone: String,
    pub granularity_minutes: i64,
    /// Service minutes plus processing time
    pub total_duration_minutes: i64,
    pub staff: Vec<StaffAvailability>,
}

/// Query parameters for working hours
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct WorkingHoursQuery {
    /// Local date (YYYY-MM-DD)
    pub date: NaiveDate,
}

/// An open range on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OpenInterval {
    #[schema(value_type = String, example = "09:00")]
    pub start: TimeOfDay,
    #[schema(value_type = String, example = "12:00")]
    pub end: TimeOfDay,
}

/// Resolved working hours of a staff member
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkingHoursResponse {
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub intervals: Vec<OpenInterval>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(ids: &str) -> AvailabilityQuery {
        AvailabilityQuery {
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            service_ids: ids.to_string(),
            staff_id: None,
        }
    }

    #[test]
    fn test_parse_service_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parsed = query(&format!("{}, {},", a, b)).parse_service_ids().unwrap();
        assert_eq!(parsed, vec![a, b]);
    }

    #[test]
    fn test_parse_service_ids_rejects_garbage() {
        assert!(matches!(query("nope").parse_service_ids(), Err(AppError::BadRequest(_))));
        assert!(matches!(query(" , ").parse_service_ids(), Err(AppError::BadRequest(_))));
    }
}
