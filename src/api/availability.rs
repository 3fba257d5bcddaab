//! Availability endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::availability::{
        AvailabilityQuery, AvailabilityResponse, WorkingHoursQuery, WorkingHoursResponse,
    },
};

/// Bookable start times for a date and a set of services
///
/// Advisory only: a slot listed here can be taken before the client books it.
#[utoipa::path(
    get,
    path = "/salons/{id}/availability",
    tag = "availability",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Start times per staff member", body = AvailabilityResponse),
        (status = 400, description = "Invalid service list", body = crate::error::ErrorResponse),
        (status = 404, description = "Salon, staff or service not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Stored schedule is inconsistent", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let response = state
        .services
        .availability
        .salon_availability(salon_id, &query, Utc::now())
        .await?;
    Ok(Json(response))
}

/// Resolved open intervals of a staff member for a date
#[utoipa::path(
    get,
    path = "/staff/{id}/working-hours",
    tag = "availability",
    params(
        ("id" = Uuid, Path, description = "Staff ID"),
        WorkingHoursQuery
    ),
    responses(
        (status = 200, description = "Open intervals", body = WorkingHoursResponse),
        (status = 404, description = "Staff not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_working_hours(
    State(state): State<crate::AppState>,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<WorkingHoursQuery>,
) -> AppResult<Json<WorkingHoursResponse>> {
    let response = state
        .services
        .availability
        .working_hours(staff_id, query.date)
        .await?;
    Ok(Json(response))
}
