//! Schedule API endpoints (weekly schedules, closures)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::schedule::{ClosedDay, ClosedDayQuery, CreateClosedDay, DaySchedule, UpsertDaySchedule},
};

// ---- Weekly schedules ----

/// Get a salon's weekly schedule
#[utoipa::path(
    get,
    path = "/salons/{id}/schedule",
    tag = "schedules",
    params(("id" = Uuid, Path, description = "Salon ID")),
    responses(
        (status = 200, description = "Configured weekdays, Sunday first", body = Vec<DaySchedule>)
    )
)]
pub async fn get_salon_schedule(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
) -> AppResult<Json<Vec<DaySchedule>>> {
    let owner = state.services.schedules.salon_owner(salon_id).await?;
    let week = state.services.schedules.week(owner).await?;
    Ok(Json(week))
}

/// Replace one weekday of a salon's schedule
#[utoipa::path(
    put,
    path = "/salons/{id}/schedule/{day}",
    tag = "schedules",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        ("day" = i16, Path, description = "Day of week (0=Sunday)")
    ),
    request_body = UpsertDaySchedule,
    responses(
        (status = 200, description = "Schedule day replaced", body = DaySchedule),
        (status = 400, description = "Invalid time format", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid or overlapping slots", body = crate::error::ErrorResponse)
    )
)]
pub async fn put_salon_schedule_day(
    State(state): State<crate::AppState>,
    Path((salon_id, day)): Path<(Uuid, i16)>,
    Json(data): Json<UpsertDaySchedule>,
) -> AppResult<Json<DaySchedule>> {
    let owner = state.services.schedules.salon_owner(salon_id).await?;
    let schedule = state.services.schedules.replace_day(owner, day, &data).await?;
    Ok(Json(schedule))
}

/// Get a staff member's own weekly schedule
#[utoipa::path(
    get,
    path = "/staff/{id}/schedule",
    tag = "schedules",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Configured weekdays, Sunday first", body = Vec<DaySchedule>)
    )
)]
pub async fn get_staff_schedule(
    State(state): State<crate::AppState>,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<Vec<DaySchedule>>> {
    let owner = state.services.schedules.staff_owner(staff_id).await?;
    let week = state.services.schedules.week(owner).await?;
    Ok(Json(week))
}

/// Replace one weekday of a staff member's own schedule
#[utoipa::path(
    put,
    path = "/staff/{id}/schedule/{day}",
    tag = "schedules",
    params(
        ("id" = Uuid, Path, description = "Staff ID"),
        ("day" = i16, Path, description = "Day of week (0=Sunday)")
    ),
    request_body = UpsertDaySchedule,
    responses(
        (status = 200, description = "Schedule day replaced", body = DaySchedule),
        (status = 400, description = "Invalid time format", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid or overlapping slots", body = crate::error::ErrorResponse)
    )
)]
pub async fn put_staff_schedule_day(
    State(state): State<crate::AppState>,
    Path((staff_id, day)): Path<(Uuid, i16)>,
    Json(data): Json<UpsertDaySchedule>,
) -> AppResult<Json<DaySchedule>> {
    let owner = state.services.schedules.staff_owner(staff_id).await?;
    let schedule = state.services.schedules.replace_day(owner, day, &data).await?;
    Ok(Json(schedule))
}

// ---- Closures ----

/// List salon closures
#[utoipa::path(
    get,
    path = "/salons/{id}/closures",
    tag = "schedules",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        ClosedDayQuery
    ),
    responses(
        (status = 200, description = "Closures", body = Vec<ClosedDay>)
    )
)]
pub async fn list_salon_closures(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Query(query): Query<ClosedDayQuery>,
) -> AppResult<Json<Vec<ClosedDay>>> {
    let owner = state.services.schedules.salon_owner(salon_id).await?;
    let closures = state.services.schedules.list_closures(owner, query.from, query.to).await?;
    Ok(Json(closures))
}

/// Close a salon for a date range (holiday, works)
#[utoipa::path(
    post,
    path = "/salons/{id}/closures",
    tag = "schedules",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = CreateClosedDay,
    responses(
        (status = 201, description = "Closure created", body = ClosedDay)
    )
)]
pub async fn create_salon_closure(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Json(data): Json<CreateClosedDay>,
) -> AppResult<(StatusCode, Json<ClosedDay>)> {
    let owner = state.services.schedules.salon_owner(salon_id).await?;
    let closure = state.services.schedules.create_closure(owner, &data).await?;
    Ok((StatusCode::CREATED, Json(closure)))
}

/// List absences of a staff member
#[utoipa::path(
    get,
    path = "/staff/{id}/closures",
    tag = "schedules",
    params(
        ("id" = Uuid, Path, description = "Staff ID"),
        ClosedDayQuery
    ),
    responses(
        (status = 200, description = "Closures", body = Vec<ClosedDay>)
    )
)]
pub async fn list_staff_closures(
    State(state): State<crate::AppState>,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<ClosedDayQuery>,
) -> AppResult<Json<Vec<ClosedDay>>> {
    let owner = state.services.schedules.staff_owner(staff_id).await?;
    let closures = state.services.schedules.list_closures(owner, query.from, query.to).await?;
    Ok(Json(closures))
}

/// Record an absence for a staff member
#[utoipa::path(
    post,
    path = "/staff/{id}/closures",
    tag = "schedules",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = CreateClosedDay,
    responses(
        (status = 201, description = "Closure created", body = ClosedDay)
    )
)]
pub async fn create_staff_closure(
    State(state): State<crate::AppState>,
    Path(staff_id): Path<Uuid>,
    Json(data): Json<CreateClosedDay>,
) -> AppResult<(StatusCode, Json<ClosedDay>)> {
    let owner = state.services.schedules.staff_owner(staff_id).await?;
    let closure = state.services.schedules.create_closure(owner, &data).await?;
    Ok((StatusCode::CREATED, Json(closure)))
}

/// Delete a closure
#[utoipa::path(
    delete,
    path = "/closures/{id}",
    tag = "schedules",
    params(("id" = Uuid, Path, description = "Closure ID")),
    responses(
        (status = 204, description = "Closure deleted"),
        (status = 404, description = "Closure not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_closure(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.schedules.delete_closure(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
