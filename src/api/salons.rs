//! Salon and staff endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        salon::{CreateSalon, Salon, UpdateSalon},
        staff::{CreateStaff, Staff, UpdateStaff},
    },
};

/// Filter for listing staff or services
#[derive(Debug, Deserialize, IntoParams)]
pub struct ActiveFilter {
    /// Only return active entries (default true)
    pub active_only: Option<bool>,
}

// ---- Salons ----

/// List salons
#[utoipa::path(
    get,
    path = "/salons",
    tag = "salons",
    responses(
        (status = 200, description = "All salons", body = Vec<Salon>)
    )
)]
pub async fn list_salons(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Salon>>> {
    let salons = state.services.salons.list_salons().await?;
    Ok(Json(salons))
}

/// Create a salon
#[utoipa::path(
    post,
    path = "/salons",
    tag = "salons",
    request_body = CreateSalon,
    responses(
        (status = 201, description = "Salon created", body = Salon),
        (status = 400, description = "Invalid timezone", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_salon(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateSalon>,
) -> AppResult<(StatusCode, Json<Salon>)> {
    let salon = state.services.salons.create_salon(&data).await?;
    Ok((StatusCode::CREATED, Json(salon)))
}

/// Get a salon
#[utoipa::path(
    get,
    path = "/salons/{id}",
    tag = "salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    responses(
        (status = 200, description = "Salon details", body = Salon),
        (status = 404, description = "Salon not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_salon(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Salon>> {
    let salon = state.services.salons.get_salon(id).await?;
    Ok(Json(salon))
}

/// Update a salon (name, timezone, buffers, processing time)
#[utoipa::path(
    put,
    path = "/salons/{id}",
    tag = "salons",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = UpdateSalon,
    responses(
        (status = 200, description = "Salon updated", body = Salon),
        (status = 404, description = "Salon not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_salon(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateSalon>,
) -> AppResult<Json<Salon>> {
    let salon = state.services.salons.update_salon(id, &data).await?;
    Ok(Json(salon))
}

// ---- Staff ----

/// List staff of a salon
#[utoipa::path(
    get,
    path = "/salons/{id}/staff",
    tag = "staff",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        ActiveFilter
    ),
    responses(
        (status = 200, description = "Staff members", body = Vec<Staff>)
    )
)]
pub async fn list_staff(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Query(filter): Query<ActiveFilter>,
) -> AppResult<Json<Vec<Staff>>> {
    let staff = state
        .services
        .salons
        .list_staff(salon_id, filter.active_only.unwrap_or(true))
        .await?;
    Ok(Json(staff))
}

/// Add a staff member to a salon
#[utoipa::path(
    post,
    path = "/salons/{id}/staff",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff member created", body = Staff),
        (status = 404, description = "Salon not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_staff(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Json(data): Json<CreateStaff>,
) -> AppResult<(StatusCode, Json<Staff>)> {
    let staff = state.services.salons.create_staff(salon_id, &data).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

/// Get a staff member
#[utoipa::path(
    get,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    responses(
        (status = 200, description = "Staff member", body = Staff),
        (status = 404, description = "Staff not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_staff(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Staff>> {
    let staff = state.services.salons.get_staff(id).await?;
    Ok(Json(staff))
}

/// Update a staff member
#[utoipa::path(
    put,
    path = "/staff/{id}",
    tag = "staff",
    params(("id" = Uuid, Path, description = "Staff ID")),
    request_body = UpdateStaff,
    responses(
        (status = 200, description = "Staff member updated", body = Staff),
        (status = 404, description = "Staff not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_staff(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateStaff>,
) -> AppResult<Json<Staff>> {
    let staff = state.services.salons.update_staff(id, &data).await?;
    Ok(Json(staff))
}
