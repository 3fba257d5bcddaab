//! Service catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::salons::ActiveFilter;
use crate::{
    error::AppResult,
    models::service::{CreateService, Service, UpdateService},
};

/// List services offered by a salon
#[utoipa::path(
    get,
    path = "/salons/{id}/services",
    tag = "services",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        ActiveFilter
    ),
    responses(
        (status = 200, description = "Services", body = Vec<Service>)
    )
)]
pub async fn list_services(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Query(filter): Query<ActiveFilter>,
) -> AppResult<Json<Vec<Service>>> {
    let services = state
        .services
        .catalog
        .list_services(salon_id, filter.active_only.unwrap_or(true))
        .await?;
    Ok(Json(services))
}

/// Add a service to a salon's catalog
#[utoipa::path(
    post,
    path = "/salons/{id}/services",
    tag = "services",
    params(("id" = Uuid, Path, description = "Salon ID")),
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 404, description = "Salon not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Json(data): Json<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let service = state.services.catalog.create_service(salon_id, &data).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Get a service
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_service(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Service>> {
    let service = state.services.catalog.get_service(id).await?;
    Ok(Json(service))
}

/// Update a service (duration, price, category, active flag)
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateService>,
) -> AppResult<Json<Service>> {
    let service = state.services.catalog.update_service(id, &data).await?;
    Ok(Json(service))
}
