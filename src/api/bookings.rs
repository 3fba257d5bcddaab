//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::booking::{Booking, BookingPage, BookingQuery, CreateBooking, UpdateBookingStatus},
};

/// Booking with its ordered service list
#[derive(Serialize, ToSchema)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub service_ids: Vec<Uuid>,
}

/// Book a staff member
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Staff or service not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Time conflicts with another booking", body = crate::error::ErrorResponse),
        (status = 422, description = "Time is outside working hours", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    let booking = state.services.bookings.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(BookingQuery),
    responses(
        (status = 200, description = "Page of bookings", body = BookingPage)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    Query(query): Query<BookingQuery>,
) -> AppResult<Json<BookingPage>> {
    let page = state.services.bookings.list_bookings(query).await?;
    Ok(Json(page))
}

/// Get a booking
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = BookingDetails),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state.services.bookings.get_booking(id).await?;
    let service_ids = state.services.bookings.booking_services(id).await?;
    Ok(Json(BookingDetails { booking, service_ids }))
}

/// Change a booking's status
#[utoipa::path(
    put,
    path = "/bookings/{id}/status",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatus,
    responses(
        (status = 200, description = "Status updated", body = Booking),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Transition not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_booking_status(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateBookingStatus>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.update_status(id, data.status).await?;
    Ok(Json(booking))
}
