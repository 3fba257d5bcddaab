//! Statistics endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::booking::{BookingStats, BookingStatsQuery},
};

/// Booking activity of a salon between two local dates (inclusive)
#[utoipa::path(
    get,
    path = "/salons/{id}/stats",
    tag = "stats",
    params(
        ("id" = Uuid, Path, description = "Salon ID"),
        BookingStatsQuery
    ),
    responses(
        (status = 200, description = "Booking statistics", body = BookingStats),
        (status = 400, description = "Invalid or too wide date range", body = crate::error::ErrorResponse),
        (status = 404, description = "Salon not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_booking_stats(
    State(state): State<crate::AppState>,
    Path(salon_id): Path<Uuid>,
    Query(query): Query<BookingStatsQuery>,
) -> AppResult<Json<BookingStats>> {
    let stats = state.services.stats.booking_stats(salon_id, &query).await?;
    Ok(Json(stats))
}
