//! Error types for the salon booking server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::availability::AvailabilityError;

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 3,
    NotFound = 5,
    BadValue = 18,
    InvalidTimeFormat = 30,
    InvalidSchedule = 31,
    OverlappingScheduleSlots = 32,
    SlotConflict = 33,
    OutsideWorkingHours = 34,
    BusinessRule = 35,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),
}

impl AppError {
    /// True when the caller should re-fetch availability and pick another time
    pub fn is_slot_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::Availability(
                AvailabilityError::SlotConflict { .. } | AvailabilityError::OutsideWorkingHours
            )
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NotFound, msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
            AppError::BusinessRule(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::BusinessRule,
                msg.clone(),
            ),
            AppError::Availability(e) => {
                let (status, code) = match e {
                    AvailabilityError::InvalidTimeFormat(_) => {
                        (StatusCode::BAD_REQUEST, ErrorCode::InvalidTimeFormat)
                    }
                    AvailabilityError::UnknownTimezone(_) => {
                        (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
                    }
                    AvailabilityError::InvalidScheduleSlot { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InvalidSchedule)
                    }
                    AvailabilityError::OverlappingScheduleSlots { .. } => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ErrorCode::OverlappingScheduleSlots,
                    ),
                    AvailabilityError::SlotConflict { .. } => {
                        (StatusCode::CONFLICT, ErrorCode::SlotConflict)
                    }
                    AvailabilityError::OutsideWorkingHours => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ErrorCode::OutsideWorkingHours,
                    ),
                };
                (status, code, e.to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
