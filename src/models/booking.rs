//! Booking model and related types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Canceled,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Canceled,
        BookingStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Canceled => "CANCELED",
            BookingStatus::NoShow => "NO_SHOW",
        }
    }

    /// Whether a booking in this status still holds the staff member's time
    pub fn blocks_calendar(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Canceled | BookingStatus::NoShow
        )
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Canceled)
                | (Confirmed, InProgress)
                | (Confirmed, Canceled)
                | (Confirmed, NoShow)
                | (InProgress, Completed)
                | (InProgress, NoShow)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid booking status: {}", s))
    }
}

// SQLx conversion for BookingStatus (stored as TEXT)
impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

/// Booking model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    /// First booked service
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: DateTime<Utc>,
    /// End of the booking, processing time included
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub price: Decimal,
    /// Total minutes, processing time included
    pub duration: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated booking ready for insertion
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub salon_id: Uuid,
    pub staff_id: Uuid,
    pub service_ids: Vec<Uuid>,
    pub client_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
    pub duration: i32,
    pub notes: Option<String>,
}

impl NewBooking {
    pub fn primary_service(&self) -> Uuid {
        self.service_ids.first().copied().unwrap_or_default()
    }
}

/// Create booking request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBooking {
    pub staff_id: Uuid,
    #[validate(length(min = 1, max = 8, message = "Between 1 and 8 services per booking"))]
    pub service_ids: Vec<Uuid>,
    pub client_id: Uuid,
    /// Requested start (ISO 8601)
    pub start_time: DateTime<Utc>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingStatus {
    pub status: BookingStatus,
}

/// Query parameters for listing bookings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookingQuery {
    pub salon_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    /// Bookings ending after this instant
    pub from: Option<DateTime<Utc>>,
    /// Bookings starting before this instant
    pub to: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Paginated booking list
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Query parameters for booking statistics
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookingStatsQuery {
    /// First local date (YYYY-MM-DD)
    pub from: NaiveDate,
    /// Last local date, inclusive (YYYY-MM-DD)
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: i64,
}

/// Booking activity summary for a salon dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingStats {
    pub salon_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    /// Sum of prices of completed bookings
    pub completed_revenue: Decimal,
    /// Minutes held by bookings that were not canceled or missed
    pub booked_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("IN_PROGRESS".parse::<BookingStatus>(), Ok(BookingStatus::InProgress));
        assert_eq!("no_show".parse::<BookingStatus>(), Ok(BookingStatus::NoShow));
        assert!("LATE".parse::<BookingStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
    }

    #[test]
    fn test_only_live_statuses_block() {
        let blocking: Vec<_> = BookingStatus::ALL
            .into_iter()
            .filter(BookingStatus::blocks_calendar)
            .collect();
        assert_eq!(
            blocking,
            vec![BookingStatus::Pending, BookingStatus::Confirmed, BookingStatus::InProgress]
        );
    }

    #[test]
    fn test_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(!Canceled.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Canceled));
        assert!(!Pending.can_transition_to(Completed));
        for terminal in [Completed, Canceled, NoShow] {
            assert!(terminal.is_terminal());
            assert!(BookingStatus::ALL.iter().all(|s| !terminal.can_transition_to(*s)));
        }
    }
}
