//! Bookings repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::{salons, schedules, staff};
use crate::{
    availability::{self, conflicts, AvailabilityError, DayInputs},
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingQuery, BookingStatus, NewBooking, StatusCount},
        schedule::{day_of_week, DateRange},
    },
};

const ACTIVE_STATUSES: &str = "('PENDING', 'CONFIRMED', 'IN_PROGRESS')";

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
    retry_attempts: u32,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>, retry_attempts: u32) -> Self {
        Self {
            pool,
            retry_attempts: retry_attempts.max(1),
        }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Service IDs of a booking in booking order
    pub async fn service_ids(&self, booking_id: Uuid) -> AppResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT service_id FROM booking_services WHERE booking_id = $1 ORDER BY position",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// List bookings with optional filters and pagination
    pub async fn list(&self, query: &BookingQuery) -> AppResult<(Vec<Booking>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * per_page;

        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.salon_id.is_some() { conditions.push(format!("salon_id = ${}", idx)); idx += 1; }
        if query.staff_id.is_some() { conditions.push(format!("staff_id = ${}", idx)); idx += 1; }
        if query.client_id.is_some() { conditions.push(format!("client_id = ${}", idx)); idx += 1; }
        if query.from.is_some() { conditions.push(format!("end_time > ${}", idx)); idx += 1; }
        if query.to.is_some() { conditions.push(format!("start_time < ${}", idx)); idx += 1; }
        if query.status.is_some() { conditions.push(format!("status = ${}", idx)); }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_q = format!("SELECT COUNT(*) FROM bookings {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(v) = query.salon_id { count_builder = count_builder.bind(v); }
        if let Some(v) = query.staff_id { count_builder = count_builder.bind(v); }
        if let Some(v) = query.client_id { count_builder = count_builder.bind(v); }
        if let Some(v) = query.from { count_builder = count_builder.bind(v); }
        if let Some(v) = query.to { count_builder = count_builder.bind(v); }
        if let Some(v) = query.status { count_builder = count_builder.bind(v); }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT * FROM bookings {} ORDER BY start_time LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Booking>(&select_q);
        if let Some(v) = query.salon_id { builder = builder.bind(v); }
        if let Some(v) = query.staff_id { builder = builder.bind(v); }
        if let Some(v) = query.client_id { builder = builder.bind(v); }
        if let Some(v) = query.from { builder = builder.bind(v); }
        if let Some(v) = query.to { builder = builder.bind(v); }
        if let Some(v) = query.status { builder = builder.bind(v); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// Calendar-blocking bookings of a staff member intersecting `[from, to)`
    pub async fn active_for_staff(
        &self,
        staff_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let mut conn = self.pool.acquire().await?;
        load_active(&mut conn, staff_id, from, to).await
    }

    /// Insert a booking after re-validating it inside a serializable
    /// transaction. Serialization failures are retried; once attempts are
    /// exhausted the booking is reported as conflicting.
    pub async fn create_checked(&self, booking: &NewBooking) -> AppResult<Booking> {
        let mut attempt = 1;
        loop {
            match self.try_create(booking).await {
                Err(AppError::Database(e)) if is_serialization_failure(&e) => {
                    if attempt >= self.retry_attempts {
                        tracing::info!(
                            staff_id = %booking.staff_id,
                            attempts = attempt,
                            "Booking lost serialization race"
                        );
                        return Err(AvailabilityError::SlotConflict { booking_id: None }.into());
                    }
                    tracing::debug!(staff_id = %booking.staff_id, attempt, "Retrying booking transaction");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn try_create(&self, booking: &NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let inputs = load_day_inputs(&mut tx, booking).await?;
        availability::authorize_booking(&inputs, booking.start_time, booking.end_time)?;

        let row = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, salon_id, staff_id, service_id, client_id,
                                  start_time, end_time, status, price, duration, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking.salon_id)
        .bind(booking.staff_id)
        .bind(booking.primary_service())
        .bind(booking.client_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(BookingStatus::Pending)
        .bind(booking.price)
        .bind(booking.duration)
        .bind(&booking.notes)
        .fetch_one(&mut *tx)
        .await?;

        for (position, service_id) in booking.service_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO booking_services (booking_id, service_id, position) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(service_id)
            .bind(position as i16)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Set a booking's status if it still holds `expected`; `None` when
    /// another writer changed it first
    pub async fn update_status(
        &self,
        id: Uuid,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(expected)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ---- Stats ----

    /// Booking counts per status for bookings starting in `[from, to)`
    pub async fn count_by_status(
        &self,
        salon_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<StatusCount>> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM bookings
            WHERE salon_id = $1 AND start_time >= $2 AND start_time < $3
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(salon_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Completed revenue and minutes held by non-canceled bookings in `[from, to)`
    pub async fn activity_totals(
        &self,
        salon_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<(Decimal, i64)> {
        let (revenue, minutes): (Option<Decimal>, Option<i64>) = sqlx::query_as(
            r#"
            SELECT
                SUM(price) FILTER (WHERE status = 'COMPLETED'),
                (SUM(duration) FILTER (WHERE status NOT IN ('CANCELED', 'NO_SHOW')))::BIGINT
            FROM bookings
            WHERE salon_id = $1 AND start_time >= $2 AND start_time < $3
            "#,
        )
        .bind(salon_id)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;
        Ok((revenue.unwrap_or(Decimal::ZERO), minutes.unwrap_or(0)))
    }
}

async fn load_active(
    conn: &mut PgConnection,
    staff_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<Booking>> {
    let query = format!(
        r#"
        SELECT * FROM bookings
        WHERE staff_id = $1 AND start_time < $3 AND end_time > $2
          AND status IN {}
        ORDER BY start_time
        "#,
        ACTIVE_STATUSES
    );
    let rows = sqlx::query_as::<_, Booking>(&query)
        .bind(staff_id)
        .bind(from)
        .bind(to)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// Read everything the validator needs through the booking transaction
async fn load_day_inputs(conn: &mut PgConnection, booking: &NewBooking) -> AppResult<DayInputs> {
    let salon = salons::fetch(conn, booking.salon_id).await?;
    let member = staff::fetch(conn, booking.staff_id).await?;
    let tz = salon.tz()?;
    let rules = salon.rules();
    let date = availability::local_date(booking.start_time, tz);

    let schedule = schedules::load_day(conn, member.schedule_owner(), day_of_week(date)).await?;
    let closures = schedules::load_closures(conn, &member.closure_owners(), DateRange::single(date)).await?;
    let (from, to) = conflicts::query_window(date, tz, rules);
    let bookings = load_active(conn, member.id, from, to).await?;

    Ok(DayInputs {
        date,
        tz,
        rules,
        schedule,
        closures,
        bookings,
    })
}

/// SQLSTATE 40001 (serialization_failure) or 40P01 (deadlock_detected)
fn is_serialization_failure(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .map(|code| code == "40001" || code == "40P01")
        .unwrap_or(false)
}
