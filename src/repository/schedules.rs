//! Schedules repository (weekly schedules, time slots, closures)

use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::schedule::{
        ClosedDay, CreateClosedDay, DateRange, DaySchedule, ScheduleOwner, ScheduleRow,
        TimeSlotRow, WorkingSlot,
    },
};

#[derive(Clone)]
pub struct SchedulesRepository {
    pool: Pool<Postgres>,
}

impl SchedulesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // ---- Weekly schedule ----

    /// Normalized schedule of one weekday, if configured
    pub async fn get_day(&self, owner: ScheduleOwner, day_of_week: i16) -> AppResult<Option<DaySchedule>> {
        let mut conn = self.pool.acquire().await?;
        load_day(&mut conn, owner, day_of_week).await
    }

    /// All configured weekdays of an owner, Sunday first
    pub async fn week(&self, owner: ScheduleOwner) -> AppResult<Vec<DaySchedule>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            "SELECT * FROM schedules WHERE owner_kind = $1 AND owner_id = $2 ORDER BY day_of_week",
        )
        .bind(owner.kind())
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;

        let slots = sqlx::query_as::<_, TimeSlotRow>(
            r#"
            SELECT ts.* FROM time_slots ts
            JOIN schedules s ON s.id = ts.schedule_id
            WHERE s.owner_kind = $1 AND s.owner_id = $2
            ORDER BY ts.sort_order, ts.start_time
            "#,
        )
        .bind(owner.kind())
        .bind(owner.id())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let own: Vec<TimeSlotRow> = slots
                    .iter()
                    .filter(|s| s.schedule_id == row.id)
                    .cloned()
                    .collect();
                DaySchedule::from_rows(row, &own).map_err(AppError::from)
            })
            .collect()
    }

    /// Replace the schedule of one weekday with the given slots
    pub async fn replace_day(
        &self,
        owner: ScheduleOwner,
        day_of_week: i16,
        is_closed: bool,
        slots: &[WorkingSlot],
    ) -> AppResult<DaySchedule> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ScheduleRow>(
            r#"
            INSERT INTO schedules (id, owner_kind, owner_id, day_of_week, is_closed)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (owner_kind, owner_id, day_of_week)
            DO UPDATE SET is_closed = EXCLUDED.is_closed, open_time = NULL, close_time = NULL
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner.kind())
        .bind(owner.id())
        .bind(day_of_week)
        .bind(is_closed)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM time_slots WHERE schedule_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;

        for slot in slots {
            sqlx::query(
                r#"
                INSERT INTO time_slots (id, schedule_id, start_time, end_time, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(row.id)
            .bind(slot.start.to_string())
            .bind(slot.end.to_string())
            .bind(slot.order)
            .execute(&mut *tx)
            .await?;
        }

        let day = load_day(&mut *tx, owner, day_of_week)
            .await?
            .ok_or_else(|| AppError::Internal("Schedule row vanished after upsert".to_string()))?;

        tx.commit().await?;
        Ok(day)
    }

    // ---- Closures ----

    /// Closures of any of `owners` that intersect `range`
    pub async fn closures_for(&self, owners: &[ScheduleOwner], range: DateRange) -> AppResult<Vec<ClosedDay>> {
        let mut conn = self.pool.acquire().await?;
        load_closures(&mut conn, owners, range).await
    }

    /// List closures of one owner, optionally limited to a date range
    pub async fn list_closures(
        &self,
        owner: ScheduleOwner,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<ClosedDay>> {
        let mut conditions = vec!["owner_kind = $1".to_string(), "owner_id = $2".to_string()];
        let mut idx = 3;

        if from.is_some() {
            conditions.push(format!("end_date >= ${}", idx));
            idx += 1;
        }
        if to.is_some() {
            conditions.push(format!("start_date <= ${}", idx));
        }

        let query = format!(
            "SELECT * FROM closed_days WHERE {} ORDER BY start_date",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, ClosedDay>(&query)
            .bind(owner.kind())
            .bind(owner.id());
        if let Some(f) = from { builder = builder.bind(f); }
        if let Some(t) = to { builder = builder.bind(t); }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Create a closure
    pub async fn create_closure(
        &self,
        owner: ScheduleOwner,
        data: &CreateClosedDay,
        end_date: NaiveDate,
    ) -> AppResult<ClosedDay> {
        let row = sqlx::query_as::<_, ClosedDay>(
            r#"
            INSERT INTO closed_days (id, owner_kind, owner_id, start_date, end_date, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner.kind())
        .bind(owner.id())
        .bind(data.start_date)
        .bind(end_date)
        .bind(&data.start_time)
        .bind(&data.end_time)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a closure
    pub async fn delete_closure(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM closed_days WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Closure {} not found", id)));
        }
        Ok(())
    }
}

pub(crate) async fn load_day(
    conn: &mut PgConnection,
    owner: ScheduleOwner,
    day_of_week: i16,
) -> AppResult<Option<DaySchedule>> {
    let row = sqlx::query_as::<_, ScheduleRow>(
        "SELECT * FROM schedules WHERE owner_kind = $1 AND owner_id = $2 AND day_of_week = $3",
    )
    .bind(owner.kind())
    .bind(owner.id())
    .bind(day_of_week)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let slots = sqlx::query_as::<_, TimeSlotRow>(
        "SELECT * FROM time_slots WHERE schedule_id = $1 ORDER BY sort_order, start_time",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(DaySchedule::from_rows(&row, &slots)?))
}

pub(crate) async fn load_closures(
    conn: &mut PgConnection,
    owners: &[ScheduleOwner],
    range: DateRange,
) -> AppResult<Vec<ClosedDay>> {
    if owners.is_empty() {
        return Ok(Vec::new());
    }

    let mut idx = 3;
    let owner_clauses: Vec<String> = owners
        .iter()
        .map(|_| {
            let clause = format!("(owner_kind = ${} AND owner_id = ${})", idx, idx + 1);
            idx += 2;
            clause
        })
        .collect();

    let query = format!(
        "SELECT * FROM closed_days WHERE start_date <= $2 AND end_date >= $1 AND ({}) ORDER BY start_date",
        owner_clauses.join(" OR ")
    );

    let mut builder = sqlx::query_as::<_, ClosedDay>(&query)
        .bind(range.start)
        .bind(range.end);
    for owner in owners {
        builder = builder.bind(owner.kind()).bind(owner.id());
    }

    let rows = builder.fetch_all(&mut *conn).await?;
    Ok(rows)
}
