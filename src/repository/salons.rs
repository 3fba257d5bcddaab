//! Salons repository

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::salon::{CreateSalon, Salon, UpdateSalon},
};

#[derive(Clone)]
pub struct SalonsRepository {
    pool: Pool<Postgres>,
}

impl SalonsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get salon by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Salon> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// List all salons ordered by name
    pub async fn list(&self) -> AppResult<Vec<Salon>> {
        let rows = sqlx::query_as::<_, Salon>("SELECT * FROM salons ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a salon
    pub async fn create(&self, data: &CreateSalon, timezone: &str) -> AppResult<Salon> {
        let row = sqlx::query_as::<_, Salon>(
            r#"
            INSERT INTO salons (id, name, timezone, buffer_before, buffer_after, processing_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(timezone)
        .bind(data.buffer_before.unwrap_or(0))
        .bind(data.buffer_after.unwrap_or(0))
        .bind(data.processing_time.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a salon; only provided fields change
    pub async fn update(&self, id: Uuid, data: &UpdateSalon) -> AppResult<Salon> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        if data.name.is_some() { sets.push(format!("name = ${}", idx)); idx += 1; }
        if data.timezone.is_some() { sets.push(format!("timezone = ${}", idx)); idx += 1; }
        if data.buffer_before.is_some() { sets.push(format!("buffer_before = ${}", idx)); idx += 1; }
        if data.buffer_after.is_some() { sets.push(format!("buffer_after = ${}", idx)); idx += 1; }
        if data.processing_time.is_some() { sets.push(format!("processing_time = ${}", idx)); idx += 1; }

        let query = format!(
            "UPDATE salons SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Salon>(&query).bind(Utc::now());
        if let Some(ref name) = data.name { builder = builder.bind(name); }
        if let Some(ref tz) = data.timezone { builder = builder.bind(tz); }
        if let Some(v) = data.buffer_before { builder = builder.bind(v); }
        if let Some(v) = data.buffer_after { builder = builder.bind(v); }
        if let Some(v) = data.processing_time { builder = builder.bind(v); }

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Salon {} not found", id)))
    }
}

pub(crate) async fn fetch(conn: &mut PgConnection, id: Uuid) -> AppResult<Salon> {
    sqlx::query_as::<_, Salon>("SELECT * FROM salons WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Salon {} not found", id)))
}
