//! Staff repository

use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::staff::{CreateStaff, Staff, UpdateStaff},
};

#[derive(Clone)]
pub struct StaffRepository {
    pool: Pool<Postgres>,
}

impl StaffRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get staff member by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Staff> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// List staff of a salon, optionally only active members
    pub async fn list_by_salon(&self, salon_id: Uuid, active_only: bool) -> AppResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, Staff>(
            r#"
            SELECT * FROM staff
            WHERE salon_id = $1 AND (is_active OR NOT $2)
            ORDER BY name
            "#,
        )
        .bind(salon_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Add a staff member to a salon
    pub async fn create(&self, salon_id: Uuid, data: &CreateStaff) -> AppResult<Staff> {
        let row = sqlx::query_as::<_, Staff>(
            r#"
            INSERT INTO staff (id, salon_id, name, has_own_schedule)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(salon_id)
        .bind(&data.name)
        .bind(data.has_own_schedule)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a staff member
    pub async fn update(&self, id: Uuid, data: &UpdateStaff) -> AppResult<Staff> {
        sqlx::query_as::<_, Staff>(
            r#"
            UPDATE staff SET
                name = COALESCE($2, name),
                is_active = COALESCE($3, is_active),
                has_own_schedule = COALESCE($4, has_own_schedule)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.is_active)
        .bind(data.has_own_schedule)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))
    }
}

pub(crate) async fn fetch(conn: &mut PgConnection, id: Uuid) -> AppResult<Staff> {
    sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Staff {} not found", id)))
}
