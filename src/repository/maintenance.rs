//! Maintenance schedule repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{maintenance::Maintenance, PageRequest},
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Maintenance>> {
        let maintenance = sqlx::query_as::<_, Maintenance>("SELECT * FROM maintenance WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maintenance)
    }

    /// Upcoming schedules first
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<Maintenance>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM maintenance")
            .fetch_one(&self.pool)
            .await?;

        let records = sqlx::query_as::<_, Maintenance>(
            "SELECT * FROM maintenance ORDER BY schedule_date ASC, id ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.items_per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((records, total))
    }
}
