//! Condition reports repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        report::{CreateReport, Report, ReportRow},
        PageRequest,
    },
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Postgres>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, report: &CreateReport, reported_by: i32) -> AppResult<Report> {
        let created = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (uuid, item_id, reported_by, remarks)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(report.item_id)
        .bind(reported_by)
        .bind(&report.remarks)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Newest first, optionally restricted to one reporter
    pub async fn list(
        &self,
        reported_by: Option<i32>,
        page: PageRequest,
    ) -> AppResult<(Vec<Report>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports WHERE ($1::int IS NULL OR reported_by = $1)",
        )
        .bind(reported_by)
        .fetch_one(&self.pool)
        .await?;

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT * FROM reports
            WHERE ($1::int IS NULL OR reported_by = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(reported_by)
        .bind(page.items_per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((reports, total))
    }

    /// Every report in `[start, end]` with its item and reporter, oldest first
    pub async fn rows_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<ReportRow>> {
        let rows = sqlx::query_as::<_, ReportRow>(
            r#"
            SELECT r.id, r.item_id, i.name AS item_name, i.category_name, i.location_name,
                   u.id AS reporter_id, u.name AS reporter_name, u.email AS reporter_email,
                   u.year_section AS reporter_section, r.created_at
            FROM reports r
            JOIN items i ON i.id = r.item_id
            JOIN users u ON u.id = r.reported_by
            WHERE r.created_at >= $1 AND r.created_at <= $2
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
