//! Computer session (log) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{computer_log::ComputerLog, identifier::Identifier, PageRequest},
};

#[derive(Clone)]
pub struct ComputerLogsRepository {
    pool: Pool<Postgres>,
}

impl ComputerLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Sessions have no natural key; anything but an id or uuid finds nothing
    pub async fn get(&self, identifier: &Identifier) -> AppResult<Option<ComputerLog>> {
        let log = match identifier {
            Identifier::Id(id) => {
                sqlx::query_as::<_, ComputerLog>("SELECT * FROM computer_logs WHERE id = $1")
                    .bind(*id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Identifier::Uuid(uuid) => self.get_by_uuid(*uuid).await?,
            Identifier::Email(_) | Identifier::Natural(_) => None,
        };
        Ok(log)
    }

    pub async fn get_by_uuid(&self, uuid: Uuid) -> AppResult<Option<ComputerLog>> {
        let log = sqlx::query_as::<_, ComputerLog>("SELECT * FROM computer_logs WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    /// Most recent sessions first
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<ComputerLog>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM computer_logs")
            .fetch_one(&self.pool)
            .await?;

        let logs = sqlx::query_as::<_, ComputerLog>(
            "SELECT * FROM computer_logs ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.items_per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((logs, total))
    }
}
