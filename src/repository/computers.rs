//! Computers repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        computer::{Computer, ComputerQuery},
        identifier::Identifier,
        PageRequest,
    },
};

#[derive(Clone)]
pub struct ComputersRepository {
    pool: Pool<Postgres>,
}

impl ComputersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get computer by id, uuid or name
    pub async fn get(&self, identifier: &Identifier) -> AppResult<Option<Computer>> {
        let computer = match identifier {
            Identifier::Id(id) => {
                sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE id = $1")
                    .bind(*id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Identifier::Uuid(uuid) => {
                sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE uuid = $1")
                    .bind(*uuid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            _ => match identifier.natural_key() {
                Some(name) => {
                    sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE name = $1")
                        .bind(name)
                        .fetch_optional(&self.pool)
                        .await?
                }
                None => None,
            },
        };
        Ok(computer)
    }

    /// List computers, optionally at one location, archived ones excluded
    pub async fn search(
        &self,
        query: &ComputerQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<Computer>, i64)> {
        let location = query.location_name.as_ref().map(|l| l.to_uppercase());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM computers
            WHERE is_archived = FALSE AND ($1::text IS NULL OR location_name = $1)
            "#,
        )
        .bind(&location)
        .fetch_one(&self.pool)
        .await?;

        let computers = sqlx::query_as::<_, Computer>(
            r#"
            SELECT * FROM computers
            WHERE is_archived = FALSE AND ($1::text IS NULL OR location_name = $1)
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&location)
        .bind(page.items_per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((computers, total))
    }

    pub async fn set_archived(&self, id: i32, archived: bool) -> AppResult<Option<Computer>> {
        let computer = sqlx::query_as::<_, Computer>(
            "UPDATE computers SET is_archived = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(archived)
        .fetch_optional(&self.pool)
        .await?;
        Ok(computer)
    }
}
