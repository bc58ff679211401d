//! Categories repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::category::Category};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a category; `name` is expected upper-cased already
    pub async fn create(&self, name: &str) -> AppResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (uuid, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = UPPER($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }
}
