//! Locations repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::location::{FloorType, Location},
};

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a location; `name` is expected upper-cased already
    pub async fn create(&self, name: &str, floor: FloorType) -> AppResult<Location> {
        let location = sqlx::query_as::<_, Location>(
            "INSERT INTO locations (uuid, name, floor) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(floor)
        .fetch_one(&self.pool)
        .await?;
        Ok(location)
    }

    pub async fn list(&self) -> AppResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Location>> {
        let location =
            sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE name = UPPER($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(location)
    }
}
