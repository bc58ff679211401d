//! Repository layer for database operations

pub mod categories;
pub mod computer_logs;
pub mod computers;
pub mod items;
pub mod locations;
pub mod maintenance;
pub mod reports;
pub mod store;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;
use store::PgInventoryStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub categories: categories::CategoriesRepository,
    pub locations: locations::LocationsRepository,
    pub items: items::ItemsRepository,
    pub computers: computers::ComputersRepository,
    pub computer_logs: computer_logs::ComputerLogsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub reports: reports::ReportsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            categories: categories::CategoriesRepository::new(pool.clone()),
            locations: locations::LocationsRepository::new(pool.clone()),
            items: items::ItemsRepository::new(pool.clone()),
            computers: computers::ComputersRepository::new(pool.clone()),
            computer_logs: computer_logs::ComputerLogsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            reports: reports::ReportsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a transaction for a multi-step inventory workflow
    pub async fn begin(&self) -> AppResult<PgInventoryStore> {
        PgInventoryStore::begin(&self.pool).await
    }

    /// Database round trip used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
