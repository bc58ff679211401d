//! Transactional store used by the multi-step inventory workflows.
//!
//! Opening a session, assembling a computer, relocating it and scheduling
//! maintenance all read, validate and write several tables. They run against
//! an [`InventoryStore`] so the whole sequence shares one transaction; the
//! Postgres implementation wraps a `sqlx::Transaction` and rolls back when
//! dropped without `commit`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        computer::{Computer, CreateComputer},
        computer_log::ComputerLog,
        identifier::Identifier,
        item::{Item, ItemAssignment, ItemStatus},
        maintenance::{CreateMaintenance, Maintenance},
        user::User,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryStore: Send {
    async fn find_user(&mut self, user_id: i32) -> AppResult<Option<User>>;

    /// Reads the computer row and holds it locked until the transaction ends
    async fn lock_computer(&mut self, computer_id: i32) -> AppResult<Option<Computer>>;

    async fn find_computer_by_name(&mut self, name: String) -> AppResult<Option<Computer>>;

    async fn location_exists(&mut self, name: String) -> AppResult<bool>;

    async fn insert_computer(&mut self, computer: CreateComputer) -> AppResult<Computer>;

    /// Moves the computer; returns None when it does not exist
    async fn relocate_computer(
        &mut self,
        computer_id: i32,
        location_name: String,
    ) -> AppResult<Option<Computer>>;

    /// Stamps the last-session pointer, returns the number of rows updated
    async fn set_last_log(&mut self, computer_id: i32, log_uuid: Uuid) -> AppResult<u64>;

    async fn find_log_by_uuid(&mut self, uuid: Uuid) -> AppResult<Option<ComputerLog>>;

    /// Reads a session by id or uuid, locked
    async fn lock_log(&mut self, identifier: Identifier) -> AppResult<Option<ComputerLog>>;

    async fn insert_log(&mut self, computer_id: i32, user_id: i32) -> AppResult<ComputerLog>;

    /// Closes the session if it is still open; None when it was already closed
    async fn close_log(&mut self, log_id: i32, closed_by: i32) -> AppResult<Option<ComputerLog>>;

    /// Reads the named items, locked. Unknown names are simply absent.
    async fn lock_items_by_names(&mut self, names: Vec<String>) -> AppResult<Vec<Item>>;

    /// Applies the batch in one statement, returns the number of rows updated
    async fn assign_items(&mut self, batch: ItemAssignment) -> AppResult<u64>;

    async fn component_statuses(&mut self, computer_id: i32) -> AppResult<Vec<ItemStatus>>;

    async fn set_component_status(&mut self, computer_id: i32, status: ItemStatus)
        -> AppResult<u64>;

    async fn set_component_location(&mut self, computer_id: i32, location_name: String)
        -> AppResult<u64>;

    async fn insert_maintenance(
        &mut self,
        request: CreateMaintenance,
        scheduled_by: i32,
    ) -> AppResult<Maintenance>;

    async fn lock_maintenance(&mut self, maintenance_id: i32) -> AppResult<Option<Maintenance>>;

    async fn mark_maintenance_done(&mut self, maintenance_id: i32) -> AppResult<Maintenance>;
}

/// Postgres store bound to one open transaction
pub struct PgInventoryStore {
    tx: Transaction<'static, Postgres>,
}

impl PgInventoryStore {
    pub async fn begin(pool: &PgPool) -> AppResult<Self> {
        Ok(Self { tx: pool.begin().await? })
    }

    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn find_user(&mut self, user_id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(user)
    }

    async fn lock_computer(&mut self, computer_id: i32) -> AppResult<Option<Computer>> {
        let computer =
            sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE id = $1 FOR UPDATE")
                .bind(computer_id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(computer)
    }

    async fn find_computer_by_name(&mut self, name: String) -> AppResult<Option<Computer>> {
        let computer = sqlx::query_as::<_, Computer>("SELECT * FROM computers WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(computer)
    }

    async fn location_exists(&mut self, name: String) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM locations WHERE name = UPPER($1))")
                .bind(name)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists)
    }

    async fn insert_computer(&mut self, computer: CreateComputer) -> AppResult<Computer> {
        let created = sqlx::query_as::<_, Computer>(
            r#"
            INSERT INTO computers (
                uuid, name, location_name, monitor_name, keyboard_name,
                mouse_name, system_unit_name, others, metadata
            )
            VALUES ($1, $2, UPPER($3), $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&computer.name)
        .bind(&computer.location_name)
        .bind(&computer.monitor_name)
        .bind(&computer.keyboard_name)
        .bind(&computer.mouse_name)
        .bind(&computer.system_unit_name)
        .bind(&computer.others)
        .bind(&computer.metadata)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(created)
    }

    async fn relocate_computer(
        &mut self,
        computer_id: i32,
        location_name: String,
    ) -> AppResult<Option<Computer>> {
        let computer = sqlx::query_as::<_, Computer>(
            r#"
            UPDATE computers SET location_name = UPPER($2), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(computer_id)
        .bind(location_name)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(computer)
    }

    async fn set_last_log(&mut self, computer_id: i32, log_uuid: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE computers SET last_log_uuid = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(computer_id)
        .bind(log_uuid)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_log_by_uuid(&mut self, uuid: Uuid) -> AppResult<Option<ComputerLog>> {
        let log = sqlx::query_as::<_, ComputerLog>("SELECT * FROM computer_logs WHERE uuid = $1")
            .bind(uuid)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(log)
    }

    async fn lock_log(&mut self, identifier: Identifier) -> AppResult<Option<ComputerLog>> {
        let query = match identifier {
            Identifier::Id(id) => {
                sqlx::query_as::<_, ComputerLog>(
                    "SELECT * FROM computer_logs WHERE id = $1 FOR UPDATE",
                )
                .bind(id)
            }
            Identifier::Uuid(uuid) => {
                sqlx::query_as::<_, ComputerLog>(
                    "SELECT * FROM computer_logs WHERE uuid = $1 FOR UPDATE",
                )
                .bind(uuid)
            }
            Identifier::Email(_) | Identifier::Natural(_) => return Ok(None),
        };
        Ok(query.fetch_optional(&mut *self.tx).await?)
    }

    async fn insert_log(&mut self, computer_id: i32, user_id: i32) -> AppResult<ComputerLog> {
        let log = sqlx::query_as::<_, ComputerLog>(
            r#"
            INSERT INTO computer_logs (uuid, computer_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(computer_id)
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(log)
    }

    async fn close_log(&mut self, log_id: i32, closed_by: i32) -> AppResult<Option<ComputerLog>> {
        let log = sqlx::query_as::<_, ComputerLog>(
            r#"
            UPDATE computer_logs SET ended_at = NOW(), ended_by = $2
            WHERE id = $1 AND ended_at IS NULL
            RETURNING *
            "#,
        )
        .bind(log_id)
        .bind(closed_by)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(log)
    }

    async fn lock_items_by_names(&mut self, names: Vec<String>) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE name = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&names)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(items)
    }

    async fn assign_items(&mut self, batch: ItemAssignment) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET status = $2,
                computer_id = $3,
                location_name = CASE
                    WHEN location_name IS DISTINCT FROM UPPER($4) THEN UPPER($4)
                    ELSE location_name
                END,
                updated_at = NOW()
            WHERE id = ANY($1)
            "#,
        )
        .bind(&batch.item_ids)
        .bind(ItemStatus::InUse)
        .bind(batch.computer_id)
        .bind(&batch.location_name)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn component_statuses(&mut self, computer_id: i32) -> AppResult<Vec<ItemStatus>> {
        let statuses = sqlx::query_scalar::<_, ItemStatus>(
            "SELECT status FROM items WHERE computer_id = $1 ORDER BY id",
        )
        .bind(computer_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(statuses)
    }

    async fn set_component_status(
        &mut self,
        computer_id: i32,
        status: ItemStatus,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE items SET status = $2, updated_at = NOW() WHERE computer_id = $1",
        )
        .bind(computer_id)
        .bind(status)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_component_location(
        &mut self,
        computer_id: i32,
        location_name: String,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE items SET location_name = UPPER($2), updated_at = NOW() WHERE computer_id = $1",
        )
        .bind(computer_id)
        .bind(location_name)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_maintenance(
        &mut self,
        request: CreateMaintenance,
        scheduled_by: i32,
    ) -> AppResult<Maintenance> {
        let maintenance = sqlx::query_as::<_, Maintenance>(
            r#"
            INSERT INTO maintenance (uuid, computer_id, scheduled_by, schedule_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.computer_id)
        .bind(scheduled_by)
        .bind(request.schedule_date)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(maintenance)
    }

    async fn lock_maintenance(&mut self, maintenance_id: i32) -> AppResult<Option<Maintenance>> {
        let maintenance =
            sqlx::query_as::<_, Maintenance>("SELECT * FROM maintenance WHERE id = $1 FOR UPDATE")
                .bind(maintenance_id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(maintenance)
    }

    async fn mark_maintenance_done(&mut self, maintenance_id: i32) -> AppResult<Maintenance> {
        let maintenance = sqlx::query_as::<_, Maintenance>(
            "UPDATE maintenance SET is_done = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(maintenance_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(maintenance)
    }
}
