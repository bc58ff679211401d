//! Maintenance scheduling

use crate::{
    error::{AppError, AppResult},
    models::{
        item::ItemStatus,
        maintenance::{CreateMaintenance, Maintenance},
        user::AuthContext,
        PageRequest, Paginated,
    },
    repository::{store::InventoryStore, Repository},
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, ctx: &AuthContext, request: CreateMaintenance) -> AppResult<Maintenance> {
        ctx.require_admin()?;

        let mut store = self.repository.begin().await?;
        let maintenance = schedule(&mut store, request, ctx.user_id).await?;
        store.commit().await?;

        tracing::info!(
            maintenance_id = maintenance.id,
            computer_id = maintenance.computer_id,
            schedule_date = %maintenance.schedule_date,
            "Maintenance scheduled"
        );
        Ok(maintenance)
    }

    pub async fn mark_as_done(&self, ctx: &AuthContext, maintenance_id: i32) -> AppResult<Maintenance> {
        ctx.require_admin()?;

        let mut store = self.repository.begin().await?;
        let maintenance = complete(&mut store, maintenance_id).await?;
        store.commit().await?;

        tracing::info!(
            maintenance_id,
            computer_id = maintenance.computer_id,
            "Maintenance completed"
        );
        Ok(maintenance)
    }

    pub async fn get(&self, maintenance_id: i32) -> AppResult<Maintenance> {
        self.repository
            .maintenance
            .get_by_id(maintenance_id)
            .await?
            .ok_or_else(|| not_found(maintenance_id))
    }

    pub async fn list(&self, page: PageRequest) -> AppResult<Paginated<Maintenance>> {
        let (records, total) = self.repository.maintenance.list(page).await?;
        Ok(page.wrap(records, total))
    }
}

fn not_found(maintenance_id: i32) -> AppError {
    AppError::NotFound(format!("Maintenance with id does not exist : {}", maintenance_id))
}

/// Insert the schedule and put every component of the computer under maintenance
pub async fn schedule<S: InventoryStore + ?Sized>(
    store: &mut S,
    request: CreateMaintenance,
    scheduled_by: i32,
) -> AppResult<Maintenance> {
    let computer_id = request.computer_id;
    store.lock_computer(computer_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Computer with id does not exist : {}", computer_id))
    })?;

    let maintenance = store.insert_maintenance(request, scheduled_by).await?;
    let components = store
        .set_component_status(computer_id, ItemStatus::UnderMaintenance)
        .await?;
    tracing::debug!(computer_id, components, "Components put under maintenance");

    Ok(maintenance)
}

/// Close the schedule and return the components to service
pub async fn complete<S: InventoryStore + ?Sized>(
    store: &mut S,
    maintenance_id: i32,
) -> AppResult<Maintenance> {
    let current = store
        .lock_maintenance(maintenance_id)
        .await?
        .ok_or_else(|| not_found(maintenance_id))?;

    if current.is_done {
        return Err(AppError::Conflict(format!(
            "Maintenance already marked as done : {}",
            maintenance_id
        )));
    }

    let maintenance = store.mark_maintenance_done(maintenance_id).await?;
    let components = store
        .set_component_status(maintenance.computer_id, ItemStatus::InUse)
        .await?;
    tracing::debug!(
        computer_id = maintenance.computer_id,
        components,
        "Components back in use"
    );

    Ok(maintenance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::computer::fixtures::computer;
    use crate::repository::store::MockInventoryStore;
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn record(id: i32, computer_id: i32, is_done: bool) -> Maintenance {
        Maintenance {
            id,
            uuid: Uuid::new_v4(),
            computer_id,
            scheduled_by: 1,
            schedule_date: Utc::now(),
            is_done,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_schedule_marks_components() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_computer()
            .returning(|id| Ok(Some(computer(id, None))));
        store
            .expect_insert_maintenance()
            .withf(|req, by| req.computer_id == 4 && *by == 1)
            .returning(|req, _| Ok(record(2, req.computer_id, false)));
        store
            .expect_set_component_status()
            .with(eq(4), eq(ItemStatus::UnderMaintenance))
            .times(1)
            .returning(|_, _| Ok(4));

        let request = CreateMaintenance {
            computer_id: 4,
            schedule_date: Utc::now(),
        };
        let created = schedule(&mut store, request, 1).await.unwrap();
        assert!(!created.is_done);
    }

    #[tokio::test]
    async fn test_schedule_unknown_computer() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_computer().returning(|_| Ok(None));
        store.expect_insert_maintenance().never();
        store.expect_set_component_status().never();

        let request = CreateMaintenance {
            computer_id: 99,
            schedule_date: Utc::now(),
        };
        let err = schedule(&mut store, request, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_complete_restores_components() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_maintenance()
            .returning(|id| Ok(Some(record(id, 4, false))));
        store
            .expect_mark_maintenance_done()
            .returning(|id| Ok(record(id, 4, true)));
        store
            .expect_set_component_status()
            .with(eq(4), eq(ItemStatus::InUse))
            .times(1)
            .returning(|_, _| Ok(4));

        let done = complete(&mut store, 2).await.unwrap();
        assert!(done.is_done);
    }

    #[tokio::test]
    async fn test_complete_twice_is_conflict() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_maintenance()
            .returning(|id| Ok(Some(record(id, 4, true))));
        store.expect_mark_maintenance_done().never();
        store.expect_set_component_status().never();

        let err = complete(&mut store, 2).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
