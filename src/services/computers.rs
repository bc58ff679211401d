//! Computer assembly, status and relocation

use crate::{
    error::{AppError, AppResult},
    models::{
        computer::{
            Computer, ComputerQuery, ComputerStatus, ComputerStatusResponse, CreateComputer,
            RelocateComputer,
        },
        identifier::Identifier,
        user::AuthContext,
        PageRequest, Paginated,
    },
    repository::{store::InventoryStore, Repository},
    services::validator,
};

#[derive(Clone)]
pub struct ComputersService {
    repository: Repository,
}

impl ComputersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Assemble a computer from free components (admin only)
    pub async fn create(&self, ctx: &AuthContext, request: CreateComputer) -> AppResult<Computer> {
        ctx.require_admin()?;

        let mut store = self.repository.begin().await?;
        let computer = assemble(&mut store, request).await?;
        store.commit().await?;

        tracing::info!(
            computer_id = computer.id,
            name = %computer.name,
            location = %computer.location_name,
            "Computer assembled"
        );
        Ok(computer)
    }

    pub async fn list(&self, query: &ComputerQuery) -> AppResult<Paginated<Computer>> {
        let page = PageRequest::new(query.page, query.items_per_page);
        let (computers, total) = self.repository.computers.search(query, page).await?;
        Ok(page.wrap(computers, total))
    }

    pub async fn get(&self, identifier: &str) -> AppResult<Computer> {
        let identifier = Identifier::parse(identifier);
        self.repository
            .computers
            .get(&identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Computer not found : {}", identifier)))
    }

    /// Tri-state availability; maintenance wins over an open session
    pub async fn status(&self, identifier: &str) -> AppResult<ComputerStatusResponse> {
        let computer = self.get(identifier).await?;

        let last_log = match computer.last_log_uuid {
            Some(uuid) => self.repository.computer_logs.get_by_uuid(uuid).await?,
            None => None,
        };
        let components: Vec<_> = self
            .repository
            .items
            .list_by_computer(computer.id)
            .await?
            .into_iter()
            .map(|item| item.status)
            .collect();

        let status = ComputerStatus::derive(last_log.as_ref(), &components);
        let current_log = last_log.filter(|log| log.is_open());

        Ok(ComputerStatusResponse {
            computer_id: computer.id,
            name: computer.name,
            status,
            current_log,
        })
    }

    /// Move a computer and every installed component (admin only)
    pub async fn relocate(
        &self,
        ctx: &AuthContext,
        identifier: &str,
        request: RelocateComputer,
    ) -> AppResult<Computer> {
        ctx.require_admin()?;
        let computer = self.get(identifier).await?;

        let mut store = self.repository.begin().await?;
        let moved = relocate(&mut store, computer.id, &request.location_name).await?;
        store.commit().await?;

        tracing::info!(
            computer_id = moved.id,
            from = %computer.location_name,
            to = %moved.location_name,
            "Computer relocated"
        );
        Ok(moved)
    }

    pub async fn set_archived(
        &self,
        ctx: &AuthContext,
        identifier: &str,
        archived: bool,
    ) -> AppResult<Computer> {
        ctx.require_admin()?;
        let computer = self.get(identifier).await?;
        self.repository
            .computers
            .set_archived(computer.id, archived)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Computer not found : {}", identifier)))
    }
}

/// Validate names, location and components, then insert and install them
pub async fn assemble<S: InventoryStore + ?Sized>(
    store: &mut S,
    mut request: CreateComputer,
) -> AppResult<Computer> {
    request.location_name = request.location_name.to_uppercase();

    if store.find_computer_by_name(request.name.clone()).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Computer name taken : {}",
            request.name
        )));
    }

    if !store.location_exists(request.location_name.clone()).await? {
        return Err(AppError::NotFound(format!(
            "Location does not exist : {}",
            request.location_name
        )));
    }

    let items = validator::validate_item_names(store, &request.component_names()).await?;

    let location = request.location_name.clone();
    let computer = store.insert_computer(request).await?;
    validator::update_items(store, &items, computer.id, &location).await?;

    Ok(computer)
}

/// Move the computer row and its components in the same transaction
pub async fn relocate<S: InventoryStore + ?Sized>(
    store: &mut S,
    computer_id: i32,
    location_name: &str,
) -> AppResult<Computer> {
    let location = location_name.to_uppercase();
    if !store.location_exists(location.clone()).await? {
        return Err(AppError::NotFound(format!(
            "Location does not exist : {}",
            location
        )));
    }

    let computer = store
        .relocate_computer(computer_id, location.clone())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Computer with id does not exist : {}", computer_id)))?;
    let moved = store.set_component_location(computer_id, location).await?;
    tracing::debug!(computer_id, components = moved, "Components relocated");

    Ok(computer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        computer::fixtures::computer,
        item::{fixtures::item, ItemStatus},
    };
    use crate::repository::store::MockInventoryStore;

    fn request(others: &[&str]) -> CreateComputer {
        CreateComputer {
            name: "PC-07".to_string(),
            metadata: None,
            monitor_name: "Monitor_1".to_string(),
            keyboard_name: "Keyboard_1".to_string(),
            mouse_name: "Mouse_1".to_string(),
            system_unit_name: "SystemUnit_1".to_string(),
            location_name: "2cl3b".to_string(),
            others: others.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn free_items(names: &[String]) -> Vec<crate::models::item::Item> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| item(idx as i32 + 1, name, ItemStatus::Available))
            .collect()
    }

    #[tokio::test]
    async fn test_assemble_installs_all_components() {
        let mut store = MockInventoryStore::new();
        store.expect_find_computer_by_name().returning(|_| Ok(None));
        store
            .expect_location_exists()
            .withf(|name| name == "2CL3B")
            .returning(|_| Ok(true));
        store
            .expect_lock_items_by_names()
            .returning(|names| Ok(free_items(&names)));
        store
            .expect_insert_computer()
            .withf(|req| req.location_name == "2CL3B" && req.others == vec!["Printer_1"])
            .returning(|req| {
                let mut created = computer(7, None);
                created.name = req.name;
                created.others = req.others;
                Ok(created)
            });
        store
            .expect_assign_items()
            .times(1)
            .withf(|batch| batch.item_ids.len() == 5 && batch.computer_id == 7)
            .returning(|batch| Ok(batch.item_ids.len() as u64));

        let created = assemble(&mut store, request(&["Printer_1"])).await.unwrap();
        assert_eq!(created.name, "PC-07");
        assert_eq!(created.others, vec!["Printer_1"]);
    }

    #[tokio::test]
    async fn test_assemble_rejects_taken_name() {
        let mut store = MockInventoryStore::new();
        store
            .expect_find_computer_by_name()
            .returning(|_| Ok(Some(computer(1, None))));
        store.expect_insert_computer().never();

        let err = assemble(&mut store, request(&[])).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_assemble_rejects_unknown_location() {
        let mut store = MockInventoryStore::new();
        store.expect_find_computer_by_name().returning(|_| Ok(None));
        store.expect_location_exists().returning(|_| Ok(false));
        store.expect_lock_items_by_names().never();

        let err = assemble(&mut store, request(&[])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("2CL3B")));
    }

    #[tokio::test]
    async fn test_assemble_with_serviced_printer_changes_nothing() {
        let mut store = MockInventoryStore::new();
        store.expect_find_computer_by_name().returning(|_| Ok(None));
        store.expect_location_exists().returning(|_| Ok(true));
        store.expect_lock_items_by_names().returning(|names| {
            let mut items = free_items(&names);
            if let Some(printer) = items.last_mut() {
                printer.status = ItemStatus::UnderMaintenance;
            }
            Ok(items)
        });
        store.expect_insert_computer().never();
        store.expect_assign_items().never();

        let err = assemble(&mut store, request(&["Printer_1"])).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("Printer_1")));
    }

    #[tokio::test]
    async fn test_relocate_moves_components() {
        let mut store = MockInventoryStore::new();
        store.expect_location_exists().returning(|_| Ok(true));
        store
            .expect_relocate_computer()
            .withf(|id, location| *id == 3 && location == "MH5")
            .returning(|id, location| {
                let mut moved = computer(id, None);
                moved.location_name = location;
                Ok(Some(moved))
            });
        store
            .expect_set_component_location()
            .times(1)
            .returning(|_, _| Ok(4));

        let moved = relocate(&mut store, 3, "mh5").await.unwrap();
        assert_eq!(moved.location_name, "MH5");
    }
}
