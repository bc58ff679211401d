//! Cross-entity checks run before a session opens or a computer is assembled.
//!
//! Every function works against an [`InventoryStore`] so that validation and
//! the writes that follow share one transaction. Validation always runs to
//! completion before the caller mutates anything.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        computer::Computer,
        item::{Item, ItemAssignment, ItemStatus},
        user::User,
    },
    repository::store::InventoryStore,
};

pub async fn validate_user<S: InventoryStore + ?Sized>(store: &mut S, user_id: i32) -> AppResult<User> {
    store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id does not exist : {}", user_id)))
}

/// Locks the computer row and fails while its last session is still open.
/// A computer that was never used has no last session and is available.
pub async fn validate_computer<S: InventoryStore + ?Sized>(
    store: &mut S,
    computer_id: i32,
) -> AppResult<Computer> {
    let computer = store.lock_computer(computer_id).await?.ok_or_else(|| {
        AppError::NotFound(format!("Computer with id does not exist : {}", computer_id))
    })?;

    let Some(last_log_uuid) = computer.last_log_uuid else {
        return Ok(computer);
    };

    let latest = store.find_log_by_uuid(last_log_uuid).await?.ok_or_else(|| {
        AppError::Internal(format!(
            "Computer {} points to a missing session : {}",
            computer.name, last_log_uuid
        ))
    })?;

    if latest.is_open() {
        let occupant = store
            .find_user(latest.user_id)
            .await?
            .map(|user| user.name)
            .unwrap_or_else(|| format!("user {}", latest.user_id));
        return Err(AppError::Conflict(format!(
            "Computer still in use, please log out first : {}.",
            occupant
        )));
    }

    Ok(computer)
}

/// A computer whose components are being serviced cannot be used
pub async fn validate_components<S: InventoryStore + ?Sized>(
    store: &mut S,
    computer: &Computer,
) -> AppResult<()> {
    let statuses = store.component_statuses(computer.id).await?;
    if statuses.contains(&ItemStatus::UnderMaintenance) {
        return Err(AppError::Conflict(format!(
            "Computer is under maintenance : {}",
            computer.name
        )));
    }
    Ok(())
}

pub async fn update_latest_log<S: InventoryStore + ?Sized>(
    store: &mut S,
    computer_id: i32,
    log_uuid: Uuid,
) -> AppResult<()> {
    let updated = store.set_last_log(computer_id, log_uuid).await?;
    if updated == 0 {
        return Err(AppError::BadGateway(
            "An error has occurred please contact support.".to_string(),
        ));
    }
    Ok(())
}

/// Resolves and locks every named item, in request order.
///
/// Fails on the first name that does not resolve, then on the first item
/// that is under maintenance or already installed.
pub async fn validate_item_names<S: InventoryStore + ?Sized>(
    store: &mut S,
    names: &[String],
) -> AppResult<Vec<Item>> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Item listed more than once : {}",
                name
            )));
        }
    }

    let found = store.lock_items_by_names(names.to_vec()).await?;

    let mut items = Vec::with_capacity(names.len());
    for name in names {
        let item = found
            .iter()
            .find(|item| &item.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Item not found : {}", name)))?;
        items.push(item.clone());
    }

    for item in &items {
        match item.status {
            ItemStatus::UnderMaintenance => {
                return Err(AppError::Conflict(format!(
                    "Item is under maintenance : {}",
                    item.name
                )))
            }
            ItemStatus::InUse => {
                return Err(AppError::Conflict(format!(
                    "Item is already in use : {}",
                    item.name
                )))
            }
            ItemStatus::Available => {}
        }
    }

    Ok(items)
}

/// Installs `items` into the computer with one batched write.
/// A partial write fails the whole operation so the transaction rolls back.
pub async fn update_items<S: InventoryStore + ?Sized>(
    store: &mut S,
    items: &[Item],
    computer_id: i32,
    location_name: &str,
) -> AppResult<()> {
    let (batch, relocated) = ItemAssignment::for_items(items, computer_id, location_name);
    let expected = batch.item_ids.len() as u64;

    let updated = store.assign_items(batch).await?;
    if updated != expected {
        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        return Err(AppError::Internal(format!(
            "Updated {} of {} items for computer {} : {}",
            updated,
            expected,
            computer_id,
            names.join(", ")
        )));
    }

    tracing::debug!(
        computer_id,
        installed = updated,
        relocated,
        "Components assigned to computer"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        computer::fixtures::computer,
        computer_log::fixtures::log,
        item::fixtures::item,
        user::{fixtures::user, Role},
    };
    use crate::repository::store::MockInventoryStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_validate_user_missing() {
        let mut store = MockInventoryStore::new();
        store.expect_find_user().with(eq(7)).returning(|_| Ok(None));

        let err = validate_user(&mut store, 7).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains('7')));
    }

    #[tokio::test]
    async fn test_first_use_computer_is_available() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_computer()
            .with(eq(1))
            .returning(|id| Ok(Some(computer(id, None))));
        store.expect_find_log_by_uuid().never();

        let found = validate_computer(&mut store, 1).await.unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn test_open_last_session_names_occupant() {
        let open = log(4, 1, 5, None);
        let open_uuid = open.uuid;

        let mut store = MockInventoryStore::new();
        store
            .expect_lock_computer()
            .returning(move |id| Ok(Some(computer(id, Some(open_uuid)))));
        store
            .expect_find_log_by_uuid()
            .with(eq(open_uuid))
            .returning(move |_| Ok(Some(open.clone())));
        store
            .expect_find_user()
            .with(eq(5))
            .returning(|id| Ok(Some(user(id, "Ada", Role::Student))));

        let err = validate_computer(&mut store, 1).await.unwrap_err();
        match err {
            AppError::Conflict(msg) => assert!(msg.contains("Ada")),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_closed_last_session_is_available() {
        let closed = log(4, 1, 5, Some(Utc::now()));
        let closed_uuid = closed.uuid;

        let mut store = MockInventoryStore::new();
        store
            .expect_lock_computer()
            .returning(move |id| Ok(Some(computer(id, Some(closed_uuid)))));
        store
            .expect_find_log_by_uuid()
            .returning(move |_| Ok(Some(closed.clone())));

        assert!(validate_computer(&mut store, 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_computer() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_computer().returning(|_| Ok(None));

        let err = validate_computer(&mut store, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_components_under_maintenance() {
        let mut store = MockInventoryStore::new();
        store
            .expect_component_statuses()
            .returning(|_| Ok(vec![ItemStatus::InUse, ItemStatus::UnderMaintenance]));

        let err = validate_components(&mut store, &computer(1, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_latest_log_zero_rows() {
        let mut store = MockInventoryStore::new();
        store.expect_set_last_log().returning(|_, _| Ok(0));

        let err = update_latest_log(&mut store, 1, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadGateway(_)));
    }

    #[tokio::test]
    async fn test_item_names_reports_first_missing_in_request_order() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_items_by_names()
            .returning(|_| Ok(vec![item(1, "Mouse_1", ItemStatus::Available)]));

        let err = validate_item_names(&mut store, &names(&["Mouse_1", "Ghost_2", "Ghost_1"]))
            .await
            .unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Item not found : Ghost_2"),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_item_under_maintenance_rejected_before_any_write() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_items_by_names().returning(|_| {
            Ok(vec![
                item(1, "Mouse_1", ItemStatus::Available),
                item(2, "Mouse_2", ItemStatus::Available),
                item(3, "Mouse_3", ItemStatus::Available),
                item(4, "Mouse_4", ItemStatus::Available),
                item(5, "Printer_1", ItemStatus::UnderMaintenance),
            ])
        });
        store.expect_assign_items().never();

        let request = names(&["Mouse_1", "Mouse_2", "Mouse_3", "Mouse_4", "Printer_1"]);
        let err = validate_item_names(&mut store, &request).await.unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Item is under maintenance : Printer_1"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_item_in_use_rejected() {
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_items_by_names()
            .returning(|_| Ok(vec![item(1, "Mouse_1", ItemStatus::InUse)]));

        let err = validate_item_names(&mut store, &names(&["Mouse_1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("already in use")));
    }

    #[tokio::test]
    async fn test_duplicate_names_rejected() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_items_by_names().never();

        let err = validate_item_names(&mut store, &names(&["Mouse_1", "Mouse_1"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_items_single_batch() {
        let items = vec![
            item(1, "Mouse_1", ItemStatus::Available),
            item(2, "Keyboard_1", ItemStatus::Available),
        ];

        let mut store = MockInventoryStore::new();
        store
            .expect_assign_items()
            .times(1)
            .withf(|batch| batch.item_ids == vec![1, 2] && batch.computer_id == 9)
            .returning(|_| Ok(2));

        update_items(&mut store, &items, 9, "2CL3B").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_items_partial_write_fails() {
        let items = vec![
            item(1, "Mouse_1", ItemStatus::Available),
            item(2, "Keyboard_1", ItemStatus::Available),
        ];

        let mut store = MockInventoryStore::new();
        store.expect_assign_items().returning(|_| Ok(1));

        let err = update_items(&mut store, &items, 9, "2CL3B").await.unwrap_err();
        match err {
            AppError::Internal(msg) => {
                assert!(msg.contains("1 of 2"));
                assert!(msg.contains("Keyboard_1"));
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }
}
