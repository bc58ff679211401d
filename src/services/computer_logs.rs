//! Computer usage sessions: tap-in opens a log, tap-out closes it

use crate::{
    error::{AppError, AppResult},
    models::{
        computer_log::{ComputerLog, CreateComputerLog},
        identifier::Identifier,
        user::AuthContext,
        PageRequest, Paginated,
    },
    repository::{store::InventoryStore, Repository},
    services::validator,
};

#[derive(Clone)]
pub struct ComputerLogsService {
    repository: Repository,
}

impl ComputerLogsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Open a session for the caller on the requested computer
    pub async fn create(&self, ctx: &AuthContext, request: CreateComputerLog) -> AppResult<ComputerLog> {
        let mut store = self.repository.begin().await?;
        let log = open_session(&mut store, ctx.user_id, request.computer_id).await?;
        store.commit().await?;

        tracing::info!(
            computer_id = log.computer_id,
            user_id = log.user_id,
            log = %log.uuid,
            "Session opened"
        );
        Ok(log)
    }

    /// Close a session; the caller is recorded as the closer
    pub async fn end_log(&self, ctx: &AuthContext, identifier: &str) -> AppResult<ComputerLog> {
        let identifier = Identifier::parse(identifier);
        let mut store = self.repository.begin().await?;
        let log = end_session(&mut store, identifier, ctx.user_id).await?;
        store.commit().await?;

        tracing::info!(
            computer_id = log.computer_id,
            ended_by = ctx.user_id,
            log = %log.uuid,
            "Session ended"
        );
        Ok(log)
    }

    pub async fn get(&self, identifier: &str) -> AppResult<ComputerLog> {
        let identifier = session_identifier(identifier)?;
        self.repository
            .computer_logs
            .get(&identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Computer log not found : {}", identifier)))
    }

    pub async fn list(&self, page: PageRequest) -> AppResult<Paginated<ComputerLog>> {
        let (logs, total) = self.repository.computer_logs.list(page).await?;
        Ok(page.wrap(logs, total))
    }
}

/// Sessions are addressed by id or uuid only
fn session_identifier(raw: &str) -> AppResult<Identifier> {
    match Identifier::parse(raw) {
        identifier @ (Identifier::Id(_) | Identifier::Uuid(_)) => Ok(identifier),
        _ => Err(AppError::BadRequest(format!(
            "Invalid computer log identifier : {}",
            raw
        ))),
    }
}

/// Validate, insert the session, then stamp the computer's last-log pointer
pub async fn open_session<S: InventoryStore + ?Sized>(
    store: &mut S,
    user_id: i32,
    computer_id: i32,
) -> AppResult<ComputerLog> {
    validator::validate_user(store, user_id).await?;
    let computer = validator::validate_computer(store, computer_id).await?;
    validator::validate_components(store, &computer).await?;

    let log = store.insert_log(computer.id, user_id).await?;
    validator::update_latest_log(store, computer.id, log.uuid).await?;
    Ok(log)
}

/// Close an open session. A closed session is left untouched.
pub async fn end_session<S: InventoryStore + ?Sized>(
    store: &mut S,
    identifier: Identifier,
    closed_by: i32,
) -> AppResult<ComputerLog> {
    let raw = identifier.to_string();
    if !matches!(identifier, Identifier::Id(_) | Identifier::Uuid(_)) {
        return Err(AppError::BadRequest(format!(
            "Invalid computer log identifier : {}",
            raw
        )));
    }

    let log = store
        .lock_log(identifier)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Computer log not found : {}", raw)))?;

    if !log.is_open() {
        return Err(AppError::Conflict(format!(
            "Computer log already ended : {}",
            log.uuid
        )));
    }

    store
        .close_log(log.id, closed_by)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Computer log already ended : {}", log.uuid)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        computer::fixtures::computer,
        computer_log::fixtures::log,
        item::ItemStatus,
        user::{fixtures::user, Role},
    };
    use crate::repository::store::MockInventoryStore;
    use chrono::Utc;
    use mockall::{predicate::eq, Sequence};

    #[tokio::test]
    async fn test_open_session_on_unused_computer() {
        let mut seq = Sequence::new();
        let mut store = MockInventoryStore::new();
        store
            .expect_find_user()
            .with(eq(5))
            .returning(|id| Ok(Some(user(id, "Ada", Role::Student))));
        store
            .expect_lock_computer()
            .with(eq(1))
            .returning(|id| Ok(Some(computer(id, None))));
        store
            .expect_component_statuses()
            .returning(|_| Ok(vec![ItemStatus::InUse; 4]));
        store
            .expect_insert_log()
            .with(eq(1), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|computer_id, user_id| Ok(log(10, computer_id, user_id, None)));
        store
            .expect_set_last_log()
            .withf(|computer_id, _| *computer_id == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(1));

        let opened = open_session(&mut store, 5, 1).await.unwrap();
        assert!(opened.is_open());
        assert_eq!(opened.user_id, 5);
    }

    #[tokio::test]
    async fn test_open_session_rejected_while_occupied() {
        let current = log(3, 1, 8, None);
        let current_uuid = current.uuid;

        let mut store = MockInventoryStore::new();
        store
            .expect_find_user()
            .returning(|id| Ok(Some(user(id, if id == 8 { "Grace" } else { "Ada" }, Role::Student))));
        store
            .expect_lock_computer()
            .returning(move |id| Ok(Some(computer(id, Some(current_uuid)))));
        store
            .expect_find_log_by_uuid()
            .returning(move |_| Ok(Some(current.clone())));
        store.expect_insert_log().never();
        store.expect_set_last_log().never();

        let err = open_session(&mut store, 5, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg.contains("Grace")));
    }

    #[tokio::test]
    async fn test_open_session_rejected_during_maintenance() {
        let mut store = MockInventoryStore::new();
        store
            .expect_find_user()
            .returning(|id| Ok(Some(user(id, "Ada", Role::Student))));
        store
            .expect_lock_computer()
            .returning(|id| Ok(Some(computer(id, None))));
        store
            .expect_component_statuses()
            .returning(|_| Ok(vec![ItemStatus::UnderMaintenance, ItemStatus::InUse]));
        store.expect_insert_log().never();

        let err = open_session(&mut store, 5, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_end_session_then_end_again() {
        let open = log(10, 1, 5, None);
        let id = open.id;

        let mut store = MockInventoryStore::new();
        let opened = open.clone();
        store
            .expect_lock_log()
            .with(eq(Identifier::Id(id)))
            .times(1)
            .returning(move |_| Ok(Some(opened.clone())));
        store
            .expect_close_log()
            .with(eq(id), eq(6))
            .times(1)
            .returning(move |_, closer| {
                let mut closed = open.clone();
                closed.ended_at = Some(Utc::now());
                closed.ended_by = Some(closer);
                Ok(Some(closed))
            });

        let closed = end_session(&mut store, Identifier::Id(id), 6).await.unwrap();
        assert!(!closed.is_open());
        assert_eq!(closed.ended_by, Some(6));

        let ended_at = closed.ended_at;
        let mut store = MockInventoryStore::new();
        store
            .expect_lock_log()
            .returning(move |_| Ok(Some(closed.clone())));
        store.expect_close_log().never();

        let err = end_session(&mut store, Identifier::Id(id), 7).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(ended_at.is_some());
    }

    #[tokio::test]
    async fn test_end_session_missing() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_log().returning(|_| Ok(None));

        let err = end_session(&mut store, Identifier::Id(404), 6).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_end_session_rejects_natural_keys() {
        let mut store = MockInventoryStore::new();
        store.expect_lock_log().never();

        let err = end_session(&mut store, Identifier::parse("PC-01"), 6)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
