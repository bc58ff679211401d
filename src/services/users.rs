//! User registration and profile management

use crate::{
    error::{AppError, AppResult},
    models::{
        identifier::Identifier,
        user::{AuthContext, CreateUser, Role, UpdateUser, User, UserQuery},
        PageRequest, Paginated,
    },
    repository::Repository,
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register an account. Students and professors may self-register; admin
    /// roles need a SUPER_ADMIN caller once a SUPER_ADMIN exists.
    pub async fn register(&self, caller: Option<&AuthContext>, user: CreateUser) -> AppResult<User> {
        if user.role.is_admin() {
            let bootstrap = !self.repository.users.role_exists(Role::SuperAdmin).await?;
            if !bootstrap {
                caller
                    .ok_or_else(|| {
                        AppError::Authorization(format!("Cannot self-register as {}", user.role))
                    })?
                    .require_super_admin()?;
            }
        }

        self.check_unique(Some(&user.email), user.id_number.as_deref(), None)
            .await?;

        let hash = hash_password(&user.password)?;
        let created = self.repository.users.create(&user, &hash).await?;
        tracing::info!("User {} registered with role {}", created.id, created.role);
        Ok(created)
    }

    pub async fn list(&self, ctx: &AuthContext, query: &UserQuery) -> AppResult<Paginated<User>> {
        ctx.require_admin()?;
        let page = PageRequest::new(query.page, query.items_per_page);
        let (users, total) = self.repository.users.search(query, page).await?;
        Ok(page.wrap(users, total))
    }

    /// Admins may read anyone; other users only themselves
    pub async fn get(&self, ctx: &AuthContext, identifier: &str) -> AppResult<User> {
        let user = self.find(identifier).await?;
        if user.id != ctx.user_id {
            ctx.require_admin()?;
        }
        Ok(user)
    }

    pub async fn update(&self, ctx: &AuthContext, identifier: &str, update: UpdateUser) -> AppResult<User> {
        ctx.require_admin()?;
        let user = self.find(identifier).await?;

        let touches_admin = user.role.is_admin() || update.role.map_or(false, |role| role.is_admin());
        if touches_admin && user.id != ctx.user_id {
            ctx.require_super_admin()?;
        }

        self.check_unique(update.email.as_deref(), update.id_number.as_deref(), Some(user.id))
            .await?;

        let updated = self.repository.users.update(user.id, &update).await?;
        tracing::info!("User {} updated by {}", updated.id, ctx.user_id);
        Ok(updated)
    }

    /// Change the caller's own year and section
    pub async fn change_section(&self, ctx: &AuthContext, section: &str) -> AppResult<User> {
        self.repository
            .users
            .update_section(ctx.user_id, section.trim())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id does not exist : {}", ctx.user_id)))
    }

    async fn find(&self, identifier: &str) -> AppResult<User> {
        let identifier = Identifier::parse(identifier);
        self.repository
            .users
            .get(&identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found : {}", identifier)))
    }

    async fn check_unique(
        &self,
        email: Option<&str>,
        id_number: Option<&str>,
        exclude_id: Option<i32>,
    ) -> AppResult<()> {
        if let Some(email) = email {
            if self.repository.users.email_exists(email, exclude_id).await? {
                return Err(AppError::Conflict(format!("Email already taken : {}", email)));
            }
        }
        if let Some(id_number) = id_number {
            if self
                .repository
                .users
                .id_number_exists(id_number, exclude_id)
                .await?
            {
                return Err(AppError::Conflict(format!(
                    "ID number already taken : {}",
                    id_number
                )));
            }
        }
        Ok(())
    }
}
