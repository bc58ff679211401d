//! Users repository for database operations

use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        identifier::Identifier,
        user::{CreateUser, Role, UpdateUser, User, UserMetadata, UserQuery},
        PageRequest,
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by id, uuid, email or id number
    pub async fn get(&self, identifier: &Identifier) -> AppResult<Option<User>> {
        let user = match identifier {
            Identifier::Id(id) => return self.get_by_id(*id).await,
            Identifier::Uuid(uuid) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE uuid = $1")
                    .bind(*uuid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Identifier::Email(email) => return self.get_by_email(email).await,
            Identifier::Natural(id_number) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id_number = $1")
                    .bind(id_number)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_by_card_key(&self, card_key: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE card_key = $1")
            .bind(card_key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check if email already exists
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(email) = LOWER($1) AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check if id number already exists
    pub async fn id_number_exists(&self, id_number: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE id_number = $1 AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(id_number)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn role_exists(&self, role: Role) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE role = $1)")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Search users with pagination
    pub async fn search(&self, query: &UserQuery, page: PageRequest) -> AppResult<(Vec<User>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
        )
        .bind(query.role)
        .fetch_one(&self.pool)
        .await?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.role)
        .bind(page.items_per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((users, total))
    }

    /// Create a new user with an already hashed password
    pub async fn create(&self, user: &CreateUser, password_hash: &str) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (uuid, email, id_number, name, year_section, role, password, card_key, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.id_number)
        .bind(&user.name)
        .bind(&user.year_section)
        .bind(user.role)
        .bind(password_hash)
        .bind(&user.card_key)
        .bind(Json(UserMetadata::default()))
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Update the provided fields of an existing user
    pub async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<User> {
        let mut sets = vec!["updated_at = NOW()".to_string()];
        let mut param_idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, param_idx));
                    param_idx += 1;
                }
            };
        }

        add_field!(user.email, "email");
        add_field!(user.id_number, "id_number");
        add_field!(user.name, "name");
        add_field!(user.year_section, "year_section");
        add_field!(user.role, "role");
        add_field!(user.card_key, "card_key");

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING *",
            sets.join(", ")
        );

        let mut builder = sqlx::query_as::<_, User>(&query).bind(id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(user.email);
        bind_field!(user.id_number);
        bind_field!(user.name);
        bind_field!(user.year_section);
        bind_field!(user.role);
        bind_field!(user.card_key);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id does not exist : {}", id)))
    }

    pub async fn update_section(&self, id: i32, section: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET year_section = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(section)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: i32, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace the metadata blob
    pub async fn update_metadata(&self, id: i32, metadata: &UserMetadata) -> AppResult<()> {
        sqlx::query("UPDATE users SET metadata = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(Json(metadata))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
