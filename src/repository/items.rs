//! Items repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        identifier::Identifier,
        item::{CreateItem, Item, ItemQuery, ItemStatus},
        PageRequest,
    },
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by id, uuid or name
    pub async fn get(&self, identifier: &Identifier) -> AppResult<Option<Item>> {
        let item = match identifier {
            Identifier::Id(id) => {
                sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
                    .bind(*id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Identifier::Uuid(uuid) => {
                sqlx::query_as::<_, Item>("SELECT * FROM items WHERE uuid = $1")
                    .bind(*uuid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            _ => match identifier.natural_key() {
                Some(name) => {
                    sqlx::query_as::<_, Item>("SELECT * FROM items WHERE name = $1")
                        .bind(name)
                        .fetch_optional(&self.pool)
                        .await?
                }
                None => None,
            },
        };
        Ok(item)
    }

    pub async fn name_exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Search items with filters and pagination, archived items excluded
    pub async fn search(&self, query: &ItemQuery, page: PageRequest) -> AppResult<(Vec<Item>, i64)> {
        let mut conditions = vec!["is_archived = FALSE".to_string()];
        let mut params: Vec<String> = Vec::new();

        if let Some(ref category) = query.category_name {
            params.push(category.to_uppercase());
            conditions.push(format!("category_name = ${}", params.len()));
        }

        if let Some(ref location) = query.location_name {
            params.push(location.to_uppercase());
            conditions.push(format!("location_name = ${}", params.len()));
        }

        if let Some(status) = query.status {
            params.push(status.as_str().to_string());
            conditions.push(format!("status::text = ${}", params.len()));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_query = format!("SELECT COUNT(*) FROM items {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_builder = count_builder.bind(param);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT * FROM items {} ORDER BY id LIMIT {} OFFSET {}",
            where_clause,
            page.items_per_page,
            page.offset()
        );
        let mut select_builder = sqlx::query_as::<_, Item>(&select_query);
        for param in &params {
            select_builder = select_builder.bind(param);
        }
        let items = select_builder.fetch_all(&self.pool).await?;

        Ok((items, total))
    }

    pub async fn list_by_category(&self, category_name: &str) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE category_name = UPPER($1) AND is_archived = FALSE
            ORDER BY id
            "#,
        )
        .bind(category_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Components installed in a computer
    pub async fn list_by_computer(&self, computer_id: i32) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE computer_id = $1 ORDER BY id")
            .bind(computer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Create a new item, initially AVAILABLE
    pub async fn create(&self, item: &CreateItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (uuid, name, category_name, location_name, status, metadata)
            VALUES ($1, $2, UPPER($3), UPPER($4), $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&item.name)
        .bind(&item.category_name)
        .bind(&item.location_name)
        .bind(ItemStatus::Available)
        .bind(&item.metadata)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update_status(&self, id: i32, status: ItemStatus) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "UPDATE items SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update_location(&self, id: i32, location_name: &str) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "UPDATE items SET location_name = UPPER($2), updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(location_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn set_archived(&self, id: i32, archived: bool) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            "UPDATE items SET is_archived = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(archived)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }
}
