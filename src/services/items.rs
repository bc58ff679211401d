//! Component registry: items, categories and locations

use crate::{
    error::{AppError, AppResult},
    models::{
        category::{Category, CreateCategory},
        identifier::Identifier,
        item::{CreateItem, Item, ItemQuery, ItemStatus},
        location::{CreateLocation, Location},
        user::AuthContext,
        PageRequest, Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    pub async fn create_category(
        &self,
        ctx: &AuthContext,
        request: CreateCategory,
    ) -> AppResult<Category> {
        ctx.require_admin()?;
        let name = request.name.trim().to_uppercase();

        if self.repository.categories.get_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!("Category already exists : {}", name)));
        }

        let category = self.repository.categories.create(&name).await?;
        tracing::info!(name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_category(&self, name: &str) -> AppResult<Category> {
        self.repository
            .categories
            .get_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category not found : {}", name)))
    }

    // =========================================================================
    // LOCATIONS
    // =========================================================================

    pub async fn create_location(
        &self,
        ctx: &AuthContext,
        request: CreateLocation,
    ) -> AppResult<Location> {
        ctx.require_admin()?;
        let name = request.name.trim().to_uppercase();

        if self.repository.locations.get_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!("Location already exists : {}", name)));
        }

        let location = self.repository.locations.create(&name, request.floor).await?;
        tracing::info!(name = %location.name, "Location created");
        Ok(location)
    }

    pub async fn list_locations(&self) -> AppResult<Vec<Location>> {
        self.repository.locations.list().await
    }

    pub async fn get_location(&self, name: &str) -> AppResult<Location> {
        self.repository
            .locations
            .get_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location does not exist : {}", name)))
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Register a new component; names are unique across all items
    pub async fn create(&self, ctx: &AuthContext, request: CreateItem) -> AppResult<Item> {
        ctx.require_admin()?;

        if self.repository.items.name_exists(&request.name).await? {
            return Err(AppError::Conflict(format!("Item name taken : {}", request.name)));
        }
        self.get_category(&request.category_name).await?;
        self.get_location(&request.location_name).await?;

        let item = self.repository.items.create(&request).await?;
        tracing::info!(item_id = item.id, name = %item.name, "Item created");
        Ok(item)
    }

    pub async fn list(&self, query: &ItemQuery) -> AppResult<Paginated<Item>> {
        let page = PageRequest::new(query.page, query.items_per_page);
        let (items, total) = self.repository.items.search(query, page).await?;
        Ok(page.wrap(items, total))
    }

    pub async fn get(&self, identifier: &str) -> AppResult<Item> {
        let identifier = Identifier::parse(identifier);
        self.repository
            .items
            .get(&identifier)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found : {}", identifier)))
    }

    pub async fn list_by_category(&self, category_name: &str) -> AppResult<Vec<Item>> {
        self.get_category(category_name).await?;
        self.repository.items.list_by_category(category_name).await
    }

    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        identifier: &str,
        status: ItemStatus,
    ) -> AppResult<Item> {
        ctx.require_admin()?;
        let item = self.get(identifier).await?;

        let updated = self
            .repository
            .items
            .update_status(item.id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found : {}", identifier)))?;

        tracing::info!(item_id = item.id, from = %item.status, to = %status, "Item status changed");
        Ok(updated)
    }

    pub async fn update_location(
        &self,
        ctx: &AuthContext,
        identifier: &str,
        location_name: &str,
    ) -> AppResult<Item> {
        ctx.require_admin()?;
        let item = self.get(identifier).await?;
        let location = self.get_location(location_name).await?;

        self.repository
            .items
            .update_location(item.id, &location.name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found : {}", identifier)))
    }

    pub async fn set_archived(
        &self,
        ctx: &AuthContext,
        identifier: &str,
        archived: bool,
    ) -> AppResult<Item> {
        ctx.require_admin()?;
        let item = self.get(identifier).await?;

        if archived && item.computer_id.is_some() {
            return Err(AppError::Conflict(format!(
                "Item is installed in a computer : {}",
                item.name
            )));
        }

        self.repository
            .items
            .set_archived(item.id, archived)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item not found : {}", identifier)))
    }
}
