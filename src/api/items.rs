//! Inventory item endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::item::{CreateItem, Item, ItemQuery, UpdateItemLocation, UpdateItemStatus},
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser};

/// Register an item (admin only)
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    request_body = CreateItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 404, description = "Unknown category or location", body = crate::error::ErrorResponse),
        (status = 409, description = "Item name taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateItem>,
) -> AppResult<ApiResponse<Item>> {
    request.validate()?;
    let item = state.services.items.create(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully created item", item))
}

/// List items with optional filters
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    security(("bearer_auth" = [])),
    params(ItemQuery),
    responses(
        (status = 200, description = "Paginated items")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<ItemQuery>,
) -> AppResult<ApiResponse<Paginated<Item>>> {
    let items = state.services.items.list(&query).await?;
    Ok(ApiResponse::ok("Successfully fetched items", items))
}

/// Get an item by ID or name
#[utoipa::path(
    get,
    path = "/items/{identifier}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or item name")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Item>> {
    let item = state.services.items.get(&identifier).await?;
    Ok(ApiResponse::ok("Successfully fetched item", item))
}

#[utoipa::path(
    get,
    path = "/items/category/{category_name}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("category_name" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Items in category", body = Vec<Item>),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_items_by_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(category_name): Path<String>,
) -> AppResult<ApiResponse<Vec<Item>>> {
    let items = state.services.items.list_by_category(&category_name).await?;
    Ok(ApiResponse::ok("Successfully fetched items", items))
}

/// Change item status (admin only)
#[utoipa::path(
    patch,
    path = "/items/status/{identifier}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or item name")),
    request_body = UpdateItemStatus,
    responses(
        (status = 200, description = "Status updated", body = Item),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_item_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
    Json(request): Json<UpdateItemStatus>,
) -> AppResult<ApiResponse<Item>> {
    let item = state
        .services
        .items
        .update_status(&ctx, &identifier, request.status)
        .await?;
    Ok(ApiResponse::ok("Successfully updated item status", item))
}

/// Move an item (admin only)
#[utoipa::path(
    patch,
    path = "/items/location/{identifier}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or item name")),
    request_body = UpdateItemLocation,
    responses(
        (status = 200, description = "Location updated", body = Item),
        (status = 404, description = "Item or location not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_item_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
    Json(request): Json<UpdateItemLocation>,
) -> AppResult<ApiResponse<Item>> {
    request.validate()?;
    let item = state
        .services
        .items
        .update_location(&ctx, &identifier, &request.location_name)
        .await?;
    Ok(ApiResponse::ok("Successfully updated item location", item))
}

/// Archive an item (admin only)
#[utoipa::path(
    patch,
    path = "/items/archive/{identifier}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or item name")),
    responses(
        (status = 200, description = "Item archived", body = Item),
        (status = 409, description = "Item is installed in a computer", body = crate::error::ErrorResponse)
    )
)]
pub async fn archive_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Item>> {
    let item = state
        .services
        .items
        .set_archived(&ctx, &identifier, true)
        .await?;
    Ok(ApiResponse::ok("Successfully archived item", item))
}

#[utoipa::path(
    patch,
    path = "/items/unarchive/{identifier}",
    tag = "items",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or item name")),
    responses(
        (status = 200, description = "Item restored", body = Item)
    )
)]
pub async fn unarchive_item(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Item>> {
    let item = state
        .services
        .items
        .set_archived(&ctx, &identifier, false)
        .await?;
    Ok(ApiResponse::ok("Successfully unarchived item", item))
}
