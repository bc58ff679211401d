//! Item category endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::category::{Category, CreateCategory},
};

use super::{ApiResponse, AuthenticatedUser};

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 409, description = "Category exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateCategory>,
) -> AppResult<ApiResponse<Category>> {
    request.validate()?;
    let category = state.services.items.create_category(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully created category", category))
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = Vec<Category>)
    )
)]
pub async fn list_categories(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let categories = state.services.items.list_categories().await?;
    Ok(ApiResponse::ok("Successfully fetched categories", categories))
}

#[utoipa::path(
    get,
    path = "/categories/{name}",
    tag = "categories",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Category name")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(name): Path<String>,
) -> AppResult<ApiResponse<Category>> {
    let category = state.services.items.get_category(&name).await?;
    Ok(ApiResponse::ok("Successfully fetched category", category))
}
