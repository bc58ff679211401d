//! User registration and profile endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{ChangeSection, CreateUser, UpdateUser, User, UserQuery},
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser};

/// Register a new account
///
/// Students and professors may register themselves. Admin roles require a
/// super admin token once a super admin exists.
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin role requires a super admin", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or ID number taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    caller: Option<AuthenticatedUser>,
    Json(request): Json<CreateUser>,
) -> AppResult<ApiResponse<User>> {
    request.validate()?;
    let caller = caller.map(|AuthenticatedUser(ctx)| ctx);
    let user = state.services.users.register(caller.as_ref(), request).await?;
    Ok(ApiResponse::created("Successfully registered", user))
}

/// List users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserQuery),
    responses(
        (status = 200, description = "Paginated users"),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<UserQuery>,
) -> AppResult<ApiResponse<Paginated<User>>> {
    let users = state.services.users.list(&ctx, &query).await?;
    Ok(ApiResponse::ok("Successfully fetched users", users))
}

/// Get a user by ID, email or ID number
#[utoipa::path(
    get,
    path = "/users/{identifier}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID, email or ID number")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 403, description = "Not your account", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<User>> {
    let user = state.services.users.get(&ctx, &identifier).await?;
    Ok(ApiResponse::ok("Successfully fetched user", user))
}

/// Change the caller's year and section
#[utoipa::path(
    patch,
    path = "/users/change-section",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = ChangeSection,
    responses(
        (status = 200, description = "Section updated", body = User)
    )
)]
pub async fn change_section(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<ChangeSection>,
) -> AppResult<ApiResponse<User>> {
    request.validate()?;
    let user = state
        .services
        .users
        .change_section(&ctx, &request.section)
        .await?;
    Ok(ApiResponse::ok("Successfully changed section", user))
}

/// Update a user (admin only)
#[utoipa::path(
    patch,
    path = "/users/{identifier}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID, email or ID number")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email or ID number taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
    Json(request): Json<UpdateUser>,
) -> AppResult<ApiResponse<User>> {
    request.validate()?;
    let user = state
        .services
        .users
        .update(&ctx, &identifier, request)
        .await?;
    Ok(ApiResponse::ok("Successfully updated user", user))
}
