//! Computer assembly and status endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::computer::{
        Computer, ComputerQuery, ComputerStatusResponse, CreateComputer, RelocateComputer,
    },
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser};

/// Assemble a computer from free components (admin only)
///
/// Validates every named component, creates the computer and installs the
/// components in one transaction.
#[utoipa::path(
    post,
    path = "/computers",
    tag = "computers",
    security(("bearer_auth" = [])),
    request_body = CreateComputer,
    responses(
        (status = 201, description = "Computer assembled", body = Computer),
        (status = 404, description = "Unknown component or location", body = crate::error::ErrorResponse),
        (status = 409, description = "Name taken or component unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_computer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateComputer>,
) -> AppResult<ApiResponse<Computer>> {
    request.validate()?;
    let computer = state.services.computers.create(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully created computer", computer))
}

#[utoipa::path(
    get,
    path = "/computers",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(ComputerQuery),
    responses(
        (status = 200, description = "Paginated computers")
    )
)]
pub async fn list_computers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<ComputerQuery>,
) -> AppResult<ApiResponse<Paginated<Computer>>> {
    let computers = state.services.computers.list(&query).await?;
    Ok(ApiResponse::ok("Successfully fetched computers", computers))
}

#[utoipa::path(
    get,
    path = "/computers/{identifier}",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or computer name")),
    responses(
        (status = 200, description = "Computer found", body = Computer),
        (status = 404, description = "Computer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_computer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Computer>> {
    let computer = state.services.computers.get(&identifier).await?;
    Ok(ApiResponse::ok("Successfully fetched computer", computer))
}

/// Current availability of a computer
#[utoipa::path(
    get,
    path = "/computers/status/{identifier}",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or computer name")),
    responses(
        (status = 200, description = "Computer status", body = ComputerStatusResponse),
        (status = 404, description = "Computer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_computer_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<ComputerStatusResponse>> {
    let status = state.services.computers.status(&identifier).await?;
    Ok(ApiResponse::ok("Successfully fetched computer status", status))
}

/// Move a computer and its components (admin only)
#[utoipa::path(
    patch,
    path = "/computers/location/{identifier}",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or computer name")),
    request_body = RelocateComputer,
    responses(
        (status = 200, description = "Computer moved", body = Computer),
        (status = 404, description = "Computer or location not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn relocate_computer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
    Json(request): Json<RelocateComputer>,
) -> AppResult<ApiResponse<Computer>> {
    request.validate()?;
    let computer = state
        .services
        .computers
        .relocate(&ctx, &identifier, request)
        .await?;
    Ok(ApiResponse::ok("Successfully moved computer", computer))
}

#[utoipa::path(
    patch,
    path = "/computers/archive/{identifier}",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or computer name")),
    responses(
        (status = 200, description = "Computer archived", body = Computer)
    )
)]
pub async fn archive_computer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Computer>> {
    let computer = state
        .services
        .computers
        .set_archived(&ctx, &identifier, true)
        .await?;
    Ok(ApiResponse::ok("Successfully archived computer", computer))
}

#[utoipa::path(
    patch,
    path = "/computers/unarchive/{identifier}",
    tag = "computers",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or computer name")),
    responses(
        (status = 200, description = "Computer restored", body = Computer)
    )
)]
pub async fn unarchive_computer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<Computer>> {
    let computer = state
        .services
        .computers
        .set_archived(&ctx, &identifier, false)
        .await?;
    Ok(ApiResponse::ok("Successfully unarchived computer", computer))
}
