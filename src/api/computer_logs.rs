//! Computer session endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::computer_log::{ComputerLog, CreateComputerLog},
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser, PageQuery};

/// Open a session on a computer for the caller
#[utoipa::path(
    post,
    path = "/computer-logs",
    tag = "computer-logs",
    security(("bearer_auth" = [])),
    request_body = CreateComputerLog,
    responses(
        (status = 201, description = "Session opened", body = ComputerLog),
        (status = 404, description = "User or computer not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Computer in use or under maintenance", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_computer_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateComputerLog>,
) -> AppResult<ApiResponse<ComputerLog>> {
    let log = state.services.computer_logs.create(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully logged in to computer", log))
}

#[utoipa::path(
    get,
    path = "/computer-logs",
    tag = "computer-logs",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated sessions, newest first")
    )
)]
pub async fn list_computer_logs(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<ComputerLog>>> {
    let logs = state.services.computer_logs.list(query.into()).await?;
    Ok(ApiResponse::ok("Successfully fetched computer logs", logs))
}

#[utoipa::path(
    get,
    path = "/computer-logs/{identifier}",
    tag = "computer-logs",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or session UUID")),
    responses(
        (status = 200, description = "Session found", body = ComputerLog),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_computer_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<ComputerLog>> {
    let log = state.services.computer_logs.get(&identifier).await?;
    Ok(ApiResponse::ok("Successfully fetched computer log", log))
}

/// Close an open session
#[utoipa::path(
    patch,
    path = "/computer-logs/end-log/{identifier}",
    tag = "computer-logs",
    security(("bearer_auth" = [])),
    params(("identifier" = String, Path, description = "Numeric ID or session UUID")),
    responses(
        (status = 200, description = "Session closed", body = ComputerLog),
        (status = 404, description = "Session not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Session already ended", body = crate::error::ErrorResponse)
    )
)]
pub async fn end_computer_log(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(identifier): Path<String>,
) -> AppResult<ApiResponse<ComputerLog>> {
    let log = state.services.computer_logs.end_log(&ctx, &identifier).await?;
    Ok(ApiResponse::ok("Successfully logged out of computer", log))
}
