//! Maintenance scheduling endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{CreateMaintenance, Maintenance},
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser, PageQuery};

/// Schedule maintenance on a computer (admin only)
///
/// Every component of the computer becomes UNDER_MAINTENANCE.
#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenance,
    responses(
        (status = 201, description = "Maintenance scheduled", body = Maintenance),
        (status = 404, description = "Computer not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateMaintenance>,
) -> AppResult<ApiResponse<Maintenance>> {
    let maintenance = state.services.maintenance.create(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully scheduled maintenance", maintenance))
}

#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated maintenance records")
    )
)]
pub async fn list_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<Maintenance>>> {
    let records = state.services.maintenance.list(query.into()).await?;
    Ok(ApiResponse::ok("Successfully fetched maintenance", records))
}

#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance found", body = Maintenance),
        (status = 404, description = "Maintenance not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_maintenance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Maintenance>> {
    let maintenance = state.services.maintenance.get(id).await?;
    Ok(ApiResponse::ok("Successfully fetched maintenance", maintenance))
}

/// Complete maintenance (admin only); components return to IN_USE
#[utoipa::path(
    patch,
    path = "/maintenance/mark-as-done/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance ID")),
    responses(
        (status = 200, description = "Maintenance completed", body = Maintenance),
        (status = 404, description = "Maintenance not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already done", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_maintenance_done(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<Maintenance>> {
    let maintenance = state.services.maintenance.mark_as_done(&ctx, id).await?;
    Ok(ApiResponse::ok("Successfully marked maintenance as done", maintenance))
}
