//! Damage report endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::report::{CreateReport, Report, ReportSummary, ReportSummaryQuery, UserReportsQuery},
    models::Paginated,
};

use super::{ApiResponse, AuthenticatedUser, PageQuery};

/// File a report against an item
#[utoipa::path(
    post,
    path = "/report",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = CreateReport,
    responses(
        (status = 201, description = "Report filed", body = Report),
        (status = 404, description = "Item not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(request): Json<CreateReport>,
) -> AppResult<ApiResponse<Report>> {
    request.validate()?;
    let report = state.services.reports.create(&ctx, request).await?;
    Ok(ApiResponse::created("Successfully created report", report))
}

/// List all reports (admin only)
#[utoipa::path(
    get,
    path = "/report",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated reports"),
        (status = 403, description = "Admin only", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Paginated<Report>>> {
    let reports = state.services.reports.list(&ctx, query.into()).await?;
    Ok(ApiResponse::ok("Successfully fetched reports", reports))
}

/// Reports filed by a user, the caller by default
#[utoipa::path(
    get,
    path = "/report/user-reports",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(UserReportsQuery),
    responses(
        (status = 200, description = "Paginated reports"),
        (status = 403, description = "Another user's reports", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<UserReportsQuery>,
) -> AppResult<ApiResponse<Paginated<Report>>> {
    let reports = state.services.reports.list_by_user(&ctx, &query).await?;
    Ok(ApiResponse::ok("Successfully fetched user reports", reports))
}

/// Report rollup over an inclusive date range (admin only)
#[utoipa::path(
    get,
    path = "/report/report-summary",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportSummaryQuery),
    responses(
        (status = 200, description = "Report summary", body = ReportSummary),
        (status = 400, description = "Invalid date range", body = crate::error::ErrorResponse)
    )
)]
pub async fn report_summary(
    State(state): State<crate::AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Query(query): Query<ReportSummaryQuery>,
) -> AppResult<ApiResponse<ReportSummary>> {
    let summary = state.services.reports.summary(&ctx, &query).await?;
    Ok(ApiResponse::ok("Successfully fetched report summary", summary))
}
