//! Condition reports and the summary rollup

use crate::{
    error::{AppError, AppResult},
    models::{
        identifier::Identifier,
        report::{CreateReport, Report, ReportSummary, ReportSummaryQuery, UserReportsQuery},
        user::AuthContext,
        PageRequest, Paginated,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// File a report against an item; the caller is the reporter
    pub async fn create(&self, ctx: &AuthContext, request: CreateReport) -> AppResult<Report> {
        if self.repository.items.get(&Identifier::Id(request.item_id)).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Item with id does not exist : {}",
                request.item_id
            )));
        }

        let report = self.repository.reports.create(&request, ctx.user_id).await?;
        tracing::info!(
            report_id = report.id,
            item_id = report.item_id,
            reported_by = ctx.user_id,
            "Report filed"
        );
        Ok(report)
    }

    /// Every report (admin only)
    pub async fn list(&self, ctx: &AuthContext, page: PageRequest) -> AppResult<Paginated<Report>> {
        ctx.require_admin()?;
        let (reports, total) = self.repository.reports.list(None, page).await?;
        Ok(page.wrap(reports, total))
    }

    /// Reports filed by one user; anyone but an admin only sees their own
    pub async fn list_by_user(
        &self,
        ctx: &AuthContext,
        query: &UserReportsQuery,
    ) -> AppResult<Paginated<Report>> {
        let user_id = query.user_id.unwrap_or(ctx.user_id);
        if user_id != ctx.user_id {
            ctx.require_admin()?;
        }

        let page = PageRequest::new(query.page, query.items_per_page);
        let (reports, total) = self.repository.reports.list(Some(user_id), page).await?;
        Ok(page.wrap(reports, total))
    }

    /// Rollup over every report filed in the inclusive date range (admin only)
    pub async fn summary(&self, ctx: &AuthContext, query: &ReportSummaryQuery) -> AppResult<ReportSummary> {
        ctx.require_admin()?;
        let (start, end) = query.range()?;

        let rows = self.repository.reports.rows_between(start, end).await?;
        tracing::debug!(%start, %end, reports = rows.len(), "Building report summary");

        Ok(ReportSummary::from_rows(start, end, &rows))
    }
}
