//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, categories, computer_logs, computers, health, items, locations, maintenance, reports,
    users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Assets API",
        version = "1.0.0",
        description = "Campus IT asset tracking REST API: inventory, computer sessions, maintenance and damage reports"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::login_admin,
        auth::login_super_admin,
        auth::login_card,
        auth::add_admin,
        auth::check_admin,
        auth::forgot_password,
        auth::reset_password,
        // Users
        users::register,
        users::list_users,
        users::get_user,
        users::change_section,
        users::update_user,
        // Categories
        categories::create_category,
        categories::list_categories,
        categories::get_category,
        // Locations
        locations::create_location,
        locations::list_locations,
        locations::get_location,
        // Items
        items::create_item,
        items::list_items,
        items::get_item,
        items::list_items_by_category,
        items::update_item_status,
        items::update_item_location,
        items::archive_item,
        items::unarchive_item,
        // Computers
        computers::create_computer,
        computers::list_computers,
        computers::get_computer,
        computers::get_computer_status,
        computers::relocate_computer,
        computers::archive_computer,
        computers::unarchive_computer,
        // Sessions
        computer_logs::create_computer_log,
        computer_logs::list_computer_logs,
        computer_logs::get_computer_log,
        computer_logs::end_computer_log,
        // Maintenance
        maintenance::create_maintenance,
        maintenance::list_maintenance,
        maintenance::get_maintenance,
        maintenance::mark_maintenance_done,
        // Reports
        reports::create_report,
        reports::list_reports,
        reports::list_user_reports,
        reports::report_summary,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::AdminLoginRequest,
            auth::SuperAdminLoginRequest,
            auth::CardLoginRequest,
            auth::AddAdminRequest,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            auth::TokenResponse,
            auth::CheckAdminResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::ChangeSection,
            // Categories and locations
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::location::Location,
            crate::models::location::FloorType,
            crate::models::location::CreateLocation,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemStatus,
            crate::models::item::CreateItem,
            crate::models::item::UpdateItemStatus,
            crate::models::item::UpdateItemLocation,
            // Computers
            crate::models::computer::Computer,
            crate::models::computer::CreateComputer,
            crate::models::computer::RelocateComputer,
            crate::models::computer::ComputerStatus,
            crate::models::computer::ComputerStatusResponse,
            // Sessions
            crate::models::computer_log::ComputerLog,
            crate::models::computer_log::CreateComputerLog,
            // Maintenance
            crate::models::maintenance::Maintenance,
            crate::models::maintenance::CreateMaintenance,
            // Reports
            crate::models::report::Report,
            crate::models::report::CreateReport,
            crate::models::report::ReportSummary,
            crate::models::report::DateRange,
            crate::models::report::MostReportedItem,
            crate::models::report::TopReporter,
            crate::models::report::MostReportedLocation,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "categories", description = "Item categories"),
        (name = "locations", description = "Rooms and labs"),
        (name = "items", description = "Inventory items"),
        (name = "computers", description = "Computer assembly and status"),
        (name = "computer-logs", description = "Computer sessions"),
        (name = "maintenance", description = "Maintenance scheduling"),
        (name = "reports", description = "Damage reports")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_session_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/computer-logs/end-log/{identifier}"));
        assert!(doc.paths.paths.contains_key("/computers/status/{identifier}"));
        assert!(doc.paths.paths.contains_key("/report/report-summary"));
    }
}
