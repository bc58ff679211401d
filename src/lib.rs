//! Campus Assets
//!
//! REST JSON API for tracking campus IT assets: inventory items, assembled
//! computers, computer sessions, maintenance and damage reports.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/loginAdmin", post(api::auth::login_admin))
        .route("/auth/loginSuperAdmin", post(api::auth::login_super_admin))
        .route("/auth/loginCard", post(api::auth::login_card))
        .route("/auth/addAdmin", post(api::auth::add_admin))
        .route("/auth/checkAdmin", get(api::auth::check_admin))
        .route("/auth/forgot-password", post(api::auth::forgot_password))
        .route("/auth/reset-password", post(api::auth::reset_password))
        // Users
        .route("/users", get(api::users::list_users))
        .route("/users/register", post(api::users::register))
        .route("/users/change-section", patch(api::users::change_section))
        .route(
            "/users/:identifier",
            get(api::users::get_user).patch(api::users::update_user),
        )
        // Categories
        .route(
            "/categories",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route("/categories/:name", get(api::categories::get_category))
        // Locations
        .route(
            "/locations",
            get(api::locations::list_locations).post(api::locations::create_location),
        )
        .route("/locations/:name", get(api::locations::get_location))
        // Items
        .route(
            "/items",
            get(api::items::list_items).post(api::items::create_item),
        )
        .route("/items/:identifier", get(api::items::get_item))
        .route(
            "/items/category/:category_name",
            get(api::items::list_items_by_category),
        )
        .route("/items/status/:identifier", patch(api::items::update_item_status))
        .route(
            "/items/location/:identifier",
            patch(api::items::update_item_location),
        )
        .route("/items/archive/:identifier", patch(api::items::archive_item))
        .route("/items/unarchive/:identifier", patch(api::items::unarchive_item))
        // Computers
        .route(
            "/computers",
            get(api::computers::list_computers).post(api::computers::create_computer),
        )
        .route("/computers/:identifier", get(api::computers::get_computer))
        .route(
            "/computers/status/:identifier",
            get(api::computers::get_computer_status),
        )
        .route(
            "/computers/location/:identifier",
            patch(api::computers::relocate_computer),
        )
        .route(
            "/computers/archive/:identifier",
            patch(api::computers::archive_computer),
        )
        .route(
            "/computers/unarchive/:identifier",
            patch(api::computers::unarchive_computer),
        )
        // Computer sessions
        .route(
            "/computer-logs",
            get(api::computer_logs::list_computer_logs)
                .post(api::computer_logs::create_computer_log),
        )
        .route(
            "/computer-logs/:identifier",
            get(api::computer_logs::get_computer_log),
        )
        .route(
            "/computer-logs/end-log/:identifier",
            patch(api::computer_logs::end_computer_log),
        )
        // Maintenance
        .route(
            "/maintenance",
            get(api::maintenance::list_maintenance).post(api::maintenance::create_maintenance),
        )
        .route("/maintenance/:id", get(api::maintenance::get_maintenance))
        .route(
            "/maintenance/mark-as-done/:id",
            patch(api::maintenance::mark_maintenance_done),
        )
        // Reports
        .route(
            "/report",
            get(api::reports::list_reports).post(api::reports::create_report),
        )
        .route("/report/user-reports", get(api::reports::list_user_reports))
        .route("/report/report-summary", get(api::reports::report_summary))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
