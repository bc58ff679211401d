//! Business logic services

pub mod auth;
pub mod computer_logs;
pub mod computers;
pub mod email;
pub mod items;
pub mod maintenance;
pub mod reports;
pub mod users;
pub mod validator;

use crate::{
    config::{AuthConfig, EmailConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    repository: Repository,
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub items: items::ItemsService,
    pub computers: computers::ComputersService,
    pub computer_logs: computer_logs::ComputerLogsService,
    pub maintenance: maintenance::MaintenanceService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, email_config: EmailConfig) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, email),
            users: users::UsersService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            computers: computers::ComputersService::new(repository.clone()),
            computer_logs: computer_logs::ComputerLogsService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone()),
            repository,
        }
    }

    /// Database connectivity check for the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
