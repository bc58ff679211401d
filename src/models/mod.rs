//! Data models for the campus asset server

pub mod category;
pub mod computer;
pub mod computer_log;
pub mod identifier;
pub mod item;
pub mod location;
pub mod maintenance;
pub mod report;
pub mod user;

use serde::Serialize;

// Re-export commonly used types
pub use category::Category;
pub use computer::{Computer, ComputerStatus};
pub use computer_log::ComputerLog;
pub use identifier::Identifier;
pub use item::{Item, ItemStatus};
pub use location::{FloorType, Location};
pub use maintenance::Maintenance;
pub use report::{Report, ReportSummary};
pub use user::{AuthContext, Role, User, UserClaims};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;
/// Highest page whose offset still fits in an i64
const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Normalized `page` / `itemsPerPage` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub items_per_page: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, items_per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            items_per_page: items_per_page
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.items_per_page)
    }

    pub fn wrap<T>(self, data: Vec<T>, total: i64) -> Paginated<T> {
        Paginated {
            data,
            total,
            page: self.page,
            items_per_page: self.items_per_page,
        }
    }
}

/// One page of a listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Total number of rows matching the filter
    pub total: i64,
    pub page: i64,
    pub items_per_page: i64,
}
