//! Item category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Hardware category (MOUSE, KEYBOARD, MONITOR, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub uuid: Uuid,
    /// Upper-cased, unique
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}
