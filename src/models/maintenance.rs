//! Maintenance schedule model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: i32,
    pub uuid: Uuid,
    pub computer_id: i32,
    pub scheduled_by: i32,
    pub schedule_date: DateTime<Utc>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Schedule maintenance request; the scheduler comes from the bearer token
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenance {
    pub computer_id: i32,
    pub schedule_date: DateTime<Utc>,
}
