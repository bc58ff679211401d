//! Computer usage session (tap-in / tap-out)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Session row; open while `ended_at` is null
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputerLog {
    pub id: i32,
    pub uuid: Uuid,
    pub computer_id: i32,
    /// User who opened the session
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// User who closed the session
    pub ended_by: Option<i32>,
}

impl ComputerLog {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Open session request; the opener comes from the bearer token
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComputerLog {
    pub computer_id: i32,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn log(
        id: i32,
        computer_id: i32,
        user_id: i32,
        ended_at: Option<DateTime<Utc>>,
    ) -> ComputerLog {
        ComputerLog {
            id,
            uuid: Uuid::new_v4(),
            computer_id,
            user_id,
            created_at: Utc::now(),
            ended_at,
            ended_by: ended_at.map(|_| user_id),
        }
    }
}
