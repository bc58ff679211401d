//! Campus location model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Building floor of a location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "floor_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorType {
    GroundFloor,
    SecondFloor,
    ThirdFloor,
    FourthFloor,
    FifthFloor,
}

/// Room or lab where computers and items live
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i32,
    pub uuid: Uuid,
    /// Upper-cased, unique
    pub name: String,
    pub floor: FloorType,
    pub created_at: DateTime<Utc>,
}

/// Create location request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocation {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub floor: FloorType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_wire_format() {
        let json = serde_json::to_string(&FloorType::SecondFloor).unwrap();
        assert_eq!(json, "\"SECOND_FLOOR\"");

        let parsed: CreateLocation =
            serde_json::from_str(r#"{"name":"2cl3b","floor":"FOURTH_FLOOR"}"#).unwrap();
        assert_eq!(parsed.floor, FloorType::FourthFloor);
    }
}
