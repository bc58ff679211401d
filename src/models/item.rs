//! Item (hardware component) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Component status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "item_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Available,
    InUse,
    UnderMaintenance,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "AVAILABLE",
            ItemStatus::InUse => "IN_USE",
            ItemStatus::UnderMaintenance => "UNDER_MAINTENANCE",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(ItemStatus::Available),
            "IN_USE" => Ok(ItemStatus::InUse),
            "UNDER_MAINTENANCE" => Ok(ItemStatus::UnderMaintenance),
            _ => Err(format!("Invalid item status: {}", s)),
        }
    }
}

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i32,
    pub uuid: Uuid,
    /// Unique across all items
    pub name: String,
    pub category_name: String,
    pub location_name: String,
    pub status: ItemStatus,
    /// Computer this component is installed in
    pub computer_id: Option<i32>,
    pub metadata: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create item request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category_name: String,
    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location_name: String,
    pub metadata: Option<String>,
}

/// Change item status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateItemStatus {
    pub status: ItemStatus,
}

/// Change item location request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemLocation {
    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location_name: String,
}

/// Item list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
    pub category_name: Option<String>,
    pub location_name: Option<String>,
    pub status: Option<ItemStatus>,
}

/// One batched write installing components into a computer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAssignment {
    pub item_ids: Vec<i32>,
    pub computer_id: i32,
    pub location_name: String,
}

impl ItemAssignment {
    /// Build the batch for `items`; returns it with the number of items whose
    /// location actually changes.
    pub fn for_items(items: &[Item], computer_id: i32, location_name: &str) -> (Self, usize) {
        let relocated = items
            .iter()
            .filter(|item| item.location_name != location_name)
            .count();

        let batch = Self {
            item_ids: items.iter().map(|item| item.id).collect(),
            computer_id,
            location_name: location_name.to_string(),
        };

        (batch, relocated)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn item(id: i32, name: &str, status: ItemStatus) -> Item {
        Item {
            id,
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            category_name: "MOUSE".to_string(),
            location_name: "2CL3B".to_string(),
            status,
            computer_id: None,
            metadata: None,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::item;
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        assert_eq!("in_use".parse::<ItemStatus>(), Ok(ItemStatus::InUse));
        assert_eq!(ItemStatus::UnderMaintenance.to_string(), "UNDER_MAINTENANCE");
        assert!("broken".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_assignment_counts_relocations() {
        let mut moved = item(2, "Keyboard_1", ItemStatus::Available);
        moved.location_name = "MH5".to_string();
        let items = vec![item(1, "Mouse_1", ItemStatus::Available), moved];

        let (batch, relocated) = ItemAssignment::for_items(&items, 9, "2CL3B");
        assert_eq!(batch.item_ids, vec![1, 2]);
        assert_eq!(batch.computer_id, 9);
        assert_eq!(batch.location_name, "2CL3B");
        assert_eq!(relocated, 1);
    }
}
