//! Computer aggregate: four mandatory components plus optional peripherals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::{computer_log::ComputerLog, item::ItemStatus};

/// Computer model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Computer {
    pub id: i32,
    pub uuid: Uuid,
    pub name: String,
    pub location_name: String,
    pub monitor_name: String,
    pub keyboard_name: String,
    pub mouse_name: String,
    pub system_unit_name: String,
    /// Optional peripherals (printer, UPS, ...)
    pub others: Vec<String>,
    /// Most recent session opened on this computer
    #[serde(rename = "lastLogUUID")]
    pub last_log_uuid: Option<Uuid>,
    pub metadata: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assemble computer request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComputer {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub metadata: Option<String>,
    #[validate(length(min = 1, message = "Monitor name must not be empty"))]
    pub monitor_name: String,
    #[validate(length(min = 1, message = "Keyboard name must not be empty"))]
    pub keyboard_name: String,
    #[validate(length(min = 1, message = "Mouse name must not be empty"))]
    pub mouse_name: String,
    #[validate(length(min = 1, message = "System unit name must not be empty"))]
    pub system_unit_name: String,
    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location_name: String,
    #[serde(default)]
    pub others: Vec<String>,
}

impl CreateComputer {
    /// Names of all requested components, in request order
    pub fn component_names(&self) -> Vec<String> {
        let mut names = vec![
            self.monitor_name.clone(),
            self.keyboard_name.clone(),
            self.mouse_name.clone(),
            self.system_unit_name.clone(),
        ];
        names.extend(self.others.iter().cloned());
        names
    }
}

/// Move computer request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelocateComputer {
    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location_name: String,
}

/// Computer list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputerQuery {
    pub page: Option<i64>,
    pub items_per_page: Option<i64>,
    pub location_name: Option<String>,
}

/// Derived availability of a computer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComputerStatus {
    Available,
    InUse,
    UnderMaintenance,
}

impl ComputerStatus {
    /// Maintenance on any component wins over an open session.
    pub fn derive(last_log: Option<&ComputerLog>, components: &[ItemStatus]) -> Self {
        if components.contains(&ItemStatus::UnderMaintenance) {
            return ComputerStatus::UnderMaintenance;
        }
        match last_log {
            Some(log) if log.is_open() => ComputerStatus::InUse,
            _ => ComputerStatus::Available,
        }
    }
}

/// Status endpoint payload
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputerStatusResponse {
    pub computer_id: i32,
    pub name: String,
    pub status: ComputerStatus,
    /// The open session, when the computer is in use
    pub current_log: Option<ComputerLog>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn computer(id: i32, last_log_uuid: Option<Uuid>) -> Computer {
        Computer {
            id,
            uuid: Uuid::new_v4(),
            name: format!("PC-{:02}", id),
            location_name: "2CL3B".to_string(),
            monitor_name: "Monitor_1".to_string(),
            keyboard_name: "Keyboard_1".to_string(),
            mouse_name: "Mouse_1".to_string(),
            system_unit_name: "SystemUnit_1".to_string(),
            others: Vec::new(),
            last_log_uuid,
            metadata: None,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::computer_log::fixtures::log;

    #[test]
    fn test_component_names_order() {
        let request: CreateComputer = serde_json::from_str(
            r#"{
                "name": "PC-01",
                "monitorName": "Monitor_1",
                "keyboardName": "Keyboard_1",
                "mouseName": "Mouse_1",
                "systemUnitName": "SystemUnit_1",
                "locationName": "2CL3B",
                "others": ["Printer_1"]
            }"#,
        )
        .unwrap();

        assert_eq!(
            request.component_names(),
            vec!["Monitor_1", "Keyboard_1", "Mouse_1", "SystemUnit_1", "Printer_1"]
        );
    }

    #[test]
    fn test_others_default_to_empty() {
        let request: CreateComputer = serde_json::from_str(
            r#"{
                "name": "PC-02",
                "monitorName": "M",
                "keyboardName": "K",
                "mouseName": "Mo",
                "systemUnitName": "S",
                "locationName": "MH5"
            }"#,
        )
        .unwrap();
        assert!(request.others.is_empty());
        assert_eq!(request.component_names().len(), 4);
    }

    #[test]
    fn test_status_without_sessions_is_available() {
        let status = ComputerStatus::derive(None, &[ItemStatus::InUse; 4]);
        assert_eq!(status, ComputerStatus::Available);
    }

    #[test]
    fn test_status_with_open_session_is_in_use() {
        let open = log(1, 3, 5, None);
        assert_eq!(
            ComputerStatus::derive(Some(&open), &[ItemStatus::InUse; 4]),
            ComputerStatus::InUse
        );

        let closed = log(1, 3, 5, Some(Utc::now()));
        assert_eq!(
            ComputerStatus::derive(Some(&closed), &[ItemStatus::InUse; 4]),
            ComputerStatus::Available
        );
    }

    #[test]
    fn test_maintenance_takes_precedence() {
        let open = log(1, 3, 5, None);
        let components = [
            ItemStatus::InUse,
            ItemStatus::UnderMaintenance,
            ItemStatus::InUse,
            ItemStatus::InUse,
        ];
        assert_eq!(
            ComputerStatus::derive(Some(&open), &components),
            ComputerStatus::UnderMaintenance
        );
    }
}
