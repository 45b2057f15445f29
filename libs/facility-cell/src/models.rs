use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

// ==============================================================================
// ROOMS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub capacity: i32,
    #[serde(rename = "type")]
    pub room_type: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub capacity: i32,
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required("roomNumber", &self.room_number)
            .required("type", &self.room_type)
            .positive("capacity", self.capacity as i64)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    pub room_number: Option<String>,
    pub capacity: Option<i32>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub is_available: Option<bool>,
}

impl Validate for UpdateRoomRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(room_number) = &self.room_number {
            v.required("roomNumber", room_number);
        }
        if let Some(capacity) = self.capacity {
            v.positive("capacity", capacity as i64);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailabilityQuery {
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    pub room_id: Uuid,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    /// Static flag stored on the room.
    pub is_available: bool,
    /// Whether a SCHEDULED appointment in the room overlaps the window.
    pub has_conflict: bool,
}

// ==============================================================================
// MACHINES
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Available,
    InUse,
    Maintenance,
    OutOfService,
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Available => write!(f, "AVAILABLE"),
            MachineStatus::InUse => write!(f, "IN_USE"),
            MachineStatus::Maintenance => write!(f, "MAINTENANCE"),
            MachineStatus::OutOfService => write!(f, "OUT_OF_SERVICE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Machine {
    pub id: Uuid,
    pub serial_number: String,
    pub model: String,
    pub status: MachineStatus,
    pub room_id: Option<Uuid>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachineRequest {
    pub serial_number: String,
    pub model: String,
    pub status: Option<MachineStatus>,
    pub room_id: Option<Uuid>,
    pub last_maintenance_date: Option<NaiveDate>,
}

impl Validate for CreateMachineRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required("serialNumber", &self.serial_number)
            .required("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMachineRequest {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: Option<MachineStatus>,
    pub room_id: Option<Uuid>,
    pub last_maintenance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineQuery {
    pub status: Option<MachineStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineStats {
    pub total: i64,
    pub available: i64,
    pub in_use: i64,
    pub maintenance: i64,
    pub out_of_service: i64,
}

impl MachineStats {
    pub fn from_statuses<I: IntoIterator<Item = MachineStatus>>(statuses: I) -> Self {
        statuses.into_iter().fold(Self::default(), |mut stats, status| {
            stats.total += 1;
            match status {
                MachineStatus::Available => stats.available += 1,
                MachineStatus::InUse => stats.in_use += 1,
                MachineStatus::Maintenance => stats.maintenance += 1,
                MachineStatus::OutOfService => stats.out_of_service += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn machine_stats_tally() {
        let stats = MachineStats::from_statuses(vec![
            MachineStatus::Available,
            MachineStatus::Available,
            MachineStatus::InUse,
            MachineStatus::OutOfService,
        ]);
        assert_eq!(stats, MachineStats { total: 4, available: 2, in_use: 1, maintenance: 0, out_of_service: 1 });
    }

    #[test]
    fn room_type_keeps_its_name() {
        let room: Room = serde_json::from_value(json!({
            "id": "6a4c3d0e-1111-4a5b-9c8d-000000000001",
            "room_number": "D-1",
            "capacity": 2,
            "type": "dialysis",
            "is_available": false,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": null
        })).unwrap();

        let out = serde_json::to_value(&room).unwrap();
        assert_eq!(out["type"], "dialysis");
        assert_eq!(out["roomNumber"], "D-1");
        assert_eq!(out["isAvailable"], false);
    }

    #[test]
    fn machine_status_wire_format() {
        assert_eq!(serde_json::to_value(MachineStatus::OutOfService).unwrap(), "OUT_OF_SERVICE");
        assert_eq!(MachineStatus::InUse.to_string(), "IN_USE");
    }
}
