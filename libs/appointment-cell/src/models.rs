use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::auth::{AuthUser, Role};
use shared_models::error::{AppError, DatabaseError, FieldError};
use shared_utils::validation::{Validate, Validator};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Canceled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Canceled => "CANCELED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELED" | "CANCELLED" => Ok(AppointmentStatus::Canceled),
            "NO_SHOW" | "NOSHOW" => Ok(AppointmentStatus::NoShow),
            _ => Err(AppError::Validation(vec![FieldError::new(
                "status",
                format!("Unknown appointment status '{}'", value),
            )])),
        }
    }
}

/// Who booked the appointment. Exactly one attribution is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AppointmentCreator {
    #[serde(rename = "createdByReceptionId")]
    Reception(Uuid),
    #[serde(rename = "createdByDoctorId")]
    Doctor(Uuid),
}

impl AppointmentCreator {
    /// Picks the attribution from the request, defaulting to the caller for
    /// doctors and receptionists. Admins must name exactly one creator.
    pub fn resolve(
        caller: &AuthUser,
        reception_id: Option<Uuid>,
        doctor_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (reception_id, doctor_id) {
            (Some(_), Some(_)) => Err(AppError::Validation(vec![FieldError::new(
                "createdBy",
                "Only one of createdByReceptionId and createdByDoctorId may be set",
            )])),
            (Some(id), None) => Ok(AppointmentCreator::Reception(id)),
            (None, Some(id)) => Ok(AppointmentCreator::Doctor(id)),
            (None, None) => match caller.role {
                Role::Doctor => Ok(AppointmentCreator::Doctor(caller.id)),
                Role::Receptionist => Ok(AppointmentCreator::Reception(caller.id)),
                Role::Admin => Err(AppError::Validation(vec![FieldError::new(
                    "createdBy",
                    "One of createdByReceptionId and createdByDoctorId is required",
                )])),
            },
        }
    }

    pub fn reception_id(&self) -> Option<Uuid> {
        match self {
            AppointmentCreator::Reception(id) => Some(*id),
            AppointmentCreator::Doctor(_) => None,
        }
    }

    pub fn doctor_id(&self) -> Option<Uuid> {
        match self {
            AppointmentCreator::Doctor(id) => Some(*id),
            AppointmentCreator::Reception(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub room_id: Option<Uuid>,
    #[serde(flatten)]
    pub created_by: AppointmentCreator,
    pub appointment_date: DateTime<Utc>,
    pub estimated_duration_in_minutes: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Storage row; both attribution columns are nullable.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub room_id: Option<Uuid>,
    pub created_by_reception_id: Option<Uuid>,
    pub created_by_doctor_id: Option<Uuid>,
    pub appointment_date: DateTime<Utc>,
    pub estimated_duration_in_minutes: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DatabaseError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let created_by = match (row.created_by_reception_id, row.created_by_doctor_id) {
            (Some(id), None) => AppointmentCreator::Reception(id),
            (None, Some(id)) => AppointmentCreator::Doctor(id),
            _ => {
                return Err(DatabaseError::new(format!(
                    "Appointment {} must have exactly one creator",
                    row.id
                )))
            }
        };

        Ok(Appointment {
            id: row.id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            room_id: row.room_id,
            created_by,
            appointment_date: row.appointment_date,
            estimated_duration_in_minutes: row.estimated_duration_in_minutes,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Archived medical-file data captured when an appointment is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct AppointmentHistory {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub appointment_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub room_id: Option<Uuid>,
    pub created_by_reception_id: Option<Uuid>,
    pub created_by_doctor_id: Option<Uuid>,
    pub appointment_date: DateTime<Utc>,
    pub estimated_duration_in_minutes: i32,
    pub status: Option<String>,
}

impl Validate for CreateAppointmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .positive("estimatedDurationInMinutes", self.estimated_duration_in_minutes as i64)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub estimated_duration_in_minutes: Option<i32>,
    pub status: Option<String>,
}

impl Validate for UpdateAppointmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(minutes) = self.estimated_duration_in_minutes {
            v.positive("estimatedDurationInMinutes", minutes as i64);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub status: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    #[serde(default)]
    pub data: Value,
}

impl Validate for CompleteAppointmentRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .check(self.data.is_object(), "data", "must be a JSON object")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    pub appointment: Appointment,
    pub medical_file: medical_file_cell::MedicalFile,
    /// Present when an existing file was archived before the update.
    pub history: Option<AppointmentHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            email: Some("caller@example.com".to_string()),
            role,
            token: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("scheduled".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Scheduled);
        assert_eq!("No_Show".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::NoShow);
        assert_eq!("cancelled".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::Canceled);
        assert!("postponed".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn creator_defaults_to_caller() {
        let doctor = caller(Role::Doctor);
        assert_eq!(AppointmentCreator::resolve(&doctor, None, None).unwrap(), AppointmentCreator::Doctor(doctor.id));

        let desk = caller(Role::Receptionist);
        assert_eq!(AppointmentCreator::resolve(&desk, None, None).unwrap(), AppointmentCreator::Reception(desk.id));
    }

    #[test]
    fn admin_must_name_exactly_one_creator() {
        let admin = caller(Role::Admin);
        assert!(AppointmentCreator::resolve(&admin, None, None).is_err());
        assert!(AppointmentCreator::resolve(&admin, Some(Uuid::new_v4()), Some(Uuid::new_v4())).is_err());

        let reception = Uuid::new_v4();
        assert_eq!(
            AppointmentCreator::resolve(&admin, Some(reception), None).unwrap(),
            AppointmentCreator::Reception(reception)
        );
    }

    #[test]
    fn row_with_one_creator_serialises_flat() {
        let doctor_id = Uuid::new_v4();
        let row: AppointmentRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "patient_id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "room_id": null,
            "created_by_reception_id": null,
            "created_by_doctor_id": doctor_id,
            "appointment_date": "2024-12-25T10:00:00Z",
            "estimated_duration_in_minutes": 30,
            "status": "SCHEDULED",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": null
        })).unwrap();

        let appointment = Appointment::try_from(row).unwrap();
        let out = serde_json::to_value(&appointment).unwrap();
        assert_eq!(out["createdByDoctorId"], json!(doctor_id));
        assert!(out.get("createdByReceptionId").is_none());
        assert_eq!(out["status"], "SCHEDULED");
        assert_eq!(out["estimatedDurationInMinutes"], 30);
    }

    #[test]
    fn row_without_creator_is_rejected() {
        let row: AppointmentRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "patient_id": Uuid::new_v4(),
            "doctor_id": Uuid::new_v4(),
            "room_id": null,
            "created_by_reception_id": null,
            "created_by_doctor_id": null,
            "appointment_date": "2024-12-25T10:00:00Z",
            "estimated_duration_in_minutes": 30,
            "status": "SCHEDULED",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": null
        })).unwrap();

        assert!(Appointment::try_from(row).is_err());
    }
}
