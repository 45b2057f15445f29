use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

/// Accumulated clinical data of one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct MedicalFile {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicalFileRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    #[serde(default = "empty_object")]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicalFileRequest {
    pub doctor_id: Uuid,
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl Validate for CreateMedicalFileRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .check(self.data.is_object(), "data", "must be a JSON object")
            .finish()
    }
}

impl Validate for UpdateMedicalFileRequest {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .check(self.data.is_object(), "data", "must be a JSON object")
            .finish()
    }
}
