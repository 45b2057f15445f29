use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::{Validate, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Prescription {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Filled from the embedded `medications` relation.
    #[serde(default)]
    pub medications: Vec<Medication>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct Medication {
    pub id: Uuid,
    pub prescription_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration_days: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationInput {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration_days: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    /// Defaults to the calling doctor.
    pub doctor_id: Option<Uuid>,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub medications: Vec<MedicationInput>,
}

impl Validate for CreatePrescriptionRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        v.check(!self.medications.is_empty(), "medications", "at least one medication is required");

        for (i, medication) in self.medications.iter().enumerate() {
            v.required(&format!("medications[{}].name", i), &medication.name)
                .required(&format!("medications[{}].dosage", i), &medication.dosage)
                .required(&format!("medications[{}].frequency", i), &medication.frequency);
            if let Some(days) = medication.duration_days {
                v.positive(&format!("medications[{}].durationDays", i), days as i64);
            }
        }

        v.finish()
    }
}
