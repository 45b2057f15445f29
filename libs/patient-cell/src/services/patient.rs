use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{Patient, CreatePatientRequest, UpdatePatientRequest, PatientSearchQuery};
use crate::repository::PatientRepository;

pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>) -> Self {
        Self { patients }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, AppError> {
        request.validate()?;
        debug!("Creating patient {} {}", request.first_name, request.last_name);

        let now = Utc::now().to_rfc3339();
        let patient = self.patients.insert(json!({
            "id": Uuid::new_v4(),
            "first_name": request.first_name.trim(),
            "last_name": request.last_name.trim(),
            "date_of_birth": request.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            "gender": request.gender,
            "phone": request.phone,
            "email": request.email,
            "address": request.address,
            "medical_file_id": null,
            "created_at": now,
            "updated_at": now
        })).await?;

        info!("Patient created with ID: {}", patient.id);
        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Patient, AppError> {
        self.patients.find_by_id(patient_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))
    }

    pub async fn search_patients(&self, query: PatientSearchQuery) -> Result<Vec<Patient>, AppError> {
        Ok(self.patients.find_all(&query).await?)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, AppError> {
        request.validate()?;
        debug!("Updating patient: {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(first_name) = request.first_name {
            update_data.insert("first_name".to_string(), json!(first_name.trim()));
        }
        if let Some(last_name) = request.last_name {
            update_data.insert("last_name".to_string(), json!(last_name.trim()));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert("date_of_birth".to_string(), json!(date_of_birth.format("%Y-%m-%d").to_string()));
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(email) = request.email {
            update_data.insert("email".to_string(), json!(email));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.patients.update(patient_id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", patient_id)))
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), AppError> {
        self.get_patient(patient_id).await?;
        self.patients.delete(patient_id).await?;
        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
