use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use patient_cell::PatientRepository;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreatePrescriptionRequest, Prescription};
use crate::repository::PrescriptionRepository;

pub struct PrescriptionService {
    prescriptions: Arc<dyn PrescriptionRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl PrescriptionService {
    pub fn new(prescriptions: Arc<dyn PrescriptionRepository>, patients: Arc<dyn PatientRepository>) -> Self {
        Self { prescriptions, patients }
    }

    pub async fn create(&self, caller: &AuthUser, request: CreatePrescriptionRequest) -> Result<Prescription, AppError> {
        request.validate()?;

        if self.patients.find_by_id(request.patient_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Patient {} not found", request.patient_id)));
        }

        let now = Utc::now();
        let row = json!({
            "id": Uuid::new_v4(),
            "patient_id": request.patient_id,
            "doctor_id": request.doctor_id.unwrap_or(caller.id),
            "date": request.date.unwrap_or_else(|| now.date_naive()),
            "notes": request.notes,
            "created_at": now.to_rfc3339()
        });

        let medications: Vec<Value> = request.medications
            .into_iter()
            .map(|m| json!({
                "id": Uuid::new_v4(),
                "name": m.name.trim(),
                "dosage": m.dosage.trim(),
                "frequency": m.frequency.trim(),
                "duration_days": m.duration_days
            }))
            .collect();

        let prescription = self.prescriptions.create(row, medications).await?;
        info!(
            "Prescription {} created for patient {} with {} medications",
            prescription.id,
            prescription.patient_id,
            prescription.medications.len()
        );
        Ok(prescription)
    }

    pub async fn get(&self, id: Uuid) -> Result<Prescription, AppError> {
        self.prescriptions.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Prescription {} not found", id)))
    }

    pub async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<Prescription>, AppError> {
        Ok(self.prescriptions.find_by_patient(patient_id).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        self.prescriptions.delete(id).await?;
        info!("Prescription {} deleted", id);
        Ok(())
    }
}
