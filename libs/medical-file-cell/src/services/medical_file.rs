use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use patient_cell::PatientRepository;
use shared_models::error::{AppError, FieldError};
use shared_utils::validation::Validate;

use crate::merge::shallow_merge;
use crate::models::{CreateMedicalFileRequest, MedicalFile, UpdateMedicalFileRequest};
use crate::repository::MedicalFileRepository;

pub struct MedicalFileService {
    files: Arc<dyn MedicalFileRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl MedicalFileService {
    pub fn new(files: Arc<dyn MedicalFileRepository>, patients: Arc<dyn PatientRepository>) -> Self {
        Self { files, patients }
    }

    pub async fn list_files(&self) -> Result<Vec<MedicalFile>, AppError> {
        Ok(self.files.find_all().await?)
    }

    pub async fn get_file(&self, id: Uuid) -> Result<MedicalFile, AppError> {
        self.files.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Medical file {} not found", id)))
    }

    pub async fn get_patient_file(&self, patient_id: Uuid) -> Result<MedicalFile, AppError> {
        self.files.find_by_patient(patient_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} has no medical file", patient_id)))
    }

    /// A patient has at most one file; a second create is a conflict.
    pub async fn create_file(&self, request: CreateMedicalFileRequest) -> Result<MedicalFile, AppError> {
        request.validate()?;

        self.patients.find_by_id(request.patient_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", request.patient_id)))?;

        if self.files.find_by_patient(request.patient_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Patient {} already has a medical file",
                request.patient_id
            )));
        }

        let file = self.files.create(request.patient_id, request.doctor_id, request.data).await?;
        self.patients.set_medical_file(request.patient_id, file.id).await?;

        info!("Medical file {} created for patient {}", file.id, file.patient_id);
        Ok(file)
    }

    pub async fn update_file(&self, id: Uuid, request: UpdateMedicalFileRequest) -> Result<MedicalFile, AppError> {
        request.validate()?;

        let file = self.get_file(id).await?;
        let merged = shallow_merge(&file.data, &request.data);

        self.files.update(id, request.doctor_id, merged).await?
            .ok_or_else(|| AppError::NotFound(format!("Medical file {} not found", id)))
    }

    /// Merges `data` (a JSON object) into the patient's file, creating the
    /// file and the patient's back-reference when there is none yet.
    pub async fn merge_into_patient_file(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        data: Value,
    ) -> Result<MedicalFile, AppError> {
        if !data.is_object() {
            return Err(AppError::Validation(vec![FieldError::new("data", "must be a JSON object")]));
        }

        match self.files.find_by_patient(patient_id).await? {
            Some(file) => {
                debug!("Merging data into medical file {}", file.id);
                let merged = shallow_merge(&file.data, &data);
                self.files.update(file.id, doctor_id, merged).await?
                    .ok_or_else(|| AppError::NotFound(format!("Medical file {} not found", file.id)))
            }
            None => {
                let file = self.files.create(patient_id, doctor_id, data).await?;
                self.patients.set_medical_file(patient_id, file.id).await?;
                Ok(file)
            }
        }
    }
}
