use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use medical_file_cell::{shallow_merge, MedicalFile, MedicalFileRepository};
use patient_cell::PatientRepository;
use shared_models::error::AppError;

use crate::models::AppointmentHistory;
use crate::repository::AppointmentHistoryRepository;

#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub medical_file: MedicalFile,
    pub history: Option<AppointmentHistory>,
}

/// Folds the clinical data captured at the end of an appointment into the
/// patient's medical file.
///
/// * no file yet: the file is created with `data` and no history is written;
/// * existing file: its current data is archived under the appointment, then
///   the file becomes `{...old, ...data}` with the new doctor.
///
/// The steps are independent writes. A failure after the history insert
/// leaves that row in place.
pub struct AppointmentCompletedUseCase {
    files: Arc<dyn MedicalFileRepository>,
    patients: Arc<dyn PatientRepository>,
    history: Arc<dyn AppointmentHistoryRepository>,
}

impl AppointmentCompletedUseCase {
    pub fn new(
        files: Arc<dyn MedicalFileRepository>,
        patients: Arc<dyn PatientRepository>,
        history: Arc<dyn AppointmentHistoryRepository>,
    ) -> Self {
        Self { files, patients, history }
    }

    pub async fn execute(
        &self,
        appointment_id: Uuid,
        patient_id: Uuid,
        doctor_id: Uuid,
        data: Value,
    ) -> Result<CompletionOutcome, AppError> {
        match self.files.find_by_patient(patient_id).await? {
            None => {
                debug!("Patient {} has no medical file, creating one", patient_id);
                let file = self.files.create(patient_id, doctor_id, data).await?;
                self.patients.set_medical_file(patient_id, file.id).await?;

                info!("Medical file {} created on completion of appointment {}", file.id, appointment_id);
                Ok(CompletionOutcome { medical_file: file, history: None })
            }
            Some(file) => {
                let history = self.history.create(appointment_id, file.data.clone()).await?;

                let merged = shallow_merge(&file.data, &data);
                let updated = self.files.update(file.id, doctor_id, merged).await?
                    .ok_or_else(|| AppError::NotFound(format!("Medical file {} not found", file.id)))?;

                info!("Medical file {} archived and updated for appointment {}", updated.id, appointment_id);
                Ok(CompletionOutcome { medical_file: updated, history: Some(history) })
            }
        }
    }
}
