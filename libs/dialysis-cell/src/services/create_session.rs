use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use medical_file_cell::MedicalFileService;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateSessionRequest, DialysisSession};
use crate::repository::{DialysisPatientRepository, DialysisSessionRepository};

/// Records a dialysis session, then copies its summary into the patient's
/// medical file as `lastDialysisSession`. The copy is best-effort: its
/// failures are logged and the session is still returned.
pub struct CreateSessionUseCase {
    sessions: Arc<dyn DialysisSessionRepository>,
    dialysis_patients: Arc<dyn DialysisPatientRepository>,
    medical_files: Arc<MedicalFileService>,
}

impl CreateSessionUseCase {
    pub fn new(
        sessions: Arc<dyn DialysisSessionRepository>,
        dialysis_patients: Arc<dyn DialysisPatientRepository>,
        medical_files: Arc<MedicalFileService>,
    ) -> Self {
        Self { sessions, dialysis_patients, medical_files }
    }

    pub async fn execute(&self, caller: &AuthUser, request: CreateSessionRequest) -> Result<DialysisSession, AppError> {
        request.validate()?;

        let enrolment = self.dialysis_patients.find_by_id(request.dialysis_patient_id).await?
            .ok_or_else(|| AppError::NotFound(format!(
                "Dialysis patient {} not found",
                request.dialysis_patient_id
            )))?;

        let doctor_id = request.doctor_id.unwrap_or(caller.id);

        let session = self.sessions.insert(json!({
            "id": Uuid::new_v4(),
            "dialysis_patient_id": enrolment.id,
            "machine_id": request.machine_id,
            "doctor_id": doctor_id,
            "session_date": request.session_date.to_rfc3339(),
            "pre_weight": request.pre_weight,
            "post_weight": request.post_weight,
            "ultrafiltration_volume": request.ultrafiltration_volume,
            "complications": request.complications,
            "notes": request.notes,
            "created_at": Utc::now().to_rfc3339()
        })).await?;

        info!("Dialysis session {} recorded for patient {}", session.id, enrolment.patient_id);

        let summary = json!({ "lastDialysisSession": session.summary() });
        if let Err(e) = self.medical_files
            .merge_into_patient_file(enrolment.patient_id, doctor_id, summary)
            .await
        {
            warn!(
                "Session {} saved but medical file of patient {} was not updated: {}",
                session.id, enrolment.patient_id, e
            );
        }

        Ok(session)
    }
}
