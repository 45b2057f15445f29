use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use patient_cell::PatientRepository;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::*;
use crate::repository::{DialysisPatientRepository, DialysisProtocolRepository, DialysisSessionRepository};

pub struct DialysisService {
    dialysis_patients: Arc<dyn DialysisPatientRepository>,
    protocols: Arc<dyn DialysisProtocolRepository>,
    sessions: Arc<dyn DialysisSessionRepository>,
    patients: Arc<dyn PatientRepository>,
}

impl DialysisService {
    pub fn new(
        dialysis_patients: Arc<dyn DialysisPatientRepository>,
        protocols: Arc<dyn DialysisProtocolRepository>,
        sessions: Arc<dyn DialysisSessionRepository>,
        patients: Arc<dyn PatientRepository>,
    ) -> Self {
        Self { dialysis_patients, protocols, sessions, patients }
    }

    pub async fn list_patients(&self) -> Result<Vec<DialysisPatient>, AppError> {
        Ok(self.dialysis_patients.find_all().await?)
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<DialysisPatient, AppError> {
        self.dialysis_patients.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Dialysis patient {} not found", id)))
    }

    /// Enrols a registered patient; a patient is enrolled at most once.
    pub async fn create_patient(&self, request: CreateDialysisPatientRequest) -> Result<DialysisPatient, AppError> {
        request.validate()?;

        self.patients.find_by_id(request.patient_id).await?
            .ok_or_else(|| AppError::NotFound(format!("Patient {} not found", request.patient_id)))?;

        if self.dialysis_patients.find_by_patient(request.patient_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Patient {} is already enrolled in dialysis",
                request.patient_id
            )));
        }

        let now = Utc::now().to_rfc3339();
        let enrolled = self.dialysis_patients.insert(json!({
            "id": Uuid::new_v4(),
            "patient_id": request.patient_id,
            "start_date": request.start_date.format("%Y-%m-%d").to_string(),
            "dry_weight": request.dry_weight,
            "vascular_access_type": request.vascular_access_type,
            "sessions_per_week": request.sessions_per_week,
            "notes": request.notes,
            "created_at": now,
            "updated_at": now
        })).await?;

        info!("Patient {} enrolled in dialysis as {}", enrolled.patient_id, enrolled.id);
        Ok(enrolled)
    }

    pub async fn update_patient(
        &self,
        id: Uuid,
        request: UpdateDialysisPatientRequest,
    ) -> Result<DialysisPatient, AppError> {
        request.validate()?;
        debug!("Updating dialysis patient: {}", id);

        let mut update_data = serde_json::Map::new();
        if let Some(start_date) = request.start_date {
            update_data.insert("start_date".to_string(), json!(start_date.format("%Y-%m-%d").to_string()));
        }
        if let Some(dry_weight) = request.dry_weight {
            update_data.insert("dry_weight".to_string(), json!(dry_weight));
        }
        if let Some(access) = request.vascular_access_type {
            update_data.insert("vascular_access_type".to_string(), json!(access));
        }
        if let Some(sessions) = request.sessions_per_week {
            update_data.insert("sessions_per_week".to_string(), json!(sessions));
        }
        if let Some(notes) = request.notes {
            update_data.insert("notes".to_string(), json!(notes));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.dialysis_patients.update(id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Dialysis patient {} not found", id)))
    }

    pub async fn list_protocols(&self, dialysis_patient_id: Uuid) -> Result<Vec<DialysisProtocol>, AppError> {
        self.get_patient(dialysis_patient_id).await?;
        Ok(self.protocols.find_by_dialysis_patient(dialysis_patient_id).await?)
    }

    pub async fn create_protocol(
        &self,
        dialysis_patient_id: Uuid,
        request: CreateProtocolRequest,
    ) -> Result<DialysisProtocol, AppError> {
        request.validate()?;
        self.get_patient(dialysis_patient_id).await?;

        let now = Utc::now().to_rfc3339();
        let protocol = self.protocols.insert(json!({
            "id": Uuid::new_v4(),
            "dialysis_patient_id": dialysis_patient_id,
            "dialysate_flow_rate": request.dialysate_flow_rate,
            "blood_flow_rate": request.blood_flow_rate,
            "session_duration_minutes": request.session_duration_minutes,
            "anticoagulation": request.anticoagulation,
            "dialyzer_type": request.dialyzer_type,
            "created_at": now,
            "updated_at": now
        })).await?;

        info!("Protocol {} created for dialysis patient {}", protocol.id, dialysis_patient_id);
        Ok(protocol)
    }

    pub async fn update_protocol(&self, id: Uuid, request: UpdateProtocolRequest) -> Result<DialysisProtocol, AppError> {
        request.validate()?;

        let mut update_data = serde_json::Map::new();
        if let Some(rate) = request.dialysate_flow_rate {
            update_data.insert("dialysate_flow_rate".to_string(), json!(rate));
        }
        if let Some(rate) = request.blood_flow_rate {
            update_data.insert("blood_flow_rate".to_string(), json!(rate));
        }
        if let Some(minutes) = request.session_duration_minutes {
            update_data.insert("session_duration_minutes".to_string(), json!(minutes));
        }
        if let Some(anticoagulation) = request.anticoagulation {
            update_data.insert("anticoagulation".to_string(), json!(anticoagulation));
        }
        if let Some(dialyzer_type) = request.dialyzer_type {
            update_data.insert("dialyzer_type".to_string(), json!(dialyzer_type));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.protocols.update(id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Protocol {} not found", id)))
    }

    pub async fn list_sessions(&self, query: SessionQuery) -> Result<Vec<DialysisSession>, AppError> {
        Ok(self.sessions.find_all(query.dialysis_patient_id).await?)
    }

    pub async fn get_session(&self, id: Uuid) -> Result<DialysisSession, AppError> {
        self.sessions.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Dialysis session {} not found", id)))
    }
}
