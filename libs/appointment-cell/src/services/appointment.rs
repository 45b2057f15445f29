use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{
    Appointment, AppointmentHistory, AppointmentQuery, AppointmentStatus, CompleteAppointmentRequest,
    CompletionResult, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::repository::{AppointmentFilter, AppointmentHistoryRepository, AppointmentRepository};
use crate::services::add_appointment::AddAppointmentUseCase;
use crate::services::appointment_completed::AppointmentCompletedUseCase;
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentRepository>,
    history: Arc<dyn AppointmentHistoryRepository>,
    add_appointment: AddAppointmentUseCase,
    appointment_completed: AppointmentCompletedUseCase,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentRepository>,
        history: Arc<dyn AppointmentHistoryRepository>,
        add_appointment: AddAppointmentUseCase,
        appointment_completed: AppointmentCompletedUseCase,
    ) -> Self {
        Self {
            appointments,
            history,
            add_appointment,
            appointment_completed,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub async fn create_appointment(
        &self,
        caller: &AuthUser,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        self.add_appointment.execute(caller, request).await
    }

    pub async fn list_appointments(&self, query: AppointmentQuery) -> Result<Vec<Appointment>, AppError> {
        let status = query.status.as_deref().map(str::parse::<AppointmentStatus>).transpose()?;
        let filter = AppointmentFilter {
            status,
            doctor_id: query.doctor_id,
            patient_id: query.patient_id,
            date: query.date,
        };
        Ok(self.appointments.find_all(&filter).await?)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, AppError> {
        self.appointments.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    pub async fn update_appointment(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        request.validate()?;
        let current = self.get_appointment(id).await?;
        debug!("Updating appointment: {}", id);

        let mut update_data = serde_json::Map::new();

        if let Some(status) = request.status.as_deref() {
            let status = status.parse::<AppointmentStatus>()?;
            if status == AppointmentStatus::Completed && current.status != AppointmentStatus::Completed {
                return Err(AppError::Conflict(format!(
                    "Appointment {} must be completed through /appointments/{}/complete",
                    id, id
                )));
            }
            self.lifecycle.validate_status_transition(current.status, status)?;
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(doctor_id) = request.doctor_id {
            update_data.insert("doctor_id".to_string(), json!(doctor_id));
        }
        if let Some(room_id) = request.room_id {
            update_data.insert("room_id".to_string(), json!(room_id));
        }
        if let Some(appointment_date) = request.appointment_date {
            update_data.insert("appointment_date".to_string(), json!(appointment_date.to_rfc3339()));
        }
        if let Some(minutes) = request.estimated_duration_in_minutes {
            update_data.insert("estimated_duration_in_minutes".to_string(), json!(minutes));
        }

        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.appointments.update(id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), AppError> {
        self.get_appointment(id).await?;
        self.appointments.delete(id).await?;
        info!("Appointment {} deleted", id);
        Ok(())
    }

    pub async fn get_history(&self, id: Uuid) -> Result<Vec<AppointmentHistory>, AppError> {
        self.get_appointment(id).await?;
        Ok(self.history.find_by_appointment(id).await?)
    }

    /// Runs the medical-file reconciliation, then marks the appointment
    /// COMPLETED. Only SCHEDULED appointments can be completed.
    pub async fn complete_appointment(
        &self,
        id: Uuid,
        request: CompleteAppointmentRequest,
    ) -> Result<CompletionResult, AppError> {
        request.validate()?;

        let appointment = self.get_appointment(id).await?;
        if appointment.status != AppointmentStatus::Scheduled {
            return Err(AppError::Conflict(format!(
                "Appointment {} is {} and cannot be completed",
                id, appointment.status
            )));
        }
        if appointment.patient_id != request.patient_id {
            return Err(AppError::Conflict(format!(
                "Appointment {} belongs to patient {}, not {}",
                id, appointment.patient_id, request.patient_id
            )));
        }

        let outcome = self.appointment_completed
            .execute(id, request.patient_id, request.doctor_id, request.data)
            .await?;

        let appointment = self.appointments.update(id, json!({
            "status": AppointmentStatus::Completed,
            "updated_at": Utc::now().to_rfc3339()
        })).await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        info!("Appointment {} completed", id);
        Ok(CompletionResult {
            appointment,
            medical_file: outcome.medical_file,
            history: outcome.history,
        })
    }
}
