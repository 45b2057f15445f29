use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use facility_cell::RoomRepository;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{Appointment, AppointmentCreator, AppointmentStatus, CreateAppointmentRequest};
use crate::repository::AppointmentRepository;

/// Books an appointment. When a room repository is wired and the request
/// names a room, the room must exist and carry `isAvailable = true`.
pub struct AddAppointmentUseCase {
    appointments: Arc<dyn AppointmentRepository>,
    rooms: Option<Arc<dyn RoomRepository>>,
}

impl AddAppointmentUseCase {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, rooms: Option<Arc<dyn RoomRepository>>) -> Self {
        Self { appointments, rooms }
    }

    pub async fn execute(&self, caller: &AuthUser, request: CreateAppointmentRequest) -> Result<Appointment, AppError> {
        request.validate()?;

        let status = match request.status.as_deref() {
            Some(status) => status.parse::<AppointmentStatus>()?,
            None => AppointmentStatus::Scheduled,
        };
        let created_by = AppointmentCreator::resolve(
            caller,
            request.created_by_reception_id,
            request.created_by_doctor_id,
        )?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            room_id: request.room_id,
            created_by,
            appointment_date: request.appointment_date,
            estimated_duration_in_minutes: request.estimated_duration_in_minutes,
            status,
            created_at: Utc::now(),
            updated_at: None,
        };

        if let (Some(rooms), Some(room_id)) = (&self.rooms, appointment.room_id) {
            debug!("Checking room {} for appointment {}", room_id, appointment.id);

            let room = rooms.find_by_id(room_id).await?
                .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;

            if !room.is_available {
                warn!("Room {} is not available, appointment rejected", room.room_number);
                return Err(AppError::Conflict(format!("Room {} is not available", room.room_number)));
            }
        }

        let created = self.appointments.insert(&appointment).await?;
        info!("Appointment {} booked for patient {}", created.id, created.patient_id);
        Ok(created)
    }
}
