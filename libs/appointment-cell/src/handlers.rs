use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{
    Appointment, AppointmentHistory, AppointmentQuery, CompleteAppointmentRequest, CompletionResult,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::AppointmentService;

pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub appointments: AppointmentService,
}

pub async fn create_appointment(
    State(state): State<Arc<AppointmentState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Appointment>>), AppError> {
    let appointment = state.appointments.create_appointment(&user, request).await?;
    Ok(ApiResponse::created("Appointment created", appointment))
}

pub async fn list_appointments(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<AppointmentQuery>,
) -> Result<Json<ApiResponse<Vec<Appointment>>>, AppError> {
    let appointments = state.appointments.list_appointments(query).await?;
    Ok(ApiResponse::ok("Appointments retrieved", appointments))
}

pub async fn get_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let appointment = state.appointments.get_appointment(appointment_id).await?;
    Ok(ApiResponse::ok("Appointment retrieved", appointment))
}

pub async fn update_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<ApiResponse<Appointment>>, AppError> {
    let appointment = state.appointments.update_appointment(appointment_id, request).await?;
    Ok(ApiResponse::ok("Appointment updated", appointment))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.appointments.delete_appointment(appointment_id).await?;
    Ok(ApiResponse::message("Appointment deleted"))
}

pub async fn get_appointment_history(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<AppointmentHistory>>>, AppError> {
    let history = state.appointments.get_history(appointment_id).await?;
    Ok(ApiResponse::ok("Appointment history retrieved", history))
}

pub async fn complete_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CompleteAppointmentRequest>,
) -> Result<Json<ApiResponse<CompletionResult>>, AppError> {
    let result = state.appointments.complete_appointment(appointment_id, request).await?;
    Ok(ApiResponse::ok("Appointment completed", result))
}
