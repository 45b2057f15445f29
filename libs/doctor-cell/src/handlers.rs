use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{CreateDoctorRequest, Doctor, DoctorQuery, UpdateDoctorRequest};
use crate::services::DoctorService;

pub struct DoctorState {
    pub config: Arc<AppConfig>,
    pub doctors: DoctorService,
}

pub async fn list_doctors(
    State(state): State<Arc<DoctorState>>,
    Query(query): Query<DoctorQuery>,
) -> Result<Json<ApiResponse<Vec<Doctor>>>, AppError> {
    let doctors = state.doctors.list_doctors(query).await?;
    Ok(ApiResponse::ok("Doctors retrieved", doctors))
}

pub async fn get_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor = state.doctors.get_doctor(doctor_id).await?;
    Ok(ApiResponse::ok("Doctor retrieved", doctor))
}

pub async fn create_doctor(
    State(state): State<Arc<DoctorState>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Doctor>>), AppError> {
    let doctor = state.doctors.create_doctor(request).await?;
    Ok(ApiResponse::created("Doctor created", doctor))
}

pub async fn update_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<ApiResponse<Doctor>>, AppError> {
    let doctor = state.doctors.update_doctor(doctor_id, request).await?;
    Ok(ApiResponse::ok("Doctor updated", doctor))
}

pub async fn delete_doctor(
    State(state): State<Arc<DoctorState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.doctors.delete_doctor(doctor_id).await?;
    Ok(ApiResponse::message("Doctor deleted"))
}
