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

use crate::models::{Patient, CreatePatientRequest, UpdatePatientRequest, PatientSearchQuery};
use crate::services::PatientService;

pub struct PatientState {
    pub config: Arc<AppConfig>,
    pub patients: PatientService,
}

pub async fn create_patient(
    State(state): State<Arc<PatientState>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Patient>>), AppError> {
    let patient = state.patients.create_patient(request).await?;
    Ok(ApiResponse::created("Patient created", patient))
}

pub async fn get_patient(
    State(state): State<Arc<PatientState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let patient = state.patients.get_patient(patient_id).await?;
    Ok(ApiResponse::ok("Patient retrieved", patient))
}

pub async fn list_patients(
    State(state): State<Arc<PatientState>>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Patient>>>, AppError> {
    let patients = state.patients.search_patients(query).await?;
    Ok(ApiResponse::ok("Patients retrieved", patients))
}

pub async fn update_patient(
    State(state): State<Arc<PatientState>>,
    Path(patient_id): Path<Uuid>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<ApiResponse<Patient>>, AppError> {
    let patient = state.patients.update_patient(patient_id, request).await?;
    Ok(ApiResponse::ok("Patient updated", patient))
}

pub async fn delete_patient(
    State(state): State<Arc<PatientState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.patients.delete_patient(patient_id).await?;
    Ok(ApiResponse::message("Patient deleted"))
}
