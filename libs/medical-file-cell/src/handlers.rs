use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{CreateMedicalFileRequest, MedicalFile, UpdateMedicalFileRequest};
use crate::services::MedicalFileService;

pub struct MedicalFileState {
    pub config: Arc<AppConfig>,
    pub files: Arc<MedicalFileService>,
}

pub async fn list_medical_files(
    State(state): State<Arc<MedicalFileState>>,
) -> Result<Json<ApiResponse<Vec<MedicalFile>>>, AppError> {
    let files = state.files.list_files().await?;
    Ok(ApiResponse::ok("Medical files retrieved", files))
}

pub async fn get_medical_file(
    State(state): State<Arc<MedicalFileState>>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MedicalFile>>, AppError> {
    let file = state.files.get_file(file_id).await?;
    Ok(ApiResponse::ok("Medical file retrieved", file))
}

pub async fn get_patient_medical_file(
    State(state): State<Arc<MedicalFileState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<MedicalFile>>, AppError> {
    let file = state.files.get_patient_file(patient_id).await?;
    Ok(ApiResponse::ok("Medical file retrieved", file))
}

pub async fn create_medical_file(
    State(state): State<Arc<MedicalFileState>>,
    Json(request): Json<CreateMedicalFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MedicalFile>>), AppError> {
    let file = state.files.create_file(request).await?;
    Ok(ApiResponse::created("Medical file created", file))
}

pub async fn update_medical_file(
    State(state): State<Arc<MedicalFileState>>,
    Path(file_id): Path<Uuid>,
    Json(request): Json<UpdateMedicalFileRequest>,
) -> Result<Json<ApiResponse<MedicalFile>>, AppError> {
    let file = state.files.update_file(file_id, request).await?;
    Ok(ApiResponse::ok("Medical file updated", file))
}
