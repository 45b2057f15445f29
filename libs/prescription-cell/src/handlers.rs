use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{CreatePrescriptionRequest, Prescription};
use crate::services::PrescriptionService;

pub struct PrescriptionState {
    pub config: Arc<AppConfig>,
    pub prescriptions: PrescriptionService,
}

pub async fn create_prescription(
    State(state): State<Arc<PrescriptionState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Prescription>>), AppError> {
    let prescription = state.prescriptions.create(&user, request).await?;
    Ok(ApiResponse::created("Prescription created", prescription))
}

pub async fn get_prescription(
    State(state): State<Arc<PrescriptionState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Prescription>>, AppError> {
    let prescription = state.prescriptions.get(id).await?;
    Ok(ApiResponse::ok("Prescription retrieved", prescription))
}

pub async fn list_patient_prescriptions(
    State(state): State<Arc<PrescriptionState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Prescription>>>, AppError> {
    let prescriptions = state.prescriptions.list_for_patient(patient_id).await?;
    Ok(ApiResponse::ok("Prescriptions retrieved", prescriptions))
}

pub async fn delete_prescription(
    State(state): State<Arc<PrescriptionState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.prescriptions.delete(id).await?;
    Ok(ApiResponse::message("Prescription deleted"))
}
