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

use crate::models::{CreateReceptionistRequest, Receptionist, ReceptionistQuery, UpdateReceptionistRequest};
use crate::services::ReceptionistService;

pub struct ReceptionistState {
    pub config: Arc<AppConfig>,
    pub receptionists: ReceptionistService,
}

pub async fn list_receptionists(
    State(state): State<Arc<ReceptionistState>>,
    Query(query): Query<ReceptionistQuery>,
) -> Result<Json<ApiResponse<Vec<Receptionist>>>, AppError> {
    let receptionists = state.receptionists.list_receptionists(query).await?;
    Ok(ApiResponse::ok("Receptionists retrieved", receptionists))
}

pub async fn get_receptionist(
    State(state): State<Arc<ReceptionistState>>,
    Path(receptionist_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Receptionist>>, AppError> {
    let receptionist = state.receptionists.get_receptionist(receptionist_id).await?;
    Ok(ApiResponse::ok("Receptionist retrieved", receptionist))
}

pub async fn create_receptionist(
    State(state): State<Arc<ReceptionistState>>,
    Json(request): Json<CreateReceptionistRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Receptionist>>), AppError> {
    let receptionist = state.receptionists.create_receptionist(request).await?;
    Ok(ApiResponse::created("Receptionist created", receptionist))
}

pub async fn update_receptionist(
    State(state): State<Arc<ReceptionistState>>,
    Path(receptionist_id): Path<Uuid>,
    Json(request): Json<UpdateReceptionistRequest>,
) -> Result<Json<ApiResponse<Receptionist>>, AppError> {
    let receptionist = state.receptionists.update_receptionist(receptionist_id, request).await?;
    Ok(ApiResponse::ok("Receptionist updated", receptionist))
}

pub async fn delete_receptionist(
    State(state): State<Arc<ReceptionistState>>,
    Path(receptionist_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.receptionists.delete_receptionist(receptionist_id).await?;
    Ok(ApiResponse::message("Receptionist deleted"))
}
