use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::*;
use crate::services::{CreateSessionUseCase, DialysisService};

pub struct DialysisState {
    pub config: Arc<AppConfig>,
    pub dialysis: DialysisService,
    pub create_session: CreateSessionUseCase,
}

pub async fn list_dialysis_patients(
    State(state): State<Arc<DialysisState>>,
) -> Result<Json<ApiResponse<Vec<DialysisPatient>>>, AppError> {
    let patients = state.dialysis.list_patients().await?;
    Ok(ApiResponse::ok("Dialysis patients retrieved", patients))
}

pub async fn get_dialysis_patient(
    State(state): State<Arc<DialysisState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DialysisPatient>>, AppError> {
    let patient = state.dialysis.get_patient(id).await?;
    Ok(ApiResponse::ok("Dialysis patient retrieved", patient))
}

pub async fn create_dialysis_patient(
    State(state): State<Arc<DialysisState>>,
    Json(request): Json<CreateDialysisPatientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DialysisPatient>>), AppError> {
    let patient = state.dialysis.create_patient(request).await?;
    Ok(ApiResponse::created("Dialysis patient created", patient))
}

pub async fn update_dialysis_patient(
    State(state): State<Arc<DialysisState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDialysisPatientRequest>,
) -> Result<Json<ApiResponse<DialysisPatient>>, AppError> {
    let patient = state.dialysis.update_patient(id, request).await?;
    Ok(ApiResponse::ok("Dialysis patient updated", patient))
}

pub async fn list_protocols(
    State(state): State<Arc<DialysisState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<DialysisProtocol>>>, AppError> {
    let protocols = state.dialysis.list_protocols(id).await?;
    Ok(ApiResponse::ok("Protocols retrieved", protocols))
}

pub async fn create_protocol(
    State(state): State<Arc<DialysisState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateProtocolRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DialysisProtocol>>), AppError> {
    let protocol = state.dialysis.create_protocol(id, request).await?;
    Ok(ApiResponse::created("Protocol created", protocol))
}

pub async fn update_protocol(
    State(state): State<Arc<DialysisState>>,
    Path(protocol_id): Path<Uuid>,
    Json(request): Json<UpdateProtocolRequest>,
) -> Result<Json<ApiResponse<DialysisProtocol>>, AppError> {
    let protocol = state.dialysis.update_protocol(protocol_id, request).await?;
    Ok(ApiResponse::ok("Protocol updated", protocol))
}

pub async fn list_sessions(
    State(state): State<Arc<DialysisState>>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<ApiResponse<Vec<DialysisSession>>>, AppError> {
    let sessions = state.dialysis.list_sessions(query).await?;
    Ok(ApiResponse::ok("Dialysis sessions retrieved", sessions))
}

pub async fn get_session(
    State(state): State<Arc<DialysisState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<DialysisSession>>, AppError> {
    let session = state.dialysis.get_session(session_id).await?;
    Ok(ApiResponse::ok("Dialysis session retrieved", session))
}

pub async fn create_session(
    State(state): State<Arc<DialysisState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DialysisSession>>), AppError> {
    let session = state.create_session.execute(&user, request).await?;
    Ok(ApiResponse::created("Dialysis session created", session))
}
