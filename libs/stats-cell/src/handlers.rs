use std::sync::Arc;

use axum::{extract::State, Json};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response::ApiResponse;

use crate::models::{DashboardStats, DayCount, SummaryStats};
use crate::services::{GetDashboardStatsUseCase, StatsService};

pub struct StatsState {
    pub config: Arc<AppConfig>,
    pub dashboard: GetDashboardStatsUseCase,
    pub stats: StatsService,
}

pub async fn get_dashboard(
    State(state): State<Arc<StatsState>>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let stats = state.dashboard.execute().await?;
    Ok(ApiResponse::ok("Dashboard stats retrieved", stats))
}

pub async fn patients_per_day(
    State(state): State<Arc<StatsState>>,
) -> Result<Json<ApiResponse<Vec<DayCount>>>, AppError> {
    let days = state.stats.patients_per_day().await?;
    Ok(ApiResponse::ok("Patients per day retrieved", days))
}

pub async fn appointments_per_day(
    State(state): State<Arc<StatsState>>,
) -> Result<Json<ApiResponse<Vec<DayCount>>>, AppError> {
    let days = state.stats.appointments_per_day().await?;
    Ok(ApiResponse::ok("Appointments per day retrieved", days))
}

pub async fn get_summary(
    State(state): State<Arc<StatsState>>,
) -> Result<Json<ApiResponse<SummaryStats>>, AppError> {
    let summary = state.stats.summary().await?;
    Ok(ApiResponse::ok("Summary retrieved", summary))
}
