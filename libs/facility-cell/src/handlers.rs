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

use crate::models::*;
use crate::services::{MachineService, RoomService};

pub struct FacilityState {
    pub config: Arc<AppConfig>,
    pub rooms: RoomService,
    pub machines: MachineService,
}

// ==============================================================================
// ROOM HANDLERS
// ==============================================================================

pub async fn list_rooms(
    State(state): State<Arc<FacilityState>>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<ApiResponse<Vec<Room>>>, AppError> {
    let rooms = state.rooms.list_rooms(query).await?;
    Ok(ApiResponse::ok("Rooms retrieved", rooms))
}

pub async fn get_room(
    State(state): State<Arc<FacilityState>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.get_room(room_id).await?;
    Ok(ApiResponse::ok("Room retrieved", room))
}

pub async fn create_room(
    State(state): State<Arc<FacilityState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Room>>), AppError> {
    let room = state.rooms.create_room(request).await?;
    Ok(ApiResponse::created("Room created", room))
}

pub async fn update_room(
    State(state): State<Arc<FacilityState>>,
    Path(room_id): Path<Uuid>,
    Json(request): Json<UpdateRoomRequest>,
) -> Result<Json<ApiResponse<Room>>, AppError> {
    let room = state.rooms.update_room(room_id, request).await?;
    Ok(ApiResponse::ok("Room updated", room))
}

pub async fn delete_room(
    State(state): State<Arc<FacilityState>>,
    Path(room_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.rooms.delete_room(room_id).await?;
    Ok(ApiResponse::message("Room deleted"))
}

pub async fn room_availability(
    State(state): State<Arc<FacilityState>>,
    Path(room_id): Path<Uuid>,
    Query(query): Query<RoomAvailabilityQuery>,
) -> Result<Json<ApiResponse<RoomAvailability>>, AppError> {
    let availability = state.rooms.check_availability(room_id, query).await?;
    Ok(ApiResponse::ok("Room availability checked", availability))
}

// ==============================================================================
// MACHINE HANDLERS
// ==============================================================================

pub async fn list_machines(
    State(state): State<Arc<FacilityState>>,
    Query(query): Query<MachineQuery>,
) -> Result<Json<ApiResponse<Vec<Machine>>>, AppError> {
    let machines = state.machines.list_machines(query).await?;
    Ok(ApiResponse::ok("Machines retrieved", machines))
}

pub async fn get_machine(
    State(state): State<Arc<FacilityState>>,
    Path(machine_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Machine>>, AppError> {
    let machine = state.machines.get_machine(machine_id).await?;
    Ok(ApiResponse::ok("Machine retrieved", machine))
}

pub async fn create_machine(
    State(state): State<Arc<FacilityState>>,
    Json(request): Json<CreateMachineRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Machine>>), AppError> {
    let machine = state.machines.create_machine(request).await?;
    Ok(ApiResponse::created("Machine created", machine))
}

pub async fn update_machine(
    State(state): State<Arc<FacilityState>>,
    Path(machine_id): Path<Uuid>,
    Json(request): Json<UpdateMachineRequest>,
) -> Result<Json<ApiResponse<Machine>>, AppError> {
    let machine = state.machines.update_machine(machine_id, request).await?;
    Ok(ApiResponse::ok("Machine updated", machine))
}

pub async fn delete_machine(
    State(state): State<Arc<FacilityState>>,
    Path(machine_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    state.machines.delete_machine(machine_id).await?;
    Ok(ApiResponse::message("Machine deleted"))
}

pub async fn machine_stats(
    State(state): State<Arc<FacilityState>>,
) -> Result<Json<ApiResponse<MachineStats>>, AppError> {
    let stats = state.machines.machine_stats().await?;
    Ok(ApiResponse::ok("Machine stats retrieved", stats))
}
