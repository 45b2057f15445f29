use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateRoomRequest, Room, RoomAvailability, RoomAvailabilityQuery, RoomQuery, UpdateRoomRequest};
use crate::repository::RoomRepository;

pub struct RoomService {
    rooms: Arc<dyn RoomRepository>,
}

impl RoomService {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    pub async fn list_rooms(&self, query: RoomQuery) -> Result<Vec<Room>, AppError> {
        Ok(self.rooms.find_all(query.is_available).await?)
    }

    pub async fn get_room(&self, id: Uuid) -> Result<Room, AppError> {
        self.rooms.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    pub async fn create_room(&self, request: CreateRoomRequest) -> Result<Room, AppError> {
        request.validate()?;

        let now = Utc::now().to_rfc3339();
        let room = self.rooms.insert(json!({
            "id": Uuid::new_v4(),
            "room_number": request.room_number.trim(),
            "capacity": request.capacity,
            "type": request.room_type.trim(),
            "is_available": request.is_available,
            "created_at": now,
            "updated_at": now
        })).await?;

        info!("Room {} created ({})", room.room_number, room.id);
        Ok(room)
    }

    pub async fn update_room(&self, id: Uuid, request: UpdateRoomRequest) -> Result<Room, AppError> {
        request.validate()?;
        debug!("Updating room: {}", id);

        let mut update_data = serde_json::Map::new();
        if let Some(room_number) = request.room_number {
            update_data.insert("room_number".to_string(), json!(room_number.trim()));
        }
        if let Some(capacity) = request.capacity {
            update_data.insert("capacity".to_string(), json!(capacity));
        }
        if let Some(room_type) = request.room_type {
            update_data.insert("type".to_string(), json!(room_type.trim()));
        }
        if let Some(is_available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(is_available));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.rooms.update(id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    pub async fn delete_room(&self, id: Uuid) -> Result<(), AppError> {
        self.get_room(id).await?;
        self.rooms.delete(id).await?;
        info!("Room {} deleted", id);
        Ok(())
    }

    pub async fn check_availability(&self, id: Uuid, query: RoomAvailabilityQuery) -> Result<RoomAvailability, AppError> {
        if query.duration_minutes <= 0 {
            return Err(AppError::bad_request("durationMinutes must be positive"));
        }

        let room = self.get_room(id).await?;
        let free = self.rooms.is_available_for(id, query.start, query.duration_minutes).await?;

        Ok(RoomAvailability {
            room_id: room.id,
            start: query.start,
            duration_minutes: query.duration_minutes,
            is_available: room.is_available,
            has_conflict: !free,
        })
    }
}
