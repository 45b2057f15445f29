use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateMachineRequest, Machine, MachineQuery, MachineStats, MachineStatus, UpdateMachineRequest};
use crate::repository::MachineRepository;

pub struct MachineService {
    machines: Arc<dyn MachineRepository>,
}

impl MachineService {
    pub fn new(machines: Arc<dyn MachineRepository>) -> Self {
        Self { machines }
    }

    pub async fn list_machines(&self, query: MachineQuery) -> Result<Vec<Machine>, AppError> {
        Ok(self.machines.find_all(query.status).await?)
    }

    pub async fn get_machine(&self, id: Uuid) -> Result<Machine, AppError> {
        self.machines.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Machine {} not found", id)))
    }

    pub async fn create_machine(&self, request: CreateMachineRequest) -> Result<Machine, AppError> {
        request.validate()?;

        let now = Utc::now().to_rfc3339();
        let machine = self.machines.insert(json!({
            "id": Uuid::new_v4(),
            "serial_number": request.serial_number.trim(),
            "model": request.model.trim(),
            "status": request.status.unwrap_or(MachineStatus::Available),
            "room_id": request.room_id,
            "last_maintenance_date": request.last_maintenance_date.map(|d| d.format("%Y-%m-%d").to_string()),
            "created_at": now,
            "updated_at": now
        })).await?;

        info!("Machine {} registered ({})", machine.serial_number, machine.id);
        Ok(machine)
    }

    pub async fn update_machine(&self, id: Uuid, request: UpdateMachineRequest) -> Result<Machine, AppError> {
        debug!("Updating machine: {}", id);

        let mut update_data = serde_json::Map::new();
        if let Some(serial_number) = request.serial_number {
            if serial_number.trim().is_empty() {
                return Err(AppError::bad_request("serialNumber cannot be empty"));
            }
            update_data.insert("serial_number".to_string(), json!(serial_number.trim()));
        }
        if let Some(model) = request.model {
            update_data.insert("model".to_string(), json!(model.trim()));
        }
        if let Some(status) = request.status {
            update_data.insert("status".to_string(), json!(status));
        }
        if let Some(room_id) = request.room_id {
            update_data.insert("room_id".to_string(), json!(room_id));
        }
        if let Some(date) = request.last_maintenance_date {
            update_data.insert("last_maintenance_date".to_string(), json!(date.format("%Y-%m-%d").to_string()));
        }
        update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.machines.update(id, update_data.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("Machine {} not found", id)))
    }

    pub async fn delete_machine(&self, id: Uuid) -> Result<(), AppError> {
        self.get_machine(id).await?;
        self.machines.delete(id).await?;
        info!("Machine {} deleted", id);
        Ok(())
    }

    pub async fn machine_stats(&self) -> Result<MachineStats, AppError> {
        Ok(self.machines.status_counts().await?)
    }
}
