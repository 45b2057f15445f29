use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use auth_cell::{CreateUserRequest, UpdateUserRequest, UserRepository, UserService};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateReceptionistRequest, Receptionist, ReceptionistQuery, UpdateReceptionistRequest};
use crate::repository::ReceptionistRepository;

pub struct ReceptionistService {
    receptionists: Arc<dyn ReceptionistRepository>,
    users: UserService,
}

impl ReceptionistService {
    pub fn new(receptionists: Arc<dyn ReceptionistRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            receptionists,
            users: UserService::new(users),
        }
    }

    pub async fn list_receptionists(&self, query: ReceptionistQuery) -> Result<Vec<Receptionist>, AppError> {
        Ok(self.receptionists.find_all(query.shift.as_deref()).await?)
    }

    pub async fn get_receptionist(&self, id: Uuid) -> Result<Receptionist, AppError> {
        self.receptionists.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Receptionist {} not found", id)))
    }

    pub async fn create_receptionist(&self, request: CreateReceptionistRequest) -> Result<Receptionist, AppError> {
        request.validate()?;

        let user = self.users.create_user(CreateUserRequest {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: Role::Receptionist,
        }).await?;

        let now = Utc::now().to_rfc3339();
        let inserted = self.receptionists.insert(json!({
            "id": user.id,
            "shift": request.shift,
            "created_at": now,
            "updated_at": now
        })).await;

        if let Err(e) = inserted {
            if let Err(cleanup) = self.users.delete_user(user.id).await {
                warn!("Failed to remove user {} after receptionist insert error: {}", user.id, cleanup);
            }
            return Err(e.into());
        }

        info!("Receptionist created with ID: {}", user.id);
        self.get_receptionist(user.id).await
    }

    pub async fn update_receptionist(
        &self,
        id: Uuid,
        request: UpdateReceptionistRequest,
    ) -> Result<Receptionist, AppError> {
        self.get_receptionist(id).await?;

        if request.touches_profile() {
            self.users.update_user(id, UpdateUserRequest {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: request.phone.clone(),
            }).await?;
        }

        if let Some(shift) = request.shift {
            let changes = json!({ "shift": shift, "updated_at": Utc::now().to_rfc3339() });
            if !self.receptionists.update(id, changes).await? {
                return Err(AppError::NotFound(format!("Receptionist {} not found", id)));
            }
        }

        self.get_receptionist(id).await
    }

    pub async fn delete_receptionist(&self, id: Uuid) -> Result<(), AppError> {
        self.get_receptionist(id).await?;
        self.receptionists.delete(id).await?;
        self.users.delete_user(id).await?;
        info!("Receptionist {} deleted", id);
        Ok(())
    }
}
