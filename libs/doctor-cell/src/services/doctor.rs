use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use auth_cell::{CreateUserRequest, UpdateUserRequest, UserRepository, UserService};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateDoctorRequest, Doctor, DoctorQuery, UpdateDoctorRequest};
use crate::repository::DoctorRepository;

pub struct DoctorService {
    doctors: Arc<dyn DoctorRepository>,
    users: UserService,
}

impl DoctorService {
    pub fn new(doctors: Arc<dyn DoctorRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            doctors,
            users: UserService::new(users),
        }
    }

    pub async fn list_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>, AppError> {
        Ok(self.doctors.find_all(query.specialization.as_deref()).await?)
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<Doctor, AppError> {
        self.doctors.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Doctor {} not found", id)))
    }

    /// Creates the account, the profile and the doctor row. A failed doctor
    /// insert removes the profile and account again.
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, AppError> {
        request.validate()?;
        debug!("Creating doctor {}", request.email);

        let user = self.users.create_user(CreateUserRequest {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: Role::Doctor,
        }).await?;

        let now = Utc::now().to_rfc3339();
        let inserted = self.doctors.insert(json!({
            "id": user.id,
            "specialization": request.specialization.trim(),
            "license_number": request.license_number.trim(),
            "is_available": request.is_available,
            "created_at": now,
            "updated_at": now
        })).await;

        if let Err(e) = inserted {
            if let Err(cleanup) = self.users.delete_user(user.id).await {
                warn!("Failed to remove user {} after doctor insert error: {}", user.id, cleanup);
            }
            return Err(e.into());
        }

        info!("Doctor created with ID: {}", user.id);
        self.get_doctor(user.id).await
    }

    pub async fn update_doctor(&self, id: Uuid, request: UpdateDoctorRequest) -> Result<Doctor, AppError> {
        request.validate()?;
        self.get_doctor(id).await?;

        if request.touches_profile() {
            self.users.update_user(id, UpdateUserRequest {
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                phone: request.phone.clone(),
            }).await?;
        }

        let mut update_data = serde_json::Map::new();
        if let Some(specialization) = request.specialization {
            update_data.insert("specialization".to_string(), json!(specialization.trim()));
        }
        if let Some(license_number) = request.license_number {
            update_data.insert("license_number".to_string(), json!(license_number.trim()));
        }
        if let Some(is_available) = request.is_available {
            update_data.insert("is_available".to_string(), json!(is_available));
        }

        if !update_data.is_empty() {
            update_data.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
            if !self.doctors.update(id, update_data.into()).await? {
                return Err(AppError::NotFound(format!("Doctor {} not found", id)));
            }
        }

        self.get_doctor(id).await
    }

    /// Removes the doctor row, then the profile and account.
    pub async fn delete_doctor(&self, id: Uuid) -> Result<(), AppError> {
        self.get_doctor(id).await?;
        self.doctors.delete(id).await?;
        self.users.delete_user(id).await?;
        info!("Doctor {} deleted", id);
        Ok(())
    }
}
