use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::validation::Validate;

use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::repository::{NewUserProfile, UserRepository};

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        Ok(self.users.find_all(role).await?)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Provisions the auth account and the profile row. If the profile insert
    /// fails the auth account is removed again.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AppError> {
        request.validate()?;
        debug!("Creating {} account for {}", request.role, request.email);

        let id = self.users.create_account(&request.email, &request.password, request.role).await?;

        let profile = NewUserProfile {
            id,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            role: request.role,
        };

        match self.users.insert_profile(profile).await {
            Ok(user) => {
                info!("User {} created with role {}", user.id, user.role);
                Ok(user)
            }
            Err(e) => {
                if let Err(cleanup) = self.users.delete_account(id).await {
                    warn!("Failed to remove auth account {} after profile error: {}", id, cleanup);
                }
                Err(e.into())
            }
        }
    }

    pub async fn update_user(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, AppError> {
        request.validate()?;

        let mut changes = serde_json::Map::new();
        if let Some(first_name) = request.first_name {
            changes.insert("first_name".to_string(), json!(first_name));
        }
        if let Some(last_name) = request.last_name {
            changes.insert("last_name".to_string(), json!(last_name));
        }
        if let Some(phone) = request.phone {
            changes.insert("phone".to_string(), json!(phone));
        }
        changes.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));

        self.users.update_profile(id, changes.into()).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Removes the profile row and then the auth account.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        self.get_user(id).await?;

        self.users.delete_profile(id).await?;
        self.users.delete_account(id).await?;

        info!("User {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;
    use shared_database::{AuthSession, DbResult};
    use shared_models::error::DatabaseError;

    #[derive(Default)]
    struct FakeUsers {
        fail_profile: bool,
        deleted_accounts: Mutex<Vec<Uuid>>,
    }

    #[async_trait]
    impl UserRepository for FakeUsers {
        async fn find_all(&self, _role: Option<Role>) -> DbResult<Vec<User>> { Ok(vec![]) }
        async fn find_by_id(&self, _id: Uuid) -> DbResult<Option<User>> { Ok(None) }
        async fn insert_profile(&self, profile: NewUserProfile) -> DbResult<User> {
            if self.fail_profile {
                return Err(DatabaseError::new("insert failed").with_status(500));
            }
            Ok(User {
                id: profile.id,
                email: profile.email,
                first_name: profile.first_name,
                last_name: profile.last_name,
                phone: profile.phone,
                role: profile.role,
                created_at: Utc::now(),
                updated_at: None,
            })
        }
        async fn update_profile(&self, _id: Uuid, _changes: Value) -> DbResult<Option<User>> { Ok(None) }
        async fn delete_profile(&self, _id: Uuid) -> DbResult<()> { Ok(()) }
        async fn create_account(&self, _email: &str, _password: &str, _role: Role) -> DbResult<Uuid> {
            Ok(Uuid::nil())
        }
        async fn delete_account(&self, id: Uuid) -> DbResult<()> {
            self.deleted_accounts.lock().unwrap().push(id);
            Ok(())
        }
        async fn sign_in(&self, _email: &str, _password: &str) -> DbResult<AuthSession> {
            Err(DatabaseError::new("unused"))
        }
        async fn sign_out(&self, _access_token: &str) -> DbResult<()> { Ok(()) }
    }

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "desk@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Lina".to_string(),
            last_name: "Saidi".to_string(),
            phone: None,
            role: Role::Receptionist,
        }
    }

    #[tokio::test]
    async fn create_user_returns_profile() {
        let repo = Arc::new(FakeUsers::default());
        let service = UserService::new(repo.clone());

        let user = service.create_user(request()).await.unwrap();
        assert_eq!(user.role, Role::Receptionist);
        assert!(repo.deleted_accounts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_profile_insert_removes_account() {
        let repo = Arc::new(FakeUsers { fail_profile: true, ..Default::default() });
        let service = UserService::new(repo.clone());

        let err = service.create_user(request()).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(*repo.deleted_accounts.lock().unwrap(), vec![Uuid::nil()]);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let service = UserService::new(Arc::new(FakeUsers::default()));
        let err = service.get_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
