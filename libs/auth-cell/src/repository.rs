use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{AuthSession, DbResult, SupabaseClient};
use shared_models::auth::Role;
use shared_models::error::DatabaseError;

use crate::models::User;

const TABLE: &str = "users";

/// Profile values written when an account is provisioned.
#[derive(Debug, Clone)]
pub struct NewUserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self, role: Option<Role>) -> DbResult<Vec<User>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn insert_profile(&self, profile: NewUserProfile) -> DbResult<User>;
    async fn update_profile(&self, id: Uuid, changes: Value) -> DbResult<Option<User>>;
    async fn delete_profile(&self, id: Uuid) -> DbResult<()>;

    /// Creates the credential record with the hosted auth provider.
    async fn create_account(&self, email: &str, password: &str, role: Role) -> DbResult<Uuid>;
    async fn delete_account(&self, id: Uuid) -> DbResult<()>;

    async fn sign_in(&self, email: &str, password: &str) -> DbResult<AuthSession>;
    async fn sign_out(&self, access_token: &str) -> DbResult<()>;
}

pub struct SupabaseUserRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseUserRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl UserRepository for SupabaseUserRepository {
    async fn find_all(&self, role: Option<Role>) -> DbResult<Vec<User>> {
        let query = match role {
            Some(role) => format!("role=eq.{}&order=created_at.desc", role),
            None => "order=created_at.desc".to_string(),
        };
        self.supabase.select(TABLE, &query).await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        self.supabase.select_one(TABLE, &format!("id=eq.{}", id)).await
    }

    async fn insert_profile(&self, profile: NewUserProfile) -> DbResult<User> {
        debug!("Inserting user profile {} ({})", profile.id, profile.role);
        let now = Utc::now().to_rfc3339();

        self.supabase.insert(TABLE, json!({
            "id": profile.id,
            "email": profile.email,
            "first_name": profile.first_name,
            "last_name": profile.last_name,
            "phone": profile.phone,
            "role": profile.role,
            "created_at": now,
            "updated_at": now
        })).await
    }

    async fn update_profile(&self, id: Uuid, changes: Value) -> DbResult<Option<User>> {
        let rows: Vec<User> = self.supabase.update(TABLE, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_profile(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(TABLE, &format!("id=eq.{}", id)).await
    }

    async fn create_account(&self, email: &str, password: &str, role: Role) -> DbResult<Uuid> {
        let created = self.supabase.admin_create_user(email, password, role.as_str()).await?;

        created.get("id")
            .and_then(|id| id.as_str())
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or_else(|| DatabaseError::new("Auth provider returned a user without an id"))
    }

    async fn delete_account(&self, id: Uuid) -> DbResult<()> {
        self.supabase.admin_delete_user(&id.to_string()).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> DbResult<AuthSession> {
        self.supabase.sign_in_with_password(email, password).await
    }

    async fn sign_out(&self, access_token: &str) -> DbResult<()> {
        self.supabase.sign_out(access_token).await
    }
}
