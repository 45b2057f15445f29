use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{Doctor, DoctorRow};

const TABLE: &str = "doctors";
const WITH_USER: &str = "select=*,user:users(*)";

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_all(&self, specialization: Option<&str>) -> DbResult<Vec<Doctor>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Doctor>>;
    async fn insert(&self, row: Value) -> DbResult<()>;
    /// Returns false when no row matched.
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<bool>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

pub struct SupabaseDoctorRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDoctorRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DoctorRepository for SupabaseDoctorRepository {
    async fn find_all(&self, specialization: Option<&str>) -> DbResult<Vec<Doctor>> {
        let mut query = format!("{}&order=created_at.desc", WITH_USER);
        if let Some(term) = specialization.map(str::trim).filter(|t| !t.is_empty()) {
            query.push_str(&format!("&specialization=ilike.*{}*", urlencoding::encode(term)));
        }

        let rows: Vec<DoctorRow> = self.supabase.select(TABLE, &query).await?;
        Ok(rows.into_iter().map(Doctor::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Doctor>> {
        let row: Option<DoctorRow> = self.supabase
            .select_one(TABLE, &format!("{}&id=eq.{}", WITH_USER, id))
            .await?;
        Ok(row.map(Doctor::from))
    }

    async fn insert(&self, row: Value) -> DbResult<()> {
        let _: Vec<Value> = self.supabase.insert_many(TABLE, row).await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<bool> {
        let rows: Vec<Value> = self.supabase.update(TABLE, &format!("id=eq.{}", id), changes).await?;
        Ok(!rows.is_empty())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(TABLE, &format!("id=eq.{}", id)).await
    }
}
