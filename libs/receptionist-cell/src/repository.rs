use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{Receptionist, ReceptionistRow};

const TABLE: &str = "receptionists";
const WITH_USER: &str = "select=*,user:users(*)";

#[async_trait]
pub trait ReceptionistRepository: Send + Sync {
    async fn find_all(&self, shift: Option<&str>) -> DbResult<Vec<Receptionist>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Receptionist>>;
    async fn insert(&self, row: Value) -> DbResult<()>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<bool>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

pub struct SupabaseReceptionistRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseReceptionistRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl ReceptionistRepository for SupabaseReceptionistRepository {
    async fn find_all(&self, shift: Option<&str>) -> DbResult<Vec<Receptionist>> {
        let mut query = format!("{}&order=created_at.desc", WITH_USER);
        if let Some(shift) = shift.map(str::trim).filter(|s| !s.is_empty()) {
            query.push_str(&format!("&shift=eq.{}", urlencoding::encode(shift)));
        }

        let rows: Vec<ReceptionistRow> = self.supabase.select(TABLE, &query).await?;
        Ok(rows.into_iter().map(Receptionist::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Receptionist>> {
        let row: Option<ReceptionistRow> = self.supabase
            .select_one(TABLE, &format!("{}&id=eq.{}", WITH_USER, id))
            .await?;
        Ok(row.map(Receptionist::from))
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
