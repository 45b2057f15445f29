use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::MedicalFile;

const TABLE: &str = "medical_files";

#[async_trait]
pub trait MedicalFileRepository: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<MedicalFile>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<MedicalFile>>;
    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Option<MedicalFile>>;
    async fn create(&self, patient_id: Uuid, doctor_id: Uuid, data: Value) -> DbResult<MedicalFile>;
    /// Replaces `data` and `doctor_id` of an existing file.
    async fn update(&self, id: Uuid, doctor_id: Uuid, data: Value) -> DbResult<Option<MedicalFile>>;
}

pub struct SupabaseMedicalFileRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseMedicalFileRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl MedicalFileRepository for SupabaseMedicalFileRepository {
    async fn find_all(&self) -> DbResult<Vec<MedicalFile>> {
        self.supabase.select(TABLE, "order=updated_at.desc").await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<MedicalFile>> {
        self.supabase.select_one(TABLE, &format!("id=eq.{}", id)).await
    }

    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Option<MedicalFile>> {
        self.supabase.select_one(TABLE, &format!("patient_id=eq.{}", patient_id)).await
    }

    async fn create(&self, patient_id: Uuid, doctor_id: Uuid, data: Value) -> DbResult<MedicalFile> {
        debug!("Creating medical file for patient {}", patient_id);
        let now = Utc::now().to_rfc3339();

        self.supabase.insert(TABLE, json!({
            "id": Uuid::new_v4(),
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "data": data,
            "created_at": now,
            "updated_at": now
        })).await
    }

    async fn update(&self, id: Uuid, doctor_id: Uuid, data: Value) -> DbResult<Option<MedicalFile>> {
        let rows: Vec<MedicalFile> = self.supabase.update(TABLE, &format!("id=eq.{}", id), json!({
            "doctor_id": doctor_id,
            "data": data,
            "updated_at": Utc::now().to_rfc3339()
        })).await?;
        Ok(rows.into_iter().next())
    }
}
