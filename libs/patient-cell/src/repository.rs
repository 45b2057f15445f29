use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{Patient, PatientSearchQuery};

const TABLE: &str = "patients";

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_all(&self, query: &PatientSearchQuery) -> DbResult<Vec<Patient>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Patient>>;
    async fn insert(&self, row: Value) -> DbResult<Patient>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Patient>>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
    /// Stores the back-reference to the patient's medical file.
    async fn set_medical_file(&self, id: Uuid, medical_file_id: Uuid) -> DbResult<()>;
}

pub struct SupabasePatientRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabasePatientRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PatientRepository for SupabasePatientRepository {
    async fn find_all(&self, query: &PatientSearchQuery) -> DbResult<Vec<Patient>> {
        debug!("Searching patients with query: {:?}", query);

        let mut query_parts = vec!["order=created_at.desc".to_string()];

        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = urlencoding::encode(term);
            query_parts.push(format!(
                "or=(first_name.ilike.*{0}*,last_name.ilike.*{0}*,phone.ilike.*{0}*)",
                term
            ));
        }

        query_parts.push(format!("limit={}", query.limit.unwrap_or(100)));
        query_parts.push(format!("offset={}", query.offset.unwrap_or(0)));

        self.supabase.select(TABLE, &query_parts.join("&")).await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Patient>> {
        self.supabase.select_one(TABLE, &format!("id=eq.{}", id)).await
    }

    async fn insert(&self, row: Value) -> DbResult<Patient> {
        self.supabase.insert(TABLE, row).await
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Patient>> {
        let rows: Vec<Patient> = self.supabase.update(TABLE, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(TABLE, &format!("id=eq.{}", id)).await
    }

    async fn set_medical_file(&self, id: Uuid, medical_file_id: Uuid) -> DbResult<()> {
        let _: Vec<Value> = self.supabase.update(TABLE, &format!("id=eq.{}", id), json!({
            "medical_file_id": medical_file_id,
            "updated_at": Utc::now().to_rfc3339()
        })).await?;
        Ok(())
    }
}
