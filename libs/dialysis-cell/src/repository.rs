use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{DialysisPatient, DialysisProtocol, DialysisSession};

const PATIENTS: &str = "dialysis_patients";
const PROTOCOLS: &str = "dialysis_protocols";
const SESSIONS: &str = "dialysis_sessions";

#[async_trait]
pub trait DialysisPatientRepository: Send + Sync {
    async fn find_all(&self) -> DbResult<Vec<DialysisPatient>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DialysisPatient>>;
    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Option<DialysisPatient>>;
    async fn insert(&self, row: Value) -> DbResult<DialysisPatient>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<DialysisPatient>>;
}

#[async_trait]
pub trait DialysisProtocolRepository: Send + Sync {
    async fn find_by_dialysis_patient(&self, dialysis_patient_id: Uuid) -> DbResult<Vec<DialysisProtocol>>;
    async fn insert(&self, row: Value) -> DbResult<DialysisProtocol>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<DialysisProtocol>>;
}

#[async_trait]
pub trait DialysisSessionRepository: Send + Sync {
    async fn find_all(&self, dialysis_patient_id: Option<Uuid>) -> DbResult<Vec<DialysisSession>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DialysisSession>>;
    async fn insert(&self, row: Value) -> DbResult<DialysisSession>;
}

/// One client-backed implementation for the three dialysis tables.
pub struct SupabaseDialysisRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseDialysisRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DialysisPatientRepository for SupabaseDialysisRepository {
    async fn find_all(&self) -> DbResult<Vec<DialysisPatient>> {
        self.supabase.select(PATIENTS, "order=created_at.desc").await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DialysisPatient>> {
        self.supabase.select_one(PATIENTS, &format!("id=eq.{}", id)).await
    }

    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Option<DialysisPatient>> {
        self.supabase.select_one(PATIENTS, &format!("patient_id=eq.{}", patient_id)).await
    }

    async fn insert(&self, row: Value) -> DbResult<DialysisPatient> {
        self.supabase.insert(PATIENTS, row).await
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<DialysisPatient>> {
        let rows: Vec<DialysisPatient> = self.supabase.update(PATIENTS, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DialysisProtocolRepository for SupabaseDialysisRepository {
    async fn find_by_dialysis_patient(&self, dialysis_patient_id: Uuid) -> DbResult<Vec<DialysisProtocol>> {
        self.supabase
            .select(PROTOCOLS, &format!("dialysis_patient_id=eq.{}&order=created_at.desc", dialysis_patient_id))
            .await
    }

    async fn insert(&self, row: Value) -> DbResult<DialysisProtocol> {
        self.supabase.insert(PROTOCOLS, row).await
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<DialysisProtocol>> {
        let rows: Vec<DialysisProtocol> = self.supabase.update(PROTOCOLS, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DialysisSessionRepository for SupabaseDialysisRepository {
    async fn find_all(&self, dialysis_patient_id: Option<Uuid>) -> DbResult<Vec<DialysisSession>> {
        let query = match dialysis_patient_id {
            Some(id) => format!("dialysis_patient_id=eq.{}&order=session_date.desc", id),
            None => "order=session_date.desc".to_string(),
        };
        self.supabase.select(SESSIONS, &query).await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DialysisSession>> {
        self.supabase.select_one(SESSIONS, &format!("id=eq.{}", id)).await
    }

    async fn insert(&self, row: Value) -> DbResult<DialysisSession> {
        self.supabase.insert(SESSIONS, row).await
    }
}
