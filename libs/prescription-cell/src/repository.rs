use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, warn};
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{Medication, Prescription};

const PRESCRIPTIONS: &str = "prescriptions";
const MEDICATIONS: &str = "medications";
const WITH_MEDICATIONS: &str = "select=*,medications(*)";

#[async_trait]
pub trait PrescriptionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Prescription>>;
    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Vec<Prescription>>;
    /// Inserts the prescription and then its medications in one batch. If
    /// the batch fails the prescription row is deleted again and the batch
    /// error is returned.
    async fn create(&self, prescription: Value, medications: Vec<Value>) -> DbResult<Prescription>;
    /// Deletes the medications first, then the prescription.
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

pub struct SupabasePrescriptionRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabasePrescriptionRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PrescriptionRepository for SupabasePrescriptionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Prescription>> {
        self.supabase
            .select_one(PRESCRIPTIONS, &format!("{}&id=eq.{}", WITH_MEDICATIONS, id))
            .await
    }

    async fn find_by_patient(&self, patient_id: Uuid) -> DbResult<Vec<Prescription>> {
        self.supabase
            .select(PRESCRIPTIONS, &format!("{}&patient_id=eq.{}&order=date.desc", WITH_MEDICATIONS, patient_id))
            .await
    }

    async fn create(&self, prescription: Value, medications: Vec<Value>) -> DbResult<Prescription> {
        let mut created: Prescription = self.supabase.insert(PRESCRIPTIONS, prescription).await?;

        let rows: Vec<Value> = medications
            .into_iter()
            .map(|mut row| {
                row["prescription_id"] = Value::String(created.id.to_string());
                row
            })
            .collect();

        match self.supabase.insert_many::<Medication>(MEDICATIONS, Value::Array(rows)).await {
            Ok(medications) => {
                created.medications = medications;
                Ok(created)
            }
            Err(e) => {
                warn!("Medication insert failed for prescription {}, rolling back: {}", created.id, e);
                if let Err(rollback) = self.supabase
                    .delete(PRESCRIPTIONS, &format!("id=eq.{}", created.id))
                    .await
                {
                    error!("Rollback of prescription {} failed: {}", created.id, rollback);
                }
                Err(e)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(MEDICATIONS, &format!("prescription_id=eq.{}", id)).await?;
        self.supabase.delete(PRESCRIPTIONS, &format!("id=eq.{}", id)).await
    }
}
