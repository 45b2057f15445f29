use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::models::{Appointment, AppointmentHistory, AppointmentRow, AppointmentStatus};

const APPOINTMENTS: &str = "appointments";
const HISTORY: &str = "appointment_history";

/// Filters understood by the storage layer; status is already parsed.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub date: Option<chrono::NaiveDate>,
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_all(&self, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Appointment>>;
    async fn insert(&self, appointment: &Appointment) -> DbResult<Appointment>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Appointment>>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}

#[async_trait]
pub trait AppointmentHistoryRepository: Send + Sync {
    async fn create(&self, appointment_id: Uuid, appointment_data: Value) -> DbResult<AppointmentHistory>;
    async fn find_by_appointment(&self, appointment_id: Uuid) -> DbResult<Vec<AppointmentHistory>>;
}

fn into_appointments(rows: Vec<AppointmentRow>) -> DbResult<Vec<Appointment>> {
    rows.into_iter().map(Appointment::try_from).collect()
}

pub struct SupabaseAppointmentRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AppointmentRepository for SupabaseAppointmentRepository {
    async fn find_all(&self, filter: &AppointmentFilter) -> DbResult<Vec<Appointment>> {
        debug!("Listing appointments with filter: {:?}", filter);

        let mut query_parts = vec!["order=appointment_date.asc".to_string()];
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status));
        }
        if let Some(doctor_id) = filter.doctor_id {
            query_parts.push(format!("doctor_id=eq.{}", doctor_id));
        }
        if let Some(patient_id) = filter.patient_id {
            query_parts.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(date) = filter.date {
            let next = date + Duration::days(1);
            query_parts.push(format!("appointment_date=gte.{}T00:00:00Z", date.format("%Y-%m-%d")));
            query_parts.push(format!("appointment_date=lt.{}T00:00:00Z", next.format("%Y-%m-%d")));
        }

        let rows: Vec<AppointmentRow> = self.supabase.select(APPOINTMENTS, &query_parts.join("&")).await?;
        into_appointments(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Appointment>> {
        let row: Option<AppointmentRow> = self.supabase
            .select_one(APPOINTMENTS, &format!("id=eq.{}", id))
            .await?;
        row.map(Appointment::try_from).transpose()
    }

    async fn insert(&self, appointment: &Appointment) -> DbResult<Appointment> {
        let row: AppointmentRow = self.supabase.insert(APPOINTMENTS, json!({
            "id": appointment.id,
            "patient_id": appointment.patient_id,
            "doctor_id": appointment.doctor_id,
            "room_id": appointment.room_id,
            "created_by_reception_id": appointment.created_by.reception_id(),
            "created_by_doctor_id": appointment.created_by.doctor_id(),
            "appointment_date": appointment.appointment_date.to_rfc3339(),
            "estimated_duration_in_minutes": appointment.estimated_duration_in_minutes,
            "status": appointment.status,
            "created_at": appointment.created_at.to_rfc3339(),
            "updated_at": appointment.updated_at.map(|t| t.to_rfc3339())
        })).await?;
        Appointment::try_from(row)
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Appointment>> {
        let rows: Vec<AppointmentRow> = self.supabase
            .update(APPOINTMENTS, &format!("id=eq.{}", id), changes)
            .await?;
        rows.into_iter().next().map(Appointment::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(APPOINTMENTS, &format!("id=eq.{}", id)).await
    }
}

pub struct SupabaseAppointmentHistoryRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseAppointmentHistoryRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl AppointmentHistoryRepository for SupabaseAppointmentHistoryRepository {
    async fn create(&self, appointment_id: Uuid, appointment_data: Value) -> DbResult<AppointmentHistory> {
        let now = Utc::now().to_rfc3339();
        self.supabase.insert(HISTORY, json!({
            "id": Uuid::new_v4(),
            "appointment_id": appointment_id,
            "appointment_data": appointment_data,
            "created_at": now,
            "updated_at": now
        })).await
    }

    async fn find_by_appointment(&self, appointment_id: Uuid) -> DbResult<Vec<AppointmentHistory>> {
        self.supabase
            .select(HISTORY, &format!("appointment_id=eq.{}&order=created_at.asc", appointment_id))
            .await
    }
}
