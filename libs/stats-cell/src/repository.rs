use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;

use appointment_cell::AppointmentStatus;
use shared_database::{DbResult, SupabaseClient};

/// Tables the dashboard counts rows of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counted {
    Patients,
    Doctors,
    Receptionists,
    Appointments,
    Rooms,
    Machines,
}

impl Counted {
    pub fn table(&self) -> &'static str {
        match self {
            Counted::Patients => "patients",
            Counted::Doctors => "doctors",
            Counted::Receptionists => "receptionists",
            Counted::Appointments => "appointments",
            Counted::Rooms => "rooms",
            Counted::Machines => "machines",
        }
    }
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn count(&self, table: Counted) -> DbResult<i64>;
    /// Statuses of appointments dated in `[from, to)`.
    async fn appointment_statuses(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<AppointmentStatus>>;
    /// `appointment_date` of appointments dated in `[from, to)`.
    async fn appointment_dates(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<DateTime<Utc>>>;
    /// `created_at` of patients registered in `[from, to)`.
    async fn patient_registrations(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<DateTime<Utc>>>;
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    status: AppointmentStatus,
}

#[derive(Debug, Deserialize)]
struct AppointmentDateRow {
    appointment_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct CreatedRow {
    created_at: DateTime<Utc>,
}

fn range(column: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    format!(
        "{col}=gte.{}&{col}=lt.{}",
        from.to_rfc3339_opts(SecondsFormat::Secs, true),
        to.to_rfc3339_opts(SecondsFormat::Secs, true),
        col = column
    )
}

pub struct SupabaseStatsRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseStatsRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl StatsRepository for SupabaseStatsRepository {
    async fn count(&self, table: Counted) -> DbResult<i64> {
        self.supabase.count(table.table(), "").await
    }

    async fn appointment_statuses(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<AppointmentStatus>> {
        let query = format!("select=status&{}", range("appointment_date", from, to));
        let rows: Vec<StatusRow> = self.supabase.select(Counted::Appointments.table(), &query).await?;
        Ok(rows.into_iter().map(|row| row.status).collect())
    }

    async fn appointment_dates(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<DateTime<Utc>>> {
        let query = format!("select=appointment_date&{}", range("appointment_date", from, to));
        let rows: Vec<AppointmentDateRow> = self.supabase.select(Counted::Appointments.table(), &query).await?;
        Ok(rows.into_iter().map(|row| row.appointment_date).collect())
    }

    async fn patient_registrations(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> DbResult<Vec<DateTime<Utc>>> {
        let query = format!("select=created_at&{}", range("created_at", from, to));
        let rows: Vec<CreatedRow> = self.supabase.select(Counted::Patients.table(), &query).await?;
        Ok(rows.into_iter().map(|row| row.created_at).collect())
    }
}
