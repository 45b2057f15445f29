use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use shared_database::{DbResult, SupabaseClient};

use crate::availability::{day_window, intervals_overlap};
use crate::models::{Machine, MachineStats, MachineStatus, Room};

const ROOMS: &str = "rooms";
const MACHINES: &str = "machines";
const APPOINTMENTS: &str = "appointments";

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_all(&self, is_available: Option<bool>) -> DbResult<Vec<Room>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Room>>;
    async fn insert(&self, row: Value) -> DbResult<Room>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Room>>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
    /// True when no SCHEDULED appointment in the room overlaps
    /// `[start, start + duration_minutes)`.
    async fn is_available_for(&self, room_id: Uuid, start: DateTime<Utc>, duration_minutes: i32) -> DbResult<bool>;
}

#[async_trait]
pub trait MachineRepository: Send + Sync {
    async fn find_all(&self, status: Option<MachineStatus>) -> DbResult<Vec<Machine>>;
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Machine>>;
    async fn insert(&self, row: Value) -> DbResult<Machine>;
    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Machine>>;
    async fn delete(&self, id: Uuid) -> DbResult<()>;
    async fn status_counts(&self) -> DbResult<MachineStats>;
}

#[derive(Debug, Deserialize)]
struct BookedSlot {
    appointment_date: DateTime<Utc>,
    estimated_duration_in_minutes: i32,
}

#[derive(Debug, Deserialize)]
struct StatusRow {
    status: MachineStatus,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub struct SupabaseRoomRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseRoomRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl RoomRepository for SupabaseRoomRepository {
    async fn find_all(&self, is_available: Option<bool>) -> DbResult<Vec<Room>> {
        let mut query = String::from("order=room_number.asc");
        if let Some(flag) = is_available {
            query.push_str(&format!("&is_available=eq.{}", flag));
        }
        self.supabase.select(ROOMS, &query).await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Room>> {
        self.supabase.select_one(ROOMS, &format!("id=eq.{}", id)).await
    }

    async fn insert(&self, row: Value) -> DbResult<Room> {
        self.supabase.insert(ROOMS, row).await
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Room>> {
        let rows: Vec<Room> = self.supabase.update(ROOMS, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(ROOMS, &format!("id=eq.{}", id)).await
    }

    async fn is_available_for(&self, room_id: Uuid, start: DateTime<Utc>, duration_minutes: i32) -> DbResult<bool> {
        let (day_start, day_end) = day_window(start);
        let query = format!(
            "select=appointment_date,estimated_duration_in_minutes&room_id=eq.{}&status=eq.SCHEDULED&appointment_date=gte.{}&appointment_date=lt.{}",
            room_id,
            timestamp(day_start),
            timestamp(day_end)
        );

        let booked: Vec<BookedSlot> = self.supabase.select(APPOINTMENTS, &query).await?;
        debug!("Room {} has {} scheduled appointments on {}", room_id, booked.len(), day_start.date_naive());

        Ok(!booked.iter().any(|slot| {
            intervals_overlap(start, duration_minutes, slot.appointment_date, slot.estimated_duration_in_minutes)
        }))
    }
}

pub struct SupabaseMachineRepository {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseMachineRepository {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl MachineRepository for SupabaseMachineRepository {
    async fn find_all(&self, status: Option<MachineStatus>) -> DbResult<Vec<Machine>> {
        let mut query = String::from("order=serial_number.asc");
        if let Some(status) = status {
            query.push_str(&format!("&status=eq.{}", status));
        }
        self.supabase.select(MACHINES, &query).await
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Machine>> {
        self.supabase.select_one(MACHINES, &format!("id=eq.{}", id)).await
    }

    async fn insert(&self, row: Value) -> DbResult<Machine> {
        self.supabase.insert(MACHINES, row).await
    }

    async fn update(&self, id: Uuid, changes: Value) -> DbResult<Option<Machine>> {
        let rows: Vec<Machine> = self.supabase.update(MACHINES, &format!("id=eq.{}", id), changes).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.supabase.delete(MACHINES, &format!("id=eq.{}", id)).await
    }

    async fn status_counts(&self) -> DbResult<MachineStats> {
        let rows: Vec<StatusRow> = self.supabase.select(MACHINES, "select=status").await?;
        Ok(MachineStats::from_statuses(rows.into_iter().map(|row| row.status)))
    }
}
