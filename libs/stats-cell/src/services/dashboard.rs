use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures::try_join;
use tracing::debug;

use facility_cell::MachineRepository;
use shared_database::DbResult;
use shared_models::error::AppError;

use crate::models::{AppointmentStatusCounts, DashboardStats, DayCount, StaffCounts, SummaryStats, WeekActivity};
use crate::repository::{Counted, StatsRepository};
use crate::week::{bucket_by_day, start_of_day, week_bounds};

/// Admin dashboard snapshot. The five parts are fetched concurrently and
/// recomputed on every call.
pub struct GetDashboardStatsUseCase {
    stats: Arc<dyn StatsRepository>,
    machines: Arc<dyn MachineRepository>,
}

impl GetDashboardStatsUseCase {
    pub fn new(stats: Arc<dyn StatsRepository>, machines: Arc<dyn MachineRepository>) -> Self {
        Self { stats, machines }
    }

    pub async fn execute(&self) -> Result<DashboardStats, AppError> {
        self.execute_on(Utc::now().date_naive()).await
    }

    pub async fn execute_on(&self, today: NaiveDate) -> Result<DashboardStats, AppError> {
        let day_start = start_of_day(today);
        let day_end = day_start + Duration::days(1);

        let (total_patients, today_statuses, machines, staff, week) = try_join!(
            self.stats.count(Counted::Patients),
            self.stats.appointment_statuses(day_start, day_end),
            self.machines.status_counts(),
            self.staff_counts(),
            self.week_activity(today),
        )?;

        debug!("Dashboard computed for {}", today);

        Ok(DashboardStats {
            total_patients,
            today_appointments: AppointmentStatusCounts::from_statuses(today_statuses),
            machines,
            staff,
            week,
        })
    }

    async fn staff_counts(&self) -> DbResult<StaffCounts> {
        let (doctors, receptionists) = try_join!(
            self.stats.count(Counted::Doctors),
            self.stats.count(Counted::Receptionists),
        )?;
        Ok(StaffCounts { doctors, receptionists })
    }

    async fn week_activity(&self, today: NaiveDate) -> DbResult<WeekActivity> {
        let (patients, appointments) = try_join!(
            patients_per_day(self.stats.as_ref(), today),
            appointments_per_day(self.stats.as_ref(), today),
        )?;
        Ok(WeekActivity { patients, appointments })
    }
}

pub(crate) async fn patients_per_day(
    stats: &dyn StatsRepository,
    today: NaiveDate,
) -> DbResult<Vec<DayCount>> {
    let (monday, next_monday) = week_bounds(today);
    let stamps = stats.patient_registrations(start_of_day(monday), start_of_day(next_monday)).await?;
    Ok(bucket_by_day(monday, stamps))
}

pub(crate) async fn appointments_per_day(
    stats: &dyn StatsRepository,
    today: NaiveDate,
) -> DbResult<Vec<DayCount>> {
    let (monday, next_monday) = week_bounds(today);
    let stamps = stats.appointment_dates(start_of_day(monday), start_of_day(next_monday)).await?;
    Ok(bucket_by_day(monday, stamps))
}

/// Per-day breakdowns and all-time totals.
pub struct StatsService {
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    pub async fn patients_per_day(&self) -> Result<Vec<DayCount>, AppError> {
        Ok(patients_per_day(self.stats.as_ref(), Utc::now().date_naive()).await?)
    }

    pub async fn appointments_per_day(&self) -> Result<Vec<DayCount>, AppError> {
        Ok(appointments_per_day(self.stats.as_ref(), Utc::now().date_naive()).await?)
    }

    pub async fn summary(&self) -> Result<SummaryStats, AppError> {
        let (patients, doctors, receptionists, appointments, rooms, machines) = try_join!(
            self.stats.count(Counted::Patients),
            self.stats.count(Counted::Doctors),
            self.stats.count(Counted::Receptionists),
            self.stats.count(Counted::Appointments),
            self.stats.count(Counted::Rooms),
            self.stats.count(Counted::Machines),
        )?;
        Ok(SummaryStats { patients, doctors, receptionists, appointments, rooms, machines })
    }
}
