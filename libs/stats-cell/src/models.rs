use serde::{Deserialize, Serialize};

use appointment_cell::AppointmentStatus;
use facility_cell::MachineStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStatusCounts {
    pub total: i64,
    pub scheduled: i64,
    pub completed: i64,
    pub canceled: i64,
    pub no_show: i64,
}

impl AppointmentStatusCounts {
    pub fn from_statuses<I: IntoIterator<Item = AppointmentStatus>>(statuses: I) -> Self {
        statuses.into_iter().fold(Self::default(), |mut counts, status| {
            counts.total += 1;
            match status {
                AppointmentStatus::Scheduled => counts.scheduled += 1,
                AppointmentStatus::Completed => counts.completed += 1,
                AppointmentStatus::Canceled => counts.canceled += 1,
                AppointmentStatus::NoShow => counts.no_show += 1,
            }
            counts
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffCounts {
    pub doctors: i64,
    pub receptionists: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekActivity {
    pub patients: Vec<DayCount>,
    pub appointments: Vec<DayCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: i64,
    pub today_appointments: AppointmentStatusCounts,
    pub machines: MachineStats,
    pub staff: StaffCounts,
    pub week: WeekActivity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub patients: i64,
    pub doctors: i64,
    pub receptionists: i64,
    pub appointments: i64,
    pub rooms: i64,
    pub machines: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_status_tally() {
        let counts = AppointmentStatusCounts::from_statuses(vec![
            AppointmentStatus::Scheduled,
            AppointmentStatus::Scheduled,
            AppointmentStatus::NoShow,
        ]);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.scheduled, 2);
        assert_eq!(counts.no_show, 1);
        assert_eq!(serde_json::to_value(&counts).unwrap()["noShow"], 1);
    }
}
