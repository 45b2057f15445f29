pub mod dashboard;

pub use dashboard::{GetDashboardStatsUseCase, StatsService};
