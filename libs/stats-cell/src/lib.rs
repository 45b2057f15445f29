pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;
pub mod week;

pub use handlers::StatsState;
pub use models::*;
pub use repository::{Counted, StatsRepository, SupabaseStatsRepository};
pub use router::stats_routes;
pub use services::{GetDashboardStatsUseCase, StatsService};
