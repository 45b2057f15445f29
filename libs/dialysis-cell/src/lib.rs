pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::DialysisState;
pub use models::*;
pub use repository::{
    DialysisPatientRepository, DialysisProtocolRepository, DialysisSessionRepository, SupabaseDialysisRepository,
};
pub use router::dialysis_routes;
pub use services::{CreateSessionUseCase, DialysisService};
