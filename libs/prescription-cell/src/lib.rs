pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::PrescriptionState;
pub use models::*;
pub use repository::{PrescriptionRepository, SupabasePrescriptionRepository};
pub use router::prescription_routes;
pub use services::PrescriptionService;
