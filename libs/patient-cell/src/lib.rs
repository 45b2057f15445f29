pub mod models;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod services;

pub use models::*;
pub use handlers::PatientState;
pub use repository::{PatientRepository, SupabasePatientRepository};
pub use router::patient_routes;
pub use services::PatientService;
