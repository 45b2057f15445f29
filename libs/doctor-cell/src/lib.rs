pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::DoctorState;
pub use models::*;
pub use repository::{DoctorRepository, SupabaseDoctorRepository};
pub use router::doctor_routes;
pub use services::DoctorService;
