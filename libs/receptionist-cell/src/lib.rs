pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::ReceptionistState;
pub use models::*;
pub use repository::{ReceptionistRepository, SupabaseReceptionistRepository};
pub use router::receptionist_routes;
pub use services::ReceptionistService;
