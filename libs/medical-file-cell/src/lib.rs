pub mod handlers;
pub mod merge;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::MedicalFileState;
pub use merge::shallow_merge;
pub use models::*;
pub use repository::{MedicalFileRepository, SupabaseMedicalFileRepository};
pub use router::medical_file_routes;
pub use services::MedicalFileService;
