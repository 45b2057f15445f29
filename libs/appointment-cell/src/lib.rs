pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::AppointmentState;
pub use models::*;
pub use repository::{
    AppointmentFilter, AppointmentHistoryRepository, AppointmentRepository,
    SupabaseAppointmentHistoryRepository, SupabaseAppointmentRepository,
};
pub use router::appointment_routes;
pub use services::{
    AddAppointmentUseCase, AppointmentCompletedUseCase, AppointmentLifecycleService, AppointmentService,
};
