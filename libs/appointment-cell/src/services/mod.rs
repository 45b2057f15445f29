pub mod add_appointment;
pub mod appointment;
pub mod appointment_completed;
pub mod lifecycle;

pub use add_appointment::AddAppointmentUseCase;
pub use appointment::AppointmentService;
pub use appointment_completed::{AppointmentCompletedUseCase, CompletionOutcome};
pub use lifecycle::AppointmentLifecycleService;
