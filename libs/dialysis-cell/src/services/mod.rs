pub mod create_session;
pub mod dialysis;

pub use create_session::CreateSessionUseCase;
pub use dialysis::DialysisService;
