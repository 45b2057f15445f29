pub mod auth;
pub mod error;
pub mod response;

pub use error::{AppError, AuthError, DatabaseError, FieldError};
pub use response::ApiResponse;
