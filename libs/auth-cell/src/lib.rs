pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::AuthState;
pub use models::*;
pub use repository::{NewUserProfile, SupabaseUserRepository, UserRepository};
pub use router::{auth_routes, user_routes};
pub use services::{AuthService, UserService};
