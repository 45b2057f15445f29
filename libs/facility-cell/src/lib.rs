pub mod availability;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod router;
pub mod services;

pub use handlers::FacilityState;
pub use models::*;
pub use repository::{MachineRepository, RoomRepository, SupabaseMachineRepository, SupabaseRoomRepository};
pub use router::{machine_routes, room_routes};
pub use services::{MachineService, RoomService};
