pub mod machine;
pub mod room;

pub use machine::MachineService;
pub use room::RoomService;
