pub mod receptionist;

pub use receptionist::ReceptionistService;
