pub mod scenario;
pub mod simulation_service;

pub use scenario::*;
pub use simulation_service::*;
