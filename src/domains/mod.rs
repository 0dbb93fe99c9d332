pub mod car_agent;
pub mod geometry;
pub mod logger;
pub mod obstacles;
pub mod path_planning;
pub mod simulation;

pub use car_agent::*;
pub use geometry::*;
pub use logger::*;
pub use obstacles::*;
pub use path_planning::*;
pub use simulation::*;
