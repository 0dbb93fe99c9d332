pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use config::Config;

// Re-export common types
pub use common::{ApplicationError, ApplicationResult, DomainError, DomainResult, PlanningError};

// Re-export the core domain types
pub use domains::car_agent::{AgentController, AgentId, AgentPhase, AgentSnapshot, PlanApplication};
pub use domains::geometry::Position;
pub use domains::obstacles::ObstacleField;
pub use domains::path_planning::{PathPlanningDataSource, PlanRequest, Route, RoutePlanner};
pub use domains::simulation::{EventLog, SimulationCoordinator, SimulationEvent, UserAction};
