use crate::domains::car_agent::AgentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid transition for {agent}: {reason}")]
    InvalidTransition { agent: AgentId, reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Simulation is already running")]
    AlreadyRunning,

    #[error("Simulation is not running")]
    NotRunning,

    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Failure reported by a route planner. The agent treats every variant as a failed plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("No route found: {0}")]
    NoRouteFound(String),

    #[error("Planner transport error: {0}")]
    Transport(String),

    #[error("Invalid planner response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
