use crate::domains::car_agent::AgentId;
use crate::domains::geometry::Position;
use serde::{Deserialize, Serialize};

/// How the next map click is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Idle,
    /// Clicks set the selected car's start, then its destination.
    Selecting(AgentId),
    PlacingObstacles,
}

/// The externally triggerable operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserAction {
    SelectAgent { agent: AgentId },
    ClickPoint { position: Position },
    ResetSelection,
    StartSimulation,
    StopSimulation,
    EnableObstacleMode,
}
