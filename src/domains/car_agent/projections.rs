use super::aggregate::{AgentController, AgentId, AgentPhase};
use crate::domains::geometry::Position;
use serde::{Deserialize, Serialize};

/// Read model of one car for renderers. Never fed back into the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent: AgentId,
    pub phase: AgentPhase,
    pub position: Option<Position>,
    pub waypoint_index: usize,
    pub route_len: usize,
    pub progress: f64,
}

impl From<&AgentController> for AgentSnapshot {
    fn from(agent: &AgentController) -> Self {
        Self {
            agent: agent.id(),
            phase: agent.phase(),
            position: agent.current_position(),
            waypoint_index: agent.index(),
            route_len: agent.route().map_or(0, |r| r.len()),
            progress: agent.progress(),
        }
    }
}
