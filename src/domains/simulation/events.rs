use crate::common::DomainEvent;
use crate::domains::car_agent::AgentId;
use crate::domains::geometry::Position;
use crate::domains::path_planning::PlanKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationEvent {
    AgentSelected {
        agent: AgentId,
        timestamp: DateTime<Utc>,
    },
    StartSet {
        agent: AgentId,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    DestinationSet {
        agent: AgentId,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    PlanRequested {
        agent: AgentId,
        generation: u64,
        kind: PlanKind,
        start: Position,
        destination: Position,
        obstacle_count: usize,
        timestamp: DateTime<Utc>,
    },
    RouteAssigned {
        agent: AgentId,
        kind: PlanKind,
        origin: Position,
        waypoint_count: usize,
        timestamp: DateTime<Utc>,
    },
    NoRouteFound {
        agent: AgentId,
        kind: PlanKind,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    RerouteTriggered {
        agent: AgentId,
        blocked_waypoint: Position,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    AgentHalted {
        agent: AgentId,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    AgentArrived {
        agent: AgentId,
        position: Position,
        timestamp: DateTime<Utc>,
    },
    SelectionReset {
        agent: AgentId,
        timestamp: DateTime<Utc>,
    },
    ObstacleModeEnabled {
        timestamp: DateTime<Utc>,
    },
    ObstaclePlaced {
        position: Position,
        total: usize,
        timestamp: DateTime<Utc>,
    },
    SimulationStarted {
        timestamp: DateTime<Utc>,
    },
    SimulationStopped {
        timestamp: DateTime<Utc>,
    },
}

impl SimulationEvent {
    pub fn agent(&self) -> Option<AgentId> {
        match self {
            SimulationEvent::AgentSelected { agent, .. }
            | SimulationEvent::StartSet { agent, .. }
            | SimulationEvent::DestinationSet { agent, .. }
            | SimulationEvent::PlanRequested { agent, .. }
            | SimulationEvent::RouteAssigned { agent, .. }
            | SimulationEvent::NoRouteFound { agent, .. }
            | SimulationEvent::RerouteTriggered { agent, .. }
            | SimulationEvent::AgentHalted { agent, .. }
            | SimulationEvent::AgentArrived { agent, .. }
            | SimulationEvent::SelectionReset { agent, .. } => Some(*agent),
            SimulationEvent::ObstacleModeEnabled { .. }
            | SimulationEvent::ObstaclePlaced { .. }
            | SimulationEvent::SimulationStarted { .. }
            | SimulationEvent::SimulationStopped { .. } => None,
        }
    }
}

impl DomainEvent for SimulationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SimulationEvent::AgentSelected { .. } => "AgentSelected",
            SimulationEvent::StartSet { .. } => "StartSet",
            SimulationEvent::DestinationSet { .. } => "DestinationSet",
            SimulationEvent::PlanRequested { .. } => "PlanRequested",
            SimulationEvent::RouteAssigned { .. } => "RouteAssigned",
            SimulationEvent::NoRouteFound { .. } => "NoRouteFound",
            SimulationEvent::RerouteTriggered { .. } => "RerouteTriggered",
            SimulationEvent::AgentHalted { .. } => "AgentHalted",
            SimulationEvent::AgentArrived { .. } => "AgentArrived",
            SimulationEvent::SelectionReset { .. } => "SelectionReset",
            SimulationEvent::ObstacleModeEnabled { .. } => "ObstacleModeEnabled",
            SimulationEvent::ObstaclePlaced { .. } => "ObstaclePlaced",
            SimulationEvent::SimulationStarted { .. } => "SimulationStarted",
            SimulationEvent::SimulationStopped { .. } => "SimulationStopped",
        }
    }

    fn aggregate_id(&self) -> String {
        match self.agent() {
            Some(agent) => agent.to_string(),
            None => "simulation".to_string(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SimulationEvent::AgentSelected { timestamp, .. }
            | SimulationEvent::StartSet { timestamp, .. }
            | SimulationEvent::DestinationSet { timestamp, .. }
            | SimulationEvent::PlanRequested { timestamp, .. }
            | SimulationEvent::RouteAssigned { timestamp, .. }
            | SimulationEvent::NoRouteFound { timestamp, .. }
            | SimulationEvent::RerouteTriggered { timestamp, .. }
            | SimulationEvent::AgentHalted { timestamp, .. }
            | SimulationEvent::AgentArrived { timestamp, .. }
            | SimulationEvent::SelectionReset { timestamp, .. }
            | SimulationEvent::ObstacleModeEnabled { timestamp }
            | SimulationEvent::ObstaclePlaced { timestamp, .. }
            | SimulationEvent::SimulationStarted { timestamp }
            | SimulationEvent::SimulationStopped { timestamp } => *timestamp,
        }
    }
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationEvent::AgentSelected { agent, .. } => {
                write!(f, "Selected {}. Click on the map to set start and destination.", agent)
            }
            SimulationEvent::StartSet { agent, position, .. } => {
                write!(f, "{} Start Point: {}", agent, position)
            }
            SimulationEvent::DestinationSet { agent, position, .. } => {
                write!(f, "{} Destination: {}", agent, position)
            }
            SimulationEvent::PlanRequested {
                agent,
                generation,
                kind,
                start,
                destination,
                obstacle_count,
                ..
            } => write!(
                f,
                "{} requested {:?} route #{} from {} to {} avoiding {} obstacle(s)",
                agent, kind, generation, start, destination, obstacle_count
            ),
            SimulationEvent::RouteAssigned {
                agent,
                kind,
                origin,
                waypoint_count,
                ..
            } => write!(
                f,
                "{} route set ({:?}): {} waypoints from {}",
                agent, kind, waypoint_count, origin
            ),
            SimulationEvent::NoRouteFound { agent, reason, .. } => {
                write!(f, "No route found for {}: {}", agent, reason)
            }
            SimulationEvent::RerouteTriggered {
                agent,
                blocked_waypoint,
                position,
                ..
            } => write!(
                f,
                "{} blocked at waypoint {}, rerouting from {}",
                agent, blocked_waypoint, position
            ),
            SimulationEvent::AgentHalted { agent, position, .. } => {
                write!(f, "{} halted at {}", agent, position)
            }
            SimulationEvent::AgentArrived { agent, position, .. } => {
                write!(f, "{} arrived at {}", agent, position)
            }
            SimulationEvent::SelectionReset { agent, .. } => {
                write!(f, "{} selection reset. Choose a car again.", agent)
            }
            SimulationEvent::ObstacleModeEnabled { .. } => {
                write!(f, "Obstacle mode enabled. Clicks now place obstacles.")
            }
            SimulationEvent::ObstaclePlaced { position, total, .. } => {
                write!(f, "Obstacle placed at {} ({} total)", position, total)
            }
            SimulationEvent::SimulationStarted { .. } => write!(f, "Simulation started"),
            SimulationEvent::SimulationStopped { .. } => write!(f, "Simulation stopped"),
        }
    }
}
