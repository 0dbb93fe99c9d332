use crate::common::PlanningError;
use crate::domains::car_agent::AgentId;
use crate::domains::geometry::Position;
use crate::domains::obstacles::ObstacleField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a planning request. Serializes to the planning service's wire shape:
/// `{"start": {"lat", "lng"}, "destination": {...}, "obstacles": [{...}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start: Position,
    pub destination: Position,
    #[serde(default)]
    pub obstacles: Vec<Position>,
}

/// Ordered, non-empty list of waypoints. Never mutated once built.
/// Serializes as a bare waypoint array; deserializing goes through [`Route::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct Route {
    waypoints: Vec<Position>,
}

impl Route {
    pub fn new(waypoints: Vec<Position>) -> Result<Self, PlanningError> {
        if waypoints.is_empty() {
            return Err(PlanningError::NoRouteFound("planner returned an empty route".to_string()));
        }
        if waypoints.iter().any(|w| !w.is_finite()) {
            return Err(PlanningError::InvalidResponse("route contains a non-finite waypoint".to_string()));
        }
        Ok(Self { waypoints })
    }

    /// Returns a route whose first waypoint is `origin`, prepending it when the planner
    /// started from somewhere else (e.g. the nearest road node).
    pub fn anchored_at(self, origin: Position) -> Self {
        if self.waypoints[0].approx_eq(&origin) {
            return self;
        }
        let mut waypoints = Vec::with_capacity(self.waypoints.len() + 1);
        waypoints.push(origin);
        waypoints.extend(self.waypoints);
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.waypoints.get(index)
    }

    pub fn origin(&self) -> &Position {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Position {
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

impl TryFrom<Vec<Position>> for Route {
    type Error = PlanningError;

    fn try_from(waypoints: Vec<Position>) -> Result<Self, Self::Error> {
        Route::new(waypoints)
    }
}

impl From<Route> for Vec<Position> {
    fn from(route: Route) -> Self {
        route.waypoints
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanKind {
    Initial,
    Reroute,
}

/// A planning request raised by one agent, tagged with the agent's generation at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTicket {
    pub request_id: Uuid,
    pub agent: AgentId,
    pub generation: u64,
    pub kind: PlanKind,
    pub request: PlanRequest,
    /// Radius the request's obstacles block within.
    pub detection_radius_m: f64,
    pub created_at: DateTime<Utc>,
}

impl PlanTicket {
    pub fn new(agent: AgentId, generation: u64, kind: PlanKind, request: PlanRequest, detection_radius_m: f64) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            agent,
            generation,
            kind,
            request,
            detection_radius_m,
            created_at: Utc::now(),
        }
    }

    pub fn resolve(&self, result: Result<Route, PlanningError>) -> PlanOutcome {
        PlanOutcome {
            request_id: self.request_id,
            agent: self.agent,
            generation: self.generation,
            kind: self.kind,
            obstacles: ObstacleField::with_obstacles(self.detection_radius_m, self.request.obstacles.iter().copied()),
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub request_id: Uuid,
    pub agent: AgentId,
    pub generation: u64,
    pub kind: PlanKind,
    /// Obstacles the request was planned against.
    pub obstacles: ObstacleField,
    pub result: Result<Route, PlanningError>,
}
