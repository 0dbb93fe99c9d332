use crate::common::{AggregateRoot, DomainError, DomainResult, PlanningError};
use crate::domains::geometry::{interpolate, Position};
use crate::domains::obstacles::ObstacleField;
use crate::domains::path_planning::{PlanKind, PlanOutcome, PlanRequest, PlanTicket, Route};
use crate::domains::simulation::SimulationEvent;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgentId {
    #[serde(rename = "Car_A")]
    CarA,
    #[serde(rename = "Car_B")]
    CarB,
}

impl AgentId {
    pub const ALL: [AgentId; 2] = [AgentId::CarA, AgentId::CarB];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::CarA => "Car_A",
            AgentId::CarB => "Car_B",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DomainError::UnknownAgent(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentPhase {
    Unselected,
    HasStart,
    /// Destination set, initial plan outstanding.
    Planning,
    Moving,
    PlanFailed,
    /// Blocked mid-route, replacement plan outstanding.
    Rerouting,
    Halted,
    Arrived,
}

/// Whether a plan outcome was installed or ignored as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanApplication {
    Applied,
    Discarded,
}

/// Selection, route and motion state of one car.
///
/// `route`, `index` and `progress` are authoritative; the rendered position is derived from
/// them. `index` names the waypoint the car is heading for and `anchor` is the last position
/// it committed to (the previous waypoint, the start, or where a reroute began).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentController {
    id: AgentId,
    phase: AgentPhase,
    start: Option<Position>,
    destination: Option<Position>,
    route: Option<Route>,
    index: usize,
    progress: f64,
    anchor: Option<Position>,
    generation: u64,
    #[serde(skip)]
    uncommitted_events: Vec<SimulationEvent>,
}

impl AgentController {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            phase: AgentPhase::Unselected,
            start: None,
            destination: None,
            route: None,
            index: 0,
            progress: 0.0,
            anchor: None,
            generation: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn destination(&self) -> Option<Position> {
        self.destination
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_waiting_for_plan(&self) -> bool {
        matches!(self.phase, AgentPhase::Planning | AgentPhase::Rerouting)
    }

    pub fn set_start(&mut self, p: Position) -> DomainResult<()> {
        if !p.is_finite() {
            return Err(DomainError::InvalidInput {
                reason: format!("start position {} is not finite", p),
            });
        }
        if self.start.is_some() {
            return Err(self.invalid("start already set; reset the selection first"));
        }

        self.start = Some(p);
        self.anchor = Some(p);
        self.phase = AgentPhase::HasStart;
        self.add_event(SimulationEvent::StartSet {
            agent: self.id,
            position: p,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Sets the destination and issues the initial planning request against the current
    /// obstacle snapshot.
    pub fn set_destination(&mut self, p: Position, obstacles: &ObstacleField) -> DomainResult<PlanTicket> {
        if !p.is_finite() {
            return Err(DomainError::InvalidInput {
                reason: format!("destination {} is not finite", p),
            });
        }
        let start = match self.start {
            Some(start) => start,
            None => return Err(self.invalid("destination requires a start point")),
        };
        if self.destination.is_some() {
            return Err(self.invalid("destination already set; reset the selection first"));
        }

        self.destination = Some(p);
        self.add_event(SimulationEvent::DestinationSet {
            agent: self.id,
            position: p,
            timestamp: Utc::now(),
        });
        Ok(self.request_plan(start, p, PlanKind::Initial, obstacles))
    }

    /// Clears selection, route and motion. Outstanding plans become stale.
    pub fn reset_selection(&mut self) {
        if self.phase == AgentPhase::Unselected && self.start.is_none() {
            return;
        }

        self.phase = AgentPhase::Unselected;
        self.start = None;
        self.destination = None;
        self.route = None;
        self.index = 0;
        self.progress = 0.0;
        self.anchor = None;
        self.generation += 1;
        self.add_event(SimulationEvent::SelectionReset {
            agent: self.id,
            timestamp: Utc::now(),
        });
    }

    /// Moves the car one increment along its route.
    ///
    /// Returns a reroute ticket when the waypoint the car is heading for is blocked.
    pub fn advance(&mut self, obstacles: &ObstacleField, increment: f64) -> Option<PlanTicket> {
        if self.phase != AgentPhase::Moving {
            return None;
        }

        self.skip_reached_waypoints();
        if self.has_arrived() {
            self.arrive();
            return None;
        }
        if self.target_is_blocked(obstacles) {
            return self.begin_reroute(obstacles);
        }

        self.progress += increment;
        if self.progress >= 1.0 {
            self.commit_target();
            self.skip_reached_waypoints();
            if self.has_arrived() {
                self.arrive();
                return None;
            }
            if self.target_is_blocked(obstacles) {
                return self.begin_reroute(obstacles);
            }
        }
        None
    }

    /// Installs or rejects a planner outcome. Outcomes from an older generation, or arriving
    /// when no plan is awaited, are discarded without touching state.
    pub fn apply_plan(&mut self, outcome: PlanOutcome) -> PlanApplication {
        if outcome.generation != self.generation || !self.is_waiting_for_plan() {
            return PlanApplication::Discarded;
        }

        let result = outcome.result.and_then(|route| {
            let origin = self.anchor.unwrap_or(*route.origin());
            usable_route(route.anchored_at(origin), &outcome.obstacles)
        });
        match result {
            Ok(route) => {
                self.add_event(SimulationEvent::RouteAssigned {
                    agent: self.id,
                    kind: outcome.kind,
                    origin: *route.origin(),
                    waypoint_count: route.len(),
                    timestamp: Utc::now(),
                });
                self.route = Some(route);
                self.index = 0;
                self.progress = 0.0;
                self.phase = AgentPhase::Moving;
            }
            Err(e) => {
                self.add_event(SimulationEvent::NoRouteFound {
                    agent: self.id,
                    kind: outcome.kind,
                    reason: e.to_string(),
                    timestamp: Utc::now(),
                });
                if self.phase == AgentPhase::Rerouting {
                    self.phase = AgentPhase::Halted;
                    if let Some(position) = self.anchor {
                        self.add_event(SimulationEvent::AgentHalted {
                            agent: self.id,
                            position,
                            timestamp: Utc::now(),
                        });
                    }
                } else {
                    self.phase = AgentPhase::PlanFailed;
                }
            }
        }
        PlanApplication::Applied
    }

    /// Current rendered position: interpolated along the active segment, the last waypoint
    /// once arrived, or the held position when there is no route.
    pub fn current_position(&self) -> Option<Position> {
        match (&self.route, self.anchor) {
            (Some(route), Some(anchor)) if self.index < route.len() => {
                Some(interpolate(&anchor, &route.waypoints()[self.index], self.progress))
            }
            (Some(route), _) => Some(*route.last()),
            (None, anchor) => anchor,
        }
    }

    fn request_plan(
        &mut self,
        from: Position,
        destination: Position,
        kind: PlanKind,
        obstacles: &ObstacleField,
    ) -> PlanTicket {
        self.generation += 1;
        self.phase = match kind {
            PlanKind::Initial => AgentPhase::Planning,
            PlanKind::Reroute => AgentPhase::Rerouting,
        };

        let request = PlanRequest {
            start: from,
            destination,
            obstacles: obstacles.snapshot(),
        };
        self.add_event(SimulationEvent::PlanRequested {
            agent: self.id,
            generation: self.generation,
            kind,
            start: from,
            destination,
            obstacle_count: request.obstacles.len(),
            timestamp: Utc::now(),
        });
        PlanTicket::new(self.id, self.generation, kind, request, obstacles.radius_m())
    }

    fn begin_reroute(&mut self, obstacles: &ObstacleField) -> Option<PlanTicket> {
        let destination = self.destination?;
        let here = self.current_position()?;
        let blocked = self.route.as_ref()?.get(self.index).copied()?;

        self.add_event(SimulationEvent::RerouteTriggered {
            agent: self.id,
            blocked_waypoint: blocked,
            position: here,
            timestamp: Utc::now(),
        });

        self.route = None;
        self.index = 0;
        self.progress = 0.0;
        self.anchor = Some(here);
        Some(self.request_plan(here, destination, PlanKind::Reroute, obstacles))
    }

    /// Steps over waypoints that coincide with the committed position, so a route whose
    /// origin is the car's own position does not spend ticks on a zero-length segment.
    fn skip_reached_waypoints(&mut self) {
        if self.progress > 0.0 {
            return;
        }
        let (route, mut anchor) = match (&self.route, self.anchor) {
            (Some(route), Some(anchor)) => (route, anchor),
            _ => return,
        };
        while self.index < route.len() && route.waypoints()[self.index].approx_eq(&anchor) {
            anchor = route.waypoints()[self.index];
            self.index += 1;
        }
        self.anchor = Some(anchor);
    }

    fn commit_target(&mut self) {
        if let Some(target) = self.route.as_ref().and_then(|r| r.get(self.index)).copied() {
            self.anchor = Some(target);
        }
        self.index += 1;
        self.progress = 0.0;
    }

    fn target_is_blocked(&self, obstacles: &ObstacleField) -> bool {
        self.route
            .as_ref()
            .and_then(|r| r.get(self.index))
            .is_some_and(|target| obstacles.is_blocking(target))
    }

    fn has_arrived(&self) -> bool {
        self.route.as_ref().is_some_and(|r| self.index >= r.len())
    }

    fn arrive(&mut self) {
        self.phase = AgentPhase::Arrived;
        self.progress = 0.0;
        if let Some(position) = self.current_position() {
            self.add_event(SimulationEvent::AgentArrived {
                agent: self.id,
                position,
                timestamp: Utc::now(),
            });
        }
    }

    fn invalid(&self, reason: &str) -> DomainError {
        DomainError::InvalidTransition {
            agent: self.id,
            reason: reason.to_string(),
        }
    }
}

/// Rejects a route that leads through an obstacle the planner was told about. Waypoints at the
/// origin are exempt: the car is already there.
fn usable_route(route: Route, obstacles: &ObstacleField) -> Result<Route, PlanningError> {
    let origin = *route.origin();
    let blocked = route
        .waypoints()
        .iter()
        .skip(1)
        .filter(|w| !w.approx_eq(&origin))
        .find(|w| obstacles.is_blocking(w));
    match blocked {
        Some(w) => Err(PlanningError::NoRouteFound(format!("planned route passes an obstacle at {}", w))),
        None => Ok(route),
    }
}

impl AggregateRoot for AgentController {
    type Event = SimulationEvent;

    fn aggregate_id(&self) -> String {
        self.id.to_string()
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}
