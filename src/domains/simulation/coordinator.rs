use super::event_log::EventLog;
use super::events::SimulationEvent;
use super::input::{InputMode, UserAction};
use super::registry::AgentRegistry;
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::car_agent::{AgentController, AgentId, AgentPhase, AgentSnapshot, PlanApplication};
use crate::domains::geometry::Position;
use crate::domains::obstacles::ObstacleField;
use crate::domains::path_planning::{PlanOutcome, PlanTicket};
use chrono::Utc;
use tracing::{debug, warn};

/// Owns the cars and the obstacle field and drives them on a single tick timeline.
///
/// Planning is never performed here: operations that need a route queue a [`PlanTicket`]
/// which the caller drains with [`take_plan_requests`](Self::take_plan_requests) and answers
/// later through [`complete_plan`](Self::complete_plan). A tick borrows the obstacle field
/// for its whole duration, so every car in one tick sees the same obstacles.
pub struct SimulationCoordinator {
    registry: AgentRegistry,
    obstacles: ObstacleField,
    log: EventLog,
    mode: InputMode,
    running: bool,
    tick_count: u64,
    step_increment: f64,
    outbox: Vec<PlanTicket>,
}

impl SimulationCoordinator {
    pub fn new(registry: AgentRegistry, obstacles: ObstacleField, log: EventLog, step_increment: f64) -> Self {
        Self {
            registry,
            obstacles,
            log,
            mode: InputMode::Idle,
            running: false,
            tick_count: 0,
            step_increment,
            outbox: Vec::new(),
        }
    }

    pub fn handle(&mut self, action: UserAction) -> DomainResult<()> {
        match action {
            UserAction::SelectAgent { agent } => {
                self.select_agent(agent);
                Ok(())
            }
            UserAction::ClickPoint { position } => self.click_point(position),
            UserAction::ResetSelection => {
                self.reset_selection();
                Ok(())
            }
            UserAction::StartSimulation => self.start_simulation(),
            UserAction::StopSimulation => self.stop_simulation(),
            UserAction::EnableObstacleMode => {
                self.enable_obstacle_mode();
                Ok(())
            }
        }
    }

    pub fn select_agent(&mut self, id: AgentId) {
        self.registry.ensure(id);
        self.mode = InputMode::Selecting(id);
        self.log.append(SimulationEvent::AgentSelected {
            agent: id,
            timestamp: Utc::now(),
        });
    }

    /// Interprets a map click according to the current input mode.
    pub fn click_point(&mut self, p: Position) -> DomainResult<()> {
        let id = match self.mode {
            InputMode::Idle => {
                return Err(DomainError::InvalidInput {
                    reason: "Please select a car first!".to_string(),
                })
            }
            InputMode::PlacingObstacles => {
                self.place_obstacle(p);
                return Ok(());
            }
            InputMode::Selecting(id) => id,
        };

        let agent = self.registry.ensure(id);
        let result = if agent.start().is_none() {
            agent.set_start(p)
        } else {
            match agent.set_destination(p, &self.obstacles) {
                Ok(ticket) => {
                    self.outbox.push(ticket);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        };
        self.commit_events(id);

        if let Err(e) = &result {
            warn!("Rejected click at {}: {}", p, e);
        }
        result
    }

    /// Clears the selected car's selection and leaves selection mode. A no-op when nothing
    /// is selected.
    pub fn reset_selection(&mut self) {
        if let InputMode::Selecting(id) = self.mode {
            self.reset_agent(id);
        }
        self.mode = InputMode::Idle;
    }

    pub fn reset_agent(&mut self, id: AgentId) {
        if let Some(agent) = self.registry.get_mut(id) {
            agent.reset_selection();
            self.commit_events(id);
        }
    }

    pub fn enable_obstacle_mode(&mut self) {
        self.mode = InputMode::PlacingObstacles;
        self.log.append(SimulationEvent::ObstacleModeEnabled { timestamp: Utc::now() });
    }

    /// Adds an obstacle. Cars notice it the next time they test their target waypoint.
    pub fn place_obstacle(&mut self, p: Position) {
        self.obstacles.add(p);
        self.log.append(SimulationEvent::ObstaclePlaced {
            position: p,
            total: self.obstacles.len(),
            timestamp: Utc::now(),
        });
    }

    pub fn start_simulation(&mut self) -> DomainResult<()> {
        if self.running {
            return Err(DomainError::AlreadyRunning);
        }
        self.running = true;
        self.log.append(SimulationEvent::SimulationStarted { timestamp: Utc::now() });
        Ok(())
    }

    pub fn stop_simulation(&mut self) -> DomainResult<()> {
        if !self.running {
            return Err(DomainError::NotRunning);
        }
        self.running = false;
        self.log.append(SimulationEvent::SimulationStopped { timestamp: Utc::now() });
        Ok(())
    }

    /// Advances every moving car by one step. Returns how many cars were advanced.
    pub fn tick(&mut self) -> usize {
        if !self.running {
            return 0;
        }
        self.tick_count += 1;

        let mut advanced = 0;
        for agent in self.registry.iter_mut() {
            if agent.phase() != AgentPhase::Moving {
                continue;
            }
            advanced += 1;
            if let Some(ticket) = agent.advance(&self.obstacles, self.step_increment) {
                self.outbox.push(ticket);
            }
            for event in agent.take_uncommitted_events() {
                self.log.append(event);
            }
        }
        advanced
    }

    /// Applies a planner answer; answers for a superseded request are dropped.
    pub fn complete_plan(&mut self, outcome: PlanOutcome) -> PlanApplication {
        let id = outcome.agent;
        let request_id = outcome.request_id;
        let generation = outcome.generation;

        let applied = match self.registry.get_mut(id) {
            Some(agent) => agent.apply_plan(outcome),
            None => PlanApplication::Discarded,
        };
        match applied {
            PlanApplication::Applied => self.commit_events(id),
            PlanApplication::Discarded => {
                debug!(agent = %id, generation, request_id = %request_id, "discarding stale plan outcome")
            }
        }
        applied
    }

    pub fn take_plan_requests(&mut self) -> Vec<PlanTicket> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_plan_requests(&self) -> &[PlanTicket] {
        &self.outbox
    }

    /// True when nothing is left to do: no queued or awaited plans, and no car still moving
    /// while the simulation runs.
    pub fn is_settled(&self) -> bool {
        self.outbox.is_empty()
            && self.registry.iter().all(|a| {
                !a.is_waiting_for_plan() && !(self.running && a.phase() == AgentPhase::Moving)
            })
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.registry.iter().map(AgentSnapshot::from).collect()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentController> {
        self.registry.get(id)
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn commit_events(&mut self, id: AgentId) {
        if let Some(agent) = self.registry.get_mut(id) {
            for event in agent.take_uncommitted_events() {
                self.log.append(event);
            }
        }
    }
}
