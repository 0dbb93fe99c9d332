use crate::adapters::outbound::{
    FilesystemDataSource, GraphRoutePlanner, HttpRoutePlanner, StraightLinePlanner,
};
use crate::common::{ApplicationResult, DomainResult};
use crate::config::{Config, PlannerKind};
use crate::domains::car_agent::{AgentSnapshot, PlanApplication};
use crate::domains::logger::DynLogger;
use crate::domains::obstacles::ObstacleField;
use crate::domains::path_planning::{DynRoutePlanner, PlanDispatchActor, PlanOutcome};
use crate::domains::simulation::{AgentRegistry, EventLog, SimulationCoordinator, UserAction};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

/// Drives a [`SimulationCoordinator`] in real time: ticks on an interval, hands planning
/// tickets to the planner on separate tasks and applies their outcomes as they arrive.
pub struct SimulationService {
    coordinator: SimulationCoordinator,
    dispatcher: PlanDispatchActor,
    outcomes: mpsc::Receiver<PlanOutcome>,
    positions: watch::Sender<Vec<AgentSnapshot>>,
    tick_interval: Duration,
}

impl SimulationService {
    pub fn new(coordinator: SimulationCoordinator, planner: DynRoutePlanner, tick_interval: Duration) -> Self {
        let (outcome_sender, outcomes) = mpsc::channel(100);
        let (positions, _) = watch::channel(coordinator.snapshots());
        Self {
            coordinator,
            dispatcher: PlanDispatchActor::new(planner, outcome_sender),
            outcomes,
            positions,
            tick_interval,
        }
    }

    /// Builds the coordinator and planner described by `config`.
    pub fn from_config(config: &Config, logger: DynLogger) -> ApplicationResult<Self> {
        let sim = &config.simulation;
        let coordinator = SimulationCoordinator::new(
            AgentRegistry::new(),
            ObstacleField::new(sim.detection_radius_m),
            EventLog::with_logger(logger),
            sim.step_increment,
        );
        let planner = build_planner(config)?;
        Ok(Self::new(coordinator, planner, Duration::from_millis(sim.tick_interval_ms)))
    }

    pub fn coordinator(&self) -> &SimulationCoordinator {
        &self.coordinator
    }

    pub fn into_coordinator(self) -> SimulationCoordinator {
        self.coordinator
    }

    /// Position stream for renderers, refreshed after every tick and applied plan.
    pub fn subscribe_positions(&self) -> watch::Receiver<Vec<AgentSnapshot>> {
        self.positions.subscribe()
    }

    pub fn dispatch(&mut self, action: UserAction) -> DomainResult<()> {
        let result = self.coordinator.handle(action);
        self.flush_plan_requests();
        result
    }

    pub fn tick(&mut self) -> usize {
        let advanced = self.coordinator.tick();
        self.flush_plan_requests();
        self.publish_positions();
        advanced
    }

    pub fn apply_outcome(&mut self, outcome: PlanOutcome) -> PlanApplication {
        let applied = self.coordinator.complete_plan(outcome);
        self.publish_positions();
        applied
    }

    /// Applies every outcome that has already arrived, without waiting.
    pub fn apply_ready_outcomes(&mut self) -> usize {
        let mut count = 0;
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.apply_outcome(outcome);
            count += 1;
        }
        count
    }

    /// Waits up to `timeout` for the next outcome and applies it.
    pub async fn apply_next_outcome(&mut self, timeout: Duration) -> Option<PlanApplication> {
        match tokio::time::timeout(timeout, self.outcomes.recv()).await {
            Ok(Some(outcome)) => Some(self.apply_outcome(outcome)),
            _ => None,
        }
    }

    /// Runs until `actions` is closed and the simulation has settled.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> SimulationCoordinator {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut actions_open = true;

        info!("Simulation loop running (tick every {:?})", self.tick_interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                    if !actions_open && self.coordinator.is_settled() {
                        break;
                    }
                }
                Some(outcome) = self.outcomes.recv() => {
                    self.apply_outcome(outcome);
                }
                action = actions.recv(), if actions_open => match action {
                    Some(action) => {
                        if let Err(e) = self.dispatch(action) {
                            warn!("Action rejected: {}", e);
                        }
                    }
                    None => actions_open = false,
                },
            }
        }
        info!("Simulation settled after {} ticks", self.coordinator.tick_count());
        self.coordinator
    }

    fn flush_plan_requests(&mut self) {
        for ticket in self.coordinator.take_plan_requests() {
            self.dispatcher.dispatch(ticket);
        }
    }

    fn publish_positions(&self) {
        self.positions.send_replace(self.coordinator.snapshots());
    }
}

pub fn build_planner(config: &Config) -> ApplicationResult<DynRoutePlanner> {
    let planner = &config.planner;
    let radius_m = config.simulation.detection_radius_m;
    let built: DynRoutePlanner = match planner.kind {
        PlannerKind::Straight => Arc::new(
            StraightLinePlanner::new(radius_m, planner.segment_m)
                .with_latency(Duration::from_millis(planner.latency_ms), planner.jitter_ms),
        ),
        PlannerKind::Http => Arc::new(HttpRoutePlanner::new(
            planner.endpoint.clone(),
            Duration::from_millis(planner.timeout_ms),
        )?),
        PlannerKind::Graph => {
            let data = FilesystemDataSource::new(planner.data_dir.as_ref().map(PathBuf::from));
            let network = data.load_or_build_network(&planner.network)?;
            info!(
                "Loaded road network {} ({} nodes, {} edges)",
                planner.network,
                network.node_count(),
                network.edge_count()
            );
            Arc::new(GraphRoutePlanner::new(Arc::new(network), radius_m))
        }
    };
    Ok(built)
}
