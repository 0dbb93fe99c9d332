use async_trait::async_trait;
use reroute_sim::adapters::outbound::StraightLinePlanner;
use reroute_sim::application::SimulationService;
use reroute_sim::common::PlanningError;
use reroute_sim::domains::car_agent::{AgentId, AgentPhase, PlanApplication};
use reroute_sim::domains::geometry::Position;
use reroute_sim::domains::obstacles::ObstacleField;
use reroute_sim::domains::path_planning::{PlanRequest, Route, RoutePlanner};
use reroute_sim::domains::simulation::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const RADIUS_M: f64 = 25.0;

fn p(lat: f64, lng: f64) -> Position {
    Position::new(lat, lng)
}

fn service(planner: Arc<dyn RoutePlanner>, step_increment: f64) -> SimulationService {
    let coordinator = SimulationCoordinator::new(
        AgentRegistry::new(),
        ObstacleField::new(RADIUS_M),
        EventLog::new(),
        step_increment,
    );
    SimulationService::new(coordinator, planner, Duration::from_millis(5))
}

/// Never answers requests heading for `stalled_destination`; plans straight lines otherwise.
struct StallingPlanner {
    stalled_destination: Position,
}

#[async_trait]
impl RoutePlanner for StallingPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        if request.destination == self.stalled_destination {
            std::future::pending::<()>().await;
        }
        Route::new(vec![request.start, request.destination])
    }
}

/// Always bends north through the midpoint; ignores obstacles.
struct DetourPlanner;

#[async_trait]
impl RoutePlanner for DetourPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        let mid = Position::new(
            request.start.lat + 0.001,
            (request.start.lng + request.destination.lng) / 2.0,
        );
        Route::new(vec![request.start, mid, request.destination])
    }
}

fn select_and_route(service: &mut SimulationService, id: AgentId, start: Position, destination: Position) {
    service.dispatch(UserAction::SelectAgent { agent: id }).unwrap();
    service.dispatch(UserAction::ClickPoint { position: start }).unwrap();
    service.dispatch(UserAction::ClickPoint { position: destination }).unwrap();
}

#[tokio::test]
async fn test_service_plans_and_drives_car_to_destination() {
    let planner = Arc::new(StraightLinePlanner::new(RADIUS_M, 50.0));
    let mut service = service(planner, 0.5);

    select_and_route(&mut service, AgentId::CarA, p(0.0, 0.0), p(0.0, 0.002));
    let applied = service.apply_next_outcome(Duration::from_secs(2)).await;
    assert_eq!(applied, Some(PlanApplication::Applied));
    assert_eq!(service.coordinator().agent(AgentId::CarA).unwrap().phase(), AgentPhase::Moving);

    service.dispatch(UserAction::StartSimulation).unwrap();
    for _ in 0..50 {
        service.tick();
    }

    let agent = service.coordinator().agent(AgentId::CarA).unwrap();
    assert_eq!(agent.phase(), AgentPhase::Arrived);
    assert!(agent.current_position().unwrap().approx_eq(&p(0.0, 0.002)));
}

#[tokio::test]
async fn test_blocked_destination_reports_no_route() {
    let planner = Arc::new(StraightLinePlanner::new(RADIUS_M, 50.0));
    let mut service = service(planner, 0.5);
    service.dispatch(UserAction::EnableObstacleMode).unwrap();
    service.dispatch(UserAction::ClickPoint { position: p(0.0, 0.002) }).unwrap();

    select_and_route(&mut service, AgentId::CarA, p(0.0, 0.0), p(0.0, 0.002));
    service.apply_next_outcome(Duration::from_secs(2)).await;

    let coordinator = service.coordinator();
    assert_eq!(coordinator.agent(AgentId::CarA).unwrap().phase(), AgentPhase::PlanFailed);
    assert_eq!(coordinator.event_log().of_type("NoRouteFound").count(), 1);
}

#[tokio::test]
async fn test_straight_line_reroute_reaches_destination() {
    let planner = Arc::new(StraightLinePlanner::new(RADIUS_M, 50.0));
    let mut service = service(planner, 0.5);
    select_and_route(&mut service, AgentId::CarA, p(0.0, 0.0), p(0.0, 0.004));
    service.apply_next_outcome(Duration::from_secs(2)).await;
    service.dispatch(UserAction::StartSimulation).unwrap();

    let target = service
        .coordinator()
        .agent(AgentId::CarA)
        .unwrap()
        .route()
        .unwrap()
        .waypoints()[4];
    service.dispatch(UserAction::EnableObstacleMode).unwrap();
    service.dispatch(UserAction::ClickPoint { position: target }).unwrap();

    for _ in 0..200 {
        service.tick();
        service.apply_next_outcome(Duration::from_millis(1)).await;
        if service.coordinator().agent(AgentId::CarA).unwrap().phase() == AgentPhase::Arrived {
            break;
        }
    }

    let coordinator = service.coordinator();
    assert_eq!(coordinator.agent(AgentId::CarA).unwrap().phase(), AgentPhase::Arrived);
    assert_eq!(coordinator.event_log().of_type("RerouteTriggered").count(), 1);
    assert!(coordinator
        .agent(AgentId::CarA)
        .unwrap()
        .current_position()
        .unwrap()
        .approx_eq(&p(0.0, 0.004)));
}

#[tokio::test]
async fn test_outstanding_plan_does_not_block_other_car() {
    let stalled = p(0.0, 0.002);
    let planner = Arc::new(StallingPlanner {
        stalled_destination: stalled,
    });
    let mut service = service(planner, 0.25);

    select_and_route(&mut service, AgentId::CarA, p(0.0, 0.0), stalled);
    select_and_route(&mut service, AgentId::CarB, p(1.0, 0.0), p(1.0, 0.002));
    assert_eq!(service.apply_next_outcome(Duration::from_secs(2)).await, Some(PlanApplication::Applied));
    service.dispatch(UserAction::StartSimulation).unwrap();

    let positions = service.subscribe_positions();
    for _ in 0..3 {
        assert_eq!(service.tick(), 1);
    }

    let snapshots = positions.borrow().clone();
    let car_a = snapshots.iter().find(|s| s.agent == AgentId::CarA).unwrap();
    let car_b = snapshots.iter().find(|s| s.agent == AgentId::CarB).unwrap();
    assert_eq!(car_a.phase, AgentPhase::Planning);
    assert_eq!(car_b.phase, AgentPhase::Moving);
    assert!(car_b.position.unwrap().lng > 0.0);
    assert_eq!(service.apply_ready_outcomes(), 0);
}

#[tokio::test]
async fn test_run_settles_after_actions_close() {
    let planner = Arc::new(StraightLinePlanner::new(RADIUS_M, 50.0).with_latency(Duration::from_millis(5), 5));
    let service = service(planner, 0.5);
    let (tx, rx) = mpsc::channel(16);

    let actions = vec![
        UserAction::SelectAgent { agent: AgentId::CarA },
        UserAction::ClickPoint { position: p(0.0, 0.0) },
        UserAction::ClickPoint { position: p(0.0, 0.001) },
        UserAction::SelectAgent { agent: AgentId::CarB },
        UserAction::ClickPoint { position: p(1.0, 0.0) },
        UserAction::ClickPoint { position: p(1.0, 0.001) },
        UserAction::StartSimulation,
    ];
    for action in actions {
        tx.send(action).await.unwrap();
    }
    drop(tx);

    let coordinator = tokio::time::timeout(Duration::from_secs(10), service.run(rx))
        .await
        .expect("simulation should settle");

    assert!(coordinator.is_settled());
    for snapshot in coordinator.snapshots() {
        assert_eq!(snapshot.phase, AgentPhase::Arrived);
    }
}

#[tokio::test]
async fn test_reroute_is_planned_from_current_position() {
    let mut service = service(Arc::new(DetourPlanner), 0.25);
    select_and_route(&mut service, AgentId::CarA, p(0.0, 0.0), p(0.0, 0.004));
    service.apply_next_outcome(Duration::from_secs(2)).await;
    service.dispatch(UserAction::StartSimulation).unwrap();
    service.tick();

    service.dispatch(UserAction::EnableObstacleMode).unwrap();
    service.dispatch(UserAction::ClickPoint { position: p(0.001, 0.002) }).unwrap();
    service.tick();

    let agent = service.coordinator().agent(AgentId::CarA).unwrap();
    assert_eq!(agent.phase(), AgentPhase::Rerouting);
    let held = agent.current_position().unwrap();
    assert!(held.lng > 0.0);

    assert_eq!(service.apply_next_outcome(Duration::from_secs(2)).await, Some(PlanApplication::Applied));
    let agent = service.coordinator().agent(AgentId::CarA).unwrap();
    assert_eq!(agent.phase(), AgentPhase::Moving);
    assert!(agent.route().unwrap().origin().approx_eq(&held));
    assert_eq!(service.coordinator().event_log().of_type("RouteAssigned").count(), 2);
}
