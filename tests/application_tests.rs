use reroute_sim::adapters::outbound::init_noop_logger;
use reroute_sim::application::{build_planner, Scenario, ScenarioStep, SimulationService};
use reroute_sim::config::{Config, PlannerKind};
use reroute_sim::domains::car_agent::AgentId;
use reroute_sim::domains::simulation::UserAction;
use std::fs;
use tempfile::TempDir;
use tokio::sync::mpsc;

#[test]
fn test_config_defaults_fill_missing_sections() {
    let config = Config::from_toml(
        r#"
        [simulation]
        step_increment = 0.2

        [planner]
        kind = "graph"
        network = "midtown.geojson"
        "#,
    )
    .unwrap();

    assert_eq!(config.simulation.step_increment, 0.2);
    assert_eq!(config.simulation.tick_interval_ms, 50);
    assert_eq!(config.simulation.detection_radius_m, 25.0);
    assert_eq!(config.planner.kind, PlannerKind::Graph);
    assert_eq!(config.planner.network, "midtown.geojson");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.log_level(), log::LevelFilter::Info);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(Config::from_toml("[simulation]\nstep_increment = 0.0").is_err());
    assert!(Config::from_toml("[simulation]\nstep_increment = 1.5").is_err());
    assert!(Config::from_toml("[simulation]\ntick_interval_ms = 0").is_err());
    assert!(Config::from_toml("[planner]\nkind = \"teleport\"").is_err());
    assert!(Config::from_toml("[planner]\nkind = \"http\"\nendpoint = \"\"").is_err());
}

#[tokio::test]
async fn test_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reroute-sim.toml");
    fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
    assert!(Config::from_file(dir.path().join("missing.toml")).await.is_err());
}

#[tokio::test]
async fn test_graph_planner_requires_network() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.planner.kind = PlannerKind::Graph;
    config.planner.data_dir = Some(dir.path().to_string_lossy().into_owned());

    assert!(build_planner(&config).is_err());
    assert!(SimulationService::from_config(&config, init_noop_logger()).is_err());
}

#[tokio::test]
async fn test_service_from_default_config() {
    let service = SimulationService::from_config(&Config::default(), init_noop_logger()).unwrap();
    assert!(!service.coordinator().is_running());
    assert!(service.coordinator().is_settled());
}

#[tokio::test]
async fn test_scenario_file_parses_steps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.json");
    fs::write(
        &path,
        r#"{
          "name": "single car",
          "steps": [
            {"action": {"type": "select_agent", "agent": "Car_A"}},
            {"after_ms": 10, "action": {"type": "click_point", "position": {"lat": 1.0, "lng": 2.0}}},
            {"action": {"type": "start_simulation"}}
          ]
        }"#,
    )
    .unwrap();

    let scenario = Scenario::from_file(&path).await.unwrap();
    assert_eq!(scenario.name, "single car");
    assert_eq!(scenario.steps.len(), 3);
    assert_eq!(scenario.steps[0].after_ms, 0);
    assert_eq!(scenario.steps[1].after_ms, 10);
    assert_eq!(scenario.steps[2].action, UserAction::StartSimulation);

    fs::write(&path, "{").unwrap();
    assert!(Scenario::from_file(&path).await.is_err());
}

#[tokio::test]
async fn test_scenario_play_sends_actions_in_order() {
    let scenario = Scenario {
        name: "two steps".to_string(),
        steps: vec![
            ScenarioStep {
                after_ms: 0,
                action: UserAction::SelectAgent { agent: AgentId::CarB },
            },
            ScenarioStep {
                after_ms: 5,
                action: UserAction::EnableObstacleMode,
            },
        ],
    };
    let (tx, mut rx) = mpsc::channel(4);
    scenario.play(tx).await;

    assert_eq!(rx.recv().await, Some(UserAction::SelectAgent { agent: AgentId::CarB }));
    assert_eq!(rx.recv().await, Some(UserAction::EnableObstacleMode));
    assert_eq!(rx.recv().await, None);
}

#[test]
fn test_midtown_demo_is_well_formed() {
    let demo = Scenario::midtown_demo();
    assert!(demo
        .steps
        .iter()
        .any(|s| s.action == UserAction::StartSimulation));
    let clicks = demo
        .steps
        .iter()
        .filter(|s| matches!(s.action, UserAction::ClickPoint { .. }))
        .count();
    assert_eq!(clicks, 5);
}
