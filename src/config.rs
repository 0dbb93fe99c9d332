use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "REROUTE_SIM_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Fraction of a route segment covered per tick.
    pub step_increment: f64,
    pub detection_radius_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerKind {
    Straight,
    Http,
    Graph,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub kind: PlannerKind,
    pub endpoint: String,
    pub timeout_ms: u64,
    /// Road network name under `<data_dir>/geojson` or `<data_dir>/graphs`.
    pub network: String,
    pub data_dir: Option<String>,
    pub segment_m: f64,
    pub latency_ms: u64,
    pub jitter_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
    pub level: String,
    pub buffer_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            step_increment: 0.1,
            detection_radius_m: 25.0,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            kind: PlannerKind::Straight,
            endpoint: "http://127.0.0.1:5000/calculate_route".to_string(),
            timeout_ms: 5_000,
            network: "roads.geojson".to_string(),
            data_dir: None,
            segment_m: 200.0,
            latency_ms: 150,
            jitter_ms: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
            buffer_capacity: 256,
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if !(sim.step_increment > 0.0 && sim.step_increment <= 1.0) {
            bail!("simulation.step_increment must be in (0, 1], got {}", sim.step_increment);
        }
        if !(sim.detection_radius_m >= 0.0) {
            bail!("simulation.detection_radius_m must be >= 0, got {}", sim.detection_radius_m);
        }
        if sim.tick_interval_ms == 0 {
            bail!("simulation.tick_interval_ms must be positive");
        }
        if self.planner.kind == PlannerKind::Http && self.planner.endpoint.is_empty() {
            bail!("planner.endpoint is required for the http planner");
        }
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
