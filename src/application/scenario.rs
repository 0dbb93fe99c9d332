use crate::common::{ApplicationResult, DomainError};
use crate::domains::car_agent::AgentId;
use crate::domains::geometry::Position;
use crate::domains::simulation::UserAction;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// One scripted user action, sent `after_ms` after the previous step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    #[serde(default)]
    pub after_ms: u64,
    pub action: UserAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> ApplicationResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let scenario = serde_json::from_str(&content).map_err(DomainError::from)?;
        Ok(scenario)
    }

    /// Two cars in midtown Manhattan; an obstacle lands on Car_A's line shortly after start.
    pub fn midtown_demo() -> Self {
        let step = |after_ms, action| ScenarioStep { after_ms, action };
        let click = |lat, lng| UserAction::ClickPoint {
            position: Position::new(lat, lng),
        };
        Self {
            name: "Midtown two-car demo".to_string(),
            steps: vec![
                step(0, UserAction::SelectAgent { agent: AgentId::CarA }),
                step(0, click(40.7580, -73.9855)),
                step(0, click(40.7484, -73.9857)),
                step(0, UserAction::SelectAgent { agent: AgentId::CarB }),
                step(0, click(40.7527, -73.9772)),
                step(0, click(40.7614, -73.9776)),
                step(400, UserAction::StartSimulation),
                step(300, UserAction::EnableObstacleMode),
                step(0, click(40.7532, -73.9856)),
            ],
        }
    }

    /// Feeds the steps into `actions`, honouring the delays. Stops early if the receiver is gone.
    pub async fn play(self, actions: mpsc::Sender<UserAction>) {
        for step in self.steps {
            if step.after_ms > 0 {
                sleep(Duration::from_millis(step.after_ms)).await;
            }
            if actions.send(step.action).await.is_err() {
                break;
            }
        }
    }
}
