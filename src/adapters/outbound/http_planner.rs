use crate::common::PlanningError;
use crate::domains::geometry::Position;
use crate::domains::path_planning::{PlanRequest, Route, RoutePlanner};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Response body of the planning service: `{"route": [[lat, lng], ...]}` on success,
/// `{"error": "..."}` otherwise (the service answers errors with HTTP 400).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanResponseBody {
    Route { route: Vec<(f64, f64)> },
    Error { error: String },
}

/// Maps a raw service response onto the planner contract.
pub fn parse_plan_response(status: u16, body: &str) -> Result<Route, PlanningError> {
    let parsed: PlanResponseBody = serde_json::from_str(body)
        .map_err(|e| PlanningError::InvalidResponse(format!("HTTP {}: {}", status, e)))?;
    match parsed {
        PlanResponseBody::Route { route } => Route::new(route.into_iter().map(Position::from).collect()),
        PlanResponseBody::Error { error } => Err(PlanningError::NoRouteFound(error)),
    }
}

/// Client for the external planning service (`POST /calculate_route`).
pub struct HttpRoutePlanner {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRoutePlanner {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PlanningError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlanningError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RoutePlanner for HttpRoutePlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| PlanningError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PlanningError::Transport(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), endpoint = %self.endpoint, "planner responded");
        parse_plan_response(status, &body)
    }
}
