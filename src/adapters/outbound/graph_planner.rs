use super::road_network::RoadNetwork;
use crate::common::PlanningError;
use crate::domains::obstacles::ObstacleField;
use crate::domains::path_planning::{PlanRequest, Route, RoutePlanner};
use async_trait::async_trait;
use std::sync::Arc;

/// In-process planner over a road network. Start and destination snap to the nearest usable
/// road node; the returned route runs from the exact start, along the roads, to the exact
/// destination. Nodes within the detection radius of an obstacle are impassable.
pub struct GraphRoutePlanner {
    network: Arc<RoadNetwork>,
    radius_m: f64,
}

impl GraphRoutePlanner {
    pub fn new(network: Arc<RoadNetwork>, radius_m: f64) -> Self {
        Self { network, radius_m }
    }

    pub fn plan_blocking(network: &RoadNetwork, radius_m: f64, request: &PlanRequest) -> Result<Route, PlanningError> {
        let obstacles = ObstacleField::with_obstacles(radius_m, request.obstacles.iter().copied());
        if obstacles.is_blocking(&request.destination) {
            return Err(PlanningError::NoRouteFound(format!(
                "destination {} lies within an obstacle",
                request.destination
            )));
        }

        let from = network
            .nearest_node(&request.start, &obstacles)
            .ok_or_else(|| PlanningError::NoRouteFound("no usable road node near start".to_string()))?;
        let to = network
            .nearest_node(&request.destination, &obstacles)
            .ok_or_else(|| PlanningError::NoRouteFound("no usable road node near destination".to_string()))?;
        let path = network
            .shortest_path(from, to, &obstacles)
            .ok_or_else(|| PlanningError::NoRouteFound("No available path".to_string()))?;

        let mut waypoints = Vec::with_capacity(path.len() + 2);
        waypoints.push(request.start);
        for p in path.into_iter().chain(std::iter::once(request.destination)) {
            if waypoints.last().is_some_and(|last| last.approx_eq(&p)) {
                continue;
            }
            waypoints.push(p);
        }
        Route::new(waypoints)
    }
}

#[async_trait]
impl RoutePlanner for GraphRoutePlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        let network = self.network.clone();
        let radius_m = self.radius_m;
        let request = request.clone();
        tokio::task::spawn_blocking(move || Self::plan_blocking(&network, radius_m, &request))
            .await
            .map_err(|e| PlanningError::Transport(format!("planning task failed: {}", e)))?
    }
}
