use super::types::{PlanRequest, Route};
use crate::common::{DomainResult, PlanningError};
use async_trait::async_trait;
use std::sync::Arc;

/// Port to the route-planning backend. Implementations may answer immediately or after
/// arbitrary latency; callers must not assume idempotence or caching.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError>;
}

pub type DynRoutePlanner = Arc<dyn RoutePlanner>;

/// Port trait that the path_planning domain depends on for loading map data.
/// Implementations (adapters) will provide filesystem or network-backed sources.
pub trait PathPlanningDataSource: Send + Sync {
    fn load_geojson(&self, name: &str) -> DomainResult<String>;
    fn load_graph_bytes(&self, name: &str) -> DomainResult<Vec<u8>>;
}
