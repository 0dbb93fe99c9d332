use super::road_network::RoadNetwork;
use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::ports::PathPlanningDataSource;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "REROUTE_SIM_DATA_DIR";

/// Map data under a base directory: `geojson/<name>` for road sources and `graphs/<name>`
/// for prebuilt graph files.
pub struct FilesystemDataSource {
    base: PathBuf,
}

impl FilesystemDataSource {
    /// Uses `base` if given, else `$REROUTE_SIM_DATA_DIR`, else `resources/path_planning`.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| match env::var(DATA_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => PathBuf::from("resources/path_planning"),
        });
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn save_graph_bytes(&self, name: &str, bytes: &[u8]) -> DomainResult<()> {
        let dir = self.base.join("graphs");
        fs::create_dir_all(&dir).map_err(io_error)?;
        fs::write(dir.join(name), bytes).map_err(io_error)
    }

    pub fn build_network(&self, geojson: &str) -> DomainResult<RoadNetwork> {
        RoadNetwork::from_geojson(geojson)
    }

    pub fn save_network(&self, name: &str, network: &RoadNetwork) -> DomainResult<()> {
        self.save_graph_bytes(name, &network.to_bytes()?)
    }

    pub fn load_network(&self, name: &str) -> DomainResult<RoadNetwork> {
        RoadNetwork::from_bytes(&self.load_graph_bytes(name)?)
    }

    /// Loads `name` as a graph file when one exists, otherwise builds it from the GeoJSON
    /// source of the same name and caches the result as `<name>.graph`.
    pub fn load_or_build_network(&self, name: &str) -> DomainResult<RoadNetwork> {
        if self.base.join("graphs").join(name).is_file() {
            return self.load_network(name);
        }
        let cached = format!("{}.graph", name);
        if self.base.join("graphs").join(&cached).is_file() {
            return self.load_network(&cached);
        }

        let network = self.build_network(&self.load_geojson(name)?)?;
        if let Err(e) = self.save_network(&cached, &network) {
            tracing::warn!("Could not cache road graph {}: {}", cached, e);
        }
        Ok(network)
    }
}

impl PathPlanningDataSource for FilesystemDataSource {
    fn load_geojson(&self, name: &str) -> DomainResult<String> {
        fs::read_to_string(self.base.join("geojson").join(name)).map_err(io_error)
    }

    fn load_graph_bytes(&self, name: &str) -> DomainResult<Vec<u8>> {
        fs::read(self.base.join("graphs").join(name)).map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::InfrastructureError(e.to_string())
}
