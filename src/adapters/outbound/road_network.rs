use crate::common::{DomainError, DomainResult};
use crate::domains::geometry::Position;
use crate::domains::obstacles::ObstacleField;
use chrono::{DateTime, Utc};
use geojson::GeoJson;
use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Road graph: nodes are map positions, edge weights are haversine lengths in metres.
pub type RoadGraph = UnGraph<Position, f64>;

const GRAPH_MAGIC: &[u8; 4] = b"PGPH";
const GRAPH_VERSION: u8 = 1;
const PREFIX_LEN: usize = 4 + 1 + 4;

/// JSON header stored in front of the bincode payload of a graph file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphFileHeader {
    pub node_count: usize,
    pub edge_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    graph: RoadGraph,
}

impl RoadNetwork {
    pub fn new(graph: RoadGraph) -> Self {
        Self { graph }
    }

    /// Builds a network from GeoJSON. `LineString` and `MultiLineString` coordinates become
    /// chains of edges, points become isolated nodes; identical coordinates share a node.
    /// Other geometry types are ignored.
    pub fn from_geojson(text: &str) -> DomainResult<Self> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| DomainError::InfrastructureError(format!("Invalid GeoJSON: {}", e)))?;

        let mut builder = GraphBuilder::default();
        match geojson {
            GeoJson::FeatureCollection(collection) => {
                for feature in collection.features {
                    if let Some(geometry) = feature.geometry {
                        builder.add_geometry(&geometry.value);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    builder.add_geometry(&geometry.value);
                }
            }
            GeoJson::Geometry(geometry) => builder.add_geometry(&geometry.value),
        }
        Ok(Self { graph: builder.graph })
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Closest node to `p` that is not blocked by an obstacle.
    pub fn nearest_node(&self, p: &Position, obstacles: &ObstacleField) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&n| !obstacles.is_blocking(&self.graph[n]))
            .min_by_key(|&n| OrderedFloat(self.graph[n].distance_m(p)))
    }

    /// Shortest path by length between two nodes. Nodes within an obstacle's radius are
    /// impassable.
    pub fn shortest_path(&self, from: NodeIndex, to: NodeIndex, obstacles: &ObstacleField) -> Option<Vec<Position>> {
        let blocked: Vec<bool> = self
            .graph
            .node_indices()
            .map(|n| obstacles.is_blocking(&self.graph[n]))
            .collect();
        let goal = self.graph[to];

        let (cost, path) = astar(
            &self.graph,
            from,
            |n| n == to,
            |e| {
                if blocked[e.source().index()] || blocked[e.target().index()] {
                    f64::INFINITY
                } else {
                    *e.weight()
                }
            },
            |n| self.graph[n].distance_m(&goal),
        )?;

        if !cost.is_finite() {
            return None;
        }
        Some(path.into_iter().map(|n| self.graph[n]).collect())
    }

    /// Serializes to the graph file format: magic, version byte, little-endian header length,
    /// JSON header, bincode payload.
    pub fn to_bytes(&self) -> DomainResult<Vec<u8>> {
        let header = GraphFileHeader {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            created_at: Utc::now(),
        };
        let header = serde_json::to_vec(&header)?;
        let payload = bincode::serialize(&self.graph)
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to encode graph: {}", e)))?;

        let mut bytes = Vec::with_capacity(PREFIX_LEN + header.len() + payload.len());
        bytes.extend_from_slice(GRAPH_MAGIC);
        bytes.push(GRAPH_VERSION);
        bytes.extend_from_slice(&(header.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Reads a graph file. Version 0 files carry no header; their header length is zero.
    pub fn from_bytes(bytes: &[u8]) -> DomainResult<Self> {
        if bytes.len() < PREFIX_LEN || &bytes[..4] != GRAPH_MAGIC {
            return Err(DomainError::InfrastructureError("Not a graph file".to_string()));
        }
        let version = bytes[4];
        if version > GRAPH_VERSION {
            return Err(DomainError::InfrastructureError(format!(
                "Unsupported graph file version {}",
                version
            )));
        }

        let header_len = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
        let payload_start = PREFIX_LEN + header_len;
        if bytes.len() < payload_start {
            return Err(DomainError::InfrastructureError("Truncated graph file header".to_string()));
        }

        let graph: RoadGraph = bincode::deserialize(&bytes[payload_start..])
            .map_err(|e| DomainError::InfrastructureError(format!("Failed to decode graph: {}", e)))?;
        Ok(Self { graph })
    }
}

#[derive(Default)]
struct GraphBuilder {
    graph: RoadGraph,
    index: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), NodeIndex>,
}

impl GraphBuilder {
    fn node(&mut self, coord: &[f64]) -> Option<NodeIndex> {
        // GeoJSON coordinates are [longitude, latitude]
        if coord.len() < 2 {
            return None;
        }
        let p = Position::new(coord[1], coord[0]);
        if !p.is_finite() {
            return None;
        }
        let graph = &mut self.graph;
        let n = *self
            .index
            .entry((OrderedFloat(p.lat), OrderedFloat(p.lng)))
            .or_insert_with(|| graph.add_node(p));
        Some(n)
    }

    fn line(&mut self, coords: &[Vec<f64>]) {
        let mut previous: Option<NodeIndex> = None;
        for coord in coords {
            let Some(current) = self.node(coord) else {
                continue;
            };
            if let Some(prev) = previous {
                if prev != current {
                    let length = self.graph[prev].distance_m(&self.graph[current]);
                    self.graph.update_edge(prev, current, length);
                }
            }
            previous = Some(current);
        }
    }

    fn add_geometry(&mut self, value: &geojson::Value) {
        match value {
            geojson::Value::Point(coord) => {
                self.node(coord);
            }
            geojson::Value::MultiPoint(coords) => {
                for coord in coords {
                    self.node(coord);
                }
            }
            geojson::Value::LineString(coords) => self.line(coords),
            geojson::Value::MultiLineString(lines) => {
                for coords in lines {
                    self.line(coords);
                }
            }
            geojson::Value::GeometryCollection(geometries) => {
                for geometry in geometries {
                    self.add_geometry(&geometry.value);
                }
            }
            _ => {}
        }
    }
}
