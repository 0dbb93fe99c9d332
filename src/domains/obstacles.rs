use super::geometry::Position;
use serde::{Deserialize, Serialize};

/// Append-only set of obstacle points sharing one detection radius.
///
/// Entries are never removed or merged; a duplicate obstacle is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    radius_m: f64,
    obstacles: Vec<Position>,
}

impl ObstacleField {
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m: radius_m.max(0.0),
            obstacles: Vec::new(),
        }
    }

    pub fn with_obstacles(radius_m: f64, obstacles: impl IntoIterator<Item = Position>) -> Self {
        let mut field = Self::new(radius_m);
        for p in obstacles {
            field.add(p);
        }
        field
    }

    pub fn add(&mut self, p: Position) {
        self.obstacles.push(p);
    }

    /// True iff some obstacle lies within the detection radius of `p`.
    pub fn is_blocking(&self, p: &Position) -> bool {
        self.obstacles.iter().any(|o| o.distance_m(p) <= self.radius_m)
    }

    /// First obstacle whose radius covers `p`.
    pub fn blocker(&self, p: &Position) -> Option<Position> {
        self.obstacles.iter().find(|o| o.distance_m(p) <= self.radius_m).copied()
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn positions(&self) -> &[Position] {
        &self.obstacles
    }

    /// Copy of the current obstacle positions, as sent along with a planning request.
    pub fn snapshot(&self) -> Vec<Position> {
        self.obstacles.clone()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
