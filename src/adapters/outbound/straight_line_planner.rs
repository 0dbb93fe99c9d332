use crate::common::PlanningError;
use crate::domains::geometry::{interpolate, Position};
use crate::domains::obstacles::ObstacleField;
use crate::domains::path_planning::{PlanRequest, Route, RoutePlanner};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Detour corners are tried this many detection radii to either side of the blocking obstacle.
const DETOUR_RADII: [f64; 4] = [2.0, 3.0, 5.0, 8.0];

/// Offline planner: evenly spaced waypoints on the straight line from start to destination.
/// When an obstacle sits on the line, it tries a single corner beside that obstacle; failing
/// that, there is no route.
pub struct StraightLinePlanner {
    radius_m: f64,
    segment_m: f64,
    latency: Duration,
    jitter_ms: u64,
}

impl StraightLinePlanner {
    pub fn new(radius_m: f64, segment_m: f64) -> Self {
        Self {
            radius_m,
            segment_m: segment_m.max(1.0),
            latency: Duration::ZERO,
            jitter_ms: 0,
        }
    }

    /// Simulates a remote service: every answer is delayed by `latency` plus up to `jitter_ms`.
    pub fn with_latency(mut self, latency: Duration, jitter_ms: u64) -> Self {
        self.latency = latency;
        self.jitter_ms = jitter_ms;
        self
    }

    fn plan_route(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        let start = request.start;
        let goal = request.destination;
        let field = ObstacleField::with_obstacles(self.radius_m, request.obstacles.iter().copied());
        if field.is_blocking(&goal) {
            return Err(PlanningError::NoRouteFound(format!(
                "destination {} lies within an obstacle",
                goal
            )));
        }

        let direct = [start, goal];
        let Some(blocker) = self.first_blocker(&direct, &field) else {
            return Route::new(sample(&direct, self.segment_m));
        };

        let (north, east) = start.local_offset_m(&goal);
        let length = north.hypot(east);
        if length > 0.0 {
            // unit normal to the line of travel
            let (normal_n, normal_e) = (-east / length, north / length);
            for radii in DETOUR_RADII {
                for side in [1.0, -1.0] {
                    let shift = side * radii * self.radius_m.max(1.0);
                    let corner = blocker.offset_m(normal_n * shift, normal_e * shift);
                    let path = [start, corner, goal];
                    if self.first_blocker(&path, &field).is_none() {
                        return Route::new(sample(&path, self.segment_m));
                    }
                }
            }
        }
        Err(PlanningError::NoRouteFound(format!(
            "line to {} is blocked near {} and no detour is clear",
            goal, blocker
        )))
    }

    /// Obstacle hit by the polyline through `corners`, sampled finer than the detection radius.
    /// The start itself is not tested.
    fn first_blocker(&self, corners: &[Position], field: &ObstacleField) -> Option<Position> {
        let spacing = (self.radius_m * 0.5).clamp(1.0, self.segment_m);
        sample(corners, spacing)
            .iter()
            .skip(1)
            .find_map(|w| field.blocker(w))
    }
}

/// Points every `spacing` metres or less along each leg, corners included.
fn sample(corners: &[Position], spacing: f64) -> Vec<Position> {
    let mut points = vec![corners[0]];
    for leg in corners.windows(2) {
        let steps = ((leg[0].distance_m(&leg[1]) / spacing).ceil() as usize).max(1);
        points.extend((1..=steps).map(|i| interpolate(&leg[0], &leg[1], i as f64 / steps as f64)));
    }
    points
}

#[async_trait]
impl RoutePlanner for StraightLinePlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Route, PlanningError> {
        if !self.latency.is_zero() || self.jitter_ms > 0 {
            let jitter = if self.jitter_ms > 0 {
                rand::thread_rng().gen_range(0..=self.jitter_ms)
            } else {
                0
            };
            sleep(self.latency + Duration::from_millis(jitter)).await;
        }
        self.plan_route(request)
    }
}
