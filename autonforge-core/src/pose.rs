use crate::coordinates::GridPoint;
use serde::{Deserialize, Serialize};

/// Simulated robot pose. Heading is in degrees and is never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: GridPoint,
    pub heading: f64,
}

impl Pose {
    pub fn new(position: GridPoint, heading: f64) -> Self {
        Self { position, heading }
    }

    pub fn advanced(&self, grid_distance: f64) -> GridPoint {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.position.offset(grid_distance * cos, grid_distance * sin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartConfig {
    pub position: GridPoint,
    pub heading: f64,
}

impl StartConfig {
    pub fn new(position: GridPoint, heading: f64) -> Self {
        Self { position, heading }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.heading)
    }
}

impl Default for StartConfig {
    fn default() -> Self {
        Self::new(GridPoint::new(3.0, 3.0), 0.0)
    }
}
