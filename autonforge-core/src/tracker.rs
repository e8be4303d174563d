use crate::config::{FieldConfig, PlannerConfig, StartInput};
use crate::coordinates::{GridPoint, RenderPoint};
use crate::field::{FieldObject, ObjectColor};
use crate::pose::{Pose, StartConfig};
use crate::snapshot::FieldSnapshot;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("invalid start coordinates ({x}, {y}): x and y must be within 0-{limit}")]
    StartOutOfRange { x: f64, y: f64, limit: f64 },
}

#[derive(Debug, Clone)]
pub struct PoseTracker {
    config: FieldConfig,
    start: StartConfig,
    pose: Pose,
    path: Vec<RenderPoint>,
    objects: Vec<FieldObject>,
}

impl PoseTracker {
    pub fn new() -> Self {
        Self::with_config(FieldConfig::default())
    }

    pub fn with_config(config: FieldConfig) -> Self {
        let center = config.center();
        let start = StartConfig::new(GridPoint::new(center, center), 0.0);
        Self {
            config,
            start,
            pose: start.pose(),
            path: vec![start.position.to_render(config.pixels_per_cell)],
            objects: Vec::new(),
        }
    }

    pub fn from_planner(config: &PlannerConfig) -> Result<Self, FieldError> {
        let mut tracker = Self::with_config(config.field);
        tracker.apply_start(config.start)?;
        Ok(tracker)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn start(&self) -> StartConfig {
        self.start
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn heading(&self) -> f64 {
        self.pose.heading
    }

    pub fn path(&self) -> &[RenderPoint] {
        &self.path
    }

    pub fn objects(&self) -> &[FieldObject] {
        &self.objects
    }

    pub fn segments(&self) -> impl Iterator<Item = (RenderPoint, RenderPoint)> + '_ {
        self.path.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// `y` is given with up as positive and is flipped before it is stored.
    pub fn set_start(&mut self, x: f64, y: f64, heading: f64) -> Result<(), FieldError> {
        let limit = self.config.start_limit();
        let in_range = |value: f64| (0.0..=limit).contains(&value);
        if !in_range(x) || !in_range(y) {
            return Err(FieldError::StartOutOfRange { x, y, limit });
        }

        self.start = StartConfig::new(GridPoint::new(x, self.config.invert_y(y)), heading);
        self.restart_path();
        info!(
            "start set to ({}, {}) heading {}",
            self.start.position.x, self.start.position.y, heading
        );
        Ok(())
    }

    pub fn apply_start(&mut self, start: StartInput) -> Result<(), FieldError> {
        self.set_start(start.x, start.y, start.heading)
    }

    pub fn apply_motion(&mut self, distance_inches: f64, delta_angle_degrees: f64) -> RenderPoint {
        let grid_distance = distance_inches / self.config.inches_per_cell;
        let next = self.pose.advanced(grid_distance);
        let point = next.to_render(self.config.pixels_per_cell);

        self.path.push(point);
        self.pose.position = next;
        self.pose.heading += delta_angle_degrees;
        debug!(
            "motion {distance_inches} in / {delta_angle_degrees} deg -> ({}, {}) heading {}",
            next.x, next.y, self.pose.heading
        );
        point
    }

    pub fn place_object(&mut self, x_pixels: f64, y_pixels: f64, color: ObjectColor) -> FieldObject {
        let position = RenderPoint::new(x_pixels, y_pixels).to_grid(self.config.pixels_per_cell);
        let object = FieldObject::new(position, color);
        self.objects.push(object);
        debug!("placed {color} object at ({}, {})", position.x, position.y);
        object
    }

    pub fn reset(&mut self) {
        self.objects.clear();
        self.restart_path();
        info!("field reset");
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            start: self.start,
            pose: self.pose,
            path: self.path.clone(),
            objects: self.objects.clone(),
        }
    }

    fn restart_path(&mut self) {
        self.pose = self.start.pose();
        self.path.clear();
        self.path
            .push(self.start.position.to_render(self.config.pixels_per_cell));
    }
}

impl Default for PoseTracker {
    fn default() -> Self {
        Self::new()
    }
}
