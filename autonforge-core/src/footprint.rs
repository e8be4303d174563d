use crate::coordinates::RenderPoint;
use crate::pose::Pose;

pub const START_MARKER_RADIUS: f64 = 12.0;
pub const START_MARKER_RGB: [u8; 3] = [0x00, 0xFF, 0x00];
pub const OBJECT_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotFootprint {
    pub body_width: f64,
    pub body_height: f64,
    pub arrow_length: f64,
}

impl Default for RobotFootprint {
    fn default() -> Self {
        Self {
            body_width: 49.5,
            body_height: 49.5,
            arrow_length: 35.0,
        }
    }
}

impl RobotFootprint {
    pub fn body_corners(&self, pose: &Pose, pixels_per_cell: f64) -> [RenderPoint; 4] {
        let center = pose.position.to_render(pixels_per_cell);
        let (sin, cos) = pose.heading.to_radians().sin_cos();
        let half_w = self.body_width / 2.0;
        let half_h = self.body_height / 2.0;

        [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)].map(
            |(cx, cy)| RenderPoint::new(cx * cos - cy * sin + center.x, cx * sin + cy * cos + center.y),
        )
    }

    pub fn heading_arrow(&self, pose: &Pose, pixels_per_cell: f64) -> (RenderPoint, RenderPoint) {
        let center = pose.position.to_render(pixels_per_cell);
        let (sin, cos) = pose.heading.to_radians().sin_cos();
        let tip = RenderPoint::new(
            center.x + self.arrow_length * cos,
            center.y + self.arrow_length * sin,
        );
        (center, tip)
    }
}
