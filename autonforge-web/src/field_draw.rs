use autonforge_core::{
    OBJECT_RADIUS, ObjectColor, PoseTracker, RenderPoint, RobotFootprint, START_MARKER_RADIUS,
    START_MARKER_RGB,
};
use macroquad::prelude::*;

pub const FIELD_BACKGROUND: Color = Color::from_rgba(0x2E, 0x2E, 0x2E, 255);

#[derive(Debug, Clone)]
pub struct FieldDrawConfig {
    pub grid_color: Color,
    pub grid_thickness: f32,
    pub split_color: Color,
    pub split_thickness: f32,
    pub dash_length: f32,
    pub start_color: Color,
    pub start_thickness: f32,
    pub path_color: Color,
    pub path_thickness: f32,
    pub arrow_head_length: f32,
    pub arrow_head_half_width: f32,
    pub robot_fill: Color,
    pub robot_outline: Color,
    pub robot_outline_thickness: f32,
    pub heading_color: Color,
    pub heading_thickness: f32,
    pub footprint: RobotFootprint,
}

impl Default for FieldDrawConfig {
    fn default() -> Self {
        Self {
            grid_color: Color::from_rgba(0x40, 0x40, 0x40, 255),
            grid_thickness: 1.0,
            split_color: Color::from_rgba(0xFF, 0x00, 0x00, 255),
            split_thickness: 2.0,
            dash_length: 4.0,
            start_color: rgb(START_MARKER_RGB),
            start_thickness: 2.0,
            path_color: Color::from_rgba(0x00, 0xA8, 0xFF, 255),
            path_thickness: 3.0,
            arrow_head_length: 10.0,
            arrow_head_half_width: 5.0,
            robot_fill: Color::from_rgba(0xFF, 0x6B, 0x6B, 255),
            robot_outline: Color::from_rgba(0xFF, 0x52, 0x52, 255),
            robot_outline_thickness: 2.0,
            heading_color: Color::from_rgba(0xFF, 0xD9, 0x3D, 255),
            heading_thickness: 3.0,
            footprint: RobotFootprint::default(),
        }
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::from_rgba(r, g, b, 255)
}

pub fn object_color(color: ObjectColor) -> Color {
    rgb(color.rgb())
}

pub fn to_screen(point: RenderPoint, origin: Vec2) -> Vec2 {
    origin + vec2(point.x as f32, point.y as f32)
}

/// Field coordinates in render pixels for a screen position, `None` when it
/// falls outside the canvas.
pub fn screen_to_field(screen: Vec2, origin: Vec2, extent: f32) -> Option<RenderPoint> {
    let local = screen - origin;
    if local.x < 0.0 || local.y < 0.0 || local.x > extent || local.y > extent {
        return None;
    }
    Some(RenderPoint::new(local.x as f64, local.y as f64))
}

pub fn draw_field(tracker: &PoseTracker, origin: Vec2, config: &FieldDrawConfig) {
    let field = tracker.config();
    let pixels_per_cell = field.pixels_per_cell;
    let extent = field.render_extent() as f32;

    draw_rectangle(origin.x, origin.y, extent, extent, FIELD_BACKGROUND);

    for cell in 0..=field.grid_cells {
        let offset = cell as f32 * pixels_per_cell as f32;
        draw_line(
            origin.x + offset,
            origin.y,
            origin.x + offset,
            origin.y + extent,
            config.grid_thickness,
            config.grid_color,
        );
        draw_line(
            origin.x,
            origin.y + offset,
            origin.x + extent,
            origin.y + offset,
            config.grid_thickness,
            config.grid_color,
        );
    }

    let split_x = origin.x + extent * 0.5;
    draw_dashed_line(
        vec2(split_x, origin.y),
        vec2(split_x, origin.y + extent),
        config.split_thickness,
        config.dash_length,
        config.split_color,
    );

    for object in tracker.objects() {
        let center = to_screen(object.position.to_render(pixels_per_cell), origin);
        draw_circle(center.x, center.y, OBJECT_RADIUS as f32, object_color(object.color));
    }

    let start = to_screen(tracker.start().position.to_render(pixels_per_cell), origin);
    draw_circle_lines(
        start.x,
        start.y,
        START_MARKER_RADIUS as f32,
        config.start_thickness,
        config.start_color,
    );

    for (from, to) in tracker.segments() {
        draw_arrow(
            to_screen(from, origin),
            to_screen(to, origin),
            config.path_thickness,
            config,
            config.path_color,
        );
    }

    draw_robot(tracker, origin, config);
}

fn draw_robot(tracker: &PoseTracker, origin: Vec2, config: &FieldDrawConfig) {
    let pose = tracker.pose();
    let pixels_per_cell = tracker.config().pixels_per_cell;
    let corners = config
        .footprint
        .body_corners(&pose, pixels_per_cell)
        .map(|corner| to_screen(corner, origin));

    draw_triangle(corners[0], corners[1], corners[2], config.robot_fill);
    draw_triangle(corners[0], corners[2], corners[3], config.robot_fill);
    for index in 0..corners.len() {
        let from = corners[index];
        let to = corners[(index + 1) % corners.len()];
        draw_line(
            from.x,
            from.y,
            to.x,
            to.y,
            config.robot_outline_thickness,
            config.robot_outline,
        );
    }

    let (tail, tip) = config.footprint.heading_arrow(&pose, pixels_per_cell);
    draw_arrow(
        to_screen(tail, origin),
        to_screen(tip, origin),
        config.heading_thickness,
        config,
        config.heading_color,
    );
}

fn draw_arrow(from: Vec2, to: Vec2, thickness: f32, config: &FieldDrawConfig, color: Color) {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON {
        return;
    }

    let direction = delta / length;
    let normal = vec2(-direction.y, direction.x);
    let head_length = config.arrow_head_length.min(length);
    let base = to - direction * head_length;

    draw_line(from.x, from.y, base.x, base.y, thickness, color);
    draw_triangle(
        to,
        base + normal * config.arrow_head_half_width,
        base - normal * config.arrow_head_half_width,
        color,
    );
}

fn draw_dashed_line(from: Vec2, to: Vec2, thickness: f32, dash_length: f32, color: Color) {
    let delta = to - from;
    let length = delta.length();
    if length <= f32::EPSILON || dash_length <= 0.0 {
        return;
    }

    let direction = delta / length;
    let mut travelled = 0.0;
    while travelled < length {
        let dash_end = (travelled + dash_length).min(length);
        let a = from + direction * travelled;
        let b = from + direction * dash_end;
        draw_line(a.x, a.y, b.x, b.y, thickness, color);
        travelled += dash_length * 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_colors_follow_palette() {
        assert_eq!(object_color(ObjectColor::Red), Color::from_rgba(255, 0, 0, 255));
        assert_eq!(object_color(ObjectColor::Blue), Color::from_rgba(0, 0, 255, 255));
    }

    #[test]
    fn start_marker_is_green() {
        assert_eq!(
            FieldDrawConfig::default().start_color,
            Color::from_rgba(0x00, 0xFF, 0x00, 255)
        );
    }

    #[test]
    fn screen_mapping_respects_canvas_bounds() {
        let origin = vec2(20.0, 20.0);
        assert_eq!(
            screen_to_field(vec2(180.0, 100.0), origin, 480.0),
            Some(RenderPoint::new(160.0, 80.0))
        );
        assert_eq!(screen_to_field(vec2(10.0, 100.0), origin, 480.0), None);
        assert_eq!(screen_to_field(vec2(100.0, 501.0), origin, 480.0), None);
        assert_eq!(
            to_screen(RenderPoint::new(160.0, 80.0), origin),
            vec2(180.0, 100.0)
        );
    }
}
