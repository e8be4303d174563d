use std::ops::Range;

use autonforge_core::{
    FieldConfig, FieldSnapshot, OBJECT_RADIUS, RenderPoint, RobotFootprint, START_MARKER_RADIUS,
    START_MARKER_RGB,
};
use image::{Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([0x2E, 0x2E, 0x2E, 255]);
const GRID_LINE: Rgba<u8> = Rgba([0x40, 0x40, 0x40, 255]);
const CENTER_SPLIT: Rgba<u8> = Rgba([0xFF, 0x00, 0x00, 255]);
const START_MARKER: Rgba<u8> = Rgba([
    START_MARKER_RGB[0],
    START_MARKER_RGB[1],
    START_MARKER_RGB[2],
    255,
]);
const PATH: Rgba<u8> = Rgba([0x00, 0xA8, 0xFF, 255]);
const ROBOT_FILL: Rgba<u8> = Rgba([0xFF, 0x6B, 0x6B, 255]);
const ROBOT_OUTLINE: Rgba<u8> = Rgba([0xFF, 0x52, 0x52, 255]);
const HEADING: Rgba<u8> = Rgba([0xFF, 0xD9, 0x3D, 255]);

const GRID_LINE_WIDTH: f64 = 2.0;
const CENTER_SPLIT_WIDTH: f64 = 3.0;
const DASH_LENGTH: f64 = 4.0;
const START_MARKER_WIDTH: f64 = 3.0;
const PATH_WIDTH: f64 = 4.0;
const PATH_HEAD: ArrowHead = ArrowHead {
    length: 15.0,
    half_width: 8.0,
};
const ROBOT_OUTLINE_WIDTH: f64 = 3.0;
const HEADING_WIDTH: f64 = 4.0;
const HEADING_HEAD: ArrowHead = ArrowHead {
    length: 10.0,
    half_width: 6.0,
};

#[derive(Clone, Copy)]
struct ArrowHead {
    length: f64,
    half_width: f64,
}

/// Rasterizes the field the way the planner canvas draws it: grid, center
/// split, objects, start marker, path, then the robot on top.
pub fn render_preview(
    snapshot: &FieldSnapshot,
    field: &FieldConfig,
    footprint: &RobotFootprint,
) -> RgbaImage {
    let extent = field.render_extent();
    let size = extent.round().max(1.0) as u32;
    let mut image = RgbaImage::from_pixel(size, size, BACKGROUND);
    let scale = field.pixels_per_cell;

    for i in 0..=field.grid_cells {
        let offset = i as f64 * scale;
        let vertical = (RenderPoint::new(offset, 0.0), RenderPoint::new(offset, extent));
        let horizontal = (RenderPoint::new(0.0, offset), RenderPoint::new(extent, offset));
        draw_line(&mut image, vertical, GRID_LINE_WIDTH, GRID_LINE);
        draw_line(&mut image, horizontal, GRID_LINE_WIDTH, GRID_LINE);
    }

    let split_x = field.center() * scale;
    draw_dashed_line(
        &mut image,
        (RenderPoint::new(split_x, 0.0), RenderPoint::new(split_x, extent)),
        CENTER_SPLIT_WIDTH,
        CENTER_SPLIT,
    );

    for object in &snapshot.objects {
        let [r, g, b] = object.color.rgb();
        let center = object.position.to_render(scale);
        fill_circle(&mut image, center, OBJECT_RADIUS, Rgba([r, g, b, 255]));
    }

    let start = snapshot.start.position.to_render(scale);
    stroke_circle(
        &mut image,
        start,
        START_MARKER_RADIUS,
        START_MARKER_WIDTH,
        START_MARKER,
    );

    for pair in snapshot.path.windows(2) {
        draw_arrow(&mut image, (pair[0], pair[1]), PATH_WIDTH, PATH_HEAD, PATH);
    }

    let corners = footprint.body_corners(&snapshot.pose, scale);
    fill_convex(&mut image, &corners, ROBOT_FILL);
    for i in 0..corners.len() {
        let edge = (corners[i], corners[(i + 1) % corners.len()]);
        draw_line(&mut image, edge, ROBOT_OUTLINE_WIDTH, ROBOT_OUTLINE);
    }
    let arrow = footprint.heading_arrow(&snapshot.pose, scale);
    draw_arrow(&mut image, arrow, HEADING_WIDTH, HEADING_HEAD, HEADING);

    image
}

fn pixel_span(min: f64, max: f64, limit: u32) -> Range<u32> {
    let start = min.floor().max(0.0) as u32;
    let end = (max.ceil().max(0.0) as u32).min(limit);
    start.min(end)..end
}

fn for_each_pixel_in(
    image: &mut RgbaImage,
    min: RenderPoint,
    max: RenderPoint,
    mut shade: impl FnMut(RenderPoint) -> bool,
    color: Rgba<u8>,
) {
    let (width, height) = image.dimensions();
    for y in pixel_span(min.y, max.y, height) {
        for x in pixel_span(min.x, max.x, width) {
            let center = RenderPoint::new(x as f64 + 0.5, y as f64 + 0.5);
            if shade(center) {
                image.put_pixel(x, y, color);
            }
        }
    }
}

fn distance(a: RenderPoint, b: RenderPoint) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Distance from `p` to the segment and the clamped position along it (0..=1).
fn segment_distance(p: RenderPoint, (a, b): (RenderPoint, RenderPoint)) -> (f64, f64) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq <= f64::EPSILON {
        return (distance(p, a), 0.0);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    let closest = RenderPoint::new(a.x + t * dx, a.y + t * dy);
    (distance(p, closest), t)
}

fn segment_bounds((a, b): (RenderPoint, RenderPoint), pad: f64) -> (RenderPoint, RenderPoint) {
    (
        RenderPoint::new(a.x.min(b.x) - pad, a.y.min(b.y) - pad),
        RenderPoint::new(a.x.max(b.x) + pad, a.y.max(b.y) + pad),
    )
}

fn draw_line(
    image: &mut RgbaImage,
    segment: (RenderPoint, RenderPoint),
    width: f64,
    color: Rgba<u8>,
) {
    let half = width / 2.0;
    let (min, max) = segment_bounds(segment, half);
    for_each_pixel_in(
        image,
        min,
        max,
        |p| segment_distance(p, segment).0 <= half,
        color,
    );
}

fn draw_dashed_line(
    image: &mut RgbaImage,
    segment: (RenderPoint, RenderPoint),
    width: f64,
    color: Rgba<u8>,
) {
    let half = width / 2.0;
    let length = distance(segment.0, segment.1);
    let (min, max) = segment_bounds(segment, half);
    for_each_pixel_in(
        image,
        min,
        max,
        |p| {
            let (d, t) = segment_distance(p, segment);
            let along = t * length;
            d <= half && (along / DASH_LENGTH).floor() as i64 % 2 == 0
        },
        color,
    );
}

fn draw_arrow(
    image: &mut RgbaImage,
    segment: (RenderPoint, RenderPoint),
    width: f64,
    head: ArrowHead,
    color: Rgba<u8>,
) {
    let (from, tip) = segment;
    let length = distance(from, tip);
    if length <= f64::EPSILON {
        return;
    }
    draw_line(image, segment, width, color);

    let (ux, uy) = ((tip.x - from.x) / length, (tip.y - from.y) / length);
    let base = RenderPoint::new(tip.x - ux * head.length, tip.y - uy * head.length);
    let left = RenderPoint::new(base.x - uy * head.half_width, base.y + ux * head.half_width);
    let right = RenderPoint::new(base.x + uy * head.half_width, base.y - ux * head.half_width);
    fill_convex(image, &[tip, left, right], color);
}

fn fill_circle(image: &mut RgbaImage, center: RenderPoint, radius: f64, color: Rgba<u8>) {
    let (min, max) = segment_bounds((center, center), radius);
    for_each_pixel_in(image, min, max, |p| distance(p, center) <= radius, color);
}

fn stroke_circle(
    image: &mut RgbaImage,
    center: RenderPoint,
    radius: f64,
    width: f64,
    color: Rgba<u8>,
) {
    let half = width / 2.0;
    let (min, max) = segment_bounds((center, center), radius + half);
    for_each_pixel_in(
        image,
        min,
        max,
        |p| (distance(p, center) - radius).abs() <= half,
        color,
    );
}

fn fill_convex(image: &mut RgbaImage, corners: &[RenderPoint], color: Rgba<u8>) {
    let Some(first) = corners.first() else {
        return;
    };
    let (min, max) = corners.iter().fold((*first, *first), |(min, max), c| {
        (
            RenderPoint::new(min.x.min(c.x), min.y.min(c.y)),
            RenderPoint::new(max.x.max(c.x), max.y.max(c.y)),
        )
    });

    for_each_pixel_in(
        image,
        min,
        max,
        |p| {
            let mut sign = 0.0_f64;
            for (i, a) in corners.iter().enumerate() {
                let b = corners[(i + 1) % corners.len()];
                let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
                if cross == 0.0 {
                    continue;
                }
                if sign == 0.0 {
                    sign = cross.signum();
                } else if cross.signum() != sign {
                    return false;
                }
            }
            true
        },
        color,
    );
}
