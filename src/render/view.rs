//! Mapping between pixels and the complex plane.
//!
//! The view spans `center.x ± aspect·radius` horizontally and `center.y ± radius` vertically,
//! with pixel row 0 at the top (plane `y` grows upwards).

use crate::foundation::{
    core::{Canvas, Vec2},
    math::map_range,
};

/// Plane-space bounds of a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRange {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

pub fn view_range(center: Vec2, radius: f64, canvas: Canvas) -> ViewRange {
    let half_w = canvas.aspect() * radius;
    ViewRange {
        x: [center.x - half_w, center.x + half_w],
        y: [center.y - radius, center.y + radius],
    }
}

/// Plane point under a (sub-)pixel position.
pub fn pixel_to_plane(pixel: Vec2, center: Vec2, radius: f64, canvas: Canvas) -> Vec2 {
    let range = view_range(center, radius, canvas);
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    Vec2::new(
        map_range(pixel.x, 0.0, w, range.x[0], range.x[1]),
        map_range(pixel.y, h, 0.0, range.y[0], range.y[1]),
    )
}

pub fn plane_to_pixel(point: Vec2, center: Vec2, radius: f64, canvas: Canvas) -> Vec2 {
    let range = view_range(center, radius, canvas);
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    Vec2::new(
        map_range(point.x, range.x[0], range.x[1], 0.0, w),
        map_range(point.y, range.y[0], range.y[1], h, 0.0),
    )
}

/// New center that keeps the plane point under `pixel` fixed while the radius changes.
pub fn zoom_about_pixel(
    pixel: Vec2,
    center: Vec2,
    radius: f64,
    new_radius: f64,
    canvas: Canvas,
) -> Vec2 {
    let before = pixel_to_plane(pixel, center, radius, canvas);
    let after = pixel_to_plane(pixel, center, new_radius, canvas);
    center - (after - before)
}

#[cfg(test)]
#[path = "../../tests/unit/render/view.rs"]
mod tests;
