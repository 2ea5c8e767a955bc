//! Geometry helpers shared across the editor core.

use kurbo::{Point, Rect, Size};

/// Clamp a scalar into `[min, max]`.
///
/// Non-finite input collapses to `min` so NaN coming out of a pointer
/// computation can never poison element positions.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

/// Build a normalized rectangle from two arbitrary corner points.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Inclusive axis-aligned overlap test.
///
/// Rectangles that merely touch along an edge still count as overlapping,
/// which is what marquee selection expects.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x1 >= b.x0 && a.x0 <= b.x1 && a.y1 >= b.y0 && a.y0 <= b.y1
}

/// Clamp the origin of a box of the given size so the box stays inside
/// `bounds`. A box larger than the bounds pins to the min corner.
pub fn clamp_origin(origin: Point, size: Size, bounds: &Rect) -> Point {
    Point::new(
        clamp(origin.x, bounds.x0, (bounds.x1 - size.width).max(bounds.x0)),
        clamp(origin.y, bounds.y0, (bounds.y1 - size.height).max(bounds.y0)),
    )
}
