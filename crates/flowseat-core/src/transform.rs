//! Transform engine: grid snapping, rotation math, and clone offsets.

use kurbo::{Point, Rect, Vec2};

use crate::geometry;

/// Grid size (design units) for normal drag snapping.
pub const GRID_SIZE: f64 = 10.0;
/// Fine grid used while Shift is held.
pub const FINE_GRID_SIZE: f64 = 1.0;

/// Offset applied to a pasted element, relative to the clipboard source.
pub const PASTE_OFFSET: Vec2 = Vec2::new(24.0, 24.0);
/// Offset applied to a duplicated element.
pub const DUPLICATE_OFFSET: Vec2 = Vec2::new(32.0, 32.0);

/// Padding between an element's half-extent and its rotation handle orbit.
pub const ROTATION_HANDLE_PADDING: f64 = 56.0;
/// The rotation handle never orbits closer than this radius.
pub const ROTATION_HANDLE_MIN_RADIUS: f64 = 120.0;

/// Snap a scalar to the nearest grid multiple.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Grid step for the current modifier state: fine while Shift is held.
pub fn grid_step(shift: bool) -> f64 {
    if shift { FINE_GRID_SIZE } else { GRID_SIZE }
}

/// Snap a point to the grid on both axes.
pub fn snap_point(point: Point, grid: f64) -> Point {
    Point::new(snap_to_grid(point.x, grid), snap_to_grid(point.y, grid))
}

/// Normalize an angle in degrees to `[0, 360)`.
///
/// Uses euclidean remainder so negative inputs wrap toward positive:
/// `370 -> 10`, `-10 -> 350`.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    angle.rem_euclid(360.0)
}

/// Angle (degrees, normalized) from a center to a pointer position, as used
/// by the rotate tool: 0 points along +x.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    let raw = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees();
    normalize_degrees(raw)
}

/// Angle for a rotation-handle drag. The +90 offset maps "pointer straight
/// above the center" to 0 degrees.
pub fn handle_angle(center: Point, pointer: Point) -> f64 {
    let raw = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    normalize_degrees(raw)
}

/// Orbit radius for an element's rotation handle.
pub fn rotation_handle_radius(width: f64, height: f64) -> f64 {
    (width.max(height) / 2.0 + ROTATION_HANDLE_PADDING).max(ROTATION_HANDLE_MIN_RADIUS)
}

/// Position of the rotation handle knob for an element at `angle` degrees.
/// The knob sits on the orbit at `angle - 90` so 0 degrees renders above the
/// element.
pub fn rotation_handle_position(center: Point, radius: f64, angle: f64) -> Point {
    let rad = (angle - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Clamp a shared drag delta so the group's union box stays inside `bounds`.
///
/// Elements are still snapped and clamped individually afterwards; this only
/// keeps the group as a whole from escaping the canvas.
pub fn clamp_group_delta(delta: Vec2, group_box: &Rect, bounds: &Rect) -> Vec2 {
    let min_dx = bounds.x0 - group_box.x0;
    let max_dx = (bounds.x1 - group_box.x1).max(min_dx);
    let min_dy = bounds.y0 - group_box.y0;
    let max_dy = (bounds.y1 - group_box.y1).max(min_dy);
    Vec2::new(
        geometry::clamp(delta.x, min_dx, max_dx),
        geometry::clamp(delta.y, min_dy, max_dy),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(14.0, 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(15.0, 10.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(-4.0, 10.0)).abs() < f64::EPSILON);
        assert!((snap_to_grid(7.3, 1.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grid_step_fine_with_shift() {
        assert!((grid_step(false) - GRID_SIZE).abs() < f64::EPSILON);
        assert!((grid_step(true) - FINE_GRID_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_degrees_wraps_toward_positive() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < f64::EPSILON);
        assert!((normalize_degrees(-10.0) - 350.0).abs() < f64::EPSILON);
        assert!((normalize_degrees(0.0)).abs() < f64::EPSILON);
        assert!((normalize_degrees(360.0)).abs() < f64::EPSILON);
        assert!((normalize_degrees(-720.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_degrees_non_finite() {
        assert!(normalize_degrees(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_angle() {
        let center = Point::new(0.0, 0.0);
        assert!((pointer_angle(center, Point::new(10.0, 0.0))).abs() < 1e-9);
        assert!((pointer_angle(center, Point::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((pointer_angle(center, Point::new(-10.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((pointer_angle(center, Point::new(0.0, -10.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_handle_angle_zero_points_up() {
        let center = Point::new(50.0, 50.0);
        // Pointer straight above the center.
        let angle = handle_angle(center, Point::new(50.0, 0.0));
        assert!(angle.abs() < 1e-9);
        // Pointer to the right maps to 90.
        let angle = handle_angle(center, Point::new(100.0, 50.0));
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_handle_radius_floor() {
        // Small elements orbit at the minimum radius.
        assert!((rotation_handle_radius(46.0, 46.0) - 120.0).abs() < f64::EPSILON);
        // Large elements push the orbit out past the floor.
        assert!((rotation_handle_radius(220.0, 120.0) - 166.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamp_group_delta_stops_at_bounds() {
        let bounds = Rect::new(0.0, 0.0, 1000.0, 1000.0);
        let group = Rect::new(900.0, 100.0, 980.0, 200.0);
        let clamped = clamp_group_delta(Vec2::new(100.0, -150.0), &group, &bounds);
        assert!((clamped.x - 20.0).abs() < f64::EPSILON);
        assert!((clamped.y + 100.0).abs() < f64::EPSILON);
    }
}
