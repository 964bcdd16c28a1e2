//! Axis-aligned rectangle geometry.
//!
//! All placement queries in the engine reduce to interval tests on
//! axis-aligned bounds. Rotation is restricted to quadrant steps, so a
//! rotated rectangle is still axis-aligned: 90/270 degrees simply swap the
//! effective width and height.

use serde::{Deserialize, Serialize};

/// Quadrant rotation of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0,
    /// 90 degrees (width/height swapped).
    R90,
    /// 180 degrees.
    R180,
    /// 270 degrees (width/height swapped).
    R270,
}

impl Rotation {
    /// All quadrant rotations, in canonical order.
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Returns true if this rotation swaps width and height.
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }

    /// Rotation angle in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }
}

/// An axis-aligned rectangle with a quadrant rotation.
///
/// `(x, y)` is the lower-left corner of the effective (rotated) bounds.
/// Invariant: `width` and `height` are positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the lower-left corner.
    pub x: f64,
    /// Y coordinate of the lower-left corner.
    pub y: f64,
    /// Unrotated width.
    pub width: f64,
    /// Unrotated height.
    pub height: f64,
    /// Quadrant rotation.
    pub rotation: Rotation,
}

impl Rect {
    /// Creates a new unrotated rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: Rotation::R0,
        }
    }

    /// Sets the rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Effective (width, height) after rotation.
    pub fn effective_size(&self) -> (f64, f64) {
        if self.rotation.swaps_axes() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Axis-aligned bounds after rotation, as `(min_x, min_y, max_x, max_y)`.
    pub fn effective_bounds(&self) -> (f64, f64, f64, f64) {
        let (w, h) = self.effective_size();
        (self.x, self.y, self.x + w, self.y + h)
    }

    /// Area of the rectangle (rotation-invariant).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Center of the effective bounds.
    pub fn center(&self) -> (f64, f64) {
        let (w, h) = self.effective_size();
        (self.x + w / 2.0, self.y + h / 2.0)
    }
}

/// Returns true if two rectangles overlap with positive area.
///
/// Touching edges (zero-area contact) is not an overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    overlap_area(a, b) > 0.0
}

/// Area of the intersection of two rectangles (zero when disjoint).
pub fn overlap_area(a: &Rect, b: &Rect) -> f64 {
    let (ax1, ay1, ax2, ay2) = a.effective_bounds();
    let (bx1, by1, bx2, by2) = b.effective_bounds();

    let dx = ax2.min(bx2) - ax1.max(bx1);
    let dy = ay2.min(by2) - ay1.max(by1);

    if dx > 0.0 && dy > 0.0 {
        dx * dy
    } else {
        0.0
    }
}

/// Returns true if the rectangle lies fully within `[0, room_width] x [0, room_height]`.
///
/// Bounds exactly flush against a wall count as contained.
pub fn contained_in(rect: &Rect, room_width: f64, room_height: f64) -> bool {
    let (x1, y1, x2, y2) = rect.effective_bounds();
    x1 >= 0.0 && y1 >= 0.0 && x2 <= room_width && y2 <= room_height
}

/// Area of the portion of the rectangle lying outside the room.
///
/// Partial out-of-bounds is proportional, not a binary cliff.
pub fn outside_area(rect: &Rect, room_width: f64, room_height: f64) -> f64 {
    let (x1, y1, x2, y2) = rect.effective_bounds();

    let inside_w = (x2.min(room_width) - x1.max(0.0)).max(0.0);
    let inside_h = (y2.min(room_height) - y1.max(0.0)).max(0.0);

    // Total area from the same bound differences as the inside area, so the
    // subtraction is exactly zero for a contained rectangle. `rect.area()`
    // computes `width * height`, which can differ from `(x2 - x1) * (y2 - y1)`
    // by a rounding ulp at arbitrary offsets.
    (x2 - x1) * (y2 - y1) - inside_w * inside_h
}

/// Minimum distance from the rectangle's effective bounds to the nearest
/// room wall. Negative when the rectangle extends past a wall.
pub fn min_wall_distance(rect: &Rect, room_width: f64, room_height: f64) -> f64 {
    let (x1, y1, x2, y2) = rect.effective_bounds();
    let left = x1;
    let right = room_width - x2;
    let bottom = y1;
    let top = room_height - y2;
    left.min(right).min(bottom).min(top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_swaps_effective_size() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0).with_rotation(Rotation::R90);
        assert_eq!(rect.effective_size(), (10.0, 20.0));

        let rect = rect.with_rotation(Rotation::R180);
        assert_eq!(rect.effective_size(), (20.0, 10.0));
    }

    #[test]
    fn test_overlap_area_positive() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!((overlap_area(&a, &b) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_edges_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
        assert_eq!(overlap_area(&a, &b), 0.0);
    }

    #[test]
    fn test_overlap_respects_rotation() {
        // 20x5 rotated 90 becomes 5x20, no longer reaching x=15
        let a = Rect::new(0.0, 0.0, 20.0, 5.0).with_rotation(Rotation::R90);
        let b = Rect::new(15.0, 0.0, 5.0, 5.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_contained_flush_against_wall() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(contained_in(&rect, 100.0, 50.0));

        let rect = Rect::new(0.0, 0.1, 100.0, 50.0);
        assert!(!contained_in(&rect, 100.0, 50.0));
    }

    #[test]
    fn test_outside_area_partial() {
        // Half sticks out to the left
        let rect = Rect::new(-5.0, 0.0, 10.0, 10.0);
        assert!((outside_area(&rect, 100.0, 100.0) - 50.0).abs() < 1e-9);

        // Fully inside
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(outside_area(&rect, 100.0, 100.0), 0.0);
    }

    #[test]
    fn test_outside_area_exactly_zero_when_contained() {
        // Offsets that are not representable sums of the dimensions can leave
        // a residual ulp when total and inside areas come from different
        // expressions. Contained must always mean exactly zero.
        let rect = Rect::new(76.200_000_000_000_07, 33.3, 180.0, 120.0);
        assert!(contained_in(&rect, 400.0, 300.0));
        assert_eq!(outside_area(&rect, 400.0, 300.0), 0.0);

        for i in 0..100 {
            let x = 0.1 + i as f64 * 2.071;
            let rect = Rect::new(x, x / 3.0, 50.0, 40.0);
            assert!(contained_in(&rect, 400.0, 300.0));
            assert_eq!(outside_area(&rect, 400.0, 300.0), 0.0);
        }
    }

    #[test]
    fn test_min_wall_distance() {
        let rect = Rect::new(10.0, 5.0, 20.0, 20.0);
        assert!((min_wall_distance(&rect, 100.0, 100.0) - 5.0).abs() < 1e-9);
    }
}
