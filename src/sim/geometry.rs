//! Axis-aligned rectangles and the viewport

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True when `self` lies entirely within `other`
    pub fn inside(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}

/// Overlap test. Rectangles whose edges touch count as intersecting.
///
/// The four comparisons mirror each other, so `intersects(a, b) == intersects(b, a)`.
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    !(b.x > a.right() || b.right() < a.x || b.y > a.bottom() || b.bottom() < a.y)
}

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Compact layout for phones and narrow windows
    pub fn is_narrow(&self) -> bool {
        self.width < crate::consts::NARROW_VIEWPORT
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
    }

    #[test]
    fn test_edge_touching_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(intersects(&a, &right));
        assert!(intersects(&right, &a));
        assert!(intersects(&a, &below));
        assert!(intersects(&below, &a));
    }

    #[test]
    fn test_separated() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!intersects(&a, &Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!intersects(&a, &Rect::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn test_inside() {
        let vp = Viewport::new(100.0, 100.0).rect();
        assert!(Rect::new(0.0, 0.0, 100.0, 100.0).inside(&vp));
        assert!(!Rect::new(-1.0, 0.0, 20.0, 20.0).inside(&vp));
        assert!(!Rect::new(90.0, 90.0, 20.0, 5.0).inside(&vp));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn intersection_is_symmetric(a in rect_strategy(), b in rect_strategy()) {
            prop_assert_eq!(intersects(&a, &b), intersects(&b, &a));
        }

        #[test]
        fn rect_intersects_itself(a in rect_strategy()) {
            prop_assert!(intersects(&a, &a));
        }
    }
}
