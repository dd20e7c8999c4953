// Pixel rectangles and unit-normalized coordinates.
//
// Interactive state is always stored normalized to `[0,1]` relative to the
// frame it was captured in. Pixel values are derived at render/report time
// from whatever size is current, so resizing a window never invalidates a
// box or a point.

use serde::{Deserialize, Serialize};

/// Absolute pixel rectangle (top-left origin).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin with the given (height, width).
    pub fn from_hw((h, w): (usize, usize)) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w as i32 && y < self.y + self.h as i32
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }

    pub fn hw(&self) -> (usize, usize) {
        (self.h, self.w)
    }
}

/// Clamp to `[0,1]`, mapping NaN/inf to 0 so bad input can't poison state.
#[inline]
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

#[inline]
pub fn norm_from_px(px: i32, len: usize) -> f32 {
    if len <= 1 {
        return 0.0;
    }
    clamp_unit(px as f32 / (len - 1) as f32)
}

#[inline]
pub fn px_from_norm(norm: f32, len: usize) -> i32 {
    if len <= 1 {
        return 0;
    }
    (clamp_unit(norm) * (len - 1) as f32).round() as i32
}

/// A point in normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct XYNorm {
    pub x: f32,
    pub y: f32,
}

impl XYNorm {
    pub const CENTER: XYNorm = XYNorm { x: 0.5, y: 0.5 };

    /// Build a point, clamping each axis into `[0,1]`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: clamp_unit(x), y: clamp_unit(y) }
    }

    /// Normalize a pixel position inside a frame of width `w` and height `h`.
    pub fn from_px(x: i32, y: i32, w: usize, h: usize) -> Self {
        Self { x: norm_from_px(x, w), y: norm_from_px(y, h) }
    }

    pub fn to_px(self, w: usize, h: usize) -> (i32, i32) {
        (px_from_norm(self.x, w), px_from_norm(self.y, h))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for XYNorm {
    fn from((x, y): (f32, f32)) -> Self {
        XYNorm::new(x, y)
    }
}

/// Box given by its top-left (`xy1`) and bottom-right (`xy2`) corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxNorm {
    pub xy1: XYNorm,
    pub xy2: XYNorm,
}

impl BoxNorm {
    pub const FULL: BoxNorm = BoxNorm { xy1: XYNorm { x: 0.0, y: 0.0 }, xy2: XYNorm { x: 1.0, y: 1.0 } };

    /// Build from any two opposite corners; the result is ordered and clamped.
    pub fn new(a: XYNorm, b: XYNorm) -> Self {
        let (a, b) = (XYNorm::new(a.x, a.y), XYNorm::new(b.x, b.y));
        Self {
            xy1: XYNorm { x: a.x.min(b.x), y: a.y.min(b.y) },
            xy2: XYNorm { x: a.x.max(b.x), y: a.y.max(b.y) },
        }
    }

    pub fn width(&self) -> f32 {
        self.xy2.x - self.xy1.x
    }

    pub fn height(&self) -> f32 {
        self.xy2.y - self.xy1.y
    }

    pub fn contains(&self, p: XYNorm) -> bool {
        p.x >= self.xy1.x && p.x <= self.xy2.x && p.y >= self.xy1.y && p.y <= self.xy2.y
    }

    /// A box is usable when it is finite, inside the unit square and at least
    /// `min_px` wide and tall once mapped onto a `w` x `h` image.
    pub fn is_valid(&self, w: usize, h: usize, min_px: f32) -> bool {
        let in_unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        let corners_ok = [self.xy1.x, self.xy1.y, self.xy2.x, self.xy2.y].into_iter().all(in_unit);
        corners_ok && self.width().abs() * w as f32 >= min_px && self.height().abs() * h as f32 >= min_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_norm_conversion_uses_last_pixel_as_one() {
        assert_eq!(norm_from_px(0, 101), 0.0);
        assert_eq!(norm_from_px(100, 101), 1.0);
        assert_eq!(px_from_norm(0.3, 101), 30);
        assert_eq!(norm_from_px(5, 1), 0.0);
    }

    #[test]
    fn nan_and_out_of_range_are_clamped() {
        let p = XYNorm::new(f32::NAN, 1.7);
        assert_eq!(p, XYNorm { x: 0.0, y: 1.0 });
        assert_eq!(norm_from_px(-20, 50), 0.0);
    }

    #[test]
    fn box_orders_its_corners() {
        let b = BoxNorm::new(XYNorm::new(0.8, 0.1), XYNorm::new(0.2, 0.6));
        assert_eq!(b.xy1, XYNorm::new(0.2, 0.1));
        assert_eq!(b.xy2, XYNorm::new(0.8, 0.6));
    }

    #[test]
    fn validity_requires_min_pixel_size_on_both_axes() {
        let b = BoxNorm::new(XYNorm::new(0.0, 0.0), XYNorm::new(0.04, 0.5));
        assert!(!b.is_valid(100, 100, 5.0)); // 4px wide
        assert!(b.is_valid(200, 100, 5.0)); // 8px wide
        assert!(BoxNorm::FULL.is_valid(5, 5, 5.0));
        let bad = BoxNorm { xy1: XYNorm { x: f32::NAN, y: 0.0 }, xy2: XYNorm { x: 1.0, y: 1.0 } };
        assert!(!bad.is_valid(100, 100, 5.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 20, 5, 5);
        assert!(r.contains(10, 20));
        assert!(r.contains(14, 24));
        assert!(!r.contains(15, 24));
        assert!(r.translate(5, 0).contains(15, 24));
    }
}
