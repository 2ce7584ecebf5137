//! Real-valued rectangles in virtual screen space.
//!
//! Monitor positions reported by a display server are integral, but the
//! placement arithmetic divides extents by two and by scale factors, so the
//! rectangle keeps `f64` precision and only the compositor converts to whole
//! pixels.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle: top-left corner plus extent.
///
/// Used both for the virtual screen bounds and for a single monitor's bounds
/// inside those. The fields are private so a rectangle cannot change after
/// construction; use the accessors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rectangle {
    /// Creates a rectangle. No validation is performed; see [`Rectangle::is_degenerate`].
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle anchored at the origin.
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// X coordinate of the top-left corner.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate of the top-left corner.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rightmost X coordinate (exclusive).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` when the rectangle cannot hold a single whole pixel.
    ///
    /// Non-finite coordinates count as degenerate as well, since no pixel
    /// offset can be derived from them.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !finite || self.width < 1.0 || self.height < 1.0
    }

    /// Whole-pixel size of the rectangle, rounded up so no fractional edge is lost.
    ///
    /// Negative or non-finite extents saturate to zero.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.width.ceil()), to_pixels(self.height.ceil()))
    }

    /// Returns `true` if this rectangle shares any area with `other`.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Saturating float → pixel count conversion.
fn to_pixels(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}
