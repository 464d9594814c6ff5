//! Rectangle type for addressing image blocks.
//!
//! A TIFF strip or tile lands in a rectangular region of the destination
//! image. [`Rect`] describes that region.
//!
//! # Coordinate System
//!
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! # Usage
//!
//! ```rust
//! use phototiff_core::Rect;
//!
//! let strip = Rect::new(0, 16, 640, 16);
//! assert_eq!(strip.bottom(), 32);
//! assert!(Rect::from_size(640, 480).contains_rect(&strip));
//! ```

/// A rectangle with origin and dimensions.
///
/// Right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// X coordinate of the left edge.
    pub x: u32,
    /// Y coordinate of the top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns the exclusive right edge.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the exclusive bottom edge.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Returns true if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(1, 2, 3, 4);
        assert_eq!(r.right(), 4);
        assert_eq!(r.bottom(), 6);
        assert!(!r.is_empty());
        assert!(Rect::new(5, 5, 0, 3).is_empty());
    }

    #[test]
    fn test_contains_rect() {
        let outer = Rect::from_size(6, 6);
        assert!(outer.contains_rect(&Rect::new(1, 1, 4, 4)));
        assert!(outer.contains_rect(&outer));
        assert!(!outer.contains_rect(&Rect::new(3, 0, 4, 1)));
    }
}
