//! Error types for phototiff-core operations.
//!
//! The [`Error`] enum covers the recoverable failures of buffer handling:
//! constructing images from foreign data and carving regions out of them.
//! Decoder contract violations (writing outside a view, undersized input)
//! are not represented here; they panic at the call site.
//!
//! # Usage
//!
//! ```rust
//! use phototiff_core::{Error, Image, Luma, Rect};
//!
//! let mut img: Image<Luma<u8>> = Image::new(4, 4);
//! let err = img.split_regions_mut(&[Rect::new(2, 0, 4, 4)]).unwrap_err();
//! assert!(matches!(err, Error::InvalidRegion { .. }));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::image::Image`] - Buffer construction and region splitting
//! - `phototiff` - wrapped by `TiffError::Core`

use crate::rect::Rect;
use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Region extends beyond image bounds.
    ///
    /// Returned when a [`crate::rect::Rect`] doesn't fit within the
    /// image dimensions.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Image dimensions don't agree with the supplied data.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Why the dimensions were rejected
        reason: String,
    },

    /// Two regions requested from an image share at least one pixel.
    #[error("region {second:?} overlaps region {first:?}")]
    OverlappingRegions {
        /// The region that claimed the pixels first
        first: Rect,
        /// The region that collided with it
        second: Rect,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_message() {
        let err = Error::invalid_region(2, 2, 10, 10, 8, 8);
        let msg = err.to_string();
        assert!(msg.contains("10x10"));
        assert!(msg.contains("8x8"));
    }

    #[test]
    fn test_dimensions_message() {
        let err = Error::invalid_dimensions(4, 3, "expected 12 pixels, got 11");
        assert!(err.to_string().contains("got 11"));
    }
}
