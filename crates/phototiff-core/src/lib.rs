//! # phototiff-core
//!
//! Core pixel and buffer types shared by the phototiff decoders.
//!
//! - [`PixelFormat`] - Numeric channel types (u8, u16, f16, f32)
//! - [`Pixel`], [`Rgb`], [`Rgba`], [`Luma`] - Destination pixel types
//! - [`Image`], [`ImageViewMut`] - Row-major pixel buffer and mutable row bands
//! - [`Rect`] - Block placement within an image
//!
//! ## Destination Pixels
//!
//! Decoders never know the concrete destination layout. They hand a pixel
//! to [`Pixel`] in the cheapest form they have: exact 8-bit or 16-bit
//! integers for the fast paths, normalized `[f32; 4]` otherwise.
//!
//! ```
//! use phototiff_core::prelude::*;
//!
//! let px: Rgba<u16> = Pixel::from_rgb8([255, 0, 128]);
//! assert_eq!(px, Rgba::new(65535, 0, 32896, 65535));
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! phototiff-core (this crate)
//!    ^
//!    |
//!    +-- phototiff (decoders, factory)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

// Re-exports for convenience
pub use error::*;
pub use image::*;
pub use pixel::{
    unpremultiply, luminance_rec709, Luma, Pixel, PixelFormat, Rgb, Rgba,
    REC709_LUMA_B, REC709_LUMA_G, REC709_LUMA_R,
};
pub use rect::*;

/// Prelude module for convenient imports.
///
/// ```
/// use phototiff_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, ImageViewMut};
    pub use crate::pixel::{Luma, Pixel, PixelFormat, Rgb, Rgba};
    pub use crate::rect::Rect;
}
