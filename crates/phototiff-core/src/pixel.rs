//! Pixel types and channel formats for decoded images.
//!
//! # Types
//!
//! - [`PixelFormat`] - Trait for channel data types (u8, u16, f16, f32)
//! - [`Pixel`] - Trait for destination pixels the decoders write through
//! - [`Rgba`], [`Rgb`], [`Luma`] - Concrete pixel structs
//!
//! # Conversions
//!
//! Integer conversions between 8 and 16 bits are exact in the widening
//! direction (`v * 257`) and round to nearest in the narrowing direction.
//! Float conversions clamp to `[0, 1]` for integer formats and pass through
//! for float formats.
//!
//! ```
//! use phototiff_core::{Pixel, Rgba};
//!
//! let px = Rgba::<u8>::from_rgba16([65535, 32896, 0, 65535]);
//! assert_eq!(px, Rgba::new(255, 128, 0, 255));
//! ```
//!
//! # Memory Layout
//!
//! All pixel types use `#[repr(C)]` for predictable layout.
//!
//! # Dependencies
//!
//! - `half` crate for `f16` support
//!
//! # Used By
//!
//! - [`crate::image::Image`] - image buffers store pixels
//! - `phototiff` - every photometric decoder writes through [`Pixel`]

use half::f16;
use std::fmt;

// ============================================================================
// Rec.709 Luminance Constants
// ============================================================================

/// Rec.709 luminance coefficient for red channel.
///
/// Used in the standard luminance formula: `Y = 0.2126*R + 0.7152*G + 0.0722*B`
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Computes Rec.709 luminance from linear RGB values.
#[inline]
pub fn luminance_rec709(r: f32, g: f32, b: f32) -> f32 {
    REC709_LUMA_R * r + REC709_LUMA_G * g + REC709_LUMA_B * b
}

// ============================================================================
// PixelFormat
// ============================================================================

/// Numeric type of a single pixel channel.
///
/// Implemented for `u8`, `u16`, `f16` and `f32`.
pub trait PixelFormat: Copy + Clone + Default + Send + Sync + PartialOrd + fmt::Debug + 'static {
    /// Convert to f32, normalizing integers to `[0.0, 1.0]`.
    fn to_f32(self) -> f32;

    /// Convert from f32.
    ///
    /// For integers, clamps to `[0.0, 1.0]` and rounds to nearest.
    fn from_f32(v: f32) -> Self;

    /// Convert from an 8-bit channel value.
    fn from_u8(v: u8) -> Self;

    /// Convert from a 16-bit channel value.
    fn from_u16(v: u16) -> Self;
}

impl PixelFormat for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        v
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        // round(v / 257)
        ((v as u32 * 255 + 32895) >> 16) as u8
    }
}

impl PixelFormat for u16 {
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        v as u16 * 257
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        v
    }
}

impl PixelFormat for f16 {
    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        f16::from_f32(v as f32 / 255.0)
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        f16::from_f32(v as f32 / 65535.0)
    }
}

impl PixelFormat for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn from_u8(v: u8) -> Self {
        v as f32 / 255.0
    }

    #[inline]
    fn from_u16(v: u16) -> Self {
        v as f32 / 65535.0
    }
}

// ============================================================================
// Alpha
// ============================================================================

/// Divides color channels by alpha.
///
/// A fully transparent pixel (alpha below `1e-6`) becomes `[0, 0, 0, 0]`.
#[inline]
pub fn unpremultiply(rgba: [f32; 4]) -> [f32; 4] {
    let a = rgba[3];
    if a < 1e-6 {
        return [0.0; 4];
    }
    let inv = 1.0 / a;
    [rgba[0] * inv, rgba[1] * inv, rgba[2] * inv, a]
}

// ============================================================================
// Pixel
// ============================================================================

/// A destination pixel the decoders can write.
///
/// Every constructor has a sensible default in terms of [`from_rgba8`],
/// [`from_rgba16`] or [`from_rgba_f32`]; concrete types override the ones
/// they can serve more exactly.
///
/// [`from_rgba8`]: Pixel::from_rgba8
/// [`from_rgba16`]: Pixel::from_rgba16
/// [`from_rgba_f32`]: Pixel::from_rgba_f32
pub trait Pixel: Copy + Default + Send + Sync + fmt::Debug + 'static {
    /// Channel data type.
    type Channel: PixelFormat;

    /// Number of stored channels.
    const CHANNELS: usize;

    /// Builds a pixel from straight (non-premultiplied) normalized RGBA.
    fn from_rgba_f32(rgba: [f32; 4]) -> Self;

    /// Returns the pixel as normalized RGBA.
    fn to_rgba_f32(&self) -> [f32; 4];

    /// Builds a pixel from 8-bit RGBA.
    fn from_rgba8(rgba: [u8; 4]) -> Self;

    /// Builds a pixel from 16-bit RGBA.
    fn from_rgba16(rgba: [u16; 4]) -> Self;

    /// Builds an opaque pixel from 8-bit RGB.
    #[inline]
    fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::from_rgba8([rgb[0], rgb[1], rgb[2], u8::MAX])
    }

    /// Builds an opaque pixel from 16-bit RGB.
    #[inline]
    fn from_rgb16(rgb: [u16; 3]) -> Self {
        Self::from_rgba16([rgb[0], rgb[1], rgb[2], u16::MAX])
    }

    /// Builds an opaque gray pixel from an 8-bit intensity.
    #[inline]
    fn from_l8(l: u8) -> Self {
        Self::from_rgba8([l, l, l, u8::MAX])
    }

    /// Builds an opaque gray pixel from a 16-bit intensity.
    #[inline]
    fn from_l16(l: u16) -> Self {
        Self::from_rgba16([l, l, l, u16::MAX])
    }

    /// Builds an opaque pixel from normalized RGB.
    #[inline]
    fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        Self::from_rgba_f32([rgb[0], rgb[1], rgb[2], 1.0])
    }

    /// Builds an opaque gray pixel from a normalized intensity.
    #[inline]
    fn from_luma_f32(l: f32) -> Self {
        Self::from_rgba_f32([l, l, l, 1.0])
    }
}

/// RGBA pixel with straight alpha.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgba<T: PixelFormat> {
    /// Red channel value.
    pub r: T,
    /// Green channel value.
    pub g: T,
    /// Blue channel value.
    pub b: T,
    /// Alpha channel value.
    pub a: T,
}

impl<T: PixelFormat> Rgba<T> {
    /// Create a new RGBA pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }
}

impl<T: PixelFormat> Pixel for Rgba<T> {
    type Channel = T;
    const CHANNELS: usize = 4;

    #[inline]
    fn from_rgba_f32(rgba: [f32; 4]) -> Self {
        Self::new(
            T::from_f32(rgba[0]),
            T::from_f32(rgba[1]),
            T::from_f32(rgba[2]),
            T::from_f32(rgba[3]),
        )
    }

    #[inline]
    fn to_rgba_f32(&self) -> [f32; 4] {
        [self.r.to_f32(), self.g.to_f32(), self.b.to_f32(), self.a.to_f32()]
    }

    #[inline]
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(
            T::from_u8(rgba[0]),
            T::from_u8(rgba[1]),
            T::from_u8(rgba[2]),
            T::from_u8(rgba[3]),
        )
    }

    #[inline]
    fn from_rgba16(rgba: [u16; 4]) -> Self {
        Self::new(
            T::from_u16(rgba[0]),
            T::from_u16(rgba[1]),
            T::from_u16(rgba[2]),
            T::from_u16(rgba[3]),
        )
    }
}

/// RGB pixel without alpha. Alpha handed to it is discarded.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb<T: PixelFormat> {
    /// Red channel value.
    pub r: T,
    /// Green channel value.
    pub g: T,
    /// Blue channel value.
    pub b: T,
}

impl<T: PixelFormat> Rgb<T> {
    /// Create a new RGB pixel.
    #[inline]
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }
}

impl<T: PixelFormat> Pixel for Rgb<T> {
    type Channel = T;
    const CHANNELS: usize = 3;

    #[inline]
    fn from_rgba_f32(rgba: [f32; 4]) -> Self {
        Self::new(T::from_f32(rgba[0]), T::from_f32(rgba[1]), T::from_f32(rgba[2]))
    }

    #[inline]
    fn to_rgba_f32(&self) -> [f32; 4] {
        [self.r.to_f32(), self.g.to_f32(), self.b.to_f32(), 1.0]
    }

    #[inline]
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::new(T::from_u8(rgba[0]), T::from_u8(rgba[1]), T::from_u8(rgba[2]))
    }

    #[inline]
    fn from_rgba16(rgba: [u16; 4]) -> Self {
        Self::new(T::from_u16(rgba[0]), T::from_u16(rgba[1]), T::from_u16(rgba[2]))
    }
}

/// Single-channel gray pixel.
///
/// Color input is reduced with Rec.709 weights; gray input is stored
/// exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Luma<T: PixelFormat>(pub T);

impl<T: PixelFormat> Pixel for Luma<T> {
    type Channel = T;
    const CHANNELS: usize = 1;

    #[inline]
    fn from_rgba_f32(rgba: [f32; 4]) -> Self {
        if rgba[0] == rgba[1] && rgba[1] == rgba[2] {
            return Self(T::from_f32(rgba[0]));
        }
        Self(T::from_f32(luminance_rec709(rgba[0], rgba[1], rgba[2])))
    }

    #[inline]
    fn to_rgba_f32(&self) -> [f32; 4] {
        let l = self.0.to_f32();
        [l, l, l, 1.0]
    }

    #[inline]
    fn from_rgba8(rgba: [u8; 4]) -> Self {
        if rgba[0] == rgba[1] && rgba[1] == rgba[2] {
            return Self(T::from_u8(rgba[0]));
        }
        Self::from_rgba_f32([
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            1.0,
        ])
    }

    #[inline]
    fn from_rgba16(rgba: [u16; 4]) -> Self {
        if rgba[0] == rgba[1] && rgba[1] == rgba[2] {
            return Self(T::from_u16(rgba[0]));
        }
        Self::from_rgba_f32([
            rgba[0] as f32 / 65535.0,
            rgba[1] as f32 / 65535.0,
            rgba[2] as f32 / 65535.0,
            1.0,
        ])
    }

    #[inline]
    fn from_l8(l: u8) -> Self {
        Self(T::from_u8(l))
    }

    #[inline]
    fn from_l16(l: u16) -> Self {
        Self(T::from_u16(l))
    }

    #[inline]
    fn from_luma_f32(l: f32) -> Self {
        Self(T::from_f32(l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_u8_from_u16_rounds() {
        assert_eq!(u8::from_u16(0), 0);
        assert_eq!(u8::from_u16(65535), 255);
        assert_eq!(u8::from_u16(32896), 128);
        assert_eq!(u8::from_u16(257 * 77), 77);
        assert_eq!(u8::from_u16(128), 0);
        assert_eq!(u8::from_u16(129), 1);
    }

    #[test]
    fn test_u16_from_u8_exact() {
        assert_eq!(u16::from_u8(255), 65535);
        assert_eq!(u16::from_u8(1), 257);
    }

    #[test]
    fn test_float_formats() {
        assert_relative_eq!(f32::from_u8(51), 0.2, epsilon = 1e-6);
        assert_relative_eq!(f32::from_u16(65535), 1.0);
        assert_relative_eq!(f16::from_u8(255).to_f32(), 1.0);
        // floats are not clamped
        assert_relative_eq!(f32::from_f32(1.5), 1.5);
        assert_eq!(u8::from_f32(1.5), 255);
        assert_eq!(u16::from_f32(-0.5), 0);
    }

    #[test]
    fn test_unpremultiply() {
        let straight = unpremultiply([0.25, 0.0, 0.125, 0.5]);
        assert_relative_eq!(straight[0], 0.5);
        assert_relative_eq!(straight[2], 0.25);
        assert_relative_eq!(straight[3], 0.5);

        assert_eq!(unpremultiply([0.3, 0.2, 0.1, 0.0]), [0.0; 4]);
    }

    #[test]
    fn test_rgba_constructors() {
        assert_eq!(Rgba::<u8>::from_l8(9), Rgba::new(9, 9, 9, 255));
        assert_eq!(Rgba::<u16>::from_rgb8([1, 2, 3]), Rgba::new(257, 514, 771, 65535));
        assert_eq!(
            Rgba::<u8>::from_rgba_f32([1.0, 0.5, 0.0, 1.0]),
            Rgba::new(255, 128, 0, 255)
        );
        let f = Rgba::<f32>::from_l16(65535);
        assert_relative_eq!(f.r, 1.0);
        assert_relative_eq!(f.a, 1.0);
    }

    #[test]
    fn test_rgb_drops_alpha() {
        let px = Rgb::<u8>::from_rgba8([10, 20, 30, 0]);
        assert_eq!(px, Rgb::new(10, 20, 30));
        assert_eq!(px.to_rgba_f32()[3], 1.0);
    }

    #[test]
    fn test_luma() {
        assert_eq!(Luma::<u8>::from_rgb8([77, 77, 77]), Luma(77));
        assert_eq!(Luma::<u16>::from_l16(1234), Luma(1234));
        assert_eq!(Luma::<u8>::from_rgb8([255, 0, 0]), Luma(54));
    }
}
