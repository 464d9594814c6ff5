//! # phototiff-icc
//!
//! Color conversions the TIFF decoders need, built on Little CMS 2.
//!
//! - [`Profile`] - ICC profile loaded from embedded bytes or built in
//! - [`Transform`] - thread-safe float transform into sRGB
//! - [`LabConverter`] - CIE L*a*b* to sRGB (ICC or formula)
//! - [`CmykConverter`] - device CMYK to sRGB (ICC or formula)
//!
//! Converters are built once per frame and shared read-only by every strip
//! decode, so each is `Send + Sync`.
//!
//! # Example
//!
//! ```rust
//! use phototiff_icc::{Intent, LabConverter};
//!
//! let lab = LabConverter::for_frame(None, Intent::Perceptual);
//! let rgb = lab.convert([100.0, 0.0, 0.0]);
//! assert!(rgb.iter().all(|&c| c > 0.99));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cmyk;
mod error;
mod lab;
mod profile;
mod transform;

pub use cmyk::{cmyk_to_rgb, CmykConverter};
pub use error::{IccError, IccResult};
pub use lab::{lab_to_srgb, lab_to_xyz, LabConverter};
pub use profile::{Profile, ProfileColorSpace};
pub use transform::Transform;

/// Rendering intent for color transformations.
///
/// Determines how out-of-gamut colors are handled during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// Compresses the source gamut to fit the destination.
    #[default]
    Perceptual,

    /// Maps in-gamut colors exactly and clips the rest, with white point
    /// mapped to white point.
    RelativeColorimetric,

    /// Maintains saturation at the expense of accuracy.
    Saturation,

    /// Like relative colorimetric but without white point adaptation.
    AbsoluteColorimetric,
}

impl From<Intent> for lcms2::Intent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Perceptual => lcms2::Intent::Perceptual,
            Intent::RelativeColorimetric => lcms2::Intent::RelativeColorimetric,
            Intent::Saturation => lcms2::Intent::Saturation,
            Intent::AbsoluteColorimetric => lcms2::Intent::AbsoluteColorimetric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_converters_shareable() {
        assert_send_sync::<LabConverter>();
        assert_send_sync::<CmykConverter>();
    }

    #[test]
    fn test_intent_default() {
        assert_eq!(Intent::default(), Intent::Perceptual);
        assert!(matches!(
            lcms2::Intent::from(Intent::Saturation),
            lcms2::Intent::Saturation
        ));
    }
}
