//! Device CMYK to sRGB conversion.

use crate::{IccResult, Intent, Profile, ProfileColorSpace, Transform};
use tracing::{debug, warn};

/// Naive device CMYK to RGB: `R = (1 - C)(1 - K)` and so on.
#[inline]
pub fn cmyk_to_rgb(cmyk: [f32; 4]) -> [f32; 3] {
    let [c, m, y, k] = cmyk.map(|v| v.clamp(0.0, 1.0));
    let white = 1.0 - k;
    [(1.0 - c) * white, (1.0 - m) * white, (1.0 - y) * white]
}

/// CMYK to sRGB converter.
///
/// Input ink values are normalized to `[0, 1]` in either variant.
#[derive(Debug)]
pub enum CmykConverter {
    /// Conversion through an embedded CMYK output profile.
    Icc(Transform<4>),
    /// [`cmyk_to_rgb`].
    Formula,
}

impl CmykConverter {
    /// Picks the conversion for a frame; unusable profiles fall back to
    /// [`CmykConverter::Formula`].
    pub fn for_frame(icc: Option<&[u8]>, intent: Intent) -> Self {
        let Some(data) = icc else {
            return Self::Formula;
        };
        match Self::from_icc(data, intent) {
            Ok(converter) => converter,
            Err(err) => {
                warn!(%err, "embedded profile unusable for CMYK, using formula");
                Self::Formula
            }
        }
    }

    /// Builds an ICC converter from embedded profile bytes.
    pub fn from_icc(data: &[u8], intent: Intent) -> IccResult<Self> {
        let profile = Profile::from_icc(data)?;
        profile.expect_space(ProfileColorSpace::Cmyk)?;
        let transform = Transform::new(&profile, &Profile::srgb(), intent)?;
        debug!(profile = %profile.description(), "CMYK converter using ICC profile");
        Ok(Self::Icc(transform))
    }

    /// Returns true if conversion goes through Little CMS.
    pub fn is_icc(&self) -> bool {
        matches!(self, Self::Icc(_))
    }

    /// Converts a row of normalized CMYK values.
    ///
    /// `scratch` is reused for the scaled ink values of the ICC path.
    pub fn convert_row(&self, cmyk: &[[f32; 4]], rgb: &mut [[f32; 3]], scratch: &mut Vec<[f32; 4]>) {
        assert_eq!(cmyk.len(), rgb.len(), "source and dest must have same length");
        match self {
            Self::Icc(transform) => {
                // Little CMS float CMYK is ink percentage
                scratch.clear();
                scratch.extend(cmyk.iter().map(|px| px.map(|v| v * 100.0)));
                transform.apply_row(scratch.as_slice(), rgb);
                for px in rgb.iter_mut() {
                    *px = px.map(|c| c.clamp(0.0, 1.0));
                }
            }
            Self::Formula => {
                for (dst, src) in rgb.iter_mut().zip(cmyk) {
                    *dst = cmyk_to_rgb(*src);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_formula() {
        assert_eq!(cmyk_to_rgb([0.0, 0.0, 0.0, 0.0]), [1.0, 1.0, 1.0]);
        assert_eq!(cmyk_to_rgb([0.0, 0.0, 0.0, 1.0]), [0.0, 0.0, 0.0]);
        assert_eq!(cmyk_to_rgb([1.0, 0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);

        let rgb = cmyk_to_rgb([0.5, 0.25, 0.0, 0.2]);
        assert_relative_eq!(rgb[0], 0.4);
        assert_relative_eq!(rgb[1], 0.6);
        assert_relative_eq!(rgb[2], 0.8);
    }

    #[test]
    fn test_formula_row() {
        let conv = CmykConverter::for_frame(None, Intent::Perceptual);
        assert!(!conv.is_icc());

        let mut rgb = [[0.0f32; 3]; 2];
        let mut scratch = Vec::new();
        conv.convert_row(&[[0.0; 4], [0.0, 0.0, 0.0, 1.0]], &mut rgb, &mut scratch);
        assert_eq!(rgb, [[1.0, 1.0, 1.0], [0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_rgb_profile_rejected() {
        let srgb = Profile::srgb().to_icc().unwrap();
        assert!(CmykConverter::from_icc(&srgb, Intent::Perceptual).is_err());
        assert!(!CmykConverter::for_frame(Some(&srgb), Intent::Perceptual).is_icc());
    }
}
