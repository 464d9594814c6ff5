//! ICC profile wrapper.

use crate::{IccError, IccResult};
use lcms2::{CIExyY, ColorSpaceSignature, GlobalContext, Profile as LcmsProfile};

/// Color space of an ICC profile's device side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileColorSpace {
    /// Three-channel RGB.
    Rgb,
    /// Four-channel CMYK.
    Cmyk,
    /// Single-channel gray.
    Gray,
    /// CIE L*a*b*.
    Lab,
    /// Anything else (XYZ, YCbCr, n-color, ...).
    Other,
}

impl ProfileColorSpace {
    /// Number of float channels a transform reads for this space.
    pub fn channels(self) -> Option<usize> {
        match self {
            Self::Rgb | Self::Lab => Some(3),
            Self::Cmyk => Some(4),
            Self::Gray => Some(1),
            Self::Other => None,
        }
    }
}

impl std::fmt::Display for ProfileColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Rgb => "RGB",
            Self::Cmyk => "CMYK",
            Self::Gray => "gray",
            Self::Lab => "Lab",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// An ICC color profile.
///
/// Profiles come either from the bytes embedded in an image (the TIFF
/// `InterColorProfile` tag) or from one of the built-in constructors.
///
/// # Example
///
/// ```rust
/// use phototiff_icc::{Profile, ProfileColorSpace};
///
/// let srgb = Profile::srgb();
/// assert_eq!(srgb.color_space(), ProfileColorSpace::Rgb);
/// ```
pub struct Profile {
    /// Internal lcms2 profile handle.
    pub(crate) inner: LcmsProfile,
}

impl Profile {
    /// Creates a profile from raw ICC data.
    ///
    /// # Errors
    ///
    /// Returns [`IccError::InvalidProfile`] if the bytes are not a valid profile.
    pub fn from_icc(data: &[u8]) -> IccResult<Self> {
        let inner = LcmsProfile::new_icc(data)
            .map_err(|e| IccError::InvalidProfile(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Creates an sRGB profile.
    ///
    /// The standard IEC 61966-2-1 sRGB color space; the target of every
    /// conversion in this crate.
    pub fn srgb() -> Self {
        Self {
            inner: LcmsProfile::new_srgb(),
        }
    }

    /// Creates a CIE Lab identity profile (v4, D50 white point).
    pub fn lab_d50() -> IccResult<Self> {
        let inner = LcmsProfile::new_lab4_context(GlobalContext::new(), CIExyY::d50())
            .map_err(|e| IccError::CreateFailed(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Returns the device-side color space.
    pub fn color_space(&self) -> ProfileColorSpace {
        match self.inner.color_space() {
            ColorSpaceSignature::RgbData => ProfileColorSpace::Rgb,
            ColorSpaceSignature::CmykData => ProfileColorSpace::Cmyk,
            ColorSpaceSignature::GrayData => ProfileColorSpace::Gray,
            ColorSpaceSignature::LabData => ProfileColorSpace::Lab,
            _ => ProfileColorSpace::Other,
        }
    }

    /// Returns the profile description.
    pub fn description(&self) -> String {
        self.inner
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .unwrap_or_default()
    }

    /// Exports the profile as ICC data.
    pub fn to_icc(&self) -> IccResult<Vec<u8>> {
        self.inner
            .icc()
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }

    /// Fails unless the profile is in `expected` color space.
    pub(crate) fn expect_space(&self, expected: ProfileColorSpace) -> IccResult<()> {
        let actual = self.color_space();
        if actual != expected {
            return Err(IccError::ColorSpaceMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("description", &self.description())
            .field("color_space", &self.color_space())
            .finish()
    }
}
