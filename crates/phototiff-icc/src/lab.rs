//! CIE L*a*b* to sRGB conversion.
//!
//! Two strategies:
//!
//! - **ICC**: the image carries an embedded Lab profile, and Little CMS
//!   converts against sRGB.
//! - **Formula**: no usable profile. Lab (D50) is taken to XYZ, adapted to
//!   D65 with the Bradford matrix, projected to linear sRGB and companded.
//!
//! Both take Lab in nominal units (`L` in `0..=100`, signed `a`/`b`) and
//! return sRGB in `0..=1`.

use crate::{IccResult, Intent, Profile, ProfileColorSpace, Transform};
use tracing::{debug, warn};

/// D50 reference white (XYZ).
const D50_WHITE: [f32; 3] = [0.964_22, 1.0, 0.825_21];

/// CIE epsilon (216 / 24389).
const CIE_EPSILON: f32 = 216.0 / 24389.0;

/// CIE kappa (24389 / 27).
const CIE_KAPPA: f32 = 24389.0 / 27.0;

/// Bradford chromatic adaptation, D50 to D65.
const BRADFORD_D50_TO_D65: [[f32; 3]; 3] = [
    [0.955_576_6, -0.023_039_3, 0.063_163_6],
    [-0.028_289_5, 1.009_941_6, 0.021_007_7],
    [0.012_298_2, -0.020_483_0, 1.329_909_8],
];

/// XYZ (D65) to linear sRGB.
const XYZ_TO_LINEAR_SRGB: [[f32; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

#[inline]
fn mul3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

#[inline]
fn srgb_encode(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Converts Lab (D50) to XYZ (D50).
pub fn lab_to_xyz(lab: [f32; 3]) -> [f32; 3] {
    let [l, a, b] = lab;
    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let fx3 = fx * fx * fx;
    let fz3 = fz * fz * fz;

    let xr = if fx3 > CIE_EPSILON { fx3 } else { (116.0 * fx - 16.0) / CIE_KAPPA };
    let yr = if l > CIE_KAPPA * CIE_EPSILON { fy * fy * fy } else { l / CIE_KAPPA };
    let zr = if fz3 > CIE_EPSILON { fz3 } else { (116.0 * fz - 16.0) / CIE_KAPPA };

    [xr * D50_WHITE[0], yr * D50_WHITE[1], zr * D50_WHITE[2]]
}

/// Context-free Lab (D50) to sRGB, clamped to `[0, 1]`.
pub fn lab_to_srgb(lab: [f32; 3]) -> [f32; 3] {
    let xyz_d65 = mul3(&BRADFORD_D50_TO_D65, lab_to_xyz(lab));
    let linear = mul3(&XYZ_TO_LINEAR_SRGB, xyz_d65);
    linear.map(|c| srgb_encode(c.max(0.0)).clamp(0.0, 1.0))
}

/// Lab to sRGB converter, built once per frame and shared across strips.
#[derive(Debug)]
pub enum LabConverter {
    /// Conversion through an embedded Lab profile.
    Icc(Transform<3>),
    /// Built-in formula.
    Formula,
}

impl LabConverter {
    /// Picks the conversion for a frame.
    ///
    /// Uses the embedded profile when it parses and describes Lab data;
    /// anything else falls back to [`LabConverter::Formula`].
    pub fn for_frame(icc: Option<&[u8]>, intent: Intent) -> Self {
        let Some(data) = icc else {
            return Self::Formula;
        };
        match Self::from_icc(data, intent) {
            Ok(converter) => converter,
            Err(err) => {
                warn!(%err, "embedded profile unusable for Lab, using formula");
                Self::Formula
            }
        }
    }

    /// Builds an ICC converter from embedded profile bytes.
    ///
    /// # Errors
    ///
    /// Fails if the bytes don't parse, the profile isn't Lab, or the
    /// transform can't be built.
    pub fn from_icc(data: &[u8], intent: Intent) -> IccResult<Self> {
        let profile = Profile::from_icc(data)?;
        profile.expect_space(ProfileColorSpace::Lab)?;
        Self::from_profile(&profile, intent)
    }

    /// Builds an ICC converter from a Lab profile.
    pub fn from_profile(profile: &Profile, intent: Intent) -> IccResult<Self> {
        let transform = Transform::new(profile, &Profile::srgb(), intent)?;
        debug!(profile = %profile.description(), "Lab converter using ICC profile");
        Ok(Self::Icc(transform))
    }

    /// Returns true if conversion goes through Little CMS.
    pub fn is_icc(&self) -> bool {
        matches!(self, Self::Icc(_))
    }

    /// Converts a single Lab value.
    pub fn convert(&self, lab: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Icc(transform) => {
                let mut out = [[0.0f32; 3]];
                transform.apply_row(&[lab], &mut out);
                out[0].map(|c| c.clamp(0.0, 1.0))
            }
            Self::Formula => lab_to_srgb(lab),
        }
    }

    /// Converts a row of Lab values in one call.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    pub fn convert_row(&self, lab: &[[f32; 3]], rgb: &mut [[f32; 3]]) {
        assert_eq!(lab.len(), rgb.len(), "source and dest must have same length");
        match self {
            Self::Icc(transform) => {
                transform.apply_row(lab, rgb);
                for px in rgb.iter_mut() {
                    *px = px.map(|c| c.clamp(0.0, 1.0));
                }
            }
            Self::Formula => {
                for (dst, src) in rgb.iter_mut().zip(lab) {
                    *dst = lab_to_srgb(*src);
                }
            }
        }
    }
}
