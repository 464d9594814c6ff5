//! YCbCr to RGB conversion.
//!
//! Construction precomputes two stages:
//!
//! 1. A per-channel coding range expander mapping raw codes linearly from
//!    the `ReferenceBlackWhite` range onto the nominal range (255 for Y,
//!    127 around zero for Cb/Cr).
//! 2. Scalar coefficients derived from the luma weights.
//!
//! Per pixel this leaves a handful of multiply-adds, a round (ties to
//! even) and a clamp.
//!
//! ```
//! use phototiff::YCbCrConverter;
//!
//! let converter = YCbCrConverter::new(None, None).unwrap();
//! assert_eq!(converter.convert(255, 128, 128), [255, 255, 255]);
//! assert_eq!(converter.convert(0, 128, 128), [0, 0, 0]);
//! ```

use crate::error::{TiffError, TiffResult};
use crate::tags::Rational;

/// Full-range BT.601 reference black/white: Y 0..255, Cb/Cr 128..255.
///
/// This is the TIFF default when the tag is absent. Codes pass through
/// unscaled, so Y=235 stays 235. Studio-range (BT.601 "video") data,
/// where Y=235 is white and Y=16 is black, needs an explicit
/// `ReferenceBlackWhite` of `[16, 235, 128, 240, 128, 240]`.
pub const DEFAULT_REFERENCE_BLACK_WHITE: [Rational; 6] = [
    Rational::from_int(0),
    Rational::from_int(255),
    Rational::from_int(128),
    Rational::from_int(255),
    Rational::from_int(128),
    Rational::from_int(255),
];

/// BT.601 luma weights.
pub const DEFAULT_LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Linear map from a reference code range onto the nominal range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodingRangeExpander {
    f1: f32,
    f2: f32,
}

impl CodingRangeExpander {
    /// Builds the expander for `[black, white]` mapped onto `coding_range`.
    pub fn new(black: Rational, white: Rational, coding_range: u32) -> TiffResult<Self> {
        let black = black.to_f32();
        let white = white.to_f32();
        if white == black {
            return Err(TiffError::not_supported(
                "reference black equal to reference white",
            ));
        }
        let f1 = coding_range as f32 / (white - black);
        Ok(Self { f1, f2: f1 * black })
    }

    /// Expands one code.
    #[inline]
    pub fn expand(&self, code: f32) -> f32 {
        code * self.f1 - self.f2
    }
}

/// Linear YCbCr to RGB stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrToRgb {
    cr2r: f32,
    cb2b: f32,
    y2g: f32,
    cr2g: f32,
    cb2g: f32,
}

impl YCbCrToRgb {
    /// Derives coefficients from luma weights.
    ///
    /// # Errors
    ///
    /// [`TiffError::DegenerateYCbCrCoefficients`] if a weight is not finite
    /// or the green weight is not positive; green is solved for last.
    pub fn new(luma_red: f32, luma_green: f32, luma_blue: f32) -> TiffResult<Self> {
        let finite = [luma_red, luma_green, luma_blue].iter().all(|w| w.is_finite());
        if !finite || luma_green <= 0.0 {
            return Err(TiffError::DegenerateYCbCrCoefficients {
                red: luma_red,
                green: luma_green,
                blue: luma_blue,
            });
        }
        Ok(Self {
            cr2r: 2.0 - 2.0 * luma_red,
            cb2b: 2.0 - 2.0 * luma_blue,
            y2g: (1.0 - luma_blue - luma_red) / luma_green,
            cr2g: 2.0 * luma_red * (luma_red - 1.0) / luma_green,
            cb2g: 2.0 * luma_blue * (luma_blue - 1.0) / luma_green,
        })
    }

    /// Converts expanded values to clamped 8-bit RGB.
    #[inline]
    pub fn convert(&self, y: f32, cb: f32, cr: f32) -> [u8; 3] {
        [
            round_and_clamp(cr * self.cr2r + y),
            round_and_clamp(self.y2g * y + self.cr2g * cr + self.cb2g * cb),
            round_and_clamp(cb * self.cb2b + y),
        ]
    }
}

#[inline]
fn round_and_clamp(value: f32) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// YCbCr to RGB converter for 8-bit codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrConverter {
    y: CodingRangeExpander,
    cb: CodingRangeExpander,
    cr: CodingRangeExpander,
    rgb: YCbCrToRgb,
}

impl YCbCrConverter {
    /// Builds the converter from the optional tag values.
    ///
    /// # Errors
    ///
    /// - [`TiffError::InvalidReferenceBlackWhite`] unless 6 values are given
    /// - [`TiffError::InvalidYCbCrCoefficients`] unless 3 values are given
    /// - [`TiffError::DegenerateYCbCrCoefficients`] for weights with no inverse
    pub fn new(
        reference_black_white: Option<&[Rational]>,
        coefficients: Option<&[Rational]>,
    ) -> TiffResult<Self> {
        let reference = reference_black_white.unwrap_or(&DEFAULT_REFERENCE_BLACK_WHITE);
        if reference.len() != 6 {
            return Err(TiffError::InvalidReferenceBlackWhite(reference.len()));
        }

        let luma = match coefficients {
            Some(c) if c.len() != 3 => return Err(TiffError::InvalidYCbCrCoefficients(c.len())),
            Some(c) => [c[0].to_f32(), c[1].to_f32(), c[2].to_f32()],
            None => DEFAULT_LUMA,
        };

        Ok(Self {
            y: CodingRangeExpander::new(reference[0], reference[1], 255)?,
            cb: CodingRangeExpander::new(reference[2], reference[3], 127)?,
            cr: CodingRangeExpander::new(reference[4], reference[5], 127)?,
            rgb: YCbCrToRgb::new(luma[0], luma[1], luma[2])?,
        })
    }

    /// Converts one YCbCr triplet to RGB.
    #[inline]
    pub fn convert(&self, y: u8, cb: u8, cr: u8) -> [u8; 3] {
        let y = self.y.expand(y as f32);
        let cb = self.cb.expand(cb as f32);
        let cr = self.cr.expand(cr as f32);
        self.rgb.convert(y, cb, cr)
    }
}
