//! Error types for decoder selection.
//!
//! Every variant here is a format error: the frame's tags describe
//! something these decoders cannot handle, and no pixel has been touched.
//! Bad pixel *values* are tolerated by the decoders themselves, and
//! contract violations (undersized blocks, rectangles outside the
//! destination) panic.

use crate::tags::TiffColorType;
use thiserror::Error;

/// Result type for decoder selection.
pub type TiffResult<T> = Result<T, TiffError>;

/// Errors raised while selecting or constructing a decoder.
#[derive(Debug, Error)]
pub enum TiffError {
    /// The color type isn't handled by this entry point.
    #[error("invalid color type: {0:?}")]
    InvalidColorType(TiffColorType),

    /// Bits per sample don't fit the color type.
    #[error("{color_type:?} does not support bits per sample {bits:?}")]
    BitsPerSample {
        /// Requested color type.
        color_type: TiffColorType,
        /// Bits per sample as given by the tags.
        bits: Vec<u16>,
    },

    /// Bits per sample tag is empty or has too many entries.
    #[error("bits per sample must have 1 to 4 entries, got {0}")]
    InvalidBitsPerSample(usize),

    /// Palette color without a color map.
    #[error("palette color image is missing its color map")]
    MissingColorMap,

    /// A color map supplied for a non-palette color type.
    #[error("{0:?} does not use a color map")]
    UnexpectedColorMap(TiffColorType),

    /// Color map entry count doesn't match `2^bits`.
    #[error("color map has {actual} entries, expected {expected}")]
    InvalidColorMap {
        /// `2^bitsPerSample`
        expected: usize,
        /// Entries actually present
        actual: usize,
    },

    /// Reference black/white must have 6 values.
    #[error("reference black/white must have 6 values, got {0}")]
    InvalidReferenceBlackWhite(usize),

    /// YCbCr coefficients must have 3 values.
    #[error("YCbCr coefficients must have 3 values, got {0}")]
    InvalidYCbCrCoefficients(usize),

    /// YCbCr luma weights that cannot be inverted.
    #[error("YCbCr coefficients {red}, {green}, {blue} are degenerate; green must be positive and all finite")]
    DegenerateYCbCrCoefficients {
        /// Red weight
        red: f32,
        /// Green weight
        green: f32,
        /// Blue weight
        blue: f32,
    },

    /// Subsampling factors outside {1, 2, 4}.
    #[error("invalid YCbCr subsampling {horizontal}x{vertical}")]
    InvalidSubsampling {
        /// Horizontal factor
        horizontal: u16,
        /// Vertical factor
        vertical: u16,
    },

    /// Photometric interpretation no decoder exists for.
    #[error("unsupported photometric interpretation: {0}")]
    UnsupportedPhotometric(String),

    /// Combination recognized but not decoded.
    #[error("not yet supported: {0}")]
    NotYetSupported(String),

    /// ICC profile failure.
    #[error(transparent)]
    Icc(#[from] phototiff_icc::IccError),

    /// Buffer handling failure.
    #[error(transparent)]
    Core(#[from] phototiff_core::Error),
}

impl TiffError {
    /// Creates a [`TiffError::InvalidColorType`] error.
    #[inline]
    pub fn invalid_color_type(color_type: TiffColorType) -> Self {
        Self::InvalidColorType(color_type)
    }

    /// Creates a [`TiffError::BitsPerSample`] error.
    #[inline]
    pub fn bits_per_sample(color_type: TiffColorType, bits: &[u16]) -> Self {
        Self::BitsPerSample {
            color_type,
            bits: bits.to_vec(),
        }
    }

    /// Creates a [`TiffError::NotYetSupported`] error.
    #[inline]
    pub fn not_supported(what: impl Into<String>) -> Self {
        Self::NotYetSupported(what.into())
    }
}
