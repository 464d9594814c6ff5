//! Photometric decoders.
//!
//! One decoder family per photometric interpretation; the bit depth and
//! layout variant lives inside each family. [`TiffColorDecoder`] and
//! [`TiffPlanarColorDecoder`] pair a family decoder with the
//! [`TiffColorType`] it was built for and are what [`crate::create`] and
//! [`crate::create_planar`] return.
//!
//! Every decoder shares one contract:
//!
//! - `decode(data, pixels, left, top, width, height)` writes exactly the
//!   `width * height` pixels of the block rectangle and nothing else
//! - `data` holds the block's samples with rows padded to byte boundaries
//! - a rectangle outside `pixels` or an undersized `data` panics
//!
//! Decoders keep no state between calls, so one instance can decode many
//! blocks concurrently.

mod cielab;
mod cmyk;
mod grayscale;
mod palette;
mod planar;
mod rgb;
mod rgba;
mod ycbcr;

pub use cielab::{CieLabDecoder, CieLabPlanarDecoder, LabDepth};
pub use cmyk::CmykDecoder;
pub use grayscale::{GrayDepth, GrayscaleDecoder};
pub use palette::PaletteDecoder;
pub use planar::{PlanarDepth, RgbPlanarDecoder};
pub use rgb::{RgbDecoder, RgbDepth};
pub use rgba::{RgbaDecoder, RgbaDepth};
pub use ycbcr::{YCbCrDecoder, YCbCrPlanarDecoder};

use crate::tags::{ExtraSamples, TiffColorType};
use phototiff_core::{unpremultiply, ImageViewMut, Pixel, Rect};
use tracing::trace;

/// How the alpha sample relates to the color samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Color is stored as-is.
    #[default]
    Straight,
    /// Color is premultiplied and must be divided by alpha.
    Associated,
}

impl AlphaMode {
    /// Maps the `ExtraSamples` tag; absent or unspecified reads as straight.
    pub fn from_extra_samples(extra: Option<ExtraSamples>) -> Self {
        match extra {
            Some(ExtraSamples::AssociatedAlpha) => Self::Associated,
            _ => Self::Straight,
        }
    }

    /// Converts a decoded pixel to straight alpha.
    #[inline]
    pub fn resolve(self, rgba: [f32; 4]) -> [f32; 4] {
        match self {
            Self::Straight => rgba,
            Self::Associated => unpremultiply(rgba),
        }
    }
}

/// Panics unless the block rectangle lies inside the destination view.
pub(crate) fn check_block<P: Pixel>(
    pixels: &ImageViewMut<'_, P>,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
) {
    let block = Rect::new(left, top, width, height);
    assert!(
        pixels.region().contains_rect(&block),
        "block {block:?} outside destination {:?}",
        pixels.region()
    );
}

/// Panics unless `data` holds at least `needed` bytes.
pub(crate) fn check_input(data: &[u8], needed: usize) {
    assert!(
        data.len() >= needed,
        "block needs {needed} bytes of sample data, got {}",
        data.len()
    );
}

/// Runs `f` over each block row: the destination span and the row's bytes.
///
/// Rows are `row_bytes` apart in `data`.
pub(crate) fn for_each_row<P: Pixel>(
    data: &[u8],
    pixels: &mut ImageViewMut<'_, P>,
    left: u32,
    top: u32,
    width: u32,
    height: u32,
    row_bytes: usize,
    mut f: impl FnMut(&mut [P], &[u8]),
) {
    check_block(pixels, left, top, width, height);
    if width == 0 || height == 0 {
        return;
    }
    check_input(data, row_bytes * height as usize);

    for (y, src) in (top..top + height).zip(data.chunks_exact(row_bytes)) {
        f(pixels.span_mut(y, left, width), src);
    }
}

/// Destination span of one block row.
#[inline]
pub(crate) fn block_row<'a, P: Pixel>(
    pixels: &'a mut ImageViewMut<'_, P>,
    y: u32,
    left: u32,
    width: u32,
) -> &'a mut [P] {
    pixels.span_mut(y, left, width)
}

/// Decoder for single-buffer (chunky) blocks.
#[derive(Debug)]
pub enum ChunkyDecoder {
    /// Black-is-zero and white-is-zero gray.
    Grayscale(GrayscaleDecoder),
    /// RGB.
    Rgb(RgbDecoder),
    /// RGB with alpha.
    Rgba(RgbaDecoder),
    /// Palette index with optional alpha.
    Palette(PaletteDecoder),
    /// YCbCr, optionally subsampled.
    YCbCr(YCbCrDecoder),
    /// CIE L*a*b*.
    CieLab(CieLabDecoder),
    /// CMYK.
    Cmyk(CmykDecoder),
}

/// Decoder for planar blocks, one buffer per sample.
#[derive(Debug)]
pub enum PlanarDecoder {
    /// RGB or RGBA planes.
    Rgb(RgbPlanarDecoder),
    /// Y, Cb and Cr planes.
    YCbCr(YCbCrPlanarDecoder),
    /// L, a and b planes.
    CieLab(CieLabPlanarDecoder),
}

/// A chunky decoder bound to the color type it was selected for.
#[derive(Debug)]
pub struct TiffColorDecoder {
    color_type: TiffColorType,
    decoder: ChunkyDecoder,
}

impl TiffColorDecoder {
    pub(crate) fn new(color_type: TiffColorType, decoder: ChunkyDecoder) -> Self {
        Self {
            color_type,
            decoder,
        }
    }

    /// The variant this decoder was built for.
    pub fn color_type(&self) -> TiffColorType {
        self.color_type
    }

    /// The family decoder.
    pub fn decoder(&self) -> &ChunkyDecoder {
        &self.decoder
    }

    /// Decodes one block into `pixels` at `(left, top)`.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle lies outside `pixels` or `data` is too
    /// short for it.
    pub fn decode<P: Pixel>(
        &self,
        data: &[u8],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        trace!(color_type = ?self.color_type, left, top, width, height, bytes = data.len(), "decode block");
        match &self.decoder {
            ChunkyDecoder::Grayscale(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::Rgb(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::Rgba(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::Palette(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::YCbCr(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::CieLab(d) => d.decode(data, pixels, left, top, width, height),
            ChunkyDecoder::Cmyk(d) => d.decode(data, pixels, left, top, width, height),
        }
    }
}

/// A planar decoder bound to the color type it was selected for.
#[derive(Debug)]
pub struct TiffPlanarColorDecoder {
    color_type: TiffColorType,
    decoder: PlanarDecoder,
}

impl TiffPlanarColorDecoder {
    pub(crate) fn new(color_type: TiffColorType, decoder: PlanarDecoder) -> Self {
        Self {
            color_type,
            decoder,
        }
    }

    /// The variant this decoder was built for.
    pub fn color_type(&self) -> TiffColorType {
        self.color_type
    }

    /// The family decoder.
    pub fn decoder(&self) -> &PlanarDecoder {
        &self.decoder
    }

    /// Decodes one block from per-sample planes.
    ///
    /// # Panics
    ///
    /// Panics on a wrong plane count, a rectangle outside `pixels`, or a
    /// plane too short for the block.
    pub fn decode<P: Pixel>(
        &self,
        planes: &[&[u8]],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        trace!(color_type = ?self.color_type, planes = planes.len(), left, top, width, height, "decode planar block");
        match &self.decoder {
            PlanarDecoder::Rgb(d) => d.decode(planes, pixels, left, top, width, height),
            PlanarDecoder::YCbCr(d) => d.decode(planes, pixels, left, top, width, height),
            PlanarDecoder::CieLab(d) => d.decode(planes, pixels, left, top, width, height),
        }
    }
}
