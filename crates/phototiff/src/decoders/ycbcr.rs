//! YCbCr, chunky and planar, with optional chroma subsampling.

use std::borrow::Cow;

use super::{block_row, check_block, check_input};
use crate::subsampling::{expand_chunky, expand_planar, padded, padding};
use crate::ycbcr::YCbCrConverter;
use phototiff_core::{ImageViewMut, Pixel};

/// Chunky 8-bit YCbCr.
///
/// With active subsampling the block is first expanded to one `[Y, Cb, Cr]`
/// triplet per padded pixel; the padding columns are skipped on output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrDecoder {
    converter: YCbCrConverter,
    subsampling: Option<[u16; 2]>,
}

impl YCbCrDecoder {
    /// Creates a decoder. `subsampling` is `None` for full-resolution chroma.
    pub fn new(converter: YCbCrConverter, subsampling: Option<[u16; 2]>) -> Self {
        Self {
            converter,
            subsampling,
        }
    }

    /// Horizontal and vertical chroma factors, if subsampled.
    pub fn subsampling(&self) -> Option<[u16; 2]> {
        self.subsampling
    }

    /// Decodes one block. See [`super::TiffColorDecoder::decode`].
    pub fn decode<P: Pixel>(
        &self,
        data: &[u8],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        check_block(pixels, left, top, width, height);
        if width == 0 || height == 0 {
            return;
        }

        let (samples, stride): (Cow<'_, [u8]>, usize) = match self.subsampling {
            Some([h, v]) => {
                let (h, v) = (h as u32, v as u32);
                let padded_width = padded(width, h) as usize;
                let mut expanded = vec![0u8; padded_width * padded(height, v) as usize * 3];
                expand_chunky(width, height, h, v, data, &mut expanded);
                (Cow::Owned(expanded), padded_width * 3)
            }
            None => {
                check_input(data, width as usize * height as usize * 3);
                (Cow::Borrowed(data), width as usize * 3)
            }
        };

        for (y, src) in (top..top + height).zip(samples.chunks(stride)) {
            for (px, ycbcr) in block_row(pixels, y, left, width)
                .iter_mut()
                .zip(src.chunks_exact(3))
            {
                *px = P::from_rgb8(self.converter.convert(ycbcr[0], ycbcr[1], ycbcr[2]));
            }
        }
    }
}

/// Planar 8-bit YCbCr: one Y plane, one Cb plane, one Cr plane.
///
/// All three planes use the padded width as their row stride. Subsampled
/// chroma planes are expanded into scratch buffers before conversion, so
/// the caller's planes are never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YCbCrPlanarDecoder {
    converter: YCbCrConverter,
    subsampling: Option<[u16; 2]>,
}

impl YCbCrPlanarDecoder {
    /// Creates a decoder. `subsampling` is `None` for full-resolution chroma.
    pub fn new(converter: YCbCrConverter, subsampling: Option<[u16; 2]>) -> Self {
        Self {
            converter,
            subsampling,
        }
    }

    /// Horizontal and vertical chroma factors, if subsampled.
    pub fn subsampling(&self) -> Option<[u16; 2]> {
        self.subsampling
    }

    /// Decodes one block from `[y, cb, cr]` planes.
    pub fn decode<P: Pixel>(
        &self,
        planes: &[&[u8]],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        let [luma, cb, cr] = planes else {
            panic!("YCbCr planar block needs 3 planes, got {}", planes.len());
        };
        check_block(pixels, left, top, width, height);
        if width == 0 || height == 0 {
            return;
        }

        let (cb, cr, stride): (Cow<'_, [u8]>, Cow<'_, [u8]>, usize) = match self.subsampling {
            Some([h, v]) => {
                let (h, v) = (h as u32, v as u32);
                let padded_width = padded(width, h);
                let padded_height = padded(height, v);
                let full = padded_width as usize * padded_height as usize;
                let sub = (padded_width / h) as usize * (padded_height / v) as usize;
                check_input(cb, sub);
                check_input(cr, sub);

                let mut cb_full = vec![0u8; full];
                let mut cr_full = vec![0u8; full];
                cb_full[..sub].copy_from_slice(&cb[..sub]);
                cr_full[..sub].copy_from_slice(&cr[..sub]);
                expand_planar(width, height, h, v, &mut cb_full, &mut cr_full);
                (Cow::Owned(cb_full), Cow::Owned(cr_full), padded_width as usize)
            }
            None => (Cow::Borrowed(*cb), Cow::Borrowed(*cr), width as usize),
        };

        let needed = stride * (height as usize - 1) + width as usize;
        check_input(luma, needed);
        check_input(&cb, needed);
        check_input(&cr, needed);

        let width_padding = self
            .subsampling
            .map_or(0, |[h, _]| padding(width, h as u32) as usize);
        debug_assert_eq!(stride, width as usize + width_padding);

        for (row, y) in (top..top + height).enumerate() {
            let start = row * stride;
            let span = start..start + width as usize;
            let samples = luma[span.clone()].iter().zip(&cb[span.clone()]).zip(&cr[span]);
            for (px, ((&l, &b), &r)) in block_row(pixels, y, left, width).iter_mut().zip(samples) {
                *px = P::from_rgb8(self.converter.convert(l, b, r));
            }
        }
    }
}
