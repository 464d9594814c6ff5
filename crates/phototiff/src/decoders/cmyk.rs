//! Separated (CMYK) color.

use std::sync::Arc;

use super::for_each_row;
use phototiff_core::{ImageViewMut, Pixel};
use phototiff_icc::CmykConverter;

/// 8-bit CMYK decoder.
///
/// JPEG-compressed frames arrive already converted to RGB by the
/// decompressor and are passed through as 3-byte RGB.
#[derive(Debug, Clone)]
pub struct CmykDecoder {
    jpeg_rgb: bool,
    converter: Arc<CmykConverter>,
}

impl CmykDecoder {
    /// Creates a decoder for raw 4-byte CMYK samples.
    pub fn new(converter: Arc<CmykConverter>) -> Self {
        Self {
            jpeg_rgb: false,
            converter,
        }
    }

    /// Creates a pass-through decoder for RGB from a JPEG decompressor.
    pub fn jpeg_rgb() -> Self {
        Self {
            jpeg_rgb: true,
            converter: Arc::new(CmykConverter::Formula),
        }
    }

    /// True if input is decompressed JPEG RGB rather than CMYK.
    pub fn is_jpeg_rgb(&self) -> bool {
        self.jpeg_rgb
    }

    /// The CMYK to sRGB conversion in use.
    pub fn converter(&self) -> &CmykConverter {
        &self.converter
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
        if self.jpeg_rgb {
            let row_bytes = width as usize * 3;
            for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                for (px, rgb) in row.iter_mut().zip(src.chunks_exact(3)) {
                    *px = P::from_rgb8([rgb[0], rgb[1], rgb[2]]);
                }
            });
            return;
        }

        let w = width as usize;
        let mut cmyk = vec![[0.0f32; 4]; w];
        let mut rgb = vec![[0.0f32; 3]; w];
        let mut scratch = Vec::with_capacity(w);
        for_each_row(data, pixels, left, top, width, height, w * 4, |row, src| {
            for (dst, s) in cmyk.iter_mut().zip(src.chunks_exact(4)) {
                *dst = [s[0], s[1], s[2], s[3]].map(|v| v as f32 / 255.0);
            }
            self.converter.convert_row(&cmyk, &mut rgb, &mut scratch);
            for (px, &c) in row.iter_mut().zip(rgb.iter()) {
                *px = P::from_rgb_f32(c);
            }
        });
    }
}
