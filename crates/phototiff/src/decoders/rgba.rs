//! Chunky RGB with an alpha sample.

use super::{block_row, check_block, check_input, for_each_row, AlphaMode};
use crate::bit_reader::BitReader;
use crate::samples::{
    normalize, normalize_u24, normalize_u32, padded_row_bytes, read_f32, read_u16, read_u24,
    read_u32,
};
use crate::tags::ByteOrder;
use phototiff_core::{ImageViewMut, Pixel};

/// Sample layout of an RGBA block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbaDepth {
    /// Per-channel depths, read through [`BitReader`].
    Bits([u16; 4]),
    /// 8 bits per channel.
    Eight,
    /// 16 bits per channel.
    Sixteen,
    /// 24 bits per channel.
    TwentyFour,
    /// 32 bits per channel.
    ThirtyTwo,
    /// 32-bit float per channel.
    Float,
}

impl RgbaDepth {
    fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Bits(bits) => bits.iter().map(|&b| b as u32).sum(),
            Self::Eight => 32,
            Self::Sixteen => 64,
            Self::TwentyFour => 96,
            Self::ThirtyTwo | Self::Float => 128,
        }
    }
}

/// Chunky RGBA decoder.
///
/// With [`AlphaMode::Associated`] color is divided by alpha; a fully
/// transparent pixel comes out as all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaDecoder {
    depth: RgbaDepth,
    byte_order: ByteOrder,
    alpha: AlphaMode,
}

impl RgbaDecoder {
    /// Creates a decoder for the given layout and alpha meaning.
    pub fn new(depth: RgbaDepth, byte_order: ByteOrder, alpha: AlphaMode) -> Self {
        Self {
            depth,
            byte_order,
            alpha,
        }
    }

    /// Sample layout.
    pub fn depth(&self) -> RgbaDepth {
        self.depth
    }

    /// Alpha meaning.
    pub fn alpha(&self) -> AlphaMode {
        self.alpha
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
        let row_bytes = padded_row_bytes(width, self.depth.bits_per_pixel());
        let order = self.byte_order;
        let alpha = self.alpha;

        match self.depth {
            RgbaDepth::Bits(bits) => {
                check_block(pixels, left, top, width, height);
                check_input(data, row_bytes * height as usize);
                let bits = bits.map(u32::from);
                let mut reader = BitReader::new(data);
                for y in top..top + height {
                    for px in block_row(pixels, y, left, width) {
                        let rgba = bits.map(|b| normalize(reader.read_bits(b), b));
                        *px = P::from_rgba_f32(alpha.resolve(rgba));
                    }
                    reader.next_row();
                }
            }
            RgbaDepth::Eight => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, s) in row.iter_mut().zip(src.chunks_exact(4)) {
                        let rgba = [s[0], s[1], s[2], s[3]];
                        *px = match alpha {
                            AlphaMode::Straight => P::from_rgba8(rgba),
                            AlphaMode::Associated => P::from_rgba_f32(
                                alpha.resolve(rgba.map(|v| v as f32 / 255.0)),
                            ),
                        };
                    }
                });
            }
            RgbaDepth::Sixteen => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, s) in row.iter_mut().zip(src.chunks_exact(8)) {
                        let rgba = [
                            read_u16(&s[0..2], order),
                            read_u16(&s[2..4], order),
                            read_u16(&s[4..6], order),
                            read_u16(&s[6..8], order),
                        ];
                        *px = match alpha {
                            AlphaMode::Straight => P::from_rgba16(rgba),
                            AlphaMode::Associated => P::from_rgba_f32(
                                alpha.resolve(rgba.map(|v| v as f32 / 65535.0)),
                            ),
                        };
                    }
                });
            }
            RgbaDepth::TwentyFour => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, s) in row.iter_mut().zip(src.chunks_exact(12)) {
                        let rgba = [0, 3, 6, 9].map(|i| normalize_u24(read_u24(&s[i..i + 3], order)));
                        *px = P::from_rgba_f32(alpha.resolve(rgba));
                    }
                });
            }
            RgbaDepth::ThirtyTwo => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, s) in row.iter_mut().zip(src.chunks_exact(16)) {
                        let rgba = [0, 4, 8, 12].map(|i| normalize_u32(read_u32(&s[i..i + 4], order)));
                        *px = P::from_rgba_f32(alpha.resolve(rgba));
                    }
                });
            }
            RgbaDepth::Float => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, s) in row.iter_mut().zip(src.chunks_exact(16)) {
                        let rgba = [0, 4, 8, 12].map(|i| read_f32(&s[i..i + 4], order));
                        *px = P::from_rgba_f32(alpha.resolve(rgba));
                    }
                });
            }
        }
    }
}
