//! Planar RGB and RGBA: one buffer per sample.

use super::{block_row, check_block, check_input, AlphaMode};
use crate::bit_reader::BitReader;
use crate::samples::{normalize, normalize_u24, normalize_u32, padded_row_bytes, read_u16, read_u24, read_u32};
use crate::tags::ByteOrder;
use phototiff_core::{ImageViewMut, Pixel};

/// Sample layout of planar RGB(A) planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanarDepth {
    /// Per-plane depths, each plane read by its own [`BitReader`].
    /// The fourth entry is ignored without alpha.
    Bits([u16; 4]),
    /// 16 bits per sample.
    Sixteen,
    /// 24 bits per sample.
    TwentyFour,
    /// 32 bits per sample.
    ThirtyTwo,
}

/// Planar RGB decoder, with or without an alpha plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbPlanarDecoder {
    depth: PlanarDepth,
    byte_order: ByteOrder,
    alpha: Option<AlphaMode>,
}

impl RgbPlanarDecoder {
    /// Decoder for R, G and B planes.
    pub fn rgb(depth: PlanarDepth, byte_order: ByteOrder) -> Self {
        Self {
            depth,
            byte_order,
            alpha: None,
        }
    }

    /// Decoder for R, G, B and alpha planes.
    pub fn rgba(depth: PlanarDepth, byte_order: ByteOrder, alpha: AlphaMode) -> Self {
        Self {
            depth,
            byte_order,
            alpha: Some(alpha),
        }
    }

    /// Sample layout.
    pub fn depth(&self) -> PlanarDepth {
        self.depth
    }

    /// Alpha meaning, `None` without an alpha plane.
    pub fn alpha(&self) -> Option<AlphaMode> {
        self.alpha
    }

    /// Number of planes a block must supply.
    pub fn planes(&self) -> usize {
        if self.alpha.is_some() { 4 } else { 3 }
    }

    /// Decodes one block from per-sample planes.
    pub fn decode<P: Pixel>(
        &self,
        planes: &[&[u8]],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        let n = self.planes();
        assert_eq!(planes.len(), n, "RGB planar block needs {n} planes, got {}", planes.len());
        check_block(pixels, left, top, width, height);

        let alpha = self.alpha.unwrap_or_default();
        let order = self.byte_order;
        let sample_bytes = match self.depth {
            PlanarDepth::Bits(bits) => return self.decode_bits(bits, planes, pixels, left, top, width, height),
            PlanarDepth::Sixteen => 2,
            PlanarDepth::TwentyFour => 3,
            PlanarDepth::ThirtyTwo => 4,
        };

        let row_bytes = width as usize * sample_bytes;
        for plane in planes {
            check_input(plane, row_bytes * height as usize);
        }

        for (row, y) in (top..top + height).enumerate() {
            let base = row * row_bytes;
            for (x, px) in block_row(pixels, y, left, width).iter_mut().enumerate() {
                let offset = base + x * sample_bytes;
                let at = |c: usize| &planes[c][offset..offset + sample_bytes];
                *px = match self.depth {
                    PlanarDepth::Sixteen => {
                        let mut v = [0, 0, 0, u16::MAX];
                        for (c, dst) in v.iter_mut().enumerate().take(n) {
                            *dst = read_u16(at(c), order);
                        }
                        match alpha {
                            AlphaMode::Straight => P::from_rgba16(v),
                            AlphaMode::Associated => {
                                P::from_rgba_f32(alpha.resolve(v.map(|s| s as f32 / 65535.0)))
                            }
                        }
                    }
                    PlanarDepth::TwentyFour => {
                        let mut v = [0.0, 0.0, 0.0, 1.0];
                        for (c, dst) in v.iter_mut().enumerate().take(n) {
                            *dst = normalize_u24(read_u24(at(c), order));
                        }
                        P::from_rgba_f32(alpha.resolve(v))
                    }
                    _ => {
                        let mut v = [0.0, 0.0, 0.0, 1.0];
                        for (c, dst) in v.iter_mut().enumerate().take(n) {
                            *dst = normalize_u32(read_u32(at(c), order));
                        }
                        P::from_rgba_f32(alpha.resolve(v))
                    }
                };
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn decode_bits<P: Pixel>(
        &self,
        bits: [u16; 4],
        planes: &[&[u8]],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        let bits = bits.map(u32::from);
        let alpha = self.alpha.unwrap_or_default();
        for (plane, &b) in planes.iter().zip(&bits) {
            check_input(plane, padded_row_bytes(width, b) * height as usize);
        }

        let mut readers: Vec<BitReader<'_>> = planes.iter().map(|p| BitReader::new(p)).collect();
        for y in top..top + height {
            for px in block_row(pixels, y, left, width) {
                let mut v = [0.0, 0.0, 0.0, 1.0];
                for ((dst, reader), &b) in v.iter_mut().zip(readers.iter_mut()).zip(&bits) {
                    *dst = normalize(reader.read_bits(b), b);
                }
                *px = P::from_rgba_f32(alpha.resolve(v));
            }
            for reader in &mut readers {
                reader.next_row();
            }
        }
    }
}
