//! CIE L*a*b*, chunky 8/16-bit and planar 8-bit.
//!
//! Samples are mapped to float Lab (`L` in `0..=100`, `a`/`b` signed) and
//! converted a row at a time through a shared [`LabConverter`].

use std::sync::Arc;

use super::{block_row, check_block, check_input, for_each_row};
use crate::samples::{read_i16, read_u16};
use crate::tags::ByteOrder;
use phototiff_core::{ImageViewMut, Pixel};
use phototiff_icc::LabConverter;

/// Sample depth of a chunky Lab block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabDepth {
    /// `L` unsigned 8-bit, `a`/`b` signed 8-bit.
    Eight,
    /// `L` unsigned 16-bit, `a`/`b` signed 16-bit in 1/256 units.
    Sixteen,
}

#[inline]
fn lab8(l: u8, a: u8, b: u8) -> [f32; 3] {
    [l as f32 * 100.0 / 255.0, a as i8 as f32, b as i8 as f32]
}

/// Writes converted Lab values to one destination row.
fn write_row<P: Pixel>(row: &mut [P], lab: &[[f32; 3]], rgb: &mut [[f32; 3]], converter: &LabConverter) {
    converter.convert_row(lab, rgb);
    for (px, &c) in row.iter_mut().zip(rgb.iter()) {
        *px = P::from_rgb_f32(c);
    }
}

/// Chunky Lab decoder.
#[derive(Debug, Clone)]
pub struct CieLabDecoder {
    depth: LabDepth,
    byte_order: ByteOrder,
    converter: Arc<LabConverter>,
}

impl CieLabDecoder {
    /// Creates a decoder around a frame's converter.
    pub fn new(depth: LabDepth, byte_order: ByteOrder, converter: Arc<LabConverter>) -> Self {
        Self {
            depth,
            byte_order,
            converter,
        }
    }

    /// Sample depth.
    pub fn depth(&self) -> LabDepth {
        self.depth
    }

    /// The Lab to sRGB conversion in use.
    pub fn converter(&self) -> &LabConverter {
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
        let order = self.byte_order;
        let sample_bytes = match self.depth {
            LabDepth::Eight => 3,
            LabDepth::Sixteen => 6,
        };
        let mut lab = vec![[0.0f32; 3]; width as usize];
        let mut rgb = vec![[0.0f32; 3]; width as usize];

        let row_bytes = width as usize * sample_bytes;
        for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
            let samples = src.chunks_exact(sample_bytes);
            match self.depth {
                LabDepth::Eight => {
                    for (dst, s) in lab.iter_mut().zip(samples) {
                        *dst = lab8(s[0], s[1], s[2]);
                    }
                }
                LabDepth::Sixteen => {
                    for (dst, s) in lab.iter_mut().zip(samples) {
                        *dst = [
                            read_u16(&s[0..2], order) as f32 * 100.0 / 65535.0,
                            read_i16(&s[2..4], order) as f32 / 256.0,
                            read_i16(&s[4..6], order) as f32 / 256.0,
                        ];
                    }
                }
            }
            write_row(row, &lab, &mut rgb, &self.converter);
        });
    }
}

/// Planar 8-bit Lab decoder: `L`, `a` and `b` planes.
#[derive(Debug, Clone)]
pub struct CieLabPlanarDecoder {
    converter: Arc<LabConverter>,
}

impl CieLabPlanarDecoder {
    /// Creates a decoder around a frame's converter.
    pub fn new(converter: Arc<LabConverter>) -> Self {
        Self { converter }
    }

    /// The Lab to sRGB conversion in use.
    pub fn converter(&self) -> &LabConverter {
        &self.converter
    }

    /// Decodes one block from `[l, a, b]` planes.
    pub fn decode<P: Pixel>(
        &self,
        planes: &[&[u8]],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        let [l_plane, a_plane, b_plane] = planes else {
            panic!("Lab planar block needs 3 planes, got {}", planes.len());
        };
        check_block(pixels, left, top, width, height);
        let needed = width as usize * height as usize;
        for plane in planes {
            check_input(plane, needed);
        }

        let w = width as usize;
        let mut lab = vec![[0.0f32; 3]; w];
        let mut rgb = vec![[0.0f32; 3]; w];
        for (row, y) in (top..top + height).enumerate() {
            let span = row * w..(row + 1) * w;
            let samples = l_plane[span.clone()]
                .iter()
                .zip(&a_plane[span.clone()])
                .zip(&b_plane[span]);
            for (dst, ((&l, &a), &b)) in lab.iter_mut().zip(samples) {
                *dst = lab8(l, a, b);
            }
            write_row(block_row(pixels, y, left, width), &lab, &mut rgb, &self.converter);
        }
    }
}
