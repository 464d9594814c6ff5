//! Chunky RGB without alpha.

use super::{block_row, check_block, check_input, for_each_row};
use crate::bit_reader::BitReader;
use crate::samples::{
    normalize, normalize_u24, normalize_u32, padded_row_bytes, read_f32, read_u16, read_u24,
    read_u32,
};
use crate::tags::ByteOrder;
use phototiff_core::{ImageViewMut, Pixel};

/// Sample layout of an RGB block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbDepth {
    /// Per-channel depths, read through [`BitReader`].
    Bits([u16; 3]),
    /// 4 bits per channel, two pixels in three bytes.
    Rgb444,
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

impl RgbDepth {
    fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Bits(bits) => bits.iter().map(|&b| b as u32).sum(),
            Self::Rgb444 => 12,
            Self::Eight => 24,
            Self::Sixteen => 48,
            Self::TwentyFour => 72,
            Self::ThirtyTwo | Self::Float => 96,
        }
    }
}

/// Chunky RGB decoder. Output is always opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbDecoder {
    depth: RgbDepth,
    byte_order: ByteOrder,
}

impl RgbDecoder {
    /// Creates a decoder for the given layout.
    pub fn new(depth: RgbDepth, byte_order: ByteOrder) -> Self {
        Self { depth, byte_order }
    }

    /// Sample layout.
    pub fn depth(&self) -> RgbDepth {
        self.depth
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

        match self.depth {
            RgbDepth::Bits(bits) => {
                check_block(pixels, left, top, width, height);
                check_input(data, row_bytes * height as usize);
                let bits = bits.map(u32::from);
                let mut reader = BitReader::new(data);
                for y in top..top + height {
                    for px in block_row(pixels, y, left, width) {
                        let rgb = bits.map(|b| normalize(reader.read_bits(b), b));
                        *px = P::from_rgb_f32(rgb);
                    }
                    reader.next_row();
                }
            }
            RgbDepth::Rgb444 => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (pair, bytes) in row.chunks_mut(2).zip(src.chunks(3)) {
                        let nibbles = [
                            bytes[0] >> 4,
                            bytes[0] & 0x0F,
                            bytes[1] >> 4,
                            bytes[1] & 0x0F,
                            bytes.get(2).map_or(0, |b| b >> 4),
                            bytes.get(2).map_or(0, |b| b & 0x0F),
                        ];
                        for (px, rgb) in pair.iter_mut().zip(nibbles.chunks_exact(3)) {
                            *px = P::from_rgb8([rgb[0] * 17, rgb[1] * 17, rgb[2] * 17]);
                        }
                    }
                });
            }
            RgbDepth::Eight => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, rgb) in row.iter_mut().zip(src.chunks_exact(3)) {
                        *px = P::from_rgb8([rgb[0], rgb[1], rgb[2]]);
                    }
                });
            }
            RgbDepth::Sixteen => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, rgb) in row.iter_mut().zip(src.chunks_exact(6)) {
                        *px = P::from_rgb16([
                            read_u16(&rgb[0..2], order),
                            read_u16(&rgb[2..4], order),
                            read_u16(&rgb[4..6], order),
                        ]);
                    }
                });
            }
            RgbDepth::TwentyFour => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, rgb) in row.iter_mut().zip(src.chunks_exact(9)) {
                        *px = P::from_rgb_f32([
                            normalize_u24(read_u24(&rgb[0..3], order)),
                            normalize_u24(read_u24(&rgb[3..6], order)),
                            normalize_u24(read_u24(&rgb[6..9], order)),
                        ]);
                    }
                });
            }
            RgbDepth::ThirtyTwo => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, rgb) in row.iter_mut().zip(src.chunks_exact(12)) {
                        *px = P::from_rgb_f32([
                            normalize_u32(read_u32(&rgb[0..4], order)),
                            normalize_u32(read_u32(&rgb[4..8], order)),
                            normalize_u32(read_u32(&rgb[8..12], order)),
                        ]);
                    }
                });
            }
            RgbDepth::Float => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, rgb) in row.iter_mut().zip(src.chunks_exact(12)) {
                        *px = P::from_rgb_f32([
                            read_f32(&rgb[0..4], order),
                            read_f32(&rgb[4..8], order),
                            read_f32(&rgb[8..12], order),
                        ]);
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use phototiff_core::{Image, Rgb, Rgba};

    fn decode_rgb8(decoder: RgbDecoder, data: &[u8], width: u32, height: u32) -> Image<Rgb<u8>> {
        let mut img = Image::new(width, height);
        decoder.decode(data, &mut img.view_mut(), 0, 0, width, height);
        img
    }

    #[test]
    fn test_rgb888() {
        let decoder = RgbDecoder::new(RgbDepth::Eight, ByteOrder::LittleEndian);
        let img = decode_rgb8(decoder, &[255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30], 2, 2);
        assert_eq!(img.pixel(0, 0), Rgb::new(255, 0, 0));
        assert_eq!(img.pixel(1, 0), Rgb::new(0, 255, 0));
        assert_eq!(img.pixel(0, 1), Rgb::new(0, 0, 255));
        assert_eq!(img.pixel(1, 1), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_rgb_is_opaque() {
        let decoder = RgbDecoder::new(RgbDepth::Eight, ByteOrder::LittleEndian);
        let mut img: Image<Rgba<u8>> = Image::new(1, 1);
        decoder.decode(&[1, 2, 3], &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Rgba::new(1, 2, 3, 255));
    }

    #[test]
    fn test_rgb444_pairs_and_odd_tail() {
        // 3 pixels: F00 0F0 | 00F, the last pixel uses two bytes.
        let decoder = RgbDecoder::new(RgbDepth::Rgb444, ByteOrder::LittleEndian);
        let img = decode_rgb8(decoder, &[0xF0, 0x00, 0xF0, 0x00, 0xF0], 3, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(255, 0, 0));
        assert_eq!(img.pixel(1, 0), Rgb::new(0, 255, 0));
        assert_eq!(img.pixel(2, 0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_rgb444_rows_padded() {
        let decoder = RgbDecoder::new(RgbDepth::Rgb444, ByteOrder::LittleEndian);
        // 1 pixel per row: 12 bits padded to 2 bytes.
        let img = decode_rgb8(decoder, &[0x48, 0xC0, 0x12, 0x30], 1, 2);
        assert_eq!(img.pixel(0, 0), Rgb::new(68, 136, 204));
        assert_eq!(img.pixel(0, 1), Rgb::new(17, 34, 51));
    }

    #[test]
    fn test_rgb161616_byte_order() {
        let data = [0x00, 0xFF, 0xFF, 0xFF, 0x00, 0x00];
        let mut img: Image<Rgb<u16>> = Image::new(1, 1);
        RgbDecoder::new(RgbDepth::Sixteen, ByteOrder::BigEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(255, 65535, 0));

        RgbDecoder::new(RgbDepth::Sixteen, ByteOrder::LittleEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(0xFF00, 65535, 0));
    }

    #[test]
    fn test_mixed_depths() {
        // 5/6/5 packed into two bytes.
        let decoder = RgbDecoder::new(RgbDepth::Bits([5, 6, 5]), ByteOrder::LittleEndian);
        let mut img: Image<Rgb<f32>> = Image::new(1, 1);
        decoder.decode(&[0b11111_000, 0b001_00000], &mut img.view_mut(), 0, 0, 1, 1);
        let px = img.pixel(0, 0);
        assert_relative_eq!(px.r, 1.0);
        assert_relative_eq!(px.g, 1.0 / 63.0, epsilon = 1e-6);
        assert_relative_eq!(px.b, 0.0);
    }

    #[test]
    fn test_float() {
        let data: Vec<u8> = [0.5f32, 0.25, 1.0]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        let mut img: Image<Rgb<f32>> = Image::new(1, 1);
        RgbDecoder::new(RgbDepth::Float, ByteOrder::BigEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(0.5, 0.25, 1.0));
    }
}
