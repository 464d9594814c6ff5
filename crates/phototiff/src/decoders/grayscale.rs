//! Black-is-zero and white-is-zero grayscale.

use super::{block_row, check_block, check_input, for_each_row};
use crate::bit_reader::BitReader;
use crate::samples::{
    normalize, normalize_u24, normalize_u32, padded_row_bytes, read_f32, read_u16, read_u24,
    read_u32,
};
use crate::tags::ByteOrder;
use phototiff_core::{ImageViewMut, Pixel};

/// Sample layout of a grayscale block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayDepth {
    /// Any unsigned depth from 1 to 32 bits, read through [`BitReader`].
    Bits(u16),
    /// 8 pixels per byte.
    One,
    /// 2 pixels per byte, high nibble first.
    Four,
    /// One byte per pixel.
    Eight,
    /// 16-bit samples in file byte order.
    Sixteen,
    /// 24-bit samples in file byte order.
    TwentyFour,
    /// 32-bit unsigned samples in file byte order.
    ThirtyTwo,
    /// IEEE 754 single precision.
    Float,
}

impl GrayDepth {
    fn bits(self) -> u32 {
        match self {
            Self::Bits(bits) => bits as u32,
            Self::One => 1,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
            Self::ThirtyTwo | Self::Float => 32,
        }
    }
}

/// Grayscale decoder for both polarities.
///
/// White-is-zero mirrors every sample within its own range before output,
/// so `0` is white and the maximum code is black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleDecoder {
    white_is_zero: bool,
    depth: GrayDepth,
    byte_order: ByteOrder,
}

impl GrayscaleDecoder {
    /// Decoder where `0` is black.
    pub fn black_is_zero(depth: GrayDepth, byte_order: ByteOrder) -> Self {
        Self {
            white_is_zero: false,
            depth,
            byte_order,
        }
    }

    /// Decoder where `0` is white.
    pub fn white_is_zero(depth: GrayDepth, byte_order: ByteOrder) -> Self {
        Self {
            white_is_zero: true,
            depth,
            byte_order,
        }
    }

    /// Sample layout.
    pub fn depth(&self) -> GrayDepth {
        self.depth
    }

    /// True for the inverted polarity.
    pub fn is_white_is_zero(&self) -> bool {
        self.white_is_zero
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
        let row_bytes = padded_row_bytes(width, self.depth.bits());
        let order = self.byte_order;
        let white = self.white_is_zero;

        match self.depth {
            GrayDepth::Bits(bits) => {
                self.decode_bits(bits as u32, data, pixels, left, top, width, height)
            }
            GrayDepth::One => {
                let (on, off) = if white {
                    (P::from_l8(0), P::from_l8(255))
                } else {
                    (P::from_l8(255), P::from_l8(0))
                };
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (chunk, &byte) in row.chunks_mut(8).zip(src) {
                        for (i, px) in chunk.iter_mut().enumerate() {
                            *px = if (byte >> (7 - i)) & 1 == 1 { on } else { off };
                        }
                    }
                });
            }
            GrayDepth::Four => {
                let level = |nibble: u8| {
                    let n = if white { 15 - nibble } else { nibble };
                    P::from_l8(n * 17)
                };
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (pair, &byte) in row.chunks_mut(2).zip(src) {
                        pair[0] = level(byte >> 4);
                        if let Some(px) = pair.get_mut(1) {
                            *px = level(byte & 0x0F);
                        }
                    }
                });
            }
            GrayDepth::Eight => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, &v) in row.iter_mut().zip(src) {
                        *px = P::from_l8(if white { 255 - v } else { v });
                    }
                });
            }
            GrayDepth::Sixteen => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, bytes) in row.iter_mut().zip(src.chunks_exact(2)) {
                        let v = read_u16(bytes, order);
                        *px = P::from_l16(if white { u16::MAX - v } else { v });
                    }
                });
            }
            GrayDepth::TwentyFour => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, bytes) in row.iter_mut().zip(src.chunks_exact(3)) {
                        let v = read_u24(bytes, order);
                        *px = P::from_luma_f32(normalize_u24(if white { 0xFF_FFFF - v } else { v }));
                    }
                });
            }
            GrayDepth::ThirtyTwo => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, bytes) in row.iter_mut().zip(src.chunks_exact(4)) {
                        let v = read_u32(bytes, order);
                        *px = P::from_luma_f32(normalize_u32(if white { u32::MAX - v } else { v }));
                    }
                });
            }
            GrayDepth::Float => {
                for_each_row(data, pixels, left, top, width, height, row_bytes, |row, src| {
                    for (px, bytes) in row.iter_mut().zip(src.chunks_exact(4)) {
                        let v = read_f32(bytes, order);
                        *px = P::from_luma_f32(if white { 1.0 - v } else { v });
                    }
                });
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn decode_bits<P: Pixel>(
        &self,
        bits: u32,
        data: &[u8],
        pixels: &mut ImageViewMut<'_, P>,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) {
        check_block(pixels, left, top, width, height);
        check_input(data, padded_row_bytes(width, bits) * height as usize);

        let mut reader = BitReader::new(data);
        for y in top..top + height {
            for px in block_row(pixels, y, left, width) {
                let intensity = normalize(reader.read_bits(bits), bits);
                *px = P::from_luma_f32(if self.white_is_zero {
                    1.0 - intensity
                } else {
                    intensity
                });
            }
            reader.next_row();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use phototiff_core::{Image, Luma, Rgba};

    fn decode_l8(decoder: GrayscaleDecoder, data: &[u8], width: u32, height: u32) -> Image<Luma<u8>> {
        let mut img = Image::new(width, height);
        decoder.decode(data, &mut img.view_mut(), 0, 0, width, height);
        img
    }

    fn values(img: &Image<Luma<u8>>) -> Vec<u8> {
        img.data().iter().map(|p| p.0).collect()
    }

    #[test]
    fn test_one_bit_black_is_zero() {
        let decoder = GrayscaleDecoder::black_is_zero(GrayDepth::One, ByteOrder::LittleEndian);
        // 10 pixels per row: 2 bytes, 6 padding bits.
        let img = decode_l8(decoder, &[0b1010_0000, 0b0100_0000, 0xFF, 0xC0], 10, 2);
        assert_eq!(
            values(&img),
            [
                255, 0, 255, 0, 0, 0, 0, 0, 0, 255, //
                255, 255, 255, 255, 255, 255, 255, 255, 255, 255
            ]
        );
    }

    #[test]
    fn test_one_bit_white_is_zero() {
        let decoder = GrayscaleDecoder::white_is_zero(GrayDepth::One, ByteOrder::LittleEndian);
        let img = decode_l8(decoder, &[0b0110_0000], 4, 1);
        assert_eq!(values(&img), [255, 0, 0, 255]);
    }

    #[test]
    fn test_four_bit_odd_width() {
        let decoder = GrayscaleDecoder::black_is_zero(GrayDepth::Four, ByteOrder::LittleEndian);
        // 3 pixels per row: the low nibble of the second byte is padding.
        let img = decode_l8(decoder, &[0x0F, 0x8A, 0x12, 0x3F], 3, 2);
        assert_eq!(values(&img), [0, 255, 136, 17, 34, 51]);
    }

    #[test]
    fn test_four_bit_white_is_zero() {
        let decoder = GrayscaleDecoder::white_is_zero(GrayDepth::Four, ByteOrder::LittleEndian);
        let img = decode_l8(decoder, &[0x0F], 2, 1);
        assert_eq!(values(&img), [255, 0]);
    }

    #[test]
    fn test_eight_bit_polarity() {
        let black = GrayscaleDecoder::black_is_zero(GrayDepth::Eight, ByteOrder::LittleEndian);
        let white = GrayscaleDecoder::white_is_zero(GrayDepth::Eight, ByteOrder::LittleEndian);
        assert_eq!(values(&decode_l8(black, &[0, 128, 255], 3, 1)), [0, 128, 255]);
        assert_eq!(values(&decode_l8(white, &[0, 128, 255], 3, 1)), [255, 127, 0]);
    }

    #[test]
    fn test_sixteen_bit_byte_order() {
        let data = [0x00, 0xFF];
        let mut img: Image<Luma<u16>> = Image::new(1, 1);
        GrayscaleDecoder::black_is_zero(GrayDepth::Sixteen, ByteOrder::BigEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Luma(255));

        GrayscaleDecoder::black_is_zero(GrayDepth::Sixteen, ByteOrder::LittleEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Luma(0xFF00));

        GrayscaleDecoder::white_is_zero(GrayDepth::Sixteen, ByteOrder::LittleEndian)
            .decode(&[0, 0], &mut img.view_mut(), 0, 0, 1, 1);
        assert_eq!(img.pixel(0, 0), Luma(u16::MAX));
    }

    #[test]
    fn test_generic_depth_row_padding() {
        // 6-bit samples, 3 per row: 18 bits, padded to 3 bytes.
        let decoder = GrayscaleDecoder::black_is_zero(GrayDepth::Bits(6), ByteOrder::LittleEndian);
        let data = [0b1111_1110, 0, 0, 0b0000_0011, 0b1111_0000, 0];
        let mut img: Image<Luma<f32>> = Image::new(3, 2);
        decoder.decode(&data, &mut img.view_mut(), 0, 0, 3, 2);
        assert_relative_eq!(img.pixel(0, 0).0, 1.0);
        assert_relative_eq!(img.pixel(1, 0).0, 32.0 / 63.0);
        assert_relative_eq!(img.pixel(2, 0).0, 0.0);
        assert_relative_eq!(img.pixel(0, 1).0, 0.0);
        assert_relative_eq!(img.pixel(1, 1).0, 1.0);
        assert_relative_eq!(img.pixel(2, 1).0, 0.0);
    }

    #[test]
    fn test_generic_white_is_zero() {
        let decoder = GrayscaleDecoder::white_is_zero(GrayDepth::Bits(2), ByteOrder::LittleEndian);
        let mut img: Image<Luma<f32>> = Image::new(4, 1);
        decoder.decode(&[0b00_01_10_11], &mut img.view_mut(), 0, 0, 4, 1);
        let got: Vec<f32> = img.data().iter().map(|p| p.0).collect();
        for (g, e) in got.iter().zip([1.0, 2.0 / 3.0, 1.0 / 3.0, 0.0]) {
            assert_relative_eq!(*g, e, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_float_samples() {
        let mut data = Vec::new();
        data.extend_from_slice(&0.25f32.to_le_bytes());
        data.extend_from_slice(&1.0f32.to_le_bytes());
        let mut img: Image<Luma<f32>> = Image::new(2, 1);
        GrayscaleDecoder::white_is_zero(GrayDepth::Float, ByteOrder::LittleEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 2, 1);
        assert_relative_eq!(img.pixel(0, 0).0, 0.75);
        assert_relative_eq!(img.pixel(1, 0).0, 0.0);
    }

    #[test]
    fn test_thirty_two_bit() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];
        let mut img: Image<Luma<f32>> = Image::new(2, 1);
        GrayscaleDecoder::black_is_zero(GrayDepth::ThirtyTwo, ByteOrder::BigEndian)
            .decode(&data, &mut img.view_mut(), 0, 0, 2, 1);
        assert_relative_eq!(img.pixel(0, 0).0, 1.0);
        assert_relative_eq!(img.pixel(1, 0).0, 0.0);
    }

    #[test]
    fn test_writes_only_block() {
        let sentinel = Rgba::new(1u8, 2, 3, 4);
        let mut img = Image::filled(4, 4, sentinel);
        GrayscaleDecoder::black_is_zero(GrayDepth::Eight, ByteOrder::LittleEndian)
            .decode(&[10, 20, 30, 40], &mut img.view_mut(), 1, 2, 2, 2);
        for y in 0..4 {
            for x in 0..4 {
                let inside = (1..3).contains(&x) && (2..4).contains(&y);
                assert_eq!(img.pixel(x, y) != sentinel, inside, "pixel ({x}, {y})");
            }
        }
        assert_eq!(img.pixel(2, 3), Rgba::new(40, 40, 40, 255));
    }
}
