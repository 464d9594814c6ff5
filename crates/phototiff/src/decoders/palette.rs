//! Palette (indexed) color.

use super::{block_row, check_block, check_input};
use crate::bit_reader::BitReader;
use crate::samples::{normalize, padded_row_bytes};
use crate::tags::ColorMap;
use phototiff_core::{ImageViewMut, Pixel};
use tracing::debug;

/// Indexed color through a `ColorMap`, with an optional alpha sample after
/// each index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteDecoder {
    index_bits: u16,
    alpha_bits: Option<u16>,
    palette: Vec<[u16; 3]>,
}

impl PaletteDecoder {
    /// Builds the lookup table from `color_map`.
    ///
    /// Indices past the end of the table decode as entry 0.
    pub fn new(index_bits: u16, alpha_bits: Option<u16>, color_map: &ColorMap) -> Self {
        let palette: Vec<[u16; 3]> = (0..color_map.len()).map(|i| color_map.entry(i)).collect();
        debug!(index_bits, ?alpha_bits, entries = palette.len(), "palette decoder");
        Self {
            index_bits,
            alpha_bits,
            palette,
        }
    }

    /// Bits per index.
    pub fn index_bits(&self) -> u16 {
        self.index_bits
    }

    /// Bits of the alpha sample, if present.
    pub fn alpha_bits(&self) -> Option<u16> {
        self.alpha_bits
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.palette.len()
    }

    /// True if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    #[inline]
    fn entry(&self, index: u32) -> [u16; 3] {
        self.palette
            .get(index as usize)
            .or_else(|| self.palette.first())
            .copied()
            .unwrap_or_default()
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
        let index_bits = self.index_bits as u32;
        let alpha_bits = self.alpha_bits.map(u32::from);
        let bits_per_pixel = index_bits + alpha_bits.unwrap_or(0);

        check_block(pixels, left, top, width, height);
        check_input(data, padded_row_bytes(width, bits_per_pixel) * height as usize);

        let mut reader = BitReader::new(data);
        for y in top..top + height {
            for px in block_row(pixels, y, left, width) {
                let rgb = self.entry(reader.read_bits(index_bits));
                *px = match alpha_bits {
                    None => P::from_rgb16(rgb),
                    Some(bits) => {
                        let alpha = normalize(reader.read_bits(bits), bits);
                        let [r, g, b] = rgb.map(|v| v as f32 / 65535.0);
                        P::from_rgba_f32([r, g, b, alpha])
                    }
                };
            }
            reader.next_row();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phototiff_core::{Image, Rgb, Rgba};

    fn gray_ramp(bits: u16) -> ColorMap {
        let n = 1usize << bits;
        let ramp: Vec<u16> = (0..n).map(|i| (i * 65535 / (n - 1)) as u16).collect();
        ColorMap::new(ramp.clone(), vec![0; n], ramp).unwrap()
    }

    #[test]
    fn test_four_bit_indices() {
        let decoder = PaletteDecoder::new(4, None, &gray_ramp(4));
        let mut img: Image<Rgb<u8>> = Image::new(3, 1);
        decoder.decode(&[0x0F, 0x50], &mut img.view_mut(), 0, 0, 3, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(0, 0, 0));
        assert_eq!(img.pixel(1, 0), Rgb::new(255, 0, 255));
        assert_eq!(img.pixel(2, 0), Rgb::new(85, 0, 85));
    }

    #[test]
    fn test_exact_sixteen_bit_entries() {
        let map = ColorMap::new(vec![0, 1234], vec![0, 5678], vec![0, 65535]).unwrap();
        let decoder = PaletteDecoder::new(1, None, &map);
        let mut img: Image<Rgb<u16>> = Image::new(2, 1);
        decoder.decode(&[0b0100_0000], &mut img.view_mut(), 0, 0, 2, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(0, 0, 0));
        assert_eq!(img.pixel(1, 0), Rgb::new(1234, 5678, 65535));
    }

    #[test]
    fn test_index_with_alpha() {
        let decoder = PaletteDecoder::new(8, Some(8), &gray_ramp(8));
        let mut img: Image<Rgba<u8>> = Image::new(2, 1);
        decoder.decode(&[255, 0, 255, 255], &mut img.view_mut(), 0, 0, 2, 1);
        assert_eq!(img.pixel(0, 0), Rgba::new(255, 0, 255, 0));
        assert_eq!(img.pixel(1, 0), Rgba::new(255, 0, 255, 255));
    }

    #[test]
    fn test_out_of_range_index_uses_first_entry() {
        let map = ColorMap::new(vec![100, 200], vec![100, 200], vec![100, 200]).unwrap();
        let decoder = PaletteDecoder::new(2, None, &map);
        let mut img: Image<Rgb<u16>> = Image::new(2, 1);
        decoder.decode(&[0b0111_0000], &mut img.view_mut(), 0, 0, 2, 1);
        assert_eq!(img.pixel(0, 0), Rgb::new(200, 200, 200));
        assert_eq!(img.pixel(1, 0), Rgb::new(100, 100, 100));
    }

    #[test]
    fn test_rows_padded() {
        let decoder = PaletteDecoder::new(1, None, &gray_ramp(1));
        let mut img: Image<Rgb<u8>> = Image::new(3, 2);
        decoder.decode(&[0b1010_0000, 0b0100_0000], &mut img.view_mut(), 0, 0, 3, 2);
        let reds: Vec<u8> = img.data().iter().map(|p| p.r).collect();
        assert_eq!(reds, [255, 0, 255, 0, 255, 0]);
    }
}
