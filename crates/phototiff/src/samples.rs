//! Endian-aware sample extraction and scaling.
//!
//! Each reader takes a slice starting at the sample and returns the value
//! in native form. 24-bit samples are zero-extended to `u32`.

use crate::tags::ByteOrder;

/// Reads a 16-bit sample.
#[inline]
pub fn read_u16(bytes: &[u8], order: ByteOrder) -> u16 {
    let raw = [bytes[0], bytes[1]];
    match order {
        ByteOrder::BigEndian => u16::from_be_bytes(raw),
        ByteOrder::LittleEndian => u16::from_le_bytes(raw),
    }
}

/// Reads a 16-bit signed sample.
#[inline]
pub fn read_i16(bytes: &[u8], order: ByteOrder) -> i16 {
    read_u16(bytes, order) as i16
}

/// Reads a 24-bit sample into the low three bytes of a `u32`.
#[inline]
pub fn read_u24(bytes: &[u8], order: ByteOrder) -> u32 {
    match order {
        ByteOrder::BigEndian => u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        ByteOrder::LittleEndian => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]),
    }
}

/// Reads a 32-bit sample.
#[inline]
pub fn read_u32(bytes: &[u8], order: ByteOrder) -> u32 {
    let raw = [bytes[0], bytes[1], bytes[2], bytes[3]];
    match order {
        ByteOrder::BigEndian => u32::from_be_bytes(raw),
        ByteOrder::LittleEndian => u32::from_le_bytes(raw),
    }
}

/// Reads an IEEE-754 single precision sample.
#[inline]
pub fn read_f32(bytes: &[u8], order: ByteOrder) -> f32 {
    f32::from_bits(read_u32(bytes, order))
}

/// Largest value an unsigned sample of `bits` bits can hold, as float.
#[inline]
pub fn max_value(bits: u32) -> f64 {
    ((1u64 << bits) - 1) as f64
}

/// Maps an unsigned `bits`-wide sample to `[0, 1]`.
#[inline]
pub fn normalize(value: u32, bits: u32) -> f32 {
    (value as f64 / max_value(bits)) as f32
}

/// Maps a 24-bit sample to `[0, 1]`.
#[inline]
pub fn normalize_u24(value: u32) -> f32 {
    (value as f64 / 16_777_215.0) as f32
}

/// Maps a 32-bit sample to `[0, 1]`.
#[inline]
pub fn normalize_u32(value: u32) -> f32 {
    (value as f64 / u32::MAX as f64) as f32
}

/// Bytes covering `width * height` samples of `bits_per_pixel`, with every
/// row padded to a byte boundary.
#[inline]
pub fn padded_row_bytes(width: u32, bits_per_pixel: u32) -> usize {
    (width as usize * bits_per_pixel as usize).div_ceil(8)
}

/// Total bytes of a block of `height` padded rows.
#[inline]
pub fn block_bytes(width: u32, height: u32, bits_per_pixel: u32) -> usize {
    padded_row_bytes(width, bits_per_pixel) * height as usize
}
