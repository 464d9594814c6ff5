//! MSB-first bit reader for sub-byte and odd-width samples.
//!
//! TIFF packs samples most significant bit first and pads every row to a
//! byte boundary. [`BitReader::next_row`] skips that padding.
//!
//! ```
//! use phototiff::BitReader;
//!
//! // Two 3-pixel rows of 2-bit samples; each row fills 6 bits + 2 padding.
//! let data = [0b00_01_10_00, 0b11_10_01_00];
//! let mut reader = BitReader::new(&data);
//! assert_eq!([reader.read_bits(2), reader.read_bits(2), reader.read_bits(2)], [0, 1, 2]);
//! reader.next_row();
//! assert_eq!(reader.read_bits(2), 3);
//! ```

/// Cursor extracting fields of 1 to 32 bits from a byte buffer.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    /// Creates a reader positioned at the first bit.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte: 0,
            bit: 0,
        }
    }

    /// Reads the next `bits` bits as an unsigned value.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=32`, or if the read runs past the
    /// end of the buffer.
    #[inline]
    pub fn read_bits(&mut self, bits: u32) -> u32 {
        assert!((1..=32).contains(&bits), "bit width {bits} outside 1..=32");

        let mut value = 0u64;
        let mut remaining = bits;
        while remaining > 0 {
            let Some(&byte) = self.data.get(self.byte) else {
                panic!(
                    "bit reader read past end of {} byte buffer",
                    self.data.len()
                );
            };
            let available = 8 - self.bit;
            let take = available.min(remaining);
            let shift = available - take;
            let chunk = (byte >> shift) & (0xFFu8 >> (8 - take));

            value = (value << take) | chunk as u64;
            remaining -= take;
            self.bit += take;
            if self.bit == 8 {
                self.bit = 0;
                self.byte += 1;
            }
        }
        value as u32
    }

    /// Skips to the next byte boundary, discarding row padding.
    #[inline]
    pub fn next_row(&mut self) {
        if self.bit > 0 {
            self.bit = 0;
            self.byte += 1;
        }
    }

    /// Number of bytes touched so far, including a partially read one.
    pub fn bytes_consumed(&self) -> usize {
        self.byte + usize::from(self.bit > 0)
    }
}
