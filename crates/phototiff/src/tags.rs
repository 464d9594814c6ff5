//! Tag model handed over by the container layer.
//!
//! The container parses the IFD; this module holds the subset of tags the
//! photometric decoders need ([`FrameTags`]) and the closed set of decoder
//! variants ([`TiffColorType`]) they resolve to.

use crate::error::{TiffError, TiffResult};
use crate::samples::block_bytes;
use crate::subsampling::padded;

/// Byte order of multi-byte samples, fixed per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// `II` files.
    #[default]
    LittleEndian,
    /// `MM` files.
    BigEndian,
}

/// TIFF `Compression` tag. Only JPEG changes how samples are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// 1
    #[default]
    None,
    /// 2, CCITT modified Huffman RLE.
    Ccitt1D,
    /// 3, CCITT T.4.
    Group3Fax,
    /// 4, CCITT T.6.
    Group4Fax,
    /// 5
    Lzw,
    /// 6, pre-TechNote2 JPEG.
    OldJpeg,
    /// 7
    Jpeg,
    /// 8 or 32946
    Deflate,
    /// 32773
    PackBits,
    /// 50001
    Webp,
    /// Any other value.
    Unknown(u16),
}

impl Compression {
    /// Maps a raw tag value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::None,
            2 => Self::Ccitt1D,
            3 => Self::Group3Fax,
            4 => Self::Group4Fax,
            5 => Self::Lzw,
            6 => Self::OldJpeg,
            7 => Self::Jpeg,
            8 | 32946 => Self::Deflate,
            32773 => Self::PackBits,
            50001 => Self::Webp,
            other => Self::Unknown(other),
        }
    }

    /// True for both JPEG schemes; the decompressor hands back color
    /// converted samples.
    pub fn is_jpeg(self) -> bool {
        matches!(self, Self::Jpeg | Self::OldJpeg)
    }
}

/// TIFF `PhotometricInterpretation` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Photometric {
    /// 0
    WhiteIsZero,
    /// 1
    BlackIsZero,
    /// 2
    Rgb,
    /// 3
    PaletteColor,
    /// 4
    TransparencyMask,
    /// 5, CMYK.
    Separated,
    /// 6
    YCbCr,
    /// 8
    CieLab,
    /// 9
    IccLab,
    /// 10
    ItuLab,
    /// 32803
    ColorFilterArray,
    /// 32844
    LogL,
    /// 32845
    LogLuv,
    /// 34892
    LinearRaw,
    /// Any other value.
    Unknown(u16),
}

impl Photometric {
    /// Maps a raw tag value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::WhiteIsZero,
            1 => Self::BlackIsZero,
            2 => Self::Rgb,
            3 => Self::PaletteColor,
            4 => Self::TransparencyMask,
            5 => Self::Separated,
            6 => Self::YCbCr,
            8 => Self::CieLab,
            9 => Self::IccLab,
            10 => Self::ItuLab,
            32803 => Self::ColorFilterArray,
            32844 => Self::LogL,
            32845 => Self::LogLuv,
            34892 => Self::LinearRaw,
            other => Self::Unknown(other),
        }
    }
}

/// TIFF `PlanarConfiguration` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanarConfiguration {
    /// Samples interleaved per pixel.
    #[default]
    Chunky,
    /// One buffer per sample plane.
    Planar,
}

/// TIFF `SampleFormat` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    /// 1
    #[default]
    UnsignedInteger,
    /// 2
    SignedInteger,
    /// 3
    Float,
    /// 4
    Void,
}

impl SampleFormat {
    /// Maps a raw tag value; unknown values read as unsigned.
    pub fn from_u16(value: u16) -> Self {
        match value {
            2 => Self::SignedInteger,
            3 => Self::Float,
            4 => Self::Void,
            _ => Self::UnsignedInteger,
        }
    }
}

/// Meaning of the sample after the color samples (TIFF `ExtraSamples`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraSamples {
    /// 0, opaque data; used as straight alpha.
    #[default]
    Unspecified,
    /// 1, premultiplied alpha.
    AssociatedAlpha,
    /// 2, straight alpha.
    UnassociatedAlpha,
}

impl ExtraSamples {
    /// Maps a raw tag value.
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::AssociatedAlpha,
            2 => Self::UnassociatedAlpha,
            _ => Self::Unspecified,
        }
    }
}

/// Per-channel bit widths, 1 to 4 channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitsPerSample {
    bits: [u16; 4],
    channels: u8,
}

impl BitsPerSample {
    /// Builds the tuple from the tag's values.
    ///
    /// # Errors
    ///
    /// [`TiffError::InvalidBitsPerSample`] for 0 or more than 4 entries.
    pub fn new(values: &[u16]) -> TiffResult<Self> {
        if values.is_empty() || values.len() > 4 {
            return Err(TiffError::InvalidBitsPerSample(values.len()));
        }
        let mut bits = [0u16; 4];
        bits[..values.len()].copy_from_slice(values);
        Ok(Self {
            bits,
            channels: values.len() as u8,
        })
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels as usize
    }

    /// Bits of channel `index`, 0 past the last channel.
    #[inline]
    pub fn channel(&self, index: usize) -> u16 {
        self.bits.get(index).copied().unwrap_or(0)
    }

    /// The used entries.
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.bits[..self.channels()]
    }

    /// Sum of all channel widths.
    pub fn bits_per_pixel(&self) -> u32 {
        self.as_slice().iter().map(|&b| b as u32).sum()
    }

    /// True if every channel is `bits` wide.
    pub fn is_uniform(&self, bits: u16) -> bool {
        self.as_slice().iter().all(|&b| b == bits)
    }

    /// True if `channels` entries are present, each `bits` wide.
    pub fn matches(&self, channels: usize, bits: u16) -> bool {
        self.channels() == channels && self.is_uniform(bits)
    }
}

/// Unsigned TIFF `RATIONAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    /// Numerator.
    pub numerator: u32,
    /// Denominator.
    pub denominator: u32,
}

impl Rational {
    /// Creates a rational.
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Creates `value / 1`.
    pub const fn from_int(value: u32) -> Self {
        Self::new(value, 1)
    }

    /// Float value; a zero denominator reads as 0.
    pub fn to_f32(self) -> f32 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.numerator as f32 / self.denominator as f32
    }
}

/// Palette from the TIFF `ColorMap` tag: three parallel 16-bit tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    red: Vec<u16>,
    green: Vec<u16>,
    blue: Vec<u16>,
}

impl ColorMap {
    /// Builds a map from three equally long channel tables.
    pub fn new(red: Vec<u16>, green: Vec<u16>, blue: Vec<u16>) -> TiffResult<Self> {
        for other in [&green, &blue] {
            if other.len() != red.len() {
                return Err(TiffError::InvalidColorMap {
                    expected: red.len(),
                    actual: other.len(),
                });
            }
        }
        Ok(Self { red, green, blue })
    }

    /// Builds a map from the tag's flat layout: all reds, then greens,
    /// then blues.
    pub fn from_flat(values: &[u16]) -> TiffResult<Self> {
        if values.len() % 3 != 0 {
            return Err(TiffError::InvalidColorMap {
                expected: values.len() / 3 * 3,
                actual: values.len(),
            });
        }
        let n = values.len() / 3;
        Self::new(
            values[..n].to_vec(),
            values[n..2 * n].to_vec(),
            values[2 * n..].to_vec(),
        )
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.red.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// Entry `index` as `[r, g, b]`.
    pub fn entry(&self, index: usize) -> [u16; 3] {
        [self.red[index], self.green[index], self.blue[index]]
    }
}

/// Every decoder variant, by photometric interpretation, bit depth and
/// layout.
///
/// Resolved once per frame (see [`FrameTags::resolve_color_type`]) and
/// passed to [`crate::create`] or [`crate::create_planar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiffColorType {
    /// Gray, 0 is white, any depth up to 32.
    WhiteIsZero,
    /// Gray, 0 is white, 1-bit.
    WhiteIsZero1,
    /// Gray, 0 is white, 4-bit.
    WhiteIsZero4,
    /// Gray, 0 is white, 8-bit.
    WhiteIsZero8,
    /// Gray, 0 is white, 16-bit.
    WhiteIsZero16,
    /// Gray, 0 is white, 24-bit.
    WhiteIsZero24,
    /// Gray, 0 is white, 32-bit.
    WhiteIsZero32,
    /// Gray, 0 is white, 32-bit float.
    WhiteIsZero32Float,
    /// Gray, 0 is black, any depth up to 32.
    BlackIsZero,
    /// Gray, 0 is black, 1-bit.
    BlackIsZero1,
    /// Gray, 0 is black, 4-bit.
    BlackIsZero4,
    /// Gray, 0 is black, 8-bit.
    BlackIsZero8,
    /// Gray, 0 is black, 16-bit.
    BlackIsZero16,
    /// Gray, 0 is black, 24-bit.
    BlackIsZero24,
    /// Gray, 0 is black, 32-bit.
    BlackIsZero32,
    /// Gray, 0 is black, 32-bit float.
    BlackIsZero32Float,
    /// RGB, arbitrary per-channel depths.
    Rgb,
    /// RGB 2/2/2.
    Rgb222,
    /// RGB 4/4/4.
    Rgb444,
    /// RGB 8/8/8.
    Rgb888,
    /// RGB 10/10/10.
    Rgb101010,
    /// RGB 12/12/12.
    Rgb121212,
    /// RGB 14/14/14.
    Rgb141414,
    /// RGB 16/16/16.
    Rgb161616,
    /// RGB 24/24/24.
    Rgb242424,
    /// RGB 32/32/32.
    Rgb323232,
    /// RGB 32-bit float.
    RgbFloat323232,
    /// RGBA, arbitrary per-channel depths.
    Rgba,
    /// RGBA 2/2/2/2.
    Rgba2222,
    /// RGBA 3/3/3/3.
    Rgba3333,
    /// RGBA 4/4/4/4.
    Rgba4444,
    /// RGBA 5/5/5/5.
    Rgba5555,
    /// RGBA 6/6/6/6.
    Rgba6666,
    /// RGBA 8/8/8/8.
    Rgba8888,
    /// RGBA 10/10/10/10.
    Rgba10101010,
    /// RGBA 12/12/12/12.
    Rgba12121212,
    /// RGBA 14/14/14/14.
    Rgba14141414,
    /// RGBA 16/16/16/16.
    Rgba16161616,
    /// RGBA 24/24/24/24.
    Rgba24242424,
    /// RGBA 32/32/32/32.
    Rgba32323232,
    /// RGBA 32-bit float.
    RgbaFloat32323232,
    /// Palette index, optional per-pixel alpha.
    PaletteColor,
    /// YCbCr 8-bit, optionally subsampled.
    YCbCr,
    /// CIE L*a*b* 8-bit.
    CieLab,
    /// CIE L*a*b* 16-bit.
    CieLab16,
    /// CMYK 8-bit (or RGB from a JPEG decompressor).
    Cmyk,
    /// Planar RGB, arbitrary depths.
    Rgb888Planar,
    /// Planar RGB 16-bit.
    Rgb161616Planar,
    /// Planar RGB 24-bit.
    Rgb242424Planar,
    /// Planar RGB 32-bit.
    Rgb323232Planar,
    /// Planar RGBA, arbitrary depths.
    Rgba8888Planar,
    /// Planar RGBA 16-bit.
    Rgba16161616Planar,
    /// Planar RGBA 24-bit.
    Rgba24242424Planar,
    /// Planar RGBA 32-bit.
    Rgba32323232Planar,
    /// Planar YCbCr 8-bit, optionally subsampled.
    YCbCrPlanar,
    /// Planar CIE L*a*b* 8-bit.
    CieLabPlanar,
}

impl TiffColorType {
    /// True for variants decoded from one buffer per plane.
    pub fn is_planar(self) -> bool {
        matches!(
            self,
            Self::Rgb888Planar
                | Self::Rgb161616Planar
                | Self::Rgb242424Planar
                | Self::Rgb323232Planar
                | Self::Rgba8888Planar
                | Self::Rgba16161616Planar
                | Self::Rgba24242424Planar
                | Self::Rgba32323232Planar
                | Self::YCbCrPlanar
                | Self::CieLabPlanar
        )
    }
}

/// The per-frame tag set the decoders depend on.
#[derive(Debug, Clone)]
pub struct FrameTags {
    /// `PhotometricInterpretation`.
    pub photometric: Photometric,
    /// `PlanarConfiguration`.
    pub planar_configuration: PlanarConfiguration,
    /// `BitsPerSample`.
    pub bits_per_sample: BitsPerSample,
    /// `SampleFormat`.
    pub sample_format: SampleFormat,
    /// `ExtraSamples`, first entry.
    pub extra_samples: Option<ExtraSamples>,
    /// `ColorMap`.
    pub color_map: Option<ColorMap>,
    /// `ReferenceBlackWhite`, 6 values.
    pub reference_black_white: Option<Vec<Rational>>,
    /// `YCbCrCoefficients`, 3 values.
    pub ycbcr_coefficients: Option<Vec<Rational>>,
    /// `YCbCrSubSampling` as `[horizontal, vertical]`.
    pub ycbcr_subsampling: Option<[u16; 2]>,
    /// `Compression`.
    pub compression: Compression,
    /// File byte order.
    pub byte_order: ByteOrder,
    /// `InterColorProfile` bytes.
    pub icc_profile: Option<Vec<u8>>,
}

impl FrameTags {
    /// Creates a tag set with TIFF defaults for everything but the
    /// photometric interpretation and bit depths.
    pub fn new(photometric: Photometric, bits_per_sample: BitsPerSample) -> Self {
        Self {
            photometric,
            planar_configuration: PlanarConfiguration::Chunky,
            bits_per_sample,
            sample_format: SampleFormat::UnsignedInteger,
            extra_samples: None,
            color_map: None,
            reference_black_white: None,
            ycbcr_coefficients: None,
            ycbcr_subsampling: None,
            compression: Compression::None,
            byte_order: ByteOrder::LittleEndian,
            icc_profile: None,
        }
    }

    /// Sets the planar configuration.
    pub fn with_planar(mut self, config: PlanarConfiguration) -> Self {
        self.planar_configuration = config;
        self
    }

    /// Sets the sample format.
    pub fn with_sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = format;
        self
    }

    /// Sets the extra sample meaning.
    pub fn with_extra_samples(mut self, extra: ExtraSamples) -> Self {
        self.extra_samples = Some(extra);
        self
    }

    /// Sets the color map.
    pub fn with_color_map(mut self, map: ColorMap) -> Self {
        self.color_map = Some(map);
        self
    }

    /// Sets reference black/white.
    pub fn with_reference_black_white(mut self, values: Vec<Rational>) -> Self {
        self.reference_black_white = Some(values);
        self
    }

    /// Sets YCbCr luma coefficients.
    pub fn with_ycbcr_coefficients(mut self, values: Vec<Rational>) -> Self {
        self.ycbcr_coefficients = Some(values);
        self
    }

    /// Sets YCbCr subsampling factors.
    pub fn with_ycbcr_subsampling(mut self, horizontal: u16, vertical: u16) -> Self {
        self.ycbcr_subsampling = Some([horizontal, vertical]);
        self
    }

    /// Sets the compression scheme.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the byte order.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.byte_order = order;
        self
    }

    /// Attaches an ICC profile.
    pub fn with_icc_profile(mut self, profile: Vec<u8>) -> Self {
        self.icc_profile = Some(profile);
        self
    }

    /// True if the frame stores one buffer per sample.
    pub fn is_planar(&self) -> bool {
        self.planar_configuration == PlanarConfiguration::Planar
    }

    /// Subsampling factors that actually rearrange the stream, if any.
    pub fn active_subsampling(&self) -> Option<[u16; 2]> {
        if self.photometric != Photometric::YCbCr || self.compression.is_jpeg() {
            return None;
        }
        self.ycbcr_subsampling.filter(|&s| s != [1, 1])
    }

    /// Picks the decoder variant for this frame.
    ///
    /// # Errors
    ///
    /// - [`TiffError::UnsupportedPhotometric`] for interpretations without a decoder
    /// - [`TiffError::NotYetSupported`] for unsupported depth, layout or format combinations
    pub fn resolve_color_type(&self) -> TiffResult<TiffColorType> {
        use TiffColorType as T;

        let bits = &self.bits_per_sample;
        let channels = bits.channels();
        let planar = self.is_planar() && channels > 1;
        let float = self.sample_format == SampleFormat::Float;

        match self.sample_format {
            SampleFormat::Float if !bits.is_uniform(32) => {
                return Err(TiffError::not_supported(format!(
                    "float samples of {:?} bits",
                    bits.as_slice()
                )));
            }
            SampleFormat::SignedInteger | SampleFormat::Void => {
                return Err(TiffError::not_supported(format!(
                    "{:?} sample format",
                    self.sample_format
                )));
            }
            _ => {}
        }
        if bits.as_slice().iter().any(|&b| b == 0 || b > 32) {
            return Err(TiffError::not_supported(format!(
                "bits per sample {:?}",
                bits.as_slice()
            )));
        }

        let color_type = match self.photometric {
            Photometric::WhiteIsZero | Photometric::BlackIsZero => {
                if channels != 1 {
                    return Err(TiffError::not_supported("grayscale with extra samples"));
                }
                let white = self.photometric == Photometric::WhiteIsZero;
                let pick = |w: T, b: T| if white { w } else { b };
                match (bits.channel(0), float) {
                    (32, true) => pick(T::WhiteIsZero32Float, T::BlackIsZero32Float),
                    (1, _) => pick(T::WhiteIsZero1, T::BlackIsZero1),
                    (4, _) => pick(T::WhiteIsZero4, T::BlackIsZero4),
                    (8, _) => pick(T::WhiteIsZero8, T::BlackIsZero8),
                    (16, _) => pick(T::WhiteIsZero16, T::BlackIsZero16),
                    (24, _) => pick(T::WhiteIsZero24, T::BlackIsZero24),
                    (32, _) => pick(T::WhiteIsZero32, T::BlackIsZero32),
                    _ => pick(T::WhiteIsZero, T::BlackIsZero),
                }
            }
            Photometric::Rgb => match (channels, planar) {
                (3, false) if float => T::RgbFloat323232,
                (3, false) => match uniform_bits(bits) {
                    Some(2) => T::Rgb222,
                    Some(4) => T::Rgb444,
                    Some(8) => T::Rgb888,
                    Some(10) => T::Rgb101010,
                    Some(12) => T::Rgb121212,
                    Some(14) => T::Rgb141414,
                    Some(16) => T::Rgb161616,
                    Some(24) => T::Rgb242424,
                    Some(32) => T::Rgb323232,
                    _ => T::Rgb,
                },
                (4, false) if float => T::RgbaFloat32323232,
                (4, false) => match uniform_bits(bits) {
                    Some(2) => T::Rgba2222,
                    Some(3) => T::Rgba3333,
                    Some(4) => T::Rgba4444,
                    Some(5) => T::Rgba5555,
                    Some(6) => T::Rgba6666,
                    Some(8) => T::Rgba8888,
                    Some(10) => T::Rgba10101010,
                    Some(12) => T::Rgba12121212,
                    Some(14) => T::Rgba14141414,
                    Some(16) => T::Rgba16161616,
                    Some(24) => T::Rgba24242424,
                    Some(32) => T::Rgba32323232,
                    _ => T::Rgba,
                },
                (3 | 4, true) if float => {
                    return Err(TiffError::not_supported("planar float RGB"));
                }
                (3, true) => match uniform_bits(bits) {
                    Some(16) => T::Rgb161616Planar,
                    Some(24) => T::Rgb242424Planar,
                    Some(32) => T::Rgb323232Planar,
                    _ => T::Rgb888Planar,
                },
                (4, true) => match uniform_bits(bits) {
                    Some(16) => T::Rgba16161616Planar,
                    Some(24) => T::Rgba24242424Planar,
                    Some(32) => T::Rgba32323232Planar,
                    _ => T::Rgba8888Planar,
                },
                _ => {
                    return Err(TiffError::not_supported(format!("RGB with {channels} samples")));
                }
            },
            Photometric::PaletteColor => {
                if planar {
                    return Err(TiffError::not_supported("planar palette color"));
                }
                T::PaletteColor
            }
            Photometric::YCbCr => {
                if !bits.matches(3, 8) {
                    return Err(TiffError::not_supported(format!(
                        "YCbCr with bits per sample {:?}",
                        bits.as_slice()
                    )));
                }
                if self.compression.is_jpeg() {
                    // The JPEG decompressor already converted to RGB.
                    T::Rgb888
                } else if planar {
                    T::YCbCrPlanar
                } else {
                    T::YCbCr
                }
            }
            Photometric::Separated => {
                if planar || channels != 4 {
                    return Err(TiffError::not_supported("only chunky 4-channel CMYK"));
                }
                T::Cmyk
            }
            Photometric::CieLab => match (planar, uniform_bits(bits), channels) {
                (false, Some(8), 3) => T::CieLab,
                (false, Some(16), 3) => T::CieLab16,
                (true, Some(8), 3) => T::CieLabPlanar,
                _ => {
                    return Err(TiffError::not_supported(format!(
                        "CIE Lab with bits per sample {:?}",
                        bits.as_slice()
                    )));
                }
            },
            other => return Err(TiffError::UnsupportedPhotometric(format!("{other:?}"))),
        };

        Ok(color_type)
    }

    /// Bytes a chunky block of `width` x `height` pixels occupies.
    pub fn chunky_block_bytes(&self, width: u32, height: u32) -> usize {
        if let Some([h, v]) = self.active_subsampling() {
            let (h, v) = (h as u32, v as u32);
            let blocks = (padded(width, h) / h) as usize * (padded(height, v) / v) as usize;
            return blocks * (h * v + 2) as usize;
        }
        block_bytes(width, height, self.bits_per_sample.bits_per_pixel())
    }

    /// Bytes plane `plane` of a planar block occupies.
    pub fn plane_bytes(&self, plane: usize, width: u32, height: u32) -> usize {
        if let Some([h, v]) = self.active_subsampling() {
            let (h, v) = (h as u32, v as u32);
            let padded_width = padded(width, h);
            return match plane {
                0 => padded_width as usize * height as usize,
                _ => (padded_width / h) as usize * (padded(height, v) / v) as usize,
            };
        }
        block_bytes(width, height, self.bits_per_sample.channel(plane) as u32)
    }
}

fn uniform_bits(bits: &BitsPerSample) -> Option<u16> {
    let first = bits.channel(0);
    bits.is_uniform(first).then_some(first)
}
