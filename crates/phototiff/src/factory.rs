//! Decoder selection.
//!
//! [`create`] and [`create_planar`] turn a resolved [`TiffColorType`] and
//! the frame's tags into a ready decoder. All format validation happens
//! here: once a decoder exists, every block of the frame can be decoded
//! without further checks.
//!
//! # Example
//!
//! ```
//! use phototiff::{create, BitsPerSample, DecoderOptions, FrameTags, Photometric};
//! use phototiff_core::{Image, Rgb};
//!
//! let tags = FrameTags::new(Photometric::Rgb, BitsPerSample::new(&[8, 8, 8]).unwrap());
//! let color_type = tags.resolve_color_type().unwrap();
//! let decoder = create(color_type, &tags, &DecoderOptions::default()).unwrap();
//!
//! let mut image: Image<Rgb<u8>> = Image::new(2, 1);
//! decoder.decode(&[255, 0, 0, 0, 0, 255], &mut image.view_mut(), 0, 0, 2, 1);
//! assert_eq!(image.pixel(1, 0), Rgb::new(0, 0, 255));
//! ```

use std::sync::Arc;

use crate::decoders::{
    AlphaMode, ChunkyDecoder, CieLabDecoder, CieLabPlanarDecoder, CmykDecoder, GrayDepth,
    GrayscaleDecoder, LabDepth, PaletteDecoder, PlanarDecoder, PlanarDepth, RgbDecoder, RgbDepth,
    RgbPlanarDecoder, RgbaDecoder, RgbaDepth, TiffColorDecoder, TiffPlanarColorDecoder,
    YCbCrDecoder, YCbCrPlanarDecoder,
};
use crate::error::{TiffError, TiffResult};
use crate::options::DecoderOptions;
use crate::tags::{BitsPerSample, FrameTags, TiffColorType};
use crate::ycbcr::YCbCrConverter;
use phototiff_icc::{CmykConverter, LabConverter};
use tracing::debug;

/// Builds the decoder for a chunky color type.
///
/// # Errors
///
/// - [`TiffError::InvalidColorType`] for planar color types
/// - [`TiffError::BitsPerSample`] if the bit depths don't fit the color type
/// - [`TiffError::MissingColorMap`] / [`TiffError::UnexpectedColorMap`] /
///   [`TiffError::InvalidColorMap`] for color map problems
/// - [`TiffError::InvalidSubsampling`], [`TiffError::InvalidReferenceBlackWhite`]
///   [`TiffError::InvalidYCbCrCoefficients`] and
///   [`TiffError::DegenerateYCbCrCoefficients`] for bad YCbCr tags
///
/// Palette frames with two samples per pixel treat the second as alpha
/// without consulting `ExtraSamples`.
pub fn create(
    color_type: TiffColorType,
    tags: &FrameTags,
    options: &DecoderOptions,
) -> TiffResult<TiffColorDecoder> {
    use TiffColorType as T;

    if color_type.is_planar() {
        return Err(TiffError::invalid_color_type(color_type));
    }
    check_color_map(color_type, tags)?;

    let bits = &tags.bits_per_sample;
    let order = tags.byte_order;
    let need = |ok: bool| ok.then_some(()).ok_or_else(|| TiffError::bits_per_sample(color_type, bits.as_slice()));

    let gray = |white: bool, depth: GrayDepth| {
        ChunkyDecoder::Grayscale(if white {
            GrayscaleDecoder::white_is_zero(depth, order)
        } else {
            GrayscaleDecoder::black_is_zero(depth, order)
        })
    };
    let rgb = |depth: RgbDepth| ChunkyDecoder::Rgb(RgbDecoder::new(depth, order));
    let alpha = AlphaMode::from_extra_samples(tags.extra_samples);
    let rgba = |depth: RgbaDepth| ChunkyDecoder::Rgba(RgbaDecoder::new(depth, order, alpha));

    let decoder = match color_type {
        T::WhiteIsZero | T::BlackIsZero => {
            need(bits.channels() == 1 && valid_depths(bits))?;
            gray(color_type == T::WhiteIsZero, GrayDepth::Bits(bits.channel(0)))
        }
        T::WhiteIsZero1 | T::BlackIsZero1 => {
            need(bits.matches(1, 1))?;
            gray(color_type == T::WhiteIsZero1, GrayDepth::One)
        }
        T::WhiteIsZero4 | T::BlackIsZero4 => {
            need(bits.matches(1, 4))?;
            gray(color_type == T::WhiteIsZero4, GrayDepth::Four)
        }
        T::WhiteIsZero8 | T::BlackIsZero8 => {
            need(bits.matches(1, 8))?;
            gray(color_type == T::WhiteIsZero8, GrayDepth::Eight)
        }
        T::WhiteIsZero16 | T::BlackIsZero16 => {
            need(bits.matches(1, 16))?;
            gray(color_type == T::WhiteIsZero16, GrayDepth::Sixteen)
        }
        T::WhiteIsZero24 | T::BlackIsZero24 => {
            need(bits.matches(1, 24))?;
            gray(color_type == T::WhiteIsZero24, GrayDepth::TwentyFour)
        }
        T::WhiteIsZero32 | T::BlackIsZero32 => {
            need(bits.matches(1, 32))?;
            gray(color_type == T::WhiteIsZero32, GrayDepth::ThirtyTwo)
        }
        T::WhiteIsZero32Float | T::BlackIsZero32Float => {
            need(bits.matches(1, 32))?;
            gray(color_type == T::WhiteIsZero32Float, GrayDepth::Float)
        }

        T::Rgb => {
            need(bits.channels() == 3 && valid_depths(bits))?;
            rgb(RgbDepth::Bits([bits.channel(0), bits.channel(1), bits.channel(2)]))
        }
        T::Rgb222 | T::Rgb101010 | T::Rgb121212 | T::Rgb141414 => {
            let depth = match color_type {
                T::Rgb222 => 2,
                T::Rgb101010 => 10,
                T::Rgb121212 => 12,
                _ => 14,
            };
            need(bits.matches(3, depth))?;
            rgb(RgbDepth::Bits([depth; 3]))
        }
        T::Rgb444 => {
            need(bits.matches(3, 4))?;
            rgb(RgbDepth::Rgb444)
        }
        T::Rgb888 => {
            need(bits.matches(3, 8))?;
            rgb(RgbDepth::Eight)
        }
        T::Rgb161616 => {
            need(bits.matches(3, 16))?;
            rgb(RgbDepth::Sixteen)
        }
        T::Rgb242424 => {
            need(bits.matches(3, 24))?;
            rgb(RgbDepth::TwentyFour)
        }
        T::Rgb323232 => {
            need(bits.matches(3, 32))?;
            rgb(RgbDepth::ThirtyTwo)
        }
        T::RgbFloat323232 => {
            need(bits.matches(3, 32))?;
            rgb(RgbDepth::Float)
        }

        T::Rgba => {
            need(bits.channels() == 4 && valid_depths(bits))?;
            rgba(RgbaDepth::Bits([
                bits.channel(0),
                bits.channel(1),
                bits.channel(2),
                bits.channel(3),
            ]))
        }
        T::Rgba2222
        | T::Rgba3333
        | T::Rgba4444
        | T::Rgba5555
        | T::Rgba6666
        | T::Rgba10101010
        | T::Rgba12121212
        | T::Rgba14141414 => {
            let depth = match color_type {
                T::Rgba2222 => 2,
                T::Rgba3333 => 3,
                T::Rgba4444 => 4,
                T::Rgba5555 => 5,
                T::Rgba6666 => 6,
                T::Rgba10101010 => 10,
                T::Rgba12121212 => 12,
                _ => 14,
            };
            need(bits.matches(4, depth))?;
            rgba(RgbaDepth::Bits([depth; 4]))
        }
        T::Rgba8888 => {
            need(bits.matches(4, 8))?;
            rgba(RgbaDepth::Eight)
        }
        T::Rgba16161616 => {
            need(bits.matches(4, 16))?;
            rgba(RgbaDepth::Sixteen)
        }
        T::Rgba24242424 => {
            need(bits.matches(4, 24))?;
            rgba(RgbaDepth::TwentyFour)
        }
        T::Rgba32323232 => {
            need(bits.matches(4, 32))?;
            rgba(RgbaDepth::ThirtyTwo)
        }
        T::RgbaFloat32323232 => {
            need(bits.matches(4, 32))?;
            rgba(RgbaDepth::Float)
        }

        T::PaletteColor => {
            // A second sample is per-pixel alpha whatever ExtraSamples says,
            // including when the tag is absent.
            let index_bits = bits.channel(0);
            let alpha_bits = (bits.channels() == 2).then(|| bits.channel(1));
            need(
                (1..=2).contains(&bits.channels())
                    && (1..=16).contains(&index_bits)
                    && alpha_bits.is_none_or(|b| (1..=32).contains(&b)),
            )?;
            let map = tags.color_map.as_ref().ok_or(TiffError::MissingColorMap)?;
            let expected = 1usize << index_bits;
            if map.len() != expected {
                return Err(TiffError::InvalidColorMap {
                    expected,
                    actual: map.len(),
                });
            }
            ChunkyDecoder::Palette(PaletteDecoder::new(index_bits, alpha_bits, map))
        }

        T::YCbCr => {
            need(bits.matches(3, 8))?;
            let (converter, subsampling) = ycbcr_parts(tags)?;
            ChunkyDecoder::YCbCr(YCbCrDecoder::new(converter, subsampling))
        }

        T::CieLab => {
            need(bits.matches(3, 8))?;
            ChunkyDecoder::CieLab(CieLabDecoder::new(LabDepth::Eight, order, lab_converter(tags, options)))
        }
        T::CieLab16 => {
            need(bits.matches(3, 16))?;
            ChunkyDecoder::CieLab(CieLabDecoder::new(LabDepth::Sixteen, order, lab_converter(tags, options)))
        }

        T::Cmyk => {
            if tags.compression.is_jpeg() {
                need(bits.channels() >= 3 && bits.is_uniform(8))?;
                ChunkyDecoder::Cmyk(CmykDecoder::jpeg_rgb())
            } else {
                need(bits.matches(4, 8))?;
                let converter = CmykConverter::for_frame(icc_profile(tags, options), options.intent);
                ChunkyDecoder::Cmyk(CmykDecoder::new(Arc::new(converter)))
            }
        }

        T::Rgb888Planar
        | T::Rgb161616Planar
        | T::Rgb242424Planar
        | T::Rgb323232Planar
        | T::Rgba8888Planar
        | T::Rgba16161616Planar
        | T::Rgba24242424Planar
        | T::Rgba32323232Planar
        | T::YCbCrPlanar
        | T::CieLabPlanar => return Err(TiffError::invalid_color_type(color_type)),
    };

    debug!(?color_type, bits = ?bits.as_slice(), byte_order = ?order, "selected chunky decoder");
    Ok(TiffColorDecoder::new(color_type, decoder))
}

/// Builds the decoder for a planar color type.
///
/// # Errors
///
/// - [`TiffError::InvalidColorType`] for chunky color types
/// - [`TiffError::BitsPerSample`] if the bit depths don't fit the color type
/// - [`TiffError::UnexpectedColorMap`] if a color map is present
/// - YCbCr tag errors as for [`create`]
pub fn create_planar(
    color_type: TiffColorType,
    tags: &FrameTags,
    options: &DecoderOptions,
) -> TiffResult<TiffPlanarColorDecoder> {
    use TiffColorType as T;

    if !color_type.is_planar() {
        return Err(TiffError::invalid_color_type(color_type));
    }
    check_color_map(color_type, tags)?;

    let bits = &tags.bits_per_sample;
    let order = tags.byte_order;
    let need = |ok: bool| ok.then_some(()).ok_or_else(|| TiffError::bits_per_sample(color_type, bits.as_slice()));
    let alpha = AlphaMode::from_extra_samples(tags.extra_samples);
    let all_bits = [bits.channel(0), bits.channel(1), bits.channel(2), bits.channel(3)];

    let decoder = match color_type {
        T::Rgb888Planar => {
            need(bits.channels() == 3 && valid_depths(bits))?;
            PlanarDecoder::Rgb(RgbPlanarDecoder::rgb(PlanarDepth::Bits(all_bits), order))
        }
        T::Rgb161616Planar | T::Rgb242424Planar | T::Rgb323232Planar => {
            let (depth, sample) = match color_type {
                T::Rgb161616Planar => (16, PlanarDepth::Sixteen),
                T::Rgb242424Planar => (24, PlanarDepth::TwentyFour),
                _ => (32, PlanarDepth::ThirtyTwo),
            };
            need(bits.matches(3, depth))?;
            PlanarDecoder::Rgb(RgbPlanarDecoder::rgb(sample, order))
        }
        T::Rgba8888Planar => {
            need(bits.channels() == 4 && valid_depths(bits))?;
            PlanarDecoder::Rgb(RgbPlanarDecoder::rgba(PlanarDepth::Bits(all_bits), order, alpha))
        }
        T::Rgba16161616Planar | T::Rgba24242424Planar | T::Rgba32323232Planar => {
            let (depth, sample) = match color_type {
                T::Rgba16161616Planar => (16, PlanarDepth::Sixteen),
                T::Rgba24242424Planar => (24, PlanarDepth::TwentyFour),
                _ => (32, PlanarDepth::ThirtyTwo),
            };
            need(bits.matches(4, depth))?;
            PlanarDecoder::Rgb(RgbPlanarDecoder::rgba(sample, order, alpha))
        }
        T::YCbCrPlanar => {
            need(bits.matches(3, 8))?;
            let (converter, subsampling) = ycbcr_parts(tags)?;
            PlanarDecoder::YCbCr(YCbCrPlanarDecoder::new(converter, subsampling))
        }
        T::CieLabPlanar => {
            need(bits.matches(3, 8))?;
            PlanarDecoder::CieLab(CieLabPlanarDecoder::new(lab_converter(tags, options)))
        }
        _ => return Err(TiffError::invalid_color_type(color_type)),
    };

    debug!(?color_type, bits = ?bits.as_slice(), byte_order = ?order, "selected planar decoder");
    Ok(TiffPlanarColorDecoder::new(color_type, decoder))
}

/// Resolves the color type from `tags` and builds the matching decoder,
/// chunky or planar.
///
/// # Errors
///
/// Anything [`FrameTags::resolve_color_type`], [`create`] or
/// [`create_planar`] can return.
pub fn create_for_frame(tags: &FrameTags, options: &DecoderOptions) -> TiffResult<FrameDecoder> {
    let color_type = tags.resolve_color_type()?;
    if color_type.is_planar() {
        create_planar(color_type, tags, options).map(FrameDecoder::Planar)
    } else {
        create(color_type, tags, options).map(FrameDecoder::Chunky)
    }
}

/// Either decoder kind, as picked by [`create_for_frame`].
#[derive(Debug)]
pub enum FrameDecoder {
    /// One buffer per block.
    Chunky(TiffColorDecoder),
    /// One buffer per sample plane.
    Planar(TiffPlanarColorDecoder),
}

impl FrameDecoder {
    /// The variant the decoder was built for.
    pub fn color_type(&self) -> TiffColorType {
        match self {
            Self::Chunky(d) => d.color_type(),
            Self::Planar(d) => d.color_type(),
        }
    }
}

fn valid_depths(bits: &BitsPerSample) -> bool {
    bits.as_slice().iter().all(|&b| (1..=32).contains(&b))
}

fn check_color_map(color_type: TiffColorType, tags: &FrameTags) -> TiffResult<()> {
    match (color_type, &tags.color_map) {
        (TiffColorType::PaletteColor, None) => Err(TiffError::MissingColorMap),
        (TiffColorType::PaletteColor, Some(_)) | (_, None) => Ok(()),
        (_, Some(_)) => Err(TiffError::UnexpectedColorMap(color_type)),
    }
}

fn ycbcr_parts(tags: &FrameTags) -> TiffResult<(YCbCrConverter, Option<[u16; 2]>)> {
    if let Some([horizontal, vertical]) = tags.ycbcr_subsampling {
        let valid = |f: u16| matches!(f, 1 | 2 | 4);
        if !valid(horizontal) || !valid(vertical) {
            return Err(TiffError::InvalidSubsampling {
                horizontal,
                vertical,
            });
        }
    }
    let converter = YCbCrConverter::new(
        tags.reference_black_white.as_deref(),
        tags.ycbcr_coefficients.as_deref(),
    )?;
    Ok((converter, tags.active_subsampling()))
}

fn icc_profile<'a>(tags: &'a FrameTags, options: &DecoderOptions) -> Option<&'a [u8]> {
    if options.ignore_icc_profile {
        return None;
    }
    tags.icc_profile.as_deref()
}

fn lab_converter(tags: &FrameTags, options: &DecoderOptions) -> Arc<LabConverter> {
    Arc::new(LabConverter::for_frame(icc_profile(tags, options), options.intent))
}
