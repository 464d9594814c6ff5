//! # phototiff
//!
//! TIFF photometric interpretation decoding: turns decompressed strip or
//! tile bytes into pixels of any [`Pixel`] type.
//!
//! The container layer (tag parsing, decompression) lives elsewhere; this
//! crate starts from a resolved [`FrameTags`] and raw block bytes.
//!
//! - [`FrameTags`] / [`TiffColorType`] - Per-frame tags and the decoder variant they select
//! - [`create`] / [`create_planar`] - Validate tags, build a decoder
//! - [`TiffColorDecoder`] / [`TiffPlanarColorDecoder`] - Decode one block into an image band
//! - [`decode_strips`] - Decode many strips concurrently with rayon
//! - [`BitReader`], [`YCbCrConverter`], [`subsampling`] - Building blocks
//!
//! # Quick Start
//!
//! ```rust
//! use phototiff::{create_for_frame, BitsPerSample, DecoderOptions, FrameDecoder, FrameTags, Photometric};
//! use phototiff_core::{Image, Luma};
//!
//! // 4-bit white-is-zero, 3 pixels wide: rows are padded to whole bytes.
//! let tags = FrameTags::new(Photometric::WhiteIsZero, BitsPerSample::new(&[4]).unwrap());
//! let FrameDecoder::Chunky(decoder) = create_for_frame(&tags, &DecoderOptions::default()).unwrap() else {
//!     unreachable!()
//! };
//!
//! let mut image: Image<Luma<u8>> = Image::new(3, 2);
//! decoder.decode(&[0x0F, 0xF0, 0x88, 0x80], &mut image.view_mut(), 0, 0, 3, 2);
//! assert_eq!(image.row(0), &[Luma(255), Luma(0), Luma(0)]);
//! assert_eq!(image.row(1), &[Luma(119), Luma(119), Luma(119)]);
//! ```
//!
//! # Errors and Panics
//!
//! Format problems surface as [`TiffError`] from the factory, before any
//! pixel is written. Decoders themselves only panic, on contract
//! violations by the caller: a block rectangle outside the destination or
//! too few bytes for it.
//!
//! ## Crate Structure
//!
//! ```text
//! phototiff-core   phototiff-icc
//!        ^              ^
//!        +------+-------+
//!               |
//!           phototiff (this crate)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bit_reader;
pub mod decoders;
pub mod error;
pub mod factory;
pub mod options;
pub mod parallel;
pub mod samples;
pub mod subsampling;
pub mod tags;
pub mod ycbcr;

pub use bit_reader::BitReader;
pub use decoders::{TiffColorDecoder, TiffPlanarColorDecoder};
pub use error::{TiffError, TiffResult};
pub use factory::{create, create_for_frame, create_planar, FrameDecoder};
pub use options::DecoderOptions;
pub use parallel::{decode_planar_strips, decode_strips, PlanarStrip, Strip};
pub use tags::{
    BitsPerSample, ByteOrder, ColorMap, Compression, ExtraSamples, FrameTags, Photometric,
    PlanarConfiguration, Rational, SampleFormat, TiffColorType,
};
pub use ycbcr::YCbCrConverter;

#[doc(no_inline)]
pub use phototiff_core::Pixel;
