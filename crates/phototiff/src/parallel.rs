//! Concurrent strip and tile decoding.
//!
//! Every block of a frame covers its own rectangle, so each one gets a
//! disjoint [`ImageViewMut`] split off the destination and the blocks are
//! decoded on the rayon pool with no locking. Strips (full-width row bands)
//! and tiles (rectangles side by side) go through the same path. The
//! decoder is shared read-only across workers; per-block state stays inside
//! each `decode` call.

use crate::decoders::{TiffColorDecoder, TiffPlanarColorDecoder};
use crate::error::TiffResult;
use phototiff_core::{Image, ImageViewMut, Pixel, Rect};
use rayon::prelude::*;
use tracing::debug;

/// One chunky block (strip or tile) and where it lands in the frame.
#[derive(Debug, Clone, Copy)]
pub struct Strip<'a> {
    /// Destination rectangle.
    pub rect: Rect,
    /// Decompressed sample bytes.
    pub data: &'a [u8],
}

impl<'a> Strip<'a> {
    /// Creates a strip.
    pub fn new(rect: Rect, data: &'a [u8]) -> Self {
        Self { rect, data }
    }
}

/// One planar block: a buffer per sample plane.
#[derive(Debug, Clone)]
pub struct PlanarStrip<'a> {
    /// Destination rectangle.
    pub rect: Rect,
    /// Decompressed sample bytes, one slice per plane.
    pub planes: Vec<&'a [u8]>,
}

impl<'a> PlanarStrip<'a> {
    /// Creates a planar strip.
    pub fn new(rect: Rect, planes: Vec<&'a [u8]>) -> Self {
        Self { rect, planes }
    }
}

/// Decodes `strips` into `image`, concurrently when `parallel` is set and
/// there is more than one block.
///
/// Blocks may arrive in any order and in any layout, as long as their
/// rectangles don't share a pixel.
///
/// # Errors
///
/// - [`phototiff_core::Error::InvalidRegion`] if a block reaches past the image
/// - [`phototiff_core::Error::OverlappingRegions`] if two blocks share a pixel
///
/// Both are reported before any pixel is written.
///
/// # Panics
///
/// Panics if a block's data is too short for its rectangle.
pub fn decode_strips<P: Pixel>(
    decoder: &TiffColorDecoder,
    strips: &[Strip<'_>],
    image: &mut Image<P>,
    parallel: bool,
) -> TiffResult<()> {
    let rects: Vec<Rect> = strips.iter().map(|s| s.rect).collect();
    let views = image.split_regions_mut(&rects)?;
    debug!(color_type = ?decoder.color_type(), blocks = strips.len(), parallel, "decoding blocks");

    let run = |(strip, mut view): (&Strip<'_>, ImageViewMut<'_, P>)| {
        let Strip { rect, data } = *strip;
        decoder.decode(data, &mut view, rect.x, rect.y, rect.width, rect.height);
    };
    dispatch(strips, views, parallel, run);
    Ok(())
}

/// Planar counterpart of [`decode_strips`].
///
/// # Errors
///
/// Same as [`decode_strips`].
pub fn decode_planar_strips<P: Pixel>(
    decoder: &TiffPlanarColorDecoder,
    strips: &[PlanarStrip<'_>],
    image: &mut Image<P>,
    parallel: bool,
) -> TiffResult<()> {
    let rects: Vec<Rect> = strips.iter().map(|s| s.rect).collect();
    let views = image.split_regions_mut(&rects)?;
    debug!(color_type = ?decoder.color_type(), blocks = strips.len(), parallel, "decoding planar blocks");

    let run = |(strip, mut view): (&PlanarStrip<'_>, ImageViewMut<'_, P>)| {
        let rect = strip.rect;
        decoder.decode(&strip.planes, &mut view, rect.x, rect.y, rect.width, rect.height);
    };
    dispatch(strips, views, parallel, run);
    Ok(())
}

fn dispatch<'s, 'i, S, P, F>(strips: &'s [S], views: Vec<ImageViewMut<'i, P>>, parallel: bool, run: F)
where
    S: Sync,
    P: Pixel,
    F: Fn((&'s S, ImageViewMut<'i, P>)) + Sync + Send,
{
    if parallel && strips.len() > 1 {
        strips.par_iter().zip(views).for_each(run);
    } else {
        strips.iter().zip(views).for_each(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoders::{ChunkyDecoder, GrayDepth, GrayscaleDecoder};
    use crate::error::TiffError;
    use crate::tags::{ByteOrder, TiffColorType};
    use phototiff_core::{Error as CoreError, Luma};

    fn gray8() -> TiffColorDecoder {
        TiffColorDecoder::new(
            TiffColorType::BlackIsZero8,
            ChunkyDecoder::Grayscale(GrayscaleDecoder::black_is_zero(GrayDepth::Eight, ByteOrder::LittleEndian)),
        )
    }

    fn frame(width: u32, height: u32) -> Vec<u8> {
        (0..width * height).map(|v| v as u8).collect()
    }

    fn strips(data: &[u8], width: u32, rows_per_strip: u32, height: u32) -> Vec<Strip<'_>> {
        (0..height)
            .step_by(rows_per_strip as usize)
            .map(|y| {
                let rows = rows_per_strip.min(height - y);
                let start = (y * width) as usize;
                let end = start + (rows * width) as usize;
                Strip::new(Rect::new(0, y, width, rows), &data[start..end])
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = frame(7, 10);
        let strips = strips(&data, 7, 3, 10);
        assert_eq!(strips.len(), 4);

        let mut sequential: Image<Luma<u8>> = Image::new(7, 10);
        let mut concurrent: Image<Luma<u8>> = Image::new(7, 10);
        decode_strips(&gray8(), &strips, &mut sequential, false).unwrap();
        decode_strips(&gray8(), &strips, &mut concurrent, true).unwrap();

        assert_eq!(sequential.data(), concurrent.data());
        let values: Vec<u8> = concurrent.data().iter().map(|p| p.0).collect();
        assert_eq!(values, data);
    }

    #[test]
    fn test_unsorted_strips() {
        let data = frame(4, 4);
        let mut strips = strips(&data, 4, 1, 4);
        strips.reverse();
        let mut img: Image<Luma<u8>> = Image::new(4, 4);
        decode_strips(&gray8(), &strips, &mut img, true).unwrap();
        assert_eq!(img.pixel(3, 3), Luma(15));
    }

    #[test]
    fn test_overlapping_strips_rejected() {
        let data = [0u8; 8];
        let strips = [
            Strip::new(Rect::new(0, 0, 2, 2), &data[..4]),
            Strip::new(Rect::new(0, 1, 2, 2), &data[4..]),
        ];
        let mut img: Image<Luma<u8>> = Image::filled(2, 3, Luma(9));
        let err = decode_strips(&gray8(), &strips, &mut img, true).unwrap_err();
        assert!(matches!(
            err,
            TiffError::Core(CoreError::OverlappingRegions { first, second })
                if first == Rect::new(0, 0, 2, 2) && second == Rect::new(0, 1, 2, 2)
        ));
        assert!(img.data().iter().all(|&p| p == Luma(9)));
    }

    /// Cuts a `width` x `height` frame into `tile` x `tile` blocks, each
    /// holding its own row-major copy of the frame's samples.
    fn tiles(data: &[u8], width: u32, height: u32, tile: u32) -> Vec<(Rect, Vec<u8>)> {
        let mut out = Vec::new();
        for ty in (0..height).step_by(tile as usize) {
            for tx in (0..width).step_by(tile as usize) {
                let rect = Rect::new(tx, ty, tile.min(width - tx), tile.min(height - ty));
                let bytes = (rect.y..rect.bottom())
                    .flat_map(|y| {
                        let start = (y * width + rect.x) as usize;
                        data[start..start + rect.width as usize].iter().copied()
                    })
                    .collect();
                out.push((rect, bytes));
            }
        }
        out
    }

    #[test]
    fn test_side_by_side_tiles() {
        let data = frame(4, 4);
        let tiles = tiles(&data, 4, 4, 2);
        assert_eq!(tiles.len(), 4);
        let blocks: Vec<Strip<'_>> = tiles.iter().map(|(r, b)| Strip::new(*r, b)).collect();

        let mut sequential: Image<Luma<u8>> = Image::new(4, 4);
        let mut concurrent: Image<Luma<u8>> = Image::new(4, 4);
        decode_strips(&gray8(), &blocks, &mut sequential, false).unwrap();
        decode_strips(&gray8(), &blocks, &mut concurrent, true).unwrap();

        assert_eq!(sequential.data(), concurrent.data());
        let values: Vec<u8> = concurrent.data().iter().map(|p| p.0).collect();
        assert_eq!(values, data);
    }

    #[test]
    fn test_ragged_tiles() {
        // 5x3 frame, 2x2 tiles: the right column and bottom row are partial.
        let data = frame(5, 3);
        let tiles = tiles(&data, 5, 3, 2);
        assert_eq!(tiles.len(), 6);
        let mut blocks: Vec<Strip<'_>> = tiles.iter().map(|(r, b)| Strip::new(*r, b)).collect();
        blocks.reverse();

        let mut img: Image<Luma<u8>> = Image::new(5, 3);
        decode_strips(&gray8(), &blocks, &mut img, true).unwrap();
        let values: Vec<u8> = img.data().iter().map(|p| p.0).collect();
        assert_eq!(values, data);
    }

    #[test]
    fn test_overlapping_tiles_rejected() {
        let data = [0u8; 4];
        let blocks = [
            Strip::new(Rect::new(0, 0, 2, 2), &data),
            Strip::new(Rect::new(1, 1, 2, 2), &data),
        ];
        let mut img: Image<Luma<u8>> = Image::filled(4, 4, Luma(9));
        assert!(matches!(
            decode_strips(&gray8(), &blocks, &mut img, true),
            Err(TiffError::Core(CoreError::OverlappingRegions { .. }))
        ));
        assert!(img.data().iter().all(|&p| p == Luma(9)));
    }

    #[test]
    fn test_strip_past_image_rejected() {
        let data = [0u8; 6];
        let wide = [Strip::new(Rect::new(0, 0, 3, 2), &data)];
        let mut img: Image<Luma<u8>> = Image::new(2, 2);
        assert!(matches!(
            decode_strips(&gray8(), &wide, &mut img, false),
            Err(TiffError::Core(CoreError::InvalidRegion { .. }))
        ));

        let tall = [Strip::new(Rect::new(0, 1, 2, 3), &data)];
        assert!(matches!(
            decode_strips(&gray8(), &tall, &mut img, false),
            Err(TiffError::Core(CoreError::InvalidRegion { .. }))
        ));
    }
}
