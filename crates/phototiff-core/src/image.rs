//! Image buffer types for decoded pixels.
//!
//! - [`Image`] - Owned row-major pixel buffer
//! - [`ImageViewMut`] - Mutable rectangular window borrowed from an image
//!
//! # Memory Layout
//!
//! Images store pixels in **row-major** order, top-to-bottom, with no row
//! padding:
//!
//! ```text
//! [P P P P ...]  <- Row 0
//! [P P P P ...]  <- Row 1
//! ```
//!
//! # Views
//!
//! Decoders write through an [`ImageViewMut`]. A view addresses pixels by
//! their image coordinates, so a decoder handed the tile at columns 64..128,
//! rows 16..32 writes pixel (64, 16) exactly as it would on the full image.
//! Disjoint views can be handed to different threads.
//!
//! ```rust
//! use phototiff_core::{Image, Rect, Rgba};
//!
//! let mut img: Image<Rgba<u8>> = Image::new(4, 4);
//! let mut tiles = img
//!     .split_regions_mut(&[Rect::new(0, 0, 2, 4), Rect::new(2, 0, 2, 4)])
//!     .unwrap();
//! tiles[1].span_mut(3, 2, 2)[1] = Rgba::new(255, 0, 0, 255);
//! drop(tiles);
//! assert_eq!(img.pixel(3, 3).r, 255);
//! ```

use crate::error::{Error, Result};
use crate::pixel::Pixel;
use crate::rect::Rect;

/// An owned image buffer.
///
/// # Example
///
/// ```rust
/// use phototiff_core::{Image, Rgb};
///
/// let img: Image<Rgb<u16>> = Image::new(640, 480);
/// assert_eq!(img.dimensions(), (640, 480));
/// ```
#[derive(Clone)]
pub struct Image<P: Pixel> {
    data: Vec<P>,
    width: u32,
    height: u32,
}

impl<P: Pixel> Image<P> {
    /// Creates a new image filled with the default (zero) pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, P::default())
    }

    /// Creates an image filled with a specific pixel value.
    pub fn filled(width: u32, height: u32, pixel: P) -> Self {
        Self {
            data: vec![pixel; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Creates an image from existing pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if data length doesn't match.
    pub fn from_data(width: u32, height: u32, data: Vec<P>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the full image rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns the raw pixel data.
    #[inline]
    pub fn data(&self) -> &[P] {
        &self.data
    }

    /// Consumes the image, returning its pixels.
    pub fn into_data(self) -> Vec<P> {
        self.data
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> P {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<P> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Returns a row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[P] {
        assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    /// Returns a mutable row of pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize;
        let width = self.width as usize;
        &mut self.data[start..start + width]
    }

    /// Returns a mutable view covering the whole image.
    pub fn view_mut(&mut self) -> ImageViewMut<'_, P> {
        let region = self.bounds();
        ImageViewMut {
            rows: rows_mut(&mut self.data, self.width, self.height).collect(),
            region,
        }
    }

    /// Splits the image into disjoint mutable views, one per rectangle.
    ///
    /// Views come back in the order of `regions`. Rectangles may tile the
    /// image in any arrangement (row bands, side-by-side tiles, gaps); they
    /// only have to stay inside the image and not share a pixel.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRegion`] if a rectangle reaches past the image
    /// - [`Error::OverlappingRegions`] if two rectangles share a pixel
    pub fn split_regions_mut(&mut self, regions: &[Rect]) -> Result<Vec<ImageViewMut<'_, P>>> {
        let bounds = self.bounds();
        if let Some(r) = regions.iter().find(|r| !bounds.contains_rect(r)) {
            return Err(Error::invalid_region(
                r.x,
                r.y,
                r.width,
                r.height,
                self.width,
                self.height,
            ));
        }

        // Left to right within a row; empty rectangles claim nothing.
        let mut by_column: Vec<usize> = (0..regions.len())
            .filter(|&i| !regions[i].is_empty())
            .collect();
        by_column.sort_by_key(|&i| (regions[i].x, regions[i].y));

        let mut views: Vec<ImageViewMut<'_, P>> = regions
            .iter()
            .map(|&region| {
                let mut rows = Vec::with_capacity(region.height as usize);
                if region.width == 0 {
                    rows.resize_with(region.height as usize, <&mut [P]>::default);
                }
                ImageViewMut { rows, region }
            })
            .collect();

        for (y, row) in rows_mut(&mut self.data, self.width, self.height).enumerate() {
            let y = y as u32;
            let mut rest = row;
            let mut cursor = 0u32;
            let mut previous: Option<usize> = None;

            for &i in &by_column {
                let region = regions[i];
                if y < region.y || y >= region.bottom() {
                    continue;
                }
                if let Some(p) = previous.filter(|_| region.x < cursor) {
                    return Err(Error::OverlappingRegions {
                        first: regions[p],
                        second: region,
                    });
                }
                let (_, tail) = std::mem::take(&mut rest).split_at_mut((region.x - cursor) as usize);
                let (span, tail) = tail.split_at_mut(region.width as usize);
                rest = tail;
                cursor = region.right();
                previous = Some(i);
                views[i].rows.push(span);
            }
        }

        Ok(views)
    }
}

/// Full-width mutable rows of a row-major buffer.
fn rows_mut<P>(data: &mut [P], width: u32, height: u32) -> impl Iterator<Item = &mut [P]> {
    let width = width as usize;
    let (body, empty) = if width == 0 {
        (&mut data[..0], height as usize)
    } else {
        (data, 0)
    };
    body.chunks_exact_mut(width.max(1))
        .chain(std::iter::repeat_with(<&mut [P]>::default).take(empty))
}

impl<P: Pixel> std::fmt::Debug for Image<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &P::CHANNELS)
            .finish()
    }
}

/// A mutable rectangular window into an image.
///
/// Rows and columns are addressed in image coordinates, so a decoder
/// writes a tile at `(64, 32)` identically whether it holds the whole
/// image or just that tile's view.
pub struct ImageViewMut<'a, P: Pixel> {
    rows: Vec<&'a mut [P]>,
    region: Rect,
}

impl<P: Pixel> ImageViewMut<'_, P> {
    /// Returns the view width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// Returns the number of rows in the view.
    #[inline]
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Returns the region this view covers in image coordinates.
    #[inline]
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Returns the view's part of image row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the row is outside this view.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [P] {
        let region = self.region;
        assert!(
            y >= region.y && y < region.bottom(),
            "row {y} outside view {}..{}",
            region.y,
            region.bottom()
        );
        &mut *self.rows[(y - region.y) as usize]
    }

    /// Returns `width` pixels of image row `y` starting at image column `x`.
    ///
    /// # Panics
    ///
    /// Panics if the span is outside this view.
    #[inline]
    pub fn span_mut(&mut self, y: u32, x: u32, width: u32) -> &mut [P] {
        let region = self.region;
        assert!(
            x >= region.x && x + width <= region.right(),
            "columns {x}..{} outside view {}..{}",
            x + width,
            region.x,
            region.right()
        );
        let start = (x - region.x) as usize;
        &mut self.row_mut(y)[start..start + width as usize]
    }

    /// Returns the pixel at image coordinates (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> P {
        let region = self.region;
        assert!(
            x >= region.x && x < region.right() && y >= region.y && y < region.bottom(),
            "pixel ({x}, {y}) outside view {region:?}"
        );
        self.rows[(y - region.y) as usize][(x - region.x) as usize]
    }
}

impl<P: Pixel> std::fmt::Debug for ImageViewMut<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageViewMut")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{Luma, Rgba};

    #[test]
    fn test_from_data_checks_length() {
        assert!(Image::<Luma<u8>>::from_data(2, 2, vec![Luma(0); 4]).is_ok());
        assert!(Image::<Luma<u8>>::from_data(2, 2, vec![Luma(0); 3]).is_err());
    }

    #[test]
    fn test_row_mut() {
        let mut img: Image<Luma<u8>> = Image::new(3, 2);
        img.row_mut(1).copy_from_slice(&[Luma(1), Luma(2), Luma(3)]);
        assert_eq!(img.pixel(2, 1), Luma(3));
        assert_eq!(img.pixel(2, 0), Luma(0));
        assert_eq!(img.get_pixel(3, 0), None);
    }

    #[test]
    fn test_view_uses_image_coordinates() {
        let mut img: Image<Luma<u8>> = Image::new(4, 4);
        {
            let mut views = img.split_regions_mut(&[Rect::new(1, 2, 3, 2)]).unwrap();
            let view = &mut views[0];
            assert_eq!(view.region(), Rect::new(1, 2, 3, 2));
            assert_eq!(view.row_mut(3).len(), 3);
            view.span_mut(3, 2, 2).copy_from_slice(&[Luma(7), Luma(9)]);
            assert_eq!(view.pixel(3, 3), Luma(9));
        }
        assert_eq!(img.pixel(2, 3), Luma(7));
        assert_eq!(img.pixel(3, 3), Luma(9));
        assert_eq!(img.pixel(1, 3), Luma(0));
    }

    #[test]
    #[should_panic(expected = "outside view")]
    fn test_view_rejects_foreign_row() {
        let mut img: Image<Luma<u8>> = Image::new(2, 4);
        let mut views = img.split_regions_mut(&[Rect::new(0, 0, 2, 2)]).unwrap();
        views[0].row_mut(2);
    }

    #[test]
    #[should_panic(expected = "outside view")]
    fn test_view_rejects_foreign_columns() {
        let mut img: Image<Luma<u8>> = Image::new(4, 2);
        let mut views = img.split_regions_mut(&[Rect::new(0, 0, 2, 2)]).unwrap();
        views[0].span_mut(0, 1, 2);
    }

    #[test]
    fn test_split_row_bands_with_gap() {
        let mut img: Image<Rgba<u8>> = Image::new(2, 6);
        {
            let mut bands = img
                .split_regions_mut(&[Rect::new(0, 3, 2, 3), Rect::new(0, 0, 2, 1)])
                .unwrap();
            assert_eq!(bands.len(), 2);
            assert_eq!(bands[0].height(), 3);
            bands[0].row_mut(3)[0] = Rgba::new(1, 2, 3, 4);
            bands[1].row_mut(0)[1] = Rgba::new(5, 6, 7, 8);
        }
        assert_eq!(img.pixel(0, 3), Rgba::new(1, 2, 3, 4));
        assert_eq!(img.pixel(1, 0), Rgba::new(5, 6, 7, 8));
    }

    #[test]
    fn test_split_side_by_side_tiles() {
        let mut img: Image<Luma<u8>> = Image::new(4, 4);
        let tiles = [
            Rect::new(0, 0, 2, 2),
            Rect::new(2, 0, 2, 2),
            Rect::new(0, 2, 2, 2),
            Rect::new(2, 2, 2, 2),
        ];
        {
            let mut views = img.split_regions_mut(&tiles).unwrap();
            for (value, (view, tile)) in views.iter_mut().zip(&tiles).enumerate() {
                for y in tile.y..tile.bottom() {
                    view.row_mut(y).fill(Luma(value as u8 + 1));
                }
            }
        }
        let values: Vec<u8> = img.data().iter().map(|p| p.0).collect();
        assert_eq!(values, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }

    #[test]
    fn test_split_errors() {
        let mut img: Image<Luma<u8>> = Image::new(4, 4);
        assert!(matches!(
            img.split_regions_mut(&[Rect::new(0, 0, 3, 2), Rect::new(2, 1, 2, 2)]),
            Err(Error::OverlappingRegions { .. })
        ));
        assert!(matches!(
            img.split_regions_mut(&[Rect::new(0, 0, 4, 3), Rect::new(0, 2, 4, 2)]),
            Err(Error::OverlappingRegions { .. })
        ));
        assert!(matches!(
            img.split_regions_mut(&[Rect::new(3, 0, 2, 1)]),
            Err(Error::InvalidRegion { .. })
        ));
        assert!(img.split_regions_mut(&[Rect::new(1, 1, 0, 2), Rect::new(0, 0, 4, 4)]).is_ok());
    }

    #[test]
    fn test_zero_width_image() {
        let mut img: Image<Luma<u8>> = Image::new(0, 3);
        let mut view = img.view_mut();
        assert!(view.row_mut(2).is_empty());
    }
}
