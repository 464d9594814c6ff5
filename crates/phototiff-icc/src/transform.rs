//! Float transforms from a source profile into an RGB destination.

use crate::{IccError, IccResult, Intent, Profile, ProfileColorSpace};
use lcms2::{DisallowCache, Flags, GlobalContext, PixelFormat, Pod, Transform as LcmsTransform};

/// A thread-safe color transform producing float RGB.
///
/// `N` is the number of float channels per source pixel: 3 for Lab or RGB
/// sources, 4 for CMYK. Values follow the Little CMS float conventions:
/// Lab as `L` in `0..=100` with signed `a`/`b`, CMYK ink in `0..=100`,
/// RGB in `0..=1`.
///
/// The transform is built without the Little CMS pixel cache, which makes
/// it `Sync`; one instance serves every strip of a frame.
///
/// # Example
///
/// ```rust
/// use phototiff_icc::{Intent, Profile, Transform};
///
/// let lab = Profile::lab_d50().unwrap();
/// let transform = Transform::<3>::new(&lab, &Profile::srgb(), Intent::Perceptual).unwrap();
///
/// let mut rgb = [[0.0f32; 3]; 1];
/// transform.apply_row(&[[100.0, 0.0, 0.0]], &mut rgb);
/// assert!(rgb[0][1] > 0.99);
/// ```
pub struct Transform<const N: usize> {
    inner: LcmsTransform<[f32; N], [f32; 3], GlobalContext, DisallowCache>,
}

impl<const N: usize> Transform<N>
where
    [f32; N]: Pod,
{
    /// Creates a transform between two profiles.
    ///
    /// # Errors
    ///
    /// - [`IccError::ColorSpaceMismatch`] if the source space doesn't have `N`
    ///   channels or the destination isn't RGB
    /// - [`IccError::TransformFailed`] if Little CMS rejects the pair
    pub fn new(source: &Profile, dest: &Profile, intent: Intent) -> IccResult<Self> {
        dest.expect_space(ProfileColorSpace::Rgb)?;

        let space = source.color_space();
        let in_format = match (space, N) {
            (ProfileColorSpace::Lab, 3) => PixelFormat::Lab_FLT,
            (ProfileColorSpace::Rgb, 3) => PixelFormat::RGB_FLT,
            (ProfileColorSpace::Cmyk, 4) => PixelFormat::CMYK_FLT,
            _ => {
                return Err(IccError::ColorSpaceMismatch {
                    expected: format!("{N}-channel source"),
                    actual: space.to_string(),
                });
            }
        };

        let inner = LcmsTransform::new_flags_context(
            GlobalContext::new(),
            &source.inner,
            in_format,
            &dest.inner,
            PixelFormat::RGB_FLT,
            intent.into(),
            Flags::NO_CACHE,
        )
        .map_err(|e| IccError::TransformFailed(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Transforms a row of source pixels into `dest`.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length.
    pub fn apply_row(&self, source: &[[f32; N]], dest: &mut [[f32; 3]]) {
        assert_eq!(source.len(), dest.len(), "source and dest must have same length");
        self.inner.transform_pixels(source, dest);
    }
}

impl<const N: usize> std::fmt::Debug for Transform<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("channels", &N)
            .finish_non_exhaustive()
    }
}
