//! Decoder configuration.

use phototiff_icc::Intent;

/// Options applied when building decoders for a frame.
///
/// ```
/// use phototiff::DecoderOptions;
/// use phototiff_icc::Intent;
///
/// let options = DecoderOptions::default()
///     .with_intent(Intent::RelativeColorimetric)
///     .with_parallel(false);
/// assert!(!options.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Rendering intent for ICC conversions (CIE Lab, CMYK).
    pub intent: Intent,
    /// Skip embedded ICC profiles and always use the built-in formulas.
    pub ignore_icc_profile: bool,
    /// Decode strips on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            intent: Intent::Perceptual,
            ignore_icc_profile: false,
            parallel: true,
        }
    }
}

impl DecoderOptions {
    /// Sets the rendering intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Enables or disables embedded ICC profiles.
    pub fn with_ignore_icc_profile(mut self, ignore: bool) -> Self {
        self.ignore_icc_profile = ignore;
        self
    }

    /// Enables or disables parallel strip decoding.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
