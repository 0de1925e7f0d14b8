//! Quality-level tables and the user-facing options bag.

use crate::error::{Error, Result};
use crate::method::{FilterInterpolation, FilterMode};

/// Highest accepted quality level.
pub const MAX_QUALITY: u32 = 10;

/// Quality level used when the caller never calls
/// [`options_set_quality`] or overrides every relevant option by hand.
pub const DEFAULT_QUALITY: u32 = 4;

/// `oversample` per quality level, indices `0..=10`.
pub const OVERSAMPLE_QUALITIES: [i32; 11] = [4, 4, 4, 8, 8, 16, 16, 16, 16, 32, 32];

/// `(n_taps, cutoff)` per quality level for [`crate::method::ResamplerMethod::BlackmanNuttall`].
#[derive(Debug, Clone, Copy)]
pub struct BlackmanQuality {
    /// Filter length at this quality level.
    pub n_taps: i32,
    /// Normalized cutoff frequency.
    pub cutoff: f64,
}

/// `(cutoff, downsample_cutoff_factor, stopband_attenuation,
/// transition_bandwidth)` per quality level for
/// [`crate::method::ResamplerMethod::Kaiser`].
#[derive(Debug, Clone, Copy)]
pub struct KaiserQuality {
    /// Normalized cutoff frequency before any downsample correction.
    pub cutoff: f64,
    /// Multiplier applied to `cutoff` when downsampling.
    pub downsample_cutoff_factor: f64,
    /// Target stopband attenuation in dB.
    pub stopband_attenuation: f64,
    /// Transition bandwidth as a fraction of Nyquist.
    pub transition_bandwidth: f64,
}

/// Quality-indexed `(n_taps, cutoff)` table for `BlackmanNuttall`, indices `0..=10`.
pub const BLACKMAN_QUALITIES: [BlackmanQuality; 11] = [
    BlackmanQuality { n_taps: 8, cutoff: 0.5 },
    BlackmanQuality { n_taps: 16, cutoff: 0.6 },
    BlackmanQuality { n_taps: 24, cutoff: 0.72 },
    BlackmanQuality { n_taps: 32, cutoff: 0.8 },
    BlackmanQuality { n_taps: 48, cutoff: 0.85 },
    BlackmanQuality { n_taps: 64, cutoff: 0.90 },
    BlackmanQuality { n_taps: 80, cutoff: 0.92 },
    BlackmanQuality { n_taps: 96, cutoff: 0.933 },
    BlackmanQuality { n_taps: 128, cutoff: 0.950 },
    BlackmanQuality { n_taps: 148, cutoff: 0.955 },
    BlackmanQuality { n_taps: 160, cutoff: 0.960 },
];

/// Quality-indexed Kaiser parameter table, indices `0..=10`.
pub const KAISER_QUALITIES: [KaiserQuality; 11] = [
    KaiserQuality { cutoff: 0.860, downsample_cutoff_factor: 0.96511, stopband_attenuation: 60.0, transition_bandwidth: 0.7 },
    KaiserQuality { cutoff: 0.880, downsample_cutoff_factor: 0.96591, stopband_attenuation: 65.0, transition_bandwidth: 0.29 },
    KaiserQuality { cutoff: 0.910, downsample_cutoff_factor: 0.96923, stopband_attenuation: 70.0, transition_bandwidth: 0.145 },
    KaiserQuality { cutoff: 0.920, downsample_cutoff_factor: 0.97600, stopband_attenuation: 80.0, transition_bandwidth: 0.105 },
    KaiserQuality { cutoff: 0.940, downsample_cutoff_factor: 0.97979, stopband_attenuation: 85.0, transition_bandwidth: 0.087 },
    KaiserQuality { cutoff: 0.940, downsample_cutoff_factor: 0.98085, stopband_attenuation: 95.0, transition_bandwidth: 0.077 },
    KaiserQuality { cutoff: 0.945, downsample_cutoff_factor: 0.99471, stopband_attenuation: 100.0, transition_bandwidth: 0.068 },
    KaiserQuality { cutoff: 0.950, downsample_cutoff_factor: 1.0, stopband_attenuation: 105.0, transition_bandwidth: 0.055 },
    KaiserQuality { cutoff: 0.960, downsample_cutoff_factor: 1.0, stopband_attenuation: 110.0, transition_bandwidth: 0.045 },
    KaiserQuality { cutoff: 0.968, downsample_cutoff_factor: 1.0, stopband_attenuation: 115.0, transition_bandwidth: 0.039 },
    KaiserQuality { cutoff: 0.975, downsample_cutoff_factor: 1.0, stopband_attenuation: 120.0, transition_bandwidth: 0.0305 },
];

const DEFAULT_CUBIC_B: f64 = 1.0;
const DEFAULT_CUBIC_C: f64 = 0.0;
const DEFAULT_FILTER_OVERSAMPLE: i32 = 8;
const DEFAULT_MAX_PHASE_ERROR: f64 = 0.1;

/// User-overridable resampler options.
///
/// Every field defaults to "inherit the quality-level default for the
/// chosen method"; only set a field to override it. Construct with
/// [`ResamplerOptions::new`] or [`options_set_quality`], then adjust
/// with the builder methods.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResamplerOptions {
    /// Normalized cutoff frequency, `0 < c <= 1`.
    pub cutoff: Option<f64>,
    /// Multiplier applied to `cutoff` when downsampling.
    pub down_cutoff_factor: Option<f64>,
    /// Kaiser target stopband attenuation in dB.
    pub stop_attenuation: Option<f64>,
    /// Kaiser transition width as a fraction of Nyquist.
    pub transition_bandwidth: Option<f64>,
    /// Override for the filter length.
    pub n_taps: Option<i32>,
    /// Mitchell-Netravali `B` parameter.
    pub cubic_b: Option<f64>,
    /// Mitchell-Netravali `C` parameter.
    pub cubic_c: Option<f64>,
    /// Tap-table layout.
    pub filter_mode: Option<FilterMode>,
    /// Bytes; stored for API completeness, not read by the core
    /// selection logic beyond the `Auto` heuristic (which does not
    /// consult it either — see `DESIGN.md`).
    pub filter_mode_threshold: Option<i32>,
    /// Interpolation used in [`FilterMode::Interpolated`] mode.
    pub filter_interpolation: Option<FilterInterpolation>,
    /// Override for the oversampling factor.
    pub filter_oversample: Option<i32>,
    /// Rate-reduction phase-error tolerance.
    pub max_phase_error: Option<f64>,
}

impl ResamplerOptions {
    /// An options bag with every field unset (use quality-level defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`ResamplerOptions::cutoff`].
    #[must_use]
    pub fn cutoff(mut self, value: f64) -> Self {
        self.cutoff = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::down_cutoff_factor`].
    #[must_use]
    pub fn down_cutoff_factor(mut self, value: f64) -> Self {
        self.down_cutoff_factor = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::stop_attenuation`].
    #[must_use]
    pub fn stop_attenuation(mut self, value: f64) -> Self {
        self.stop_attenuation = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::transition_bandwidth`].
    #[must_use]
    pub fn transition_bandwidth(mut self, value: f64) -> Self {
        self.transition_bandwidth = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::n_taps`].
    #[must_use]
    pub fn n_taps(mut self, value: i32) -> Self {
        self.n_taps = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::cubic_b`] and [`ResamplerOptions::cubic_c`].
    #[must_use]
    pub fn cubic_params(mut self, b: f64, c: f64) -> Self {
        self.cubic_b = Some(b);
        self.cubic_c = Some(c);
        self
    }

    /// Sets [`ResamplerOptions::filter_mode`].
    #[must_use]
    pub fn filter_mode(mut self, value: FilterMode) -> Self {
        self.filter_mode = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::filter_mode_threshold`].
    #[must_use]
    pub fn filter_mode_threshold(mut self, value: i32) -> Self {
        self.filter_mode_threshold = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::filter_interpolation`].
    #[must_use]
    pub fn filter_interpolation(mut self, value: FilterInterpolation) -> Self {
        self.filter_interpolation = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::filter_oversample`].
    #[must_use]
    pub fn filter_oversample(mut self, value: i32) -> Self {
        self.filter_oversample = Some(value);
        self
    }

    /// Sets [`ResamplerOptions::max_phase_error`].
    #[must_use]
    pub fn max_phase_error(mut self, value: f64) -> Self {
        self.max_phase_error = Some(value);
        self
    }

    pub(crate) fn cutoff_or(&self, default: f64) -> f64 {
        self.cutoff.unwrap_or(default)
    }

    pub(crate) fn n_taps_or(&self, default: i32) -> i32 {
        self.n_taps.unwrap_or(default)
    }

    pub(crate) fn cubic_b_or_default(&self) -> f64 {
        self.cubic_b.unwrap_or(DEFAULT_CUBIC_B)
    }

    pub(crate) fn cubic_c_or_default(&self) -> f64 {
        self.cubic_c.unwrap_or(DEFAULT_CUBIC_C)
    }

    pub(crate) fn stop_attenuation_or(&self, default: f64) -> f64 {
        self.stop_attenuation.unwrap_or(default)
    }

    pub(crate) fn transition_bandwidth_or(&self, default: f64) -> f64 {
        self.transition_bandwidth.unwrap_or(default)
    }

    pub(crate) fn filter_mode_or_default(&self) -> FilterMode {
        self.filter_mode.unwrap_or(FilterMode::Auto)
    }

    pub(crate) fn filter_interpolation_or_default(&self) -> FilterInterpolation {
        self.filter_interpolation.unwrap_or(FilterInterpolation::Cubic)
    }

    pub(crate) fn filter_oversample_or_default(&self) -> i32 {
        self.filter_oversample.unwrap_or(DEFAULT_FILTER_OVERSAMPLE)
    }

    pub(crate) fn max_phase_error_or_default(&self) -> f64 {
        self.max_phase_error.unwrap_or(DEFAULT_MAX_PHASE_ERROR)
    }
}

/// Populates an options bag with the per-quality defaults for `method`,
/// as [`ResamplerOptions::new`] plus explicit overrides would do it —
/// a convenience so callers do not have to look the tables up by hand.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `quality > MAX_QUALITY` or
/// either rate is non-positive.
pub fn options_set_quality(
    method: crate::method::ResamplerMethod,
    quality: u32,
    in_rate: i32,
    out_rate: i32,
) -> Result<ResamplerOptions> {
    use crate::method::ResamplerMethod;

    if quality > MAX_QUALITY {
        return Err(Error::InvalidArgument { reason: "quality exceeds MAX_QUALITY" });
    }
    if in_rate <= 0 || out_rate <= 0 {
        return Err(Error::InvalidArgument { reason: "rates must be positive" });
    }

    let mut options = ResamplerOptions::new();
    match method {
        ResamplerMethod::Nearest => {}
        ResamplerMethod::Linear => {
            options.n_taps = Some(2);
        }
        ResamplerMethod::Cubic => {
            options.n_taps = Some(4);
            options.cubic_b = Some(DEFAULT_CUBIC_B);
            options.cubic_c = Some(DEFAULT_CUBIC_C);
        }
        ResamplerMethod::BlackmanNuttall => {
            let q = &BLACKMAN_QUALITIES[quality as usize];
            options.n_taps = Some(q.n_taps);
            options.cutoff = Some(q.cutoff);
        }
        ResamplerMethod::Kaiser => {
            let q = &KAISER_QUALITIES[quality as usize];
            let mut cutoff = q.cutoff;
            if out_rate < in_rate {
                cutoff *= q.downsample_cutoff_factor;
            }
            options.cutoff = Some(cutoff);
            options.stop_attenuation = Some(q.stopband_attenuation);
            options.transition_bandwidth = Some(q.transition_bandwidth);
        }
    }
    options.filter_oversample = Some(OVERSAMPLE_QUALITIES[quality as usize]);
    Ok(options)
}

/// Filter shape derived from `method` and whichever options fields are
/// set, before `taps::resolve_shape`'s downsample correction.
///
/// Mirrors `gst_audio_resampler_update`'s per-method `switch` exactly,
/// including its one sharp edge: the quality-table fallback always
/// reads row [`DEFAULT_QUALITY`], never whatever quality level (if any)
/// [`options_set_quality`] was originally called with — by the time
/// `update` runs, a chosen quality has already been baked into concrete
/// option fields, so this fallback only fires for fields the caller
/// left unset.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DerivedShape {
    pub n_taps: i32,
    pub cutoff: f64,
    pub kaiser_beta: f64,
    pub cubic_b: f64,
    pub cubic_c: f64,
    pub oversample: i64,
}

pub(crate) fn derive_shape(
    method: crate::method::ResamplerMethod,
    options: &ResamplerOptions,
    in_rate: i64,
    out_rate: i64,
) -> DerivedShape {
    use crate::method::ResamplerMethod;

    let (n_taps, cutoff, kaiser_beta, cubic_b, cubic_c) = match method {
        ResamplerMethod::Nearest => (2, 0.0, 0.0, 0.0, 0.0),
        ResamplerMethod::Linear => (options.n_taps_or(2), 0.0, 0.0, 0.0, 0.0),
        ResamplerMethod::Cubic => {
            (options.n_taps_or(4), 0.0, 0.0, options.cubic_b_or_default(), options.cubic_c_or_default())
        }
        ResamplerMethod::BlackmanNuttall => {
            let q = &BLACKMAN_QUALITIES[DEFAULT_QUALITY as usize];
            (options.n_taps_or(q.n_taps), options.cutoff_or(q.cutoff), 0.0, 0.0, 0.0)
        }
        ResamplerMethod::Kaiser => {
            let q = &KAISER_QUALITIES[DEFAULT_QUALITY as usize];
            let mut fc = q.cutoff;
            if out_rate < in_rate {
                fc *= q.downsample_cutoff_factor;
            }
            let fc = options.cutoff_or(fc);
            let a = options.stop_attenuation_or(q.stopband_attenuation);
            let tr_bw = options.transition_bandwidth_or(q.transition_bandwidth);
            let beta = crate::window::kaiser_beta(a);
            let n_taps = crate::window::kaiser_n_taps(a, tr_bw);
            (n_taps, fc, beta, 0.0, 0.0)
        }
    };

    DerivedShape {
        n_taps,
        cutoff,
        kaiser_beta,
        cubic_b,
        cubic_c,
        oversample: i64::from(options.filter_oversample_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::ResamplerMethod;

    #[test]
    fn quality_tables_have_eleven_entries() {
        assert_eq!(OVERSAMPLE_QUALITIES.len(), 11);
        assert_eq!(BLACKMAN_QUALITIES.len(), 11);
        assert_eq!(KAISER_QUALITIES.len(), 11);
    }

    #[test]
    fn kaiser_default_quality_is_64_taps_equivalent() {
        // quality 4 -> 0.940 cutoff, 85 dB, 0.087 transition width.
        let q = &KAISER_QUALITIES[DEFAULT_QUALITY as usize];
        assert!((q.stopband_attenuation - 85.0).abs() < 1e-9);
    }

    #[test]
    fn options_set_quality_rejects_out_of_range() {
        assert!(options_set_quality(ResamplerMethod::Kaiser, 11, 48000, 48000).is_err());
        assert!(options_set_quality(ResamplerMethod::Kaiser, 4, 0, 48000).is_err());
    }

    #[test]
    fn options_set_quality_applies_downsample_factor() {
        let opts = options_set_quality(ResamplerMethod::Kaiser, 4, 96000, 48000).unwrap();
        let plain = KAISER_QUALITIES[4].cutoff;
        let expected = plain * KAISER_QUALITIES[4].downsample_cutoff_factor;
        assert!((opts.cutoff.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn options_set_quality_linear_overrides_n_taps_only() {
        let opts = options_set_quality(ResamplerMethod::Linear, 0, 48000, 48000).unwrap();
        assert_eq!(opts.n_taps, Some(2));
        assert_eq!(opts.cutoff, None);
    }

    #[test]
    fn derive_shape_kaiser_falls_back_to_default_quality_row() {
        // No options set at all: must use row 4, not whatever quality
        // (if any) a caller previously passed to options_set_quality.
        let opts = ResamplerOptions::new();
        let shape = derive_shape(ResamplerMethod::Kaiser, &opts, 48000, 48000);
        let q = &KAISER_QUALITIES[DEFAULT_QUALITY as usize];
        assert!((shape.cutoff - q.cutoff).abs() < 1e-9);
        assert!((shape.kaiser_beta - crate::window::kaiser_beta(q.stopband_attenuation)).abs() < 1e-9);
    }

    #[test]
    fn derive_shape_respects_explicit_overrides() {
        let opts = ResamplerOptions::new().n_taps(40).cutoff(0.5);
        let shape = derive_shape(ResamplerMethod::BlackmanNuttall, &opts, 48000, 48000);
        assert_eq!(shape.n_taps, 40);
        assert!((shape.cutoff - 0.5).abs() < 1e-12);
    }
}
