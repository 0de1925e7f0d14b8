//! Phase table builder: decides between a lazily-filled full per-phase
//! tap table and an oversampled-prototype-plus-interpolation table, and
//! exposes per-sample tap selection to the sample driver.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::kernel::{coeff_cubic, coeff_linear};
use crate::method::{FilterInterpolation, FilterMode, ResamplerMethod};
use crate::quantize::quantize;
use crate::sample::Sample;
use crate::window::{blackman_nuttall_tap, cubic_tap, kaiser_tap, linear_tap, nearest_tap};

/// Filter-shape parameters, resolved once per `update` from the method
/// and the user's option overrides (see `resampler.rs`).
#[derive(Debug, Clone, Copy)]
pub struct FilterParams {
    /// Filter design.
    pub method: ResamplerMethod,
    /// Normalized cutoff, already downsample-corrected.
    pub cutoff: f64,
    /// Kaiser window shape parameter.
    pub kaiser_beta: f64,
    /// Mitchell-Netravali `B`.
    pub cubic_b: f64,
    /// Mitchell-Netravali `C`.
    pub cubic_c: f64,
}

/// Filter length and shape after the downsample-cutoff correction and
/// the round-up-to-multiple-of-8 rule.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedShape {
    /// Final filter length.
    pub n_taps: i32,
    /// Final cutoff (scaled by `out_rate/in_rate` when downsampling).
    pub cutoff: f64,
    /// Final oversampling factor (halved while downsampling, down to 1).
    pub oversample: i64,
}

/// Applies §4.3's down-sampling correction: when `out_rate < in_rate`,
/// scales `cutoff` by `out_rate/in_rate`, scales `n_taps` by
/// `in_rate/out_rate` (rounded to nearest), and halves `oversample`
/// while doubling an internal multiplier until `mult * out_rate >=
/// in_rate` or `oversample` reaches 1. Always rounds `n_taps` up to a
/// multiple of 8 when it exceeds 4.
#[must_use]
pub fn resolve_shape(n_taps: i32, cutoff: f64, oversample: i64, in_rate: i64, out_rate: i64) -> ResolvedShape {
    let mut n_taps = n_taps;
    let mut cutoff = cutoff;
    let mut oversample = oversample;

    if out_rate < in_rate {
        let mut mult: i64 = 2;
        cutoff = cutoff * out_rate as f64 / in_rate as f64;
        n_taps = scale_round(n_taps, in_rate, out_rate);

        while oversample > 1 {
            if mult * out_rate >= in_rate {
                break;
            }
            mult *= 2;
            oversample >>= 1;
        }
    }

    if n_taps > 4 {
        n_taps = round_up_8(n_taps);
    }

    ResolvedShape { n_taps, cutoff, oversample }
}

fn scale_round(val: i32, num: i64, den: i64) -> i32 {
    (((i64::from(val)) * num + den / 2) / den) as i32
}

fn round_up_8(n: i32) -> i32 {
    (n + 7) & !7
}

/// Resolves `FilterMode::Auto` into a concrete interpolate/full choice:
/// interpolated iff `out_rate > oversample`.
#[must_use]
pub fn wants_interpolated(mode: FilterMode, out_rate: i64, oversample: i64) -> bool {
    match mode {
        FilterMode::Full => false,
        FilterMode::Interpolated => true,
        FilterMode::Auto => out_rate > oversample,
    }
}

/// `FilterInterpolation::None` silently maps to `Cubic` once
/// interpolated mode has been chosen (a `None` request only makes sense
/// for `FilterMode::Full`).
#[must_use]
pub fn resolve_interpolation(requested: FilterInterpolation) -> FilterInterpolation {
    match requested {
        FilterInterpolation::None => FilterInterpolation::Cubic,
        other => other,
    }
}

fn continuous_tap(params: &FilterParams, x: f64, n_taps: i32) -> f64 {
    match params.method {
        ResamplerMethod::Nearest => nearest_tap(x),
        ResamplerMethod::Linear => linear_tap(x, n_taps),
        ResamplerMethod::Cubic => cubic_tap(x, n_taps, params.cubic_b, params.cubic_c),
        ResamplerMethod::BlackmanNuttall => blackman_nuttall_tap(x, n_taps, params.cutoff),
        ResamplerMethod::Kaiser => kaiser_tap(x, n_taps, params.cutoff, params.kaiser_beta),
    }
}

/// Fills `tmp` with `tmp.len()` continuous tap values starting at `x0`
/// and stepping by `1/oversample`, using `n_taps` as the filter's
/// nominal length inside the window formulas (which may differ from
/// `tmp.len()` when building an oversampled prototype). Returns the
/// unnormalized sum (the quantizer's `weight`).
fn fill_taps(params: &FilterParams, tmp: &mut [f64], x0: f64, n_taps: i32, oversample: i32) -> f64 {
    let mut weight = 0.0;
    for (i, slot) in tmp.iter_mut().enumerate() {
        let x = x0 + i as f64 / f64::from(oversample);
        let v = continuous_tap(params, x, n_taps);
        *slot = v;
        weight += v;
    }
    weight
}

/// One fully computed tap row per output phase, filled lazily on first
/// use and cached (`None` row = not yet computed, matching the
/// source's non-null-pointer "computed" bit).
pub struct FullTapTable<S: Sample> {
    rows: Vec<Option<Vec<S>>>,
    n_taps: usize,
    out_rate: i64,
}

impl<S: Sample> FullTapTable<S> {
    fn new(n_taps: i32, out_rate: i64) -> Self {
        Self { rows: vec![None; out_rate as usize], n_taps: n_taps as usize, out_rate }
    }

    /// An empty, zero-length table used only to give
    /// [`crate::resampler::ResamplerImpl`] something to initialize its
    /// `table` field with before the first `update` call replaces it.
    pub(crate) fn placeholder() -> Self {
        Self::new(0, 1)
    }

    /// Returns the tap row for `phase`, computing and caching it on the
    /// first call. The second element is `Some(exact)` only when this
    /// call triggered a fresh computation (so the caller can log the
    /// DC-bias warning exactly once per row).
    fn taps(&mut self, phase: i64, params: &FilterParams) -> (&[S], Option<bool>) {
        let idx = phase as usize;
        let mut fresh = None;
        if self.rows[idx].is_none() {
            let n_taps = self.n_taps as i32;
            let half = f64::from(n_taps / 2);
            let x0 = 1.0 - half - phase as f64 / self.out_rate as f64;
            let mut tmp = vec![0.0_f64; self.n_taps];
            let weight = fill_taps(params, &mut tmp, x0, n_taps, 1);
            let q = quantize::<S>(&tmp, weight);
            fresh = Some(q.exact);
            self.rows[idx] = Some(q.taps);
        }
        (self.rows[idx].as_ref().expect("just inserted"), fresh)
    }
}

/// A single oversampled prototype, pre-extracted into `oversample` rows
/// each interleaving `mult` interpolation lanes per tap.
pub struct InterpolatedTapTable<S: Sample> {
    rows: Vec<Vec<S>>,
    n_taps: usize,
    oversample: i64,
    interpolation: FilterInterpolation,
}

impl<S: Sample> InterpolatedTapTable<S> {
    fn build(params: &FilterParams, n_taps: i32, oversample: i64, interpolation: FilterInterpolation) -> (Self, bool) {
        let mult = match interpolation {
            FilterInterpolation::Linear => 2usize,
            _ => 4usize,
        };
        let otaps = (oversample * i64::from(n_taps)) as usize + mult - 1;
        let half = f64::from(n_taps / 2);
        let x0 = 1.0 - half;

        let mut tmp = vec![0.0_f64; otaps];
        let weight = fill_taps(params, &mut tmp, x0, n_taps, oversample as i32);
        let q = quantize::<S>(&tmp, weight / oversample as f64);

        let oversample_u = oversample as usize;
        let n_taps_u = n_taps as usize;
        let mut rows = Vec::with_capacity(oversample_u);
        for i in 0..oversample_u {
            let mut row = Vec::with_capacity(n_taps_u * mult);
            for j in 0..n_taps_u {
                for k in 0..mult {
                    row.push(q.taps[i + j * oversample_u + k]);
                }
            }
            rows.push(row);
        }

        (Self { rows, n_taps: n_taps_u, oversample, interpolation }, q.exact)
    }

    fn row_and_coeff(&self, samp_phase: i64, out_rate: i64) -> (&[S], [S; 4]) {
        let pos = samp_phase * self.oversample;
        let row = (self.oversample - 1 - pos / out_rate) as usize;
        let frac = pos % out_rate;
        let ic = match self.interpolation {
            FilterInterpolation::Linear => coeff_linear::<S>(frac, out_rate),
            _ => coeff_cubic::<S>(frac, out_rate),
        };
        (&self.rows[row], ic)
    }
}

/// The tap set and interpolation coefficients selected for one output
/// sample, ready to hand to the matching `kernel::inner_product_*`.
pub enum Selection<'a, S: Sample> {
    /// [`FilterMode::Full`]: plain dot product, no interpolation.
    None(&'a [S]),
    /// [`FilterInterpolation::Linear`]: 2-lane interleaved taps.
    Linear(&'a [S], [S; 4]),
    /// [`FilterInterpolation::Cubic`]: 4-lane interleaved taps.
    Cubic(&'a [S], [S; 4]),
}

/// Either tap-table layout, dispatched on per output sample.
pub enum TapTable<S: Sample> {
    /// One lazily-filled row per output phase.
    Full(FullTapTable<S>),
    /// One oversampled prototype, interpolated per phase.
    Interpolated(InterpolatedTapTable<S>),
}

impl<S: Sample> TapTable<S> {
    /// Builds either table layout for the given resolved shape, method
    /// parameters, and mode/interpolation request. Returns the table,
    /// the interpolation actually in effect (`None` for `Full`), and
    /// whether the (possibly only) eager tap computation converged.
    #[must_use]
    pub fn build(
        params: &FilterParams,
        n_taps: i32,
        out_rate: i64,
        oversample: i64,
        mode: FilterMode,
        interpolation: FilterInterpolation,
    ) -> (Self, FilterInterpolation, bool) {
        if wants_interpolated(mode, out_rate, oversample) {
            let resolved = resolve_interpolation(interpolation);
            let (table, exact) = InterpolatedTapTable::build(params, n_taps, oversample, resolved);
            (TapTable::Interpolated(table), resolved, exact)
        } else {
            (TapTable::Full(FullTapTable::new(n_taps, out_rate)), FilterInterpolation::None, true)
        }
    }

    /// Filter length in effect (loop length of one inner product).
    #[must_use]
    pub fn n_taps(&self) -> usize {
        match self {
            TapTable::Full(f) => f.n_taps,
            TapTable::Interpolated(t) => t.n_taps,
        }
    }

    /// Selects the tap row (and interpolation coefficients, if any) for
    /// the current `samp_phase`. Does not advance the phase accumulator
    /// — that is the sample driver's job.
    pub fn select(&mut self, samp_phase: i64, out_rate: i64, params: &FilterParams) -> (Selection<'_, S>, Option<bool>) {
        match self {
            TapTable::Full(f) => {
                let (taps, fresh) = f.taps(samp_phase, params);
                (Selection::None(taps), fresh)
            }
            TapTable::Interpolated(t) => {
                let (row, ic) = t.row_and_coeff(samp_phase, out_rate);
                let sel = match t.interpolation {
                    FilterInterpolation::Linear => Selection::Linear(row, ic),
                    _ => Selection::Cubic(row, ic),
                };
                (sel, None)
            }
        }
    }
}
