//! Phase accumulator / sample driver, and the top-level driver API.
//!
//! [`ResamplerImpl`] is generic over [`Sample`] and holds everything a
//! single resampler instance needs: the reduced rates, the phase
//! accumulator, the tap table, and the history buffer. [`AudioResampler`]
//! wraps one instantiation per supported format so callers still pick a
//! format at construction time, same as the source's runtime dispatch,
//! while every inner loop here is monomorphized and branch-free on
//! format.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

use crate::config::{derive_shape, ResamplerOptions};
use crate::error::{Error, Result};
use crate::history::{Channels, ChannelsMut, History};
use crate::kernel::{inner_product_cubic, inner_product_linear, inner_product_none};
use crate::method::{Flags, ResamplerMethod, SampleFormat};
use crate::rate::reduce;
use crate::sample::Sample;
use crate::taps::{resolve_shape, FilterParams, Selection, TapTable};

/// A single-format resampler instance. Not constructed directly by
/// downstream crates — use [`AudioResampler::new`].
pub struct ResamplerImpl<S: Sample> {
    method: ResamplerMethod,
    channels: usize,
    interleaved: bool,
    in_rate: i64,
    out_rate: i64,
    samp_inc: i64,
    samp_frac: i64,
    samp_index: i64,
    samp_phase: i64,
    skip: i64,
    n_taps: i32,
    table: TapTable<S>,
    filter_params: FilterParams,
    oversample: i64,
    options: ResamplerOptions,
    history: History<S>,
    inexact_taps: bool,
}

impl<S: Sample> ResamplerImpl<S> {
    fn new(
        method: ResamplerMethod,
        flags: Flags,
        channels: usize,
        in_rate: i64,
        out_rate: i64,
        options: ResamplerOptions,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidArgument { reason: "channels must be nonzero" });
        }
        if in_rate <= 0 || out_rate <= 0 {
            return Err(Error::InvalidArgument { reason: "rates must be positive" });
        }

        let mut this = Self {
            method,
            channels,
            interleaved: !flags.contains(Flags::NON_INTERLEAVED),
            in_rate: 0,
            out_rate: 0,
            samp_inc: 0,
            samp_frac: 0,
            samp_index: 0,
            samp_phase: 0,
            skip: 0,
            n_taps: 0,
            table: TapTable::Full(crate::taps::FullTapTable::<S>::placeholder()),
            filter_params: FilterParams { method, cutoff: 1.0, kaiser_beta: 0.0, cubic_b: 0.0, cubic_c: 0.0 },
            oversample: 1,
            options: ResamplerOptions::new(),
            history: History::new(channels),
            inexact_taps: false,
        };
        this.update(in_rate, out_rate, Some(options))?;
        this.history.reset(this.n_taps);
        Ok(this)
    }

    /// Re-derives reduced rates, rescales `samp_phase` into the new
    /// `out_rate` domain, rebuilds the tap table, and re-centers
    /// history around the new filter length. `in_rate <= 0` / `out_rate
    /// <= 0` reuse the current rate; `options = None` reuses the
    /// current options.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if a supplied `cutoff` is
    /// outside `0 < c <= 1`.
    pub fn update(&mut self, in_rate: i64, out_rate: i64, options: Option<ResamplerOptions>) -> Result<()> {
        let in_rate = if in_rate > 0 { in_rate } else { self.in_rate };
        let out_rate = if out_rate > 0 { out_rate } else { self.out_rate };
        if in_rate <= 0 || out_rate <= 0 {
            return Err(Error::InvalidArgument { reason: "rates must be positive" });
        }

        let options = options.unwrap_or(self.options);
        if let Some(cutoff) = options.cutoff {
            if !(cutoff > 0.0 && cutoff <= 1.0) {
                return Err(Error::InvalidArgument { reason: "cutoff must be in 0 < c <= 1" });
            }
        }
        let max_phase_error = options.max_phase_error_or_default();

        let reduced = reduce(in_rate, out_rate, self.out_rate, self.samp_phase, max_phase_error);
        self.in_rate = reduced.in_rate;
        self.out_rate = reduced.out_rate;
        self.samp_phase = reduced.samp_phase;
        self.options = options;

        let shape = derive_shape(self.method, &self.options, self.in_rate, self.out_rate);
        let resolved = resolve_shape(shape.n_taps, shape.cutoff, shape.oversample, self.in_rate, self.out_rate);

        self.filter_params = FilterParams {
            method: self.method,
            cutoff: resolved.cutoff,
            kaiser_beta: shape.kaiser_beta,
            cubic_b: shape.cubic_b,
            cubic_c: shape.cubic_c,
        };
        self.oversample = resolved.oversample;

        let old_n_taps = self.n_taps;
        self.n_taps = resolved.n_taps;

        let filter_mode = self.options.filter_mode_or_default();
        let filter_interpolation = self.options.filter_interpolation_or_default();

        let (table, _resolved_interp, exact) =
            TapTable::build(&self.filter_params, self.n_taps, self.out_rate, self.oversample, filter_mode, filter_interpolation);
        self.table = table;
        self.inexact_taps = !exact;
        #[cfg(feature = "tracing")]
        if !exact {
            tracing::warn!(n_taps = self.n_taps, "tap quantization DC-bias search did not converge");
        }

        self.samp_inc = self.in_rate / self.out_rate;
        self.samp_frac = self.in_rate % self.out_rate;

        self.history.ensure_capacity(self.n_taps.max(0) as usize);
        self.history.recenter(self.samp_index.max(0) as usize, old_n_taps, self.n_taps);

        #[cfg(feature = "tracing")]
        tracing::debug!(in_rate = self.in_rate, out_rate = self.out_rate, n_taps = self.n_taps, "resampler (re)configured");

        Ok(())
    }

    /// Clears history to zero, `samp_index = 0`,
    /// `samples_avail = n_taps / 2 - 1`. Does not touch `skip` or
    /// `samp_phase` (matches the reference implementation's reset,
    /// which only rewinds history).
    pub fn reset(&mut self) {
        self.history.reset(self.n_taps);
        self.samp_index = 0;
    }

    /// Whether the most recent `new`/`update` call fell back to an
    /// inexact tap quantization (the DC-bias binary search did not
    /// converge within its iteration budget).
    #[must_use]
    pub fn last_update_had_inexact_taps(&self) -> bool {
        self.inexact_taps
    }

    /// Channel count this instance was constructed for.
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `n_taps / 2`: the number of output frames of pure latency before
    /// the first input sample's contribution dominates the filter
    /// window.
    #[must_use]
    pub fn get_max_latency(&self) -> usize {
        (self.n_taps / 2).max(0) as usize
    }

    /// Upper bound on output frames producible from `in_frames`
    /// additional input frames given the current history/skip state.
    /// Returns 0 if not enough history would be available yet.
    #[must_use]
    pub fn get_out_frames(&self, in_frames: usize) -> usize {
        let need = i64::from(self.n_taps) + self.samp_index + self.skip;
        let avail = self.history.samples_avail() as i64 + in_frames as i64;
        if avail < need {
            return 0;
        }
        let numerator = (avail - need) * self.out_rate - self.samp_phase;
        if numerator < 0 {
            return 0;
        }
        (numerator / self.in_rate + 1) as usize
    }

    /// Input frames consumed while producing `out_frames` output
    /// frames, given the current phase accumulator state.
    #[must_use]
    pub fn get_in_frames(&self, out_frames: usize) -> usize {
        let out_frames = out_frames as i64;
        ((self.samp_phase + out_frames * self.samp_frac) / self.out_rate + out_frames * self.samp_inc) as usize
    }

    /// Consumes exactly `in_frames` frames of `input` (`None` means
    /// silent input) and writes up to `out_frames` output frames into
    /// `output`, returning the number actually produced. Never fails:
    /// insufficient history simply yields fewer output frames (query
    /// [`ResamplerImpl::get_out_frames`] beforehand to know how many to
    /// expect).
    ///
    /// # Panics
    /// Panics if `input`/`output`'s buffer layout (interleaved vs.
    /// planar, and slice lengths) does not match `channels` and
    /// `in_frames`/`out_frames` — a caller contract violation, not a
    /// runtime condition the resampler can recover from.
    pub fn resample(
        &mut self,
        input: Option<Channels<'_, S>>,
        in_frames: usize,
        mut output: ChannelsMut<'_, S>,
        out_frames: usize,
    ) -> usize {
        validate_buffers(&input, in_frames, &output, out_frames, self.channels, self.interleaved);

        if self.skip >= in_frames as i64 {
            self.skip -= in_frames as i64;
            return 0;
        }
        self.samp_index += self.skip;
        self.skip = 0;

        self.history.append(input, in_frames);

        let samples_avail = self.history.samples_avail() as i64;
        if samples_avail < i64::from(self.n_taps) + self.samp_index {
            return 0;
        }

        let mut samp_index = self.samp_index;
        let mut samp_phase = self.samp_phase;
        let mut produced = 0usize;

        for di in 0..out_frames {
            let start = samp_index as usize;
            let end = start + self.n_taps as usize;
            if end > samples_avail as usize {
                break;
            }

            let (selection, fresh) = self.table.select(samp_phase, self.out_rate, &self.filter_params);
            if let Some(exact) = fresh {
                if !exact {
                    self.inexact_taps = true;
                }
            }

            for c in 0..self.channels {
                let window = &self.history.channel(c)[start..end];
                let value = match &selection {
                    Selection::None(taps) => inner_product_none(window, taps),
                    Selection::Linear(taps, ic) => inner_product_linear(window, taps, ic),
                    Selection::Cubic(taps, ic) => inner_product_cubic(window, taps, ic),
                };
                output.write(self.channels, c, di, value);
            }
            produced += 1;

            samp_index += self.samp_inc;
            samp_phase += self.samp_frac;
            if samp_phase >= self.out_rate {
                samp_phase -= self.out_rate;
                samp_index += 1;
            }
        }

        let consumed = samp_index - self.samp_index;
        self.samp_index = 0;
        self.samp_phase = samp_phase;

        if consumed > 0 {
            let avail = self.history.samples_avail() as i64;
            if consumed > avail {
                self.skip = consumed - avail;
                self.history.consume(avail.max(0) as usize);
            } else {
                self.history.consume(consumed as usize);
            }
        }

        produced
    }
}

fn validate_buffers<S>(
    input: &Option<Channels<'_, S>>,
    in_frames: usize,
    output: &ChannelsMut<'_, S>,
    out_frames: usize,
    channels: usize,
    interleaved: bool,
) {
    if let Some(input) = input {
        match input {
            Channels::Interleaved(buf) => {
                assert!(interleaved, "resampler configured non-interleaved but got an interleaved input buffer");
                assert!(buf.len() >= in_frames * channels, "interleaved input buffer too short");
            }
            Channels::Planar(bufs) => {
                assert!(!interleaved, "resampler configured interleaved but got planar input buffers");
                assert_eq!(bufs.len(), channels, "planar input must have one slice per channel");
                assert!(bufs.iter().all(|b| b.len() >= in_frames), "planar input buffer too short");
            }
        }
    }
    match output {
        ChannelsMut::Interleaved(buf) => {
            assert!(interleaved, "resampler configured non-interleaved but got an interleaved output buffer");
            assert!(buf.len() >= out_frames * channels, "interleaved output buffer too short");
        }
        ChannelsMut::Planar(bufs) => {
            assert!(!interleaved, "resampler configured interleaved but got planar output buffers");
            assert_eq!(bufs.len(), channels, "planar output must have one slice per channel");
            assert!(bufs.iter().all(|b| b.len() >= out_frames), "planar output buffer too short");
        }
    }
}

/// Polyphase FIR resampler, dispatched over the four supported sample
/// formats. Construct with [`AudioResampler::new`], drive with the
/// format-matching `resample_*` method.
pub enum AudioResampler {
    /// Signed 16-bit.
    S16(ResamplerImpl<i16>),
    /// Signed 32-bit.
    S32(ResamplerImpl<i32>),
    /// IEEE 754 binary32.
    F32(ResamplerImpl<f32>),
    /// IEEE 754 binary64.
    F64(ResamplerImpl<f64>),
}

impl AudioResampler {
    /// Validates `channels > 0` and both rates `> 0`, builds the tap
    /// table, and zero-pads history to center, or fails with
    /// [`Error::InvalidArgument`].
    pub fn new(
        method: ResamplerMethod,
        flags: Flags,
        format: SampleFormat,
        channels: usize,
        in_rate: i64,
        out_rate: i64,
        options: ResamplerOptions,
    ) -> Result<Self> {
        Ok(match format {
            SampleFormat::S16 => AudioResampler::S16(ResamplerImpl::new(method, flags, channels, in_rate, out_rate, options)?),
            SampleFormat::S32 => AudioResampler::S32(ResamplerImpl::new(method, flags, channels, in_rate, out_rate, options)?),
            SampleFormat::F32 => AudioResampler::F32(ResamplerImpl::new(method, flags, channels, in_rate, out_rate, options)?),
            SampleFormat::F64 => AudioResampler::F64(ResamplerImpl::new(method, flags, channels, in_rate, out_rate, options)?),
        })
    }

    /// The sample format this instance was constructed for.
    #[must_use]
    pub fn format(&self) -> SampleFormat {
        match self {
            AudioResampler::S16(_) => SampleFormat::S16,
            AudioResampler::S32(_) => SampleFormat::S32,
            AudioResampler::F32(_) => SampleFormat::F32,
            AudioResampler::F64(_) => SampleFormat::F64,
        }
    }

    /// Channel count this instance was constructed for.
    #[must_use]
    pub fn channels(&self) -> usize {
        match self {
            AudioResampler::S16(r) => r.channels(),
            AudioResampler::S32(r) => r.channels(),
            AudioResampler::F32(r) => r.channels(),
            AudioResampler::F64(r) => r.channels(),
        }
    }

    /// See [`ResamplerImpl::update`].
    ///
    /// # Errors
    /// See [`ResamplerImpl::update`].
    pub fn update(&mut self, in_rate: i64, out_rate: i64, options: Option<ResamplerOptions>) -> Result<()> {
        match self {
            AudioResampler::S16(r) => r.update(in_rate, out_rate, options),
            AudioResampler::S32(r) => r.update(in_rate, out_rate, options),
            AudioResampler::F32(r) => r.update(in_rate, out_rate, options),
            AudioResampler::F64(r) => r.update(in_rate, out_rate, options),
        }
    }

    /// See [`ResamplerImpl::reset`].
    pub fn reset(&mut self) {
        match self {
            AudioResampler::S16(r) => r.reset(),
            AudioResampler::S32(r) => r.reset(),
            AudioResampler::F32(r) => r.reset(),
            AudioResampler::F64(r) => r.reset(),
        }
    }

    /// See [`ResamplerImpl::get_out_frames`].
    #[must_use]
    pub fn get_out_frames(&self, in_frames: usize) -> usize {
        match self {
            AudioResampler::S16(r) => r.get_out_frames(in_frames),
            AudioResampler::S32(r) => r.get_out_frames(in_frames),
            AudioResampler::F32(r) => r.get_out_frames(in_frames),
            AudioResampler::F64(r) => r.get_out_frames(in_frames),
        }
    }

    /// See [`ResamplerImpl::get_in_frames`].
    #[must_use]
    pub fn get_in_frames(&self, out_frames: usize) -> usize {
        match self {
            AudioResampler::S16(r) => r.get_in_frames(out_frames),
            AudioResampler::S32(r) => r.get_in_frames(out_frames),
            AudioResampler::F32(r) => r.get_in_frames(out_frames),
            AudioResampler::F64(r) => r.get_in_frames(out_frames),
        }
    }

    /// See [`ResamplerImpl::get_max_latency`].
    #[must_use]
    pub fn get_max_latency(&self) -> usize {
        match self {
            AudioResampler::S16(r) => r.get_max_latency(),
            AudioResampler::S32(r) => r.get_max_latency(),
            AudioResampler::F32(r) => r.get_max_latency(),
            AudioResampler::F64(r) => r.get_max_latency(),
        }
    }

    /// Whether the most recent `new`/`update` call fell back to an
    /// inexact tap quantization.
    #[must_use]
    pub fn last_update_had_inexact_taps(&self) -> bool {
        match self {
            AudioResampler::S16(r) => r.last_update_had_inexact_taps(),
            AudioResampler::S32(r) => r.last_update_had_inexact_taps(),
            AudioResampler::F32(r) => r.last_update_had_inexact_taps(),
            AudioResampler::F64(r) => r.last_update_had_inexact_taps(),
        }
    }

    /// Drives an `S16` instance. Returns [`Error::InvalidArgument`] if
    /// this instance was not constructed with [`SampleFormat::S16`].
    ///
    /// # Errors
    /// See above.
    pub fn resample_s16(
        &mut self,
        input: Option<Channels<'_, i16>>,
        in_frames: usize,
        output: ChannelsMut<'_, i16>,
        out_frames: usize,
    ) -> Result<usize> {
        match self {
            AudioResampler::S16(r) => Ok(r.resample(input, in_frames, output, out_frames)),
            _ => Err(Error::InvalidArgument { reason: "resampler was not constructed for SampleFormat::S16" }),
        }
    }

    /// Drives an `S32` instance. See [`AudioResampler::resample_s16`].
    ///
    /// # Errors
    /// See [`AudioResampler::resample_s16`].
    pub fn resample_s32(
        &mut self,
        input: Option<Channels<'_, i32>>,
        in_frames: usize,
        output: ChannelsMut<'_, i32>,
        out_frames: usize,
    ) -> Result<usize> {
        match self {
            AudioResampler::S32(r) => Ok(r.resample(input, in_frames, output, out_frames)),
            _ => Err(Error::InvalidArgument { reason: "resampler was not constructed for SampleFormat::S32" }),
        }
    }

    /// Drives an `F32` instance. See [`AudioResampler::resample_s16`].
    ///
    /// # Errors
    /// See [`AudioResampler::resample_s16`].
    pub fn resample_f32(
        &mut self,
        input: Option<Channels<'_, f32>>,
        in_frames: usize,
        output: ChannelsMut<'_, f32>,
        out_frames: usize,
    ) -> Result<usize> {
        match self {
            AudioResampler::F32(r) => Ok(r.resample(input, in_frames, output, out_frames)),
            _ => Err(Error::InvalidArgument { reason: "resampler was not constructed for SampleFormat::F32" }),
        }
    }

    /// Drives an `F64` instance. See [`AudioResampler::resample_s16`].
    ///
    /// # Errors
    /// See [`AudioResampler::resample_s16`].
    pub fn resample_f64(
        &mut self,
        input: Option<Channels<'_, f64>>,
        in_frames: usize,
        output: ChannelsMut<'_, f64>,
        out_frames: usize,
    ) -> Result<usize> {
        match self {
            AudioResampler::F64(r) => Ok(r.resample(input, in_frames, output, out_frames)),
            _ => Err(Error::InvalidArgument { reason: "resampler was not constructed for SampleFormat::F64" }),
        }
    }
}
