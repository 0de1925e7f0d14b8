//! Per-channel history buffer management: the deinterleaved ring of past
//! input samples each output sample is convolved against.
//!
//! Buffers are plain contiguous `Vec<S>` rather than the source's
//! manually 16-byte-aligned arena (§5 of the spec calls this out
//! explicitly — see `DESIGN.md`): valid history always starts at index
//! 0, the live prefix is `samples_avail` long, and every reconfiguration
//! shifts or re-zeros that prefix in place.

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std as alloc;

use crate::sample::Sample;
use alloc::vec::Vec;

/// Buffer layout for one `resample` call's input.
pub enum Channels<'a, S> {
    /// A single block of `frames * channels` samples, channel-minor.
    Interleaved(&'a [S]),
    /// One independent slice of `frames` samples per channel.
    Planar(&'a [&'a [S]]),
}

/// Buffer layout for one `resample` call's output.
pub enum ChannelsMut<'a, S> {
    /// A single block of `frames * channels` samples, channel-minor.
    Interleaved(&'a mut [S]),
    /// One independent slice of `frames` samples per channel.
    Planar(&'a mut [&'a mut [S]]),
}

impl<'a, S: Copy> ChannelsMut<'a, S> {
    /// Number of channels this buffer claims to carry. For
    /// [`ChannelsMut::Interleaved`] this cannot be determined from the
    /// buffer alone, so the caller must supply it.
    pub(crate) fn write(&mut self, channels: usize, c: usize, frame: usize, value: S) {
        match self {
            ChannelsMut::Interleaved(buf) => buf[frame * channels + c] = value,
            ChannelsMut::Planar(chans) => chans[c][frame] = value,
        }
    }
}

/// Per-channel ring of past input samples.
pub struct History<S: Sample> {
    channels: usize,
    buffers: Vec<Vec<S>>,
    samples_avail: usize,
}

impl<S: Sample> History<S> {
    /// A history with `channels` empty per-channel buffers.
    #[must_use]
    pub fn new(channels: usize) -> Self {
        Self { channels, buffers: alloc::vec![Vec::new(); channels], samples_avail: 0 }
    }

    /// Valid samples at the head of each channel buffer.
    #[must_use]
    pub fn samples_avail(&self) -> usize {
        self.samples_avail
    }

    /// The live prefix of channel `c`'s history.
    #[must_use]
    pub fn channel(&self, c: usize) -> &[S] {
        &self.buffers[c][..self.samples_avail]
    }

    /// Grows every channel buffer to at least `need` samples if it is
    /// not already that large. Never shrinks (matches
    /// `get_sample_bufs`'s "only realloc when growing" behavior).
    pub fn ensure_capacity(&mut self, need: usize) {
        for buf in &mut self.buffers {
            if buf.len() < need {
                buf.resize(need, S::default());
            }
        }
    }

    /// Appends `in_frames` frames after the current history, growing
    /// capacity as needed. `None` input pushes silence (used for
    /// `resample(in=null, ...)`).
    pub fn append(&mut self, input: Option<Channels<'_, S>>, in_frames: usize) {
        let avail = self.samples_avail;
        self.ensure_capacity(avail + in_frames);

        match input {
            None => {
                for buf in &mut self.buffers {
                    for v in &mut buf[avail..avail + in_frames] {
                        *v = S::default();
                    }
                }
            }
            Some(Channels::Interleaved(data)) => {
                let channels = self.channels;
                for (c, buf) in self.buffers.iter_mut().enumerate() {
                    for i in 0..in_frames {
                        buf[avail + i] = data[i * channels + c];
                    }
                }
            }
            Some(Channels::Planar(chans)) => {
                for (c, buf) in self.buffers.iter_mut().enumerate() {
                    buf[avail..avail + in_frames].copy_from_slice(&chans[c][..in_frames]);
                }
            }
        }
        self.samples_avail = avail + in_frames;
    }

    /// Discards `consumed` frames from the head of every channel's
    /// history, shifting the remainder down to index 0.
    pub fn consume(&mut self, consumed: usize) {
        if consumed == 0 {
            return;
        }
        let avail = self.samples_avail;
        if consumed < avail {
            for buf in &mut self.buffers {
                buf.copy_within(consumed..avail, 0);
            }
            self.samples_avail = avail - consumed;
        } else {
            self.samples_avail = 0;
        }
    }

    /// Zeros the leading `n_taps / 2` frames of every channel and resets
    /// `samples_avail` to `n_taps / 2 - 1`, as if freshly constructed.
    pub fn reset(&mut self, n_taps: i32) {
        let half = (n_taps / 2).max(0) as usize;
        self.ensure_capacity(half);
        for buf in &mut self.buffers {
            for v in &mut buf[..half] {
                *v = S::default();
            }
        }
        self.samples_avail = half.saturating_sub(1);
    }

    /// Re-centers history around a new filter length after `update`
    /// changes `n_taps`. Shifts the live prefix starting at
    /// `samp_index` by `(new_n_taps - old_n_taps) / 2` frames (matches
    /// `gst_audio_resampler_update`'s history-resize block exactly,
    /// including its documented non-goal: growing history does not
    /// zero or mirror the newly exposed region, it carries over
    /// whatever was previously adjacent in the buffer).
    pub fn recenter(&mut self, samp_index: usize, old_n_taps: i32, new_n_taps: i32) {
        if old_n_taps <= 0 {
            return;
        }
        let diff = (new_n_taps - old_n_taps) / 2;
        let mut soff = samp_index as i64;
        let mut doff = samp_index as i64;
        let mut bytes = self.samples_avail as i64;
        if diff < 0 {
            soff += -diff as i64;
            bytes -= -diff as i64;
        } else {
            doff += diff as i64;
        }
        let bytes = bytes.max(0) as usize;
        let soff = soff.max(0) as usize;
        let doff = doff.max(0) as usize;

        self.ensure_capacity((doff + bytes).max(new_n_taps.max(0) as usize));

        for buf in &mut self.buffers {
            buf.copy_within(soff..soff + bytes, doff);
        }
        self.samples_avail = (self.samples_avail as i64 + i64::from(diff)).max(0) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_interleaved_deinterleaves_per_channel() {
        let mut h = History::<f32>::new(2);
        let data = [1.0_f32, 10.0, 2.0, 20.0, 3.0, 30.0];
        h.append(Some(Channels::Interleaved(&data)), 3);
        assert_eq!(h.channel(0), &[1.0, 2.0, 3.0]);
        assert_eq!(h.channel(1), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn append_none_pushes_silence() {
        let mut h = History::<f32>::new(1);
        h.append(None, 4);
        assert_eq!(h.channel(0), &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn consume_shifts_remainder_to_head() {
        let mut h = History::<f32>::new(1);
        h.append(Some(Channels::Interleaved(&[1.0, 2.0, 3.0, 4.0])), 4);
        h.consume(2);
        assert_eq!(h.channel(0), &[3.0, 4.0]);
    }

    #[test]
    fn reset_zeros_half_taps_and_sets_avail() {
        let mut h = History::<f32>::new(1);
        h.append(Some(Channels::Interleaved(&[9.0, 9.0, 9.0, 9.0])), 4);
        h.reset(8);
        assert_eq!(h.samples_avail(), 3);
        assert_eq!(h.channel(0), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn recenter_grows_and_preserves_stale_tail_per_documented_non_goal() {
        let mut h = History::<f32>::new(1);
        h.append(Some(Channels::Interleaved(&[1.0, 2.0, 3.0, 4.0])), 4);
        // old_n_taps=4, new_n_taps=8 -> diff=2, history shifts right by 2,
        // leaving the first 2 slots with whatever was already there
        // (zero, since the buffer was freshly allocated).
        h.recenter(0, 4, 8);
        assert_eq!(h.samples_avail(), 6);
        assert_eq!(&h.channel(0)[2..], &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn recenter_no_op_on_first_build() {
        let mut h = History::<f32>::new(1);
        h.recenter(0, 0, 8);
        assert_eq!(h.samples_avail(), 0);
    }
}
