//! Sonido Resample - polyphase FIR sample-rate conversion
//!
//! A streaming polyphase FIR resampler for converting PCM audio between
//! arbitrary sample rates while controlling aliasing: filter design
//! (nearest / linear / cubic / Blackman-Nuttall / Kaiser), polyphase
//! decomposition with optional oversampled-prototype interpolation,
//! fixed-point tap quantization with DC-bias correction, and a
//! fractional phase accumulator driving history management and the
//! per-sample inner-product kernels.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use sonido_resample::{AudioResampler, Channels, ChannelsMut, Flags, ResamplerMethod, ResamplerOptions, SampleFormat};
//!
//! let mut r = AudioResampler::new(
//!     ResamplerMethod::Kaiser,
//!     Flags::NONE,
//!     SampleFormat::F32,
//!     1,
//!     48_000,
//!     44_100,
//!     ResamplerOptions::new(),
//! )?;
//!
//! let input: Vec<f32> = vec![0.0; 1024];
//! let out_frames = r.get_out_frames(input.len());
//! let mut output = vec![0.0_f32; out_frames];
//! r.resample_f32(
//!     Some(Channels::Interleaved(&input)),
//!     input.len(),
//!     ChannelsMut::Interleaved(&mut output),
//!     out_frames,
//! )?;
//! # Ok::<(), sonido_resample::Error>(())
//! ```
//!
//! # no_std support
//!
//! This crate is `no_std` + `alloc` compatible. Disable the default
//! `std` feature in your `Cargo.toml` to build without it; `libm`
//! stands in for `f64` transcendental functions and the error type
//! loses its `std::error::Error` impl (it keeps a `core::fmt::Display`
//! impl either way).

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod config;
mod error;
mod history;
mod kernel;
mod method;
mod quantize;
mod rate;
mod resampler;
mod sample;
mod taps;
mod window;

pub use config::{options_set_quality, ResamplerOptions, MAX_QUALITY};
pub use error::{Error, Result};
pub use history::{Channels, ChannelsMut};
pub use method::{Flags, FilterInterpolation, FilterMode, ResamplerMethod, SampleFormat};
pub use resampler::{AudioResampler, ResamplerImpl};
pub use sample::Sample;
