//! Error type for resampler construction and reconfiguration.
//!
//! Runtime kernels (`resample`) never fail: once a resampler is built,
//! every call to [`crate::AudioResampler::resample`] succeeds. Only
//! construction and [`crate::AudioResampler::update`] can report an error.

use core::fmt;

/// Errors reported by [`crate::AudioResampler::new`] and
/// [`crate::AudioResampler::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A non-positive rate/channel count, or an option value outside its
    /// valid range (e.g. `cutoff` not in `0 < c <= 1`).
    InvalidArgument {
        /// Human-readable reason, stable across releases for matching in tests.
        reason: &'static str,
    },
    /// Allocation failed while growing tap tables or history buffers.
    ///
    /// Unreachable in practice under Rust's allocator (allocation failure
    /// aborts the process by default), kept for API parity with the
    /// documented error taxonomy this crate is grounded on.
    OutOfMemory,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Error::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result alias for fallible resampler operations.
pub type Result<T> = core::result::Result<T, Error>;
