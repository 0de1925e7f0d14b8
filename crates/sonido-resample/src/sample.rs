//! Per-format numeric behavior, monomorphized over the four supported
//! sample types instead of dispatched through function-pointer tables.
//!
//! Each impl fixes the accumulator width used by the inner-product
//! kernels (double the sample width for integer formats, matching the
//! original fixed-point design) and the saturation/rounding rules that
//! follow from it.

/// A sample format the resampler can operate on.
///
/// Implemented for `i16` (S16), `i32` (S32), `f32` (F32) and `f64`
/// (F64). Not intended to be implemented outside this crate.
pub trait Sample: Copy + Default + core::fmt::Debug + PartialEq + 'static {
    /// Accumulator type for dot products: double width for integer
    /// formats, same width for float formats.
    type Acc: Copy + Default;

    /// Fixed-point precision in bits. `15` for S16, `31` for S32, `0`
    /// (unused) for float formats.
    const PRECISION: u32;

    /// `true` for S16/S32, `false` for F32/F64.
    const IS_INTEGER: bool;

    /// Zero accumulator.
    fn acc_zero() -> Self::Acc;

    /// `acc + a*b`, widened into the accumulator. Wrapping for integer
    /// formats (matches the reference implementation's double-width,
    /// not triple-width, accumulator — see `DESIGN.md`).
    fn mac(acc: Self::Acc, a: Self, b: Self) -> Self::Acc;

    /// Shift an accumulated partial sum down by [`Sample::PRECISION`]
    /// bits before combining it with an interpolation coefficient.
    /// Identity for float formats.
    fn shr_precision(acc: Self::Acc) -> Self::Acc;

    /// `acc + partial * coeff`, coeff widened into the accumulator.
    fn scale_add(acc: Self::Acc, partial: Self::Acc, coeff: Self) -> Self::Acc;

    /// Final `(acc + 2^(P-1)) >> P` rounding plus saturation to
    /// `[-2^P, 2^P - 1]`, then narrow to `Self`. Identity cast for
    /// float formats (no rounding, no clamping).
    fn finish(acc: Self::Acc) -> Self;

    /// Truncating conversion from a 64-bit fixed-point value in the
    /// same [`Sample::PRECISION`] domain as `Self`. Only meaningful
    /// for integer formats.
    fn from_i64(value: i64) -> Self;

    /// Conversion from a real value, used for float-format taps and
    /// interpolation coefficients. Only meaningful for float formats.
    fn from_f64(value: f64) -> Self;

    /// Widen to `f64`, used by tap quantization (integer formats read
    /// taps back as `f64` to run the DC-bias search) and tests.
    fn to_f64(self) -> f64;
}

impl Sample for i16 {
    type Acc = i32;
    const PRECISION: u32 = 15;
    const IS_INTEGER: bool = true;

    fn acc_zero() -> i32 {
        0
    }

    fn mac(acc: i32, a: i16, b: i16) -> i32 {
        acc.wrapping_add(i32::from(a).wrapping_mul(i32::from(b)))
    }

    fn shr_precision(acc: i32) -> i32 {
        acc >> Self::PRECISION
    }

    fn scale_add(acc: i32, partial: i32, coeff: i16) -> i32 {
        acc.wrapping_add(partial.wrapping_mul(i32::from(coeff)))
    }

    fn finish(acc: i32) -> i16 {
        let rounded = acc.wrapping_add(1i32 << (Self::PRECISION - 1)) >> Self::PRECISION;
        rounded.clamp(-(1i32 << Self::PRECISION), (1i32 << Self::PRECISION) - 1) as i16
    }

    fn from_i64(value: i64) -> i16 {
        value as i16
    }

    fn from_f64(_value: f64) -> i16 {
        unreachable!("i16 taps are produced by quantize::quantize_int, not from_f64")
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for i32 {
    type Acc = i64;
    const PRECISION: u32 = 31;
    const IS_INTEGER: bool = true;

    fn acc_zero() -> i64 {
        0
    }

    fn mac(acc: i64, a: i32, b: i32) -> i64 {
        acc.wrapping_add(i64::from(a).wrapping_mul(i64::from(b)))
    }

    fn shr_precision(acc: i64) -> i64 {
        acc >> Self::PRECISION
    }

    fn scale_add(acc: i64, partial: i64, coeff: i32) -> i64 {
        acc.wrapping_add(partial.wrapping_mul(i64::from(coeff)))
    }

    fn finish(acc: i64) -> i32 {
        let rounded = acc.wrapping_add(1i64 << (Self::PRECISION - 1)) >> Self::PRECISION;
        rounded.clamp(-(1i64 << Self::PRECISION), (1i64 << Self::PRECISION) - 1) as i32
    }

    fn from_i64(value: i64) -> i32 {
        value as i32
    }

    fn from_f64(_value: f64) -> i32 {
        unreachable!("i32 taps are produced by quantize::quantize_int, not from_f64")
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f32 {
    type Acc = f32;
    const PRECISION: u32 = 0;
    const IS_INTEGER: bool = false;

    fn acc_zero() -> f32 {
        0.0
    }

    fn mac(acc: f32, a: f32, b: f32) -> f32 {
        acc + a * b
    }

    fn shr_precision(acc: f32) -> f32 {
        acc
    }

    fn scale_add(acc: f32, partial: f32, coeff: f32) -> f32 {
        acc + partial * coeff
    }

    fn finish(acc: f32) -> f32 {
        acc
    }

    fn from_i64(_value: i64) -> f32 {
        unreachable!("f32 taps are produced from_f64, not from_i64")
    }

    fn from_f64(value: f64) -> f32 {
        value as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f64 {
    type Acc = f64;
    const PRECISION: u32 = 0;
    const IS_INTEGER: bool = false;

    fn acc_zero() -> f64 {
        0.0
    }

    fn mac(acc: f64, a: f64, b: f64) -> f64 {
        acc + a * b
    }

    fn shr_precision(acc: f64) -> f64 {
        acc
    }

    fn scale_add(acc: f64, partial: f64, coeff: f64) -> f64 {
        acc + partial * coeff
    }

    fn finish(acc: f64) -> f64 {
        acc
    }

    fn from_i64(_value: i64) -> f64 {
        unreachable!("f64 taps are produced from_f64, not from_i64")
    }

    fn from_f64(value: f64) -> f64 {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_finish_rounds_and_clamps() {
        let unity = i32::from(i16::MAX) << 15; // exactly i16::MAX after shift
        assert_eq!(i16::finish(unity), i16::MAX);

        let overshoot = (i32::from(i16::MAX) + 100) << 15; // clamps above range
        assert_eq!(i16::finish(overshoot), i16::MAX);

        let undershoot = (i32::from(i16::MIN) - 100) << 15; // clamps below range
        assert_eq!(i16::finish(undershoot), i16::MIN);
    }

    #[test]
    fn float_finish_is_identity() {
        assert_eq!(f32::finish(1.25), 1.25);
        assert_eq!(f64::finish(-0.5), -0.5);
    }
}
