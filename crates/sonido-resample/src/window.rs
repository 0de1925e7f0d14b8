//! Continuous tap value functions: nearest, linear, cubic, and the two
//! windowed-sinc designs (Blackman-Nuttall, Kaiser).
//!
//! All take a sample offset `x`, in output-sample units, centered at 0.

#[cfg(not(feature = "std"))]
use libm::{cos, sin, sqrt};

#[cfg(feature = "std")]
#[inline]
fn sin(x: f64) -> f64 {
    x.sin()
}

#[cfg(feature = "std")]
#[inline]
fn cos(x: f64) -> f64 {
    x.cos()
}

#[cfg(feature = "std")]
#[inline]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(feature = "std")]
#[inline]
fn exp(x: f64) -> f64 {
    x.exp()
}

#[cfg(not(feature = "std"))]
use libm::exp;

#[cfg(feature = "std")]
#[inline]
fn powf(x: f64, y: f64) -> f64 {
    x.powf(y)
}

#[cfg(not(feature = "std"))]
use libm::pow as powf;

const PI: f64 = core::f64::consts::PI;

/// Zero-order hold: `1` inside `|x| < 0.5`, else `0`.
#[must_use]
pub fn nearest_tap(x: f64) -> f64 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

/// Triangular tap over the full filter span.
#[must_use]
pub fn linear_tap(x: f64, n_taps: i32) -> f64 {
    let a = x.abs() / f64::from(n_taps);
    if a < 1.0 { 1.0 - a } else { 0.0 }
}

/// Mitchell-Netravali two-piece cubic, parameterized by `b`/`c`.
#[must_use]
pub fn cubic_tap(x: f64, n_taps: i32, b: f64, c: f64) -> f64 {
    let a = (x * 4.0).abs() / f64::from(n_taps);
    let a2 = a * a;
    let a3 = a2 * a;

    if a <= 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * a3 + (-18.0 + 12.0 * b + 6.0 * c) * a2 + (6.0 - 2.0 * b))
            / 6.0
    } else if a <= 2.0 {
        ((-b - 6.0 * c) * a3 + (6.0 * b + 30.0 * c) * a2 + (-12.0 * b - 48.0 * c) * a
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn sinc(x: f64, cutoff: f64) -> f64 {
    let y = PI * x;
    if y == 0.0 { cutoff } else { sin(y * cutoff) / y }
}

/// Windowed sinc with a Blackman-Nuttall window.
#[must_use]
pub fn blackman_nuttall_tap(x: f64, n_taps: i32, cutoff: f64) -> f64 {
    let s = sinc(x, cutoff);
    let w = 2.0 * PI * x / f64::from(n_taps) + PI;
    s * (0.3635819 - 0.4891775 * cos(w) + 0.1365995 * cos(2.0 * w) - 0.0106411 * cos(3.0 * w))
}

/// Windowed sinc with a Kaiser window of shape parameter `beta`.
#[must_use]
pub fn kaiser_tap(x: f64, n_taps: i32, cutoff: f64, beta: f64) -> f64 {
    let s = sinc(x, cutoff);
    let w = 2.0 * x / f64::from(n_taps);
    s * bessel_i0(beta * sqrt((1.0 - w * w).max(0.0)))
}

/// Kaiser beta from stopband attenuation `a` in dB.
#[must_use]
pub fn kaiser_beta(a: f64) -> f64 {
    if a > 50.0 {
        0.1102 * (a - 8.7)
    } else if a >= 21.0 {
        0.5842 * powf(a - 21.0, 0.4) + 0.07886 * (a - 21.0)
    } else {
        0.0
    }
}

/// Kaiser filter order from stopband attenuation `a` and transition
/// bandwidth `tr_bw` (fraction of Nyquist). Returns `n_taps = n + 1`.
#[must_use]
pub fn kaiser_n_taps(a: f64, tr_bw: f64) -> i32 {
    let dw = 2.0 * PI * tr_bw;
    let n = (a - 8.0) / (2.285 * dw);
    n as i32 + 1
}

/// Zeroth-order modified Bessel function of the first kind, computed to
/// double precision.
///
/// Uses the power series for `|x| < 3.75` and the companion large-argument
/// asymptotic expansion (Abramowitz & Stegun 9.8.1/9.8.2) beyond that —
/// the two approximations standard numerical libraries switch between.
#[must_use]
pub fn bessel_i0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 3.75 {
        let q = x / 3.75;
        let t = q * q;
        1.0 + t
            * (3.5156229
                + t * (3.0899424
                    + t * (1.2067492
                        + t * (0.2659732 + t * (0.0360768 + t * 0.0045813)))))
    } else {
        let t = 3.75 / ax;
        (exp(ax) / sqrt(ax))
            * (0.39894228
                + t * (0.01328592
                    + t * (0.00225319
                        + t * (-0.00157565
                            + t * (0.00916281
                                + t * (-0.02057706
                                    + t * (0.02635537
                                        + t * (-0.01647633 + t * 0.00392377))))))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_matches_impulse() {
        assert_eq!(nearest_tap(0.0), 1.0);
        assert_eq!(nearest_tap(0.49), 1.0);
        assert_eq!(nearest_tap(0.5), 0.0);
        assert_eq!(nearest_tap(-0.6), 0.0);
    }

    #[test]
    fn linear_is_triangular() {
        assert_eq!(linear_tap(0.0, 4), 1.0);
        assert!(linear_tap(2.0, 4) > 0.0);
        assert_eq!(linear_tap(4.0, 4), 0.0);
    }

    #[test]
    fn cubic_is_continuous_at_piece_boundary() {
        let n_taps = 4;
        let b = 1.0 / 3.0;
        let c = 1.0 / 3.0;
        // at a == 1.0 both pieces must agree
        let x = f64::from(n_taps) / 4.0; // a = |4x|/n_taps = 1.0
        let eps = 1e-9;
        let left = cubic_tap(x - eps, n_taps, b, c);
        let right = cubic_tap(x + eps, n_taps, b, c);
        assert!((left - right).abs() < 1e-6);
    }

    #[test]
    fn bessel_i0_matches_known_values() {
        // Reference values from standard tables.
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
        assert!((bessel_i0(1.0) - 1.266_065_877_75).abs() < 1e-8);
        assert!((bessel_i0(5.0) - 27.239_871_82).abs() < 1e-4);
        assert!((bessel_i0(10.0) - 2815.716_628_47).abs() < 1e-1);
    }

    #[test]
    fn kaiser_beta_matches_piecewise_definition() {
        assert_eq!(kaiser_beta(10.0), 0.0);
        assert!((kaiser_beta(30.0) - (0.5842 * 9f64.powf(0.4) + 0.07886 * 9.0)).abs() < 1e-9);
        assert!((kaiser_beta(60.0) - 0.1102 * 51.3).abs() < 1e-9);
    }
}
