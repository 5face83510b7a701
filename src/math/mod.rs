//! Standard normal distribution.
//!
//! The CDF is the erf-based closed form `Φ(x) = erfc(-x/√2) / 2`, evaluated
//! with `statrs`' complementary error function. Working through `erfc`
//! keeps full relative precision in the lower tail and saturates cleanly:
//! `Φ(x)` reaches exactly `0.0` / `1.0` for `|x|` beyond roughly 38 / 9
//! without overflow or NaN.

use std::f64::consts::FRAC_1_SQRT_2;

use statrs::function::erf::erfc;

/// Standard normal density `φ(x)`.
#[inline]
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution `Φ(x)`.
///
/// Accurate to well below `1e-7` absolute error for every finite `x`;
/// `±∞` map to `1.0` / `0.0`. NaN propagates.
///
/// # Examples
/// ```
/// use ferric_pricer::math::normal_cdf;
///
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert_eq!(normal_cdf(-40.0), 0.0);
/// assert_eq!(normal_cdf(40.0), 1.0);
/// ```
#[inline]
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}
