//! Closed-form Black-Scholes pricing for European options on a
//! non-dividend-paying underlying.
//!
//! ```text
//! d1 = (ln(S/K) + (r + σ²/2)·T) / (σ·√T),   d2 = d1 − σ·√T
//! C  = S·Φ(d1) − K·e^(−rT)·Φ(d2)
//! P  = K·e^(−rT)·Φ(−d2) − S·Φ(−d1)
//! ```
//!
//! When `σ·√T` is degenerate (zero volatility or zero expiry) the formula is
//! replaced by its limit, the discounted intrinsic value of the forward:
//! `max(S − K·e^(−rT), 0)` for a call and `max(K·e^(−rT) − S, 0)` for a put.

use crate::core::{
    DiagKey, Diagnostics, OptionType, PricingEngine, PricingError, PricingResult, ensure_finite,
};
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;
use crate::math::{normal_cdf, normal_pdf};

/// Below this total standard deviation the closed form is replaced by its limit.
pub const MIN_TOTAL_VOL: f64 = 1.0e-12;

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

/// Returns `(d1, d2)`; callers must ensure `vol·√expiry > 0`.
#[inline]
pub fn bs_d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

#[inline]
fn discounted_intrinsic(option_type: OptionType, spot: f64, strike: f64, df: f64) -> f64 {
    option_type.payoff(spot, strike * df)
}

/// Black-Scholes price.
///
/// Inputs are assumed pre-validated (`spot, strike > 0`, `vol >= 0`,
/// `expiry >= 0`).
///
/// # Examples
/// ```rust
/// use ferric_pricer::core::OptionType;
/// use ferric_pricer::engines::analytic::black_scholes::bs_price;
///
/// let call = bs_price(OptionType::Call, 100.0, 105.0, 0.02, 0.30, 2.0);
/// assert!((call - 16.44).abs() < 0.01);
/// ```
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let df = (-rate * expiry).exp();
    if vol * expiry.sqrt() < MIN_TOTAL_VOL {
        return discounted_intrinsic(option_type, spot, strike, df);
    }

    let (d1, d2) = bs_d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// Vega `∂price/∂σ = S·φ(d1)·√T`, identical for calls and puts.
///
/// Returns `0.0` for a degenerate `σ·√T`.
#[inline]
pub fn bs_vega(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> f64 {
    if vol * expiry.sqrt() < MIN_TOTAL_VOL {
        return 0.0;
    }
    let (d1, _) = bs_d1_d2(spot, strike, rate, vol, expiry);
    spot * normal_pdf(d1) * expiry.sqrt()
}

impl PricingEngine<VanillaOption> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        let vol = market.vol();
        let df = market.discount_factor(instrument.expiry);
        let price = bs_price(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            vol,
            instrument.expiry,
        );

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::Vol, vol);
        diagnostics.insert(DiagKey::DiscountFactor, df);
        if vol * instrument.expiry.sqrt() >= MIN_TOTAL_VOL {
            let (d1, d2) = bs_d1_d2(
                market.spot,
                instrument.strike,
                market.rate,
                vol,
                instrument.expiry,
            );
            diagnostics.insert(DiagKey::D1, d1);
            diagnostics.insert(DiagKey::D2, d2);
        }

        Ok(PricingResult {
            price: ensure_finite(price, "black-scholes")?.max(0.0),
            diagnostics,
        })
    }
}

/// Convenience wrapper returning only the price.
///
/// # Errors
/// Returns [`PricingError::NumericalInstability`] if the closed form
/// overflows.
pub fn black_scholes(instrument: &VanillaOption, market: &Market) -> Result<f64, PricingError> {
    BlackScholesEngine::new()
        .price(instrument, market)
        .map(|result| result.price)
}
