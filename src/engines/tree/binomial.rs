//! Module `engines::tree::binomial`.
//!
//! Cox-Ross-Rubinstein recombining lattice for European options.
//!
//! References: Hull (11th ed.) Ch. 13, Cox-Ross-Rubinstein (1979), and backward-induction
//! recursions around Eq. (13.10).
//!
//! Numerical considerations: move factors `u = e^(σ√dt)`, `d = 1/u` and every leaf
//! `S·u^j·d^(N−j) = S·e^((2j−N)·σ√dt)` come straight from the exponential, so no drift
//! compounds across steps. Backward induction keeps a single rolling array of `N + 1`
//! values (O(N) space, O(N²) time). No early-exercise check is made.
//!
//! When to use: lattice diagnostics and discretization studies; the closed form in
//! [`crate::engines::analytic::black_scholes`] is the limit as `N → ∞`.

use crate::core::{
    DiagKey, Diagnostics, OptionType, PricingEngine, PricingError, PricingResult, ensure_finite,
};
use crate::engines::analytic::black_scholes::MIN_TOTAL_VOL;
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;

/// Deepest lattice accepted. Backward induction is quadratic in the step
/// count, so this also bounds the work a single request can demand.
pub const MAX_STEPS: usize = 100_000;

fn check_steps(steps: usize) -> Result<(), PricingError> {
    if steps == 0 || steps > MAX_STEPS {
        return Err(PricingError::InvalidInput(format!(
            "binomial steps must be in 1..={MAX_STEPS}, got {steps}"
        )));
    }
    Ok(())
}

/// Cox-Ross-Rubinstein binomial tree engine.
#[derive(Debug, Clone, Copy)]
pub struct BinomialTreeEngine {
    /// Number of tree steps.
    pub steps: usize,
}

impl BinomialTreeEngine {
    /// Creates a tree engine with the given number of steps.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

/// Per-step lattice parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrParameters {
    /// Step length in years.
    pub dt: f64,
    /// Log-size of one up move, `σ·√dt`.
    pub log_u: f64,
    /// Up factor `e^(σ√dt)`.
    pub u: f64,
    /// Down factor `1/u`.
    pub d: f64,
    /// Risk-neutral up probability `(e^(r·dt) − d) / (u − d)`.
    pub pu: f64,
    /// One-step discount factor `e^(−r·dt)`.
    pub discount: f64,
}

impl CrrParameters {
    /// Derives the lattice for `steps` periods over `[0, expiry]`.
    ///
    /// # Errors
    /// - [`PricingError::InvalidInput`] when `steps` is zero or above [`MAX_STEPS`].
    /// - [`PricingError::NumericalInstability`] when the risk-neutral probability
    ///   falls outside `[0, 1]` (step too coarse for the rate/volatility pair).
    ///
    /// A degenerate `σ·√dt` is not handled here; [`crr_price`] short-circuits it.
    pub fn new(rate: f64, vol: f64, expiry: f64, steps: usize) -> Result<Self, PricingError> {
        check_steps(steps)?;

        let dt = expiry / steps as f64;
        let log_u = vol * dt.sqrt();
        let u = log_u.exp();
        let d = (-log_u).exp();
        let growth = (rate * dt).exp();
        let pu = (growth - d) / (u - d);
        if !pu.is_finite() || !(0.0..=1.0).contains(&pu) {
            tracing::warn!(rate, vol, dt, pu, "binomial risk-neutral probability out of range");
            return Err(PricingError::NumericalInstability(format!(
                "risk-neutral probability {pu} is outside [0, 1] (r={rate}, sigma={vol}, dt={dt})"
            )));
        }

        Ok(Self {
            dt,
            log_u,
            u,
            d,
            pu,
            discount: (-rate * dt).exp(),
        })
    }
}

/// CRR lattice price of a European option.
///
/// With `σ·√dt` degenerate the underlying grows deterministically and the
/// price collapses to the discounted intrinsic value of the forward, the
/// same limit the closed form uses.
///
/// # Errors
/// See [`CrrParameters::new`]; a non-finite backward-induction result is
/// reported as [`PricingError::NumericalInstability`].
///
/// # Examples
/// ```rust
/// use ferric_pricer::core::OptionType;
/// use ferric_pricer::engines::tree::crr_price;
///
/// let put = crr_price(OptionType::Put, 100.0, 105.0, 0.02, 0.30, 2.0, 8).unwrap();
/// assert!((put - 17.35).abs() < 0.005);
/// ```
pub fn crr_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
    steps: usize,
) -> Result<f64, PricingError> {
    price_lattice(option_type, spot, strike, rate, vol, expiry, steps).map(|(price, _)| price)
}

fn price_lattice(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
    steps: usize,
) -> Result<(f64, Option<CrrParameters>), PricingError> {
    check_steps(steps)?;
    if vol * (expiry / steps as f64).sqrt() < MIN_TOTAL_VOL {
        let df = (-rate * expiry).exp();
        return Ok((option_type.payoff(spot, strike * df), None));
    }

    let params = CrrParameters::new(rate, vol, expiry, steps)?;
    let disc_p = params.discount * params.pu;
    let disc_1mp = params.discount * (1.0 - params.pu);

    let n = steps as f64;
    let mut values: Vec<f64> = (0..=steps)
        .map(|j| {
            let st = spot * ((2.0 * j as f64 - n) * params.log_u).exp();
            option_type.payoff(st, strike)
        })
        .collect();

    for i in (0..steps).rev() {
        for j in 0..=i {
            values[j] = disc_p.mul_add(values[j + 1], disc_1mp * values[j]);
        }
    }

    let price = ensure_finite(values[0], "binomial lattice")?;
    Ok((price.max(0.0), Some(params)))
}

impl PricingEngine<VanillaOption> for BinomialTreeEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        let (price, params) = price_lattice(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol(),
            instrument.expiry,
            self.steps,
        )?;

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::NumSteps, self.steps as f64);
        diagnostics.insert(DiagKey::Vol, market.vol());
        if let Some(params) = params {
            diagnostics.insert(DiagKey::U, params.u);
            diagnostics.insert(DiagKey::D, params.d);
            diagnostics.insert(DiagKey::Pu, params.pu);
            diagnostics.insert(DiagKey::DiscountFactor, params.discount);
        }

        Ok(PricingResult { price, diagnostics })
    }
}
