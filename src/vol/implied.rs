//! Black-Scholes implied-volatility inversion.
//!
//! Newton-Raphson on `σ ↦ bs_price(σ) − market_price` with vega as the derivative,
//! seeded from the Brenner-Subrahmanyam approximation. When vega is negligible or a
//! Newton step would leave `(0, max_vol]`, the solver falls back to bisection on the
//! bracket `[min_vol, max_vol]`. A result is reported as converged only when the
//! pricing error is below `tolerance` and σ itself is pinned to `vol_tolerance`
//! (Newton step or bisection bracket width). Running out of iterations is not an
//! error: the best estimate is returned with `converged = false`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::{ImpliedVolatilityResult, OptionType, PricingError};
use crate::engines::analytic::black_scholes::{bs_price, bs_vega};

/// Numerical settings of [`ImpliedVolSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Absolute pricing error accepted as converged.
    pub tolerance: f64,
    /// Largest remaining σ uncertainty accepted as converged.
    pub vol_tolerance: f64,
    /// Total iteration budget shared by the Newton and bisection phases.
    pub max_iterations: usize,
    /// Lower end of the bisection bracket.
    pub min_vol: f64,
    /// Upper end of the bisection bracket (5.0 = 500% annualized).
    pub max_vol: f64,
    /// Vega below which a Newton step is considered unstable.
    pub min_vega: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-6,
            vol_tolerance: 1.0e-10,
            max_iterations: 100,
            min_vol: 1.0e-6,
            max_vol: 5.0,
            min_vega: 1.0e-10,
        }
    }
}

impl SolverConfig {
    /// # Errors
    /// [`PricingError::InvalidInput`] for a non-positive price or volatility
    /// tolerance, a zero iteration budget, or a bracket that is not
    /// `0 < min_vol < max_vol`.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "solver tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if !(self.vol_tolerance.is_finite() && self.vol_tolerance > 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "solver vol_tolerance must be finite and > 0, got {}",
                self.vol_tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(PricingError::InvalidInput(
                "solver max_iterations must be > 0".to_string(),
            ));
        }
        if !(self.min_vol.is_finite() && self.max_vol.is_finite())
            || self.min_vol <= 0.0
            || self.max_vol <= self.min_vol
        {
            return Err(PricingError::InvalidInput(format!(
                "solver bracket must satisfy 0 < min_vol < max_vol, got [{}, {}]",
                self.min_vol, self.max_vol
            )));
        }
        if !(self.min_vega.is_finite() && self.min_vega >= 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "solver min_vega must be finite and >= 0, got {}",
                self.min_vega
            )));
        }
        Ok(())
    }
}

/// Brenner-Subrahmanyam at-the-money seed `√(2π/T)·(price/S)`.
///
/// # Examples
/// ```
/// use ferric_pricer::vol::implied::brenner_subrahmanyam_guess;
///
/// let guess = brenner_subrahmanyam_guess(100.0, 1.0, 8.0);
/// assert!((guess - 0.2005).abs() < 1e-3);
/// ```
pub fn brenner_subrahmanyam_guess(spot: f64, expiry: f64, market_price: f64) -> f64 {
    ((2.0 * PI) / expiry).sqrt() * (market_price / spot)
}

/// Tracks the volatility with the smallest absolute pricing error seen so far.
#[derive(Debug, Clone, Copy)]
struct BestEstimate {
    vol: f64,
    abs_error: f64,
}

impl BestEstimate {
    fn observe(&mut self, vol: f64, diff: f64) {
        if diff.abs() < self.abs_error {
            self.vol = vol;
            self.abs_error = diff.abs();
        }
    }
}

/// Stateless implied-volatility solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    /// Creates a solver with the given settings.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Active settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds `σ` such that `bs_price(σ) = market_price`.
    ///
    /// Inputs are assumed pre-validated (`spot, strike, expiry > 0`,
    /// `market_price >= 0`, all finite).
    ///
    /// # Errors
    /// - [`PricingError::InvalidInput`] when the solver settings are invalid.
    /// - [`PricingError::OutOfBounds`] when `market_price` is at or below the
    ///   discounted intrinsic value, at or above the no-arbitrage upper bound
    ///   (`S` for a call, `K·e^(−rT)` for a put), or, on the bisection path,
    ///   not bracketed by `[min_vol, max_vol]`.
    ///
    /// # Examples
    /// ```
    /// use ferric_pricer::core::OptionType;
    /// use ferric_pricer::engines::analytic::bs_price;
    /// use ferric_pricer::vol::implied::ImpliedVolSolver;
    ///
    /// let price = bs_price(OptionType::Put, 100.0, 110.0, 0.01, 0.35, 0.75);
    /// let result = ImpliedVolSolver::default()
    ///     .solve(OptionType::Put, 100.0, 110.0, 0.01, 0.75, price)
    ///     .unwrap();
    /// assert!(result.converged);
    /// assert!((result.implied_volatility - 0.35).abs() < 1e-4);
    /// ```
    pub fn solve(
        &self,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        expiry: f64,
        market_price: f64,
    ) -> Result<ImpliedVolatilityResult, PricingError> {
        let cfg = &self.config;
        cfg.validate()?;

        let df = (-rate * expiry).exp();
        let lower = option_type.payoff(spot, strike * df);
        let upper = match option_type {
            OptionType::Call => spot,
            OptionType::Put => strike * df,
        };
        if market_price <= lower {
            return Err(PricingError::OutOfBounds(format!(
                "market price {market_price} is at or below the discounted intrinsic value {lower}"
            )));
        }
        if market_price >= upper {
            return Err(PricingError::OutOfBounds(format!(
                "market price {market_price} is at or above the no-arbitrage upper bound {upper}"
            )));
        }

        let price_at = |vol: f64| bs_price(option_type, spot, strike, rate, vol, expiry);

        let mut sigma = brenner_subrahmanyam_guess(spot, expiry, market_price)
            .clamp(cfg.min_vol, cfg.max_vol);
        let mut best = BestEstimate {
            vol: sigma,
            abs_error: f64::INFINITY,
        };
        let mut iterations = 0;

        while iterations < cfg.max_iterations {
            let diff = price_at(sigma) - market_price;
            iterations += 1;
            best.observe(sigma, diff);
            tracing::trace!(iterations, sigma, diff, "newton iteration");

            if diff == 0.0 {
                return Ok(converged(sigma, iterations));
            }

            let vega = bs_vega(spot, strike, rate, sigma, expiry);
            if vega < cfg.min_vega {
                tracing::debug!(sigma, vega, "vega negligible, switching to bisection");
                return self.bisect(price_at, market_price, iterations, best);
            }

            let step = diff / vega;
            if diff.abs() < cfg.tolerance && step.abs() < cfg.vol_tolerance {
                return Ok(converged(sigma, iterations));
            }

            let next = sigma - step;
            if !next.is_finite() || next <= 0.0 || next > cfg.max_vol {
                tracing::debug!(
                    sigma,
                    next,
                    "newton step left the bracket, switching to bisection"
                );
                return self.bisect(price_at, market_price, iterations, best);
            }
            sigma = next;
        }

        Ok(self.exhausted(best, iterations))
    }

    fn bisect<F>(
        &self,
        price_at: F,
        market_price: f64,
        mut iterations: usize,
        mut best: BestEstimate,
    ) -> Result<ImpliedVolatilityResult, PricingError>
    where
        F: Fn(f64) -> f64,
    {
        let cfg = &self.config;
        let mut lo = cfg.min_vol;
        let mut hi = cfg.max_vol;
        let f_lo = price_at(lo) - market_price;
        let f_hi = price_at(hi) - market_price;

        if f_lo > 0.0 || f_hi < 0.0 {
            return Err(PricingError::OutOfBounds(format!(
                "market price {market_price} is not bracketed by volatilities [{lo}, {hi}] \
                 (prices {:.6e}..{:.6e})",
                f_lo + market_price,
                f_hi + market_price
            )));
        }

        while iterations < cfg.max_iterations {
            let mid = 0.5 * (lo + hi);
            let diff = price_at(mid) - market_price;
            iterations += 1;
            best.observe(mid, diff);
            tracing::trace!(iterations, mid, diff, "bisection iteration");

            // The root lies within (hi - lo) / 2 of mid.
            if diff == 0.0 || (diff.abs() < cfg.tolerance && hi - lo < cfg.vol_tolerance) {
                return Ok(converged(mid, iterations));
            }
            if diff < 0.0 {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        Ok(self.exhausted(best, iterations))
    }

    fn exhausted(&self, best: BestEstimate, iterations: usize) -> ImpliedVolatilityResult {
        tracing::warn!(
            iterations,
            vol = best.vol,
            abs_error = best.abs_error,
            "implied volatility did not converge"
        );
        ImpliedVolatilityResult {
            implied_volatility: best.vol,
            converged: false,
            iterations,
        }
    }
}

fn converged(vol: f64, iterations: usize) -> ImpliedVolatilityResult {
    ImpliedVolatilityResult {
        implied_volatility: vol,
        converged: true,
        iterations,
    }
}

/// Implied volatility with [`SolverConfig::default`].
///
/// # Errors
/// See [`ImpliedVolSolver::solve`].
pub fn implied_vol(
    option_type: OptionType,
    s: f64,
    k: f64,
    r: f64,
    t: f64,
    market_price: f64,
) -> Result<ImpliedVolatilityResult, PricingError> {
    ImpliedVolSolver::default().solve(option_type, s, k, r, t, market_price)
}
