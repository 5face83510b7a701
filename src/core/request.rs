//! Request and result value objects exchanged with the pricing facade.
//!
//! Field names serialize in camelCase to match the service payloads
//! (`expiryTime`, `continuousRfRate`, `initialSharePrice`, ...).

use serde::{Deserialize, Serialize};

use super::{OptionType, PricingError, PricingMethod};
use crate::engines::tree::binomial::MAX_STEPS;
use crate::instruments::vanilla::VanillaOption;
use crate::market::Market;

fn default_period_number() -> usize {
    1
}

/// One European pricing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    #[serde(rename = "type", alias = "optionType")]
    pub option_type: OptionType,
    pub method: PricingMethod,
    /// Years to expiry, `> 0`.
    pub expiry_time: f64,
    /// Lattice depth in `1..=MAX_STEPS`; ignored by Black-Scholes.
    #[serde(default = "default_period_number")]
    pub period_number: usize,
    /// Annualized volatility, `>= 0`.
    pub volatility: f64,
    /// Annualized continuously-compounded risk-free rate.
    pub continuous_rf_rate: f64,
    /// Spot price of the underlying, `> 0`.
    pub initial_share_price: f64,
    /// Strike price, `> 0`.
    pub strike_price: f64,
}

impl PricingRequest {
    /// Range checks every field; performs no numerical work.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] for non-finite values, `expiry_time <= 0`,
    /// `volatility < 0`, non-positive spot or strike, or a `period_number`
    /// outside `1..=MAX_STEPS` on a binomial request.
    pub fn validate(&self) -> Result<(), PricingError> {
        require_finite(&[
            ("expiryTime", self.expiry_time),
            ("volatility", self.volatility),
            ("continuousRfRate", self.continuous_rf_rate),
            ("initialSharePrice", self.initial_share_price),
            ("strikePrice", self.strike_price),
        ])?;
        require_positive("expiryTime", self.expiry_time)?;
        if self.volatility < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be >= 0, got {}",
                self.volatility
            )));
        }
        require_positive("initialSharePrice", self.initial_share_price)?;
        require_positive("strikePrice", self.strike_price)?;
        if self.method == PricingMethod::Binomial
            && !(1..=MAX_STEPS).contains(&self.period_number)
        {
            return Err(PricingError::InvalidInput(format!(
                "periodNumber must be in 1..={MAX_STEPS} for the binomial method, got {}",
                self.period_number
            )));
        }
        Ok(())
    }

    /// Contract terms of the request.
    pub fn instrument(&self) -> VanillaOption {
        VanillaOption::new(self.option_type, self.strike_price, self.expiry_time)
    }

    /// Market snapshot of the request.
    ///
    /// # Errors
    /// Propagates builder validation failures.
    pub fn market(&self) -> Result<Market, PricingError> {
        Market::builder()
            .spot(self.initial_share_price)
            .rate(self.continuous_rf_rate)
            .flat_vol(self.volatility)
            .build()
    }
}

/// Inversion of an observed option premium into Black-Scholes volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpliedVolatilityRequest {
    /// Observed premium; legacy payloads call it `initialOptionPrice`.
    #[serde(alias = "initialOptionPrice")]
    pub market_price: f64,
    #[serde(rename = "type", alias = "optionType")]
    pub option_type: OptionType,
    pub expiry_time: f64,
    pub continuous_rf_rate: f64,
    pub strike_price: f64,
    pub initial_share_price: f64,
}

impl ImpliedVolatilityRequest {
    /// Range checks every field.
    ///
    /// A zero premium passes: whether it is reachable by any volatility is a
    /// no-arbitrage question answered by the solver, not a structural one.
    ///
    /// # Errors
    /// [`PricingError::InvalidInput`] for non-finite values, a negative
    /// premium, `expiry_time <= 0`, or non-positive spot or strike.
    pub fn validate(&self) -> Result<(), PricingError> {
        require_finite(&[
            ("marketPrice", self.market_price),
            ("expiryTime", self.expiry_time),
            ("continuousRfRate", self.continuous_rf_rate),
            ("strikePrice", self.strike_price),
            ("initialSharePrice", self.initial_share_price),
        ])?;
        if self.market_price < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "marketPrice must be >= 0, got {}",
                self.market_price
            )));
        }
        require_positive("expiryTime", self.expiry_time)?;
        require_positive("strikePrice", self.strike_price)?;
        require_positive("initialSharePrice", self.initial_share_price)?;
        Ok(())
    }
}

/// Outcome of an implied-volatility inversion.
///
/// `converged == false` marks a best-effort estimate after the iteration
/// budget ran out; it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpliedVolatilityResult {
    pub implied_volatility: f64,
    pub converged: bool,
    pub iterations: usize,
}

fn require_finite(fields: &[(&str, f64)]) -> Result<(), PricingError> {
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(PricingError::InvalidInput(format!(
            "{name} must be finite, got {value}"
        ))),
        None => Ok(()),
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), PricingError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::InvalidInput(format!(
            "{name} must be > 0, got {value}"
        )))
    }
}
