//! Canonical European option contract definition.
//!
//! [`VanillaOption`] stores side, strike, and expiry. Every instrument priced
//! by this crate exercises only at expiry; there is no early-exercise flag.
//! Validation accepts `expiry == 0` (intrinsic-value edge case); the pricing
//! facade is stricter and requires `expiry > 0`.

use crate::core::{OptionType, PricingError};

/// European vanilla option contract.
///
/// # Examples
/// ```
/// use ferric_pricer::core::OptionType;
/// use ferric_pricer::instruments::VanillaOption;
///
/// let option = VanillaOption::european_call(105.0, 2.0);
/// assert_eq!(option.option_type, OptionType::Call);
/// assert!(option.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike level.
    pub strike: f64,
    /// Expiry in years.
    pub expiry: f64,
}

impl VanillaOption {
    /// Builds a European option of either side.
    pub fn new(option_type: OptionType, strike: f64, expiry: f64) -> Self {
        Self {
            option_type,
            strike,
            expiry,
        }
    }

    /// Builds a European call option.
    pub fn european_call(strike: f64, expiry: f64) -> Self {
        Self::new(OptionType::Call, strike, expiry)
    }

    /// Builds a European put option.
    ///
    /// # Examples
    /// ```
    /// use ferric_pricer::core::OptionType;
    /// use ferric_pricer::instruments::VanillaOption;
    ///
    /// let put = VanillaOption::european_put(95.0, 0.5);
    /// assert_eq!(put.option_type, OptionType::Put);
    /// ```
    pub fn european_put(strike: f64, expiry: f64) -> Self {
        Self::new(OptionType::Put, strike, expiry)
    }

    /// Payoff at expiry for a terminal underlying level.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        self.option_type.payoff(spot, self.strike)
    }

    /// Validates instrument fields.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidInput`] when:
    /// - `strike <= 0` or non-finite
    /// - `expiry < 0` or non-finite
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla strike must be > 0".to_string(),
            ));
        }
        if !self.expiry.is_finite() || self.expiry < 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla expiry must be >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
