//! Market snapshot consumed by the pricing engines.
//!
//! A snapshot is spot, a flat continuously-compounded rate, and a flat
//! volatility. Volatility may be zero (deterministic growth); spot must be
//! strictly positive.

use crate::core::PricingError;

/// Market snapshot used by all pricing engines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Market {
    /// Spot price.
    pub spot: f64,
    /// Continuously compounded risk-free rate.
    pub rate: f64,
    /// Flat annualized volatility.
    pub vol: f64,
}

impl Market {
    /// Starts a market builder.
    ///
    /// # Examples
    /// ```
    /// use ferric_pricer::market::Market;
    ///
    /// let market = Market::builder()
    ///     .spot(100.0)
    ///     .rate(0.02)
    ///     .flat_vol(0.30)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(market.spot(), 100.0);
    /// ```
    #[inline]
    pub fn builder() -> MarketBuilder {
        MarketBuilder::default()
    }

    /// Returns spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the flat volatility.
    #[inline]
    pub fn vol(&self) -> f64 {
        self.vol
    }

    /// Discount factor `exp(-r t)`.
    #[inline]
    pub fn discount_factor(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }
}

/// Builder for [`Market`].
#[derive(Debug, Clone, Default)]
pub struct MarketBuilder {
    spot: Option<f64>,
    rate: Option<f64>,
    flat_vol: Option<f64>,
}

impl MarketBuilder {
    /// Sets the spot price.
    #[inline]
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Sets the flat risk-free rate.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the flat volatility.
    #[inline]
    pub fn flat_vol(mut self, vol: f64) -> Self {
        self.flat_vol = Some(vol);
        self
    }

    /// Validates and builds a [`Market`].
    ///
    /// The rate defaults to zero when unset.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidInput`] when spot or volatility is
    /// missing, spot is non-positive, volatility is negative, or any field is
    /// non-finite.
    pub fn build(self) -> Result<Market, PricingError> {
        let spot = self
            .spot
            .ok_or_else(|| PricingError::InvalidInput("market spot is required".to_string()))?;
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "market spot must be finite and > 0, got {spot}"
            )));
        }

        let rate = self.rate.unwrap_or(0.0);
        if !rate.is_finite() {
            return Err(PricingError::InvalidInput(format!(
                "market rate must be finite, got {rate}"
            )));
        }

        let vol = self.flat_vol.ok_or_else(|| {
            PricingError::InvalidInput("market flat_vol is required".to_string())
        })?;
        if !vol.is_finite() || vol < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "market flat_vol must be finite and >= 0, got {vol}"
            )));
        }

        Ok(Market { spot, rate, vol })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_rate_to_zero() {
        let market = Market::builder().spot(50.0).flat_vol(0.2).build().unwrap();
        assert_eq!(market.rate(), 0.0);
        assert_eq!(market.discount_factor(3.0), 1.0);
    }

    #[test]
    fn builder_rejects_bad_fields() {
        assert!(Market::builder().flat_vol(0.2).build().is_err());
        assert!(Market::builder().spot(-1.0).flat_vol(0.2).build().is_err());
        assert!(Market::builder().spot(1.0).flat_vol(-0.2).build().is_err());
        assert!(Market::builder().spot(1.0).build().is_err());
        assert!(
            Market::builder()
                .spot(1.0)
                .rate(f64::INFINITY)
                .flat_vol(0.2)
                .build()
                .is_err()
        );
    }
}
