//! Close-to-close historical volatility.
//!
//! Percent-change returns `r_t = P_t / P_{t−1} − 1`, a rolling sample standard
//! deviation (denominator `window − 1`), annualized by `√periods_per_year`.
//! The defaults, a 20-observation window on a 255-day year, give the usual
//! one-month realized volatility used to seed the pricing engines.

use serde::{Deserialize, Serialize};

use crate::core::PricingError;

/// Rolling-window settings for historical volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalVolConfig {
    /// Number of returns per window, `>= 2`.
    pub window: usize,
    /// Annualization factor, e.g. trading days per year.
    pub periods_per_year: f64,
}

impl Default for HistoricalVolConfig {
    fn default() -> Self {
        Self {
            window: 20,
            periods_per_year: 255.0,
        }
    }
}

impl HistoricalVolConfig {
    /// # Errors
    /// [`PricingError::InvalidInput`] when `window < 2` or `periods_per_year`
    /// is not finite and positive.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.window < 2 {
            return Err(PricingError::InvalidInput(format!(
                "window must be >= 2, got {}",
                self.window
            )));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(PricingError::InvalidInput(format!(
                "periods_per_year must be finite and > 0, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }
}

/// Percent-change returns of a price series.
///
/// # Errors
/// [`PricingError::InvalidInput`] if fewer than two prices are supplied or any
/// price is non-finite or `<= 0`.
pub fn simple_returns(prices: &[f64]) -> Result<Vec<f64>, PricingError> {
    validate_prices(prices)?;
    Ok(prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

/// Annualized rolling volatility, one value per full window of returns.
///
/// The output has `prices.len() − window` entries; entry `i` covers returns
/// `i..i + window`.
///
/// # Errors
/// [`PricingError::InvalidInput`] for invalid prices or settings, or when the
/// series holds fewer than `window` returns.
///
/// # Examples
/// ```
/// use ferric_pricer::vol::historical::rolling_volatility;
///
/// let prices: Vec<f64> = (0..30).map(|i| 100.0 * 1.001_f64.powi(i)).collect();
/// let vols = rolling_volatility(&prices, 20, 255.0).unwrap();
/// assert_eq!(vols.len(), 10);
/// assert!(vols.iter().all(|v| *v < 1e-9));
/// ```
pub fn rolling_volatility(
    prices: &[f64],
    window: usize,
    periods_per_year: f64,
) -> Result<Vec<f64>, PricingError> {
    HistoricalVolConfig {
        window,
        periods_per_year,
    }
    .validate()?;
    let returns = simple_returns(prices)?;
    if returns.len() < window {
        return Err(PricingError::InvalidInput(format!(
            "need at least {} prices for a {window}-return window, got {}",
            window + 1,
            prices.len()
        )));
    }

    let annualize = periods_per_year.sqrt();
    Ok(returns
        .windows(window)
        .map(|w| sample_variance(w).sqrt() * annualize)
        .collect())
}

/// Annualized sample volatility over the entire return series.
///
/// # Errors
/// [`PricingError::InvalidInput`] for invalid prices, fewer than two returns,
/// or a non-positive `periods_per_year`.
pub fn historical_volatility(prices: &[f64], periods_per_year: f64) -> Result<f64, PricingError> {
    let returns = simple_returns(prices)?;
    HistoricalVolConfig {
        window: returns.len(),
        periods_per_year,
    }
    .validate()?;
    Ok(sample_variance(&returns).sqrt() * periods_per_year.sqrt())
}

/// Most recent window of [`rolling_volatility`] under `config`.
///
/// # Errors
/// See [`rolling_volatility`].
pub fn latest_rolling_volatility(
    prices: &[f64],
    config: &HistoricalVolConfig,
) -> Result<f64, PricingError> {
    let vols = rolling_volatility(prices, config.window, config.periods_per_year)?;
    let latest = vols.last().copied().ok_or_else(|| {
        PricingError::InvalidInput("price series too short for one window".to_string())
    })?;
    tracing::debug!(
        observations = prices.len(),
        window = config.window,
        vol = latest,
        "rolling volatility"
    );
    Ok(latest)
}

fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)
}

fn validate_prices(prices: &[f64]) -> Result<(), PricingError> {
    if prices.len() < 2 {
        return Err(PricingError::InvalidInput(
            "prices must contain at least two values".to_string(),
        ));
    }
    if let Some((i, p)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && **p > 0.0))
    {
        return Err(PricingError::InvalidInput(format!(
            "prices must be finite and > 0, got {p} at index {i}"
        )));
    }
    Ok(())
}
