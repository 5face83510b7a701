//! Engine trait, result payload, and the library-wide error type.

use serde::{Deserialize, Serialize};

use crate::market::Market;

/// Pricing engine abstraction over an instrument type.
///
/// Engines are stateless apart from their discretization settings, so a
/// single engine value may be shared freely across threads.
pub trait PricingEngine<I> {
    /// Prices an instrument under the provided market state.
    ///
    /// Engines assume the instrument and market were validated on
    /// construction and do not re-check them.
    fn price(&self, instrument: &I, market: &Market) -> Result<PricingResult, PricingError>;
}

/// Compact key set for engine diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKey {
    D,
    D1,
    D2,
    DiscountFactor,
    NumSteps,
    Pu,
    U,
    Vol,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D => "d",
            Self::D1 => "d1",
            Self::D2 => "d2",
            Self::DiscountFactor => "discount_factor",
            Self::NumSteps => "num_steps",
            Self::Pu => "pu",
            Self::U => "u",
            Self::Vol => "vol",
        }
    }
}

impl std::str::FromStr for DiagKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "d" => Ok(Self::D),
            "d1" => Ok(Self::D1),
            "d2" => Ok(Self::D2),
            "discount_factor" => Ok(Self::DiscountFactor),
            "num_steps" => Ok(Self::NumSteps),
            "pu" => Ok(Self::Pu),
            "u" => Ok(Self::U),
            "vol" => Ok(Self::Vol),
            _ => Err(()),
        }
    }
}

/// Inline diagnostics storage used in [`PricingResult`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Inserts or overwrites a value, returning the previous one.
    ///
    /// The key set is closed and no larger than [`Self::CAPACITY`], so every
    /// key always has a free slot.
    #[inline]
    pub fn insert(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        if let Some(slot) = self.entries.iter_mut().find(|entry| entry.is_none()) {
            *slot = Some((key, value));
        }
        None
    }

    #[inline]
    fn iter_entries(&self) -> impl Iterator<Item = &(DiagKey, f64)> {
        self.entries.iter().filter_map(Option::as_ref)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<f64> {
        let key: DiagKey = key.parse().ok()?;
        self.iter_entries()
            .find_map(|(entry_key, value)| (*entry_key == key).then_some(*value))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.iter_entries().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Engine result payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Present value, finite and non-negative.
    pub price: f64,
    /// Engine-specific scalar diagnostics.
    #[serde(skip)]
    pub diagnostics: Diagnostics,
}

/// Errors surfaced by the pricing core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// A structural precondition was violated before any numerical work.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An internal numerical guard tripped (probability outside [0, 1], NaN, overflow).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
    /// A market quote no non-negative volatility can reproduce.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

/// Convenience checker used by engines to keep NaN/inf out of results.
pub(crate) fn ensure_finite(price: f64, what: &str) -> Result<f64, PricingError> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(PricingError::NumericalInstability(format!(
            "{what} produced a non-finite price ({price})"
        )))
    }
}
