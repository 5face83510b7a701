//! Ferric Pricer is the numerical core of a European option pricing service: closed-form
//! Black-Scholes, a Cox-Ross-Rubinstein binomial lattice, and Black-Scholes implied-volatility
//! inversion, behind a validating facade.
//!
//! References used across modules include:
//! - Black and Scholes (1973) and Hull, *Options, Futures, and Other Derivatives* (11th ed.),
//!   Ch. 13 and 15.
//! - Cox, Ross and Rubinstein (1979) for the recombining lattice.
//! - Brenner and Subrahmanyam (1988) for the at-the-money implied-volatility seed.
//!
//! Numerical considerations:
//! - A degenerate `σ·√T` collapses every engine to the discounted intrinsic value instead of
//!   dividing by zero.
//! - The lattice rejects step sizes whose risk-neutral probability leaves `[0, 1]`.
//! - The implied-volatility solver never errors on non-convergence; it reports
//!   `converged = false` with its best estimate.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered batch pricing in [`pricing`].
//!
//! # Quick Start
//! Price a request through the facade:
//! ```rust
//! use ferric_pricer::core::{OptionType, PricingMethod, PricingRequest};
//! use ferric_pricer::pricing::price;
//!
//! let request = PricingRequest {
//!     option_type: OptionType::Call,
//!     method: PricingMethod::BlackScholes,
//!     expiry_time: 2.0,
//!     period_number: 1,
//!     volatility: 0.30,
//!     continuous_rf_rate: 0.02,
//!     initial_share_price: 100.0,
//!     strike_price: 105.0,
//! };
//! let result = price(&request).unwrap();
//! assert!((result.price - 16.44).abs() < 0.01);
//! ```
//!
//! Use an engine directly:
//! ```rust
//! use ferric_pricer::core::PricingEngine;
//! use ferric_pricer::engines::tree::BinomialTreeEngine;
//! use ferric_pricer::instruments::VanillaOption;
//! use ferric_pricer::market::Market;
//!
//! let market = Market::builder().spot(100.0).rate(0.02).flat_vol(0.30).build().unwrap();
//! let put = VanillaOption::european_put(105.0, 2.0);
//! let result = BinomialTreeEngine::new(500).price(&put, &market).unwrap();
//! assert!((result.price - 17.32).abs() < 0.01);
//! ```
//!
//! Invert implied volatility:
//! ```rust
//! use ferric_pricer::core::OptionType;
//! use ferric_pricer::engines::analytic::bs_price;
//! use ferric_pricer::vol::implied::implied_vol;
//!
//! let market = bs_price(OptionType::Call, 100.0, 105.0, 0.02, 0.25, 1.0);
//! let result = implied_vol(OptionType::Call, 100.0, 105.0, 0.02, 1.0, market).unwrap();
//! assert!(result.converged);
//! assert!((result.implied_volatility - 0.25).abs() < 1.0e-4);
//! ```
//!
//! Estimate volatility from closing prices:
//! ```rust
//! use ferric_pricer::vol::historical::{HistoricalVolConfig, latest_rolling_volatility};
//!
//! let closes: Vec<f64> = (0..40)
//!     .map(|i| 100.0 * if i % 2 == 0 { 1.0 } else { 1.01 })
//!     .collect();
//! let vol = latest_rolling_volatility(&closes, &HistoricalVolConfig::default()).unwrap();
//! assert!(vol > 0.1 && vol < 0.5);
//! ```

pub mod config;
pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod pricing;
pub mod vol;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::*;
    pub use crate::engines::analytic::*;
    pub use crate::engines::tree::*;
    pub use crate::instruments::*;
    pub use crate::market::*;
    pub use crate::vol::{HistoricalVolConfig, ImpliedVolSolver, SolverConfig};
}
