//! Volatility inputs: implied volatility from an observed premium and
//! realized volatility from a closing-price history.

pub mod historical;
pub mod implied;

pub use historical::{
    HistoricalVolConfig, historical_volatility, latest_rolling_volatility, rolling_volatility,
    simple_returns,
};
pub use implied::{ImpliedVolSolver, SolverConfig, brenner_subrahmanyam_guess, implied_vol};
