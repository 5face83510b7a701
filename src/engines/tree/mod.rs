//! Tree-based pricing engines.

pub mod binomial;

pub use binomial::{BinomialTreeEngine, MAX_STEPS, crr_price};
