//! Pricing facade.
//!
//! Single entry point for the service layer: requests are range-checked
//! first, then dispatched to the Black-Scholes closed form, the CRR lattice
//! or the implied-volatility solver. No NaN or infinite value leaves this
//! module; such states surface as [`PricingError::NumericalInstability`].
//!
//! Every function here is pure, so requests may be priced concurrently from
//! any number of threads. With the `parallel` feature the batch variants fan
//! out over rayon's pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{
    ImpliedVolatilityRequest, ImpliedVolatilityResult, PricingEngine, PricingError,
    PricingMethod, PricingRequest, PricingResult, ensure_finite,
};
use crate::engines::analytic::BlackScholesEngine;
use crate::engines::tree::BinomialTreeEngine;
use crate::vol::implied::{ImpliedVolSolver, SolverConfig};

/// Prices one European option.
///
/// # Errors
/// - [`PricingError::InvalidInput`] when the request fails range checks; no
///   engine runs in that case.
/// - [`PricingError::NumericalInstability`] when the lattice probability
///   leaves `[0, 1]` or a result is not finite.
///
/// # Examples
/// ```rust
/// use ferric_pricer::core::{OptionType, PricingMethod, PricingRequest};
/// use ferric_pricer::pricing::price;
///
/// let request = PricingRequest {
///     option_type: OptionType::Call,
///     method: PricingMethod::Binomial,
///     expiry_time: 2.0,
///     period_number: 8,
///     volatility: 0.3,
///     continuous_rf_rate: 0.02,
///     initial_share_price: 100.0,
///     strike_price: 105.0,
/// };
/// let result = price(&request).unwrap();
/// assert!((result.price - 16.46).abs() < 0.01);
/// ```
pub fn price(request: &PricingRequest) -> Result<PricingResult, PricingError> {
    request.validate()?;
    let instrument = request.instrument();
    let market = request.market()?;

    tracing::debug!(
        option_type = %request.option_type,
        method = %request.method,
        steps = request.period_number,
        "pricing request"
    );

    let result = match request.method {
        PricingMethod::BlackScholes => BlackScholesEngine::new().price(&instrument, &market)?,
        PricingMethod::Binomial => {
            BinomialTreeEngine::new(request.period_number).price(&instrument, &market)?
        }
    };
    ensure_finite(result.price, "option price")?;
    Ok(result)
}

/// Implied volatility with [`SolverConfig::default`].
///
/// # Errors
/// See [`implied_volatility_with`].
pub fn implied_volatility(
    request: &ImpliedVolatilityRequest,
) -> Result<ImpliedVolatilityResult, PricingError> {
    implied_volatility_with(request, &SolverConfig::default())
}

/// Implied volatility under explicit solver settings.
///
/// A result with `converged == false` is a best-effort estimate, not an error.
///
/// # Errors
/// - [`PricingError::InvalidInput`] for a malformed request or invalid settings.
/// - [`PricingError::OutOfBounds`] when no volatility in the solver bracket
///   reproduces `market_price`.
///
/// # Examples
/// ```rust
/// use ferric_pricer::core::{ImpliedVolatilityRequest, OptionType};
/// use ferric_pricer::pricing::implied_volatility_with;
/// use ferric_pricer::vol::SolverConfig;
///
/// let request = ImpliedVolatilityRequest {
///     market_price: 30.95,
///     option_type: OptionType::Call,
///     expiry_time: 0.5,
///     continuous_rf_rate: 0.0427,
///     strike_price: 210.0,
///     initial_share_price: 227.5,
/// };
/// let result = implied_volatility_with(&request, &SolverConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!((result.implied_volatility - 0.2935).abs() < 1e-3);
/// ```
pub fn implied_volatility_with(
    request: &ImpliedVolatilityRequest,
    config: &SolverConfig,
) -> Result<ImpliedVolatilityResult, PricingError> {
    request.validate()?;

    tracing::debug!(
        option_type = %request.option_type,
        market_price = request.market_price,
        "implied volatility request"
    );

    let result = ImpliedVolSolver::new(*config).solve(
        request.option_type,
        request.initial_share_price,
        request.strike_price,
        request.continuous_rf_rate,
        request.expiry_time,
        request.market_price,
    )?;
    ensure_finite(result.implied_volatility, "implied volatility")?;
    Ok(result)
}

/// Prices every request, preserving input order.
pub fn price_batch(requests: &[PricingRequest]) -> Vec<Result<PricingResult, PricingError>> {
    #[cfg(feature = "parallel")]
    let results: Vec<_> = requests.par_iter().map(price).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = requests.iter().map(price).collect();
    results
}

/// Inverts every request with default solver settings, preserving input order.
pub fn implied_volatility_batch(
    requests: &[ImpliedVolatilityRequest],
) -> Vec<Result<ImpliedVolatilityResult, PricingError>> {
    #[cfg(feature = "parallel")]
    let results: Vec<_> = requests.par_iter().map(implied_volatility).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = requests.iter().map(implied_volatility).collect();
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use approx::assert_relative_eq;

    fn request(option_type: OptionType, method: PricingMethod) -> PricingRequest {
        PricingRequest {
            option_type,
            method,
            expiry_time: 2.0,
            period_number: 8,
            volatility: 0.3,
            continuous_rf_rate: 0.02,
            initial_share_price: 100.0,
            strike_price: 105.0,
        }
    }

    fn iv_request(market_price: f64) -> ImpliedVolatilityRequest {
        ImpliedVolatilityRequest {
            market_price,
            option_type: OptionType::Call,
            expiry_time: 0.5,
            continuous_rf_rate: 0.0427,
            strike_price: 210.0,
            initial_share_price: 227.5,
        }
    }

    #[test]
    fn dispatches_by_method() {
        let bs = price(&request(OptionType::Call, PricingMethod::BlackScholes)).unwrap();
        let tree = price(&request(OptionType::Call, PricingMethod::Binomial)).unwrap();
        assert_relative_eq!(bs.price, 16.4359, epsilon = 1e-3);
        assert_relative_eq!(tree.price, 16.4637, epsilon = 1e-3);
        assert!(bs.diagnostics.contains_key("d1"));
        assert!(tree.diagnostics.contains_key("pu"));
    }

    #[test]
    fn black_scholes_ignores_period_number() {
        let mut req = request(OptionType::Put, PricingMethod::BlackScholes);
        req.period_number = 0;
        let result = price(&req).unwrap();
        assert_relative_eq!(result.price, 17.3188, epsilon = 1e-3);
    }

    #[test]
    fn invalid_requests_fail_before_pricing() {
        let cases: [fn(&mut PricingRequest); 6] = [
            |r| r.expiry_time = 0.0,
            |r| r.volatility = -0.1,
            |r| r.initial_share_price = -1.0,
            |r| r.strike_price = 0.0,
            |r| r.period_number = 0,
            |r| r.continuous_rf_rate = f64::NAN,
        ];
        for mutate in cases {
            let mut req = request(OptionType::Call, PricingMethod::Binomial);
            mutate(&mut req);
            assert!(matches!(price(&req), Err(PricingError::InvalidInput(_))));
        }
    }

    #[test]
    fn oversized_lattice_is_rejected_before_allocation() {
        let mut req = request(OptionType::Put, PricingMethod::Binomial);
        req.period_number = usize::MAX;
        let err = price(&req).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(ref m) if m.contains("periodNumber")));

        req.period_number = crate::engines::tree::MAX_STEPS;
        req.method = PricingMethod::BlackScholes;
        assert!(price(&req).is_ok());
    }

    #[test]
    fn coarse_lattice_instability_is_surfaced() {
        let mut req = request(OptionType::Call, PricingMethod::Binomial);
        req.continuous_rf_rate = 0.5;
        req.volatility = 0.01;
        req.period_number = 1;
        assert!(matches!(
            price(&req),
            Err(PricingError::NumericalInstability(_))
        ));
    }

    #[test]
    fn implied_volatility_of_listed_quote() {
        let result = implied_volatility(&iv_request(30.95)).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.implied_volatility, 0.2935, epsilon = 1e-3);
    }

    #[test]
    fn zero_premium_is_out_of_bounds_negative_is_invalid() {
        assert!(matches!(
            implied_volatility(&iv_request(0.0)),
            Err(PricingError::OutOfBounds(_))
        ));
        assert!(matches!(
            implied_volatility(&iv_request(-1.0)),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn explicit_config_controls_budget() {
        let config = SolverConfig {
            tolerance: 1e-14,
            max_iterations: 1,
            ..SolverConfig::default()
        };
        let result = implied_volatility_with(&iv_request(30.95), &config).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn batches_preserve_order() {
        let requests = [
            request(OptionType::Call, PricingMethod::BlackScholes),
            request(OptionType::Put, PricingMethod::BlackScholes),
            PricingRequest {
                expiry_time: -1.0,
                ..request(OptionType::Put, PricingMethod::Binomial)
            },
        ];
        let results = price_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_relative_eq!(results[0].as_ref().unwrap().price, 16.4359, epsilon = 1e-3);
        assert_relative_eq!(results[1].as_ref().unwrap().price, 17.3188, epsilon = 1e-3);
        assert!(results[2].is_err());

        let ivs = implied_volatility_batch(&[iv_request(30.95), iv_request(0.0)]);
        assert!(ivs[0].as_ref().unwrap().converged);
        assert!(matches!(ivs[1], Err(PricingError::OutOfBounds(_))));
    }
}
