use ferric_pricer::core::{ImpliedVolatilityRequest, OptionType, PricingError};
use ferric_pricer::engines::analytic::{bs_price, bs_vega};
use ferric_pricer::pricing::{implied_volatility, implied_volatility_with};
use ferric_pricer::vol::SolverConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn request(
    option_type: OptionType,
    market_price: f64,
    spot: f64,
    strike: f64,
    rate: f64,
    expiry: f64,
) -> ImpliedVolatilityRequest {
    ImpliedVolatilityRequest {
        market_price,
        option_type,
        expiry_time: expiry,
        continuous_rf_rate: rate,
        strike_price: strike,
        initial_share_price: spot,
    }
}

#[test]
fn round_trip_recovers_random_volatilities() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..2000 {
        let option_type = if rng.random_bool(0.5) {
            OptionType::Call
        } else {
            OptionType::Put
        };
        let spot = 100.0;
        let strike = rng.random_range(90.0..110.0);
        let rate = rng.random_range(0.0..0.05);
        let expiry = rng.random_range(0.5..2.0);
        let sigma = rng.random_range(1e-4..2.0);

        let premium = bs_price(option_type, spot, strike, rate, sigma, expiry);
        let req = request(option_type, premium, spot, strike, rate, expiry);
        let intrinsic = option_type.payoff(spot, strike * (-rate * expiry).exp());

        if premium <= intrinsic {
            // Time value lost to rounding.
            assert!(matches!(
                implied_volatility(&req),
                Err(PricingError::OutOfBounds(_))
            ));
            continue;
        }

        let result = implied_volatility(&req).unwrap();
        assert!(result.implied_volatility.is_finite());
        assert!(result.iterations <= 100);

        // A relative move of 1e-4 in sigma shifts the premium by more than 1e-9.
        let well_conditioned = bs_vega(spot, strike, rate, sigma, expiry) * sigma * 1e-4 > 1e-9;
        if well_conditioned {
            assert!(result.converged, "sigma={sigma} K={strike} T={expiry}");
            assert!(
                (result.implied_volatility - sigma).abs() <= (1e-4 * sigma).max(1e-8),
                "sigma={sigma} got={} K={strike} T={expiry}",
                result.implied_volatility
            );
        } else if result.converged {
            let repriced =
                bs_price(option_type, spot, strike, rate, result.implied_volatility, expiry);
            assert!(
                (repriced - premium).abs() <= 1e-9,
                "sigma={sigma} got={} K={strike} T={expiry}",
                result.implied_volatility
            );
        }
    }
}

#[test]
fn listed_quote_example() {
    let result =
        implied_volatility(&request(OptionType::Call, 30.95, 227.5, 210.0, 0.0427, 0.5)).unwrap();
    assert!(result.converged);
    assert_eq!((result.implied_volatility * 100.0).round() / 100.0, 0.29);
}

#[test]
fn premium_above_spot_is_out_of_bounds() {
    let err =
        implied_volatility(&request(OptionType::Call, 150.0, 100.0, 100.0, 0.01, 1.0)).unwrap_err();
    assert!(matches!(err, PricingError::OutOfBounds(_)));
}

#[test]
fn zero_premium_on_in_the_money_option_is_out_of_bounds() {
    let err =
        implied_volatility(&request(OptionType::Put, 0.0, 80.0, 100.0, 0.01, 1.0)).unwrap_err();
    assert!(matches!(err, PricingError::OutOfBounds(_)));
}

#[test]
fn malformed_requests_are_invalid_input() {
    let bad = [
        request(OptionType::Call, -1.0, 100.0, 100.0, 0.01, 1.0),
        request(OptionType::Call, 5.0, 0.0, 100.0, 0.01, 1.0),
        request(OptionType::Call, 5.0, 100.0, -100.0, 0.01, 1.0),
        request(OptionType::Call, 5.0, 100.0, 100.0, 0.01, 0.0),
        request(OptionType::Call, f64::NAN, 100.0, 100.0, 0.01, 1.0),
    ];
    for req in bad {
        assert!(matches!(
            implied_volatility(&req),
            Err(PricingError::InvalidInput(_))
        ));
    }
}

#[test]
fn tight_budget_reports_non_convergence() {
    let premium = bs_price(OptionType::Put, 100.0, 120.0, 0.02, 1.1, 1.0);
    let config = SolverConfig {
        tolerance: 1e-15,
        max_iterations: 3,
        ..SolverConfig::default()
    };
    let result = implied_volatility_with(
        &request(OptionType::Put, premium, 100.0, 120.0, 0.02, 1.0),
        &config,
    )
    .unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 3);
    assert!(result.implied_volatility.is_finite() && result.implied_volatility > 0.0);
}
