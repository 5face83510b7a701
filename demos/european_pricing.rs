//! European option pricing: Black-Scholes, CRR lattice, and implied volatility.

use ferric_pricer::core::{ImpliedVolatilityRequest, OptionType, PricingMethod, PricingRequest};
use ferric_pricer::engines::tree::crr_price;
use ferric_pricer::pricing::{implied_volatility, price};
use ferric_pricer::vol::historical::{HistoricalVolConfig, latest_rolling_volatility};

fn main() {
    let spot = 100.0;
    let strike = 105.0;
    let rate = 0.02;
    let vol = 0.30;
    let expiry = 2.0;

    // 1. Facade, both methods
    for method in [PricingMethod::BlackScholes, PricingMethod::Binomial] {
        for option_type in [OptionType::Call, OptionType::Put] {
            let request = PricingRequest {
                option_type,
                method,
                expiry_time: expiry,
                period_number: 8,
                volatility: vol,
                continuous_rf_rate: rate,
                initial_share_price: spot,
                strike_price: strike,
            };
            let result = price(&request).unwrap();
            println!("{method:>13} {option_type:>4} = {:.4}", result.price);
        }
    }

    // 2. Lattice convergence
    println!("\nCRR call convergence:");
    for steps in [8, 32, 128, 512, 2048] {
        let px = crr_price(OptionType::Call, spot, strike, rate, vol, expiry, steps).unwrap();
        println!("  N = {steps:5}, Call = {px:.5}");
    }

    // 3. Implied volatility of a listed quote
    let request = ImpliedVolatilityRequest {
        market_price: 30.95,
        option_type: OptionType::Call,
        expiry_time: 0.5,
        continuous_rf_rate: 0.0427,
        strike_price: 210.0,
        initial_share_price: 227.5,
    };
    let iv = implied_volatility(&request).unwrap();
    println!(
        "\nImplied vol = {:.4} (converged = {}, iterations = {})",
        iv.implied_volatility, iv.converged, iv.iterations
    );

    // 4. Historical volatility from a synthetic close series
    let closes: Vec<f64> = (0..60)
        .map(|i| 100.0 * (1.0 + 0.015 * (i as f64 * 0.7).sin()))
        .collect();
    let hist = latest_rolling_volatility(&closes, &HistoricalVolConfig::default()).unwrap();
    println!("20-day historical vol = {hist:.4}");
}
