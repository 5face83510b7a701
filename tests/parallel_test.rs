use std::thread;

use ferric_pricer::core::{
    ImpliedVolatilityRequest, OptionType, PricingMethod, PricingRequest,
};
use ferric_pricer::engines::analytic::bs_price;
use ferric_pricer::math::normal_cdf;
use ferric_pricer::pricing::{implied_volatility, implied_volatility_batch, price, price_batch};

/// NIST reference values for the standard normal CDF.
const CDF_REFERENCE: &[(f64, f64)] = &[
    (-3.0, 0.0013498980316300946),
    (-2.0, 0.02275013194817921),
    (-1.0, 0.15865525393145702),
    (-0.5, 0.308_537_538_725_986_9),
    (0.0, 0.5),
    (0.5, 0.691_462_461_274_013_1),
    (1.0, 0.841_344_746_068_542_9),
    (2.0, 0.977_249_868_051_820_8),
    (3.0, 0.99865010196837),
];

fn requests() -> Vec<PricingRequest> {
    (0..64)
        .map(|i| PricingRequest {
            option_type: if i % 2 == 0 { OptionType::Call } else { OptionType::Put },
            method: if i % 3 == 0 {
                PricingMethod::BlackScholes
            } else {
                PricingMethod::Binomial
            },
            expiry_time: 0.25 + 0.05 * i as f64,
            period_number: 50 + 10 * i,
            volatility: 0.1 + 0.01 * i as f64,
            continuous_rf_rate: 0.02,
            initial_share_price: 100.0,
            strike_price: 80.0 + i as f64,
        })
        .collect()
}

#[test]
fn normal_cdf_matches_nist_within_one_e_minus_seven() {
    for &(x, expected) in CDF_REFERENCE {
        let err = (normal_cdf(x) - expected).abs();
        assert!(
            err <= 1.0e-7,
            "x={x} expected={expected} got={} err={err}",
            normal_cdf(x)
        );
    }
}

#[test]
fn concurrent_threads_agree_with_sequential_pricing() {
    let requests = requests();
    let expected: Vec<f64> = requests.iter().map(|r| price(r).unwrap().price).collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let requests = requests.clone();
            thread::spawn(move || {
                requests
                    .iter()
                    .rev()
                    .map(|r| price(r).unwrap().price)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let mut got = handle.join().unwrap();
        got.reverse();
        assert_eq!(got, expected);
    }
}

#[test]
fn batch_matches_one_by_one() {
    let requests = requests();
    let batch = price_batch(&requests);
    assert_eq!(batch.len(), requests.len());
    for (request, result) in requests.iter().zip(batch) {
        assert_eq!(result.unwrap().price, price(request).unwrap().price);
    }

    let iv_requests: Vec<ImpliedVolatilityRequest> = (1..=32)
        .map(|i| {
            let sigma = 0.05 * i as f64;
            ImpliedVolatilityRequest {
                market_price: bs_price(OptionType::Call, 100.0, 100.0, 0.01, sigma, 1.0),
                option_type: OptionType::Call,
                expiry_time: 1.0,
                continuous_rf_rate: 0.01,
                strike_price: 100.0,
                initial_share_price: 100.0,
            }
        })
        .collect();
    let batch = implied_volatility_batch(&iv_requests);
    for (i, (request, result)) in iv_requests.iter().zip(batch).enumerate() {
        let result = result.unwrap();
        assert_eq!(result, implied_volatility(request).unwrap());
        assert!((result.implied_volatility - 0.05 * (i + 1) as f64).abs() < 1e-4);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_batch_is_deterministic() {
    let requests = requests();
    let first: Vec<f64> = price_batch(&requests)
        .into_iter()
        .map(|r| r.unwrap().price)
        .collect();
    for _ in 0..4 {
        let again: Vec<f64> = price_batch(&requests)
            .into_iter()
            .map(|r| r.unwrap().price)
            .collect();
        assert_eq!(again, first);
    }
}
