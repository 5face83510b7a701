//! JSON helpers for the request and result payloads.
//!
//! # Examples
//! ```rust
//! use ferric_pricer::core::{from_json, to_json_pretty, OptionType, PricingMethod, PricingRequest};
//!
//! let request = PricingRequest {
//!     option_type: OptionType::Put,
//!     method: PricingMethod::BlackScholes,
//!     expiry_time: 2.0,
//!     period_number: 1,
//!     volatility: 0.3,
//!     continuous_rf_rate: 0.02,
//!     initial_share_price: 100.0,
//!     strike_price: 105.0,
//! };
//!
//! let json = to_json_pretty(&request).expect("json serialization");
//! assert!(json.contains("\"continuousRfRate\""));
//! let decoded: PricingRequest = from_json(&json).expect("json deserialization");
//! assert_eq!(decoded, request);
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize a value to pretty JSON.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Deserialize a value from JSON.
pub fn from_json<T: DeserializeOwned>(payload: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(payload)
}
