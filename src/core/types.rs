use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use super::PricingError;

/// Plain-vanilla option side.
///
/// The integer codes follow the native calling convention used by the
/// pricing service: `Call = 0`, `Put = 1`. Serializes as `"call"`/`"put"`;
/// deserialization goes through [`FromStr`] and ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option payoff profile.
    Call,
    /// Put option payoff profile.
    Put,
}

impl OptionType {
    /// Returns +1.0 for calls and -1.0 for puts.
    pub fn sign(self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Integer code of the side.
    pub fn code(self) -> i32 {
        match self {
            Self::Call => 0,
            Self::Put => 1,
        }
    }

    /// Terminal payoff for an underlying level `spot`.
    #[inline]
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }
}

impl TryFrom<i32> for OptionType {
    type Error = PricingError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Call),
            1 => Ok(Self::Put),
            other => Err(PricingError::InvalidInput(format!(
                "unknown option type code {other}"
            ))),
        }
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            other => Err(PricingError::InvalidInput(format!(
                "unknown option type `{other}`"
            ))),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call => f.pad("call"),
            Self::Put => f.pad("put"),
        }
    }
}

/// Valuation method selector.
///
/// Integer codes: `Binomial = 0`, `BlackScholes = 1`. Serializes in
/// snake_case; deserialization accepts every token [`FromStr`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    /// Cox-Ross-Rubinstein recombining lattice.
    Binomial,
    /// Closed-form Black-Scholes formula.
    BlackScholes,
}

impl PricingMethod {
    /// Integer code of the method.
    pub fn code(self) -> i32 {
        match self {
            Self::Binomial => 0,
            Self::BlackScholes => 1,
        }
    }
}

impl TryFrom<i32> for PricingMethod {
    type Error = PricingError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Binomial),
            1 => Ok(Self::BlackScholes),
            other => Err(PricingError::InvalidInput(format!(
                "unknown pricing method code {other}"
            ))),
        }
    }
}

impl FromStr for PricingMethod {
    type Err = PricingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match token.as_str() {
            "binomial" | "crr" => Ok(Self::Binomial),
            "bs" | "blackscholes" => Ok(Self::BlackScholes),
            _ => Err(PricingError::InvalidInput(format!(
                "unknown pricing method `{}`",
                raw.trim()
            ))),
        }
    }
}

impl fmt::Display for PricingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binomial => f.pad("binomial"),
            Self::BlackScholes => f.pad("black_scholes"),
        }
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = PricingError>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(de::Error::custom)
}

impl<'de> Deserialize<'de> for OptionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl<'de> Deserialize<'de> for PricingMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_type_codes_follow_native_convention() {
        assert_eq!(OptionType::Call.code(), 0);
        assert_eq!(OptionType::Put.code(), 1);
        assert_eq!(OptionType::try_from(1).unwrap(), OptionType::Put);
        assert!(matches!(
            OptionType::try_from(2),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn pricing_method_parses_loose_tokens() {
        assert_eq!("Binomial".parse::<PricingMethod>().unwrap(), PricingMethod::Binomial);
        assert_eq!("BS".parse::<PricingMethod>().unwrap(), PricingMethod::BlackScholes);
        assert_eq!(
            "black-scholes".parse::<PricingMethod>().unwrap(),
            PricingMethod::BlackScholes
        );
        assert_eq!(PricingMethod::try_from(0).unwrap(), PricingMethod::Binomial);
        assert!("trinomial".parse::<PricingMethod>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for side in [OptionType::Call, OptionType::Put] {
            assert_eq!(side.to_string().parse::<OptionType>().unwrap(), side);
        }
        for method in [PricingMethod::Binomial, PricingMethod::BlackScholes] {
            assert_eq!(method.to_string().parse::<PricingMethod>().unwrap(), method);
        }
    }

    #[test]
    fn wire_tokens_ignore_case() {
        let side: OptionType = serde_json::from_str(r#""CALL""#).unwrap();
        assert_eq!(side, OptionType::Call);
        let side: OptionType = serde_json::from_str(r#""Put""#).unwrap();
        assert_eq!(side, OptionType::Put);
        let method: PricingMethod = serde_json::from_str(r#""BlackScholes""#).unwrap();
        assert_eq!(method, PricingMethod::BlackScholes);
        let method: PricingMethod = serde_json::from_str(r#""CRR""#).unwrap();
        assert_eq!(method, PricingMethod::Binomial);

        assert_eq!(serde_json::to_string(&OptionType::Call).unwrap(), r#""call""#);
        assert_eq!(
            serde_json::to_string(&PricingMethod::BlackScholes).unwrap(),
            r#""black_scholes""#
        );

        let err = serde_json::from_str::<OptionType>(r#""straddle""#).unwrap_err();
        assert!(err.to_string().contains("straddle"));
        assert!(serde_json::from_str::<OptionType>("0").is_err());
    }

    #[test]
    fn payoff_is_intrinsic_value() {
        assert_eq!(OptionType::Call.payoff(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.payoff(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.payoff(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.sign(), -1.0);
    }
}
