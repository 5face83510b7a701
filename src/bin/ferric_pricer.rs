//! JSON-in / JSON-out driver for the pricing facade.
//!
//! ```text
//! ferric-pricer request.json
//! echo '{"kind":"impliedVolatility", ...}' | ferric-pricer
//! ```
//!
//! The document is tagged by `kind` (`"price"` or `"impliedVolatility"`) with
//! the request fields inline. The result is printed to stdout; failures print
//! `{"error": "..."}` and exit with status 1.

use std::io::Read;
use std::process::ExitCode;

use serde::Deserialize;

use ferric_pricer::config::EngineConfig;
use ferric_pricer::core::{ImpliedVolatilityRequest, PricingError, PricingRequest, to_json_pretty};
use ferric_pricer::pricing;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum Command {
    Price(PricingRequest),
    ImpliedVolatility(ImpliedVolatilityRequest),
}

fn read_input() -> Result<String, CliError> {
    match std::env::args().nth(1) {
        Some(path) if path != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Decodes one tagged document, runs it through the facade and renders the
/// result as pretty JSON.
fn execute(input: &str, config: &EngineConfig) -> Result<String, CliError> {
    let command: Command = serde_json::from_str(input)?;
    let output = match command {
        Command::Price(request) => to_json_pretty(&pricing::price(&request)?)?,
        Command::ImpliedVolatility(request) => {
            to_json_pretty(&pricing::implied_volatility_with(&request, &config.solver)?)?
        }
    };
    Ok(output)
}

fn render_error(e: &CliError) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = EngineConfig::from_env()
        .map_err(CliError::from)
        .and_then(|config| execute(&read_input()?, &config));

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            println!("{}", render_error(&e));
            ExitCode::FAILURE
        }
    }
}
