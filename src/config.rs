//! Application configuration from CLI flags and environment variables.
//!
//! Every flag has an environment-variable counterpart (`LOGGEN_*`); the
//! environment takes precedence over flag defaults, flags take precedence
//! over everything. Validation happens here - the rest of the crate treats
//! the parsed `Config` as an already-validated value and only degrades
//! gracefully on degenerate values (see `generator`).

use clap::Parser;
use std::time::Duration;

/// Default upper bound for random numbers.
pub const DEFAULT_MAX_NUMBER: i64 = 100;

/// Default number of vocabulary entries to sample from.
pub const DEFAULT_NUM_STRINGS: i64 = 10;

/// Default interval between log emissions.
pub const DEFAULT_SLEEP_DURATION: Duration = Duration::from_secs(5);

/// Default port for the health check server.
pub const DEFAULT_HEALTH_PORT: u16 = 8081;

/// All application configuration.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "loggen",
    version,
    about = "Generates structured JSON logs with random data"
)]
pub struct Config {
    /// Maximum random number (inclusive upper bound)
    #[arg(
        long = "max-number",
        env = "LOGGEN_MAX_NUMBER",
        default_value_t = DEFAULT_MAX_NUMBER
    )]
    pub max_number: i64,

    /// Number of strings from the predefined set to use
    #[arg(
        long = "num-strings",
        env = "LOGGEN_NUM_STRINGS",
        default_value_t = DEFAULT_NUM_STRINGS
    )]
    pub num_strings: i64,

    /// Duration between log emissions (e.g. "500ms", "5s", "2m")
    #[arg(
        long = "sleep-duration",
        env = "LOGGEN_SLEEP_DURATION",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub sleep_duration: Duration,

    /// Port for the health check server
    #[arg(
        long = "health-port",
        env = "LOGGEN_HEALTH_PORT",
        default_value_t = DEFAULT_HEALTH_PORT
    )]
    pub health_port: u16,
}

impl Config {
    /// Returns a `Config` carrying the default values without touching
    /// flags or the environment. Useful for tests.
    pub fn with_defaults() -> Self {
        Self {
            max_number: DEFAULT_MAX_NUMBER,
            num_strings: DEFAULT_NUM_STRINGS,
            sleep_duration: DEFAULT_SLEEP_DURATION,
            health_port: DEFAULT_HEALTH_PORT,
        }
    }
}

/// Parse a Go-style duration string with a single unit suffix.
///
/// Accepted units: `ms`, `s`, `m`, `h`. Zero, empty, and unitless values
/// are rejected - a zero emission period would spin the loop.
///
/// # Returns
/// Some(Duration) on success, None if invalid.
pub fn parse_duration(duration_str: &str) -> Option<Duration> {
    let duration_str = duration_str.trim();

    if duration_str.is_empty() {
        return None;
    }

    // "ms" must be tried before "s"
    let (number_str, unit) = if let Some(n) = duration_str.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = duration_str.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = duration_str.strip_suffix('m') {
        (n, "m")
    } else if let Some(n) = duration_str.strip_suffix('h') {
        (n, "h")
    } else {
        return None;
    };

    let number: u64 = number_str.parse().ok()?;

    if number == 0 {
        return None;
    }

    match unit {
        "ms" => Some(Duration::from_millis(number)),
        "s" => Some(Duration::from_secs(number)),
        "m" => number.checked_mul(60).map(Duration::from_secs),
        "h" => number.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    }
}

/// clap value parser wrapper around [`parse_duration`].
fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).ok_or_else(|| {
        format!("invalid duration {s:?} (expected forms like \"500ms\", \"5s\", \"2m\", \"1h\")")
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_tests;
