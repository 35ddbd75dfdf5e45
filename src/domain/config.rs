//! Analytics configuration loaded from a `ConfigPort`.
//!
//! Every key is optional and falls back to its default; present values are
//! range-checked before any command runs.

use std::path::PathBuf;

use crate::domain::allocation::RiskTolerance;
use crate::domain::error::AnalyticsError;
use crate::domain::forecast::MAX_FORECAST_PERIODS;
use crate::domain::risk::{DEFAULT_RISK_FREE_RATE, DEFAULT_VAR_CONFIDENCE};
use crate::ports::config_port::ConfigPort;

pub const ANALYTICS_SECTION: &str = "analytics";
pub const DATA_SECTION: &str = "data";
pub const OUTPUT_SECTION: &str = "output";
pub const DEFAULT_FORECAST_PERIODS: usize = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub risk_free_rate: f64,
    pub var_confidence: f64,
    pub forecast_periods: usize,
    /// `None` means seed from entropy.
    pub seed: Option<u64>,
    pub risk_tolerance: RiskTolerance,
    pub data_dir: Option<PathBuf>,
    /// Indented JSON output.
    pub pretty_json: bool,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            forecast_periods: DEFAULT_FORECAST_PERIODS,
            seed: None,
            risk_tolerance: RiskTolerance::Medium,
            data_dir: None,
            pretty_json: true,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, AnalyticsError> {
        let defaults = Self::default();
        let risk_free_rate = validate_risk_free_rate(config, defaults.risk_free_rate)?;
        let var_confidence = validate_var_confidence(config, defaults.var_confidence)?;
        let forecast_periods = validate_forecast_periods(config)?;
        let seed = parse_seed(config)?;
        let risk_tolerance = config
            .get_string(ANALYTICS_SECTION, "risk_tolerance")
            .map(|s| RiskTolerance::parse(&s))
            .unwrap_or(defaults.risk_tolerance);
        let data_dir = config
            .get_string(DATA_SECTION, "directory")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let pretty_json = config.get_bool(OUTPUT_SECTION, "pretty", defaults.pretty_json);

        Ok(Self {
            risk_free_rate,
            var_confidence,
            forecast_periods,
            seed,
            risk_tolerance,
            data_dir,
            pretty_json,
        })
    }
}

fn invalid(key: &str, reason: &str) -> AnalyticsError {
    AnalyticsError::ConfigInvalid {
        section: ANALYTICS_SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_risk_free_rate(config: &dyn ConfigPort, default: f64) -> Result<f64, AnalyticsError> {
    let value = config.get_double(ANALYTICS_SECTION, "risk_free_rate", default);
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(value)
}

fn validate_var_confidence(config: &dyn ConfigPort, default: f64) -> Result<f64, AnalyticsError> {
    let value = config.get_double(ANALYTICS_SECTION, "var_confidence", default);
    if !(value > 0.0 && value < 1.0) {
        return Err(invalid(
            "var_confidence",
            "var_confidence must be strictly between 0 and 1",
        ));
    }
    Ok(value)
}

fn validate_forecast_periods(config: &dyn ConfigPort) -> Result<usize, AnalyticsError> {
    let value = config.get_int(
        ANALYTICS_SECTION,
        "forecast_periods",
        DEFAULT_FORECAST_PERIODS as i64,
    );
    match usize::try_from(value) {
        Ok(periods) if (1..=MAX_FORECAST_PERIODS).contains(&periods) => Ok(periods),
        _ => Err(invalid(
            "forecast_periods",
            &format!("forecast_periods must be between 1 and {MAX_FORECAST_PERIODS}"),
        )),
    }
}

fn parse_seed(config: &dyn ConfigPort) -> Result<Option<u64>, AnalyticsError> {
    match config.get_string(ANALYTICS_SECTION, "seed") {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| invalid("seed", "seed must be a non-negative integer")),
    }
}
