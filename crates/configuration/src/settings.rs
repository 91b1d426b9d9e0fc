use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing keys fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub data: DataSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analytics;
        if a.rolling_window == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.rolling_window must be greater than zero".to_string(),
            ));
        }
        if !a.annualization_factor.is_finite() || a.annualization_factor <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "analytics.annualization_factor must be positive, got {}",
                a.annualization_factor
            )));
        }
        if a.min_periods == 0 || a.min_periods > a.rolling_window {
            return Err(ConfigError::ValidationError(format!(
                "analytics.min_periods must be between 1 and rolling_window ({}), got {}",
                a.rolling_window, a.min_periods
            )));
        }

        let d = &self.data;
        if d.lookback_days <= 0 {
            return Err(ConfigError::ValidationError(
                "data.lookback_days must be positive".to_string(),
            ));
        }
        if d.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "data.timeout_secs must be positive".to_string(),
            ));
        }
        if d.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError("data.base_url is empty".to_string()));
        }

        Ok(())
    }
}

/// Parameters of the analytics transforms.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Number of trailing daily returns in the volatility window.
    pub rolling_window: usize,
    /// Multiplier from daily to annual standard deviation (sqrt(252) for daily data).
    pub annualization_factor: f64,
    /// Fewest valid returns inside a window for a defined volatility.
    pub min_periods: usize,
    /// Year opening the YTD window. Defaults to the current year when unset.
    pub as_of_year: Option<i32>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            rolling_window: 30,
            annualization_factor: 252f64.sqrt(),
            min_periods: 2,
            as_of_year: None,
        }
    }
}

impl AnalyticsSettings {
    /// Applies per-run overrides on top of the loaded settings.
    pub fn apply(&mut self, overrides: &AnalyticsOverrides) {
        if let Some(window) = overrides.window {
            self.rolling_window = window;
            // min_periods may not exceed the window.
            self.min_periods = self.min_periods.min(window.max(1));
        }
        if let Some(factor) = overrides.annualization_factor {
            self.annualization_factor = factor;
        }
        if let Some(min_periods) = overrides.min_periods {
            self.min_periods = min_periods;
        }
        if let Some(year) = overrides.as_of_year {
            self.as_of_year = Some(year);
        }
    }
}

/// Command-line overrides for [`AnalyticsSettings`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct AnalyticsOverrides {
    /// Rolling volatility window, in trading days.
    #[cfg_attr(feature = "clap", arg(long))]
    pub window: Option<usize>,
    /// Annualization factor applied to the daily standard deviation.
    #[cfg_attr(feature = "clap", arg(long))]
    pub annualization_factor: Option<f64>,
    /// Minimum valid returns per volatility window.
    #[cfg_attr(feature = "clap", arg(long))]
    pub min_periods: Option<usize>,
    /// Year whose January 1st starts the YTD window.
    #[cfg_attr(feature = "clap", arg(long))]
    pub as_of_year: Option<i32>,
}

/// Where prices come from and what to request by default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataSettings {
    /// Tickers used when none are given on the command line.
    pub tickers: Vec<String>,
    /// Benchmark symbol (e.g., "^GSPC"). Empty or absent disables the comparison.
    pub benchmark: Option<String>,
    /// Default history length when no start date is given.
    pub lookback_days: i64,
    /// Root of the quote API.
    pub base_url: String,
    /// Per-request timeout for the quote API.
    pub timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            tickers: vec!["AAPL".to_string(), "MSFT".to_string(), "GOOG".to_string()],
            benchmark: Some("^GSPC".to_string()),
            lookback_days: 365 * 5,
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}
