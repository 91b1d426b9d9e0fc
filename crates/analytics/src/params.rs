use crate::error::AnalyticsError;
use serde::Serialize;

/// Trailing window used for the volatility snapshot when none is configured.
pub const DEFAULT_ROLLING_WINDOW: usize = 30;

/// Trading days per year used to annualize daily standard deviations.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Parameters of the rolling annualized volatility.
///
/// Construct through [`VolatilityParams::new`] so the window and factor are
/// always valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityParams {
    window: usize,
    annualization_factor: f64,
    min_periods: usize,
}

impl VolatilityParams {
    /// `window` must be positive and `annualization_factor` finite and positive.
    ///
    /// `min_periods` starts at 2, the fewest valid returns with a defined
    /// sample standard deviation, capped at the window length. Leading and
    /// sparse windows therefore report a value as soon as two returns exist,
    /// unlike a pandas `rolling(window).std()` which needs `window` valid
    /// returns. Use [`VolatilityParams::with_min_periods`] with `window` to get
    /// that stricter behaviour.
    pub fn new(window: usize, annualization_factor: f64) -> Result<Self, AnalyticsError> {
        if window == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "rolling window must be greater than zero".to_string(),
            ));
        }
        if !annualization_factor.is_finite() || annualization_factor <= 0.0 {
            return Err(AnalyticsError::InvalidParameter(format!(
                "annualization factor must be positive, got {annualization_factor}"
            )));
        }

        Ok(Self {
            window,
            annualization_factor,
            min_periods: window.min(2),
        })
    }

    /// Minimum number of valid returns inside a window for a defined value.
    pub fn with_min_periods(mut self, min_periods: usize) -> Result<Self, AnalyticsError> {
        if min_periods == 0 || min_periods > self.window {
            return Err(AnalyticsError::InvalidParameter(format!(
                "min_periods must be between 1 and the window ({}), got {min_periods}",
                self.window
            )));
        }
        self.min_periods = min_periods;
        Ok(self)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn annualization_factor(&self) -> f64 {
        self.annualization_factor
    }

    pub fn min_periods(&self) -> usize {
        self.min_periods
    }
}

impl Default for VolatilityParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_ROLLING_WINDOW,
            annualization_factor: TRADING_DAYS_PER_YEAR.sqrt(),
            min_periods: 2,
        }
    }
}

/// Everything a single dashboard request needs besides the prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyticsParams {
    pub volatility: VolatilityParams,
    /// Calendar year whose January 1st opens the year-to-date window.
    pub as_of_year: i32,
}

impl AnalyticsParams {
    pub fn new(volatility: VolatilityParams, as_of_year: i32) -> Self {
        Self {
            volatility,
            as_of_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_daily_conventions() {
        let params = VolatilityParams::default();
        assert_eq!(params.window(), 30);
        assert_eq!(params.min_periods(), 2);
        assert!((params.annualization_factor() - 252f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(VolatilityParams::new(0, 1.0).is_err());
        assert!(VolatilityParams::new(10, 0.0).is_err());
        assert!(VolatilityParams::new(10, -1.0).is_err());
        assert!(VolatilityParams::new(10, f64::INFINITY).is_err());

        let params = VolatilityParams::new(10, 1.0).unwrap();
        assert!(params.with_min_periods(0).is_err());
        assert!(params.with_min_periods(11).is_err());
        assert_eq!(params.with_min_periods(10).unwrap().min_periods(), 10);
    }

    #[test]
    fn single_row_window_caps_min_periods() {
        let params = VolatilityParams::new(1, 1.0).unwrap();
        assert_eq!(params.min_periods(), 1);
    }
}
