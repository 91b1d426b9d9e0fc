use core_types::{CorrelationMatrix, CumulativeReturnSeries, ReturnSeries, TickerValues};
use serde::Serialize;

/// The window statistic that could not be computed for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    RollingVolatility,
    YtdReturn,
}

/// A per-ticker gap recorded while building a report.
///
/// Issues never fail the request; the affected cells are simply missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// The ticker has no observation in the requested range.
    DataUnavailable { ticker: String },
    /// The ticker has data, but too little for a window-based statistic.
    InsufficientHistory { ticker: String, metric: Metric },
}

/// Every derived table for one (ticker set, date range) request.
///
/// This struct is the final output of the `AnalyticsEngine` and is handed
/// as-is to whatever renders or exports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub tickers: Vec<String>,
    pub as_of_year: i32,

    // I. Snapshots
    pub latest_prices: TickerValues,
    pub ytd_returns: TickerValues,
    pub volatility: TickerValues, // annualized, percent

    // II. Series
    pub daily_returns: ReturnSeries,
    pub cumulative_returns: CumulativeReturnSeries,
    pub correlations: CorrelationMatrix,

    // III. Benchmark comparison
    pub benchmark: Option<CumulativeReturnSeries>,
    pub benchmark_error: Option<String>,

    pub issues: Vec<DataIssue>,
}

impl DashboardReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty() || self.benchmark_error.is_some()
    }
}
