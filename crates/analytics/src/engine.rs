use crate::benchmark::benchmark_comparison;
use crate::params::AnalyticsParams;
use crate::report::{DashboardReport, DataIssue, Metric};
use crate::returns::{cumulative_returns, daily_returns};
use crate::stats::{correlation_matrix, latest_prices, rolling_volatility, ytd_return};
use core_types::{PriceTable, TickerValues};

/// A stateless calculator for deriving dashboard analytics from closing prices.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalyticsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalyticsParams {
        &self.params
    }

    /// The main entry point for calculating the dashboard analytics.
    ///
    /// # Arguments
    ///
    /// * `prices` - Closing prices for the requested tickers, possibly with gaps.
    /// * `benchmark` - An optional single-series table to compare against.
    ///
    /// # Returns
    ///
    /// A `DashboardReport`. Missing data and a malformed benchmark are recorded
    /// in the report instead of failing the request.
    pub fn calculate(&self, prices: &PriceTable, benchmark: Option<&PriceTable>) -> DashboardReport {
        tracing::info!(
            tickers = prices.n_cols(),
            rows = prices.n_rows(),
            benchmark = benchmark.is_some(),
            "Calculating dashboard analytics."
        );

        let latest_prices = latest_prices(prices);
        let ytd_returns = ytd_return(prices, self.params.as_of_year);
        let volatility = rolling_volatility(prices, &self.params.volatility);

        let (benchmark, benchmark_error) = match benchmark.map(|b| benchmark_comparison(prices, b)) {
            Some(Ok(series)) => (Some(series), None),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Benchmark comparison skipped.");
                (None, Some(e.to_string()))
            }
            None => (None, None),
        };

        let issues = self.collect_issues(prices, &ytd_returns, &volatility);

        DashboardReport {
            tickers: prices.tickers().to_vec(),
            as_of_year: self.params.as_of_year,
            latest_prices,
            ytd_returns,
            volatility,
            daily_returns: daily_returns(prices),
            cumulative_returns: cumulative_returns(prices),
            correlations: correlation_matrix(prices),
            benchmark,
            benchmark_error,
            issues,
        }
    }

    /// Lists tickers without data and undefined window statistics.
    fn collect_issues(
        &self,
        prices: &PriceTable,
        ytd_returns: &TickerValues,
        volatility: &TickerValues,
    ) -> Vec<DataIssue> {
        let mut issues = Vec::new();

        for ticker in prices.tickers() {
            if prices.observation_count(ticker) == 0 {
                tracing::warn!(ticker = %ticker, "No price data in the requested range.");
                issues.push(DataIssue::DataUnavailable {
                    ticker: ticker.clone(),
                });
                continue;
            }

            if volatility.get(ticker).is_none() {
                issues.push(DataIssue::InsufficientHistory {
                    ticker: ticker.clone(),
                    metric: Metric::RollingVolatility,
                });
            }
            if ytd_returns.get(ticker).is_none() {
                issues.push(DataIssue::InsufficientHistory {
                    ticker: ticker.clone(),
                    metric: Metric::YtdReturn,
                });
            }
        }

        if !issues.is_empty() {
            tracing::debug!(count = issues.len(), "Report has data issues.");
        }
        issues
    }
}
