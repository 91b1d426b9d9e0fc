use crate::error::FetchError;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.

/// The body of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ApiErrorResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    // Absent when the range holds no trading day.
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    pub currency: Option<String>,
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteColumns>,
    pub adjclose: Option<Vec<AdjCloseColumn>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteColumns {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseColumn {
    pub adjclose: Vec<Option<f64>>,
}

/// Represents an error object from the quote API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: String,
    pub description: String,
}

impl ChartResponse {
    /// Extracts `(trading date, close)` pairs, preferring split/dividend adjusted closes.
    ///
    /// Null quotes and non-positive values are skipped. A response without any
    /// timestamp yields no observation.
    pub fn into_closes(self) -> Result<Vec<(NaiveDate, f64)>, FetchError> {
        if let Some(error) = self.chart.error {
            return Err(FetchError::Api {
                code: error.code,
                description: error.description,
            });
        }

        let result = self
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| FetchError::InvalidData("chart response has no result".to_string()))?;

        let Some(timestamps) = result.timestamp else {
            return Ok(Vec::new());
        };

        let closes = match result.indicators.adjclose.and_then(|a| a.into_iter().next()) {
            Some(adj) => adj.adjclose,
            None => result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default(),
        };

        if closes.len() != timestamps.len() {
            return Err(FetchError::InvalidData(format!(
                "{}: {} timestamps but {} closes",
                result.meta.symbol,
                timestamps.len(),
                closes.len()
            )));
        }

        let mut observations = Vec::with_capacity(timestamps.len());
        let mut rejected = 0usize;
        for (ts, close) in timestamps.into_iter().zip(closes) {
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
                .ok_or_else(|| FetchError::InvalidData(format!("invalid timestamp: {ts}")))?
                .date_naive();
            match close {
                Some(price) if price.is_finite() && price > 0.0 => observations.push((date, price)),
                Some(_) => rejected += 1,
                None => {}
            }
        }

        if rejected > 0 {
            tracing::warn!(
                symbol = %result.meta.symbol,
                rejected,
                "Dropped non-positive quotes from the response."
            );
        }
        Ok(observations)
    }
}

/// The body of `GET /v10/finance/quoteSummary/{symbol}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummary {
    pub result: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    pub error: Option<ApiErrorResponse>,
}
