use crate::error::FetchError;
use crate::fundamentals::{FUNDAMENTAL_MODULES, Fundamentals};
use crate::responses::{ChartResponse, QuoteSummaryResponse};
use crate::{FundamentalsSource, PriceSource};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use configuration::DataSettings;
use core_types::{LongPriceRow, PriceTable};
use futures::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// A concrete implementation of the `PriceSource` for the Yahoo Finance API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (compatible; tickerlens)"),
        );

        Ok(Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .timeout(timeout)
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &DataSettings) -> Result<Self, FetchError> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    /// Fetches daily closes of one symbol between two dates, both inclusive.
    pub async fn fetch_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, FetchError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        // period2 is exclusive upstream, so ask for one extra day.
        let period2 = end.checked_add_days(Days::new(1)).unwrap_or(end);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", day_start_timestamp(start).to_string()),
                ("period2", day_start_timestamp(period2).to_string()),
                ("interval", "1d".to_string()),
                ("events", "div,split".to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body: ChartResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::Deserialization(format!("{symbol} (HTTP {status}): {e}"))
        })?;

        let closes = body
            .into_closes()?
            .into_iter()
            .filter(|(date, _)| (start..=end).contains(date))
            .collect::<Vec<_>>();

        tracing::debug!(symbol, observations = closes.len(), "Fetched daily closes.");
        Ok(closes)
    }
}

/// Unix timestamp of midnight UTC on `date`.
fn day_start_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl PriceSource for YahooClient {
    async fn fetch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, FetchError> {
        let tickers = crate::unique_tickers(tickers);
        tracing::info!(tickers = ?tickers, %start, %end, "Fetching prices.");

        let results = join_all(
            tickers
                .iter()
                .map(|ticker| self.fetch_closes(ticker, start, end)),
        )
        .await;

        let mut rows = Vec::new();
        for (ticker, result) in tickers.iter().zip(results) {
            match result {
                Ok(closes) => {
                    if closes.is_empty() {
                        tracing::warn!(ticker = %ticker, "No quotes returned for the requested range.");
                    }
                    rows.extend(
                        closes
                            .into_iter()
                            .map(|(date, close)| LongPriceRow::new(date, ticker.as_str(), close)),
                    );
                }
                // One failing ticker leaves an empty column; the rest of the batch survives.
                Err(e) => tracing::warn!(ticker = %ticker, error = %e, "Price download failed."),
            }
        }

        Ok(PriceTable::from_observations(tickers, rows)?)
    }
}

#[async_trait]
impl FundamentalsSource for YahooClient {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, FetchError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, ticker);
        let modules = FUNDAMENTAL_MODULES.join(",");

        let body = self
            .client
            .get(&url)
            .query(&[("modules", modules.as_str())])
            .send()
            .await?
            .json::<QuoteSummaryResponse>()
            .await?;

        if let Some(error) = body.quote_summary.error {
            return Err(FetchError::Api {
                code: error.code,
                description: error.description,
            });
        }

        let modules = body
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .unwrap_or_default();

        Ok(Fundamentals::from_modules(ticker, modules))
    }
}
