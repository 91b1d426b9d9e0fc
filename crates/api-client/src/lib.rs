//! Upstream collaborators of the analytics core: daily closing prices and
//! pass-through company fundamentals.

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::PriceTable;

pub mod error;
pub mod fundamentals;
pub mod memory;
pub mod responses;
pub mod yahoo;

// --- Public API ---
pub use fundamentals::Fundamentals;
pub use memory::InMemorySource;
pub use yahoo::YahooClient;

/// The generic, abstract interface for a price-data provider.
/// This trait is the contract the presentation layer uses, allowing the
/// underlying implementation (live or in-memory) to be swapped out.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Closing prices of `tickers` for every trading date in `start..=end`.
    ///
    /// Columns follow the order of `tickers` with duplicates removed. A ticker
    /// without quotes is returned as an all-missing column rather than an error.
    async fn fetch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, FetchError>;
}

/// Provider of per-company financial statements.
#[async_trait]
pub trait FundamentalsSource: Send + Sync {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, FetchError>;
}

/// Removes repeated tickers, keeping the first occurrence.
pub(crate) fn unique_tickers(tickers: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        if !unique.contains(ticker) {
            unique.push(ticker.clone());
        }
    }
    unique
}
