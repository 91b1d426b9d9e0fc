use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single tidy observation: one ticker's close on one trading date.
///
/// Long-form rows never carry a missing price. A ticker without a quote on a
/// date simply contributes no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongPriceRow {
    pub date: NaiveDate,
    pub ticker: String,
    pub close: f64,
}

impl LongPriceRow {
    pub fn new(date: NaiveDate, ticker: impl Into<String>, close: f64) -> Self {
        Self {
            date,
            ticker: ticker.into(),
            close,
        }
    }
}
