use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Column '{ticker}' has {found} cells but the date index has {expected} rows")]
    ShapeMismatch {
        ticker: String,
        expected: usize,
        found: usize,
    },

    #[error("Date index must be strictly increasing, found {0} out of order or duplicated")]
    UnsortedDates(NaiveDate),

    #[error("Ticker '{0}' appears more than once in the column set")]
    DuplicateTicker(String),

    #[error("Ticker '{0}' is not part of the table's column set")]
    UnknownTicker(String),

    #[error("Invalid price {price} for '{ticker}' on {date}: prices must be finite and positive")]
    InvalidPrice {
        ticker: String,
        date: NaiveDate,
        price: f64,
    },
}
