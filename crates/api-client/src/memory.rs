use crate::PriceSource;
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{LongPriceRow, PriceTable};

/// A `PriceSource` backed by an already materialized table.
///
/// Useful offline and in tests. Requested tickers that the table lacks come
/// back as all-missing columns, like an upstream with no quotes for them.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    table: PriceTable,
}

impl InMemorySource {
    pub fn new(table: PriceTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl PriceSource for InMemorySource {
    async fn fetch(
        &self,
        tickers: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, FetchError> {
        let tickers = crate::unique_tickers(tickers);
        let mut rows = Vec::new();

        for ticker in &tickers {
            let Some(column) = self.table.column(ticker) else {
                tracing::warn!(ticker = %ticker, "Ticker not present in the in-memory table.");
                continue;
            };
            for (date, cell) in self.table.dates().iter().zip(column) {
                if let Some(close) = cell {
                    if (start..=end).contains(date) {
                        rows.push(LongPriceRow::new(*date, ticker.as_str(), *close));
                    }
                }
            }
        }

        Ok(PriceTable::from_observations(tickers, rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    #[tokio::test]
    async fn filters_by_ticker_and_range() {
        let table = PriceTable::new(
            vec![d(2), d(3), d(4), d(5)],
            vec!["A".into(), "B".into()],
            vec![
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                vec![Some(9.0), None, Some(8.0), None],
            ],
        )
        .unwrap();
        let source = InMemorySource::new(table);

        let fetched = source
            .fetch(&["B".to_string(), "A".to_string(), "ZZZ".to_string()], d(3), d(4))
            .await
            .unwrap();

        assert_eq!(fetched.tickers(), &["B".to_string(), "A".to_string(), "ZZZ".to_string()]);
        assert_eq!(fetched.dates(), &[d(3), d(4)]);
        assert_eq!(fetched.column("B").unwrap(), &[None, Some(8.0)]);
        assert_eq!(fetched.column("ZZZ").unwrap(), &[None, None]);
    }

    #[tokio::test]
    async fn range_without_rows_is_empty_not_an_error() {
        let table = PriceTable::single("A", vec![d(2)], vec![Some(1.0)]).unwrap();
        let fetched = InMemorySource::new(table)
            .fetch(&["A".to_string()], d(10), d(20))
            .await
            .unwrap();
        assert!(fetched.is_empty());
        assert_eq!(fetched.n_cols(), 1);
    }
}
