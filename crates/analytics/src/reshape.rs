use core_types::{CoreError, LongPriceRow, PriceTable};

/// Unpivots a wide price table into tidy rows.
///
/// Rows are ordered by date, then by the table's ticker order. Missing cells
/// produce no row. An empty table yields an empty vector.
pub fn to_long(prices: &PriceTable) -> Vec<LongPriceRow> {
    let mut rows = Vec::with_capacity(prices.n_rows() * prices.n_cols());

    for (i, date) in prices.dates().iter().enumerate() {
        for (ticker, column) in prices.columns() {
            if let Some(close) = column[i] {
                rows.push(LongPriceRow::new(*date, ticker, close));
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        cells = prices.n_rows() * prices.n_cols(),
        "Unpivoted price table."
    );
    rows
}

/// Pivots tidy rows back into a wide table with the given column order.
///
/// Cells without a row come back as missing, so `to_wide(to_long(t))`
/// reproduces every observation of `t`.
pub fn to_wide<I>(rows: I, tickers: Vec<String>) -> Result<PriceTable, CoreError>
where
    I: IntoIterator<Item = LongPriceRow>,
{
    PriceTable::from_observations(tickers, rows)
}
