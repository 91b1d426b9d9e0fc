use crate::error::CoreError;
use crate::rows::LongPriceRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::ops::Deref;

/// Daily simple returns, keyed by (date, ticker).
pub type ReturnSeries = WideTable;

/// Returns relative to each ticker's first observation, keyed by (date, ticker).
pub type CumulativeReturnSeries = WideTable;

/// A date-indexed matrix with one column per ticker.
///
/// The date index is strictly increasing and the ticker order is part of the
/// table's identity. Cells are `Option<f64>`: `None` means the upstream had no
/// value for that (date, ticker), which is distinct from any number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    /// Builds a table from a date index, a ticker order and one column per ticker.
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::UnsortedDates(pair[1]));
        }

        let mut seen = HashSet::with_capacity(tickers.len());
        for ticker in &tickers {
            if !seen.insert(ticker.as_str()) {
                return Err(CoreError::DuplicateTicker(ticker.clone()));
            }
        }

        if columns.len() != tickers.len() {
            return Err(CoreError::ShapeMismatch {
                ticker: format!("<{} columns for {} tickers>", columns.len(), tickers.len()),
                expected: tickers.len(),
                found: columns.len(),
            });
        }

        for (ticker, column) in tickers.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(CoreError::ShapeMismatch {
                    ticker: ticker.clone(),
                    expected: dates.len(),
                    found: column.len(),
                });
            }
        }

        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// A table with the given column set and no rows.
    pub fn empty(tickers: Vec<String>) -> Result<Self, CoreError> {
        let columns = vec![Vec::new(); tickers.len()];
        Self::new(Vec::new(), tickers, columns)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.tickers.len()
    }

    /// True when the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    pub fn position(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn column(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.position(ticker).map(|i| self.columns[i].as_slice())
    }

    /// Iterates `(ticker, column)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Option<f64>])> {
        self.tickers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    pub fn value(&self, row: usize, ticker: &str) -> Option<f64> {
        self.column(ticker).and_then(|c| c.get(row).copied().flatten())
    }

    pub fn row(&self, row: usize) -> Vec<Option<f64>> {
        self.columns
            .iter()
            .map(|c| c.get(row).copied().flatten())
            .collect()
    }

    /// Number of non-missing cells in a ticker's column.
    pub fn observation_count(&self, ticker: &str) -> usize {
        self.column(ticker)
            .map(|c| c.iter().filter(|v| v.is_some()).count())
            .unwrap_or(0)
    }

    /// Tickers whose column has no observation at all.
    pub fn tickers_without_data(&self) -> Vec<&str> {
        self.columns()
            .filter(|(_, c)| c.iter().all(Option::is_none))
            .map(|(t, _)| t)
            .collect()
    }

    /// Builds a table of the same shape by filling one output column per ticker.
    ///
    /// `f` receives the ticker, its input column and an output column of the
    /// same length, initialised to missing.
    pub fn map_columns<F>(&self, mut f: F) -> WideTable
    where
        F: FnMut(&str, &[Option<f64>], &mut [Option<f64>]),
    {
        let n = self.dates.len();
        let columns = self
            .columns()
            .map(|(ticker, column)| {
                let mut mapped = vec![None; n];
                f(ticker, column, &mut mapped);
                mapped
            })
            .collect();

        WideTable {
            dates: self.dates.clone(),
            tickers: self.tickers.clone(),
            columns,
        }
    }

    /// Keeps the rows whose index satisfies `keep`, preserving order.
    pub fn filter_rows<F>(&self, mut keep: F) -> WideTable
    where
        F: FnMut(usize, NaiveDate) -> bool,
    {
        let kept: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(i, d)| keep(*i, **d))
            .map(|(i, _)| i)
            .collect();

        WideTable {
            dates: kept.iter().map(|&i| self.dates[i]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| kept.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }

    /// Returns a copy with one column relabelled.
    pub fn rename_column(&self, from: &str, to: &str) -> Result<WideTable, CoreError> {
        let index = self
            .position(from)
            .ok_or_else(|| CoreError::UnknownTicker(from.to_string()))?;
        if from != to && self.position(to).is_some() {
            return Err(CoreError::DuplicateTicker(to.to_string()));
        }

        let mut renamed = self.clone();
        renamed.tickers[index] = to.to_string();
        Ok(renamed)
    }
}

/// A `WideTable` of closing prices.
///
/// Every present cell is finite and strictly positive. A zero or negative
/// quote is upstream corruption and is rejected at construction, never
/// silently treated as missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceTable(WideTable);

impl PriceTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, CoreError> {
        Self::try_from(WideTable::new(dates, tickers, columns)?)
    }

    /// The "no data" table for a ticker set.
    pub fn empty(tickers: Vec<String>) -> Result<Self, CoreError> {
        Ok(Self(WideTable::empty(tickers)?))
    }

    /// A one-column table. Single-ticker requests use the same shape as any other.
    pub fn single(
        ticker: impl Into<String>,
        dates: Vec<NaiveDate>,
        prices: Vec<Option<f64>>,
    ) -> Result<Self, CoreError> {
        Self::new(dates, vec![ticker.into()], vec![prices])
    }

    /// Pivots tidy observations into a wide table with the given column order.
    ///
    /// Dates are sorted and de-duplicated. When the same (date, ticker) is
    /// observed twice the later row wins. Tickers with no rows keep an
    /// all-missing column.
    pub fn from_observations<I>(tickers: Vec<String>, rows: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = LongPriceRow>,
    {
        let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();

        for row in rows {
            let col = tickers
                .iter()
                .position(|t| *t == row.ticker)
                .ok_or_else(|| CoreError::UnknownTicker(row.ticker.clone()))?;
            let cells = by_date
                .entry(row.date)
                .or_insert_with(|| vec![None; tickers.len()]);
            if cells[col].is_some() {
                tracing::debug!(ticker = %row.ticker, date = %row.date, "Duplicate observation, keeping the later one.");
            }
            cells[col] = Some(row.close);
        }

        let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        let mut columns = vec![Vec::with_capacity(dates.len()); tickers.len()];
        for cells in by_date.into_values() {
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.push(cell);
            }
        }

        Self::new(dates, tickers, columns)
    }

    pub fn as_wide(&self) -> &WideTable {
        &self.0
    }

    pub fn into_inner(self) -> WideTable {
        self.0
    }

    /// Keeps the rows whose index satisfies `keep`. Prices stay valid.
    pub fn filter_rows<F>(&self, keep: F) -> PriceTable
    where
        F: FnMut(usize, NaiveDate) -> bool,
    {
        PriceTable(self.0.filter_rows(keep))
    }

    pub fn rename_column(&self, from: &str, to: &str) -> Result<PriceTable, CoreError> {
        Ok(PriceTable(self.0.rename_column(from, to)?))
    }
}

impl TryFrom<WideTable> for PriceTable {
    type Error = CoreError;

    fn try_from(table: WideTable) -> Result<Self, Self::Error> {
        for (ticker, column) in table.columns() {
            for (date, cell) in table.dates().iter().zip(column) {
                if let Some(price) = *cell {
                    if !price.is_finite() || price <= 0.0 {
                        return Err(CoreError::InvalidPrice {
                            ticker: ticker.to_string(),
                            date: *date,
                            price,
                        });
                    }
                }
            }
        }
        Ok(Self(table))
    }
}

impl Deref for PriceTable {
    type Target = WideTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
