use serde::Serialize;

/// One ticker's entry in a snapshot. `value` is `None` when the metric is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerValue {
    pub ticker: String,
    pub value: Option<f64>,
}

/// An ordered ticker → value mapping (latest price, YTD return, volatility).
///
/// Entries follow the column order of the table they were computed from. A
/// ticker that is present with `value: None` had no data for the metric; it is
/// reported, never dropped or defaulted to zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TickerValues {
    entries: Vec<TickerValue>,
}

impl TickerValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticker: impl Into<String>, value: Option<f64>) {
        self.entries.push(TickerValue {
            ticker: ticker.into(),
            value,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.entry(ticker).is_some()
    }

    pub fn entry(&self, ticker: &str) -> Option<&TickerValue> {
        self.entries.iter().find(|e| e.ticker == ticker)
    }

    /// The defined value for a ticker, if any.
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.entry(ticker).and_then(|e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TickerValue> {
        self.entries.iter()
    }

    /// Tickers reported with an undefined value.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.value.is_none())
            .map(|e| e.ticker.as_str())
    }
}

impl FromIterator<(String, Option<f64>)> for TickerValues {
    fn from_iter<T: IntoIterator<Item = (String, Option<f64>)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(ticker, value)| TickerValue { ticker, value })
                .collect(),
        }
    }
}

/// Square ticker × ticker matrix of pairwise correlations.
///
/// `values[i][j]` is `None` when the pair has too few overlapping observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    tickers: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Builds a matrix from its tickers and a row-major grid.
    ///
    /// The grid is trimmed or padded with `None` to `n × n`.
    pub fn new(tickers: Vec<String>, mut values: Vec<Vec<Option<f64>>>) -> Self {
        let n = tickers.len();
        values.resize(n, Vec::new());
        for row in &mut values {
            row.resize(n, None);
        }
        Self { tickers, values }
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_values_keep_order_and_missing_entries() {
        let values: TickerValues = vec![
            ("B".to_string(), Some(2.0)),
            ("A".to_string(), None),
        ]
        .into_iter()
        .collect();

        let order: Vec<&str> = values.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert!(values.contains("A"));
        assert_eq!(values.get("A"), None);
        assert_eq!(values.get("B"), Some(2.0));
        assert_eq!(values.missing().collect::<Vec<_>>(), vec!["A"]);
        assert!(!values.contains("C"));
    }

    #[test]
    fn correlation_matrix_is_padded_to_square() {
        let m = CorrelationMatrix::new(vec!["A".into(), "B".into()], vec![vec![Some(1.0)]]);
        assert_eq!(m.rows().len(), 2);
        assert_eq!(m.get("A", "A"), Some(1.0));
        assert_eq!(m.get("A", "B"), None);
        assert_eq!(m.get("A", "Z"), None);
    }
}
