use crate::error::AlignmentError;
use crate::returns::cumulative_returns;
use core_types::{CumulativeReturnSeries, PriceTable};
use std::cmp::Ordering;

/// Column label given to the benchmark series after alignment.
pub const BENCHMARK_LABEL: &str = "Benchmark";

/// Inner-joins a single-series benchmark onto a price table by date.
///
/// Only dates present in both tables survive. The benchmark column is
/// relabelled [`BENCHMARK_LABEL`] and appended after the tickers.
pub fn align_benchmark(
    prices: &PriceTable,
    benchmark: &PriceTable,
) -> Result<PriceTable, AlignmentError> {
    let benchmark_column = match benchmark.n_cols() {
        0 => return Err(AlignmentError::NoSeries),
        1 => benchmark.columns().map(|(_, c)| c).next().unwrap_or_default(),
        n => return Err(AlignmentError::MultipleSeries(n)),
    };
    if benchmark.n_rows() == 0 {
        return Err(AlignmentError::EmptyBenchmark);
    }
    if prices.position(BENCHMARK_LABEL).is_some() {
        return Err(AlignmentError::LabelCollision(BENCHMARK_LABEL.to_string()));
    }

    // Both indexes are strictly increasing, so a merge walk finds the overlap.
    let (mut left, mut right) = (Vec::new(), Vec::new());
    let (mut i, mut j) = (0, 0);
    while i < prices.n_rows() && j < benchmark.n_rows() {
        match prices.dates()[i].cmp(&benchmark.dates()[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                left.push(i);
                right.push(j);
                i += 1;
                j += 1;
            }
        }
    }

    let dates = left.iter().map(|&i| prices.dates()[i]).collect();
    let mut tickers = prices.tickers().to_vec();
    tickers.push(BENCHMARK_LABEL.to_string());
    let mut columns: Vec<Vec<Option<f64>>> = prices
        .columns()
        .map(|(_, c)| left.iter().map(|&i| c[i]).collect())
        .collect();
    columns.push(right.iter().map(|&j| benchmark_column[j]).collect());

    tracing::debug!(
        tickers = prices.n_cols(),
        price_rows = prices.n_rows(),
        benchmark_rows = benchmark.n_rows(),
        joined_rows = left.len(),
        "Aligned benchmark on common dates."
    );

    Ok(PriceTable::new(dates, tickers, columns)?)
}

/// Cumulative returns of the tickers and the benchmark on their common dates.
pub fn benchmark_comparison(
    prices: &PriceTable,
    benchmark: &PriceTable,
) -> Result<CumulativeReturnSeries, AlignmentError> {
    let aligned = align_benchmark(prices, benchmark)?;
    Ok(cumulative_returns(&aligned))
}
