use crate::fill::forward_then_backward_fill;
use core_types::{CumulativeReturnSeries, PriceTable, ReturnSeries};

/// Daily simple returns, `price[t] / price[t-1] - 1`, per ticker.
///
/// Computed on the raw series: a missing price at `t` or `t-1` gives a missing
/// return at `t`. The first date is never part of the output, and a date
/// where every ticker's return is missing is dropped. Fewer than two rows give
/// an empty series with the same columns.
pub fn daily_returns(prices: &PriceTable) -> ReturnSeries {
    if prices.n_rows() < 2 {
        return prices.filter_rows(|_, _| false).into_inner();
    }

    let returns = prices.map_columns(|_, column, out| {
        for (t, w) in column.windows(2).enumerate() {
            if let (Some(prev), Some(curr)) = (w[0], w[1]) {
                out[t + 1] = Some(curr / prev - 1.0);
            }
        }
    });

    let keep: Vec<bool> = (0..returns.n_rows())
        .map(|i| i > 0 && returns.row(i).iter().any(Option::is_some))
        .collect();
    let returns = returns.filter_rows(|i, _| keep[i]);

    tracing::debug!(
        input_rows = prices.n_rows(),
        output_rows = returns.n_rows(),
        "Computed daily returns."
    );
    returns
}

/// Cumulative return of every ticker relative to the first row.
///
/// Each column is forward-filled and then backward-filled before dividing by
/// its first value, so row 0 is exactly `0.0` for every ticker with at least one
/// observation. A ticker with no observation stays entirely missing.
pub fn cumulative_returns(prices: &PriceTable) -> CumulativeReturnSeries {
    prices.map_columns(|ticker, column, out| {
        let filled = forward_then_backward_fill(column);
        match filled.first().copied().flatten() {
            Some(base) => {
                for (cell, price) in out.iter_mut().zip(&filled) {
                    *cell = price.map(|p| p / base - 1.0);
                }
            }
            None if !column.is_empty() => {
                tracing::warn!(ticker, "No observations in range, cumulative return undefined.");
            }
            None => {}
        }
    })
}
