use crate::fill::{forward_fill, forward_then_backward_fill};
use crate::params::VolatilityParams;
use crate::returns::daily_returns;
use chrono::NaiveDate;
use core_types::{CorrelationMatrix, PriceTable, TickerValues, WideTable};

/// Last known price of every ticker.
///
/// A ticker with no observation at all is reported with a missing value.
pub fn latest_prices(prices: &PriceTable) -> TickerValues {
    prices
        .columns()
        .map(|(ticker, column)| {
            let last = forward_fill(column).last().copied().flatten();
            (ticker.to_string(), last)
        })
        .collect()
}

/// Return from the first to the last row dated on or after January 1 of `as_of_year`.
///
/// If the table has no row in that window the result is empty. Otherwise every
/// ticker gets an entry; its column is filled forward, then backward, inside
/// the window before computing `last / first - 1`.
pub fn ytd_return(prices: &PriceTable, as_of_year: i32) -> TickerValues {
    let Some(year_start) = NaiveDate::from_ymd_opt(as_of_year, 1, 1) else {
        tracing::warn!(as_of_year, "Year is outside the supported calendar range.");
        return TickerValues::new();
    };

    let window = prices.filter_rows(|_, date| date >= year_start);
    if window.n_rows() == 0 {
        tracing::debug!(as_of_year, "No rows in the year-to-date window.");
        return TickerValues::new();
    }

    window
        .columns()
        .map(|(ticker, column)| {
            let filled = forward_then_backward_fill(column);
            let value = match (filled.first().copied().flatten(), filled.last().copied().flatten()) {
                (Some(first), Some(last)) => Some(last / first - 1.0),
                _ => None,
            };
            (ticker.to_string(), value)
        })
        .collect()
}

/// Trailing annualized volatility of daily returns, in percent, for every row.
///
/// Each point is the sample standard deviation of the valid returns among the
/// last `window` rows, multiplied by the annualization factor and by 100. A
/// point with fewer than `min_periods` (and never fewer than two) valid returns
/// is missing.
pub fn rolling_volatility_series(prices: &PriceTable, params: &VolatilityParams) -> WideTable {
    let returns = daily_returns(prices);
    let window = params.window();
    let scale = params.annualization_factor() * 100.0;
    let required = params.min_periods().max(2);

    returns.map_columns(|_, column, out| {
        for (t, cell) in out.iter_mut().enumerate() {
            let start = (t + 1).saturating_sub(window);
            let valid: Vec<f64> = column[start..=t].iter().flatten().copied().collect();
            if valid.len() >= required {
                *cell = sample_std(&valid).map(|sd| sd * scale);
            }
        }
    })
}

/// The last row of [`rolling_volatility_series`], one entry per ticker.
pub fn rolling_volatility(prices: &PriceTable, params: &VolatilityParams) -> TickerValues {
    let series = rolling_volatility_series(prices, params);
    let last = series.n_rows().checked_sub(1);

    series
        .columns()
        .map(|(ticker, column)| {
            let value = last.and_then(|i| column[i]);
            (ticker.to_string(), value)
        })
        .collect()
}

/// Pearson correlation of daily returns for every ticker pair.
///
/// Each pair uses only the dates where both returns are defined. Fewer than
/// two such dates, or a flat series, leaves the entry missing. The diagonal is
/// 1.0 for every ticker with at least two valid returns.
pub fn correlation_matrix(prices: &PriceTable) -> CorrelationMatrix {
    let returns = daily_returns(prices);
    let columns: Vec<&[Option<f64>]> = returns.columns().map(|(_, c)| c).collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        let observed = columns[i].iter().filter(|v| v.is_some()).count();
        values[i][i] = (observed >= 2).then_some(1.0);

        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(columns[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix::new(returns.tickers().to_vec(), values)
}

/// Two-pass sample standard deviation. `None` below two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - 1.0)).sqrt())
}

fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() < 2 || xs.len() != ys.len() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn consecutive(n: u32) -> Vec<NaiveDate> {
        (1..=n).map(|day| d(2024, 5, day)).collect()
    }

    #[test]
    fn latest_price_carries_forward_past_trailing_gaps() {
        let prices = PriceTable::new(
            consecutive(3),
            vec!["A".into(), "B".into()],
            vec![vec![Some(1.0), Some(2.0), None], vec![None, None, None]],
        )
        .unwrap();

        let latest = latest_prices(&prices);
        assert_eq!(latest.get("A"), Some(2.0));
        assert!(latest.contains("B"));
        assert_eq!(latest.get("B"), None);
    }

    #[test]
    fn ytd_uses_rows_from_january_first() {
        let prices = PriceTable::single(
            "X",
            vec![d(2023, 12, 29), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)],
            vec![Some(50.0), Some(100.0), None, Some(110.0)],
        )
        .unwrap();

        let ytd = ytd_return(&prices, 2024);
        assert_abs_diff_eq!(ytd.get("X").unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn ytd_without_rows_in_year_is_empty() {
        let prices = PriceTable::single("X", vec![d(2023, 6, 1)], vec![Some(1.0)]).unwrap();
        assert!(ytd_return(&prices, 2024).is_empty());
    }

    #[test]
    fn ytd_late_listing_is_backfilled_within_window() {
        let prices = PriceTable::single(
            "IPO",
            vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)],
            vec![None, Some(20.0), Some(25.0)],
        )
        .unwrap();

        let ytd = ytd_return(&prices, 2024);
        assert_abs_diff_eq!(ytd.get("IPO").unwrap(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn full_window_min_periods_withholds_short_history() {
        let prices = PriceTable::single(
            "X",
            consecutive(4),
            vec![Some(100.0), Some(101.0), Some(99.5), Some(102.0)],
        )
        .unwrap();

        // Three returns inside a five-row window.
        let lenient = VolatilityParams::new(5, 252f64.sqrt()).unwrap();
        assert!(rolling_volatility(&prices, &lenient).get("X").is_some());

        let strict = lenient.with_min_periods(5).unwrap();
        let snapshot = rolling_volatility(&prices, &strict);
        assert!(snapshot.contains("X"));
        assert_eq!(snapshot.get("X"), None);
    }

    #[test]
    fn volatility_of_alternating_returns() {
        // Returns alternate +10% / -10%-ish; check against a direct computation.
        let closes = [100.0, 110.0, 99.0, 108.9, 98.01];
        let prices = PriceTable::single(
            "X",
            consecutive(5),
            closes.iter().map(|c| Some(*c)).collect(),
        )
        .unwrap();
        let params = VolatilityParams::new(3, 1.0).unwrap();

        let vol = rolling_volatility(&prices, &params);
        let tail: Vec<f64> = closes.windows(2).map(|w| w[1] / w[0] - 1.0).skip(1).collect();
        let expected = sample_std(&tail).unwrap() * 100.0;
        assert_abs_diff_eq!(vol.get("X").unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn volatility_needs_enough_valid_returns() {
        let prices = PriceTable::single("X", consecutive(2), vec![Some(1.0), Some(2.0)]).unwrap();
        let vol = rolling_volatility(&prices, &VolatilityParams::default());
        assert!(vol.contains("X"));
        assert_eq!(vol.get("X"), None);

        let series = rolling_volatility_series(&prices, &VolatilityParams::default());
        assert_eq!(series.column("X").unwrap(), &[None]);
    }

    #[test]
    fn min_periods_is_honoured() {
        let prices = PriceTable::single(
            "X",
            consecutive(4),
            vec![Some(10.0), Some(11.0), Some(10.5), Some(10.8)],
        )
        .unwrap();
        let strict = VolatilityParams::new(3, 1.0).unwrap().with_min_periods(3).unwrap();
        let series = rolling_volatility_series(&prices, &strict);

        assert_eq!(series.value(0, "X"), None);
        assert_eq!(series.value(1, "X"), None);
        assert!(series.value(2, "X").is_some());
    }

    #[test]
    fn perfectly_correlated_and_anti_correlated_pairs() {
        let up = [Some(100.0), Some(101.0), Some(99.0), Some(103.0), Some(104.0)];
        let double: Vec<Option<f64>> = up.iter().map(|p| p.map(|p| p * 2.0)).collect();
        let inverse: Vec<Option<f64>> = up.iter().map(|p| p.map(|p| 10_000.0 / p)).collect();
        let prices = PriceTable::new(
            consecutive(5),
            vec!["A".into(), "B".into(), "C".into()],
            vec![up.to_vec(), double, inverse],
        )
        .unwrap();

        let m = correlation_matrix(&prices);
        assert_abs_diff_eq!(m.get("A", "B").unwrap(), 1.0, epsilon = 1e-9);
        assert!(m.get("A", "C").unwrap() < -0.99);
        assert_eq!(m.get("A", "C"), m.get("C", "A"));
        assert_eq!(m.get("C", "C"), Some(1.0));
    }

    #[test]
    fn flat_series_has_undefined_off_diagonal_correlation() {
        let prices = PriceTable::new(
            consecutive(4),
            vec!["FLAT".into(), "MOVE".into()],
            vec![vec![Some(5.0); 4], vec![Some(1.0), Some(2.0), Some(1.5), Some(1.7)]],
        )
        .unwrap();

        let m = correlation_matrix(&prices);
        assert_eq!(m.get("FLAT", "MOVE"), None);
        assert_eq!(m.get("FLAT", "FLAT"), Some(1.0));
    }
}
