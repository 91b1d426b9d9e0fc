use analytics::{
    AlignmentError, VolatilityParams, align_benchmark, correlation_matrix, cumulative_returns,
    daily_returns, latest_prices, rolling_volatility, rolling_volatility_series, to_long, to_wide,
};
use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use core_types::PriceTable;

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, n).unwrap()
}

fn days(n: u32) -> Vec<NaiveDate> {
    (1..=n).map(day).collect()
}

fn some(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// A mixed table with leading, interior and trailing gaps plus an empty column.
fn gappy_table() -> PriceTable {
    PriceTable::new(
        days(8),
        vec!["AAA".into(), "BBB".into(), "CCC".into(), "NIL".into()],
        vec![
            vec![Some(10.0), Some(10.5), None, Some(10.2), Some(10.9), Some(11.4), Some(11.0), Some(11.8)],
            vec![None, None, Some(50.0), Some(49.0), Some(51.5), None, Some(52.0), Some(53.0)],
            vec![Some(7.0), Some(7.1), Some(7.05), Some(7.3), Some(7.2), Some(7.4), None, None],
            vec![None; 8],
        ],
    )
    .unwrap()
}

#[test]
fn scenario_a_single_ticker_returns() {
    let prices = PriceTable::single("X", days(5), some(&[100.0, 102.0, 101.0, 103.0, 104.0])).unwrap();

    let returns = daily_returns(&prices);
    assert_eq!(returns.dates(), &days(5)[1..]);
    let x = returns.column("X").unwrap();
    assert_abs_diff_eq!(x[0].unwrap(), 0.02, epsilon = 1e-12);
    assert_abs_diff_eq!(x[1].unwrap(), -0.0098, epsilon = 1e-4);
    assert_abs_diff_eq!(x[2].unwrap(), 0.0198, epsilon = 1e-4);
    assert_abs_diff_eq!(x[3].unwrap(), 0.0097, epsilon = 1e-4);

    let cum = cumulative_returns(&prices);
    assert_eq!(cum.value(0, "X"), Some(0.0));
    assert_abs_diff_eq!(cum.value(4, "X").unwrap(), 0.04, epsilon = 1e-12);
}

#[test]
fn scenario_b_interior_gap_is_forward_filled() {
    let prices = PriceTable::single("Y", days(4), vec![Some(100.0), None, None, Some(106.0)]).unwrap();

    let cum = cumulative_returns(&prices);
    let y = cum.column("Y").unwrap();
    assert_eq!(&y[..3], &[Some(0.0), Some(0.0), Some(0.0)]);
    assert_abs_diff_eq!(y[3].unwrap(), 0.06, epsilon = 1e-12);
}

#[test]
fn scenario_c_two_column_benchmark_is_rejected() {
    let prices = PriceTable::single("X", days(3), some(&[1.0, 2.0, 3.0])).unwrap();
    let bench = PriceTable::new(
        days(3),
        vec!["^GSPC".into(), "^IXIC".into()],
        vec![some(&[1.0, 1.0, 1.0]), some(&[2.0, 2.0, 2.0])],
    )
    .unwrap();

    assert_eq!(
        align_benchmark(&prices, &bench),
        Err(AlignmentError::MultipleSeries(2))
    );
}

#[test]
fn scenario_d_ticker_without_rows_is_reported_missing() {
    let prices = gappy_table();
    let latest = latest_prices(&prices);

    assert!(latest.contains("NIL"));
    assert_eq!(latest.get("NIL"), None);
    assert_eq!(latest.get("AAA"), Some(11.8));
    assert_eq!(latest.get("BBB"), Some(53.0));
    assert_eq!(latest.get("CCC"), Some(7.4));
}

#[test]
fn scenario_e_disjoint_trading_days_have_undefined_correlation() {
    // Alternating days: neither ticker has two consecutive quotes.
    let alternating = PriceTable::new(
        days(6),
        vec!["X".into(), "Y".into()],
        vec![
            vec![Some(1.0), None, Some(1.1), None, Some(1.2), None],
            vec![None, Some(2.0), None, Some(2.1), None, Some(2.3)],
        ],
    )
    .unwrap();
    assert_eq!(correlation_matrix(&alternating).get("X", "Y"), None);

    // Back-to-back listings: each ticker has returns, but never on the same day.
    let sequential = PriceTable::new(
        days(8),
        vec!["X".into(), "Y".into()],
        vec![
            vec![Some(1.0), Some(1.1), Some(1.05), Some(1.2), None, None, None, None],
            vec![None, None, None, None, Some(2.0), Some(2.2), Some(2.1), Some(2.4)],
        ],
    )
    .unwrap();
    let m = correlation_matrix(&sequential);
    assert_eq!(m.get("X", "Y"), None);
    assert_eq!(m.get("Y", "X"), None);
    assert_eq!(m.get("X", "X"), Some(1.0));
    assert_eq!(m.get("Y", "Y"), Some(1.0));
}

#[test]
fn long_then_wide_restores_every_observation() {
    let prices = gappy_table();
    let rebuilt = to_wide(to_long(&prices), prices.tickers().to_vec()).unwrap();

    assert_eq!(rebuilt.tickers(), prices.tickers());
    for (row, date) in prices.dates().iter().enumerate() {
        for ticker in prices.tickers() {
            if let Some(price) = prices.value(row, ticker) {
                let rebuilt_row = rebuilt.dates().iter().position(|d| d == date).unwrap();
                assert_eq!(rebuilt.value(rebuilt_row, ticker), Some(price));
            }
        }
    }
    let observed = |t: &PriceTable| t.tickers().iter().map(|k| t.observation_count(k)).sum::<usize>();
    assert_eq!(observed(&rebuilt), observed(&prices));
}

#[test]
fn cumulative_row_zero_is_exactly_zero() {
    let prices = gappy_table();
    let cum = cumulative_returns(&prices);

    for ticker in ["AAA", "BBB", "CCC"] {
        assert_eq!(cum.value(0, ticker), Some(0.0), "{ticker}");
        assert!(cum.column(ticker).unwrap().iter().all(Option::is_some));
    }
    assert!(cum.column("NIL").unwrap().iter().all(Option::is_none));
}

#[test]
fn daily_returns_never_outgrow_the_input() {
    let prices = gappy_table();
    for n in 0..=prices.n_rows() {
        let head = prices.filter_rows(|i, _| i < n);
        let returns = daily_returns(&head);
        assert!(returns.n_rows() <= n.saturating_sub(1));
    }
}

#[test]
fn correlation_is_symmetric_with_unit_diagonal() {
    let prices = gappy_table();
    let m = correlation_matrix(&prices);

    for a in prices.tickers() {
        for b in prices.tickers() {
            assert_eq!(m.get(a, b), m.get(b, a));
            if let Some(r) = m.get(a, b) {
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
    assert_eq!(m.get("AAA", "AAA"), Some(1.0));
    assert_eq!(m.get("BBB", "BBB"), Some(1.0));
    assert_eq!(m.get("NIL", "NIL"), None);
}

#[test]
fn volatility_is_never_negative() {
    let prices = gappy_table();
    let params = VolatilityParams::new(3, 252f64.sqrt()).unwrap();

    let series = rolling_volatility_series(&prices, &params);
    for (_, column) in series.columns() {
        assert!(column.iter().flatten().all(|v| *v >= 0.0));
    }

    let snapshot = rolling_volatility(&prices, &params);
    assert_eq!(snapshot.len(), 4);
    assert!(snapshot.get("AAA").unwrap() > 0.0);
    assert_eq!(snapshot.get("NIL"), None);
}

#[test]
fn empty_input_gives_empty_outputs() {
    let prices = PriceTable::empty(vec!["X".into()]).unwrap();

    assert!(to_long(&prices).is_empty());
    assert_eq!(daily_returns(&prices).n_rows(), 0);
    assert_eq!(cumulative_returns(&prices).n_rows(), 0);
    assert_eq!(latest_prices(&prices).get("X"), None);
    assert_eq!(rolling_volatility(&prices, &VolatilityParams::default()).get("X"), None);
    assert_eq!(correlation_matrix(&prices).get("X", "X"), None);
}
