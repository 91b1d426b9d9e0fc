use analytics::{BENCHMARK_LABEL, DashboardReport, DataIssue, Metric};
use api_client::Fundamentals;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde_json::Value;
use std::fmt::Write;

const MISSING: &str = "n/a";

/// Keys shown in the fundamentals snapshot, with their display labels.
const SNAPSHOT_FIELDS: [(&str, &str); 8] = [
    ("longName", "Name"),
    ("sector", "Sector"),
    ("industry", "Industry"),
    ("marketCap", "Market cap"),
    ("beta", "Beta"),
    ("trailingPE", "Trailing P/E"),
    ("forwardPE", "Forward P/E"),
    ("dividendYield", "Dividend yield"),
];

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number(value: Option<f64>, decimals: usize) -> Cell {
    let text = match value {
        Some(v) => format!("{v:.decimals$}"),
        None => MISSING.to_string(),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Renders the snapshot, correlation, benchmark and data-issue sections.
pub fn render_report(report: &DashboardReport) -> String {
    let mut out = String::new();

    let mut snapshot = new_table(vec![
        "Ticker".into(),
        "Price ($)".into(),
        format!("YTD {} %", report.as_of_year),
        "Ann. Vol %".into(),
        "Cumulative %".into(),
    ]);
    let last_row = report.cumulative_returns.n_rows().checked_sub(1);
    for ticker in &report.tickers {
        let cumulative = last_row.and_then(|i| report.cumulative_returns.value(i, ticker));
        snapshot.add_row(vec![
            Cell::new(ticker),
            number(report.latest_prices.get(ticker), 2),
            number(report.ytd_returns.get(ticker).map(|r| r * 100.0), 2),
            number(report.volatility.get(ticker), 2),
            number(cumulative.map(|r| r * 100.0), 2),
        ]);
    }
    let _ = writeln!(out, "Snapshot\n{snapshot}\n");

    let correlations = &report.correlations;
    if !correlations.is_empty() {
        let mut header = vec![String::new()];
        header.extend(correlations.tickers().iter().cloned());
        let mut table = new_table(header);
        for (ticker, row) in correlations.tickers().iter().zip(correlations.rows()) {
            let mut cells = vec![Cell::new(ticker)];
            cells.extend(row.iter().map(|r| number(*r, 3)));
            table.add_row(cells);
        }
        let _ = writeln!(out, "Return Correlations (Daily)\n{table}\n");
    }

    if let Some(comparison) = &report.benchmark {
        let mut table = new_table(vec!["Series".into(), "Cumulative %".into()]);
        if let Some(i) = comparison.n_rows().checked_sub(1) {
            for ticker in comparison.tickers() {
                table.add_row(vec![
                    Cell::new(ticker),
                    number(comparison.value(i, ticker).map(|r| r * 100.0), 2),
                ]);
            }
            let _ = writeln!(
                out,
                "Benchmark Comparison ({} common days, benchmark shown as \"{BENCHMARK_LABEL}\")\n{table}\n",
                comparison.n_rows()
            );
        } else {
            let _ = writeln!(out, "Benchmark Comparison: no dates in common with the tickers.\n");
        }
    }
    if let Some(error) = &report.benchmark_error {
        let _ = writeln!(out, "Benchmark issue: {error}\n");
    }

    for issue in &report.issues {
        let line = match issue {
            DataIssue::DataUnavailable { ticker } => {
                format!("{ticker}: no price data in the selected range")
            }
            DataIssue::InsufficientHistory { ticker, metric } => {
                let metric = match metric {
                    Metric::RollingVolatility => "rolling volatility",
                    Metric::YtdReturn => "year-to-date return",
                };
                format!("{ticker}: not enough history for {metric}")
            }
        };
        let _ = writeln!(out, "warning: {line}");
    }

    out
}

/// Yahoo wraps numbers as `{"raw": .., "fmt": ..}`; prefer the formatted form.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("fmt")
            .or_else(|| map.get("raw"))
            .map(display_value)
            .unwrap_or_else(|| MISSING.to_string()),
        Value::Null => MISSING.to_string(),
        other => other.to_string(),
    }
}

/// Renders the company snapshot and lists which statements are available.
pub fn render_fundamentals(fundamentals: &Fundamentals) -> String {
    let mut out = String::new();

    let mut table = new_table(vec!["Field".into(), fundamentals.ticker.clone()]);
    for (key, label) in SNAPSHOT_FIELDS {
        let value = fundamentals
            .field(key)
            .map(display_value)
            .unwrap_or_else(|| MISSING.to_string());
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    let _ = writeln!(out, "Snapshot\n{table}\n");

    let statements = [
        ("Income statement", &fundamentals.income_statement),
        ("Balance sheet", &fundamentals.balance_sheet),
        ("Cash flow", &fundamentals.cash_flow),
        ("Earnings", &fundamentals.earnings),
    ];
    for (label, statement) in statements {
        let status = if statement.is_some() { "available" } else { "unavailable" };
        let _ = writeln!(out, "{label}: {status}");
    }

    out
}
