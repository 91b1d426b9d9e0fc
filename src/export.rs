use analytics::{DashboardReport, to_long};
use anyhow::Context;
use core_types::{PriceTable, WideTable};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// File format of the exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Writes prices (wide and long), daily returns and cumulative returns in
/// `format`, plus the full report as `report.json`.
pub fn write_tables(
    dir: &Path,
    format: ExportFormat,
    prices: &PriceTable,
    report: &DashboardReport,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = |name: &str| dir.join(format!("{name}.{}", format.extension()));

    match format {
        ExportFormat::Json => {
            write_json(&path("prices"), prices)?;
            write_json(&path("prices_long"), &to_long(prices))?;
            write_json(&path("daily_returns"), &report.daily_returns)?;
            write_json(&path("cumulative_returns"), &report.cumulative_returns)?;
        }
        ExportFormat::Csv => {
            write_wide_csv(&path("prices"), prices)?;
            write_long_csv(&path("prices_long"), prices)?;
            write_wide_csv(&path("daily_returns"), &report.daily_returns)?;
            write_wide_csv(&path("cumulative_returns"), &report.cumulative_returns)?;
        }
    }
    write_json(&dir.join("report.json"), report)?;

    tracing::info!(dir = %dir.display(), ?format, "Export complete.");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// One row per date, one column per ticker; missing cells are left blank.
fn write_wide_csv(path: &Path, table: &WideTable) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["date".to_string()];
    header.extend(table.tickers().iter().cloned());
    writer.write_record(&header)?;

    for (i, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        record.extend(
            table
                .row(i)
                .into_iter()
                .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_long_csv(path: &Path, prices: &PriceTable) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for row in to_long(prices) {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
