use analytics::{AnalyticsEngine, AnalyticsParams, DashboardReport, VolatilityParams};
use anyhow::{Context, bail};
use api_client::{FundamentalsSource, PriceSource, YahooClient};
use chrono::{Datelike, Days, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::{AnalyticsOverrides, Config, init_tracing, load_config};
use core_types::PriceTable;
use indicatif::{ProgressBar, ProgressStyle};
use export::ExportFormat;
use std::path::PathBuf;
use std::time::Duration;

mod export;
mod render;

/// The main entry point for the Tickerlens dashboard CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if any
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging).context("Failed to initialize logging")?;

    // Execute the appropriate command
    match cli.command {
        Commands::Report(args) => {
            config.analytics.apply(&args.overrides);
            handle_report(args, &config).await
        }
        Commands::Export(args) => {
            config.analytics.apply(&args.request.overrides);
            handle_export(args, &config).await
        }
        Commands::Fundamentals(args) => handle_fundamentals(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Price charts, cumulative returns, volatility and correlations for a set of tickers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./tickerlens.toml if present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print latest prices, YTD return, volatility, correlations and the benchmark comparison.
    Report(RequestArgs),
    /// Write prices, daily returns and cumulative returns as JSON files.
    Export(ExportArgs),
    /// Show a company's fundamentals snapshot.
    Fundamentals(FundamentalsArgs),
}

#[derive(Args)]
struct RequestArgs {
    /// Comma-separated ticker symbols (e.g., "AAPL,MSFT"). Defaults to the configured set.
    #[arg(long, value_delimiter = ',')]
    tickers: Vec<String>,

    /// Benchmark symbol (e.g., "^GSPC"). Defaults to the configured benchmark.
    #[arg(long, conflicts_with = "no_benchmark")]
    benchmark: Option<String>,

    /// Skip the benchmark comparison.
    #[arg(long)]
    no_benchmark: bool,

    /// The start date (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// The end date, inclusive (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<NaiveDate>,

    #[command(flatten)]
    overrides: AnalyticsOverrides,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Directory receiving the exported files.
    #[arg(long, default_value = "export")]
    out: PathBuf,

    /// File format of the price and return tables (the report is always JSON).
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,
}

#[derive(Args)]
struct FundamentalsArgs {
    /// The ticker to look up (e.g., "AAPL").
    #[arg(long)]
    ticker: String,
}

// ==============================================================================
// Request Resolution
// ==============================================================================

/// A fully resolved dashboard request.
struct Request {
    tickers: Vec<String>,
    benchmark: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
}

impl Request {
    fn resolve(args: &RequestArgs, config: &Config) -> anyhow::Result<Self> {
        let mut tickers = normalize_tickers(&args.tickers);
        if tickers.is_empty() {
            tickers = normalize_tickers(&config.data.tickers);
        }
        if tickers.is_empty() {
            bail!("Select at least one ticker with --tickers or data.tickers in the configuration.");
        }

        let benchmark = if args.no_benchmark {
            None
        } else {
            args.benchmark
                .clone()
                .or_else(|| config.data.benchmark.clone())
                .map(|b| b.trim().to_uppercase())
                .filter(|b| !b.is_empty())
        };

        let end = args.to.unwrap_or_else(|| Local::now().date_naive());
        let start = match args.from {
            Some(from) => from,
            None => end
                .checked_sub_days(Days::new(config.data.lookback_days.unsigned_abs()))
                .context("Lookback reaches before the supported calendar range")?,
        };
        if start >= end {
            bail!("The start date ({start}) must be before the end date ({end}).");
        }

        Ok(Self {
            tickers,
            benchmark,
            start,
            end,
        })
    }
}

/// Upper-cases, trims and de-duplicates symbols into a sorted list.
fn normalize_tickers(raw: &[String]) -> Vec<String> {
    let mut tickers: Vec<String> = raw
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();
    tickers.sort();
    tickers.dedup();
    tickers
}

fn build_engine(config: &Config) -> anyhow::Result<AnalyticsEngine> {
    let a = &config.analytics;
    let volatility = VolatilityParams::new(a.rolling_window, a.annualization_factor)?
        .with_min_periods(a.min_periods)?;
    let as_of_year = a.as_of_year.unwrap_or_else(|| Local::now().year());
    Ok(AnalyticsEngine::new(AnalyticsParams::new(volatility, as_of_year)))
}

/// Downloads prices and the benchmark concurrently.
///
/// Fetch failures are treated as "no data": the prices fall back to an empty
/// table and the benchmark is skipped.
async fn load_prices(
    source: &impl PriceSource,
    request: &Request,
) -> anyhow::Result<(PriceTable, Option<PriceTable>)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.set_message(format!(
        "Fetching {} from {} to {}...",
        request.tickers.join(", "),
        request.start,
        request.end
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let benchmark_tickers: Vec<String> = request.benchmark.iter().cloned().collect();
    let (prices, benchmark) = tokio::join!(
        source.fetch(&request.tickers, request.start, request.end),
        async {
            if benchmark_tickers.is_empty() {
                None
            } else {
                Some(source.fetch(&benchmark_tickers, request.start, request.end).await)
            }
        }
    );

    let prices = match prices {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(error = %e, "Price download failed, continuing without data.");
            PriceTable::empty(request.tickers.clone())?
        }
    };
    let benchmark = match benchmark {
        Some(Ok(table)) => Some(table),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Benchmark download failed, skipping comparison.");
            None
        }
        None => None,
    };

    spinner.finish_with_message(format!("Loaded {} trading days.", prices.n_rows()));
    Ok((prices, benchmark))
}

/// Runs the analytics off the async runtime; the transforms are CPU-bound.
async fn compute_report(
    engine: AnalyticsEngine,
    prices: PriceTable,
    benchmark: Option<PriceTable>,
) -> anyhow::Result<(PriceTable, DashboardReport)> {
    let handle = tokio::task::spawn_blocking(move || {
        let report = engine.calculate(&prices, benchmark.as_ref());
        (prices, report)
    });
    Ok(handle.await?)
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_report(args: RequestArgs, config: &Config) -> anyhow::Result<()> {
    let request = Request::resolve(&args, config)?;
    let engine = build_engine(config)?;
    let client = YahooClient::from_settings(&config.data)?;

    let (prices, benchmark) = load_prices(&client, &request).await?;
    if prices.is_empty() {
        println!("No price data for {} in the selected range.", request.tickers.join(", "));
        return Ok(());
    }

    let (_, report) = compute_report(engine, prices, benchmark).await?;
    println!("Tickers: {}", report.tickers.join(", "));
    println!("Date range: {} -> {}\n", request.start, request.end);
    print!("{}", render::render_report(&report));
    Ok(())
}

async fn handle_export(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let request = Request::resolve(&args.request, config)?;
    let engine = build_engine(config)?;
    let client = YahooClient::from_settings(&config.data)?;

    let (prices, benchmark) = load_prices(&client, &request).await?;
    if prices.is_empty() {
        println!("No price data to export.");
        return Ok(());
    }
    let (prices, report) = compute_report(engine, prices, benchmark).await?;

    export::write_tables(&args.out, args.format, &prices, &report)?;
    println!("Exported {} tickers to {}", prices.n_cols(), args.out.display());
    Ok(())
}

async fn handle_fundamentals(args: FundamentalsArgs, config: &Config) -> anyhow::Result<()> {
    let ticker = args.ticker.trim().to_uppercase();
    let client = YahooClient::from_settings(&config.data)?;

    let fundamentals = client
        .fundamentals(&ticker)
        .await
        .with_context(|| format!("Failed to fetch fundamentals for {ticker}"))?;
    print!("{}", render::render_fundamentals(&fundamentals));
    Ok(())
}
