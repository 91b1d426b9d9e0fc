//! # Tickerlens Analytics Engine
//!
//! This crate turns a wide table of daily closing prices into the derived tables a
//! dashboard shows: tidy rows, daily and cumulative returns, rolling volatility,
//! year-to-date return, latest prices, correlations and a benchmark comparison.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** Every transform is a pure function of an immutable
//!   `PriceTable`. Nothing is cached or mutated, so independent transforms can run on
//!   separate threads without synchronization.
//! - **Partial Results:** A ticker without data yields missing cells, never an error
//!   for the whole batch.
//!
//! ## Public API
//!
//! - `reshape`, `returns`, `stats`, `benchmark`: the individual transforms.
//! - `AnalyticsEngine`: runs every transform for one request.
//! - `DashboardReport`: the standardized struct holding all results.
//! - `AnalyticsError` / `AlignmentError`: the specific error types of this crate.

// Declare the modules that constitute this crate.
pub mod benchmark;
pub mod engine;
pub mod error;
pub mod fill;
pub mod params;
pub mod report;
pub mod reshape;
pub mod returns;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use benchmark::{BENCHMARK_LABEL, align_benchmark, benchmark_comparison};
pub use engine::AnalyticsEngine;
pub use error::{AlignmentError, AnalyticsError};
pub use params::{AnalyticsParams, VolatilityParams};
pub use report::{DashboardReport, DataIssue, Metric};
pub use reshape::{to_long, to_wide};
pub use returns::{cumulative_returns, daily_returns};
pub use stats::{correlation_matrix, latest_prices, rolling_volatility, rolling_volatility_series, ytd_return};
