//! # Tickerlens Core Types
//!
//! The Layer 0 data model shared by every other crate in the workspace. It has no
//! knowledge of where prices come from or how results are displayed.
//!
//! - `WideTable`: one row per trading date, one column per ticker, missing cells as `None`.
//! - `PriceTable`: a `WideTable` of closing prices whose cells are validated to be positive.
//! - `LongPriceRow`: the tidy `(date, ticker, close)` form of a price observation.
//! - `TickerValues` / `CorrelationMatrix`: per-ticker snapshots and the pairwise matrix.

pub mod error;
pub mod rows;
pub mod table;
pub mod values;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use rows::LongPriceRow;
pub use table::{CumulativeReturnSeries, PriceTable, ReturnSeries, WideTable};
pub use values::{CorrelationMatrix, TickerValue, TickerValues};
