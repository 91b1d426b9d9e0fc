use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid analytics parameter: {0}")]
    InvalidParameter(String),

    #[error("Benchmark alignment failed: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("Table construction failed: {0}")]
    Core(#[from] CoreError),
}

/// Why a benchmark table could not be joined onto a price table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignmentError {
    #[error("benchmark table has no rows")]
    EmptyBenchmark,

    #[error("benchmark table has no price column")]
    NoSeries,

    #[error("benchmark must resolve to exactly one price series, found {0}")]
    MultipleSeries(usize),

    #[error("ticker '{0}' collides with the benchmark label")]
    LabelCollision(String),

    #[error(transparent)]
    Table(#[from] CoreError),
}
