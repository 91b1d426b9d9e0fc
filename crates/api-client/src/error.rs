use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request to the quote API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The quote API returned an error [{code}]: {description}")]
    Api { code: String, description: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Could not assemble the price table: {0}")]
    Table(#[from] CoreError),
}
