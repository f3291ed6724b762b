use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid tree data: {0}")]
    InvalidTree(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    // Errors from helpers that report through anyhow.
    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ShapeError>;
