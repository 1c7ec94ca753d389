//! Error handling for the application

use thiserror::Error;

/// Calculation-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid investment amount: {0}")]
    InvalidInvestment(f64),

    #[error("Invalid buy rate: {0}")]
    InvalidBuyRate(f64),

    #[error("Invalid sell rate: {0}")]
    InvalidSellRate(f64),

    #[error("Fee percent out of range [0, 100): {0}")]
    InvalidFee(f64),
}

/// Market data provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key not configured (set {0})")]
    MissingApiKey(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {0}")]
    Status(u16),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Persistent storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed stored value for key '{0}'")]
    Malformed(String),

    #[error("Serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Calculation error: {0}")]
    CalcError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError::CalcError(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::StorageError(err.to_string())
    }
}
