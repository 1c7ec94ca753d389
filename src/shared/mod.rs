//! Shared types and errors

pub mod errors;
pub mod types;

pub use errors::{AppError, CalcError, ProviderError, StorageError};
pub use types::{Exchange, Fiat, RefreshInterval, Selectors, Stablecoin, Theme};
