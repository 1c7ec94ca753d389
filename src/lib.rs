//! Peerspread - P2P currency arbitrage calculator
//! Calculation core, bounded history, and a polling layer over an
//! AI-backed market data provider

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use app::AppContext;
pub use application::calculator::CalculatorSession;
pub use application::history::HistoryStore;
pub use application::poller::PollingController;
pub use domain::calc::{compute, CalculationResult};
pub use infrastructure::provider::{FallbackProvider, GeminiProvider, MarketDataProvider};
