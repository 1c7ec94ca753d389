//! Application layer - sessions, history, polling, and CLI handlers

pub mod calculator;
pub mod commands;
pub mod history;
pub mod notifications;
pub mod poller;

pub use calculator::CalculatorSession;
pub use history::{HistoryEntry, HistoryStore, HISTORY_CAPACITY};
pub use notifications::{Notification, NotificationCenter, NotificationKind};
pub use poller::{PollingController, RefreshKind, RefreshOutcome, RefreshState};
