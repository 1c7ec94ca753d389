//! Transient notifications
//!
//! Single-slot notice board: a new notification replaces the previous one
//! and silently expires after its TTL, so there is no dismissal thread.

use std::time::Duration;
use tokio::time::Instant;

pub const SUCCESS_TTL: Duration = Duration::from_secs(3);
pub const INFO_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct NotificationCenter {
    current: Option<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let ttl = match kind {
            NotificationKind::Success => SUCCESS_TTL,
            NotificationKind::Info => INFO_TTL,
        };
        self.current = Some(Notification {
            kind,
            message: message.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// The active notification, if it has not auto-dismissed yet.
    pub fn current(&self) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|notification| Instant::now() < notification.expires_at)
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_success_notification_expires_after_ttl() {
        let mut center = NotificationCenter::new();
        center.push(NotificationKind::Success, "Binance: USDT/KGS updated");

        assert_eq!(
            center.current().unwrap().message,
            "Binance: USDT/KGS updated"
        );

        tokio::time::advance(Duration::from_millis(2_900)).await;
        assert!(center.current().is_some());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_info_notification_uses_shorter_ttl() {
        let mut center = NotificationCenter::new();
        center.push(NotificationKind::Info, "Rates applied");

        tokio::time::advance(Duration::from_millis(2_100)).await;
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notification_replaces_previous() {
        let mut center = NotificationCenter::new();
        center.push(NotificationKind::Success, "first");
        center.push(NotificationKind::Info, "second");

        assert_eq!(center.current().unwrap().message, "second");
    }
}
