use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::Notification;
use crate::domain::user::ports::Notifier;
use crate::user::errors::AuthError;

/// Writes notifications to the log instead of delivering them.
///
/// The body carries the login link, so it is only emitted at debug level.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: Notification) -> Result<(), AuthError> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Notification dispatched"
        );
        tracing::debug!(body = %notification.body, "Notification body");
        Ok(())
    }
}

/// Keeps every notification in memory so callers can read them back.
#[derive(Debug, Default)]
pub struct OutboxNotifier {
    sent: RwLock<Vec<Notification>>,
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications sent so far, oldest first.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, notification: Notification) -> Result<(), AuthError> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}
