//! Notification Dispatchers
//!
//! `InMemoryNotificationDispatcher` keeps every delivered notification so
//! tests can inspect them; `TracingNotificationDispatcher` only writes them to
//! the log and is what the server runs with. Neither ever fails on its own.

use async_trait::async_trait;
use slotbook_core::{Notification, NotificationRequest, UserId};
use slotbook_ports::{NotificationDispatcher, NotificationError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Records notifications in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationDispatcher {
    delivered: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delivered(&self) -> Vec<Notification> {
        self.delivered.read().await.clone()
    }

    pub async fn delivered_to(&self, recipient_id: &UserId) -> Vec<Notification> {
        self.delivered
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == *recipient_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationDispatcher for InMemoryNotificationDispatcher {
    async fn notify(
        &self,
        request: NotificationRequest,
    ) -> Result<Notification, NotificationError> {
        let notification = Notification::from(request);
        self.delivered.write().await.push(notification.clone());
        Ok(notification)
    }
}

/// Emits notifications as structured log events
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for TracingNotificationDispatcher {
    async fn notify(
        &self,
        request: NotificationRequest,
    ) -> Result<Notification, NotificationError> {
        let notification = Notification::from(request);
        info!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            kind = notification.kind.as_str(),
            booking_id = ?notification.booking_id,
            message = %notification.message,
            "Notification dispatched"
        );
        Ok(notification)
    }
}
