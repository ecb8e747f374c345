//! Notification Dispatcher Port
//!
//! Dispatch is best effort. Callers log failures and carry on; nothing in the
//! booking flow waits on or branches on the outcome.

use async_trait::async_trait;
use slotbook_core::{Notification, NotificationRequest};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Notification channel unavailable: {0}")]
    Unavailable(String),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn notify(&self, request: NotificationRequest)
    -> Result<Notification, NotificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_error_display() {
        let unavailable = NotificationError::Unavailable("smtp down".to_string());
        let rejected = NotificationError::Rejected("unknown recipient".to_string());

        assert!(unavailable.to_string().contains("unavailable"));
        assert!(rejected.to_string().contains("unknown recipient"));
    }
}
