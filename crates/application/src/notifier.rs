//! Detached booking notifications
//!
//! Recipients are the client account (looked up by email) and the provider
//! owner. Dispatch runs on its own task and failures only reach the log.

use slotbook_core::{Booking, BookingStatus, NotificationRequest, UserId};
use slotbook_ports::{NotificationDispatcher, UserRepository};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub(crate) enum BookingEvent {
    Created { provider_name: String },
    StatusChanged(BookingStatus),
}

impl BookingEvent {
    fn request_for(&self, recipient: UserId, booking: &Booking) -> NotificationRequest {
        match self {
            BookingEvent::Created { provider_name } => {
                NotificationRequest::booking_created(recipient, booking, provider_name)
            }
            BookingEvent::StatusChanged(status) => {
                NotificationRequest::status_changed(recipient, booking, *status)
            }
        }
    }
}

#[derive(Clone)]
pub(crate) struct BookingNotifier {
    user_repo: Arc<dyn UserRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl BookingNotifier {
    pub(crate) fn new(
        user_repo: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            user_repo,
            dispatcher,
        }
    }

    pub(crate) fn notify_in_background(
        &self,
        booking: Booking,
        owner_id: Option<UserId>,
        event: BookingEvent,
    ) {
        let user_repo = Arc::clone(&self.user_repo);
        let dispatcher = Arc::clone(&self.dispatcher);

        tokio::spawn(async move {
            let client_id = match user_repo.find_by_email(&booking.client_email).await {
                Ok(account) => account.map(|a| a.id),
                Err(e) => {
                    warn!(booking_id = %booking.id, error = %e, "Could not resolve client account");
                    None
                }
            };

            let mut recipients: Vec<UserId> = client_id.into_iter().chain(owner_id).collect();
            recipients.dedup();

            for recipient in recipients {
                let request = event.request_for(recipient, &booking);
                if let Err(e) = dispatcher.notify(request).await {
                    warn!(
                        booking_id = %booking.id,
                        recipient_id = %recipient,
                        error = %e,
                        "Notification dispatch failed"
                    );
                }
            }
        });
    }
}
