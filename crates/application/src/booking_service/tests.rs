use super::*;
use async_trait::async_trait;
use slotbook_adapters::{
    InMemoryBookingRepository, InMemoryNotificationDispatcher, InMemoryProviderRepository,
    InMemoryUserRepository,
};
use slotbook_core::{
    NewProvider, NewUser, Notification, NotificationKind, NotificationRequest, UserAccount, UserId,
};
use slotbook_ports::NotificationError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Fixture {
    service: Arc<BookingService>,
    providers: Arc<InMemoryProviderRepository>,
    users: Arc<InMemoryUserRepository>,
    dispatcher: InMemoryNotificationDispatcher,
}

impl Fixture {
    fn new() -> Self {
        let providers = Arc::new(InMemoryProviderRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let dispatcher = InMemoryNotificationDispatcher::new();
        let service = Arc::new(BookingService::new(
            Arc::new(InMemoryBookingRepository::new()),
            providers.clone(),
            users.clone(),
            Arc::new(dispatcher.clone()),
        ));
        Self {
            service,
            providers,
            users,
            dispatcher,
        }
    }

    async fn provider(&self, slots: &[&str], owner_id: Option<UserId>) -> Provider {
        let provider = NewProvider {
            name: Some("Dr. A".into()),
            category: Some("Medical".into()),
            slots: Some(slots.iter().map(|s| s.to_string()).collect()),
            owner_id,
            ..Default::default()
        }
        .into_provider()
        .unwrap();
        self.providers.save_provider(&provider).await.unwrap();
        provider
    }

    async fn user(&self, name: &str, email: &str) -> UserAccount {
        let account = NewUser {
            name: Some(name.into()),
            email: Some(email.into()),
            role: None,
        }
        .into_account()
        .unwrap();
        self.users.create_user(&account).await.unwrap();
        account
    }

    /// Waits until `count` notifications were delivered; dispatch runs detached.
    async fn delivered(&self, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            let delivered = self.dispatcher.delivered().await;
            if delivered.len() >= count {
                return delivered;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.dispatcher.delivered().await
    }
}

fn request(provider_id: impl ToString, date: &str, slot: &str) -> BookingRequest {
    BookingRequest {
        provider_id: Some(provider_id.to_string()),
        service_type: Some("Medical".into()),
        date: Some(date.into()),
        slot: Some(slot.into()),
        client_name: Some("Jane".into()),
        client_email: Some("jane@x.com".into()),
        client_phone: None,
        description: None,
    }
}

async fn all_bookings(service: &BookingService) -> Vec<BookingView> {
    service.list_bookings(&BookingFilter::default()).await.unwrap()
}

#[tokio::test]
async fn test_book_cancel_rebook_flow() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;

    let first = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();
    assert_eq!(first.status, BookingStatus::Pending);

    let err = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::Conflict("slot already booked".into()));

    let cancelled = fx
        .service
        .update_status(&first.id.to_string(), "cancelled")
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let second = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(second.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_missing_fields_create_nothing() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;

    let mut incomplete = request(p1.id, "2024-06-01", "10:00");
    incomplete.client_email = None;
    incomplete.slot = Some("   ".into());

    let err = fx.service.create_booking(incomplete).await.unwrap_err();
    assert_eq!(
        err,
        DomainError::Validation("missing required fields: slot, clientEmail".into())
    );
    assert!(all_bookings(&fx.service).await.is_empty());
}

#[tokio::test]
async fn test_unknown_provider_creates_nothing() {
    let fx = Fixture::new();

    for provider_ref in [ProviderId::new().to_string(), "not-a-uuid".to_string()] {
        let err = fx
            .service
            .create_booking(request(provider_ref, "2024-06-01", "10:00"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("provider not found".into()));
    }
    assert!(all_bookings(&fx.service).await.is_empty());
}

#[tokio::test]
async fn test_slot_must_be_offered_when_provider_declares_slots() {
    let fx = Fixture::new();
    let p1 = fx.provider(&["09:00", "10:00"], None).await;

    let err = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "18:00"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    fx.service
        .create_booking(request(p1.id, "2024-06-01", "09:00"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;
    let created = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();

    let once = fx.service.get_booking(&created.id.to_string()).await.unwrap();
    let twice = fx.service.get_booking(&created.id.to_string()).await.unwrap();
    assert_eq!(once, twice);
    assert_eq!(once, created);

    assert!(fx.service.get_booking("garbage").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_status_machine_is_enforced() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;
    let booking = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();
    let id = booking.id.to_string();

    let err = fx.service.update_status(&id, "done").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = fx.service.update_status(&id, "completed").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition { .. }));
    assert_eq!(err.kind(), "validation_error");

    let confirmed = fx.service.update_status(&id, "Confirmed").await.unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let same = fx.service.update_status(&id, "confirmed").await.unwrap();
    assert_eq!(same.status, BookingStatus::Confirmed);

    fx.service.update_status(&id, "completed").await.unwrap();
    let err = fx.service.update_status(&id, "cancelled").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidStateTransition { .. }));

    let missing = BookingId::new().to_string();
    assert!(
        fx.service
            .update_status(&missing, "confirmed")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn test_lists_are_sorted_and_carry_provider_summary() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;
    for (date, slot) in [
        ("2024-06-02", "09:00"),
        ("2024-06-01", "14:00"),
        ("2024-06-01", "08:00"),
    ] {
        fx.service
            .create_booking(request(p1.id, date, slot))
            .await
            .unwrap();
    }

    let by_provider = fx.service.list_by_provider(&p1.id.to_string()).await.unwrap();
    let order: Vec<_> = by_provider
        .iter()
        .map(|b| (b.date.to_string(), b.slot.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("2024-06-01".to_string(), "08:00".to_string()),
            ("2024-06-01".to_string(), "14:00".to_string()),
            ("2024-06-02".to_string(), "09:00".to_string()),
        ]
    );

    assert_eq!(fx.service.list_by_client("JANE@X.COM").await.unwrap().len(), 3);
    assert!(fx.service.list_by_provider("garbage").await.unwrap().is_empty());

    let views = all_bookings(&fx.service).await;
    assert_eq!(views.len(), 3);
    assert!(views.iter().all(|v| v.provider == Some(p1.summary())));

    fx.providers.delete_provider(&p1.id).await.unwrap();
    let orphaned = all_bookings(&fx.service).await;
    assert!(orphaned.iter().all(|v| v.provider.is_none()));
}

#[tokio::test]
async fn test_delete_booking_frees_slot() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;
    let booking = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();

    let deleted = fx.service.delete_booking(&booking.id.to_string()).await.unwrap();
    assert_eq!(deleted, booking.id);
    assert!(
        fx.service
            .delete_booking(&booking.id.to_string())
            .await
            .unwrap_err()
            .is_not_found()
    );

    fx.service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_for_one_slot() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;

    let attempts = (0..32).map(|_| {
        let service = Arc::clone(&fx.service);
        let request = request(p1.id, "2024-06-01", "10:00");
        tokio::spawn(async move { service.create_booking(request).await })
    });
    let results = futures::future::join_all(attempts).await;

    let mut created = 0;
    for joined in results {
        match joined.expect("task panicked") {
            Ok(_) => created += 1,
            Err(e) => assert!(e.is_conflict(), "unexpected error: {e}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(all_bookings(&fx.service).await.len(), 1);
}

#[tokio::test]
async fn test_client_and_owner_are_notified() {
    let fx = Fixture::new();
    let jane = fx.user("Jane", "Jane@X.com").await;
    let owner = fx.user("Dr. A", "dr.a@clinic.com").await;
    let p1 = fx.provider(&[], Some(owner.id)).await;

    let booking = fx
        .service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();

    let created = fx.delivered(2).await;
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|n| n.kind == NotificationKind::BookingCreated));
    assert!(created.iter().all(|n| n.booking_id == Some(booking.id)));
    assert!(created.iter().any(|n| n.recipient_id == jane.id));
    assert!(created.iter().any(|n| n.recipient_id == owner.id));

    fx.service
        .update_status(&booking.id.to_string(), "confirmed")
        .await
        .unwrap();
    let all = fx.delivered(4).await;
    let changed: Vec<_> = all
        .iter()
        .filter(|n| n.kind == NotificationKind::BookingStatusChanged)
        .collect();
    assert_eq!(changed.len(), 2);
    assert!(changed.iter().all(|n| n.message.contains("confirmed")));

    // Re-applying the same status notifies nobody
    fx.service
        .update_status(&booking.id.to_string(), "confirmed")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(fx.dispatcher.delivered().await.len(), 4);
}

#[tokio::test]
async fn test_unknown_recipients_are_skipped() {
    let fx = Fixture::new();
    let p1 = fx.provider(&[], None).await;

    fx.service
        .create_booking(request(p1.id, "2024-06-01", "10:00"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(fx.dispatcher.delivered().await.is_empty());
}

struct FailingDispatcher {
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl NotificationDispatcher for FailingDispatcher {
    async fn notify(
        &self,
        _request: NotificationRequest,
    ) -> std::result::Result<Notification, NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotificationError::Unavailable("inbox offline".into()))
    }
}

#[tokio::test]
async fn test_failing_dispatcher_does_not_fail_booking() {
    let providers = Arc::new(InMemoryProviderRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let attempts = Arc::new(AtomicUsize::new(0));
    let service = BookingService::new(
        Arc::new(InMemoryBookingRepository::new()),
        providers.clone(),
        users.clone(),
        Arc::new(FailingDispatcher {
            attempts: attempts.clone(),
        }),
    );

    let jane = NewUser {
        name: Some("Jane".into()),
        email: Some("jane@x.com".into()),
        role: None,
    }
    .into_account()
    .unwrap();
    users.create_user(&jane).await.unwrap();
    let provider = NewProvider {
        name: Some("Dr. A".into()),
        category: Some("Medical".into()),
        ..Default::default()
    }
    .into_provider()
    .unwrap();
    providers.save_provider(&provider).await.unwrap();

    let booking = service
        .create_booking(request(provider.id, "2024-06-01", "10:00"))
        .await
        .unwrap();
    service
        .update_status(&booking.id.to_string(), "cancelled")
        .await
        .unwrap();

    for _ in 0..100 {
        if attempts.load(Ordering::SeqCst) >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
