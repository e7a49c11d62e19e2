//! Shared wiring for the service tests in this crate.

use chrono::{NaiveDate, Utc};
use greenfield_catalog::memory::{InMemorySlotRepository, InMemoryTurfRepository};
use greenfield_catalog::repository::TurfRepository;
use greenfield_catalog::turf::seed_turfs;
use greenfield_catalog::{SlotGeneration, SlotRegistry, TurfCatalog};
use greenfield_core::events::EventSink;
use greenfield_core::memory::InMemoryAccountRepository;
use greenfield_core::payment::SignedCheckoutGateway;
use greenfield_core::repository::AccountRepository;
use greenfield_core::{Account, Role};
use greenfield_shared::models::DomainEvent;
use std::sync::{Arc, Mutex};

use crate::memory::{InMemoryBookingRepository, InMemoryPaymentRepository};
use crate::{AdminAggregator, BookingLedger, PaymentTracker};

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "test_secret";

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    pub fn topics(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .map(|events| events.iter().map(DomainEvent::topic).collect())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn publish(&self, event: DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

pub struct Fixture {
    pub today: NaiveDate,
    pub registry: Arc<SlotRegistry>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub ledger: BookingLedger,
    pub tracker: PaymentTracker,
    pub aggregator: AdminAggregator,
    pub sink: Arc<RecordingSink>,
}

pub fn user(email: &str) -> Account {
    Account::new("Test User".into(), email.into(), "9876543210".into(), "pw1234", Role::User)
}

pub fn admin() -> Account {
    Account::new("Admin User".into(), "admin@greenfield.com".into(), "9999999999".into(), "admin123", Role::Admin)
}

/// Seeded turfs with two days of slots, a configured gateway and empty ledgers.
pub async fn fixture() -> Fixture {
    fixture_with_gateway(SignedCheckoutGateway::from_parts(
        Some(KEY_ID.to_string()),
        Some(KEY_SECRET.to_string()),
    ))
    .await
}

pub async fn fixture_with_gateway(gateway: SignedCheckoutGateway) -> Fixture {
    let today = Utc::now().date_naive();
    let turfs: Arc<dyn TurfRepository> = Arc::new(InMemoryTurfRepository::new());
    let registry = Arc::new(SlotRegistry::new(Arc::new(InMemorySlotRepository::new())));
    let catalog = TurfCatalog::new(
        turfs.clone(),
        registry.clone(),
        SlotGeneration { horizon_days: 2, prebooked_ratio: 0.0 },
    );
    catalog.load(seed_turfs(), today).await.unwrap();

    let accounts = Arc::new(InMemoryAccountRepository::new());
    let sink = Arc::new(RecordingSink::default());
    let bookings = Arc::new(InMemoryBookingRepository::new());

    let ledger = BookingLedger::new(bookings.clone(), turfs.clone(), registry.clone(), sink.clone());
    let tracker = PaymentTracker::new(
        Arc::new(InMemoryPaymentRepository::new()),
        bookings.clone(),
        Arc::new(gateway),
        sink.clone(),
        "INR".to_string(),
    );
    let aggregator = AdminAggregator::new(bookings, turfs, accounts.clone() as Arc<dyn AccountRepository>);

    Fixture { today, registry, accounts, ledger, tracker, aggregator, sink }
}
