use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use greenfield_booking::{AdminAggregator, BookingLedger, PaymentTracker};
use greenfield_catalog::{SlotGeneration, SlotRegistry, TurfCatalog};
use greenfield_core::credentials::CredentialStore;
use greenfield_core::identity::SessionPolicy;
use greenfield_core::payment::SignedCheckoutGateway;
use greenfield_core::CoreResult;
use greenfield_store::{seed, Config, Database, EventBus};

#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub catalog: Arc<TurfCatalog>,
    pub registry: Arc<SlotRegistry>,
    pub ledger: Arc<BookingLedger>,
    pub payments: Arc<PaymentTracker>,
    pub admin: Arc<AdminAggregator>,
    pub events: EventBus,
    pub ping_message: String,
}

impl AppState {
    /// Wires the services over `db`. Stores are left as they are.
    pub fn new(config: &Config, db: Database, events: EventBus) -> Self {
        let registry = Arc::new(SlotRegistry::new(db.slots.clone()));
        let catalog = TurfCatalog::new(
            db.turfs.clone(),
            registry.clone(),
            SlotGeneration {
                horizon_days: config.slots.horizon_days,
                prebooked_ratio: config.slots.prebooked_ratio,
            },
        );
        let credentials = CredentialStore::new(
            db.accounts.clone(),
            db.sessions.clone(),
            SessionPolicy::from_seconds(config.auth.session_ttl_seconds),
        );
        let gateway = SignedCheckoutGateway::from_parts(
            config.payment.key_id.clone(),
            config.payment.key_secret.clone(),
        );
        if !gateway.is_configured() {
            tracing::warn!("Payment gateway keys missing; create-order will answer 500");
        }

        let sink = Arc::new(events.clone());
        let ledger = BookingLedger::new(
            db.bookings.clone(),
            db.turfs.clone(),
            registry.clone(),
            sink.clone(),
        );
        let payments = PaymentTracker::new(
            db.payments.clone(),
            db.bookings.clone(),
            Arc::new(gateway),
            sink,
            config.payment.currency.clone(),
        );
        let admin = AdminAggregator::new(db.bookings, db.turfs, db.accounts);

        Self {
            credentials: Arc::new(credentials),
            catalog: Arc::new(catalog),
            registry,
            ledger: Arc::new(ledger),
            payments: Arc::new(payments),
            admin: Arc::new(admin),
            events,
            ping_message: config.server.ping_message.clone(),
        }
    }

    /// Fresh in-memory stores seeded with the admin account and demo turfs,
    /// slots starting today.
    pub async fn bootstrap(config: &Config) -> CoreResult<Self> {
        Self::bootstrap_from(config, Utc::now().date_naive()).await
    }

    /// Same as [`AppState::bootstrap`] with slots generated from `first_day`.
    pub async fn bootstrap_from(config: &Config, first_day: NaiveDate) -> CoreResult<Self> {
        let state = Self::new(config, Database::in_memory(), EventBus::default());
        seed::seed(&state.credentials, &state.catalog, &config.auth, first_day).await?;
        Ok(state)
    }
}
