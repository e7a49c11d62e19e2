use greenfield_booking::memory::{InMemoryBookingRepository, InMemoryPaymentRepository};
use greenfield_booking::repository::{BookingRepository, PaymentRepository};
use greenfield_catalog::memory::{InMemorySlotRepository, InMemoryTurfRepository};
use greenfield_catalog::repository::{SlotRepository, TurfRepository};
use greenfield_core::memory::{InMemoryAccountRepository, InMemorySessionRepository};
use greenfield_core::repository::{AccountRepository, SessionRepository};
use std::sync::Arc;
use tracing::info;

/// One handle per entity store. Services take the individual `Arc`s.
#[derive(Clone)]
pub struct Database {
    pub accounts: Arc<dyn AccountRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub turfs: Arc<dyn TurfRepository>,
    pub slots: Arc<dyn SlotRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
}

impl Database {
    /// Process-local stores; everything is lost on restart.
    pub fn in_memory() -> Self {
        info!("Using in-memory repositories");
        Self {
            accounts: Arc::new(InMemoryAccountRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            turfs: Arc::new(InMemoryTurfRepository::new()),
            slots: Arc::new(InMemorySlotRepository::new()),
            bookings: Arc::new(InMemoryBookingRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
        }
    }
}
