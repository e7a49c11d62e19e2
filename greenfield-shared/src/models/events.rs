use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingCreatedEvent {
    pub booking_id: String,
    pub user_id: String,
    pub turf_id: String,
    pub date: String,
    pub slot_ids: Vec<String>,
    pub total_price: f64,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingCancelledEvent {
    pub booking_id: String,
    pub cancelled_by: String,
    pub released_slot_ids: Vec<String>,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingStatusChangedEvent {
    pub booking_id: String,
    pub status: String,
    pub payment_status: String,
    pub changed_by: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PaymentVerifiedEvent {
    pub payment_id: String,
    pub booking_id: String,
    pub user_id: String,
    pub amount: i64,
    pub currency: String,
    pub timestamp: i64,
}

/// Everything the booking core announces after a state change has been stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BookingCreated(BookingCreatedEvent),
    BookingCancelled(BookingCancelledEvent),
    BookingStatusChanged(BookingStatusChangedEvent),
    PaymentVerified(PaymentVerifiedEvent),
}

impl DomainEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DomainEvent::BookingCreated(_) => "booking.created",
            DomainEvent::BookingCancelled(_) => "booking.cancelled",
            DomainEvent::BookingStatusChanged(_) => "booking.status_changed",
            DomainEvent::PaymentVerified(_) => "payment.verified",
        }
    }

    /// Partition key: the aggregate the event belongs to.
    pub fn key(&self) -> &str {
        match self {
            DomainEvent::BookingCreated(e) => &e.booking_id,
            DomainEvent::BookingCancelled(e) => &e.booking_id,
            DomainEvent::BookingStatusChanged(e) => &e.booking_id,
            DomainEvent::PaymentVerified(e) => &e.payment_id,
        }
    }
}
