use async_trait::async_trait;
use greenfield_core::{CoreError, CoreResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{Booking, Payment};
use crate::repository::{BookingMutation, BookingRepository, PaymentMutation, PaymentRepository};

/// In-memory booking store (stand-in for a database table)
#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<String, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn oldest_first(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    bookings
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: Booking) -> CoreResult<()> {
        let mut bookings = self.bookings.write().await;
        if bookings.contains_key(&booking.id) {
            return Err(CoreError::Conflict(format!("Booking {} already exists", booking.id)));
        }
        bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn get(&self, id: &str) -> CoreResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Booking>> {
        Ok(oldest_first(self.bookings.read().await.values().cloned().collect()))
    }

    async fn list_by_user(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        Ok(oldest_first(
            self.bookings
                .read()
                .await
                .values()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, id: &str, mutation: BookingMutation) -> CoreResult<Booking> {
        let mut bookings = self.bookings.write().await;
        let stored = bookings
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound("Booking not found".to_string()))?;

        // Edit a copy so a failed mutation leaves the stored record as it was.
        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    async fn count(&self) -> CoreResult<usize> {
        Ok(self.bookings.read().await.len())
    }
}

/// In-memory payment store
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<String, Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn insert(&self, payment: Payment) -> CoreResult<()> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(CoreError::Conflict(format!("Payment {} already exists", payment.id)));
        }
        payments.insert(payment.id.clone(), payment);
        Ok(())
    }

    async fn get(&self, id: &str) -> CoreResult<Option<Payment>> {
        Ok(self.payments.read().await.get(id).cloned())
    }

    async fn find_by_booking(&self, booking_id: &str, user_id: &str) -> CoreResult<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.booking_id == booking_id && p.user_id == user_id)
            .min_by(|a, b| a.created_at.cmp(&b.created_at))
            .cloned())
    }

    async fn update(&self, id: &str, mutation: PaymentMutation) -> CoreResult<Payment> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(id)
            .ok_or_else(|| CoreError::NotFound("Payment not found".to_string()))?;

        let mut draft = stored.clone();
        mutation(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }
}
