use chrono::Utc;
use greenfield_catalog::repository::TurfRepository;
use greenfield_catalog::SlotRegistry;
use greenfield_core::events::EventSink;
use greenfield_core::identity::require_admin;
use greenfield_core::{Account, CoreError, CoreResult};
use greenfield_shared::models::events::{
    BookingCancelledEvent, BookingCreatedEvent, BookingStatusChangedEvent,
};
use greenfield_shared::models::DomainEvent;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::{Booking, CancelledBooking, NewBooking, StatusUpdate};
use crate::repository::BookingRepository;

/// Reservations and the slot claims behind them.
///
/// Every booking holds its slots from creation until cancellation: `create`
/// claims them in one atomic step and `cancel` releases them again.
pub struct BookingLedger {
    bookings: Arc<dyn BookingRepository>,
    turfs: Arc<dyn TurfRepository>,
    registry: Arc<SlotRegistry>,
    events: Arc<dyn EventSink>,
}

impl BookingLedger {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        turfs: Arc<dyn TurfRepository>,
        registry: Arc<SlotRegistry>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { bookings, turfs, registry, events }
    }

    /// Claims the requested slots and records a confirmed, unpaid booking.
    pub async fn create(&self, account: &Account, req: NewBooking) -> CoreResult<Booking> {
        let missing = || CoreError::ValidationError("Missing required fields".to_string());

        let turf_id = req.turf_id.filter(|t| !t.is_empty()).ok_or_else(missing)?;
        let date = req.date.ok_or_else(missing)?;
        let slot_ids = req.slots.filter(|s| !s.is_empty()).ok_or_else(missing)?;
        let total_price = req
            .total_price
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(missing)?;

        let turf_name = match req.turf_name.filter(|n| !n.is_empty()) {
            Some(name) => name,
            None => self
                .turfs
                .get(&turf_id)
                .await?
                .map(|t| t.name)
                .unwrap_or_default(),
        };

        // The client total stays authoritative; a differing quote is only logged.
        let quote = self.registry.quote(&slot_ids).await?;
        if !quote.matches(total_price) {
            warn!(
                "Booking total {} for turf {} differs from slot quote {} ({} unknown slots)",
                total_price,
                turf_id,
                quote.total,
                quote.unknown_slots.len()
            );
        }

        let claimed = self.registry.claim(&slot_ids).await?;

        let booking = Booking::new(
            account.id.clone(),
            turf_id,
            turf_name,
            date,
            slot_ids,
            total_price,
        );
        if let Err(e) = self.bookings.insert(booking.clone()).await {
            error!("Failed to store booking {}: {}", booking.id, e);
            self.registry.release(&claimed).await?;
            return Err(e);
        }

        info!(
            "Booking {} created for user {} ({} slots on {})",
            booking.id,
            booking.user_id,
            booking.slots.len(),
            booking.date
        );
        self.events.publish(DomainEvent::BookingCreated(BookingCreatedEvent {
            booking_id: booking.id.clone(),
            user_id: booking.user_id.clone(),
            turf_id: booking.turf_id.clone(),
            date: booking.date.to_string(),
            slot_ids: booking.slots.clone(),
            total_price: booking.total_price,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(booking)
    }

    pub async fn list_mine(&self, account: &Account) -> CoreResult<Vec<Booking>> {
        self.bookings.list_by_user(&account.id).await
    }

    pub async fn list_all(&self, actor: Option<&Account>) -> CoreResult<Vec<Booking>> {
        require_admin(actor, "Only admins can view all bookings")?;
        self.bookings.list().await
    }

    /// Owner or admin only.
    pub async fn get(&self, account: &Account, booking_id: &str) -> CoreResult<Booking> {
        let booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Booking not found".to_string()))?;

        if !account.can_access(&booking.user_id) {
            return Err(CoreError::AuthorizationError(
                "You don't have access to this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Marks the booking cancelled and refunded, then frees its slots. The
    /// status check and the flip happen under one repository write.
    pub async fn cancel(&self, account: &Account, booking_id: &str) -> CoreResult<CancelledBooking> {
        self.get(account, booking_id).await?;

        let booking = self
            .bookings
            .update(
                booking_id,
                Box::new(|booking: &mut Booking| {
                    if booking.is_cancelled() {
                        return Err(CoreError::ValidationError(
                            "Booking is already cancelled".to_string(),
                        ));
                    }
                    booking.cancel();
                    Ok(())
                }),
            )
            .await?;

        let released = self.registry.release(&booking.slots).await?;
        info!("Booking {} cancelled by {}", booking.id, account.id);
        self.events.publish(DomainEvent::BookingCancelled(BookingCancelledEvent {
            booking_id: booking.id.clone(),
            cancelled_by: account.id.clone(),
            released_slot_ids: released,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(CancelledBooking {
            message: "Booking cancelled successfully".to_string(),
            booking,
        })
    }

    /// Raw admin overwrite of `status` and/or `paymentStatus`. Slots are not
    /// touched, even when the new status is `cancelled`.
    pub async fn update_status(
        &self,
        actor: Option<&Account>,
        booking_id: &str,
        update: StatusUpdate,
    ) -> CoreResult<Booking> {
        let admin = require_admin(actor, "Only admins can update booking status")?;

        let booking = self
            .bookings
            .update(
                booking_id,
                Box::new(move |booking: &mut Booking| {
                    if let Some(status) = update.status {
                        booking.status = status;
                    }
                    if let Some(payment_status) = update.payment_status {
                        booking.payment_status = payment_status;
                    }
                    Ok(())
                }),
            )
            .await?;

        info!(
            "Booking {} set to {}/{} by {}",
            booking.id,
            booking.status.as_str(),
            booking.payment_status.as_str(),
            admin.id
        );
        self.events.publish(DomainEvent::BookingStatusChanged(BookingStatusChangedEvent {
            booking_id: booking.id.clone(),
            status: booking.status.as_str().to_string(),
            payment_status: booking.payment_status.as_str().to_string(),
            changed_by: admin.id.clone(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(booking)
    }

    pub async fn count(&self) -> CoreResult<usize> {
        self.bookings.count().await
    }
}
