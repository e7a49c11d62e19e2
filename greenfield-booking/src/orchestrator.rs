use chrono::Utc;
use greenfield_core::events::EventSink;
use greenfield_core::payment::{to_minor_units, PaymentGateway};
use greenfield_core::{Account, CoreError, CoreResult};
use greenfield_shared::models::events::PaymentVerifiedEvent;
use greenfield_shared::models::DomainEvent;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{
    CreateOrderRequest, OrderCreated, Payment, PaymentStatus, VerifiedPayment,
    VerifyPaymentRequest,
};
use crate::repository::{BookingRepository, PaymentRepository};

/// Payment attempts for bookings and their checkout-signature verification.
///
/// A payment moves `pending -> completed` only once the gateway signature
/// checks out. The booking's own `paymentStatus` is not touched here.
pub struct PaymentTracker {
    payments: Arc<dyn PaymentRepository>,
    bookings: Arc<dyn BookingRepository>,
    gateway: Arc<dyn PaymentGateway>,
    events: Arc<dyn EventSink>,
    default_currency: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl PaymentTracker {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        bookings: Arc<dyn BookingRepository>,
        gateway: Arc<dyn PaymentGateway>,
        events: Arc<dyn EventSink>,
        default_currency: String,
    ) -> Self {
        Self { payments, bookings, gateway, events, default_currency }
    }

    /// Opens a gateway order for one of the caller's bookings and records a
    /// pending payment against it.
    pub async fn create_order(
        &self,
        account: &Account,
        req: CreateOrderRequest,
    ) -> CoreResult<OrderCreated> {
        let missing = || CoreError::ValidationError("Missing required fields".to_string());
        let booking_id = non_empty(req.booking_id).ok_or_else(missing)?;
        let amount = req
            .amount
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or_else(missing)?;
        let currency = non_empty(req.currency).unwrap_or_else(|| self.default_currency.clone());

        let booking = self
            .bookings
            .get(&booking_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Booking not found".to_string()))?;
        if booking.user_id != account.id {
            return Err(CoreError::AuthorizationError(
                "You don't have access to this booking".to_string(),
            ));
        }

        let amount = to_minor_units(amount);
        let order = self.gateway.create_order(amount, &currency, &booking.id).await?;

        let payment = Payment {
            id: format!("payment_{}", uuid::Uuid::new_v4().simple()),
            order_id: order.order_id.clone(),
            booking_id: booking.id,
            user_id: account.id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            status: PaymentStatus::Pending,
            payment_method: req.payment_method.unwrap_or_default(),
            gateway_order_id: None,
            gateway_payment_id: None,
            created_at: Utc::now(),
        };
        self.payments.insert(payment.clone()).await?;
        info!(
            "Payment {} opened for booking {} ({} {})",
            payment.id, payment.booking_id, payment.amount, payment.currency
        );

        Ok(OrderCreated {
            payment_id: payment.id,
            order_id: order.order_id,
            amount: order.amount,
            currency: order.currency,
            key_id: order.key_id,
        })
    }

    /// Checks the checkout callback signature and completes the payment.
    /// A bad signature leaves the payment exactly as it was.
    pub async fn verify(
        &self,
        account: &Account,
        req: VerifyPaymentRequest,
    ) -> CoreResult<VerifiedPayment> {
        let missing = || CoreError::ValidationError("Missing required fields".to_string());
        let payment_id = non_empty(req.payment_id).ok_or_else(missing)?;
        let gateway_order_id = non_empty(req.gateway_order_id).ok_or_else(missing)?;
        let gateway_payment_id = non_empty(req.gateway_payment_id).ok_or_else(missing)?;
        let signature = req.signature.unwrap_or_default();

        let payment = self
            .payments
            .get(&payment_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Payment not found".to_string()))?;
        if payment.user_id != account.id {
            return Err(CoreError::AuthorizationError(
                "Unauthorized payment verification".to_string(),
            ));
        }
        if payment.order_id != gateway_order_id {
            warn!("Payment {} verified against foreign order {}", payment.id, gateway_order_id);
            return Err(CoreError::ValidationError("Order does not match payment".to_string()));
        }

        if !self
            .gateway
            .verify_signature(&gateway_order_id, &gateway_payment_id, &signature)?
        {
            warn!("Rejected signature for payment {}", payment.id);
            return Err(CoreError::ValidationError("Invalid payment signature".to_string()));
        }

        let payment = self
            .payments
            .update(
                &payment_id,
                Box::new(move |payment: &mut Payment| {
                    payment.complete(gateway_order_id, gateway_payment_id);
                    Ok(())
                }),
            )
            .await?;

        info!("Payment {} verified for booking {}", payment.id, payment.booking_id);
        self.events.publish(DomainEvent::PaymentVerified(PaymentVerifiedEvent {
            payment_id: payment.id.clone(),
            booking_id: payment.booking_id.clone(),
            user_id: payment.user_id.clone(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok(VerifiedPayment {
            message: "Payment verified successfully".to_string(),
            payment,
        })
    }

    pub async fn get_status(&self, account: &Account, payment_id: &str) -> CoreResult<Payment> {
        let payment = self
            .payments
            .get(payment_id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Payment not found".to_string()))?;
        if payment.user_id != account.id {
            return Err(CoreError::AuthorizationError("Unauthorized".to_string()));
        }
        Ok(payment)
    }

    /// The caller's payment for `booking_id`; other users' payments are invisible.
    pub async fn get_by_booking(&self, account: &Account, booking_id: &str) -> CoreResult<Payment> {
        self.payments
            .find_by_booking(booking_id, &account.id)
            .await?
            .ok_or_else(|| CoreError::NotFound("Payment not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Booking, NewBooking, PaymentMethod};
    use crate::testing::{fixture, fixture_with_gateway, user, Fixture, KEY_ID, KEY_SECRET};
    use greenfield_core::payment::{sign, SignedCheckoutGateway};

    async fn booked(fx: &Fixture, account: &Account) -> Booking {
        let slot = fx.registry.list_slots("turf2", fx.today).await.unwrap()[0].id.clone();
        fx.ledger
            .create(
                account,
                NewBooking {
                    turf_id: Some("turf2".into()),
                    turf_name: None,
                    date: Some(fx.today),
                    slots: Some(vec![slot]),
                    total_price: Some(600.0),
                },
            )
            .await
            .unwrap()
    }

    fn order_for(booking: &Booking) -> CreateOrderRequest {
        CreateOrderRequest {
            booking_id: Some(booking.id.clone()),
            amount: Some(booking.total_price),
            currency: None,
            payment_method: None,
        }
    }

    fn callback(order: &OrderCreated, signature: String) -> VerifyPaymentRequest {
        VerifyPaymentRequest {
            payment_id: Some(order.payment_id.clone()),
            gateway_order_id: Some(order.order_id.clone()),
            gateway_payment_id: Some("pay_29QQoUBi66xm2f".into()),
            signature: Some(signature),
        }
    }

    #[tokio::test]
    async fn test_create_order_converts_to_minor_units() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let booking = booked(&fx, &alice).await;

        let order = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap();
        assert_eq!(order.amount, 60000);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.key_id, KEY_ID);

        let payment = fx.tracker.get_status(&alice, &order.payment_id).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.payment_method, PaymentMethod::Upi);
        assert_eq!(payment.order_id, order.order_id);
        assert!(payment.gateway_payment_id.is_none());
    }

    #[tokio::test]
    async fn test_create_order_validation() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let bob = user("bob@example.com");
        let booking = booked(&fx, &alice).await;

        for req in [
            CreateOrderRequest { booking_id: None, ..order_for(&booking) },
            CreateOrderRequest { amount: Some(0.0), ..order_for(&booking) },
            CreateOrderRequest { amount: Some(-5.0), ..order_for(&booking) },
        ] {
            let err = fx.tracker.create_order(&alice, req).await.unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(_)));
        }

        let missing = CreateOrderRequest {
            booking_id: Some("booking_missing".into()),
            ..order_for(&booking)
        };
        assert!(matches!(
            fx.tracker.create_order(&alice, missing).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            fx.tracker.create_order(&bob, order_for(&booking)).await,
            Err(CoreError::AuthorizationError(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_is_reported() {
        let fx = fixture_with_gateway(SignedCheckoutGateway::from_parts(None, None)).await;
        let alice = user("alice@example.com");
        let booking = booked(&fx, &alice).await;

        let err = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap_err();
        assert!(matches!(err, CoreError::Unconfigured(ref m) if m.contains("not configured")));
    }

    #[tokio::test]
    async fn test_valid_signature_completes_payment() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let booking = booked(&fx, &alice).await;
        let order = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap();

        let signature = sign(KEY_SECRET, &order.order_id, "pay_29QQoUBi66xm2f").unwrap();
        let verified = fx.tracker.verify(&alice, callback(&order, signature)).await.unwrap();

        assert_eq!(verified.message, "Payment verified successfully");
        assert_eq!(verified.payment.status, PaymentStatus::Completed);
        assert_eq!(verified.payment.gateway_order_id.as_deref(), Some(order.order_id.as_str()));
        assert_eq!(verified.payment.gateway_payment_id.as_deref(), Some("pay_29QQoUBi66xm2f"));
        assert!(fx.sink.topics().contains(&"payment.verified"));

        // The booking keeps its own payment flag.
        let stored = fx.ledger.get(&alice, &booking.id).await.unwrap();
        assert_eq!(stored.payment_status, crate::BookingPaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_tampered_signature_leaves_payment_pending() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let booking = booked(&fx, &alice).await;
        let order = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap();

        let good = sign(KEY_SECRET, &order.order_id, "pay_29QQoUBi66xm2f").unwrap();
        let mut tampered = good.clone().into_bytes();
        tampered[0] = if tampered[0] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(tampered).unwrap();

        for signature in [tampered, good.to_uppercase(), good[..32].to_string(), String::new()] {
            let err = fx.tracker.verify(&alice, callback(&order, signature)).await.unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(ref m) if m == "Invalid payment signature"));
        }

        let payment = fx.tracker.get_status(&alice, &order.payment_id).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.gateway_order_id.is_none());
    }

    #[tokio::test]
    async fn test_verify_rejects_strangers_and_foreign_orders() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let bob = user("bob@example.com");
        let booking = booked(&fx, &alice).await;
        let order = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap();
        let signature = sign(KEY_SECRET, &order.order_id, "pay_29QQoUBi66xm2f").unwrap();

        let err = fx.tracker.verify(&bob, callback(&order, signature.clone())).await.unwrap_err();
        assert!(matches!(err, CoreError::AuthorizationError(ref m) if m == "Unauthorized payment verification"));

        let mut foreign = callback(&order, sign(KEY_SECRET, "order_other", "pay_1").unwrap());
        foreign.gateway_order_id = Some("order_other".into());
        foreign.gateway_payment_id = Some("pay_1".into());
        assert!(matches!(
            fx.tracker.verify(&alice, foreign).await,
            Err(CoreError::ValidationError(_))
        ));

        let mut unknown = callback(&order, signature.clone());
        unknown.payment_id = Some("payment_missing".into());
        assert!(matches!(fx.tracker.verify(&alice, unknown).await, Err(CoreError::NotFound(_))));

        let mut incomplete = callback(&order, signature);
        incomplete.gateway_payment_id = None;
        assert!(matches!(
            fx.tracker.verify(&alice, incomplete).await,
            Err(CoreError::ValidationError(ref m)) if m == "Missing required fields"
        ));
    }

    #[tokio::test]
    async fn test_lookups_are_owner_scoped() {
        let fx = fixture().await;
        let alice = user("alice@example.com");
        let bob = user("bob@example.com");
        let booking = booked(&fx, &alice).await;
        let order = fx.tracker.create_order(&alice, order_for(&booking)).await.unwrap();

        assert_eq!(
            fx.tracker.get_by_booking(&alice, &booking.id).await.unwrap().id,
            order.payment_id
        );
        assert!(matches!(
            fx.tracker.get_by_booking(&bob, &booking.id).await,
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            fx.tracker.get_status(&bob, &order.payment_id).await,
            Err(CoreError::AuthorizationError(_))
        ));
        assert!(matches!(
            fx.tracker.get_status(&alice, "payment_missing").await,
            Err(CoreError::NotFound(_))
        ));
    }
}
