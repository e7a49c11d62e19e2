use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Payment state as recorded on the booking itself. Independent of the
/// payment tracker's records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingPaymentStatus {
    Pending,
    Completed,
    Refunded,
}

impl BookingPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingPaymentStatus::Pending => "pending",
            BookingPaymentStatus::Completed => "completed",
            BookingPaymentStatus::Refunded => "refunded",
        }
    }
}

/// A reservation of one or more slots on one turf and day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub turf_id: String,
    pub turf_name: String,
    pub date: NaiveDate,
    pub slots: Vec<String>,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: BookingPaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        user_id: String,
        turf_id: String,
        turf_name: String,
        date: NaiveDate,
        slots: Vec<String>,
        total_price: f64,
    ) -> Self {
        Self {
            id: format!("booking_{}", uuid::Uuid::new_v4().simple()),
            user_id,
            turf_id,
            turf_name,
            date,
            slots,
            total_price,
            status: BookingStatus::Confirmed,
            payment_status: BookingPaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }

    /// Cancelled bookings are refunded; slots are released by the caller.
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.payment_status = BookingPaymentStatus::Refunded;
    }
}

/// Client booking request. Fields are optional so missing ones surface as a
/// `400 Missing required fields` instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub turf_id: Option<String>,
    pub turf_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub slots: Option<Vec<String>>,
    pub total_price: Option<f64>,
}

/// Admin overwrite of booking state. No transition rules are applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<BookingPaymentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledBooking {
    pub message: String,
    pub booking: Booking,
}

// ============================================================================
// Payments
// ============================================================================

/// `Failed` has no producer yet: nothing in the API marks a payment failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Upi,
    Card,
}

/// A tracked attempt to settle a booking through the checkout gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub booking_id: String,
    pub user_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(rename = "razorpayOrderId", skip_serializing_if = "Option::is_none", default)]
    pub gateway_order_id: Option<String>,
    #[serde(rename = "razorpayPaymentId", skip_serializing_if = "Option::is_none", default)]
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Records the verified gateway identifiers. Only called after the
    /// signature check passed.
    pub fn complete(&mut self, gateway_order_id: String, gateway_payment_id: String) {
        self.status = PaymentStatus::Completed;
        self.gateway_order_id = Some(gateway_order_id);
        self.gateway_payment_id = Some(gateway_payment_id);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub booking_id: Option<String>,
    /// Major currency units.
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub payment_id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "razorpayKeyId")]
    pub key_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub payment_id: Option<String>,
    #[serde(rename = "razorpayOrderId")]
    pub gateway_order_id: Option<String>,
    #[serde(rename = "razorpayPaymentId")]
    pub gateway_payment_id: Option<String>,
    #[serde(rename = "razorpaySignature")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub message: String,
    pub payment: Payment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_booking_is_confirmed_and_unpaid() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut booking = Booking::new(
            "user_1".into(),
            "turf1".into(),
            "Green Valley Turf".into(),
            date,
            vec!["slot_turf1_2026-10-19_0".into()],
            500.0,
        );
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, BookingPaymentStatus::Pending);

        booking.cancel();
        assert!(booking.is_cancelled());
        assert_eq!(booking.payment_status, BookingPaymentStatus::Refunded);
    }

    #[test]
    fn test_booking_wire_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let booking = Booking::new("u".into(), "turf1".into(), "T".into(), date, vec![], 1.0);
        let value = serde_json::to_value(&booking).unwrap();

        assert_eq!(value["date"], "2026-10-19");
        assert_eq!(value["status"], "confirmed");
        assert_eq!(value["paymentStatus"], "pending");
        assert!(value["totalPrice"].is_number());
        assert!(value["userId"].is_string());
    }

    #[test]
    fn test_payment_hides_gateway_ids_until_verified() {
        let mut payment = Payment {
            id: "payment_1".into(),
            order_id: "order_1".into(),
            booking_id: "booking_1".into(),
            user_id: "user_1".into(),
            amount: 100000,
            currency: "INR".into(),
            status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Upi,
            gateway_order_id: None,
            gateway_payment_id: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&payment).unwrap();
        assert!(value.get("razorpayOrderId").is_none());
        assert_eq!(value["paymentMethod"], "upi");

        payment.complete("order_1".into(), "pay_1".into());
        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["razorpayPaymentId"], "pay_1");
    }

    #[test]
    fn test_verify_request_reads_gateway_field_names() {
        let req: VerifyPaymentRequest = serde_json::from_value(serde_json::json!({
            "paymentId": "payment_1",
            "razorpayOrderId": "order_1",
            "razorpayPaymentId": "pay_1",
            "razorpaySignature": "abc",
        }))
        .unwrap();
        assert_eq!(req.gateway_order_id.as_deref(), Some("order_1"));
        assert_eq!(req.signature.as_deref(), Some("abc"));
    }
}
