use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::{CoreError, CoreResult};

type HmacSha256 = Hmac<Sha256>;

pub const GATEWAY_UNCONFIGURED: &str =
    "Payment gateway not configured. Please set payment.key_id and payment.key_secret";

/// Key pair issued by the checkout provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCredentials {
    pub key_id: String,
    pub key_secret: String,
}

/// Order handle the client passes to the provider's checkout widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register an order of `amount` minor units with the provider.
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> CoreResult<GatewayOrder>;

    /// Check the checkout callback signature for an order/payment pair.
    fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> CoreResult<bool>;
}

/// Checkout gateway with Razorpay-style signatures: the callback carries
/// `hex(HMAC-SHA256(key_secret, "<order_id>|<payment_id>"))`. Orders are minted
/// locally; nothing here talks to the network.
pub struct SignedCheckoutGateway {
    credentials: Option<GatewayCredentials>,
}

impl SignedCheckoutGateway {
    pub fn new(credentials: Option<GatewayCredentials>) -> Self {
        Self { credentials }
    }

    /// Both halves of the key pair must be present and non-empty.
    pub fn from_parts(key_id: Option<String>, key_secret: Option<String>) -> Self {
        let credentials = match (key_id, key_secret) {
            (Some(key_id), Some(key_secret)) if !key_id.is_empty() && !key_secret.is_empty() => {
                Some(GatewayCredentials { key_id, key_secret })
            }
            _ => None,
        };
        Self::new(credentials)
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> CoreResult<&GatewayCredentials> {
        self.credentials
            .as_ref()
            .ok_or_else(|| CoreError::Unconfigured(GATEWAY_UNCONFIGURED.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for SignedCheckoutGateway {
    async fn create_order(
        &self,
        amount: i64,
        currency: &str,
        receipt: &str,
    ) -> CoreResult<GatewayOrder> {
        let credentials = self.credentials()?;
        let order_id = format!("order_{}", uuid::Uuid::new_v4().simple());
        tracing::debug!("Minted gateway order {} for receipt {}", order_id, receipt);

        Ok(GatewayOrder {
            order_id,
            amount,
            currency: currency.to_string(),
            key_id: credentials.key_id.clone(),
        })
    }

    fn verify_signature(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> CoreResult<bool> {
        let credentials = self.credentials()?;
        let expected = sign(&credentials.key_secret, gateway_order_id, gateway_payment_id)?;
        // Full-length, exact-case, constant-time comparison. Slices of unequal
        // length never compare equal.
        Ok(expected.as_bytes().ct_eq(signature.as_bytes()).into())
    }
}

/// Lowercase hex HMAC-SHA256 over `order_id|payment_id`.
pub fn sign(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> CoreResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| CoreError::InternalError(format!("HMAC key rejected: {}", e)))?;
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(gateway_payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Major currency units to integer minor units (rupees to paise).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SignedCheckoutGateway {
        SignedCheckoutGateway::from_parts(Some("rzp_test_key".into()), Some("shh".into()))
    }

    #[test]
    fn test_sign_matches_known_vector() {
        let sig = sign("shh", "order_1", "pay_1").unwrap();
        assert_eq!(sig, "11875d078d618316e1bd46ff51229da0ad86d74508c45016b5d47305d5720c53");
    }

    #[test]
    fn test_valid_signature_is_accepted() {
        let sig = sign("shh", "order_1", "pay_1").unwrap();
        assert!(gateway().verify_signature("order_1", "pay_1", &sig).unwrap());
    }

    #[test]
    fn test_tampered_signatures_are_rejected() {
        let gw = gateway();
        let sig = sign("shh", "order_1", "pay_1").unwrap();

        // Single bit flipped in the hex text.
        let mut flipped = sig.clone().into_bytes();
        flipped[10] ^= 0x01;
        let flipped = String::from_utf8(flipped).unwrap();
        assert!(!gw.verify_signature("order_1", "pay_1", &flipped).unwrap());

        // Prefixes, case changes and swapped ids never pass.
        assert!(!gw.verify_signature("order_1", "pay_1", &sig[..32]).unwrap());
        assert!(!gw.verify_signature("order_1", "pay_1", &sig.to_uppercase()).unwrap());
        assert!(!gw.verify_signature("order_1", "pay_2", &sig).unwrap());
        assert!(!gw.verify_signature("order_1", "pay_1", "").unwrap());
    }

    #[tokio::test]
    async fn test_unconfigured_gateway_refuses_work() {
        let gw = SignedCheckoutGateway::from_parts(Some("id".into()), Some(String::new()));
        assert!(!gw.is_configured());

        let err = gw.create_order(100, "INR", "payment_1").await.unwrap_err();
        assert!(matches!(err, CoreError::Unconfigured(_)));
        assert!(matches!(
            gw.verify_signature("o", "p", "s").unwrap_err(),
            CoreError::Unconfigured(_)
        ));
    }

    #[tokio::test]
    async fn test_order_carries_key_id_and_amount() {
        let order = gateway().create_order(55000, "INR", "payment_1").await.unwrap();
        assert!(order.order_id.starts_with("order_"));
        assert_eq!(order.amount, 55000);
        assert_eq!(order.key_id, "rzp_test_key");
    }

    #[test]
    fn test_minor_units_round() {
        assert_eq!(to_minor_units(500.0), 50000);
        assert_eq!(to_minor_units(19.999), 2000);
        assert_eq!(to_minor_units(550.5), 55050);
    }
}
