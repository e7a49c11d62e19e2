use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A registered account. The password digest never leaves this struct;
/// responses are built from [`AccountProfile`].
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
}

impl Account {
    pub fn new(name: String, email: String, phone: String, password: &str, role: Role) -> Self {
        let id = match role {
            Role::User => format!("user_{}", uuid::Uuid::new_v4().simple()),
            Role::Admin => format!("admin_{}", uuid::Uuid::new_v4().simple()),
        };
        Self {
            id,
            name,
            email,
            phone,
            password_hash: hash_password(password),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin access rule used for bookings.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.id == owner_id || self.is_admin()
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

/// Rejects anyone who is not an authenticated admin. Anonymous callers get the
/// same `Forbidden` as plain users.
pub fn require_admin<'a>(actor: Option<&'a Account>, message: &str) -> CoreResult<&'a Account> {
    match actor {
        Some(account) if account.is_admin() => Ok(account),
        _ => Err(CoreError::AuthorizationError(message.to_string())),
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| now >= at).unwrap_or(false)
    }
}

/// Session lifetime policy. `ttl: None` keeps tokens valid until they are
/// revoked or the process restarts. A TTL too large to represent, or one
/// that would push the expiry past the calendar, also never expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPolicy {
    pub ttl: Option<Duration>,
}

impl SessionPolicy {
    pub fn from_seconds(ttl_seconds: Option<u64>) -> Self {
        Self {
            ttl: ttl_seconds
                .and_then(|s| i64::try_from(s).ok())
                .and_then(Duration::try_seconds),
        }
    }

    pub fn issue(&self, account_id: &str) -> Session {
        let issued_at = Utc::now();
        Session {
            token: generate_token(),
            account_id: account_id.to_string(),
            issued_at,
            expires_at: self.ttl.and_then(|ttl| issued_at.checked_add_signed(ttl)),
        }
    }
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// ============================================================================
// Password digests
// ============================================================================

const SALT_LEN: usize = 16;

/// Stored form: `<salt hex>$<sha256(salt || password) hex>`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!("{}${}", hex::encode(salt), digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, expected)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let actual = digest(&salt, password);
    actual.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let stored = hash_password("pw1234");
        assert!(verify_password("pw1234", &stored));
        assert!(!verify_password("pw12345", &stored));
        assert!(!verify_password("pw1234", "not-a-digest"));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        assert_ne!(hash_password("admin123"), hash_password("admin123"));
    }

    #[test]
    fn test_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_expiry_follows_policy() {
        let forever = SessionPolicy::default().issue("user_1");
        assert!(!forever.is_expired(Utc::now() + Duration::days(3650)));

        let short = SessionPolicy::from_seconds(Some(60)).issue("user_1");
        assert!(!short.is_expired(Utc::now()));
        assert!(short.is_expired(Utc::now() + Duration::seconds(61)));
    }

    #[test]
    fn test_oversized_ttl_never_expires() {
        assert!(SessionPolicy::from_seconds(Some(u64::MAX)).ttl.is_none());
        assert!(SessionPolicy::from_seconds(Some(i64::MAX as u64)).ttl.is_none());

        let far = SessionPolicy::from_seconds(Some(10_000_000_000_000));
        assert!(far.ttl.is_some());
        let session = far.issue("user_1");
        assert!(session.expires_at.is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_require_admin() {
        let admin = Account::new("A".into(), "a@x.com".into(), "1".into(), "pw", Role::Admin);
        let user = Account::new("U".into(), "u@x.com".into(), "2".into(), "pw", Role::User);

        assert!(require_admin(Some(&admin), "no").is_ok());
        assert!(matches!(require_admin(Some(&user), "no"), Err(CoreError::AuthorizationError(_))));
        assert!(matches!(require_admin(None, "no"), Err(CoreError::AuthorizationError(_))));
        assert!(user.can_access(&user.id));
        assert!(!user.can_access(&admin.id));
        assert!(admin.can_access(&user.id));
    }
}
