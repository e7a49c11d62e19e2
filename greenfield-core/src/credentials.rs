use chrono::Utc;
use greenfield_shared::Masked;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::identity::{hash_password, verify_password, Account, Role, SessionPolicy};
use crate::repository::{AccountRepository, SessionRepository};
use crate::{CoreError, CoreResult};

pub const BOOTSTRAP_ADMIN_ID: &str = "admin1";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    pub message: String,
}

/// Accounts plus the bearer tokens issued to them.
pub struct CredentialStore {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
    policy: SessionPolicy,
}

impl CredentialStore {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<dyn SessionRepository>,
        policy: SessionPolicy,
    ) -> Self {
        Self { accounts, sessions, policy }
    }

    pub async fn register(&self, req: RegisterRequest) -> CoreResult<AuthResponse> {
        let (Some(name), Some(email), Some(phone), Some(password)) = (
            non_empty(req.name),
            non_empty(req.email),
            non_empty(req.phone),
            non_empty(req.password),
        ) else {
            return Err(CoreError::ValidationError("Missing required fields".to_string()));
        };

        let account = Account::new(name, email, phone, &password, Role::User);
        self.accounts.insert(account.clone()).await?;
        info!("Registered account {} ({})", account.id, Masked(&account.email));

        let token = self.issue(&account.id).await?;
        Ok(AuthResponse {
            token,
            user_id: account.id,
            role: Role::User,
            message: "Registration successful".to_string(),
        })
    }

    pub async fn login(&self, req: LoginRequest) -> CoreResult<AuthResponse> {
        let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
            return Err(CoreError::ValidationError(
                "Email and password are required".to_string(),
            ));
        };

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .filter(|a| verify_password(&password, &a.password_hash))
            .ok_or_else(|| CoreError::AuthenticationError("Invalid email or password".to_string()))?;

        let token = self.issue(&account.id).await?;
        info!("Login for account {}", account.id);
        Ok(AuthResponse {
            token,
            user_id: account.id,
            role: account.role,
            message: "Login successful".to_string(),
        })
    }

    /// Maps a bearer token to its account. Unknown, expired or orphaned tokens
    /// resolve to `None`; expired sessions are dropped on the way.
    pub async fn resolve_token(&self, token: &str) -> CoreResult<Option<Account>> {
        let Some(session) = self.sessions.find(token).await? else {
            debug!("Token lookup missed");
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            debug!("Session for {} expired", session.account_id);
            self.sessions.remove(token).await?;
            return Ok(None);
        }

        self.accounts.find_by_id(&session.account_id).await
    }

    /// Explicit logout. Returns whether the token was live.
    pub async fn revoke(&self, token: &str) -> CoreResult<bool> {
        self.sessions.remove(token).await
    }

    /// Creates the built-in admin account. Runs once from the startup seeding
    /// step; a second call with the same email is a `Conflict`.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> CoreResult<Account> {
        let account = Account {
            id: BOOTSTRAP_ADMIN_ID.to_string(),
            name: "Admin User".to_string(),
            email: email.to_string(),
            phone: "9999999999".to_string(),
            password_hash: hash_password(password),
            role: Role::Admin,
        };
        self.accounts.insert(account.clone()).await?;
        info!("Bootstrap admin {} ready", Masked(email));
        Ok(account)
    }

    async fn issue(&self, account_id: &str) -> CoreResult<String> {
        let session = self.policy.issue(account_id);
        let token = session.token.clone();
        self.sessions.insert(session).await?;
        Ok(token)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
