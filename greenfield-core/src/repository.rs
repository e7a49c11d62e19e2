use async_trait::async_trait;

use crate::identity::{Account, Session};
use crate::CoreResult;

/// Account storage keyed by email.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn insert(&self, account: Account) -> CoreResult<()>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Account>>;

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Account>>;

    async fn list(&self) -> CoreResult<Vec<Account>>;
}

/// Token to account mapping for issued sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: Session) -> CoreResult<()>;

    async fn find(&self, token: &str) -> CoreResult<Option<Session>>;

    /// Returns whether a session was removed.
    async fn remove(&self, token: &str) -> CoreResult<bool>;
}
