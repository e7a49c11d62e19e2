use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::identity::{Account, Session};
use crate::repository::{AccountRepository, SessionRepository};
use crate::{CoreError, CoreResult};

/// Process-local account store.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: Account) -> CoreResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.email) {
            return Err(CoreError::Conflict("Email already exists".to_string()));
        }
        accounts.insert(account.email.clone(), account);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list(&self) -> CoreResult<Vec<Account>> {
        Ok(self.accounts.read().await.values().cloned().collect())
    }
}

/// Process-local session store. Sessions vanish on restart.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: Session) -> CoreResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session);
        Ok(())
    }

    async fn find(&self, token: &str) -> CoreResult<Option<Session>> {
        Ok(self.sessions.read().await.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> CoreResult<bool> {
        Ok(self.sessions.write().await.remove(token).is_some())
    }
}
