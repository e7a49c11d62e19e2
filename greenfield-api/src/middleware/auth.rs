use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use greenfield_core::Account;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Session resolution
// ============================================================================

/// What the bearer header resolved to. Inserted into every request.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub token: Option<String>,
    pub account: Option<Account>,
}

/// Resolves `Authorization: Bearer <token>` once per request. Unknown or
/// expired tokens resolve to no account; the route decides what that means.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string());

    let account = match &token {
        Some(token) => state.credentials.resolve_token(token).await?,
        None => None,
    };
    if token.is_some() && account.is_none() {
        tracing::debug!("Bearer token did not resolve to an account");
    }

    req.extensions_mut().insert(SessionContext { token, account });
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<SessionContext>().cloned().unwrap_or_default())
    }
}

// ============================================================================
// Extractors
// ============================================================================

/// A resolved account; 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl<S: Send + Sync> FromRequestParts<S> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        SessionContext::from_request_parts(parts, state)
            .await?
            .account
            .map(CurrentAccount)
            .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
    }
}

/// Whoever is calling, if anyone. Admin-only routes take this and let the
/// service answer 403 for anonymous callers.
#[derive(Debug, Clone)]
pub struct MaybeAccount(pub Option<Account>);

impl MaybeAccount {
    pub fn account(&self) -> Option<&Account> {
        self.0.as_ref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAccount(SessionContext::from_request_parts(parts, state).await?.account))
    }
}
