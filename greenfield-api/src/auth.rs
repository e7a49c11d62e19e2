use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use greenfield_core::credentials::{AuthResponse, LoginRequest, RegisterRequest};
use greenfield_core::identity::AccountProfile;
use serde_json::{json, Value};

use crate::error::{AppError, AppJson};
use crate::middleware::auth::{CurrentAccount, SessionContext};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// POST /api/auth/register
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.credentials.register(req).await?))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.credentials.login(req).await?))
}

/// POST /api/auth/logout
async fn logout(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Value>, AppError> {
    if let Some(token) = session.token {
        state.credentials.revoke(&token).await?;
    }
    tracing::info!("Account {} logged out", account.id);
    Ok(Json(json!({ "message": "Logout successful" })))
}

/// GET /api/auth/me
async fn me(session: SessionContext) -> Result<Json<AccountProfile>, AppError> {
    if session.token.is_none() {
        return Err(AppError::Unauthorized("No token provided".to_string()));
    }
    let account = session
        .account
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
    Ok(Json(account.profile()))
}
