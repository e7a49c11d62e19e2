use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use greenfield_booking::models::{
    CreateOrderRequest, OrderCreated, VerifiedPayment, VerifyPaymentRequest,
};
use greenfield_booking::Payment;

use crate::error::{AppError, AppJson};
use crate::middleware::auth::CurrentAccount;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/payments/create-order", post(create_order))
        .route("/api/payments/verify", post(verify_payment))
        .route("/api/payments/booking/{booking_id}", get(payment_for_booking))
        .route("/api/payments/{payment_id}", get(payment_status))
}

/// POST /api/payments/create-order
async fn create_order(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<Json<OrderCreated>, AppError> {
    Ok(Json(state.payments.create_order(&account, req).await?))
}

/// POST /api/payments/verify
async fn verify_payment(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppJson(req): AppJson<VerifyPaymentRequest>,
) -> Result<Json<VerifiedPayment>, AppError> {
    Ok(Json(state.payments.verify(&account, req).await?))
}

/// GET /api/payments/{payment_id}
async fn payment_status(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(payment_id): Path<String>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.payments.get_status(&account, &payment_id).await?))
}

/// GET /api/payments/booking/{booking_id}
async fn payment_for_booking(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(booking_id): Path<String>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(state.payments.get_by_booking(&account, &booking_id).await?))
}
