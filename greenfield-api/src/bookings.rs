use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use greenfield_booking::models::{CancelledBooking, NewBooking, StatusUpdate};
use greenfield_booking::Booking;

use crate::error::{AppError, AppJson};
use crate::middleware::auth::{CurrentAccount, MaybeAccount};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/my-bookings", get(my_bookings))
        .route("/api/bookings/all", get(all_bookings))
        .route(
            "/api/bookings/{booking_id}",
            get(get_booking).delete(cancel_booking),
        )
        .route("/api/bookings/{booking_id}/status", put(update_status))
}

/// POST /api/bookings
async fn create_booking(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    AppJson(req): AppJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.ledger.create(&account, req).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings/my-bookings
async fn my_bookings(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.ledger.list_mine(&account).await?))
}

/// GET /api/bookings/all
pub async fn all_bookings(
    State(state): State<AppState>,
    caller: MaybeAccount,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.ledger.list_all(caller.account()).await?))
}

/// GET /api/bookings/{booking_id}
async fn get_booking(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.ledger.get(&account, &booking_id).await?))
}

/// DELETE /api/bookings/{booking_id}
async fn cancel_booking(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(booking_id): Path<String>,
) -> Result<Json<CancelledBooking>, AppError> {
    Ok(Json(state.ledger.cancel(&account, &booking_id).await?))
}

/// PUT /api/bookings/{booking_id}/status
async fn update_status(
    State(state): State<AppState>,
    caller: MaybeAccount,
    Path(booking_id): Path<String>,
    AppJson(update): AppJson<StatusUpdate>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(
        state
            .ledger
            .update_status(caller.account(), &booking_id, update)
            .await?,
    ))
}
