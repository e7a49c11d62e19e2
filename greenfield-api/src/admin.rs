use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use greenfield_booking::DashboardStats;
use greenfield_catalog::Turf;

use crate::bookings::all_bookings;
use crate::error::AppError;
use crate::middleware::auth::MaybeAccount;
use crate::state::AppState;
use crate::turfs::{create_turf, delete_turf, update_turf};

/// Dashboard surface. Turf and booking routes delegate to the same handlers
/// as the public API; every one of them answers 403 to non-admins.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/turfs", get(list_turfs).post(create_turf))
        .route("/api/admin/turfs/{turf_id}", put(update_turf).delete(delete_turf))
        .route("/api/admin/bookings", get(all_bookings))
}

/// GET /api/admin/stats
async fn stats(
    State(state): State<AppState>,
    caller: MaybeAccount,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(state.admin.stats(caller.account()).await?))
}

/// GET /api/admin/turfs
async fn list_turfs(
    State(state): State<AppState>,
    caller: MaybeAccount,
) -> Result<Json<Vec<Turf>>, AppError> {
    Ok(Json(state.catalog.list_for_admin(caller.account()).await?))
}
