use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use greenfield_catalog::{Turf, TurfDraft};
use serde_json::{json, Value};

use crate::error::{AppError, AppJson};
use crate::middleware::auth::MaybeAccount;
use crate::state::AppState;

/// Public listing plus admin CRUD. `/api/admin/turfs` reuses the handlers
/// below, so both surfaces share one authorization path.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/turfs", get(list_turfs).post(create_turf))
        .route(
            "/api/turfs/{turf_id}",
            get(get_turf).put(update_turf).delete(delete_turf),
        )
}

/// GET /api/turfs
async fn list_turfs(State(state): State<AppState>) -> Result<Json<Vec<Turf>>, AppError> {
    Ok(Json(state.catalog.list().await?))
}

/// GET /api/turfs/{turf_id}
async fn get_turf(
    State(state): State<AppState>,
    Path(turf_id): Path<String>,
) -> Result<Json<Turf>, AppError> {
    Ok(Json(state.catalog.get(&turf_id).await?))
}

/// POST /api/turfs
pub async fn create_turf(
    State(state): State<AppState>,
    caller: MaybeAccount,
    AppJson(draft): AppJson<TurfDraft>,
) -> Result<(StatusCode, Json<Turf>), AppError> {
    let turf = state.catalog.create(caller.account(), draft).await?;
    Ok((StatusCode::CREATED, Json(turf)))
}

/// PUT /api/turfs/{turf_id}
pub async fn update_turf(
    State(state): State<AppState>,
    caller: MaybeAccount,
    Path(turf_id): Path<String>,
    AppJson(draft): AppJson<TurfDraft>,
) -> Result<Json<Turf>, AppError> {
    Ok(Json(state.catalog.update(caller.account(), &turf_id, draft).await?))
}

/// DELETE /api/turfs/{turf_id}
pub async fn delete_turf(
    State(state): State<AppState>,
    caller: MaybeAccount,
    Path(turf_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.catalog.delete(caller.account(), &turf_id).await?;
    Ok(Json(json!({ "message": "Turf deleted successfully" })))
}
