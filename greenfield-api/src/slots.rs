use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use greenfield_catalog::Slot;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    pub turf_id: Option<String>,
    pub date: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/slots", get(list_slots))
        .route("/api/slots/{slot_id}", get(get_slot))
}

/// GET /api/slots?turfId=..&date=YYYY-MM-DD
async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let (Some(turf_id), Some(date)) = (
        query.turf_id.filter(|t| !t.is_empty()),
        query.date.filter(|d| !d.is_empty()),
    ) else {
        return Err(AppError::BadRequest("turfId and date are required".to_string()));
    };

    // A day that cannot exist has no slots.
    let Ok(date) = date.parse::<NaiveDate>() else {
        tracing::debug!("Unparseable slot date {:?}", date);
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.registry.list_slots(&turf_id, date).await?))
}

/// GET /api/slots/{slot_id}
async fn get_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<Slot>, AppError> {
    Ok(Json(state.registry.get_slot(&slot_id).await?))
}
