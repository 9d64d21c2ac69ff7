use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use kuri_booking::availability::parse_date;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/time-slots", get(get_time_slots))
}

#[derive(Debug, Deserialize)]
struct SlotQuery {
    date: Option<String>,
}

/// GET /api/time-slots?date=YYYY-MM-DD
async fn get_time_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let raw = query
        .date
        .ok_or_else(|| AppError::ValidationError("Date parameter is required".to_string()))?;
    let date = parse_date(&raw)?;

    let availability = state.booking.slot_availability(date).await?;
    Ok(Json(json!({ "availability": availability })))
}
