use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/coffee-options", get(list_coffee_options))
}

/// GET /api/coffee-options
async fn list_coffee_options(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let coffee_options = state.catalog.list_active().await?;
    Ok(Json(json!({ "coffeeOptions": coffee_options })))
}
