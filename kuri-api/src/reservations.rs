use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use kuri_booking::BookingRequest;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reservations", post(create_reservation))
        .route("/api/reservations/search", get(search_reservations))
        .route("/api/reservations/{id}", get(get_reservation))
        .route(
            "/api/reservations/{id}/confirm-payment",
            post(confirm_payment),
        )
}

/// POST /api/reservations
async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state.booking.create_reservation(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "reservation": reservation })),
    ))
}

/// GET /api/reservations/{id}
async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let reservation = state.booking.find_reservation(id).await?;
    Ok(Json(json!({ "reservation": reservation })))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    phone: Option<String>,
    email: Option<String>,
}

/// GET /api/reservations/search?phone=&email=
async fn search_reservations(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let reservations = state
        .booking
        .find_by_contact(query.phone.as_deref(), query.email.as_deref())
        .await?;
    Ok(Json(json!({ "reservations": reservations })))
}

/// POST /api/reservations/{id}/confirm-payment
///
/// The customer-asserted payment flip; no gateway involved.
async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let reservation = state.booking.confirm_payment(id).await?;
    Ok(Json(json!({
        "message": "Payment confirmed successfully",
        "reservation": reservation,
    })))
}
