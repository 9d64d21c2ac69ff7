use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use kuri_core::catalog::{CoffeeOptionUpdate, NewCoffeeOption};
use kuri_core::reservation::ReservationStatus;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Reservation Management
// ============================================================================

/// GET /api/admin/reservations
pub async fn list_reservations(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let (reservations, stats) = state.booking.recent_with_stats().await?;
    Ok(Json(json!({
        "reservations": reservations,
        "stats": stats,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    status: Option<String>,
}

/// PUT /api/admin/reservations/{id}
pub async fn update_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let raw = req
        .status
        .ok_or_else(|| AppError::ValidationError("Missing status".to_string()))?;
    let status = ReservationStatus::parse(&raw)
        .ok_or_else(|| AppError::ValidationError("Invalid status value".to_string()))?;

    let reservation = state.booking.set_status(id, status).await?;
    Ok(Json(json!({
        "message": "Reservation status updated successfully",
        "reservation": reservation,
    })))
}

/// DELETE /api/admin/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.booking.delete_reservation(id).await?;
    Ok(Json(json!({ "message": "Reservation deleted successfully" })))
}

// ============================================================================
// Coffee Option Management
// ============================================================================

/// GET /api/admin/coffee-options
pub async fn list_coffee_options(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let coffee_options = state.catalog.list_active().await?;
    Ok(Json(json!({ "coffeeOptions": coffee_options })))
}

#[derive(Debug, Deserialize)]
pub struct CreateCoffeeRequest {
    name: Option<String>,
    price: Option<i64>,
    description: Option<String>,
}

/// POST /api/admin/coffee-options
pub async fn create_coffee_option(
    State(state): State<AppState>,
    Json(req): Json<CreateCoffeeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (name, price) = match (req.name, req.price) {
        (Some(name), Some(price)) => (name, price),
        _ => {
            return Err(AppError::ValidationError(
                "Name and price are required".to_string(),
            ))
        }
    };

    let new = NewCoffeeOption::from_input(&name, price, req.description)?;
    let new_coffee = state.catalog.create(&new).await?;
    Ok((StatusCode::CREATED, Json(json!({ "newCoffee": new_coffee }))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoffeeRequest {
    id: Option<String>,
    name: Option<String>,
    price: Option<i64>,
    description: Option<String>,
    is_active: Option<bool>,
}

/// PUT /api/admin/coffee-options
pub async fn update_coffee_option(
    State(state): State<AppState>,
    Json(req): Json<UpdateCoffeeRequest>,
) -> Result<Json<Value>, AppError> {
    let (id, name, price, is_active) = match (req.id, req.name, req.price, req.is_active) {
        (Some(id), Some(name), Some(price), Some(is_active)) => (id, name, price, is_active),
        _ => {
            return Err(AppError::ValidationError(
                "ID, name, price, and active status are required".to_string(),
            ))
        }
    };

    let update = CoffeeOptionUpdate {
        name,
        price,
        description: req.description,
        is_active,
    };
    update.validate()?;

    let updated_coffee = state
        .catalog
        .update(&id, &update)
        .await?
        .ok_or_else(|| AppError::NotFoundError("Coffee option not found".to_string()))?;
    Ok(Json(json!({ "updatedCoffee": updated_coffee })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteCoffeeRequest {
    id: Option<String>,
}

/// DELETE /api/admin/coffee-options
pub async fn delete_coffee_option(
    State(state): State<AppState>,
    Json(req): Json<DeleteCoffeeRequest>,
) -> Result<Json<Value>, AppError> {
    let id = req
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("ID is required".to_string()))?;

    let deleted = state.catalog.soft_delete(&id).await?;
    if !deleted {
        return Err(AppError::NotFoundError(
            "Coffee option not found".to_string(),
        ));
    }
    Ok(Json(json!({ "message": "Coffee option deleted successfully" })))
}
