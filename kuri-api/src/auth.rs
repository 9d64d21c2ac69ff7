use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::middleware::auth::{AdminClaims, SESSION_COOKIE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

/// POST /api/admin/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "Username and password are required".to_string(),
        ));
    }

    let account = state
        .admins
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

    let valid = bcrypt::verify(&req.password, &account.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !valid {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let claims = AdminClaims {
        sub: account.id.to_string(),
        username: account.username.clone(),
        role: account.role.clone(),
        exp: (Utc::now() + Duration::seconds(state.auth.session_ttl_seconds as i64)).timestamp()
            as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))?;

    state.admins.touch_last_login(account.id).await?;
    info!("Admin '{}' logged in", account.username);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();

    Ok((jar.add(cookie), Json(json!({ "message": "Login successful" }))))
}

/// POST /api/admin/auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(removal),
        Json(json!({ "message": "Logout successful" })),
    )
}

/// GET /api/admin/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
) -> Result<Json<Value>, AppError> {
    let account = state
        .admins
        .find_by_username(&claims.username)
        .await?
        .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

    Ok(Json(json!({ "user": account.profile() })))
}

/// POST /api/admin/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::ValidationError(
            "Current and new password are required".to_string(),
        ));
    }
    if req.new_password.len() < 8 {
        return Err(AppError::ValidationError(
            "New password must be at least 8 characters".to_string(),
        ));
    }

    let account = state
        .admins
        .find_by_username(&claims.username)
        .await?
        .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

    let valid = bcrypt::verify(&req.current_password, &account.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password check failed: {}", e)))?;
    if !valid {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let new_hash = bcrypt::hash(&req.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))?;
    state.admins.change_password(account.id, &new_hash).await?;
    info!("Admin '{}' changed their password", account.username);

    Ok(Json(json!({ "message": "Password changed successfully" })))
}
